use folio_core::DraftError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Session(#[from] folio_core::SessionError),

    #[error(transparent)]
    Config(#[from] folio_core::ConfigError),

    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("valuation service unreachable: {0}")]
    Unreachable(String),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Draft(DraftError::Validation(_)) => 2,
            Self::Draft(DraftError::Programming(_)) => 1,
            Self::Session(_) => 2,
            Self::Command(_) => 2,
            Self::AnalysisFailed(_) => 3,
            Self::Unreachable(_) => 3,
            Self::Config(_) => 4,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_core::{FormField, SessionError, ValidationError};

    use super::*;

    #[test]
    fn user_errors_and_failures_have_distinct_codes() {
        let validation = CliError::from(DraftError::Validation(ValidationError::MissingField {
            field: FormField::Ticker,
        }));
        let empty = CliError::from(SessionError::EmptyPortfolio);
        let failed = CliError::AnalysisFailed(String::from("down"));

        assert_eq!(validation.exit_code(), 2);
        assert_eq!(empty.exit_code(), 2);
        assert_eq!(failed.exit_code(), 3);
        assert_eq!(failed.to_string(), "analysis failed: down");
    }
}
