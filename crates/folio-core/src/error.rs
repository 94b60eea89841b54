use thiserror::Error;

use crate::draft::FormField;

/// User-correctable validation failures raised while adding a draft holding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("field '{field}' is required")]
    MissingField { field: FormField },
    #[error("field '{field}' must be a number: '{value}'")]
    NotANumber { field: FormField, value: String },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: FormField },
    #[error("field '{field}' must be greater than zero")]
    NotPositive { field: FormField },
}

/// Errors raised by draft store commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// The form contents cannot become a holding; state is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller dispatched something the store does not understand.
    #[error("unrecognized draft command: {0}")]
    Programming(String),
}

impl DraftError {
    pub fn programming(detail: impl Into<String>) -> Self {
        Self::Programming(detail.into())
    }

    pub const fn is_programming(&self) -> bool {
        matches!(self, Self::Programming(_))
    }
}

/// Precondition failures for starting an analysis.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("add at least one holding before analyzing")]
    EmptyPortfolio,
    #[error("analysis #{sequence} is still in flight")]
    AlreadyInFlight { sequence: u64 },
}

/// Errors loading or validating client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("endpoint must be an http(s) URL: '{value}'")]
    InvalidEndpoint { value: String },

    #[error("timeout_ms must be greater than zero")]
    InvalidTimeout,

    #[error("environment variable {name} is not a valid number: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}
