use std::path::Path;

use folio_core::{
    AnalysisSession, DraftCommand, DraftStore, FormField, SessionState, ValuationService,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

/// One holding as typed by the user: raw strings, validated by the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct RawHolding {
    #[serde(default, deserialize_with = "text_or_number")]
    ticker: String,
    #[serde(default, deserialize_with = "text_or_number")]
    quantity: String,
    #[serde(default, deserialize_with = "text_or_number")]
    cost_basis: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HoldingsFile {
    List(Vec<RawHolding>),
    Wrapped { holdings: Vec<RawHolding> },
}

impl HoldingsFile {
    fn into_holdings(self) -> Vec<RawHolding> {
        match self {
            Self::List(holdings) | Self::Wrapped { holdings } => holdings,
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub async fn run(
    args: &AnalyzeArgs,
    service: &ValuationService,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let store = build_draft(args)?;

    let mut session = AnalysisSession::new();
    match session.submit(service, store.snapshot()).await? {
        SessionState::Failed(message) => Err(CliError::AnalysisFailed(message.clone())),
        _ => match session.view_model() {
            Some(view) => output::render_view(&view, format, pretty),
            None => Err(CliError::Command(format!(
                "analysis ended in state '{}'",
                session.state().label()
            ))),
        },
    }
}

fn build_draft(args: &AnalyzeArgs) -> Result<DraftStore, CliError> {
    let mut raw = match &args.file {
        Some(path) => read_holdings_file(path)?,
        None => Vec::new(),
    };
    for spec in &args.holdings {
        raw.push(parse_holding_spec(spec)?);
    }

    let mut store = DraftStore::new();
    for (index, holding) in raw.into_iter().enumerate() {
        add_raw(&mut store, holding).inspect_err(|error| {
            warn!(index, error = %error, "holding rejected");
        })?;
    }
    Ok(store)
}

/// Enter one holding through the same commands a form would issue.
fn add_raw(store: &mut DraftStore, raw: RawHolding) -> Result<(), CliError> {
    store.apply(DraftCommand::SetFormField {
        field: FormField::Ticker,
        value: raw.ticker,
    })?;
    store.apply(DraftCommand::SetFormField {
        field: FormField::Quantity,
        value: raw.quantity,
    })?;
    store.apply(DraftCommand::SetFormField {
        field: FormField::CostBasis,
        value: raw.cost_basis,
    })?;
    store.apply(DraftCommand::AddHolding)?;
    Ok(())
}

fn parse_holding_spec(spec: &str) -> Result<RawHolding, CliError> {
    let parts: Vec<&str> = spec.split(':').collect();
    match parts.as_slice() {
        [ticker, quantity, cost_basis] => Ok(RawHolding {
            ticker: (*ticker).to_string(),
            quantity: (*quantity).to_string(),
            cost_basis: (*cost_basis).to_string(),
        }),
        _ => Err(CliError::Command(format!(
            "holding '{spec}' must be TICKER:QUANTITY:COST_BASIS"
        ))),
    }
}

fn read_holdings_file(path: &Path) -> Result<Vec<RawHolding>, CliError> {
    let content = std::fs::read_to_string(path)?;
    let file: HoldingsFile = serde_json::from_str(&content)?;
    Ok(file.into_holdings())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use folio_core::{DraftError, ValidationError};

    use super::*;

    fn args(holdings: &[&str], file: Option<PathBuf>) -> AnalyzeArgs {
        AnalyzeArgs {
            holdings: holdings.iter().map(|h| h.to_string()).collect(),
            file,
        }
    }

    #[test]
    fn holding_specs_become_normalized_draft_entries() {
        let store = build_draft(&args(&["aapl:10:150", " msft :2.5: 310 "], None))
            .expect("valid specs");

        let tickers: Vec<&str> = store.holdings().iter().map(|h| h.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(store.holdings()[1].quantity, 2.5);
        assert!(store.form().is_empty());
    }

    #[test]
    fn malformed_spec_is_a_command_error() {
        let err = build_draft(&args(&["AAPL:10"], None)).expect_err("must fail");
        assert!(matches!(err, CliError::Command(_)));
    }

    #[test]
    fn non_numeric_quantity_is_a_validation_error() {
        let err = build_draft(&args(&["AAPL:ten:150"], None)).expect_err("must fail");
        assert!(matches!(
            err,
            CliError::Draft(DraftError::Validation(ValidationError::NotANumber { .. }))
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn file_accepts_array_or_wrapped_object_with_numbers_or_strings() {
        let mut list = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            list,
            r#"[{{"ticker":"aapl","quantity":10,"cost_basis":"150"}}]"#
        )
        .expect("write");
        let mut wrapped = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            wrapped,
            r#"{{"holdings":[{{"ticker":"VOO","quantity":"3","cost_basis":410.25}}]}}"#
        )
        .expect("write");

        let from_list = build_draft(&args(&[], Some(list.path().to_path_buf()))).expect("list");
        let from_wrapped =
            build_draft(&args(&["MSFT:1:2"], Some(wrapped.path().to_path_buf()))).expect("wrapped");

        assert_eq!(from_list.holdings()[0].ticker.as_str(), "AAPL");
        assert_eq!(from_list.holdings()[0].cost_basis, 150.0);
        assert_eq!(from_wrapped.holdings().len(), 2);
        assert_eq!(from_wrapped.holdings()[0].cost_basis, 410.25);
    }

    #[test]
    fn file_entry_missing_a_field_reports_that_field() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"ticker":"AAPL","cost_basis":1}}]"#).expect("write");

        let err = build_draft(&args(&[], Some(file.path().to_path_buf()))).expect_err("must fail");

        assert!(matches!(
            err,
            CliError::Draft(DraftError::Validation(ValidationError::MissingField {
                field: FormField::Quantity
            }))
        ));
    }
}
