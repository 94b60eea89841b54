use std::fmt::{Display, Formatter};

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error text for a holdings entry that is not a JSON object.
pub const MALFORMED_ENTRY: &str = "malformed holding entry";

/// Revision of the valuation payload contract.
///
/// `V1Flat` payloads carry only valued holdings. `V2ErrorTolerant` payloads may
/// tag individual holdings with an `error`. Decoding always follows the V2
/// rules, which accept every V1 payload unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireSchema {
    V1Flat,
    V2ErrorTolerant,
}

impl WireSchema {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1Flat => "v1_flat",
            Self::V2ErrorTolerant => "v2_error_tolerant",
        }
    }
}

impl Display for WireSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-reported aggregate figures.
///
/// Fields that are absent or non-numeric decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_market_value: Option<f64>,
    pub total_cost_basis: Option<f64>,
    pub total_unrealized_gain_loss: Option<f64>,
}

impl PortfolioSummary {
    fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        Self {
            total_market_value: number_field(object, "total_market_value"),
            total_cost_basis: number_field(object, "total_cost_basis"),
            total_unrealized_gain_loss: number_field(object, "total_unrealized_gain_loss"),
        }
    }
}

/// A holding the service managed to price.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuedHolding {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrealized_gain_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_basis_per_share: Option<f64>,
}

/// A holding the service could not price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedHolding {
    pub ticker: String,
    pub error: String,
}

/// One entry of the analyzed holdings list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyzedHolding {
    Valued(ValuedHolding),
    Failed(FailedHolding),
}

impl AnalyzedHolding {
    pub fn ticker(&self) -> &str {
        match self {
            Self::Valued(valued) => &valued.ticker,
            Self::Failed(failed) => &failed.ticker,
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn as_valued(&self) -> Option<&ValuedHolding> {
        match self {
            Self::Valued(valued) => Some(valued),
            Self::Failed(_) => None,
        }
    }

    /// Decode one holding entry. An entry that is not an object becomes a
    /// failed row so the rest of the payload still renders.
    fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self::from_object(object),
            None => Self::Failed(FailedHolding {
                ticker: String::new(),
                error: MALFORMED_ENTRY.to_string(),
            }),
        }
    }

    /// A present, non-blank `error` selects the failed variant; everything
    /// else is read leniently as a valued holding.
    fn from_object(object: &Map<String, Value>) -> Self {
        let ticker = object
            .get("ticker")
            .map(value_text)
            .unwrap_or_default();

        match object.get("error").map(value_text) {
            Some(error) if !error.trim().is_empty() => {
                Self::Failed(FailedHolding { ticker, error })
            }
            _ => Self::Valued(ValuedHolding {
                ticker,
                quantity: number_field(object, "quantity"),
                current_price: number_field(object, "current_price"),
                market_value: number_field(object, "market_value"),
                total_cost: number_field(object, "total_cost"),
                unrealized_gain_loss: number_field(object, "unrealized_gain_loss"),
                cost_basis_per_share: number_field(object, "cost_basis_per_share"),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for AnalyzedHolding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Successful valuation payload.
///
/// Any JSON document decodes. A missing, `null` or mistyped
/// `portfolio_summary` reads as an empty summary and a missing or mistyped
/// `holdings` as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub portfolio_summary: PortfolioSummary,
    pub holdings: Vec<AnalyzedHolding>,
}

impl<'de> Deserialize<'de> for AnalysisResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl AnalysisResult {
    /// Fails only when `body` is not JSON.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn from_value(value: &Value) -> Self {
        let portfolio_summary = value
            .get("portfolio_summary")
            .map(PortfolioSummary::from_value)
            .unwrap_or_default();
        let holdings = value
            .get("holdings")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(AnalyzedHolding::from_value).collect())
            .unwrap_or_default();

        Self {
            portfolio_summary,
            holdings,
        }
    }

    /// Schema revision this payload actually exercises.
    pub fn schema(&self) -> WireSchema {
        if self.holdings.iter().any(AnalyzedHolding::is_failed) {
            WireSchema::V2ErrorTolerant
        } else {
            WireSchema::V1Flat
        }
    }

    pub fn failed_count(&self) -> usize {
        self.holdings.iter().filter(|h| h.is_failed()).count()
    }
}

fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).and_then(Value::as_f64)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_key_selects_failed_variant() {
        let holding: AnalyzedHolding =
            serde_json::from_str(r#"{"ticker":"ZZZZ","error":"Price not found"}"#)
                .expect("decodes");

        assert_eq!(
            holding,
            AnalyzedHolding::Failed(FailedHolding {
                ticker: String::from("ZZZZ"),
                error: String::from("Price not found"),
            })
        );
    }

    #[test]
    fn null_error_is_treated_as_valued() {
        let holding: AnalyzedHolding =
            serde_json::from_str(r#"{"ticker":"IBM","error":null,"market_value":10}"#)
                .expect("decodes");

        let valued = holding.as_valued().expect("valued holding");
        assert_eq!(valued.market_value, Some(10.0));
    }

    #[test]
    fn non_numeric_fields_decode_as_missing() {
        let holding: AnalyzedHolding = serde_json::from_str(
            r#"{"ticker":"AAPL","quantity":"ten","current_price":null,"market_value":1800}"#,
        )
        .expect("decodes");

        let valued = holding.as_valued().expect("valued holding");
        assert_eq!(valued.quantity, None);
        assert_eq!(valued.current_price, None);
        assert_eq!(valued.market_value, Some(1800.0));
        assert_eq!(valued.total_cost, None);
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let result = AnalysisResult::from_json(
            r#"{"portfolio_summary":{"total_market_value":"n/a"},"holdings":[]}"#,
        )
        .expect("decodes");

        assert_eq!(result.portfolio_summary, PortfolioSummary::default());
    }

    #[test]
    fn schema_reports_error_tolerant_payloads() {
        let flat = AnalysisResult::from_json(r#"{"holdings":[{"ticker":"A","market_value":1}]}"#)
            .expect("decodes");
        let tolerant = AnalysisResult::from_json(
            r#"{"holdings":[{"ticker":"A","market_value":1},{"ticker":"B","error":"x"}]}"#,
        )
        .expect("decodes");

        assert_eq!(flat.schema(), WireSchema::V1Flat);
        assert_eq!(tolerant.schema(), WireSchema::V2ErrorTolerant);
        assert_eq!(tolerant.failed_count(), 1);
    }

    #[test]
    fn blank_error_is_treated_as_valued() {
        let holding: AnalyzedHolding =
            serde_json::from_str(r#"{"ticker":"IBM","error":"","market_value":10}"#)
                .expect("decodes");

        assert!(!holding.is_failed());
    }

    #[test]
    fn non_object_entry_becomes_failed_row() {
        let result = AnalysisResult::from_json(
            r#"{"holdings":[{"ticker":"A","market_value":1},null,7]}"#,
        )
        .expect("decodes");

        assert_eq!(result.holdings.len(), 3);
        assert!(!result.holdings[0].is_failed());
        assert_eq!(
            result.holdings[1],
            AnalyzedHolding::Failed(FailedHolding {
                ticker: String::new(),
                error: String::from(MALFORMED_ENTRY),
            })
        );
        assert_eq!(result.failed_count(), 2);
    }

    #[test]
    fn null_or_mistyped_sections_read_as_empty() {
        let result =
            AnalysisResult::from_json(r#"{"portfolio_summary":null,"holdings":null}"#)
                .expect("decodes");
        assert_eq!(result, AnalysisResult::default());

        let result = AnalysisResult::from_json(r#"{"portfolio_summary":[],"holdings":{}}"#)
            .expect("decodes");
        assert_eq!(result, AnalysisResult::default());

        assert_eq!(
            AnalysisResult::from_json("[1, 2, 3]").expect("decodes"),
            AnalysisResult::default()
        );
    }

    #[test]
    fn non_json_body_is_rejected() {
        assert!(AnalysisResult::from_json("not json").is_err());
        assert!(AnalysisResult::from_json("").is_err());
    }
}
