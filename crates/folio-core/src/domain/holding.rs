use serde::{Deserialize, Serialize};

use crate::draft::FormField;
use crate::{Ticker, ValidationError};

/// A draft portfolio line item.
///
/// Holdings are identified by position in the draft list, so two holdings
/// with the same ticker are independent entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: Ticker,
    pub quantity: f64,
    pub cost_basis: f64,
}

impl Holding {
    pub fn new(ticker: Ticker, quantity: f64, cost_basis: f64) -> Result<Self, ValidationError> {
        validate_positive(FormField::Quantity, quantity)?;
        validate_positive(FormField::CostBasis, cost_basis)?;

        Ok(Self {
            ticker,
            quantity,
            cost_basis,
        })
    }
}

/// Body of the outbound valuation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub holdings: Vec<Holding>,
}

impl AnalysisRequest {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

fn validate_positive(field: FormField, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(())
}
