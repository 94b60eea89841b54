//! Draft portfolio state.
//!
//! The [`DraftStore`] owns two independent pieces of state: the list of
//! holdings already added, and the [`FormDraft`] holding the raw text of the
//! entry being typed. Commands touch one or the other; the only coupling is
//! that a successful [`DraftCommand::AddHolding`] clears the form.
//!
//! ```rust
//! use folio_core::{DraftCommand, DraftStore, FormField};
//!
//! let mut store = DraftStore::new();
//! store.set_form_field(FormField::Ticker, "aapl");
//! store.set_form_field(FormField::Quantity, "10");
//! store.set_form_field(FormField::CostBasis, "150");
//! store.apply(DraftCommand::AddHolding).expect("form is complete");
//!
//! assert_eq!(store.holdings()[0].ticker.as_str(), "AAPL");
//! assert!(store.form().is_empty());
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{DraftError, Holding, Ticker, ValidationError};

/// Editable field of the holding form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Ticker,
    Quantity,
    CostBasis,
}

impl FormField {
    pub const ALL: [Self; 3] = [Self::Ticker, Self::Quantity, Self::CostBasis];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Quantity => "quantity",
            Self::CostBasis => "cost_basis",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = DraftError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ticker" => Ok(Self::Ticker),
            "quantity" => Ok(Self::Quantity),
            "cost_basis" => Ok(Self::CostBasis),
            other => Err(DraftError::programming(format!("unknown form field '{other}'"))),
        }
    }
}

/// Raw text of the holding currently being entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub ticker: String,
    pub quantity: String,
    pub cost_basis: String,
}

impl FormDraft {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Ticker => &self.ticker,
            FormField::Quantity => &self.quantity,
            FormField::CostBasis => &self.cost_basis,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Ticker => &mut self.ticker,
            FormField::Quantity => &mut self.quantity,
            FormField::CostBasis => &mut self.cost_basis,
        }
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Validate the form and build the holding it describes.
    ///
    /// Every field must be present; quantity and cost basis must parse to
    /// finite numbers greater than zero.
    pub fn to_holding(&self) -> Result<Holding, ValidationError> {
        if let Some(field) = FormField::ALL
            .iter()
            .copied()
            .find(|field| self.get(*field).is_empty())
        {
            return Err(ValidationError::MissingField { field });
        }

        let ticker = Ticker::parse(&self.ticker)?;
        let quantity = parse_number(FormField::Quantity, &self.quantity)?;
        let cost_basis = parse_number(FormField::CostBasis, &self.cost_basis)?;

        Holding::new(ticker, quantity, cost_basis)
    }
}

fn parse_number(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

/// Command accepted by [`DraftStore::apply`].
///
/// The JSON form is the presentation-layer action object, e.g.
/// `{"type": "SET_FORM_FIELD", "field": "ticker", "value": "aapl"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftCommand {
    SetFormField { field: FormField, value: String },
    AddHolding,
    RemoveHolding { index: usize },
}

impl DraftCommand {
    /// Decode an untyped action. Anything that is not a known command is a
    /// dispatch bug on the caller's side.
    pub fn from_action(action: &Value) -> Result<Self, DraftError> {
        Self::deserialize(action).map_err(|error| DraftError::programming(error.to_string()))
    }
}

/// Holdings list plus the in-progress form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftStore {
    holdings: Vec<Holding>,
    form: FormDraft,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn form(&self) -> &FormDraft {
        &self.form
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Owned copy of the holdings, detached from later edits.
    pub fn snapshot(&self) -> Vec<Holding> {
        self.holdings.clone()
    }

    /// Apply one command. On error the store is left untouched.
    pub fn apply(&mut self, command: DraftCommand) -> Result<(), DraftError> {
        match command {
            DraftCommand::SetFormField { field, value } => {
                self.set_form_field(field, value);
                Ok(())
            }
            DraftCommand::AddHolding => self.add_holding().map(|_| ()).map_err(DraftError::from),
            DraftCommand::RemoveHolding { index } => {
                self.remove_holding(index);
                Ok(())
            }
        }
    }

    /// Decode and apply an untyped action object.
    pub fn dispatch(&mut self, action: &Value) -> Result<(), DraftError> {
        let command = DraftCommand::from_action(action)?;
        self.apply(command)
    }

    pub fn set_form_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.slot(field) = value.into();
        debug!(field = field.as_str(), "form field updated");
    }

    /// Append the holding described by the form and reset the form.
    pub fn add_holding(&mut self) -> Result<&Holding, ValidationError> {
        let holding = self.form.to_holding()?;
        debug!(
            ticker = holding.ticker.as_str(),
            quantity = holding.quantity,
            cost_basis = holding.cost_basis,
            "holding added"
        );
        self.holdings.push(holding);
        self.form = FormDraft::default();
        Ok(&self.holdings[self.holdings.len() - 1])
    }

    /// Remove the holding at `index`. Out-of-range indexes are ignored, since
    /// they come from a list the caller rendered earlier.
    pub fn remove_holding(&mut self, index: usize) -> Option<Holding> {
        if index >= self.holdings.len() {
            debug!(index, len = self.holdings.len(), "remove ignored: index out of range");
            return None;
        }
        let removed = self.holdings.remove(index);
        debug!(index, ticker = removed.ticker.as_str(), "holding removed");
        Some(removed)
    }
}
