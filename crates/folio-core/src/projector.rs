//! Render-ready view of an analysis payload.
//!
//! [`project`] never fails: failed holdings become error rows, and missing
//! numbers on valued holdings are shown as zero. The summary block repeats the
//! service's aggregate figures as sent.

use serde::Serialize;

use crate::{AnalysisResult, AnalyzedHolding, PortfolioSummary, ValuedHolding};

/// Column headers of the holdings table.
pub const TABLE_HEADERS: [&str; 6] = [
    "Ticker",
    "Quantity",
    "Current Price",
    "Market Value",
    "Cost Basis",
    "Gain/Loss",
];

/// Aggregate figures shown above the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryBlock {
    pub total_market_value: f64,
    pub total_cost_basis: f64,
    pub total_unrealized_gain_loss: f64,
}

impl SummaryBlock {
    fn from_summary(summary: &PortfolioSummary) -> Self {
        Self {
            total_market_value: summary.total_market_value.unwrap_or(0.0),
            total_cost_basis: summary.total_cost_basis.unwrap_or(0.0),
            total_unrealized_gain_loss: summary.total_unrealized_gain_loss.unwrap_or(0.0),
        }
    }

    pub fn total_value_text(&self) -> String {
        format!("Total Value: {}", format_money(self.total_market_value))
    }

    pub fn gain_loss_text(&self) -> String {
        format!("Total Gain/Loss: {}", format_money(self.total_unrealized_gain_loss))
    }

    pub fn total_cost_text(&self) -> String {
        format!("Total Cost: {}", format_money(self.total_cost_basis))
    }

    /// Summary lines in display order.
    pub fn lines(&self) -> [String; 3] {
        [
            self.total_value_text(),
            self.gain_loss_text(),
            self.total_cost_text(),
        ]
    }
}

/// Market-value slices for the allocation chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn slices(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Table row for a priced holding; absent numbers are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedRow {
    pub ticker: String,
    pub quantity: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub total_cost: f64,
    pub unrealized_gain_loss: f64,
}

impl ValuedRow {
    fn from_holding(holding: &ValuedHolding) -> Self {
        Self {
            ticker: holding.ticker.clone(),
            quantity: holding.quantity.unwrap_or(0.0),
            current_price: holding.current_price.unwrap_or(0.0),
            market_value: holding.market_value.unwrap_or(0.0),
            total_cost: holding.total_cost.unwrap_or(0.0),
            unrealized_gain_loss: holding.unrealized_gain_loss.unwrap_or(0.0),
        }
    }
}

/// Table row for a holding the service could not price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRow {
    pub ticker: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    Valued(ValuedRow),
    Failed(FailedRow),
}

impl TableRow {
    pub fn ticker(&self) -> &str {
        match self {
            Self::Valued(row) => &row.ticker,
            Self::Failed(row) => &row.ticker,
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Display cells. A failed row has two: the ticker and the error message,
    /// which spans the remaining columns.
    pub fn cells(&self) -> Vec<String> {
        match self {
            Self::Valued(row) => vec![
                row.ticker.clone(),
                row.quantity.to_string(),
                format_money(row.current_price),
                format_money(row.market_value),
                format_money(row.total_cost),
                format_money(row.unrealized_gain_loss),
            ],
            Self::Failed(row) => vec![row.ticker.clone(), row.error.clone()],
        }
    }
}

/// Differences between the service's summary and the sum of valued rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryConsistency {
    pub market_value_delta: f64,
    pub cost_basis_delta: f64,
    pub gain_loss_delta: f64,
}

impl SummaryConsistency {
    pub fn is_within(&self, tolerance: f64) -> bool {
        [
            self.market_value_delta,
            self.cost_basis_delta,
            self.gain_loss_delta,
        ]
        .iter()
        .all(|delta| delta.abs() <= tolerance)
    }
}

/// Everything the presentation layer needs for a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub summary: SummaryBlock,
    pub chart: ChartSeries,
    pub rows: Vec<TableRow>,
}

impl ViewModel {
    pub fn failed_rows(&self) -> impl Iterator<Item = &FailedRow> + '_ {
        self.rows.iter().filter_map(|row| match row {
            TableRow::Failed(failed) => Some(failed),
            TableRow::Valued(_) => None,
        })
    }

    /// Compare the summary with the valued rows. Informational only; the
    /// summary itself is never adjusted.
    pub fn consistency(&self) -> SummaryConsistency {
        let (market_value, cost_basis, gain_loss) = self
            .rows
            .iter()
            .filter_map(|row| match row {
                TableRow::Valued(valued) => Some(valued),
                TableRow::Failed(_) => None,
            })
            .fold((0.0, 0.0, 0.0), |(mv, cb, gl), row| {
                (
                    mv + row.market_value,
                    cb + row.total_cost,
                    gl + row.unrealized_gain_loss,
                )
            });

        SummaryConsistency {
            market_value_delta: self.summary.total_market_value - market_value,
            cost_basis_delta: self.summary.total_cost_basis - cost_basis,
            gain_loss_delta: self.summary.total_unrealized_gain_loss - gain_loss,
        }
    }
}

/// Build the view model for `result`.
pub fn project(result: &AnalysisResult) -> ViewModel {
    let mut chart = ChartSeries::default();
    let mut rows = Vec::with_capacity(result.holdings.len());

    for holding in &result.holdings {
        match holding {
            AnalyzedHolding::Valued(valued) => {
                let row = ValuedRow::from_holding(valued);
                chart.labels.push(row.ticker.clone());
                chart.values.push(row.market_value);
                rows.push(TableRow::Valued(row));
            }
            AnalyzedHolding::Failed(failed) => rows.push(TableRow::Failed(FailedRow {
                ticker: failed.ticker.clone(),
                error: failed.error.clone(),
            })),
        }
    }

    ViewModel {
        summary: SummaryBlock::from_summary(&result.portfolio_summary),
        chart,
        rows,
    }
}

/// Dollar amount with two decimals.
pub fn format_money(value: f64) -> String {
    format!("${value:.2}")
}
