//! # Domain Models
//!
//! Types shared by the draft store, the analysis session and the projector.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Uppercase, non-empty ticker |
//! | [`Holding`] | Draft line item (ticker, quantity, cost basis per share) |
//! | [`AnalysisRequest`] | Snapshot of holdings sent to the valuation service |
//! | [`AnalysisResult`] | Valuation payload: summary plus analyzed holdings |
//! | [`AnalyzedHolding`] | Either a [`ValuedHolding`] or a [`FailedHolding`] |
//! | [`WireSchema`] | Payload contract revision |
//!
//! Draft-side types validate on construction. Payload-side types decode
//! leniently: any JSON document decodes, shape problems become empty
//! sections or failed rows, and missing numbers are defaulted when the view
//! model is built.

mod analysis;
mod holding;
mod ticker;

pub use analysis::{
    AnalysisResult, AnalyzedHolding, FailedHolding, PortfolioSummary, ValuedHolding, WireSchema,
    MALFORMED_ENTRY,
};
pub use holding::{AnalysisRequest, Holding};
pub use ticker::Ticker;
