//! # Folio Core
//!
//! Client-side core of the folio portfolio analyzer.
//!
//! ## Overview
//!
//! A user builds a draft portfolio, submits it to a remote valuation service,
//! and renders the result. This crate owns the three pieces between the
//! keyboard and the screen:
//!
//! - **Draft state**: holdings plus the in-progress form ([`DraftStore`])
//! - **Request lifecycle**: single-flight analysis state machine ([`AnalysisSession`])
//! - **Projection**: payload to summary, chart series and table rows ([`project`])
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Endpoint/timeout configuration (TOML + env) |
//! | [`domain`] | Holdings, tickers and the valuation payload |
//! | [`draft`] | Draft store and its commands |
//! | [`error`] | Validation, draft, session and config errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`projector`] | View model construction |
//! | [`session`] | Analysis lifecycle |
//! | [`valuation`] | Valuation service client and failure messages |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use folio_core::{AnalysisSession, DraftStore, FolioConfig, FormField, ValuationService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ValuationService::from_config(&FolioConfig::load(None)?);
//!
//!     let mut draft = DraftStore::new();
//!     draft.set_form_field(FormField::Ticker, "aapl");
//!     draft.set_form_field(FormField::Quantity, "10");
//!     draft.set_form_field(FormField::CostBasis, "150");
//!     draft.add_holding()?;
//!
//!     let mut session = AnalysisSession::new();
//!     session.submit(&service, draft.snapshot()).await?;
//!
//!     if let Some(view) = session.view_model() {
//!         println!("{}", view.summary.total_value_text());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  snapshot   ┌──────────────────┐   POST   ┌──────────────────┐
//! │   DraftStore    │────────────▶│ AnalysisSession  │─────────▶│ ValuationService │
//! └─────────────────┘             └────────┬─────────┘          │  (HttpClient)    │
//!                                          │ Succeeded          └──────────────────┘
//!                                          ▼
//!                                 ┌──────────────────┐
//!                                 │   project()      │──▶ ViewModel
//!                                 └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Draft and session preconditions fail synchronously with [`DraftError`] and
//! [`SessionError`]. Anything that goes wrong with the call itself ends as
//! [`SessionState::Failed`] carrying the user-facing message; per-holding
//! failures inside a successful payload stay in the table as error rows.

pub mod config;
pub mod domain;
pub mod draft;
pub mod error;
pub mod http_client;
pub mod projector;
pub mod session;
pub mod valuation;

pub use config::FolioConfig;

pub use domain::{
    AnalysisRequest, AnalysisResult, AnalyzedHolding, FailedHolding, Holding, PortfolioSummary,
    Ticker, ValuedHolding, WireSchema, MALFORMED_ENTRY,
};

pub use draft::{DraftCommand, DraftStore, FormDraft, FormField};

pub use error::{ConfigError, DraftError, SessionError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use projector::{
    format_money, project, ChartSeries, FailedRow, SummaryBlock, SummaryConsistency, TableRow,
    ValuedRow, ViewModel, TABLE_HEADERS,
};

pub use session::{AnalysisSession, PendingAnalysis, SessionState, Settlement};

pub use valuation::{settle_response, AnalysisError, AnalysisErrorKind, ValuationService};
