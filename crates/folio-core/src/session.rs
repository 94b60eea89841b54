//! Single-flight analysis lifecycle.
//!
//! ```text
//!          begin()                settle(Ok)
//!   Idle ──────────▶ Loading ─────────────────▶ Succeeded
//!                      │  ▲                        │
//!                      │  └──────── begin() ───────┤
//!                      │  settle(Err)              │
//!                      └─────────────────▶ Failed ◀┘ (via Loading)
//! ```
//!
//! A request is started with [`AnalysisSession::begin`], which checks the
//! preconditions, moves to [`SessionState::Loading`] and hands back a
//! [`PendingAnalysis`] ticket. The outcome is fed back with
//! [`AnalysisSession::settle`]. Every ticket carries a sequence number and a
//! settlement is only applied when it matches the session's current one.
//! [`AnalysisSession::submit`] composes both around the outbound call.

use tracing::{info, warn};
use uuid::Uuid;

use crate::projector::{project, ViewModel};
use crate::valuation::{AnalysisError, ValuationService};
use crate::{AnalysisRequest, AnalysisResult, Holding, SessionError};

/// Outcome of one analysis call.
pub type Settlement = Result<AnalysisResult, AnalysisError>;

/// Observable lifecycle state. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl SessionState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Ticket for the request currently in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnalysis {
    sequence: u64,
    request_id: Uuid,
    request: AnalysisRequest,
}

impl PendingAnalysis {
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub fn into_request(self) -> AnalysisRequest {
        self.request
    }
}

/// Owner of the one [`SessionState`] for a client.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: SessionState,
    sequence: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Sequence number of the most recently started request (0 before any).
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// View model of the last successful analysis, if the session holds one.
    pub fn view_model(&self) -> Option<ViewModel> {
        self.state.result().map(project)
    }

    /// Start a request for `holdings`.
    ///
    /// Rejects an empty snapshot and any attempt to start while a request is
    /// still in flight; neither rejection touches the state.
    pub fn begin(&mut self, holdings: Vec<Holding>) -> Result<PendingAnalysis, SessionError> {
        if holdings.is_empty() {
            return Err(SessionError::EmptyPortfolio);
        }
        if self.state.is_loading() {
            warn!(sequence = self.sequence, "analysis rejected: request already in flight");
            return Err(SessionError::AlreadyInFlight {
                sequence: self.sequence,
            });
        }

        self.sequence += 1;
        self.state = SessionState::Loading;

        let pending = PendingAnalysis {
            sequence: self.sequence,
            request_id: Uuid::new_v4(),
            request: AnalysisRequest::new(holdings),
        };
        info!(
            sequence = pending.sequence,
            request_id = %pending.request_id,
            holdings = pending.request.len(),
            "analysis started"
        );
        Ok(pending)
    }

    /// Apply the outcome of request `sequence`. Returns `false` and leaves the
    /// state alone when the settlement is stale.
    pub fn settle(&mut self, sequence: u64, settlement: Settlement) -> bool {
        if sequence != self.sequence || !self.state.is_loading() {
            warn!(
                sequence,
                current = self.sequence,
                "discarding stale analysis settlement"
            );
            return false;
        }

        self.state = match settlement {
            Ok(result) => {
                info!(
                    sequence,
                    holdings = result.holdings.len(),
                    failed = result.failed_count(),
                    schema = %result.schema(),
                    "analysis succeeded"
                );
                SessionState::Succeeded(result)
            }
            Err(error) => {
                warn!(sequence, code = error.code(), error = %error.message(), "analysis failed");
                SessionState::Failed(error.message().to_string())
            }
        };
        true
    }

    /// Start a request, await the service, and settle.
    pub async fn submit(
        &mut self,
        service: &ValuationService,
        holdings: Vec<Holding>,
    ) -> Result<&SessionState, SessionError> {
        let pending = self.begin(holdings)?;
        let settlement = service.analyze(pending.request()).await;
        self.settle(pending.sequence(), settlement);
        Ok(&self.state)
    }
}
