//! Client for the remote valuation service.
//!
//! The service accepts `POST {endpoint}` with a JSON [`AnalysisRequest`] and
//! answers with an [`AnalysisResult`]. Every way the exchange can go wrong is
//! folded into a single [`AnalysisError`] whose [`message`](AnalysisError::message)
//! is what the user sees.
//!
//! # Failure messages
//!
//! | Condition | Message |
//! |-----------|---------|
//! | No response | transport message (`request timeout: ...`, `connection failed: ...`) |
//! | Non-2xx with `{"message": ...}` | the `message` field |
//! | Non-2xx with `{"error": ...}` | the `error` field |
//! | Non-2xx otherwise | `HTTP error! Status: {status}` |
//! | 2xx with a body that is not JSON | `malformed analysis response: ...` |
//!
//! Any 2xx JSON body succeeds; shape problems inside it are left to the
//! projector, which degrades them row by row.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde_json::Value;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{AnalysisRequest, AnalysisResult, FolioConfig};

/// Classification of a failed analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    Transport,
    Http,
    MalformedResponse,
}

/// A failed analysis call, normalized to one user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    kind: AnalysisErrorKind,
    message: String,
    status: Option<u16>,
}

impl AnalysisError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: AnalysisErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: AnalysisErrorKind::Http,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: AnalysisErrorKind::MalformedResponse,
            message: message.into(),
            status: None,
        }
    }

    /// Build an HTTP error from a non-2xx response, preferring the
    /// service's own explanation over a status-derived one.
    pub fn from_status(response: &HttpResponse) -> Self {
        let message = structured_error_message(&response.body)
            .unwrap_or_else(|| format!("HTTP error! Status: {}", response.status));
        Self::http(response.status, message)
    }

    pub const fn kind(&self) -> AnalysisErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            AnalysisErrorKind::Transport => "analysis.transport",
            AnalysisErrorKind::Http => "analysis.http",
            AnalysisErrorKind::MalformedResponse => "analysis.malformed_response",
        }
    }
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for AnalysisError {}

fn structured_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        parsed
            .get(key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
    })
}

/// Turn a completed HTTP exchange into a settlement.
pub fn settle_response(response: HttpResponse) -> Result<AnalysisResult, AnalysisError> {
    if !response.is_success() {
        return Err(AnalysisError::from_status(&response));
    }

    AnalysisResult::from_json(&response.body)
        .map_err(|e| AnalysisError::malformed(format!("malformed analysis response: {e}")))
}

/// Endpoint-bound client for the valuation service.
#[derive(Clone)]
pub struct ValuationService {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    timeout_ms: u64,
}

impl ValuationService {
    pub fn new(http_client: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            timeout_ms: 5_000,
        }
    }

    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(
            Arc::new(ReqwestHttpClient::new(&config.user_agent)),
            config.endpoint.clone(),
        )
        .with_timeout_ms(config.timeout_ms)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Submit one snapshot for valuation.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let body = serde_json::to_string(request)
            .map_err(|e| AnalysisError::transport(format!("failed to encode request: {e}")))?;

        let request = HttpRequest::post_json(&self.endpoint, body).with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AnalysisError::transport(e.message()))?;

        settle_response(response)
    }

    /// Fetch the banner served at the service root.
    pub async fn ping(&self) -> Result<String, AnalysisError> {
        let request =
            HttpRequest::get(service_root(&self.endpoint)).with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AnalysisError::transport(e.message()))?;

        if !response.is_success() {
            return Err(AnalysisError::from_status(&response));
        }
        Ok(response.body)
    }
}

impl std::fmt::Debug for ValuationService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuationService")
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

/// `scheme://host[:port]/` part of an endpoint URL.
fn service_root(endpoint: &str) -> String {
    let authority_start = endpoint.find("://").map(|i| i + 3).unwrap_or(0);
    match endpoint[authority_start..].find('/') {
        Some(path_start) => format!("{}/", &endpoint[..authority_start + path_start]),
        None => format!("{endpoint}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_wins_over_status() {
        let error = AnalysisError::from_status(&HttpResponse::new(
            503,
            r#"{"message":"valuation service unavailable"}"#,
        ));

        assert_eq!(error.kind(), AnalysisErrorKind::Http);
        assert_eq!(error.status(), Some(503));
        assert_eq!(error.message(), "valuation service unavailable");
    }

    #[test]
    fn service_error_field_is_second_choice() {
        let error = AnalysisError::from_status(&HttpResponse::new(
            400,
            r#"{"error":"Missing 'holdings' in request"}"#,
        ));
        assert_eq!(error.message(), "Missing 'holdings' in request");
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let error = AnalysisError::from_status(&HttpResponse::new(502, "<html>bad gateway</html>"));
        assert_eq!(error.message(), "HTTP error! Status: 502");
    }

    #[test]
    fn blank_message_falls_back_to_status() {
        let error = AnalysisError::from_status(&HttpResponse::new(500, r#"{"message":"  "}"#));
        assert_eq!(error.message(), "HTTP error! Status: 500");
    }

    #[test]
    fn success_with_non_json_body_is_malformed() {
        let error = settle_response(HttpResponse::ok_json("<html></html>")).expect_err("must fail");
        assert_eq!(error.kind(), AnalysisErrorKind::MalformedResponse);
        assert!(error.message().starts_with("malformed analysis response"));
    }

    #[test]
    fn success_with_partial_shape_still_settles_ok() {
        let result = settle_response(HttpResponse::ok_json(
            r#"{"portfolio_summary":null,"holdings":[{"ticker":"AAPL","market_value":1800},null]}"#,
        ))
        .expect("json body settles ok");

        assert_eq!(result.holdings.len(), 2);
        assert_eq!(result.holdings[0].ticker(), "AAPL");
        assert!(result.holdings[1].is_failed());
    }

    #[test]
    fn service_root_strips_path() {
        assert_eq!(
            service_root("http://127.0.0.1:5000/analyze"),
            "http://127.0.0.1:5000/"
        );
        assert_eq!(service_root("https://val.example"), "https://val.example/");
    }
}
