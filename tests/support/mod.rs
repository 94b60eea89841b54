//! Scripted transport and draft helpers.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use folio_core::{
    DraftStore, FormField, HttpClient, HttpError, HttpRequest, HttpResponse, ValuationService,
};
use tokio::sync::Notify;

pub const ENDPOINT: &str = "http://valuation.test/analyze";

pub const AAPL_SUCCESS: &str = r#"{"portfolio_summary":{"total_market_value":1800,"total_cost_basis":1500,"total_unrealized_gain_loss":300},"holdings":[{"ticker":"AAPL","quantity":10,"current_price":180,"market_value":1800,"total_cost":1500,"unrealized_gain_loss":300}]}"#;

/// Replays scripted responses in order and records every request.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responses are held until `gate` is notified.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(HttpError::new(message)));
        self
    }

    fn push(&self, response: Result<HttpResponse, HttpError>) {
        self.responses
            .lock()
            .expect("response queue should not be poisoned")
            .push_back(response);
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self
            .responses
            .lock()
            .expect("response queue should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::new("no scripted response")));
        let gate = self.gate.clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response
        })
    }
}

pub fn service(client: &Arc<ScriptedHttpClient>) -> ValuationService {
    ValuationService::new(client.clone(), ENDPOINT)
}

/// Fill the form and add one holding.
pub fn add(store: &mut DraftStore, ticker: &str, quantity: &str, cost_basis: &str) {
    store.set_form_field(FormField::Ticker, ticker);
    store.set_form_field(FormField::Quantity, quantity);
    store.set_form_field(FormField::CostBasis, cost_basis);
    store.add_holding().expect("test holding should be valid");
}
