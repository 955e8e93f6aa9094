//! Mock NerdGraph transport for testing.
//!
//! Replays scripted responses in order and records every request it receives.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::types::{GraphQlRequest, NerdGraphResponse};
use super::NerdGraphTransport;
use crate::error::{NewRelicError, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Body(String),
    Failure(String),
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Scripted>,
    fallback: Option<Scripted>,
    requests: Vec<GraphQlRequest>,
}

/// A transport that answers from a script instead of the network.
///
/// Clones share state, so a test can keep one handle for inspection while the
/// executor owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a mock with an empty script. Unscripted calls return no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers every call with the given rows.
    pub fn with_results(results: serde_json::Value) -> Self {
        let mock = Self::new();
        mock.set_fallback(Scripted::Body(results_body(results)));
        mock
    }

    /// Queues a successful response whose `nrql.results` is `results`.
    pub fn push_results(&self, results: serde_json::Value) -> &Self {
        self.push(Scripted::Body(results_body(results)))
    }

    /// Queues a response carrying NerdGraph errors with the given messages.
    pub fn push_errors(&self, messages: &[&str]) -> &Self {
        let errors: Vec<_> = messages
            .iter()
            .map(|m| serde_json::json!({ "message": m }))
            .collect();
        self.push(Scripted::Body(
            serde_json::json!({ "errors": errors }).to_string(),
        ))
    }

    /// Queues a raw response body.
    pub fn push_body(&self, body: serde_json::Value) -> &Self {
        self.push(Scripted::Body(body.to_string()))
    }

    /// Queues a transport failure (no response received).
    pub fn push_failure(&self, cause: impl Into<String>) -> &Self {
        self.push(Scripted::Failure(cause.into()))
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn push(&self, entry: Scripted) -> &Self {
        self.lock().script.push_back(entry);
        self
    }

    fn set_fallback(&self, entry: Scripted) {
        self.lock().fallback = Some(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn results_body(results: serde_json::Value) -> String {
    serde_json::json!({
        "data": { "actor": { "account": { "nrql": { "results": results } } } }
    })
    .to_string()
}

#[async_trait]
impl NerdGraphTransport for MockTransport {
    async fn post(&self, request: &GraphQlRequest) -> Result<NerdGraphResponse> {
        let next = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            state.script.pop_front().or_else(|| state.fallback.clone())
        };

        match next {
            Some(Scripted::Body(body)) => serde_json::from_str(&body)
                .map_err(|e| NewRelicError::transport(format!("invalid response body: {e}"))),
            Some(Scripted::Failure(cause)) => Err(NewRelicError::transport(cause)),
            None => Ok(NerdGraphResponse::default()),
        }
    }
}
