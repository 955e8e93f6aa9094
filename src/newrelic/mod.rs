//! NerdGraph integration.
//!
//! Provides the transport trait used to reach NerdGraph, an HTTP
//! implementation, a scripted mock, and the NRQL executor built on top.

mod client;
mod mock;
mod transport;
mod types;

pub use client::NrqlExecutor;
pub use mock::MockTransport;
pub use transport::HttpTransport;
pub use types::{
    GraphQlRequest, MetricOutcome, MetricResult, NerdGraphError, NerdGraphResponse, Row, Value,
};

use async_trait::async_trait;

use crate::error::Result;

/// Default NerdGraph endpoint (US region).
pub const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// Trait for sending a GraphQL document to NerdGraph.
///
/// Implementations must return `Transport` errors when no usable response was
/// received; query-level errors are left in the returned response.
#[async_trait]
pub trait NerdGraphTransport: Send + Sync {
    /// Posts the request and returns the decoded response body.
    async fn post(&self, request: &GraphQlRequest) -> Result<NerdGraphResponse>;
}
