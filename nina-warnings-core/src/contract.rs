//! # contract: transport seam and error taxonomy
//!
//! This module defines the single trait (`Transport`) the pipeline uses to reach the
//! upstream warning service, together with the error type every fallible operation
//! in this crate returns.
//!
//! ## Interface & Extensibility
//! - [`HttpTransport`](crate::download::HttpTransport) is the production implementation.
//! - Paths handed to [`Transport::get`] are relative to the transport's base endpoint.
//! - Implementations only hand back bodies of successful (2xx) responses.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can serve canned JSON documents
//!   per path without any network.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Every failure the aggregation pipeline can surface.
///
/// A detail document with the wrong info/area cardinality is deliberately not part
/// of this enum: it is logged and reported as "no details".
#[derive(Debug, thiserror::Error)]
pub enum WarnError {
    /// No usable base endpoint; raised before any request is made.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Non-success status or a failed request.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Body is not valid JSON or lacks a required field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A severity, content-type or urgency token outside the known tables.
    #[error("unknown {field} value \"{value}\"")]
    UnrecognizedToken { field: &'static str, value: String },
}

/// Read-only access to the upstream warning service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` relative to the base endpoint and return the response body.
    async fn get(&self, path: &str) -> Result<String, WarnError>;
}
