//! High-level pipeline: aggregates warning messages across sources.
//!
//! This module provides the top-level orchestration for one aggregation call. It
//!   - Queries each requested source strictly in order, one request at a time
//!   - Drops messages whose identity was already emitted by an earlier source
//!   - Optionally enriches each new message with its detail document
//!   - Hands messages to the caller as a lazy stream, before later sources are queried
//!
//! # Major Types
//! - [`AggregateRequest`]: which sources to query and whether to load details
//! - [`Aggregator`]: owns the transport and produces message streams
//!
//! # Error Handling
//! The first error ends the stream: it is yielded as the final item. Messages yielded
//! before that stay valid. A detail document with an unexpected shape is not an error
//! and only results in a message without details.
//!
//! # Navigation
//! - Main entrypoint: [`Aggregator::messages`]

use std::collections::HashSet;

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use tracing::{debug, info};

use crate::contract::{Transport, WarnError};
use crate::details::fetch_details;
use crate::download::fetch_source;
use crate::model::{MessageId, Source, WarningMessage};

/// Parameters of one aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateRequest {
    /// Sources in query order. Empty means every known source in canonical order.
    pub sources: Vec<Source>,
    pub load_details: bool,
}

impl AggregateRequest {
    pub fn all_sources() -> Self {
        Self::default()
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources = sources.into_iter().collect();
        self
    }

    pub fn with_details(mut self, load_details: bool) -> Self {
        self.load_details = load_details;
        self
    }

    pub fn resolved_sources(&self) -> Vec<Source> {
        if self.sources.is_empty() {
            Source::ALL.to_vec()
        } else {
            self.sources.clone()
        }
    }
}

/// Aggregates messages from the upstream service behind `T`.
///
/// The transport is shared read-only between calls; each call owns its own
/// set of seen identities.
#[derive(Debug, Clone)]
pub struct Aggregator<T> {
    transport: T,
}

impl<T> Aggregator<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts one aggregation call.
    ///
    /// Nothing is requested until the stream is polled. Dropping the stream stops
    /// all further requests.
    pub fn messages(
        &self,
        request: AggregateRequest,
    ) -> impl Stream<Item = Result<WarningMessage, WarnError>> + Send + '_ {
        let sources = request.resolved_sources();
        let load_details = request.load_details;

        try_stream! {
            let mut seen: HashSet<MessageId> = HashSet::new();
            for source in sources {
                let messages = fetch_source(&self.transport, source).await?;
                let mut emitted = 0usize;
                for message in messages {
                    if !seen.insert(message.id().clone()) {
                        debug!(
                            id = %message.id(),
                            source = %source,
                            "Discarding message already seen from an earlier source"
                        );
                        continue;
                    }
                    let message = if load_details {
                        let details = fetch_details(&self.transport, message.id()).await?;
                        message.with_details(details)
                    } else {
                        message
                    };
                    emitted += 1;
                    yield message;
                }
                info!(source = %source, emitted, "Source aggregated");
            }
        }
    }

    /// Drains [`Aggregator::messages`] into a vector, failing on the first error.
    pub async fn collect(
        &self,
        request: AggregateRequest,
    ) -> Result<Vec<WarningMessage>, WarnError> {
        self.messages(request).try_collect().await
    }
}
