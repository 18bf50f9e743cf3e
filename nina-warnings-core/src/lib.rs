#![doc = "nina-warnings-core: core logic library for nina-warnings."]

//! This crate contains the aggregation pipeline for the federal warning feeds:
//! field adaptation, per-source fetching, detail enrichment and the
//! cross-source, de-duplicating aggregator.
//!
//! # Usage
//! Construct an [`download::HttpTransport`] (or any [`contract::Transport`]),
//! wrap it in an [`aggregate::Aggregator`] and consume the message stream.
//! Presentation and config-file handling live in the `nina-warnings` crate.

pub mod adapter;
pub mod aggregate;
pub mod config;
pub mod contract;
pub mod details;
pub mod download;
pub mod model;

pub use aggregate::{AggregateRequest, Aggregator};
pub use contract::{Transport, WarnError};
pub use model::{MessageId, Source, WarningMessage, WarningMessageDetails};
