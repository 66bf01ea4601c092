//! Odds feed normalization
//!
//! Flattens a nested feed of events, markets and selections into one
//! `CanonicalMarket` record per valid selection, using a bounded worker pool.

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod event_normalizer;
pub mod lookup;
pub mod pipeline;
pub mod selection_parser;
pub mod worker_pool;

pub use config::{Config, PipelineConfig};
pub use errors::PipelineError;
pub use event_normalizer::{normalize_event, EventOutcome};
pub use pipeline::{process_markets, NormalizedBatch, Pipeline, PipelineStage};
pub use shared::{AggregateError, BetType, CanonicalMarket, NormalizeError};
