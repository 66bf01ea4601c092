//! Worker pool for event normalization
//!
//! This module provides a fixed-size pool of workers that normalize events in
//! parallel. Workers take events from one shared input queue, so a slow event
//! never holds up the events behind it, and share the record and error queues.

mod pool;
mod queue;
mod worker;

// Re-export the main interface
pub use pool::{RunningPool, WorkerPool};
pub use queue::EventQueue;

// Re-export components that might be useful for testing
pub use worker::{Worker, WorkerStats};
