//! Normalization pipeline
//!
//! Decodes the feed, fans events out to the worker pool and fans records and
//! errors back in. Queue lifetimes are owned here:
//! - the input queue is closed only after every event has been pushed
//! - the output queues are closed only after every worker has joined
//! - collectors are awaited last

use std::fmt;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use shared::{AggregateError, CanonicalMarket, EventFeed, NormalizeError, RawEvent};

use crate::aggregator::FanIn;
use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};
use crate::worker_pool::WorkerPool;

/// Phases of a single pipeline run. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Idle,
    Decoding,
    Dispatching,
    Draining,
    Aggregating,
    Done,
}

impl PipelineStage {
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineStage::Idle => Some(PipelineStage::Decoding),
            PipelineStage::Decoding => Some(PipelineStage::Dispatching),
            PipelineStage::Dispatching => Some(PipelineStage::Draining),
            PipelineStage::Draining => Some(PipelineStage::Aggregating),
            PipelineStage::Aggregating => Some(PipelineStage::Done),
            PipelineStage::Done => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

struct StageTracker {
    current: PipelineStage,
    started: Instant,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: PipelineStage::Idle,
            started: Instant::now(),
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.current.next() {
            debug!(
                from = %self.current,
                to = %next,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "Pipeline stage"
            );
            self.current = next;
        }
    }
}

/// Output of one run: every record produced and every unit that was skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub markets: Vec<CanonicalMarket>,
    pub errors: Vec<NormalizeError>,
}

impl NormalizedBatch {
    /// `None` when every unit normalized cleanly
    pub fn error(&self) -> Option<AggregateError> {
        AggregateError::from_errors(self.errors.clone())
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records plus the aggregate error, if any. Records are kept on
    /// partial success.
    pub fn into_parts(self) -> (Vec<CanonicalMarket>, Option<AggregateError>) {
        let error = AggregateError::from_errors(self.errors);
        (self.markets, error)
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        Ok(Self { config })
    }

    /// Decode a feed payload and normalize every event in it.
    ///
    /// Fails only for an undecodable payload or a crashed task; per-unit
    /// failures are returned in the batch.
    pub async fn process(&self, payload: &[u8]) -> Result<NormalizedBatch> {
        let mut stage = StageTracker::new();
        stage.advance();

        let feed: EventFeed = serde_json::from_slice(payload).map_err(|e| {
            warn!(error = %e, payload_bytes = payload.len(), "Failed to decode feed");
            PipelineError::from(e)
        })?;

        self.run_events(feed.events, stage).await
    }

    /// Normalize already-decoded events
    pub async fn run(&self, events: Vec<RawEvent>) -> Result<NormalizedBatch> {
        let mut stage = StageTracker::new();
        stage.advance();
        self.run_events(events, stage).await
    }

    async fn run_events(
        &self,
        events: Vec<RawEvent>,
        mut stage: StageTracker,
    ) -> Result<NormalizedBatch> {
        let event_count = events.len();
        let (input_capacity, output_capacity) = self.queue_capacities(event_count);

        let (markets_tx, markets_rx) = mpsc::channel(output_capacity);
        let (errors_tx, errors_rx) = mpsc::channel(output_capacity);

        let fan_in = FanIn::start(markets_rx, errors_rx);
        let (pool, queue) =
            WorkerPool::new(self.config.worker_count, input_capacity, &markets_tx, &errors_tx);
        let worker_count = pool.worker_count();
        let running = pool.start();

        stage.advance();
        // Resolves once every event is queued and the queue is closed
        let dispatched = queue.feed(events).await?;

        stage.advance();
        let stats = running.join().await?;
        drop(markets_tx);
        drop(errors_tx);

        stage.advance();
        let (markets, errors) = fan_in.finish().await?;
        let dispatched = dispatched?;

        stage.advance();
        info!(
            events = event_count,
            dispatched,
            workers = worker_count,
            busiest_worker_events = stats.iter().map(|s| s.events).max().unwrap_or(0),
            records = markets.len(),
            errors = errors.len(),
            elapsed_ms = stage.started.elapsed().as_millis() as u64,
            "Normalization run completed"
        );

        Ok(NormalizedBatch { markets, errors })
    }

    /// (input queue capacity, output queue capacity)
    fn queue_capacities(&self, event_count: usize) -> (usize, usize) {
        match self.config.channel_buffer_size {
            Some(size) => (size, size),
            None => (event_count.max(1), event_count.max(1)),
        }
    }
}

/// Normalize a feed payload with the default configuration
pub async fn process_markets(payload: &[u8]) -> Result<NormalizedBatch> {
    Pipeline::new(PipelineConfig::default())?.process(payload).await
}
