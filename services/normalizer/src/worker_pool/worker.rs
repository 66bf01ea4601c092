//! Individual worker implementation
//!
//! Takes events from the shared input queue until it is closed and drained,
//! and forwards every record and error to the shared output queues.
//! Normalization is CPU-bound, so workers run on the blocking pool.

use crossbeam_channel::Receiver;
use tokio::sync::mpsc;
use tracing::{debug, error, info_span};

use shared::{CanonicalMarket, NormalizeError, RawEvent};

use crate::event_normalizer::normalize_event;

/// Counters reported by a worker when it stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub worker_id: usize,
    pub events: usize,
    pub records: usize,
    pub errors: usize,
}

pub struct Worker {
    pub id: usize,
    events: Receiver<RawEvent>,
    markets: mpsc::Sender<CanonicalMarket>,
    errors: mpsc::Sender<NormalizeError>,
}

impl Worker {
    pub fn new(
        id: usize,
        events: Receiver<RawEvent>,
        markets: mpsc::Sender<CanonicalMarket>,
        errors: mpsc::Sender<NormalizeError>,
    ) -> Self {
        Self {
            id,
            events,
            markets,
            errors,
        }
    }

    /// Run until the input queue is closed and empty.
    ///
    /// Blocks the calling thread. The worker's output senders are dropped
    /// when this returns.
    pub fn run(self) -> WorkerStats {
        let span = info_span!("worker", worker_id = self.id);
        let _enter = span.enter();

        debug!("Worker started");
        let mut stats = WorkerStats {
            worker_id: self.id,
            ..WorkerStats::default()
        };

        while let Ok(event) = self.events.recv() {
            stats.events += 1;
            metrics::counter!("normalizer_events_total").increment(1);

            let outcome = normalize_event(&event);

            for market in outcome.markets {
                if self.markets.blocking_send(market).is_err() {
                    error!(event_id = event.id, "Record queue closed, stopping worker");
                    return stats;
                }
                stats.records += 1;
                metrics::counter!("normalizer_records_total").increment(1);
            }

            for err in outcome.errors {
                let code = err.code();
                if self.errors.blocking_send(err).is_err() {
                    error!(event_id = event.id, "Error queue closed, stopping worker");
                    return stats;
                }
                stats.errors += 1;
                metrics::counter!("normalizer_errors_total", "code" => code).increment(1);
            }
        }

        debug!(
            events = stats.events,
            records = stats.records,
            errors = stats.errors,
            "Worker stopped"
        );
        stats
    }
}
