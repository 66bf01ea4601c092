//! Worker pool management
//!
//! Creates the shared input queue, hands each worker a receiver plus clones
//! of the output senders, and joins the workers once the input queue is
//! closed.

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use shared::{CanonicalMarket, NormalizeError};

use super::queue::EventQueue;
use super::worker::{Worker, WorkerStats};

/// Pool of workers for normalizing events
pub struct WorkerPool {
    workers: Vec<Worker>,
}

/// Workers that have been spawned and not yet joined
pub struct RunningPool {
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl WorkerPool {
    /// Create `worker_count` workers and the input queue that feeds them.
    ///
    /// `worker_count` and `queue_capacity` are clamped to at least one.
    pub fn new(
        worker_count: usize,
        queue_capacity: usize,
        markets: &mpsc::Sender<CanonicalMarket>,
        errors: &mpsc::Sender<NormalizeError>,
    ) -> (Self, EventQueue) {
        let worker_count = worker_count.max(1);
        let (events_tx, events_rx) = crossbeam_channel::bounded(queue_capacity.max(1));

        let workers = (0..worker_count)
            .map(|id| Worker::new(id, events_rx.clone(), markets.clone(), errors.clone()))
            .collect();

        (Self { workers }, EventQueue::new(events_tx))
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Spawn every worker onto the blocking pool
    pub fn start(self) -> RunningPool {
        tracing::debug!("Starting {} workers", self.workers.len());

        let handles = self
            .workers
            .into_iter()
            .map(|worker| tokio::task::spawn_blocking(move || worker.run()))
            .collect();

        RunningPool { handles }
    }
}

impl RunningPool {
    /// Wait for every worker. Returns once all output senders held by
    /// workers have been dropped.
    pub async fn join(self) -> Result<Vec<WorkerStats>, JoinError> {
        join_all(self.handles).await.into_iter().collect()
    }
}
