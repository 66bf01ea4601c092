//! Fan-in of worker output
//!
//! Two collector tasks, one per output queue. Each appends items in arrival
//! order and finishes once its queue is closed and empty.

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use shared::{CanonicalMarket, NormalizeError};

pub struct FanIn {
    markets: JoinHandle<Vec<CanonicalMarket>>,
    errors: JoinHandle<Vec<NormalizeError>>,
}

impl FanIn {
    pub fn start(
        markets: mpsc::Receiver<CanonicalMarket>,
        errors: mpsc::Receiver<NormalizeError>,
    ) -> Self {
        Self {
            markets: spawn_collector("markets", markets),
            errors: spawn_collector("errors", errors),
        }
    }

    /// Wait for both collectors. Only returns after every sender of both
    /// queues has been dropped.
    pub async fn finish(self) -> Result<(Vec<CanonicalMarket>, Vec<NormalizeError>), JoinError> {
        let (markets, errors) = tokio::join!(self.markets, self.errors);
        Ok((markets?, errors?))
    }
}

fn spawn_collector<T: Send + 'static>(
    queue: &'static str,
    mut receiver: mpsc::Receiver<T>,
) -> JoinHandle<Vec<T>> {
    tokio::spawn(async move {
        let mut collected = Vec::new();
        while let Some(item) = receiver.recv().await {
            collected.push(item);
        }
        debug!(queue, collected = collected.len(), "Collector drained");
        collected
    })
}
