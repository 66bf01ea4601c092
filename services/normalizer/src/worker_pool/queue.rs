//! Input queue
//!
//! A single bounded multi-consumer channel shared by every worker. Whichever
//! worker is free takes the next event. Dropping the queue closes it, which
//! is the signal for workers to finish once it is drained.

use crossbeam_channel::Sender;
use tokio::task::JoinHandle;
use tracing::trace;

use shared::RawEvent;

use crate::errors::{PipelineError, Result};

pub struct EventQueue {
    sender: Sender<RawEvent>,
    pushed: usize,
}

impl EventQueue {
    pub(crate) fn new(sender: Sender<RawEvent>) -> Self {
        Self { sender, pushed: 0 }
    }

    /// Enqueue an event, blocking the calling thread while the queue is full.
    ///
    /// Must not be called from an async task; see `feed`.
    pub fn push(&mut self, event: RawEvent) -> Result<()> {
        let event_id = event.id;
        self.sender
            .send(event)
            .map_err(|_| PipelineError::DispatchFailed { event_id })?;

        self.pushed += 1;
        trace!(event_id, "Event queued");
        Ok(())
    }

    /// Close the queue. No event can be pushed afterwards.
    pub fn close(self) -> usize {
        self.pushed
    }

    /// Push every event on the blocking pool, then close the queue.
    ///
    /// Resolves to the number of events pushed.
    pub fn feed(self, events: Vec<RawEvent>) -> JoinHandle<Result<usize>> {
        tokio::task::spawn_blocking(move || {
            let mut queue = self;
            for event in events {
                queue.push(event)?;
            }
            Ok(queue.close())
        })
    }
}
