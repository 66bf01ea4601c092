use tokio::task::JoinError;

/// Failures that stop a pipeline run as a whole.
///
/// Per-event, per-market and per-selection problems never surface here;
/// they are collected into the run's `AggregateError` instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to dispatch event {event_id}: input queue closed")]
    DispatchFailed { event_id: i64 },

    #[error("Pipeline task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
