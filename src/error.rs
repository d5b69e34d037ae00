use std::time::Duration;
use thiserror::Error;

/// Outcomes of a submission that originate from the limiter rather than from the operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LimiterError {
    /// The limiter was stopped before the task was admitted.
    #[error("limiter has been stopped")]
    Stopped,

    /// The configured maximum queue depth was reached.
    #[error("queue is full ({depth} tasks waiting)")]
    QueueFull { depth: usize },

    /// The task was admitted but never produced a value, e.g. the operation panicked.
    #[error("task was abandoned before it settled")]
    Abandoned,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_concurrent must be at least 1")]
    ZeroConcurrency,

    #[error("max_concurrent must be at most {max}")]
    TooManySlots { max: usize },

    #[error("interval must be non-zero")]
    ZeroInterval,

    #[error("interval of {0:?} is too long to schedule")]
    IntervalOverflow(Duration),

    #[error("max_queue_depth must be at least 1 when set")]
    ZeroQueueDepth,

    #[error("missing environment variable {0}")]
    Missing(String),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
