use super::Limiter;
use crate::{auto_traits::TaskResult, error::ConfigError};

use std::time::Duration;
use tokio::{sync::Semaphore, time::Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterBuilder {
    pub(crate) max_concurrent: usize,
    pub(crate) interval: Duration,
    pub(crate) max_queue_depth: Option<usize>,
}

impl LimiterBuilder {
    pub fn new(max_concurrent: usize, interval: Duration) -> Self {
        Self {
            max_concurrent,
            interval,
            max_queue_depth: None,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Rejects submissions with [LimiterError::QueueFull](crate::LimiterError::QueueFull) once
    /// `max_queue_depth` tasks are waiting. Unbounded by default.
    pub fn with_max_queue_depth(mut self, max_queue_depth: usize) -> Self {
        self.max_queue_depth = Some(max_queue_depth);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        if self.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(ConfigError::TooManySlots {
                max: Semaphore::MAX_PERMITS,
            });
        }

        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        if Instant::now().checked_add(self.interval).is_none() {
            return Err(ConfigError::IntervalOverflow(self.interval));
        }

        if self.max_queue_depth == Some(0) {
            return Err(ConfigError::ZeroQueueDepth);
        }

        Ok(())
    }

    /// Creates the limiter and starts its ticker. Must be called within a tokio runtime.
    pub fn build<T: TaskResult>(self) -> Result<Limiter<T>, ConfigError> {
        self.validate()?;

        Ok(Limiter::new_with(
            self.max_concurrent,
            self.interval,
            self.max_queue_depth,
        ))
    }
}
