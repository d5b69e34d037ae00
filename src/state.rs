use crate::error::LimiterError;

use std::{
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A snapshot of a [Limiter](crate::Limiter).
///
/// Not guaranteed to be consistent under concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub max_concurrent: usize,
    pub interval: Duration,
    /// Tasks currently running.
    pub active: usize,
    /// Tasks submitted but not yet admitted.
    pub queued: usize,
    /// Drain passes run so far.
    pub passes: u64,
    /// Tasks launched so far.
    pub admitted: u64,
}

pub(crate) struct State {
    slots: Arc<Semaphore>,
    max_concurrent: usize,
    interval: Duration,
    max_queue_depth: Option<usize>,
    queued: AtomicUsize,
    passes: AtomicU64,
    admitted: AtomicU64,
    stopped: RwLock<bool>,
}

impl State {
    pub fn new(max_concurrent: usize, interval: Duration, max_queue_depth: Option<usize>) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            interval,
            max_queue_depth,
            queued: AtomicUsize::new(0),
            passes: AtomicU64::new(0),
            admitted: AtomicU64::new(0),
            stopped: RwLock::new(false),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes a slot if one is free. The slot is returned when the permit drops.
    pub fn try_admit(&self) -> Option<OwnedSemaphorePermit> {
        let permit = self.slots.clone().try_acquire_owned().ok()?;
        self.admitted.fetch_add(1, Ordering::Relaxed);
        Some(permit)
    }

    pub fn active(&self) -> usize {
        self.max_concurrent - self.slots.available_permits()
    }

    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    /// Counts a new submission against the queue, failing if the limiter is stopped or full.
    ///
    /// The limiter cannot stop while the returned guard is held, so a task handed to the worker
    /// under it is always seen by the worker's final cleanup.
    pub fn enqueue(&self) -> Result<RwLockReadGuard<'_, bool>, LimiterError> {
        let stopped = self.stopped.read().unwrap_or_else(PoisonError::into_inner);

        if *stopped {
            return Err(LimiterError::Stopped);
        }

        let max = self.max_queue_depth;

        self.queued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |depth| {
                max.is_none_or(|max| depth < max).then_some(depth + 1)
            })
            .map_err(|depth| LimiterError::QueueFull { depth })?;

        Ok(stopped)
    }

    pub fn dequeue(&self) {
        self.queued.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn record_pass(&self) -> u64 {
        self.passes.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns `true` if this call stopped the limiter.
    pub fn stop(&self) -> bool {
        let mut stopped = self.stopped.write().unwrap_or_else(PoisonError::into_inner);

        !std::mem::replace(&mut *stopped, true)
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            max_concurrent: self.max_concurrent,
            interval: self.interval,
            active: self.active(),
            queued: self.queued(),
            passes: self.passes.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
        }
    }
}
