mod builder;

pub use builder::LimiterBuilder;

use crate::{
    auto_traits::{Job, TaskResult},
    ingress::Ingress,
    pending::Pending,
    state::{State, Stats},
    worker::Worker,
};

use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Runs at most `max_concurrent` tasks at a time, admitting queued tasks in submission order
/// once every `interval`.
///
/// Slots freed by finished tasks are only handed out on the next tick. The ticker starts on
/// construction and runs until [Limiter::stop] is called or the limiter is dropped.
pub struct Limiter<T: TaskResult> {
    state: Arc<State>,
    ingress: Ingress<T>,
    worker: Worker,
}

impl<T: TaskResult> Limiter<T> {
    /// Creates a limiter and starts its ticker. Must be called within a tokio runtime.
    ///
    /// # Panics
    ///
    /// If the settings fail [LimiterBuilder::validate], e.g. `max_concurrent` or `interval` is
    /// zero. Use [LimiterBuilder] to get an error instead.
    pub fn new(max_concurrent: usize, interval: Duration) -> Self {
        if let Err(error) = LimiterBuilder::new(max_concurrent, interval).validate() {
            panic!("{error}");
        }

        Self::new_with(max_concurrent, interval, None)
    }

    pub(crate) fn new_with(
        max_concurrent: usize,
        interval: Duration,
        max_queue_depth: Option<usize>,
    ) -> Self {
        let state = Arc::new(State::new(max_concurrent, interval, max_queue_depth));
        let (ingress, task_receiver) = Ingress::new(state.clone());
        let worker = Worker::spawn(state.clone(), task_receiver);

        debug!(max_concurrent, ?interval, ?max_queue_depth, "limiter created");

        Self {
            state,
            ingress,
            worker,
        }
    }

    /// Queues `operation` to be called once a slot is free.
    ///
    /// Returns immediately; the operation is never called before the next tick.
    pub fn submit<F, J>(&self, operation: F) -> Pending<T>
    where
        F: FnOnce() -> J + Send + 'static,
        J: Job<T>,
    {
        self.queue(async move { operation().await })
    }

    /// Queues an already built job. The job is not polled until it is admitted.
    pub fn queue<J: Job<T>>(&self, job: J) -> Pending<T> {
        self.ingress.send(Box::pin(job))
    }

    /// Stops the ticker. Tasks that have not been admitted settle with
    /// [LimiterError::Stopped](crate::LimiterError::Stopped), running tasks run to completion.
    pub fn stop(&self) {
        if self.state.stop() {
            debug!("limiter stopping");
        }

        self.worker.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    pub fn active(&self) -> usize {
        self.state.active()
    }

    pub fn queue_depth(&self) -> usize {
        self.state.queued()
    }

    pub fn stats(&self) -> Stats {
        self.state.stats()
    }
}

impl<T: TaskResult> AsRef<Limiter<T>> for Limiter<T> {
    fn as_ref(&self) -> &Limiter<T> {
        self
    }
}
