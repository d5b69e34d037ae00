use crate::{
    auto_traits::TaskResult,
    error::LimiterError,
    pending::Pending,
    state::State,
    task::Task,
};

use futures::future::BoxFuture;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::oneshot;
use tracing::{trace, warn};

pub(crate) struct Ingress<T: TaskResult> {
    task_sender: flume::Sender<Task<T>>,
    state: Arc<State>,
    counter: AtomicU64,
}

impl<T: TaskResult> Ingress<T> {
    pub fn new(state: Arc<State>) -> (Self, flume::Receiver<Task<T>>) {
        let (task_sender, task_receiver) = flume::unbounded();

        (
            Self {
                task_sender,
                state,
                counter: AtomicU64::new(0),
            },
            task_receiver,
        )
    }

    /// Hands a job to the worker without waiting for it to be queued or run.
    pub fn send(&self, job: BoxFuture<'static, T>) -> Pending<T> {
        let (reply, recv) = oneshot::channel();

        let guard = match self.state.enqueue() {
            Ok(guard) => guard,
            Err(error) => {
                if let LimiterError::QueueFull { depth } = error {
                    warn!(depth, "queue is full, rejecting task");
                }

                let _ = reply.send(Err(error));
                return Pending::new(recv);
            }
        };

        let id = self.counter.fetch_add(1, Ordering::Relaxed);

        match self.task_sender.send(Task { id, job, reply }) {
            Ok(()) => trace!(task = id, "task queued"),
            Err(flume::SendError(task)) => {
                self.state.dequeue();
                task.reject(LimiterError::Stopped);
            }
        }

        drop(guard);

        Pending::new(recv)
    }
}
