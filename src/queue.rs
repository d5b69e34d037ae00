use crate::{auto_traits::TaskResult, error::LimiterError, state::State, task::Task};

use std::{collections::VecDeque, sync::Arc};
use tokio::sync::OwnedSemaphorePermit;
use tracing::trace;

/// FIFO of tasks waiting for a slot. Owned by the worker.
pub(crate) struct Queue<T> {
    tasks: VecDeque<Task<T>>,
    state: Arc<State>,
}

impl<T: TaskResult> Queue<T> {
    pub fn new(state: Arc<State>) -> Self {
        Self {
            tasks: VecDeque::new(),
            state,
        }
    }

    pub fn push(&mut self, task: Task<T>) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Launches queued tasks from the head while slots are free.
    ///
    /// A slot is taken before the head is popped, so a task only leaves the queue to run.
    pub fn drain(&mut self) -> usize {
        let mut admitted = 0;

        while !self.tasks.is_empty() {
            let Some(permit) = self.state.try_admit() else {
                break;
            };
            let Some(task) = self.tasks.pop_front() else {
                break;
            };

            self.state.dequeue();
            launch(task, permit);
            admitted += 1;
        }

        admitted
    }

    /// Settles every waiting task with [LimiterError::Stopped].
    pub fn close(&mut self) -> usize {
        let closed = self.tasks.len();

        for task in self.tasks.drain(..) {
            self.state.dequeue();
            task.reject(LimiterError::Stopped);
        }

        closed
    }

    #[cfg(test)]
    fn ids(&self) -> Vec<u64> {
        self.tasks.iter().map(|task| task.id).collect()
    }
}

fn launch<T: TaskResult>(task: Task<T>, permit: OwnedSemaphorePermit) {
    let Task { id, job, reply } = task;

    tokio::spawn(async move {
        trace!(task = id, "task launched");

        let output = job.await;

        drop(permit);
        trace!(task = id, "task settled");

        let _ = reply.send(Ok(output));
    });
}
