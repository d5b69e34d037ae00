use crate::{auto_traits::TaskResult, error::LimiterError, queue::Queue, state::State, task::Task};

use std::sync::Arc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// Owns the queue and the ticker. Stops when told to or when dropped.
pub(crate) struct Worker {
    exit_sender: flume::Sender<()>,
}

impl Worker {
    pub fn spawn<T: TaskResult>(
        state: Arc<State>,
        task_receiver: flume::Receiver<Task<T>>,
    ) -> Self {
        let (exit_sender, exit_receiver) = flume::bounded(1);
        let period = state.interval();
        let first_tick = Instant::now() + period;

        tokio::spawn(async move {
            let mut queue = Queue::new(state.clone());
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            debug!(?period, "worker started");

            loop {
                tokio::select! {
                    biased;

                    _ = exit_receiver.recv_async() => {
                        break
                    },
                    _ = ticker.tick() => {
                        for task in task_receiver.try_iter() {
                            queue.push(task);
                        }

                        let pass = state.record_pass();
                        let admitted = queue.drain();

                        if admitted > 0 || queue.len() > 0 {
                            debug!(
                                pass,
                                admitted,
                                queued = queue.len(),
                                active = state.active(),
                                "drain pass"
                            );
                        }
                    },
                    task = task_receiver.recv_async() => match task {
                        Ok(task) => queue.push(task),
                        Err(_) => break,
                    },
                }
            }

            state.stop();

            let mut closed = queue.close();

            for task in task_receiver.drain() {
                state.dequeue();
                task.reject(LimiterError::Stopped);
                closed += 1;
            }

            debug!(closed, "worker stopped");
        });

        Self { exit_sender }
    }

    pub fn stop(&self) {
        let _ = self.exit_sender.try_send(());
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}
