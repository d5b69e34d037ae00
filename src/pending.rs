use crate::error::LimiterError;

use futures::FutureExt;
use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// The eventual outcome of a submitted task.
///
/// Resolves with the task's output once it has run, or with a [LimiterError] if the limiter
/// could not run it. Dropping a `Pending` does not cancel the task.
#[must_use = "the task's output is only observable by awaiting its Pending"]
pub struct Pending<T> {
    recv: oneshot::Receiver<Result<T, LimiterError>>,
}

impl<T> Pending<T> {
    pub(crate) fn new(recv: oneshot::Receiver<Result<T, LimiterError>>) -> Self {
        Self { recv }
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T, LimiterError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.recv
            .poll_unpin(cx)
            .map(|reply| reply.unwrap_or(Err(LimiterError::Abandoned)))
    }
}
