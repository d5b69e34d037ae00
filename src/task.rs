use crate::error::LimiterError;

use futures::future::BoxFuture;
use tokio::sync::oneshot;

pub(crate) type Reply<T> = oneshot::Sender<Result<T, LimiterError>>;

pub(crate) struct Task<T> {
    pub(crate) id: u64,
    pub(crate) job: BoxFuture<'static, T>,
    pub(crate) reply: Reply<T>,
}

impl<T> Task<T> {
    pub(crate) fn reject(self, error: LimiterError) {
        let _ = self.reply.send(Err(error));
    }
}
