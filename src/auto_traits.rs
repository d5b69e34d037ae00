pub trait TaskResult: Send + 'static {}
impl<T: Send + 'static> TaskResult for T {}

pub trait Job<T>: Future<Output = T> + Send + 'static {}
impl<T, J: Future<Output = T> + Send + 'static> Job<T> for J {}
