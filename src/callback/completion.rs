use std::fmt;

type Callback<T, E> = Box<dyn FnOnce(Result<T, E>) + Send>;

/// One-shot completion handle passed to callback-style functions.
///
/// Invoking it consumes the handle, so a well-typed callback function cannot
/// complete twice. A handle dropped without being invoked never reports; the
/// drop is logged at `warn` level.
pub struct Completion<T, E> {
    callback: Option<Callback<T, E>>,
}

impl<T, E> Completion<T, E> {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Result<T, E>) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    pub fn complete(mut self, result: Result<T, E>) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }

    pub fn ok(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn err(self, err: E) {
        self.complete(Err(err));
    }
}

impl<T, E> Drop for Completion<T, E> {
    fn drop(&mut self) {
        if self.callback.is_some() && !std::thread::panicking() {
            tracing::warn!("completion dropped without being invoked");
        }
    }
}

impl<T, E> fmt::Debug for Completion<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}
