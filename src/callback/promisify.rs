use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    Completion, Deferred, Error,
    deferred::Resolver,
    error::panic_message,
};

/// Converts a callback-style function into one returning a [`Deferred`].
///
/// Calling the adapted function invokes `f` with the same argument (use a tuple
/// for several) and a fresh [`Completion`]. `Err(e)` rejects with
/// [`Error::Underlying`]; `Ok(v)` fulfills with `v`. A panic in `f` before it
/// completes rejects with [`Error::Panicked`] instead of unwinding out of the
/// call.
///
/// The returned value is always pending when the call returns. If `f` completes
/// before returning, the result is delivered from a task spawned on the ambient
/// tokio runtime, so it becomes visible once the caller yields. Outside a
/// runtime there is nothing to yield to and such a result settles in place.
///
/// ```rust
/// use pledge::{Completion, Error, promisify};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let greet = promisify(|arg: &'static str, done: Completion<String, String>| {
///     done.ok(format!("success {arg}"));
/// });
/// let greeting = greet("good");
/// assert!(!greeting.is_settled());
/// assert_eq!(greeting.await, Ok("success good".to_string()));
///
/// let fail = promisify(|arg: &'static str, done: Completion<String, String>| {
///     done.err(format!("failure {arg}"));
/// });
/// assert_eq!(fail("bad").await, Err(Error::Underlying("failure bad".to_string())));
/// # });
/// ```
pub fn promisify<A, T, E, F>(f: F) -> impl Fn(A) -> Deferred<T, Error<E>>
where
    F: Fn(A, Completion<T, E>),
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    move |args| {
        let (resolver, deferred) = Deferred::pending();
        let call = Arc::new(Mutex::new(Call {
            resolver: Some(resolver),
            in_progress: true,
            early: None,
        }));

        let completion = Completion::new({
            let call = Arc::clone(&call);
            move |result: Result<T, E>| {
                let result = result.map_err(Error::Underlying);
                let resolver = {
                    let mut call = call.lock();
                    if call.in_progress {
                        call.early = Some(result);
                        return;
                    }
                    call.resolver.take()
                };
                if let Some(resolver) = resolver {
                    resolver.settle(result);
                }
            }
        });

        let outcome = catch_unwind(AssertUnwindSafe(|| f(args, completion)));

        let (resolver, early) = {
            let mut call = call.lock();
            call.in_progress = false;
            let mut early = call.early.take();
            if let Err(payload) = outcome {
                let message = panic_message(payload.as_ref());
                if early.is_some() {
                    tracing::debug!(%message, "callback panicked after completing");
                } else {
                    early = Some(Err(Error::Panicked(message)));
                }
            }
            match early {
                Some(result) => (call.resolver.take(), Some(result)),
                None => (None, None),
            }
        };

        if let (Some(resolver), Some(result)) = (resolver, early) {
            settle_next_turn(resolver, result);
        }
        deferred
    }
}

/// Settle-once slot for one call of an adapted function.
struct Call<T, E> {
    resolver: Option<Resolver<T, Error<E>>>,
    /// Set while `f` runs; completions in that window park their result in
    /// `early` instead of settling.
    in_progress: bool,
    early: Option<Result<T, Error<E>>>,
}

fn settle_next_turn<T, E>(resolver: Resolver<T, E>, result: Result<T, E>)
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(async move {
                tokio::task::yield_now().await;
                resolver.settle(result);
            });
        }
        Err(_) => {
            tracing::debug!("no tokio runtime; settling completed call in place");
            resolver.settle(result);
        }
    }
}
