use std::{sync::Arc, time::Duration};

use either::Either;
use parking_lot::Mutex;
use tokio::task::AbortHandle;

use crate::{Deferred, Error, deferred::Resolver};

/// Settle-once slot shared by the competitors of a race.
///
/// The first competitor to take the resolver decides the outcome; every later
/// attempt finds the slot empty and is dropped.
struct Arbiter<T, E> {
    resolver: Mutex<Option<Resolver<T, E>>>,
    timer: Mutex<Option<AbortHandle>>,
}

impl<T, E> Arbiter<T, E> {
    fn new(resolver: Resolver<T, E>) -> Arc<Self> {
        Arc::new(Self {
            resolver: Mutex::new(Some(resolver)),
            timer: Mutex::new(None),
        })
    }

    fn is_decided(&self) -> bool {
        self.resolver.lock().is_none()
    }

    /// Returns `false` if another competitor already won.
    fn settle(&self, result: Result<T, E>) -> bool {
        let Some(resolver) = self.resolver.lock().take() else {
            return false;
        };
        resolver.settle(result);
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
        true
    }

    fn arm(&self, timer: AbortHandle) {
        if self.is_decided() {
            timer.abort();
        } else {
            *self.timer.lock() = Some(timer);
        }
    }
}

fn forward<S, SE, T, E, F>(source: &Deferred<S, SE>, arbiter: &Arc<Arbiter<T, E>>, convert: F)
where
    S: Clone,
    SE: Clone,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: FnOnce(Result<S, SE>) -> Result<T, E> + Send + 'static,
{
    let arbiter = Arc::clone(arbiter);
    source.on_settle(move |settlement| {
        let result = convert(settlement.clone().into_result());
        if !arbiter.settle(result) {
            tracing::debug!("race already decided; discarding late settlement");
        }
    });
}

/// Settles with whichever of `a` or `b` settles first, fulfilled or rejected.
///
/// If both are already settled, `a` wins.
pub fn race<T, E>(a: &Deferred<T, E>, b: &Deferred<T, E>) -> Deferred<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let (resolver, raced) = Deferred::pending();
    let arbiter = Arbiter::new(resolver);
    forward(a, &arbiter, std::convert::identity);
    forward(b, &arbiter, std::convert::identity);
    raced
}

/// Like [`race`], but reports which side won.
pub fn race_either<A, B, E>(a: &Deferred<A, E>, b: &Deferred<B, E>) -> Deferred<Either<A, B>, E>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let (resolver, raced) = Deferred::pending();
    let arbiter = Arbiter::new(resolver);
    forward(a, &arbiter, |result| result.map(Either::Left));
    forward(b, &arbiter, |result| result.map(Either::Right));
    raced
}

/// Fulfills with `()` once `duration` has elapsed.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn delay<E>(duration: Duration) -> Deferred<(), E>
where
    E: Send + Sync + 'static,
{
    Deferred::from_future(async move {
        tokio::time::sleep(duration).await;
        Ok(())
    })
}

/// Races `deferred` against a deadline of `duration`.
///
/// - `deferred` settles first: its value or error is forwarded unchanged, so an
///   error that is already an [`Error`] (say [`Error::Underlying`] from
///   [`promisify`](crate::promisify)) arrives as is, and the deadline timer is
///   aborted.
/// - the deadline fires first: rejects with [`Error::TimeoutExceeded`]; the
///   eventual settlement of `deferred` is discarded.
///
/// A `deferred` that is already settled, or settles before the timer task gets
/// to run, wins even against a zero duration. No timer is started for one that
/// is already settled. Use [`timeout_underlying`] when the error type is not
/// an [`Error`].
///
/// # Panics
///
/// Panics when a timer is needed outside a tokio runtime.
pub fn timeout<T, E>(duration: Duration, deferred: &Deferred<T, Error<E>>) -> Deferred<T, Error<E>>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    with_deadline(duration, deferred, std::convert::identity)
}

/// [`timeout`] for values whose error type is not an [`Error`]; rejections are
/// wrapped in [`Error::Underlying`].
///
/// # Panics
///
/// Panics when a timer is needed outside a tokio runtime.
pub fn timeout_underlying<T, E>(duration: Duration, deferred: &Deferred<T, E>) -> Deferred<T, Error<E>>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    with_deadline(duration, deferred, |result| result.map_err(Error::Underlying))
}

fn with_deadline<T, SE, E, F>(duration: Duration, deferred: &Deferred<T, SE>, convert: F) -> Deferred<T, Error<E>>
where
    T: Clone + Send + Sync + 'static,
    SE: Clone,
    E: Send + Sync + 'static,
    F: FnOnce(Result<T, SE>) -> Result<T, Error<E>> + Send + 'static,
{
    let (resolver, raced) = Deferred::pending();
    let arbiter = Arbiter::new(resolver);
    forward(deferred, &arbiter, convert);
    if arbiter.is_decided() {
        return raced;
    }

    let timer = tokio::spawn({
        let arbiter = Arc::clone(&arbiter);
        async move {
            tokio::time::sleep(duration).await;
            if arbiter.settle(Err(Error::TimeoutExceeded(duration))) {
                tracing::debug!(
                    timeout_ms = duration.as_millis(),
                    "deadline fired before value settled"
                );
            }
        }
    });
    arbiter.arm(timer.abort_handle());
    raced
}
