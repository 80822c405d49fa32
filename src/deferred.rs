//! Single-assignment asynchronous values.
//!
//! A [`Deferred`] starts pending and settles exactly once, to
//! [`Settlement::Fulfilled`] or [`Settlement::Rejected`]. The producer side is a
//! [`Resolver`], which is consumed by settling, so a second settlement cannot be
//! expressed. Consumers either `.await` a handle (each handle sees a clone of the
//! settlement) or register observers with [`Deferred::on_settle`].
//!
//! ```rust
//! use pledge::{Deferred, Settlement};
//!
//! let (resolver, deferred) = Deferred::<u32, String>::pending();
//! assert!(!deferred.is_settled());
//! resolver.fulfill(7);
//! assert_eq!(deferred.settlement(), Some(Settlement::Fulfilled(7)));
//! ```

use std::{
    future::Future,
    panic::{AssertUnwindSafe, catch_unwind},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

use parking_lot::Mutex;

use crate::error::panic_message;

/// Terminal state of a [`Deferred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Settlement::Fulfilled(_))
    }

    pub const fn is_rejected(&self) -> bool {
        matches!(self, Settlement::Rejected(_))
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Settlement::Fulfilled(value) => Ok(value),
            Settlement::Rejected(err) => Err(err),
        }
    }

    pub fn as_result(&self) -> Result<&T, &E> {
        match self {
            Settlement::Fulfilled(value) => Ok(value),
            Settlement::Rejected(err) => Err(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Settlement::Fulfilled(value),
            Err(err) => Settlement::Rejected(err),
        }
    }
}

type Observer<T, E> = Box<dyn FnOnce(&Settlement<T, E>) + Send>;

enum State<T, E> {
    Pending {
        observers: Vec<Observer<T, E>>,
        wakers: Vec<Waker>,
    },
    Settled {
        settlement: Arc<Settlement<T, E>>,
        /// Set while the settling call runs observers; registrations made in
        /// that window are queued behind them instead of running re-entrantly.
        draining: bool,
        queued: Vec<Observer<T, E>>,
    },
}

struct Shared<T, E> {
    state: Mutex<State<T, E>>,
}

impl<T, E> Shared<T, E> {
    fn new(state: State<T, E>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    fn is_pending(&self) -> bool {
        matches!(*self.state.lock(), State::Pending { .. })
    }

    /// Returns `false` if the value had already settled.
    fn settle(&self, settlement: Settlement<T, E>) -> bool {
        let settlement = Arc::new(settlement);
        let (mut observers, wakers) = {
            let mut state = self.state.lock();
            let State::Pending { observers, wakers } = &mut *state else {
                return false;
            };
            let taken = (std::mem::take(observers), std::mem::take(wakers));
            *state = State::Settled {
                settlement: Arc::clone(&settlement),
                draining: true,
                queued: Vec::new(),
            };
            taken
        };

        tracing::trace!(
            fulfilled = settlement.is_fulfilled(),
            observers = observers.len(),
            "deferred settled"
        );

        loop {
            for observer in observers.drain(..) {
                let notify = || observer(&settlement);
                if let Err(payload) = catch_unwind(AssertUnwindSafe(notify)) {
                    let message = panic_message(payload.as_ref());
                    tracing::warn!(%message, "deferred observer panicked");
                }
            }
            let mut state = self.state.lock();
            let State::Settled {
                draining, queued, ..
            } = &mut *state
            else {
                break;
            };
            if queued.is_empty() {
                *draining = false;
                break;
            }
            observers = std::mem::take(queued);
        }

        for waker in wakers {
            waker.wake();
        }
        true
    }

    fn observe(&self, observer: Observer<T, E>) {
        let settlement = {
            let mut state = self.state.lock();
            match &mut *state {
                State::Pending { observers, .. } => {
                    observers.push(observer);
                    return;
                }
                State::Settled {
                    draining: true,
                    queued,
                    ..
                } => {
                    queued.push(observer);
                    return;
                }
                State::Settled { settlement, .. } => Arc::clone(settlement),
            }
        };
        observer(&settlement);
    }
}

/// Handle to a value that settles exactly once.
///
/// Cloning the handle shares the same underlying value. Awaiting requires
/// `T: Clone` and `E: Clone` because every handle receives its own copy.
pub struct Deferred<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> std::fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_settled() { "settled" } else { "pending" };
        f.debug_struct("Deferred").field("state", &state).finish()
    }
}

impl<T, E> Deferred<T, E> {
    /// Creates a pending value and the resolver that settles it.
    pub fn pending() -> (Resolver<T, E>, Self) {
        let shared = Shared::new(State::Pending {
            observers: Vec::new(),
            wakers: Vec::new(),
        });
        (
            Resolver {
                shared: Some(Arc::clone(&shared)),
            },
            Self { shared },
        )
    }

    fn settled(settlement: Settlement<T, E>) -> Self {
        Self {
            shared: Shared::new(State::Settled {
                settlement: Arc::new(settlement),
                draining: false,
                queued: Vec::new(),
            }),
        }
    }

    pub fn fulfilled(value: T) -> Self {
        Self::settled(Settlement::Fulfilled(value))
    }

    pub fn rejected(err: E) -> Self {
        Self::settled(Settlement::Rejected(err))
    }

    pub fn is_settled(&self) -> bool {
        !self.shared.is_pending()
    }

    /// Registers a continuation that runs exactly once with the settlement.
    ///
    /// Continuations run in registration order. One registered after settlement
    /// runs before this call returns, unless the value is still delivering to
    /// earlier continuations, in which case it is queued behind them.
    ///
    /// A continuation that panics during delivery is logged and skipped; the
    /// rest still run and awaiting handles still wake.
    pub fn on_settle<F>(&self, observer: F)
    where
        F: FnOnce(&Settlement<T, E>) + Send + 'static,
    {
        self.shared.observe(Box::new(observer));
    }

    /// Settles from a future driven on the ambient tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let (resolver, deferred) = Self::pending();
        tokio::spawn(async move { resolver.settle(future.await) });
        deferred
    }
}

impl<T: Clone, E: Clone> Deferred<T, E> {
    /// Returns a copy of the settlement, or `None` while pending.
    pub fn settlement(&self) -> Option<Settlement<T, E>> {
        match &*self.shared.state.lock() {
            State::Pending { .. } => None,
            State::Settled { settlement, .. } => Some(Settlement::clone(settlement)),
        }
    }
}

impl<T: Clone, E: Clone> Future for Deferred<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock();
        match &mut *state {
            State::Settled { settlement, .. } => Poll::Ready(Settlement::clone(settlement).into_result()),
            State::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

/// Producer side of a [`Deferred`]; settling consumes it.
///
/// Dropping a resolver without settling leaves the value pending forever and
/// logs a warning.
pub struct Resolver<T, E> {
    shared: Option<Arc<Shared<T, E>>>,
}

impl<T, E> Resolver<T, E> {
    pub fn fulfill(self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(self, err: E) {
        self.settle(Err(err));
    }

    pub fn settle(mut self, result: Result<T, E>) {
        if let Some(shared) = self.shared.take() {
            shared.settle(result.into());
        }
    }
}

impl<T, E> Drop for Resolver<T, E> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            if shared.is_pending() {
                tracing::warn!("resolver dropped without settling; deferred stays pending");
            }
        }
    }
}

impl<T, E> std::fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
