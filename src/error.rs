//! Error kinds delivered through completion callbacks and deferred rejections.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by a primitive in this crate.
///
/// `E` is the error type of the wrapped callback or transform. Every primitive
/// delivers exactly one of these through the same channel it would have used for
/// success, never by panicking across an asynchronous boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error<E> {
    /// An argument could not be used, e.g. a missing input sequence.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The first error surfaced by a wrapped callback or element transform.
    #[error("{0}")]
    Underlying(E),
    /// The deadline fired before the raced value settled.
    #[error("timeout after {} ms", .0.as_millis())]
    TimeoutExceeded(Duration),
    /// The wrapped function panicked before invoking its completion.
    #[error("callback panicked: {0}")]
    Panicked(String),
}

impl<E> Error<E> {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TimeoutExceeded(_))
    }

    /// Borrows the wrapped error, if this is [`Error::Underlying`].
    pub fn underlying(&self) -> Option<&E> {
        match self {
            Error::Underlying(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_underlying(self) -> Option<E> {
        match self {
            Error::Underlying(e) => Some(e),
            _ => None,
        }
    }

    /// Converts the wrapped error type, keeping every other kind as is.
    pub fn map_underlying<E2, F>(self, f: F) -> Error<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Error::InvalidArgument(msg) => Error::InvalidArgument(msg),
            Error::Underlying(e) => Error::Underlying(f(e)),
            Error::TimeoutExceeded(d) => Error::TimeoutExceeded(d),
            Error::Panicked(msg) => Error::Panicked(msg),
        }
    }
}

/// Renders a caught panic payload for [`Error::Panicked`].
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
