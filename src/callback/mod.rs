//! Node-style callback plumbing.
//!
//! A callback-style function takes its arguments plus a trailing [`Completion`]
//! and reports `Ok(result)` or `Err(error)` through it instead of returning.
//! [`promisify`] turns such a function into one returning a
//! [`Deferred`](crate::Deferred); [`map_cb`] runs one across a sequence.

mod completion;
mod map_cb;
mod promisify;

pub use completion::Completion;
pub use map_cb::{MapOptions, map_cb, map_cb_with};
pub use promisify::promisify;
