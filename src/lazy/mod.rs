//! Lazy sequence utilities built on [`Generator`](crate::Generator).
//!
//! Each constructor returns a fresh generator; pulling it computes elements on
//! demand. Draining the same input twice means calling the constructor twice.

mod cycle;
mod filter;
mod flatten;

pub use cycle::{Cycle, cycle};
pub use filter::{Filter, filter_sequence};
pub use flatten::{Flatten, Nested, flatten_nested};
