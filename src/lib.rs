//! # Pledge: Settle-Once Asynchronous Primitives
//!
//! Small building blocks for callback-driven and lazily produced values.
//!
//! ## Core Types
//!
//! - **[`Deferred<T, E>`]**: a value that settles exactly once, to success or failure
//! - **[`Completion<T, E>`]**: the one-shot callback handed to callback-style functions
//! - **[`Generator<O>`]**: a pull-based lazy sequence speaking [`Step`]
//!
//! ## Key Features
//!
//! - **Callbacks to deferreds**: [`promisify`] adapts `f(args, completion)` functions
//! - **Deadlines**: [`timeout`] and [`race`] keep the first settlement and discard the loser
//! - **Ordered mapping**: [`map_cb`] and [`map_async`] report results in input order
//! - **Lazy sequences**: [`flatten_nested`], [`filter_sequence`], [`cycle`]
//! - **Async sequences**: [`drain_async`] and [`number_lines`] over any `Stream`
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use pledge::{Completion, promisify, timeout};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! # rt.block_on(async {
//! let greet = promisify(|name: &'static str, done: Completion<String, String>| {
//!     done.ok(format!("hello {name}"));
//! });
//!
//! // Settles once the caller yields, well inside the deadline.
//! let greeting = timeout(Duration::from_millis(100), &greet("world")).await;
//! assert_eq!(greeting, Ok("hello world".to_string()));
//! # });
//! ```
//!
//! ## Common Functions
//!
//! **Deferred values:**
//! - [`Deferred::pending()`] - Create a pending value and its [`Resolver`]
//! - [`Deferred::on_settle(f)`](Deferred::on_settle) - Observe the settlement exactly once
//! - [`timeout(duration, deferred)`] - Reject with [`Error::TimeoutExceeded`] if too slow
//!
//! **Lazy sequences:**
//! - [`cycle(items)`] - Repeat items forever (or nothing, if empty)
//! - [`Generator::iter()`] - Drive a generator as an [`Iterator`]

mod callback;
mod concurrent;
mod deferred;
mod error;
pub mod fs;
mod generator;
mod lazy;
mod step;
mod stream;

pub use callback::{Completion, MapOptions, map_cb, map_cb_with, promisify};
pub use concurrent::{
    delay, map_async, map_filter_async, race, race_either, timeout, timeout_underlying,
};
pub use deferred::{Deferred, Resolver, Settlement};
pub use error::Error;
pub use generator::{FromFn, FromIter, GenIter, Generator, MapYield, from_fn, from_iter};
pub use lazy::{Cycle, Filter, Flatten, Nested, cycle, filter_sequence, flatten_nested};
pub use step::Step;
pub use stream::{NumberLines, NumberingConfig, drain_async, number_lines, number_lines_with};
