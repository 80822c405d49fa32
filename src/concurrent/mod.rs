//! Running deferred values against each other.
//!
//! [`race`] and [`timeout`] settle with whichever competitor finishes first and
//! discard the rest. [`map_async`] runs a transform over a sequence with all
//! calls in flight at once, keeping results in input order.

mod map_async;
mod race;

pub use map_async::{map_async, map_filter_async};
pub use race::{delay, race, race_either, timeout, timeout_underlying};
