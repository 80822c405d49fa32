//! Asynchronous sequences.
//!
//! These work on any [`Stream`](futures_util::Stream): [`drain_async`]
//! collects one into a `Vec`, [`number_lines`] prefixes each line with its
//! position.

mod drain;
mod number;

pub use drain::drain_async;
pub use number::{NumberLines, NumberingConfig, number_lines, number_lines_with};
