use std::sync::Arc;

use crate::{Generator, Step};

/// Endless replay of a fixed item list.
///
/// The backing list is shared and never mutated; only the cursor advances,
/// modulo the list length, on every pull.
#[derive(Debug, Clone)]
pub struct Cycle<T> {
    items: Arc<[T]>,
    cursor: usize,
}

/// Repeats `items` in order forever, wrapping to the first after the last.
///
/// With no items the generator completes on its first pull instead of spinning.
///
/// ```rust
/// use pledge::{Generator, cycle};
///
/// let first_five: Vec<_> = cycle(["a", "b", "c"]).iter().take(5).collect();
/// assert_eq!(first_five, vec!["a", "b", "c", "a", "b"]);
///
/// assert_eq!(cycle(Vec::<&str>::new()).iter().count(), 0);
/// ```
pub fn cycle<T, I>(items: I) -> Cycle<T>
where
    T: Clone,
    I: IntoIterator<Item = T>,
{
    Cycle {
        items: items.into_iter().collect(),
        cursor: 0,
    }
}

impl<T> Cycle<T> {
    /// Number of distinct items in one lap.
    pub fn period(&self) -> usize {
        self.items.len()
    }
}

impl<T: Clone> Generator<T> for Cycle<T> {
    type Return = ();

    fn resume(&mut self) -> Step<T, ()> {
        let Some(item) = self.items.get(self.cursor) else {
            return Step::Complete(());
        };
        self.cursor = (self.cursor + 1) % self.items.len();
        Step::Yielded(item.clone())
    }
}
