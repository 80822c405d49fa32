use std::marker::PhantomData;

use crate::{Generator, Step};

/// Generator that skips source elements rejected by a `(value, index)` predicate.
///
/// Created by [`filter_sequence`] or [`Generator::filter_indexed`].
pub struct Filter<G, P, O = ()> {
    source: G,
    predicate: P,
    index: usize,
    _item: PhantomData<fn() -> O>,
}

/// Keeps the elements of `source` for which `predicate(&value, index)` returns
/// `true`, where `index` is the 0-based position in the source.
///
/// Source order is preserved and the filter completes when the source does,
/// reporting the source's return value.
///
/// ```rust
/// use pledge::{Generator, filter_sequence, from_iter};
///
/// let even_positions = filter_sequence(from_iter(["a", "b", "c", "d"]), |_, i| i % 2 == 0);
/// assert_eq!(even_positions.iter().collect::<Vec<_>>(), vec!["a", "c"]);
/// ```
pub fn filter_sequence<O, G, P>(source: G, predicate: P) -> Filter<G, P, O>
where
    G: Generator<O>,
    P: FnMut(&O, usize) -> bool,
{
    Filter {
        source,
        predicate,
        index: 0,
        _item: PhantomData,
    }
}

impl<O, G, P> Generator<O> for Filter<G, P, O>
where
    G: Generator<O>,
    P: FnMut(&O, usize) -> bool,
{
    type Return = G::Return;

    fn resume(&mut self) -> Step<O, Self::Return> {
        loop {
            match self.source.resume() {
                Step::Yielded(value) => {
                    let index = self.index;
                    self.index += 1;
                    if (self.predicate)(&value, index) {
                        return Step::Yielded(value);
                    }
                }
                Step::Complete(ret) => return Step::Complete(ret),
            }
        }
    }
}
