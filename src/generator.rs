//! Pull-based lazy sequences.
//!
//! A [`Generator`] produces one element per [`resume`](Generator::resume) call and
//! signals exhaustion with [`Step::Complete`]. Nothing is computed until it is
//! pulled, so generators may be infinite. Restarting a sequence means calling the
//! function that built it again.
//!
//! ```rust
//! use pledge::{Generator, Step, from_iter};
//!
//! let mut letters = from_iter(["a", "b"]);
//! assert_eq!(letters.resume(), Step::Yielded("a"));
//! assert_eq!(letters.resume(), Step::Yielded("b"));
//! assert_eq!(letters.resume(), Step::Complete(()));
//! ```

use std::marker::PhantomData;

use crate::{lazy::Filter, step::Step};

/// A stateful source of elements driven one pull at a time.
pub trait Generator<O> {
    /// Value reported once the sequence is exhausted.
    type Return;

    /// Produces the next element, or completes.
    fn resume(&mut self) -> Step<O, Self::Return>;

    /// Adapts the generator into a standard [`Iterator`].
    fn iter(self) -> GenIter<O, Self>
    where
        Self: Sized,
    {
        GenIter::new(self)
    }

    /// Keeps only elements for which `predicate(value, index)` holds, where
    /// `index` counts positions in this generator's output.
    fn filter_indexed<P>(self, predicate: P) -> Filter<Self, P, O>
    where
        Self: Sized,
        P: FnMut(&O, usize) -> bool,
    {
        crate::lazy::filter_sequence(self, predicate)
    }

    /// Transforms every element as it is pulled.
    fn map_yield<O2, F>(self, f: F) -> MapYield<Self, F, O>
    where
        Self: Sized,
        F: FnMut(O) -> O2,
    {
        MapYield {
            inner: self,
            f,
            _input: PhantomData,
        }
    }

    fn boxed<'a>(self) -> Box<dyn Generator<O, Return = Self::Return> + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<O, G> Generator<O> for &mut G
where
    G: Generator<O> + ?Sized,
{
    type Return = G::Return;

    fn resume(&mut self) -> Step<O, Self::Return> {
        (**self).resume()
    }
}

impl<O, R> Generator<O> for Box<dyn Generator<O, Return = R> + '_> {
    type Return = R;

    fn resume(&mut self) -> Step<O, Self::Return> {
        (**self).resume()
    }
}

impl<O, L, R> Generator<O> for either::Either<L, R>
where
    L: Generator<O>,
    R: Generator<O, Return = L::Return>,
{
    type Return = L::Return;

    fn resume(&mut self) -> Step<O, Self::Return> {
        match self {
            either::Either::Left(l) => l.resume(),
            either::Either::Right(r) => r.resume(),
        }
    }
}

/// Generator built from a closure returning [`Step`]s.
pub struct FromFn<F>(F);

/// Creates a generator from a closure.
///
/// ```rust
/// use pledge::{Generator, Step, from_fn};
///
/// let mut n = 0;
/// let countdown = from_fn(move || {
///     n += 1;
///     if n <= 3 { Step::Yielded(4 - n) } else { Step::Complete("liftoff") }
/// });
/// let mut iter = countdown.iter();
/// assert_eq!(iter.by_ref().collect::<Vec<_>>(), vec![3, 2, 1]);
/// assert_eq!(iter.into_return(), Some("liftoff"));
/// ```
pub fn from_fn<O, D, F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Step<O, D>,
{
    FromFn(f)
}

impl<O, D, F> Generator<O> for FromFn<F>
where
    F: FnMut() -> Step<O, D>,
{
    type Return = D;

    fn resume(&mut self) -> Step<O, D> {
        (self.0)()
    }
}

/// Generator over the elements of any iterable.
#[derive(Debug, Clone)]
pub struct FromIter<I>(I);

/// Wraps an iterable as a generator that completes when the iterable ends.
pub fn from_iter<T: IntoIterator>(iterable: T) -> FromIter<T::IntoIter> {
    FromIter(iterable.into_iter())
}

impl<I: Iterator> Generator<I::Item> for FromIter<I> {
    type Return = ();

    fn resume(&mut self) -> Step<I::Item, ()> {
        Step::from_option(self.0.next())
    }
}

/// See [`Generator::map_yield`].
pub struct MapYield<G, F, O> {
    inner: G,
    f: F,
    _input: PhantomData<fn(O)>,
}

impl<O, O2, G, F> Generator<O2> for MapYield<G, F, O>
where
    G: Generator<O>,
    F: FnMut(O) -> O2,
{
    type Return = G::Return;

    fn resume(&mut self) -> Step<O2, Self::Return> {
        self.inner.resume().map_yielded(&mut self.f)
    }
}

/// [`Iterator`] over a [`Generator`].
///
/// Both `GenIter` and `&mut GenIter` are iterators, so a caller can drain part
/// of the sequence and still read the generator's return value afterwards.
pub struct GenIter<O, G>
where
    G: Generator<O>,
{
    generator: G,
    returned: Option<G::Return>,
    _output: PhantomData<fn() -> O>,
}

impl<O, G> GenIter<O, G>
where
    G: Generator<O>,
{
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            returned: None,
            _output: PhantomData,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.returned.is_some()
    }

    /// Consumes the iterator, returning the generator's final value if it completed.
    pub fn into_return(self) -> Option<G::Return> {
        self.returned
    }

    pub fn return_value(&self) -> Option<&G::Return> {
        self.returned.as_ref()
    }
}

impl<O, G> Iterator for GenIter<O, G>
where
    G: Generator<O>,
{
    type Item = O;

    fn next(&mut self) -> Option<O> {
        if self.returned.is_some() {
            return None;
        }
        match self.generator.resume() {
            Step::Yielded(output) => Some(output),
            Step::Complete(ret) => {
                self.returned = Some(ret);
                None
            }
        }
    }
}
