use std::fmt;

use crate::{Generator, Step};

/// A scalar or an arbitrarily nested sequence of scalars.
pub enum Nested<T> {
    Scalar(T),
    Seq(Vec<Nested<T>>),
    /// Children produced on demand; may be infinite.
    Lazy(Box<dyn Iterator<Item = Nested<T>> + Send>),
}

impl<T> Nested<T> {
    pub fn scalar(value: T) -> Self {
        Nested::Scalar(value)
    }

    pub fn seq<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Nested<T>>,
    {
        Nested::Seq(children.into_iter().collect())
    }

    pub fn lazy<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Nested<T>>,
        I::IntoIter: Send + 'static,
    {
        Nested::Lazy(Box::new(children.into_iter()))
    }
}

impl<T> From<Vec<Nested<T>>> for Nested<T> {
    fn from(children: Vec<Nested<T>>) -> Self {
        Nested::Seq(children)
    }
}

impl<T: fmt::Debug> fmt::Debug for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Nested::Seq(children) => f.debug_tuple("Seq").field(children).finish(),
            Nested::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

type Frame<T> = Box<dyn Iterator<Item = Nested<T>> + Send>;

/// Depth-first, left-to-right walk over a [`Nested`] value.
///
/// Holds one iterator per open nesting level, so memory grows with depth rather
/// than with the number of scalars.
pub struct Flatten<T> {
    pending: Option<Nested<T>>,
    stack: Vec<Frame<T>>,
}

/// Flattens `value` into a lazy sequence of its scalars.
///
/// ```rust
/// use pledge::{Generator, Nested, flatten_nested};
///
/// let s = Nested::scalar;
/// let value = Nested::seq([s("a"), Nested::seq([s("b"), Nested::seq([s("c")])]), s("d")]);
/// assert_eq!(flatten_nested(value).iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
/// ```
pub fn flatten_nested<T: Send + 'static>(value: Nested<T>) -> Flatten<T> {
    Flatten {
        pending: Some(value),
        stack: Vec::new(),
    }
}

impl<T: Send + 'static> Flatten<T> {
    /// Current nesting depth of the walk.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn descend(&mut self, node: Nested<T>) -> Option<T> {
        match node {
            Nested::Scalar(value) => Some(value),
            Nested::Seq(children) => {
                self.stack.push(Box::new(children.into_iter()));
                None
            }
            Nested::Lazy(children) => {
                self.stack.push(children);
                None
            }
        }
    }
}

impl<T: Send + 'static> Generator<T> for Flatten<T> {
    type Return = ();

    fn resume(&mut self) -> Step<T, ()> {
        if let Some(root) = self.pending.take() {
            if let Some(value) = self.descend(root) {
                return Step::Yielded(value);
            }
        }
        while let Some(frame) = self.stack.last_mut() {
            match frame.next() {
                Some(node) => {
                    if let Some(value) = self.descend(node) {
                        return Step::Yielded(value);
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        Step::Complete(())
    }
}
