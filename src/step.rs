/// Outcome of a single pull on a lazy sequence: either the next element, or the
/// signal that the sequence is exhausted together with its final value.
///
/// Every synchronous generator in this crate speaks this protocol through
/// [`Generator::resume`](crate::Generator::resume). Asynchronous sequences use the
/// same shape wrapped in a future per pull.
///
/// # Examples
///
/// ```rust
/// use pledge::Step;
///
/// let next: Step<&str, ()> = Step::Yielded("a");
/// let done: Step<&str, ()> = Step::Complete(());
///
/// assert_eq!(next.map_yielded(str::len), Step::Yielded(1));
/// assert!(done.is_complete());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step<Y, D> {
    /// The sequence produced another element.
    Yielded(Y),
    /// The sequence is exhausted.
    Complete(D),
}

impl<Y, D> Step<Y, D> {
    /// Returns `true` if the step carries an element.
    #[inline]
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    /// Returns `true` if the step signals exhaustion.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete(_))
    }

    /// Converts into the yielded element, discarding a completion value.
    ///
    /// ```rust
    /// use pledge::Step;
    ///
    /// assert_eq!(Step::<i32, ()>::Yielded(7).yielded_value(), Some(7));
    /// assert_eq!(Step::<i32, ()>::Complete(()).yielded_value(), None);
    /// ```
    #[inline]
    pub fn yielded_value(self) -> Option<Y> {
        match self {
            Step::Yielded(y) => Some(y),
            Step::Complete(_) => None,
        }
    }

    /// Converts into the completion value, discarding an element.
    #[inline]
    pub fn complete_value(self) -> Option<D> {
        match self {
            Step::Yielded(_) => None,
            Step::Complete(d) => Some(d),
        }
    }

    /// Applies `f` to the yielded element, leaving a completion untouched.
    #[inline]
    pub fn map_yielded<Y2, F>(self, f: F) -> Step<Y2, D>
    where
        F: FnOnce(Y) -> Y2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(f(y)),
            Step::Complete(d) => Step::Complete(d),
        }
    }

    /// Applies `f` to the completion value, leaving an element untouched.
    #[inline]
    pub fn map_complete<D2, F>(self, f: F) -> Step<Y, D2>
    where
        F: FnOnce(D) -> D2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Complete(d) => Step::Complete(f(d)),
        }
    }

    /// Borrows the contents of the step.
    #[inline]
    pub const fn as_ref(&self) -> Step<&Y, &D> {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Complete(d) => Step::Complete(d),
        }
    }

    /// Returns the yielded element.
    ///
    /// # Panics
    ///
    /// Panics if the step is `Complete`.
    #[inline]
    pub fn unwrap_yielded(self) -> Y {
        match self {
            Step::Yielded(y) => y,
            Step::Complete(_) => panic!("called `Step::unwrap_yielded()` on a `Complete` value"),
        }
    }

    /// Returns the completion value.
    ///
    /// # Panics
    ///
    /// Panics if the step is `Yielded`.
    #[inline]
    pub fn unwrap_complete(self) -> D {
        match self {
            Step::Yielded(_) => panic!("called `Step::unwrap_complete()` on a `Yielded` value"),
            Step::Complete(d) => d,
        }
    }
}

impl<Y> Step<Y, ()> {
    /// Lifts an iterator pull into the step protocol.
    ///
    /// ```rust
    /// use pledge::Step;
    ///
    /// let mut letters = ["x"].into_iter();
    /// assert_eq!(Step::from_option(letters.next()), Step::Yielded("x"));
    /// assert_eq!(Step::from_option(letters.next()), Step::Complete(()));
    /// ```
    #[inline]
    pub fn from_option(next: Option<Y>) -> Self {
        match next {
            Some(y) => Step::Yielded(y),
            None => Step::Complete(()),
        }
    }
}

impl<Y, D> From<Step<Y, D>> for Option<Y> {
    fn from(step: Step<Y, D>) -> Self {
        step.yielded_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_follow_variant() {
        let next: Step<u8, &str> = Step::Yielded(1);
        let done: Step<u8, &str> = Step::Complete("end");
        assert!(next.is_yielded() && !next.is_complete());
        assert!(done.is_complete() && !done.is_yielded());
    }

    #[test]
    fn test_maps_touch_only_their_side() {
        let next: Step<u8, u8> = Step::Yielded(2);
        let done: Step<u8, u8> = Step::Complete(2);

        assert_eq!(next.map_yielded(|y| y * 10), Step::Yielded(20));
        assert_eq!(next.map_complete(|d| d * 10), Step::Yielded(2));
        assert_eq!(done.map_yielded(|y| y * 10), Step::Complete(2));
        assert_eq!(done.map_complete(|d| d * 10), Step::Complete(20));
    }

    #[test]
    fn test_option_bridge() {
        assert_eq!(Step::from_option(Some('a')), Step::Yielded('a'));
        assert_eq!(Step::<char, ()>::from_option(None), Step::Complete(()));

        let as_option: Option<char> = Step::<char, ()>::Yielded('b').into();
        assert_eq!(as_option, Some('b'));
        assert_eq!(Step::<char, u32>::Complete(9).complete_value(), Some(9));
    }

    #[test]
    fn test_as_ref_borrows() {
        let owned: Step<String, ()> = Step::Yielded("line".to_string());
        assert_eq!(owned.as_ref().map_yielded(String::len), Step::Yielded(4));
        assert_eq!(owned.unwrap_yielded(), "line");
    }

    #[test]
    #[should_panic(expected = "on a `Complete` value")]
    fn test_unwrap_yielded_panics_on_complete() {
        Step::<u8, ()>::Complete(()).unwrap_yielded();
    }

    #[test]
    #[should_panic(expected = "on a `Yielded` value")]
    fn test_unwrap_complete_panics_on_yielded() {
        Step::<u8, ()>::Yielded(0).unwrap_complete();
    }
}
