use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Completion, Error};

type Finish<U, E> = Box<dyn FnOnce(Result<Vec<U>, Error<E>>) + Send>;

/// Tunables for [`map_cb_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    /// Stop starting transforms once one has reported an error. With `false`
    /// every element is still handed to the transform; only the first error is
    /// reported either way.
    pub stop_on_error: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            stop_on_error: true,
        }
    }
}

/// Result slots indexed by input position, plus the single outer completion.
struct Gather<U, E> {
    slots: Vec<Option<U>>,
    remaining: usize,
    finish: Option<Finish<U, E>>,
}

impl<U, E> Gather<U, E> {
    fn is_finished(&self) -> bool {
        self.finish.is_none()
    }

    /// Records one transform's outcome. Returns the outer completion and its
    /// argument when this outcome decides the whole map.
    #[allow(clippy::type_complexity)]
    fn record(
        &mut self,
        index: usize,
        result: Result<U, E>,
    ) -> Option<(Finish<U, E>, Result<Vec<U>, Error<E>>)> {
        if self.is_finished() {
            tracing::debug!(index, ok = result.is_ok(), "late transform result discarded");
            return None;
        }
        match result {
            Ok(value) => {
                self.slots[index] = Some(value);
                self.remaining -= 1;
                if self.remaining > 0 {
                    return None;
                }
                let values = self.slots.iter_mut().filter_map(Option::take).collect();
                self.finish.take().map(|finish| (finish, Ok(values)))
            }
            Err(err) => {
                tracing::debug!(index, "transform failed; short-circuiting map");
                self.finish
                    .take()
                    .map(|finish| (finish, Err(Error::Underlying(err))))
            }
        }
    }
}

/// Applies a callback-style `transform(item, index, completion)` to every item
/// and reports all results, in input order, through `completion`.
///
/// `completion` runs exactly once:
/// - `items == None`: `Err(Error::InvalidArgument)`, before any transform call;
/// - empty input: `Ok(vec![])` without calling `transform`;
/// - first transform error: `Err(Error::Underlying(e))`, later results ignored;
/// - otherwise `Ok(results)` with `results[i]` produced for `items[i]`,
///   whatever order the transforms finished in.
///
/// ```rust
/// use pledge::{Completion, map_cb};
///
/// let (tx, rx) = std::sync::mpsc::channel();
/// map_cb(
///     Some(vec!["foo", "bar", "baz"]),
///     |s: &str, _index, done: Completion<String, String>| done.ok(s.to_uppercase()),
///     move |result| tx.send(result).unwrap(),
/// );
/// assert_eq!(rx.recv().unwrap(), Ok(vec!["FOO".to_string(), "BAR".to_string(), "BAZ".to_string()]));
/// ```
pub fn map_cb<T, U, E, F, C>(items: Option<Vec<T>>, transform: F, completion: C)
where
    F: FnMut(T, usize, Completion<U, E>),
    C: FnOnce(Result<Vec<U>, Error<E>>) + Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    map_cb_with(items, transform, MapOptions::default(), completion);
}

/// [`map_cb`] with explicit [`MapOptions`].
pub fn map_cb_with<T, U, E, F, C>(
    items: Option<Vec<T>>,
    mut transform: F,
    options: MapOptions,
    completion: C,
) where
    F: FnMut(T, usize, Completion<U, E>),
    C: FnOnce(Result<Vec<U>, Error<E>>) + Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    let Some(items) = items else {
        completion(Err(Error::InvalidArgument(
            "items must be an indexable sequence".to_string(),
        )));
        return;
    };
    if items.is_empty() {
        completion(Ok(Vec::new()));
        return;
    }

    let gather = Arc::new(Mutex::new(Gather {
        slots: std::iter::repeat_with(|| None).take(items.len()).collect(),
        remaining: items.len(),
        finish: Some(Box::new(completion) as Finish<U, E>),
    }));

    for (index, item) in items.into_iter().enumerate() {
        if options.stop_on_error && gather.lock().is_finished() {
            tracing::debug!(index, "map already failed; not starting remaining transforms");
            break;
        }
        let slot = Completion::new({
            let gather = Arc::clone(&gather);
            move |result| {
                let decided = gather.lock().record(index, result);
                if let Some((finish, outcome)) = decided {
                    finish(outcome);
                }
            }
        });
        transform(item, index, slot);
    }
}
