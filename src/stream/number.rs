use std::{
    pin::Pin,
    task::{Context, Poll, ready},
};

use futures_util::Stream;
use pin_project_lite::pin_project;

/// How [`number_lines_with`] formats each line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingConfig {
    /// Number given to the first line.
    pub start: usize,
    /// Text placed between the number and the line.
    pub separator: String,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            start: 1,
            separator: ": ".to_string(),
        }
    }
}

pin_project! {
    /// Stream returned by [`number_lines`].
    ///
    /// Pulls one source line per item it produces and holds nothing ahead of
    /// the consumer. Ends after the line numbered `usize::MAX`.
    #[must_use = "streams do nothing unless polled"]
    pub struct NumberLines<S> {
        #[pin]
        source: S,
        next: Option<usize>,
        separator: String,
    }
}

/// Numbers `lines` from 1 as `"<n>: <line>"`.
///
/// ```rust
/// use futures_util::stream;
/// use pledge::{drain_async, number_lines};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let numbered = drain_async(number_lines(stream::iter(["first", "second"]))).await;
/// assert_eq!(numbered, vec!["1: first", "2: second"]);
/// # });
/// ```
pub fn number_lines<S>(lines: S) -> NumberLines<S>
where
    S: Stream,
    S::Item: AsRef<str>,
{
    number_lines_with(lines, NumberingConfig::default())
}

pub fn number_lines_with<S>(lines: S, config: NumberingConfig) -> NumberLines<S>
where
    S: Stream,
    S::Item: AsRef<str>,
{
    NumberLines {
        source: lines,
        next: Some(config.start),
        separator: config.separator,
    }
}

impl<S> NumberLines<S> {
    /// Number the next line will receive, or `None` once numbers ran out.
    pub fn next_number(&self) -> Option<usize> {
        self.next
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S> Stream for NumberLines<S>
where
    S: Stream,
    S::Item: AsRef<str>,
{
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        let this = self.project();
        let Some(number) = *this.next else {
            return Poll::Ready(None);
        };
        let Some(line) = ready!(this.source.poll_next(cx)) else {
            return Poll::Ready(None);
        };
        *this.next = number.checked_add(1);
        if this.next.is_none() {
            tracing::debug!(number, "line numbers exhausted; ending stream");
        }
        Poll::Ready(Some(format!("{number}{}{}", this.separator, line.as_ref())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => self.source.size_hint(),
            None => (0, Some(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drain_async;
    use futures_util::{StreamExt, stream};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[tokio::test]
    async fn test_number_lines() {
        let numbered = drain_async(number_lines(stream::iter(["first", "second"]))).await;
        assert_eq!(numbered, vec!["1: first", "2: second"]);
    }

    #[tokio::test]
    async fn test_owned_lines_and_custom_format() {
        let lines = stream::iter(vec!["x".to_string(), "y".to_string()]);
        let config = NumberingConfig {
            start: 0,
            separator: " | ".to_string(),
        };
        let numbered = drain_async(number_lines_with(lines, config)).await;
        assert_eq!(numbered, vec!["0 | x", "1 | y"]);
    }

    #[tokio::test]
    async fn test_partial_consumption_does_not_pull_ahead() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let source = stream::iter(["a", "b", "c", "d"]).inspect({
            let pulled = Arc::clone(&pulled);
            move |_| {
                pulled.fetch_add(1, Ordering::SeqCst);
            }
        });
        let mut numbered = number_lines(source);

        assert_eq!(numbered.next().await.as_deref(), Some("1: a"));
        assert_eq!(numbered.next().await.as_deref(), Some("2: b"));
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
        assert_eq!(numbered.next_number(), Some(3));
    }

    #[tokio::test]
    async fn test_numbering_ends_at_last_representable_number() {
        let config = NumberingConfig {
            start: usize::MAX,
            ..NumberingConfig::default()
        };
        let mut numbered = number_lines_with(stream::iter(["a", "b"]), config);
        assert_eq!(numbered.next().await, Some(format!("{}: a", usize::MAX)));
        assert_eq!(numbered.next_number(), None);
        assert_eq!(numbered.next().await, None);
        assert_eq!(numbered.size_hint(), (0, Some(0)));
    }

    #[tokio::test]
    async fn test_each_pass_numbers_from_the_start() {
        let lines = ["p", "q"];
        let first = drain_async(number_lines(stream::iter(lines))).await;
        let second = drain_async(number_lines(stream::iter(lines))).await;
        assert_eq!(first, second);
    }
}
