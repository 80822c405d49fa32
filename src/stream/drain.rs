use std::pin::pin;

use futures_util::{Stream, StreamExt};

/// Consumes `stream` to the end and returns its items in production order.
///
/// The caller is suspended only while the next item is not yet available.
///
/// ```rust
/// use futures_util::stream;
/// use pledge::drain_async;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// assert_eq!(drain_async(stream::iter(["a", "b"])).await, vec!["a", "b"]);
/// # });
/// ```
pub async fn drain_async<S: Stream>(stream: S) -> Vec<S::Item> {
    let mut stream = pin!(stream);
    let (lower, _) = stream.size_hint();
    let mut items = Vec::with_capacity(lower);
    while let Some(item) = stream.next().await {
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::time::Duration;

    #[tokio::test]
    async fn test_drain_arrays() {
        assert!(drain_async(stream::iter(Vec::<&str>::new())).await.is_empty());
        assert_eq!(drain_async(stream::iter(["a", "b"])).await, vec!["a", "b"]);
        assert_eq!(drain_async(stream::iter(["a", "b", "c"])).await, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_waits_for_slow_items() {
        let slow = stream::iter([3_u64, 1, 2]).then(|ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            ms
        });
        assert_eq!(drain_async(slow).await, vec![3, 1, 2]);
    }
}
