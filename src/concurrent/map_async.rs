use std::future::Future;

use futures_util::future::try_join_all;

/// Runs `f` over every item with all calls in flight at once.
///
/// Results come back in input order whatever order the futures finish in. The
/// first error to surface wins and the remaining futures are dropped.
///
/// ```rust
/// use pledge::map_async;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let lengths = map_async(["one", "three"], |s| async move { Ok::<_, ()>(s.len()) }).await;
/// assert_eq!(lengths, Ok(vec![3, 5]));
/// # });
/// ```
pub async fn map_async<T, U, E, F, Fut>(items: impl IntoIterator<Item = T>, f: F) -> Result<Vec<U>, E>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
{
    try_join_all(items.into_iter().map(f)).await
}

/// [`map_async`], then keeps only the results for which `keep` returns true.
pub async fn map_filter_async<T, U, E, F, Fut, K>(
    items: impl IntoIterator<Item = T>,
    f: F,
    mut keep: K,
) -> Result<Vec<U>, E>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
    K: FnMut(&U) -> bool,
{
    let mapped = map_async(items, f).await?;
    Ok(mapped.into_iter().filter(|value| keep(value)).collect())
}
