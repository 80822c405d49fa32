use std::{sync::mpsc, time::Duration};

use futures_util::stream;
use pledge::{
    Completion, Deferred, Error, Generator, Nested, Settlement, cycle, delay, drain_async,
    filter_sequence, flatten_nested, from_iter, map_cb, number_lines, promisify, timeout,
};

type Mapped<U> = Result<Vec<U>, Error<String>>;

fn collect_map<T, U>(
    items: Option<Vec<T>>,
    transform: impl FnMut(T, usize, Completion<U, String>),
) -> Vec<Mapped<U>>
where
    U: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    map_cb(items, transform, move |result| tx.send(result).unwrap());
    rx.try_iter().collect()
}

#[tokio::test]
async fn promisify_fulfills_and_rejects() {
    let ok = promisify(|n: u32, done: Completion<u32, &'static str>| done.ok(n + 1));
    assert_eq!(ok(41).await, Ok(42));

    let fail = promisify(|_: u32, done: Completion<u32, &'static str>| done.err("boom"));
    assert_eq!(fail(0).await, Err(Error::Underlying("boom")));
}

#[tokio::test]
async fn promisify_never_settles_before_returning() {
    let echo = promisify(|n: u32, done: Completion<u32, &'static str>| done.ok(n));
    let deferred = echo(7);
    assert!(!deferred.is_settled());
    assert_eq!(deferred.await, Ok(7));
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_loses_to_same_turn_settlement() {
    let (resolver, deferred) = Deferred::<u32, Error<&str>>::pending();
    let raced = timeout(Duration::ZERO, &deferred);
    resolver.fulfill(5);
    assert_eq!(raced.await, Ok(5));
}

#[tokio::test(start_paused = true)]
async fn timeout_rejects_slow_values() {
    let slow: Deferred<(), Error<String>> = delay(Duration::from_millis(1000));
    let err = timeout(Duration::from_millis(500), &slow).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "timeout after 500 ms");
}

#[tokio::test]
async fn timeout_forwards_settled_values() {
    let ok = Deferred::<u32, Error<&str>>::fulfilled(123);
    assert_eq!(timeout(Duration::ZERO, &ok).await, Ok(123));

    let err = Deferred::<u32, Error<&str>>::rejected(Error::Underlying("x"));
    assert_eq!(timeout(Duration::ZERO, &err).await, Err(Error::Underlying("x")));
}

#[test]
fn map_cb_reports_exactly_once() {
    let upper = collect_map(Some(vec!["foo", "bar", "baz"]), |s: &str, _, done| {
        done.ok(s.to_uppercase());
    });
    assert_eq!(
        upper,
        vec![Ok(vec!["FOO".to_string(), "BAR".to_string(), "BAZ".to_string()])]
    );

    let invalid = collect_map(None::<Vec<u8>>, |n, _, done: Completion<u8, String>| done.ok(n));
    assert_eq!(invalid.len(), 1);
    assert!(matches!(invalid[0], Err(Error::InvalidArgument(_))));

    let empty = collect_map(Some(Vec::<u8>::new()), |n, _, done: Completion<u8, String>| done.ok(n));
    assert_eq!(empty, vec![Ok(vec![])]);
}

#[tokio::test(start_paused = true)]
async fn map_cb_orders_by_index_not_completion() {
    let (tx, rx) = mpsc::channel();
    map_cb(
        Some(vec![0, 0, 0, 0]),
        |_, index, done: Completion<usize, String>| {
            let wait = Duration::from_millis(40 - 10 * index as u64);
            tokio::spawn(async move {
                tokio::time::sleep(wait).await;
                done.ok(index);
            });
        },
        move |result| tx.send(result).unwrap(),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Ok(vec![0, 1, 2, 3])]);
}

#[test]
fn cycle_behaviour() {
    assert_eq!(cycle(Vec::<&str>::new()).iter().count(), 0);
    assert_eq!(cycle(["single"]).iter().take(3).collect::<Vec<_>>(), ["single"; 3]);
    assert_eq!(
        cycle(["a", "b", "c"]).iter().take(5).collect::<Vec<_>>(),
        ["a", "b", "c", "a", "b"]
    );
}

#[test]
fn flatten_behaviour() {
    assert_eq!(flatten_nested(Nested::<&str>::seq([])).iter().count(), 0);
    let s = Nested::scalar;
    let value = Nested::seq([s("a"), Nested::seq([s("b"), Nested::seq([s("c")])]), s("d")]);
    assert_eq!(flatten_nested(value).iter().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
}

#[test]
fn filter_by_index_parity() {
    let even = filter_sequence(from_iter(["a", "b", "c", "d"]), |_: &&str, i| i % 2 == 0);
    assert_eq!(even.iter().collect::<Vec<_>>(), ["a", "c"]);
}

#[tokio::test]
async fn number_lines_round_trip() {
    let numbered = drain_async(number_lines(stream::iter(["first", "second"]))).await;
    assert_eq!(numbered, ["1: first", "2: second"]);
}

#[tokio::test]
async fn draining_twice_is_idempotent() {
    fn letters() -> impl Generator<&'static str, Return = ()> {
        let s = Nested::scalar;
        filter_sequence(
            flatten_nested(Nested::seq([s("x"), Nested::seq([s("y"), s("z")])])),
            |_: &&str, i| i != 1,
        )
    }
    assert_eq!(letters().iter().collect::<Vec<_>>(), letters().iter().collect::<Vec<_>>());

    let first = drain_async(stream::iter(cycle([1, 2]).iter().take(4))).await;
    let second = drain_async(stream::iter(cycle([1, 2]).iter().take(4))).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn settlement_is_terminal() {
    let (resolver, deferred) = Deferred::<u8, Error<String>>::pending();
    let raced = timeout(Duration::from_secs(60), &deferred);
    resolver.fulfill(1);
    assert_eq!(raced.await, Ok(1));
    assert_eq!(deferred.settlement(), Some(Settlement::Fulfilled(1)));
}
