//! Retry budget behavior against a flaky mock endpoint.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use httpexchange::client::{
    CallArgs, ClientProxy, ExchangeDescriptor, MethodDescriptor, RetryPolicy, TransportConfig,
};

/// Server that fails every odd-numbered request with 503 and answers the
/// even-numbered ones.
fn flaky_server(hits: Arc<AtomicUsize>) -> String {
    common::spawn_server(move |req| {
        let n = hits.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            common::respond_json(req, 503, r#""unavailable""#);
        } else {
            common::respond_json(req, 200, r#""recovered""#);
        }
    })
}

fn flaky_descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor::new("FlakyApi")
        .route(MethodDescriptor::new("poke", http::Method::GET, "/poke"))
}

#[tokio::test]
async fn retry_budget_absorbs_transient_failures() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = flaky_server(Arc::clone(&hits));
    let transport =
        TransportConfig::new(base).retry(RetryPolicy::new(2).on_status([503]));
    let client = ClientProxy::new(flaky_descriptor(), transport).unwrap();

    // Every call fails once and succeeds on the retry.
    for _ in 0..4 {
        let reply: String = client.invoke("poke", CallArgs::new()).await.unwrap();
        assert_eq!(reply, "recovered");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn without_retry_every_other_call_fails() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = flaky_server(Arc::clone(&hits));
    let client =
        ClientProxy::new(flaky_descriptor(), TransportConfig::new(base)).unwrap();

    let mut failures = 0;
    for _ in 0..4 {
        if client
            .invoke_raw("poke", CallArgs::new())
            .await
            .is_err()
        {
            failures += 1;
        }
    }
    assert_eq!(failures, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn unlisted_statuses_are_not_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let base = common::spawn_server(move |req| {
        counter.fetch_add(1, Ordering::SeqCst);
        common::respond_json(req, 404, r#""missing""#);
    });
    let transport =
        TransportConfig::new(base).retry(RetryPolicy::new(3).on_status([503]));
    let client = ClientProxy::new(flaky_descriptor(), transport).unwrap();

    let err = client.invoke_raw("poke", CallArgs::new()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(hits.load(Ordering::SeqCst), 1, "404 must not spend the budget");
}

#[test]
fn blocking_style_spends_the_same_budget() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = flaky_server(Arc::clone(&hits));
    let transport =
        TransportConfig::new(base).retry(RetryPolicy::new(2).on_status([503]));
    let client = ClientProxy::new(flaky_descriptor(), transport).unwrap();

    for _ in 0..2 {
        let reply: String = client.invoke_blocking("poke", CallArgs::new()).unwrap();
        assert_eq!(reply, "recovered");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}
