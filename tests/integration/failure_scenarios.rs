//! Failure isolation tests
//!
//! A failing category must never stop the other categories, the next tick,
//! or the worker itself.

use std::sync::Arc;
use std::time::Duration;

use stashbeat::{
    actors::{collector::WorkerHandle, shutdown, ticker::ChannelTicker},
    category::Category,
    sink::BroadcastSink,
    target::Target,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_503_on_process_does_not_affect_events() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/_node/stats/events", create_events_json(1, 1, 1)).await;

    Mock::given(method("GET"))
        .and(path("/_node/stats/process"))
        .respond_with(ResponseTemplate::new(503))
        .expect(5)
        .mount(&mock_server)
        .await;

    let target = target_of(&mock_server);
    let settings = create_test_settings(
        vec![target.clone()],
        &[Category::Events, Category::Process],
    );

    let sink = Arc::new(BroadcastSink::new(16));
    let mut rx = sink.subscribe();
    let (trigger, listener) = shutdown::channel();
    let (tick_tx, ticker) = ChannelTicker::new(8);

    let handle =
        WorkerHandle::spawn_with_ticker(target, &settings, http_fetcher(), sink, ticker, listener);

    for _ in 0..5 {
        tick_tx.send(()).await.unwrap();
        let event = next_event(&mut rx).await;
        assert_eq!(event.category, Category::Events);
    }

    trigger.trigger();
    let stats = handle.join().await.unwrap();

    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.events_published, 5);
    assert_eq!(stats.fetch_failures, 5);
}

#[tokio::test]
async fn test_malformed_json_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/_node/stats/mem", serde_json::json!({ "mem": {} })).await;

    Mock::given(method("GET"))
        .and(path("/_node/stats/jvm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{invalid json"))
        .mount(&mock_server)
        .await;

    let target = target_of(&mock_server);
    let settings = create_test_settings(vec![target.clone()], &[Category::Jvm, Category::Mem]);

    let sink = Arc::new(BroadcastSink::new(16));
    let mut rx = sink.subscribe();
    let (trigger, listener) = shutdown::channel();
    let (tick_tx, ticker) = ChannelTicker::new(4);

    let handle =
        WorkerHandle::spawn_with_ticker(target, &settings, http_fetcher(), sink, ticker, listener);

    tick_tx.send(()).await.unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.category, Category::Mem);
    assert_eq!(event.counter, 1);

    trigger.trigger();
    let stats = handle.join().await.unwrap();
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_unreachable_node_keeps_worker_alive() {
    // Nothing listens on this port
    let target = Target::parse("http://127.0.0.1:9").unwrap();
    let settings = create_test_settings(vec![target.clone()], &[Category::Events]);

    let sink = Arc::new(BroadcastSink::new(16));
    let mut rx = sink.subscribe();
    let (trigger, listener) = shutdown::channel();
    let (tick_tx, ticker) = ChannelTicker::new(4);

    let handle =
        WorkerHandle::spawn_with_ticker(target, &settings, http_fetcher(), sink, ticker, listener);

    tick_tx.send(()).await.unwrap();
    tick_tx.send(()).await.unwrap();

    let nothing = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(nothing.is_err(), "no event may be published on failure");

    trigger.trigger();
    let stats = handle.join().await.unwrap();
    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.events_published, 0);
    assert_eq!(stats.fetch_failures, 2);
}

#[tokio::test]
async fn test_category_recovers_on_next_tick() {
    let mock_server = MockServer::start().await;

    // First request fails, later ones fall through to the healthy mock
    Mock::given(method("GET"))
        .and(path("/_node/stats/events"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_json(&mock_server, "/_node/stats/events", create_events_json(7, 7, 7)).await;

    let target = target_of(&mock_server);
    let settings = create_test_settings(vec![target.clone()], &[Category::Events]);

    let sink = Arc::new(BroadcastSink::new(16));
    let mut rx = sink.subscribe();
    let (trigger, listener) = shutdown::channel();
    let (tick_tx, ticker) = ChannelTicker::new(4);

    let handle =
        WorkerHandle::spawn_with_ticker(target, &settings, http_fetcher(), sink, ticker, listener);

    tick_tx.send(()).await.unwrap();
    let nothing = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(nothing.is_err(), "the failed tick must not publish");

    tick_tx.send(()).await.unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.category, Category::Events);
    assert_eq!(event.counter, 1);

    trigger.trigger();
    let stats = handle.join().await.unwrap();

    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.events_published, 1);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_disabled_category_is_never_requested() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/_node/stats/events", create_events_json(1, 1, 1)).await;

    Mock::given(method("GET"))
        .and(path("/_node/hot_threads"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let target = target_of(&mock_server);
    let settings = create_test_settings(vec![target.clone()], &[Category::Events]);

    let sink = Arc::new(BroadcastSink::new(16));
    let mut rx = sink.subscribe();
    let (trigger, listener) = shutdown::channel();
    let (tick_tx, ticker) = ChannelTicker::new(4);

    let handle =
        WorkerHandle::spawn_with_ticker(target, &settings, http_fetcher(), sink, ticker, listener);

    for _ in 0..3 {
        tick_tx.send(()).await.unwrap();
        next_event(&mut rx).await;
    }

    trigger.trigger();
    handle.join().await.unwrap();
}
