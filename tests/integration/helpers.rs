//! Helper functions for integration tests

use std::sync::Arc;
use std::time::Duration;

use stashbeat::{
    actors::messages::MetricEvent,
    category::{Category, CategorySet},
    config::Settings,
    fetch::{Fetcher, HttpFetcher},
    target::Target,
};
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn target_of(server: &MockServer) -> Target {
    Target::parse(&server.uri()).unwrap()
}

pub fn create_test_settings(targets: Vec<Target>, categories: &[Category]) -> Settings {
    Settings {
        period: Duration::from_secs(10),
        targets,
        categories: categories.iter().copied().collect::<CategorySet>(),
        hot_threads: 3,
        timeout: Duration::from_secs(5),
    }
}

pub fn http_fetcher() -> Arc<dyn Fetcher> {
    Arc::new(HttpFetcher::new(Duration::from_secs(5), 3).unwrap())
}

/// Wait for the next event, failing the test after one second.
pub async fn next_event(rx: &mut broadcast::Receiver<MetricEvent>) -> MetricEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

pub async fn mount_json(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn create_events_json(input: u64, filtered: u64, out: u64) -> serde_json::Value {
    serde_json::json!({
        "host": "logstash-test",
        "version": "5.0.0",
        "events": { "in": input, "filtered": filtered, "out": out }
    })
}

pub fn create_jvm_json(heap_used: i64) -> serde_json::Value {
    serde_json::json!({
        "host": "logstash-test",
        "jvm": {
            "threads": { "count": 24, "peak_count": 26 },
            "mem": {
                "heap_used_in_bytes": heap_used,
                "heap_used_percent": 9,
                "heap_committed_in_bytes": 259522560,
                "heap_max_in_bytes": 1037959168,
                "non_heap_used_in_bytes": 128000000,
                "non_heap_committed_in_bytes": 136000000,
                "pools": {
                    "survivor": { "used_in_bytes": 8912896, "max_in_bytes": 35782656 },
                    "old": { "used_in_bytes": 60000000, "max_in_bytes": 715849728 },
                    "young": { "used_in_bytes": 31087104, "max_in_bytes": 286326784 }
                }
            }
        }
    })
}

pub fn create_pipeline_json() -> serde_json::Value {
    serde_json::json!({
        "pipeline": {
            "events": { "in": 100, "filtered": 100, "out": 90 },
            "plugins": {
                "inputs": [],
                "filters": [
                    {
                        "id": "grok_1",
                        "name": "grok",
                        "matches": 95,
                        "failures": 5,
                        "patterns_per_field": { "message": 1 },
                        "events": { "duration_in_millis": 120, "in": 100, "out": 100 }
                    }
                ],
                "outputs": [
                    {
                        "id": "es_1",
                        "name": "elasticsearch",
                        "events": { "duration_in_millis": 800, "in": 100, "out": 90 }
                    }
                ]
            }
        }
    })
}
