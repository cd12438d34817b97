//! Per-category fetchers for the Logstash node API
//!
//! Every fetch is a single GET against a fixed path of a [`Target`], followed by
//! a JSON decode. There are no retries: a failed category is simply tried
//! again on the next tick.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::trace;

use crate::{
    EventsStats, HotThreadsReport, JvmStats, MemStats, PipelineStats, ProcessStats,
    actors::messages::Payload, category::Category, target::Target,
};

/// Why a category could not be collected on this tick.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS or timeout failure, or the body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a non-2xx status
    #[error("HTTP error: {0}")]
    Status(StatusCode),

    /// The body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of category payloads for a target.
///
/// The poll worker only talks to this trait, so tests can swap the network
/// for scripted results.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, target: &Target, category: Category) -> Result<Payload, FetchError>;
}

#[derive(Deserialize)]
struct EventsResponse {
    events: EventsStats,
}

#[derive(Deserialize)]
struct JvmResponse {
    jvm: JvmStats,
}

#[derive(Deserialize)]
struct ProcessResponse {
    process: ProcessStats,
}

#[derive(Deserialize)]
struct MemResponse {
    mem: MemStats,
}

#[derive(Deserialize)]
struct PipelineResponse {
    pipeline: PipelineStats,
}

/// [`Fetcher`] backed by a shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client (reused across requests and targets)
    client: reqwest::Client,

    /// Number of threads requested from the hot threads endpoint
    hot_threads: u32,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, hot_threads: u32) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, hot_threads))
    }

    pub fn with_client(client: reqwest::Client, hot_threads: u32) -> Self {
        Self {
            client,
            hot_threads,
        }
    }

    pub async fn fetch_events(&self, target: &Target) -> Result<EventsStats, FetchError> {
        let response: EventsResponse = self.get_json(target, Category::Events.path()).await?;
        Ok(response.events)
    }

    pub async fn fetch_jvm(&self, target: &Target) -> Result<JvmStats, FetchError> {
        let response: JvmResponse = self.get_json(target, Category::Jvm.path()).await?;
        Ok(response.jvm)
    }

    pub async fn fetch_process(&self, target: &Target) -> Result<ProcessStats, FetchError> {
        let response: ProcessResponse = self.get_json(target, Category::Process.path()).await?;
        Ok(response.process)
    }

    pub async fn fetch_mem(&self, target: &Target) -> Result<MemStats, FetchError> {
        let response: MemResponse = self.get_json(target, Category::Mem.path()).await?;
        Ok(response.mem)
    }

    pub async fn fetch_pipeline(&self, target: &Target) -> Result<PipelineStats, FetchError> {
        let response: PipelineResponse = self.get_json(target, Category::Pipeline.path()).await?;
        Ok(response.pipeline)
    }

    pub async fn fetch_hot_threads(&self, target: &Target) -> Result<HotThreadsReport, FetchError> {
        let path = format!(
            "{}?threads={}",
            Category::HotThreads.path(),
            self.hot_threads
        );
        self.get_json(target, &path).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        target: &Target,
        path: &str,
    ) -> Result<T, FetchError> {
        trace!("requesting {target}{path}");

        let response = self.client.get(target.endpoint(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target, category: Category) -> Result<Payload, FetchError> {
        let payload = match category {
            Category::Events => Payload::Events(self.fetch_events(target).await?),
            Category::Jvm => Payload::Jvm(self.fetch_jvm(target).await?),
            Category::Process => Payload::Process(self.fetch_process(target).await?),
            Category::Mem => Payload::Mem(self.fetch_mem(target).await?),
            Category::Pipeline => Payload::Pipeline(self.fetch_pipeline(target).await?),
            Category::HotThreads => Payload::HotThreads(self.fetch_hot_threads(target).await?),
        };

        trace!("decoded {category} payload: {payload:?}");

        Ok(payload)
    }
}
