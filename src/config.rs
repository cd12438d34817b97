use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tracing::trace;

use crate::{
    category::{Category, CategorySet},
    target::{DEFAULT_TARGET, Target, TargetError},
};

const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_HOT_THREADS: i64 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid statistics configuration: no category is enabled")]
    NoCategoryEnabled,

    #[error("polling period must be greater than zero")]
    ZeroPeriod,

    #[error("invalid target address `{address}`: {reason}")]
    InvalidTarget {
        address: String,
        #[source]
        reason: TargetError,
    },
}

/// Configuration as written in the config file. Every field is optional.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Time between two polls of the same target (e.g. `"10s"`)
    #[serde(default, with = "humantime_serde")]
    pub period: Option<Duration>,

    /// Base addresses of the nodes to poll
    pub urls: Option<Vec<String>>,

    /// Number of hot threads to request; zero or less disables hot threads
    pub hot_threads: Option<i64>,

    #[serde(default)]
    pub stats: StatsConfig,

    /// Per-request timeout handed to the HTTP client
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StatsConfig {
    pub events: Option<bool>,
    pub jvm: Option<bool>,
    pub process: Option<bool>,
    pub mem: Option<bool>,
    pub pipeline: Option<bool>,
}

/// Resolved, immutable configuration shared by every worker.
#[derive(Debug, Clone)]
pub struct Settings {
    pub period: Duration,
    pub targets: Vec<Target>,
    pub categories: CategorySet,
    pub hot_threads: u32,
    pub timeout: Duration,
}

impl Config {
    /// Apply defaults and validate.
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let period = self.period.unwrap_or(DEFAULT_PERIOD);
        if period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }

        let addresses = match &self.urls {
            Some(urls) if !urls.is_empty() => urls.clone(),
            _ => vec![DEFAULT_TARGET.to_string()],
        };

        let targets = addresses
            .into_iter()
            .map(|address| {
                Target::parse(&address)
                    .map_err(|reason| ConfigError::InvalidTarget { address, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let hot_threads = self.hot_threads.unwrap_or(DEFAULT_HOT_THREADS);
        let hot_threads = u32::try_from(hot_threads.max(0)).unwrap_or(u32::MAX);

        let StatsConfig {
            events,
            jvm,
            process,
            mem,
            pipeline,
        } = self.stats;

        let toggles = [
            (Category::Events, events.unwrap_or(true)),
            (Category::Jvm, jvm.unwrap_or(true)),
            (Category::Process, process.unwrap_or(true)),
            (Category::Mem, mem.unwrap_or(true)),
            (Category::Pipeline, pipeline.unwrap_or(true)),
            (Category::HotThreads, hot_threads > 0),
        ];

        let categories: CategorySet = toggles
            .into_iter()
            .filter_map(|(category, enabled)| enabled.then_some(category))
            .collect();

        if categories.is_empty() {
            return Err(ConfigError::NoCategoryEnabled);
        }

        Ok(Settings {
            period,
            targets,
            categories,
            hot_threads,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&file_content)
        .with_context(|| format!("invalid configuration file {path}"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
