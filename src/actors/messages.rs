//! Message types produced by the poll workers
//!
//! ## Design Principles
//!
//! 1. **One event per category**: each successful fetch becomes its own event
//! 2. **Immutability**: events are cloneable so sinks can fan them out
//! 3. **Transient**: workers hand events to the sink and keep no history

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    EventsStats, HotThreadsReport, JvmStats, MemStats, PipelineStats, ProcessStats,
    category::Category,
};

/// Decoded body of one successful category fetch.
///
/// Serialized externally tagged, so a flattened payload shows up under its
/// category tag (`"jvm": {...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Events(EventsStats),
    Jvm(JvmStats),
    Process(ProcessStats),
    Mem(MemStats),
    Pipeline(PipelineStats),
    HotThreads(HotThreadsReport),
}

impl Payload {
    pub fn category(&self) -> Category {
        match self {
            Payload::Events(_) => Category::Events,
            Payload::Jvm(_) => Category::Jvm,
            Payload::Process(_) => Category::Process,
            Payload::Mem(_) => Category::Mem,
            Payload::Pipeline(_) => Category::Pipeline,
            Payload::HotThreads(_) => Category::HotThreads,
        }
    }
}

/// Event handed to the [`EventSink`](crate::sink::EventSink) for every
/// successfully fetched category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEvent {
    /// When the event was published
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Category tag, always equal to `payload.category()`
    #[serde(rename = "type")]
    pub category: Category,

    /// Per-target sequence number, starting at 1
    pub counter: u64,

    /// Base address of the node the stats came from
    pub target: String,

    #[serde(flatten)]
    pub payload: Payload,
}

impl MetricEvent {
    /// Wrap a payload, stamping it with the current time.
    pub fn new(target: impl Into<String>, counter: u64, payload: Payload) -> Self {
        Self {
            timestamp: Utc::now(),
            category: payload.category(),
            counter,
            target: target.into(),
            payload,
        }
    }
}

/// Summary of a worker's lifetime, returned once it has terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Collection cycles run (one per timer firing)
    pub ticks: u64,

    /// Events handed to the sink
    pub events_published: u64,

    /// Category fetches that failed
    pub fetch_failures: u64,

    /// Cycles that took longer than the period
    pub overruns: u64,
}
