pub mod actors;
pub mod category;
pub mod config;
pub mod fetch;
pub mod sink;
pub mod target;

use serde::{Deserialize, Serialize};

/// Event counters of the whole node (`/_node/stats/events`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsStats {
    #[serde(rename = "in")]
    pub input: u64,
    pub filtered: u64,
    pub out: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JvmStats {
    pub threads: ThreadStats,
    pub mem: MemStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadStats {
    pub count: u64,
    pub peak_count: u64,
}

/// Heap and non-heap usage, reported both under `jvm.mem` and by `/_node/stats/mem`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemStats {
    pub heap_used_in_bytes: i64,
    pub heap_used_percent: i64,
    pub heap_committed_in_bytes: i64,
    pub heap_max_in_bytes: i64,
    pub non_heap_used_in_bytes: i64,
    pub non_heap_committed_in_bytes: i64,
    pub pools: MemPools,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemPools {
    pub survivor: MemPool,
    pub old: MemPool,
    pub young: MemPool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemPool {
    pub peak_used_in_bytes: u64,
    pub used_in_bytes: u64,
    pub peak_max_in_bytes: u64,
    pub max_in_bytes: u64,
    pub committed_in_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessStats {
    pub open_file_descriptors: i64,
    pub peak_open_file_descriptors: i64,
    pub max_file_descriptors: i64,
    pub cpu: CpuStats,
    pub mem: ProcessMemStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub percent: u64,
    pub total_in_millis: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessMemStats {
    pub total_virtual_in_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStats {
    pub events: EventsStats,
    pub plugins: PipelinePlugins,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelinePlugins {
    pub inputs: Vec<PluginStats>,
    pub filters: Vec<PluginStats>,
    pub outputs: Vec<PluginStats>,
}

/// Throughput of a single pipeline plugin.
///
/// The match/failure counters only exist for some filters (grok, date, ...),
/// so they are skipped on output when the node did not report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginStats {
    pub name: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns_per_field: Option<serde_json::Value>,
    pub events: PluginEvents,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginEvents {
    pub duration_in_millis: u64,
    #[serde(rename = "in")]
    pub input: u64,
    pub out: u64,
}

/// Document returned by `/_node/hot_threads`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotThreadsReport {
    pub host: String,
    pub version: String,
    pub http_address: String,
    pub hot_threads: HotThreads,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotThreads {
    pub time: String,
    pub busiest_threads: u32,
    pub threads: Vec<HotThread>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotThread {
    pub name: String,
    pub percent_of_cpu_time: f32,
    pub state: String,
    pub traces: Vec<String>,
}
