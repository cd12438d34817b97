//! Destinations for finished metric events
//!
//! Sinks are shared by every poll worker, so `publish` takes `&self` and must
//! be safe to call concurrently. Delivery is fire-and-forget: workers never
//! wait for an acknowledgment.

use std::io::Write;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::{error, trace};

use crate::actors::messages::MetricEvent;

pub trait EventSink: Send + Sync + 'static {
    fn publish(&self, event: MetricEvent);

    /// Flush and release whatever the sink holds. Called once by the host
    /// after every worker has stopped.
    fn close(&self) {}
}

/// Fans events out to every subscriber of a broadcast channel.
///
/// Slow subscribers lag and lose events, which is acceptable for
/// continuously produced stats.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<MetricEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for BroadcastSink {
    fn publish(&self, event: MetricEvent) {
        // Send errors only mean nobody is subscribed right now.
        match self.sender.send(event) {
            Ok(num_receivers) => {
                trace!("published metric event to {num_receivers} receivers");
            }
            Err(_) => {
                trace!("no receivers for metric event");
            }
        }
    }
}

/// Writes each event as one line of JSON.
///
/// `publish` writes synchronously under a lock, so the calling worker blocks
/// for the duration of the write. That is fine for stdout, a file or an
/// in-memory buffer at one event per category and tick. Writers that can
/// stall (pipes without a reader, network streams) belong behind a
/// [`BroadcastSink`] with a dedicated consumer task instead.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send + 'static> EventSink for JsonLinesSink<W> {
    fn publish(&self, event: MetricEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                error!("failed to serialize {} event: {e}", event.category);
                return;
            }
        };

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(e) = writeln!(writer, "{line}") {
            error!("failed to write {} event: {e}", event.category);
        }
    }

    fn close(&self) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(e) = writer.flush() {
            error!("failed to flush event sink: {e}");
        }
    }
}
