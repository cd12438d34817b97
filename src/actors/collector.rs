//! PollWorker - Polls one Logstash node for its enabled stats categories
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → fetch each enabled category → wrap Ok payloads in MetricEvents → EventSink
//!     ↑
//!     └─── Shutdown signal (observed between ticks)
//! ```
//!
//! Failures are isolated per category: a failed fetch is logged and skipped,
//! the remaining categories of the same tick are still collected, and the
//! category is tried again on the next tick.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    category::CategorySet, config::Settings, fetch::Fetcher, sink::EventSink, target::Target,
};

use super::messages::{MetricEvent, Payload, WorkerStats};
use super::shutdown::ShutdownListener;
use super::ticker::{IntervalTicker, Ticker};

/// Worker serving a single target
///
/// Ticks are strictly sequential: the next collection only starts once the
/// previous one has published everything.
pub struct PollWorker<T> {
    /// Node this worker polls (owned, never shared with another worker)
    target: Target,

    /// Enabled categories, iterated in collection order
    categories: CategorySet,

    /// Configured period, used for overrun detection
    period: Duration,

    fetcher: Arc<dyn Fetcher>,

    sink: Arc<dyn EventSink>,

    ticker: T,

    shutdown: ShutdownListener,

    /// Counter value of the next published event
    counter: u64,

    stats: WorkerStats,
}

impl<T: Ticker> PollWorker<T> {
    pub fn new(
        target: Target,
        settings: &Settings,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn EventSink>,
        ticker: T,
        shutdown: ShutdownListener,
    ) -> Self {
        Self {
            target,
            categories: settings.categories,
            period: settings.period,
            fetcher,
            sink,
            ticker,
            shutdown,
            counter: 1,
            stats: WorkerStats::default(),
        }
    }

    /// Run until the shutdown signal is observed
    ///
    /// The signal is checked before every wait and wins over a tick that is
    /// ready at the same time, so no collection starts after shutdown.
    #[instrument(skip(self), fields(target = %self.target))]
    pub async fn run(mut self) -> WorkerStats {
        debug!("starting poll worker");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.wait() => {
                    debug!("received shutdown signal");
                    break;
                }

                _ = self.ticker.tick() => {
                    self.poll_cycle().await;
                }
            }
        }

        debug!("poll worker stopped");
        self.stats
    }

    /// One tick: collect every enabled category, then publish the results.
    async fn poll_cycle(&mut self) {
        let started = Instant::now();
        self.stats.ticks += 1;

        let payloads = self.collect().await;
        self.publish(payloads);

        let elapsed = started.elapsed();
        if elapsed > self.period {
            self.stats.overruns += 1;
            warn!(
                ?elapsed,
                period = ?self.period,
                "tick(s) dropped due to processing exceeding the period"
            );
        }
    }

    async fn collect(&mut self) -> Vec<Payload> {
        let mut payloads = Vec::with_capacity(self.categories.len());

        for category in self.categories.iter() {
            debug!("{category} stats for {}", self.target);

            match self.fetcher.fetch(&self.target, category).await {
                Ok(payload) => payloads.push(payload),
                Err(e) => {
                    self.stats.fetch_failures += 1;
                    warn!("failed to fetch {category} stats: {e}");
                }
            }
        }

        payloads
    }

    fn publish(&mut self, payloads: Vec<Payload>) {
        for payload in payloads {
            let category = payload.category();
            let event = MetricEvent::new(self.target.as_str(), self.counter, payload);

            self.sink.publish(event);
            info!("{category} stats sent (counter {})", self.counter);

            self.counter += 1;
            self.stats.events_published += 1;
        }
    }
}

/// Handle to a spawned [`PollWorker`]
pub struct WorkerHandle {
    pub target: Target,

    join: JoinHandle<WorkerStats>,
}

impl WorkerHandle {
    /// Spawn a worker driven by a real [`IntervalTicker`].
    pub fn spawn(
        target: Target,
        settings: &Settings,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn EventSink>,
        shutdown: ShutdownListener,
    ) -> Self {
        let ticker = IntervalTicker::new(settings.period);
        Self::spawn_with_ticker(target, settings, fetcher, sink, ticker, shutdown)
    }

    pub fn spawn_with_ticker<T: Ticker>(
        target: Target,
        settings: &Settings,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn EventSink>,
        ticker: T,
        shutdown: ShutdownListener,
    ) -> Self {
        let worker = PollWorker::new(target.clone(), settings, fetcher, sink, ticker, shutdown);

        Self {
            target,
            join: tokio::spawn(worker.run()),
        }
    }

    /// Wait for the worker to terminate. Only returns after shutdown.
    pub async fn join(self) -> anyhow::Result<WorkerStats> {
        Ok(self.join.await?)
    }
}

/// Start one worker per configured target.
pub fn start_workers(
    settings: &Settings,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn EventSink>,
    shutdown: &ShutdownListener,
) -> Vec<WorkerHandle> {
    settings
        .targets
        .iter()
        .map(|target| {
            debug!(
                "starting worker for {target}: period {:?}, categories {:?}",
                settings.period,
                settings.categories.iter().collect::<Vec<_>>()
            );
            WorkerHandle::spawn(
                target.clone(),
                settings,
                fetcher.clone(),
                sink.clone(),
                shutdown.clone(),
            )
        })
        .collect()
}

/// Wait for every worker and pair its stats with its target.
///
/// Workers that panicked are logged and left out.
pub async fn join_workers(handles: Vec<WorkerHandle>) -> Vec<(Target, WorkerStats)> {
    let joins = handles.into_iter().map(|handle| async move {
        let target = handle.target.clone();
        match handle.join().await {
            Ok(stats) => Some((target, stats)),
            Err(e) => {
                error!("worker for {target} failed: {e:#}");
                None
            }
        }
    });

    join_all(joins).await.into_iter().flatten().collect()
}
