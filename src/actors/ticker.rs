//! Timers driving the poll workers

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// "Wait for the next tick" as seen by a worker.
#[async_trait]
pub trait Ticker: Send + 'static {
    async fn tick(&mut self);
}

/// Fixed-period ticker on the tokio clock.
///
/// The first tick fires one period after creation. Ticks missed while a
/// collection was running are skipped rather than delivered in a burst.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker fired by hand through a channel.
///
/// Once every sender is gone the ticker never fires again.
#[derive(Debug)]
pub struct ChannelTicker {
    receiver: mpsc::Receiver<()>,
}

impl ChannelTicker {
    pub fn new(buffer: usize) -> (mpsc::Sender<()>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self { receiver })
    }
}

#[async_trait]
impl Ticker for ChannelTicker {
    async fn tick(&mut self) {
        if self.receiver.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}
