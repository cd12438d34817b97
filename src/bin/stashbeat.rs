use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stashbeat::{
    actors::{
        collector::{join_workers, start_workers},
        shutdown,
    },
    config::{Config, read_config_file},
    fetch::HttpFetcher,
    sink::{EventSink, JsonLinesSink},
};
use tracing::{debug, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_LEVEL: &str = "STASHBEAT_LOG";

#[derive(Debug, Clone, Parser)]
#[command(about = "Polls Logstash node stats and prints them as JSON lines")]
struct Args {
    /// Config file (JSON); defaults apply when omitted
    #[arg(short, long)]
    file: Option<String>,
}

fn init() {
    dotenv::dotenv().ok();

    let level = std::env::var(LOG_LEVEL)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::INFO);

    let filter = filter::Targets::new().with_targets(vec![("stashbeat", level)]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };
    let settings = config.resolve().context("invalid configuration")?;
    debug!("resolved settings: {settings:?}");

    let fetcher = Arc::new(HttpFetcher::new(settings.timeout, settings.hot_threads)?);
    let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));

    let (trigger, listener) = shutdown::channel();
    let workers = start_workers(&settings, fetcher, sink.clone(), &listener);

    info!(
        "stashbeat is running with {} target(s)! Hit CTRL-C to stop it.",
        workers.len()
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for CTRL-C")?;
    trigger.trigger();

    for (target, stats) in join_workers(workers).await {
        info!(
            "{target}: {} ticks, {} events, {} failed fetches, {} overruns",
            stats.ticks, stats.events_published, stats.fetch_failures, stats.overruns
        );
    }

    sink.close();

    Ok(())
}
