//! Demo binary: two producer threads publish events at random intervals, one
//! looper thread processes them. Runs until SIGINT/SIGTERM/SIGQUIT, then
//! stops every thread cooperatively and exits with code 130.
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use looper::{Config, EventBus, LogWriter, Looper, ProducerPool, shutdown};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();

    let cfg = Config::default();
    info!(
        main = thread::current().name().unwrap_or("<unnamed>"),
        producers = cfg.producer_count,
        min_delay_ms = cfg.min_delay_ms,
        max_delay_ms = cfg.max_delay_ms,
        "starting"
    );

    let bus = Arc::new(EventBus::new());
    let looper = Looper::builder()
        .with_observer(Arc::new(LogWriter::new()))
        .build();

    // The looper listener must be registered before the first publish.
    let handle = looper.spawn(&bus).context("starting looper")?;
    let producers = ProducerPool::spawn(&cfg, Arc::clone(&bus)).context("starting producers")?;

    let signal = shutdown::wait_for_signal()
        .await
        .context("installing signal handlers")?;
    info!(%signal, "shutdown requested");

    let (published, joined) = tokio::task::spawn_blocking(move || {
        let published = producers.shutdown();
        let joined = handle.shutdown();
        (published, joined)
    })
    .await
    .context("joining runtime threads")?;

    match published {
        Ok(counts) => info!(?counts, "producers stopped"),
        Err(err) => error!(error = err.as_label(), "producers stopped: {err}"),
    }
    joined.context("stopping looper")?;

    let stats = looper.stats();
    info!(
        received = stats.received,
        executed = stats.executed,
        failed = stats.failed,
        "looper stopped"
    );

    Ok(ExitCode::from(shutdown::INTERRUPTED_EXIT_CODE))
}
