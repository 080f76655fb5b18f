//! Drowsiness & Lane Monitor - Main Entry Point

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use monitor::{init_logging, AppConfig, Args, FrameLoop, LoopStats, MonitorError};
use tokio::runtime::Handle;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut config);
    config.validate()?;

    init_logging(&config.logging)?;

    info!("=== Drowsy Lane Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    shutdown.store(true, Ordering::SeqCst);
                }
                Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
            }
        });
    }

    // Sources and the window may not be Send, so the loop is built on the
    // blocking thread that runs it.
    let runtime = Handle::current();
    let stats = tokio::task::spawn_blocking(move || -> Result<LoopStats, MonitorError> {
        let mut frame_loop = FrameLoop::from_config(&config, runtime)?.with_shutdown(shutdown);
        Ok(frame_loop.run())
    })
    .await
    .context("frame loop thread panicked")??;

    info!(
        "Processed {} frames ({} road gaps, {} alarms)",
        stats.frames, stats.lane_gaps, stats.alarms_raised
    );
    Ok(())
}
