//! # Confetti Replay
//!
//! Plays one reward celebration headlessly and reports when it ended.
//!
//! ```text
//! confetti_replay [config.toml]
//! ```
//!
//! Without a config file the defaults are used (1000x800, seed 42,
//! 2500 ms spawn duration, simulated 60 Hz clock). Set `RUST_LOG=debug`
//! for per-session engine logs.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use choreboard_canvas::{run_replay, CanvasResult, ReplayConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "confetti replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CanvasResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading replay config");
            ReplayConfig::from_file(path)?
        }
        None => ReplayConfig::default(),
    };

    let report = run_replay(&config)?;

    tracing::info!(
        seed = config.seed,
        width = config.viewport_width,
        height = config.viewport_height,
        spawn_duration_ms = config.spawn_duration_ms,
        ticks = report.summary.ticks,
        elapsed_ms = report.summary.elapsed_ms,
        last_particle_retired_tick = report.last_particle_retired_tick,
        "session terminated"
    );

    if let (Some(path), Some(snapshot)) = (&config.snapshot_path, &report.snapshot) {
        snapshot.write_ppm(BufWriter::new(File::create(path)?))?;
        tracing::info!(path = %path.display(), "snapshot written");
    } else if config.snapshot_tick.is_some() && report.snapshot.is_none() {
        tracing::warn!(
            snapshot_tick = config.snapshot_tick,
            "session ended before the snapshot tick"
        );
    }

    Ok(())
}
