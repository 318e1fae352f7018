//! # Headless Replay
//!
//! Plays one complete celebration on a [`HeadlessHost`] and reports how it
//! went. With a simulated clock the whole session runs in a few
//! milliseconds and is fully reproducible from the seed.

use choreboard_confetti::{
    FixedStepClock, FrameClock, LifecycleController, RealtimeClock, SessionSummary, TickOutcome,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::ReplayConfig;
use crate::error::CanvasResult;
use crate::headless::{HeadlessHost, HostLog};
use crate::raster::Raster;

/// Outcome of a replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Session statistics from the terminating tick.
    pub summary: SessionSummary,
    /// First tick after which no particle was active.
    pub last_particle_retired_tick: Option<u64>,
    /// Frame captured at `snapshot_tick`, if it was reached.
    pub snapshot: Option<Raster>,
    /// Host resource log after termination.
    pub host_log: HostLog,
}

/// Runs a full session as described by `config`.
///
/// # Errors
///
/// Returns [`CanvasError::Confetti`](crate::CanvasError::Confetti) if the
/// session cannot start.
pub fn run_replay(config: &ReplayConfig) -> CanvasResult<ReplayReport> {
    if config.realtime {
        drive(config, RealtimeClock::default())
    } else {
        drive(config, FixedStepClock::new(0.0, config.frame_interval_ms))
    }
}

fn drive<C: FrameClock>(config: &ReplayConfig, clock: C) -> CanvasResult<ReplayReport> {
    let host = HeadlessHost::new(config.viewport(), config.device_pixel_ratio);
    let handle = host.handle();
    let mut controller =
        LifecycleController::new(host, ChaCha8Rng::seed_from_u64(config.seed), clock);

    controller.start(config.spawn_duration_ms)?;

    let mut snapshot = None;
    let mut last_particle_retired_tick = None;
    let mut tick = 0u64;

    let summary = loop {
        let now_ms = controller.clock_mut().next_frame();
        let outcome = controller.tick(now_ms);
        tick += 1;

        if Some(tick) == config.snapshot_tick {
            snapshot = controller
                .surface()
                .cloned()
                .or_else(|| handle.take_released_surface());
        }

        match outcome {
            TickOutcome::Continue { active } => {
                if active == 0 && last_particle_retired_tick.is_none() {
                    last_particle_retired_tick = Some(tick);
                }
            }
            TickOutcome::Terminated(summary) => {
                last_particle_retired_tick.get_or_insert(tick);
                break summary;
            }
            // Unreachable after a successful start; treat as an empty session
            TickOutcome::Idle => {
                break SessionSummary {
                    ticks: 0,
                    elapsed_ms: 0.0,
                };
            }
        }
    };

    tracing::debug!(ticks = summary.ticks, "replay finished");

    Ok(ReplayReport {
        summary,
        last_particle_retired_tick,
        snapshot,
        host_log: handle.log(),
    })
}
