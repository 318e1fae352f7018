//! Reward-collection trigger.
//!
//! The board's collect action archives a finished chore and awards its
//! points; the UI then celebrates. This is the only entry into the engine.

use rand::RngCore;

use crate::clock::TimeSource;
use crate::error::ConfettiResult;
use crate::host::Host;
use crate::lifecycle::{LifecycleController, StartOutcome};

/// Spawn duration used for reward celebrations.
pub const DEFAULT_SPAWN_DURATION_MS: u32 = 2500;

/// A chore reward was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardCollected {
    /// Task instance that was collected.
    pub instance_id: u64,
    /// Points awarded.
    pub points: u32,
}

/// Plays the celebration for a collected reward.
///
/// Collecting again while confetti is still falling is absorbed.
///
/// # Errors
///
/// Propagates [`LifecycleController::start`] errors.
pub fn celebrate<H, R, C>(
    controller: &mut LifecycleController<H, R, C>,
    event: &RewardCollected,
) -> ConfettiResult<StartOutcome>
where
    H: Host,
    R: RngCore,
    C: TimeSource,
{
    tracing::debug!(
        instance_id = event.instance_id,
        points = event.points,
        "reward collected"
    );
    controller.start(DEFAULT_SPAWN_DURATION_MS)
}
