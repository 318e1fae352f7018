//! # Choreboard Confetti
//!
//! The celebratory particle burst played when a chore reward is collected.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      CONFETTI PIPELINE                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Trigger → LifecycleController::start → ParticleFactory      │
//! │                      ↓                                        │
//! │  FrameClock::next_frame → tick → Simulator → Renderer → Host │
//! │                      ↓                                        │
//! │  elapsed >= spawn duration && all particles inactive         │
//! │                      ↓                                        │
//! │  detach resize listener, release surface                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Randomness and time are injected. With a seeded RNG and a
//! [`FixedStepClock`] a session terminates at the same tick on every run.
//!
//! Physics constants are expressed per tick. Visual timing assumes the host
//! delivers frames at roughly 60 Hz; a faster host plays the effect faster.
//!
//! ## Example
//!
//! ```rust,ignore
//! use choreboard_confetti::{FixedStepClock, LifecycleController, StartOutcome};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! let mut controller = LifecycleController::new(
//!     host,
//!     ChaCha8Rng::seed_from_u64(42),
//!     FixedStepClock::sixty_hz(),
//! );
//! assert_eq!(controller.start(2500)?, StartOutcome::Started);
//! let summary = controller.run_to_completion();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod error;
pub mod factory;
pub mod host;
pub mod lifecycle;
pub mod particle;
pub mod render;
pub mod simulator;
pub mod trigger;

pub use clock::{FixedStepClock, FrameClock, RealtimeClock, TimeSource};
pub use error::{ConfettiError, ConfettiResult};
pub use factory::ParticleFactory;
pub use host::{Host, ResizeListener, Surface, Viewport};
pub use lifecycle::{LifecycleController, LifecycleState, SessionSummary, StartOutcome, TickOutcome};
pub use particle::{Color, Particle, Population, Shape, PALETTE, PARTICLE_COUNT};
pub use render::{FrameBatch, RenderCommand, Renderer};
pub use simulator::Simulator;
pub use trigger::{celebrate, RewardCollected, DEFAULT_SPAWN_DURATION_MS};
