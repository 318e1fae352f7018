//! # Particle Simulator
//!
//! One explicit-Euler step per tick:
//!
//! ```text
//! x  += vx          y  += vy
//! vy += GRAVITY     vx *= DRAG
//! rotation += angular_velocity
//! if y > bottom_limit { retire }
//! ```
//!
//! Constants are per tick, so simulation speed follows the frame rate.
//! The nominal cadence is 60 ticks per second.

use crate::host::Viewport;
use crate::particle::Particle;

/// Advances particles against a fixed bottom limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    bottom_limit: f32,
}

impl Simulator {
    /// Downward acceleration per tick.
    pub const GRAVITY: f32 = 0.22;
    /// Horizontal velocity retained per tick.
    pub const DRAG: f32 = 0.85;

    /// Creates a simulator for a viewport height.
    #[must_use]
    pub fn new(viewport_height: f32) -> Self {
        Self::for_viewport(Viewport::new(0.0, viewport_height))
    }

    /// Creates a simulator for a viewport.
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            bottom_limit: viewport.bottom_limit(),
        }
    }

    /// Returns the retirement threshold.
    #[must_use]
    pub const fn bottom_limit(&self) -> f32 {
        self.bottom_limit
    }

    /// Advances one particle by one tick.
    ///
    /// Inactive particles are left untouched. Returns true if the particle was
    /// retired by this step.
    #[inline]
    pub fn step(&self, particle: &mut Particle) -> bool {
        if !particle.is_active() {
            return false;
        }

        particle.x += particle.vx;
        particle.y += particle.vy;
        particle.vy += Self::GRAVITY;
        particle.vx *= Self::DRAG;
        particle.rotation += particle.angular_velocity;

        if particle.y > self.bottom_limit {
            particle.deactivate();
            return true;
        }
        false
    }

    /// Steps every particle. Returns how many are still active.
    pub fn step_all(&self, particles: &mut [Particle]) -> usize {
        let mut active = 0;
        for particle in particles {
            self.step(particle);
            if particle.is_active() {
                active += 1;
            }
        }
        active
    }
}
