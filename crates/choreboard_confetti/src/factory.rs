//! # Particle Factory
//!
//! Generates the initial confetti burst above the top edge of the viewport.
//!
//! Every particle is drawn independently from the injected RNG:
//!
//! | field            | distribution                    |
//! |------------------|---------------------------------|
//! | x                | [0, width)                      |
//! | y                | [-0.3 * height, 0)              |
//! | vx               | [-4.5, 4.5)                     |
//! | vy               | [2.5, 9.5)                      |
//! | size             | [4, 10)                         |
//! | rotation         | [0, 2π)                         |
//! | angular velocity | [-0.25, 0.25)                   |
//! | color            | uniform over [`PALETTE`]        |
//! | shape            | rectangle with p = 0.55         |

use std::f32::consts::TAU;

use rand::Rng;

use crate::host::Viewport;
use crate::particle::{Particle, Population, Shape, PALETTE, PARTICLE_COUNT};

/// Builds confetti populations from a caller-supplied random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleFactory;

impl ParticleFactory {
    /// Horizontal speed range.
    pub const VX_RANGE: (f32, f32) = (-4.5, 4.5);
    /// Initial fall speed range.
    pub const VY_RANGE: (f32, f32) = (2.5, 9.5);
    /// Size range.
    pub const SIZE_RANGE: (f32, f32) = (4.0, 10.0);
    /// Spin range.
    pub const SPIN_RANGE: (f32, f32) = (-0.25, 0.25);
    /// Fraction of the viewport height above the top edge used for spawning.
    pub const SPAWN_BAND: f32 = 0.3;
    /// Probability of a rectangle (otherwise circle).
    pub const RECTANGLE_PROBABILITY: f64 = 0.55;

    /// Creates `count` independent particles for the given viewport size.
    pub fn create<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Vec<Particle> {
        (0..count)
            .map(|_| Self::create_one(rng, viewport_width, viewport_height))
            .collect()
    }

    /// Creates the fixed-size population for one session.
    pub fn create_population<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Population {
        Population::new(Self::create(
            rng,
            PARTICLE_COUNT,
            viewport.width,
            viewport.height,
        ))
    }

    fn create_one<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Particle {
        let x = uniform(rng, 0.0, width);
        let y = uniform(rng, -Self::SPAWN_BAND * height, 0.0);
        let vx = uniform(rng, Self::VX_RANGE.0, Self::VX_RANGE.1);
        let vy = uniform(rng, Self::VY_RANGE.0, Self::VY_RANGE.1);
        let size = uniform(rng, Self::SIZE_RANGE.0, Self::SIZE_RANGE.1);
        let rotation = uniform(rng, 0.0, TAU);
        let angular_velocity = uniform(rng, Self::SPIN_RANGE.0, Self::SPIN_RANGE.1);
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        let shape = if rng.gen_bool(Self::RECTANGLE_PROBABILITY) {
            Shape::Rectangle
        } else {
            Shape::Circle
        };

        Particle::new((x, y), (vx, vy), size, rotation, angular_velocity, color, shape)
    }
}

/// Draws from `[lo, hi)`. Collapses to `lo` on an empty range instead of panicking.
#[inline]
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let t: f32 = rng.gen();
    lo + (hi - lo) * t
}
