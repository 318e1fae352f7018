//! Confetti particle data.
//!
//! A session owns exactly [`PARTICLE_COUNT`] particles. They are created once,
//! mutated in place every tick and dropped together when the session ends.

use std::ops::Deref;

/// Number of particles in every session.
pub const PARTICLE_COUNT: usize = 280;

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Color {
    /// Creates a color from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a hex value (0xRRGGBB).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Formats the color as a CSS hex string (`#rrggbb`).
    #[must_use]
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The fixed confetti palette.
pub const PALETTE: [Color; 6] = [
    Color::hex(0xFF595E), // coral
    Color::hex(0xFFCA3A), // sunflower
    Color::hex(0x8AC926), // lime
    Color::hex(0x1982C4), // blue
    Color::hex(0x6A4C93), // violet
    Color::hex(0xFF924C), // tangerine
];

/// Shape drawn for a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `size` wide, `0.65 * size` tall.
    Rectangle,
    /// Diameter `size`.
    Circle,
}

impl Shape {
    /// Height of a rectangle relative to its width.
    pub const RECT_ASPECT: f32 = 0.65;
}

/// One piece of confetti.
///
/// The active flag is one-way: [`Particle::deactivate`] is the only mutator
/// and nothing sets it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position (logical pixels).
    pub x: f32,
    /// Vertical position (logical pixels, down is positive).
    pub y: f32,
    /// Horizontal velocity per tick.
    pub vx: f32,
    /// Vertical velocity per tick.
    pub vy: f32,
    /// Edge length of the shape.
    pub size: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rotation change per tick.
    pub angular_velocity: f32,
    /// Fill color.
    pub color: Color,
    /// Drawn shape.
    pub shape: Shape,
    active: bool,
}

impl Particle {
    /// Creates an active particle at rest orientation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: (f32, f32),
        velocity: (f32, f32),
        size: f32,
        rotation: f32,
        angular_velocity: f32,
        color: Color,
        shape: Shape,
    ) -> Self {
        Self {
            x: position.0,
            y: position.1,
            vx: velocity.0,
            vy: velocity.1,
            size,
            rotation,
            angular_velocity,
            color,
            shape,
            active: true,
        }
    }

    /// Is this particle still simulated and drawn?
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Permanently retires the particle.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Fixed-size particle storage for one session.
///
/// Particles can be mutated in place but never added or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    particles: Box<[Particle]>,
}

impl Population {
    /// Takes ownership of a freshly generated set of particles.
    #[must_use]
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            particles: particles.into_boxed_slice(),
        }
    }

    /// Mutable access to the particles for in-place stepping.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles still active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_active()).count()
    }

    /// True once every particle has been retired.
    #[must_use]
    pub fn all_inactive(&self) -> bool {
        self.particles.iter().all(|p| !p.is_active())
    }
}

impl Deref for Population {
    type Target = [Particle];

    fn deref(&self) -> &[Particle] {
        &self.particles
    }
}
