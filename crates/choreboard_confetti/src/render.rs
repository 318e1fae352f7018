//! Confetti rendering.
//!
//! Builds one batch of drawing commands per frame and submits it to the
//! host surface. The batch buffer is reused so steady-state frames do not
//! allocate.

use crate::host::{Surface, Viewport};
use crate::particle::{Color, Particle, Shape, PARTICLE_COUNT};

/// A drawing command in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    /// Clear the surface to transparent.
    Clear {
        /// Width to clear.
        width: f32,
        /// Height to clear.
        height: f32,
    },
    /// Filled rectangle centered at (x, y), rotated about its center.
    Rect {
        /// Center x.
        x: f32,
        /// Center y.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Rotation in radians.
        rotation: f32,
        /// Fill color.
        color: Color,
    },
    /// Filled circle.
    Circle {
        /// Center x.
        x: f32,
        /// Center y.
        y: f32,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
}

impl RenderCommand {
    /// Builds the draw command for one particle.
    #[must_use]
    pub fn for_particle(particle: &Particle) -> Self {
        match particle.shape {
            Shape::Rectangle => Self::Rect {
                x: particle.x,
                y: particle.y,
                width: particle.size,
                height: particle.size * Shape::RECT_ASPECT,
                rotation: particle.rotation,
                color: particle.color,
            },
            Shape::Circle => Self::Circle {
                x: particle.x,
                y: particle.y,
                radius: particle.size / 2.0,
                color: particle.color,
            },
        }
    }
}

/// Commands for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameBatch {
    commands: Vec<RenderCommand>,
}

impl FrameBatch {
    /// Creates an empty batch with room for `capacity` commands.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Commands in submission order.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if the batch holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Appends a command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Draws active particles onto a surface.
#[derive(Debug)]
pub struct Renderer {
    batch: FrameBatch,
}

impl Renderer {
    /// Creates a renderer sized for a full population.
    #[must_use]
    pub fn new() -> Self {
        Self {
            // One clear plus one command per particle
            batch: FrameBatch::with_capacity(PARTICLE_COUNT + 1),
        }
    }

    /// Clears the surface to the viewport extents and draws every active
    /// particle. Returns the number of particles drawn.
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        particles: &[Particle],
        viewport: Viewport,
    ) -> usize {
        self.batch.clear();
        self.batch.push(RenderCommand::Clear {
            width: viewport.width,
            height: viewport.height,
        });

        let mut drawn = 0;
        for particle in particles.iter().filter(|p| p.is_active()) {
            self.batch.push(RenderCommand::for_particle(particle));
            drawn += 1;
        }

        surface.submit(&self.batch);
        drawn
    }

    /// The most recently submitted batch.
    #[must_use]
    pub fn last_batch(&self) -> &FrameBatch {
        &self.batch
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::PALETTE;

    #[derive(Default)]
    struct CaptureSurface {
        frames: Vec<Vec<RenderCommand>>,
    }

    impl Surface for CaptureSurface {
        fn resize(&mut self, _viewport: Viewport, _device_pixel_ratio: f32) {}

        fn submit(&mut self, batch: &FrameBatch) {
            self.frames.push(batch.commands().to_vec());
        }
    }

    #[test]
    fn test_rect_dimensions() {
        let p = Particle::new((5.0, 6.0), (0.0, 0.0), 10.0, 0.5, 0.0, PALETTE[1], Shape::Rectangle);
        assert_eq!(
            RenderCommand::for_particle(&p),
            RenderCommand::Rect {
                x: 5.0,
                y: 6.0,
                width: 10.0,
                height: 6.5,
                rotation: 0.5,
                color: PALETTE[1],
            }
        );
    }

    #[test]
    fn test_circle_radius() {
        let p = Particle::new((1.0, 2.0), (0.0, 0.0), 8.0, 0.0, 0.0, PALETTE[3], Shape::Circle);
        assert_eq!(
            RenderCommand::for_particle(&p),
            RenderCommand::Circle {
                x: 1.0,
                y: 2.0,
                radius: 4.0,
                color: PALETTE[3],
            }
        );
    }

    #[test]
    fn test_render_skips_inactive() {
        let mut particles = vec![
            Particle::new((0.0, 0.0), (0.0, 0.0), 4.0, 0.0, 0.0, PALETTE[0], Shape::Circle),
            Particle::new((9.0, 9.0), (0.0, 0.0), 4.0, 0.0, 0.0, PALETTE[0], Shape::Rectangle),
        ];
        particles[0].deactivate();

        let mut surface = CaptureSurface::default();
        let mut renderer = Renderer::new();
        let drawn = renderer.render(&mut surface, &particles, Viewport::new(300.0, 200.0));

        assert_eq!(drawn, 1);
        assert_eq!(surface.frames.len(), 1);
        let frame = &surface.frames[0];
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame[0],
            RenderCommand::Clear {
                width: 300.0,
                height: 200.0
            }
        );
        assert!(matches!(frame[1], RenderCommand::Rect { x, .. } if x == 9.0));
    }

    #[test]
    fn test_render_all_inactive_still_clears() {
        let mut p = Particle::new((0.0, 0.0), (0.0, 0.0), 4.0, 0.0, 0.0, PALETTE[0], Shape::Circle);
        p.deactivate();

        let mut surface = CaptureSurface::default();
        let mut renderer = Renderer::new();
        assert_eq!(renderer.render(&mut surface, &[p], Viewport::new(10.0, 10.0)), 0);
        assert_eq!(surface.frames[0].len(), 1);
        assert_eq!(renderer.last_batch().len(), 1);
    }
}
