//! # Host Environment
//!
//! Everything the engine needs from the page it runs in:
//! viewport and device-pixel-ratio queries, drawing surface creation and
//! release, and resize notification subscription.
//!
//! Resize notifications are delivered by the host calling
//! [`LifecycleController::handle_resize`](crate::LifecycleController::handle_resize)
//! on the same thread as ticks. The subscription only tells the host whether
//! anyone is listening.

use crate::error::ConfettiResult;
use crate::render::FrameBatch;

/// Viewport extents in logical (CSS) pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Vertical position past which a particle is retired.
    ///
    /// Well below the visible area so nothing is cut off mid-fall.
    #[inline]
    #[must_use]
    pub fn bottom_limit(&self) -> f32 {
        self.height * 2.25 + 60.0
    }
}

/// Handle for an attached resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeListener(pub u64);

/// A 2D drawing surface covering the viewport.
pub trait Surface {
    /// Sets the logical size and the device-pixel-ratio transform.
    ///
    /// Called once at creation and once per resize, never per frame.
    fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f32);

    /// Draws one frame. Commands are in logical pixels.
    fn submit(&mut self, batch: &FrameBatch);
}

/// The page hosting the effect.
pub trait Host {
    /// Surface type produced by this host.
    type Surface: Surface;

    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Physical pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f32;

    /// Creates and attaches a surface sized to `viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfettiError::SurfaceUnavailable`](crate::ConfettiError::SurfaceUnavailable)
    /// if no drawing context can be acquired.
    fn create_surface(
        &mut self,
        viewport: Viewport,
        device_pixel_ratio: f32,
    ) -> ConfettiResult<Self::Surface>;

    /// Detaches and drops a surface.
    fn release_surface(&mut self, surface: Self::Surface);

    /// Starts delivering resize notifications.
    fn subscribe_resize(&mut self) -> ResizeListener;

    /// Stops delivering resize notifications for `listener`.
    fn unsubscribe_resize(&mut self, listener: ResizeListener);
}
