//! # Headless Host
//!
//! An in-process page: a viewport that tests can resize, surfaces backed by
//! [`Raster`], and a [`HostLog`] recording every resource the engine takes
//! and gives back.
//!
//! The host moves into the controller; a [`HeadlessHandle`] stays with the
//! caller to drive resizes and read the log.

use std::sync::Arc;

use choreboard_confetti::{ConfettiError, ConfettiResult, Host, ResizeListener, Viewport};
use parking_lot::Mutex;

use crate::raster::Raster;

/// Resource accounting for one host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLog {
    /// Surfaces created.
    pub surfaces_created: usize,
    /// Surfaces released.
    pub surfaces_released: usize,
    /// Resize listeners attached.
    pub listeners_attached: usize,
    /// Resize listeners detached.
    pub listeners_detached: usize,
    /// Listeners currently attached.
    pub active_listeners: Vec<ResizeListener>,
    /// Surface creations refused.
    pub surface_failures: usize,
}

impl HostLog {
    /// Surfaces created and not yet released.
    #[must_use]
    pub fn live_surfaces(&self) -> usize {
        self.surfaces_created - self.surfaces_released
    }
}

#[derive(Debug)]
struct HostState {
    viewport: Viewport,
    device_pixel_ratio: f32,
    refuse_surfaces: bool,
    next_listener: u64,
    released: Option<Raster>,
    log: HostLog,
}

/// Host with a programmable viewport and software surfaces.
#[derive(Debug)]
pub struct HeadlessHost {
    state: Arc<Mutex<HostState>>,
}

impl HeadlessHost {
    /// Creates a host with the given viewport and pixel ratio.
    #[must_use]
    pub fn new(viewport: Viewport, device_pixel_ratio: f32) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                viewport,
                device_pixel_ratio,
                refuse_surfaces: false,
                next_listener: 0,
                released: None,
                log: HostLog::default(),
            })),
        }
    }

    /// Returns a handle sharing this host's state.
    #[must_use]
    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Host for HeadlessHost {
    type Surface = Raster;

    fn viewport(&self) -> Viewport {
        self.state.lock().viewport
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.state.lock().device_pixel_ratio
    }

    fn create_surface(&mut self, viewport: Viewport, device_pixel_ratio: f32) -> ConfettiResult<Raster> {
        let mut state = self.state.lock();
        if state.refuse_surfaces {
            state.log.surface_failures += 1;
            return Err(ConfettiError::surface_unavailable(
                "headless host refused surface",
            ));
        }
        state.log.surfaces_created += 1;
        Ok(Raster::new(viewport, device_pixel_ratio))
    }

    fn release_surface(&mut self, surface: Raster) {
        let mut state = self.state.lock();
        state.log.surfaces_released += 1;
        state.released = Some(surface);
    }

    fn subscribe_resize(&mut self) -> ResizeListener {
        let mut state = self.state.lock();
        state.next_listener += 1;
        let listener = ResizeListener(state.next_listener);
        state.log.listeners_attached += 1;
        state.log.active_listeners.push(listener);
        listener
    }

    fn unsubscribe_resize(&mut self, listener: ResizeListener) {
        let mut state = self.state.lock();
        let before = state.log.active_listeners.len();
        state.log.active_listeners.retain(|l| *l != listener);
        if state.log.active_listeners.len() < before {
            state.log.listeners_detached += 1;
        }
    }
}

/// Caller-side view of a [`HeadlessHost`].
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    state: Arc<Mutex<HostState>>,
}

impl HeadlessHandle {
    /// Changes the viewport and pixel ratio.
    ///
    /// Returns true if a resize listener is attached, i.e. the page would
    /// notify the engine. The caller then delivers the notification with
    /// `LifecycleController::handle_resize`.
    pub fn resize(&self, viewport: Viewport, device_pixel_ratio: f32) -> bool {
        let mut state = self.state.lock();
        state.viewport = viewport;
        state.device_pixel_ratio = device_pixel_ratio;
        !state.log.active_listeners.is_empty()
    }

    /// Makes subsequent surface creations fail (or succeed again).
    pub fn refuse_surfaces(&self, refuse: bool) {
        self.state.lock().refuse_surfaces = refuse;
    }

    /// Snapshot of the resource log.
    #[must_use]
    pub fn log(&self) -> HostLog {
        self.state.lock().log.clone()
    }

    /// Takes the most recently released surface.
    pub fn take_released_surface(&self) -> Option<Raster> {
        self.state.lock().released.take()
    }
}
