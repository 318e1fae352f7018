//! # Lifecycle Controller
//!
//! Owns the single confetti session and drives it frame by frame.
//!
//! ## States
//!
//! - **Idle**: no session has run yet.
//! - **Running**: a session owns a surface, a resize listener and 280 particles.
//! - **Terminated**: the last session ended and released its resources.
//!   `start()` may begin a new session from here.
//!
//! ## Tick
//!
//! ```text
//! elapsed = now - start
//! step every particle
//! render active particles
//! if elapsed >= spawn duration && no particle active:
//!     unsubscribe resize, release surface, drop session
//! ```
//!
//! Termination is only evaluated at the end of a tick. There is no
//! cancellation path: a session ends when time has passed and every particle
//! has fallen out of view.

use rand::RngCore;

use crate::clock::{FrameClock, TimeSource};
use crate::error::ConfettiResult;
use crate::factory::ParticleFactory;
use crate::host::{Host, ResizeListener, Surface, Viewport};
use crate::particle::{Particle, Population};
use crate::render::Renderer;
use crate::simulator::Simulator;

/// Externally observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No session has been started.
    Idle,
    /// A session is animating.
    Running,
    /// The previous session finished and released its resources.
    Terminated,
}

/// Result of [`LifecycleController::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session was created.
    Started,
    /// A session was already running; nothing changed.
    AlreadyRunning,
}

/// Statistics for a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    /// Ticks executed, including the terminating one.
    pub ticks: u64,
    /// Elapsed milliseconds observed by the terminating tick.
    pub elapsed_ms: f64,
}

/// Result of [`LifecycleController::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No session is running; nothing happened.
    Idle,
    /// The session is still running; schedule another frame.
    Continue {
        /// Particles still active after this tick.
        active: usize,
    },
    /// The session ended on this tick and its resources were released.
    Terminated(SessionSummary),
}

/// One run of the animation.
struct Session<S> {
    surface: S,
    resize_listener: ResizeListener,
    started_at_ms: f64,
    spawn_duration_ms: u32,
    viewport: Viewport,
    device_pixel_ratio: f32,
    population: Population,
    ticks: u64,
}

/// Owns at most one confetti session.
pub struct LifecycleController<H: Host, R, C> {
    host: H,
    rng: R,
    clock: C,
    renderer: Renderer,
    session: Option<Session<H::Surface>>,
    state: LifecycleState,
}

impl<H, R, C> LifecycleController<H, R, C>
where
    H: Host,
    R: RngCore,
    C: TimeSource,
{
    /// Creates an idle controller.
    #[must_use]
    pub fn new(host: H, rng: R, clock: C) -> Self {
        Self {
            host,
            rng,
            clock,
            renderer: Renderer::new(),
            session: None,
            state: LifecycleState::Idle,
        }
    }

    /// Starts a session unless one is already running.
    ///
    /// # Errors
    ///
    /// Returns [`ConfettiError::SurfaceUnavailable`](crate::ConfettiError::SurfaceUnavailable)
    /// if the host cannot create a drawing surface. No session is created and
    /// no resize listener stays attached.
    pub fn start(&mut self, spawn_duration_ms: u32) -> ConfettiResult<StartOutcome> {
        if self.session.is_some() {
            tracing::debug!("confetti already running, start ignored");
            return Ok(StartOutcome::AlreadyRunning);
        }

        let viewport = self.host.viewport();
        let device_pixel_ratio = self.host.device_pixel_ratio();

        let surface = match self.host.create_surface(viewport, device_pixel_ratio) {
            Ok(surface) => surface,
            Err(err) => {
                tracing::warn!("confetti surface unavailable: {}", err);
                return Err(err);
            }
        };
        let resize_listener = self.host.subscribe_resize();
        let population = ParticleFactory::create_population(&mut self.rng, viewport);
        let started_at_ms = self.clock.now_ms();

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            dpr = device_pixel_ratio,
            particles = population.len(),
            spawn_duration_ms,
            "confetti session started"
        );

        self.session = Some(Session {
            surface,
            resize_listener,
            started_at_ms,
            spawn_duration_ms,
            viewport,
            device_pixel_ratio,
            population,
            ticks: 0,
        });
        self.state = LifecycleState::Running;

        Ok(StartOutcome::Started)
    }

    /// Runs one simulate-render-check step with the frame timestamp `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Idle;
        };

        session.ticks += 1;
        let elapsed_ms = (now_ms - session.started_at_ms).max(0.0);

        let simulator = Simulator::for_viewport(session.viewport);
        let active = simulator.step_all(session.population.as_mut_slice());

        self.renderer
            .render(&mut session.surface, &session.population, session.viewport);

        if elapsed_ms >= f64::from(session.spawn_duration_ms) && active == 0 {
            let summary = SessionSummary {
                ticks: session.ticks,
                elapsed_ms,
            };
            self.finish(summary);
            return TickOutcome::Terminated(summary);
        }

        TickOutcome::Continue { active }
    }

    /// Applies the host's current viewport and pixel ratio to the surface.
    ///
    /// Particle state is untouched. The new bounds take effect on the next
    /// tick. Does nothing when no session is running.
    pub fn handle_resize(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let viewport = self.host.viewport();
        let device_pixel_ratio = self.host.device_pixel_ratio();
        session.surface.resize(viewport, device_pixel_ratio);
        session.viewport = viewport;
        session.device_pixel_ratio = device_pixel_ratio;

        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            dpr = device_pixel_ratio,
            "confetti surface resized"
        );
    }

    fn finish(&mut self, summary: SessionSummary) {
        if let Some(session) = self.session.take() {
            self.host.unsubscribe_resize(session.resize_listener);
            self.host.release_surface(session.surface);
            tracing::debug!("confetti surface released");
        }
        self.state = LifecycleState::Terminated;

        tracing::info!(
            ticks = summary.ticks,
            elapsed_ms = summary.elapsed_ms,
            "confetti session finished"
        );
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// True while a session exists.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Particles of the running session.
    #[must_use]
    pub fn particles(&self) -> Option<&[Particle]> {
        self.session.as_ref().map(|s| &*s.population)
    }

    /// Viewport used by the running session.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.session.as_ref().map(|s| s.viewport)
    }

    /// Device-pixel-ratio used by the running session.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.device_pixel_ratio)
    }

    /// Ticks executed by the running session.
    #[must_use]
    pub fn tick_count(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.ticks)
    }

    /// Surface of the running session.
    #[must_use]
    pub fn surface(&self) -> Option<&H::Surface> {
        self.session.as_ref().map(|s| &s.surface)
    }

    /// The host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The time source.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// The time source, mutably.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

impl<H, R, C> LifecycleController<H, R, C>
where
    H: Host,
    R: RngCore,
    C: FrameClock,
{
    /// Ticks on every frame of the clock until the session ends.
    ///
    /// Returns `None` if no session was running.
    pub fn run_to_completion(&mut self) -> Option<SessionSummary> {
        loop {
            let now_ms = self.clock.next_frame();
            match self.tick(now_ms) {
                TickOutcome::Continue { .. } => {}
                TickOutcome::Terminated(summary) => return Some(summary),
                TickOutcome::Idle => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedStepClock;
    use crate::error::ConfettiError;
    use crate::particle::PARTICLE_COUNT;
    use crate::render::FrameBatch;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct CountingSurface {
        frames: usize,
        resizes: Vec<(Viewport, f32)>,
    }

    impl Surface for CountingSurface {
        fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f32) {
            self.resizes.push((viewport, device_pixel_ratio));
        }

        fn submit(&mut self, _batch: &FrameBatch) {
            self.frames += 1;
        }
    }

    #[derive(Default)]
    struct TestHost {
        viewport: Viewport,
        dpr: f32,
        fail: bool,
        created: usize,
        released: usize,
        listeners: Vec<ResizeListener>,
        next_listener: u64,
    }

    impl Host for TestHost {
        type Surface = CountingSurface;

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn device_pixel_ratio(&self) -> f32 {
            self.dpr
        }

        fn create_surface(&mut self, viewport: Viewport, dpr: f32) -> ConfettiResult<CountingSurface> {
            if self.fail {
                return Err(ConfettiError::surface_unavailable("no context"));
            }
            self.created += 1;
            let mut surface = CountingSurface::default();
            surface.resize(viewport, dpr);
            Ok(surface)
        }

        fn release_surface(&mut self, _surface: CountingSurface) {
            self.released += 1;
        }

        fn subscribe_resize(&mut self) -> ResizeListener {
            self.next_listener += 1;
            let listener = ResizeListener(self.next_listener);
            self.listeners.push(listener);
            listener
        }

        fn unsubscribe_resize(&mut self, listener: ResizeListener) {
            self.listeners.retain(|l| *l != listener);
        }
    }

    type TestController = LifecycleController<TestHost, ChaCha8Rng, FixedStepClock>;

    fn controller(seed: u64) -> TestController {
        let host = TestHost {
            viewport: Viewport::new(1000.0, 800.0),
            dpr: 2.0,
            ..TestHost::default()
        };
        LifecycleController::new(host, ChaCha8Rng::seed_from_u64(seed), FixedStepClock::sixty_hz())
    }

    #[test]
    fn test_idle_until_started() {
        let mut c = controller(1);
        assert_eq!(c.state(), LifecycleState::Idle);
        assert_eq!(c.tick(16.0), TickOutcome::Idle);
        c.handle_resize();
        assert!(c.run_to_completion().is_none());
    }

    #[test]
    fn test_start_allocates_once() {
        let mut c = controller(1);
        assert_eq!(c.start(1000), Ok(StartOutcome::Started));
        assert_eq!(c.start(1000), Ok(StartOutcome::AlreadyRunning));

        assert_eq!(c.state(), LifecycleState::Running);
        assert_eq!(c.host().created, 1);
        assert_eq!(c.host().listeners.len(), 1);
        assert_eq!(c.particles().map(<[Particle]>::len), Some(PARTICLE_COUNT));
        assert_eq!(c.surface().map(|s| s.resizes.len()), Some(1));
    }

    #[test]
    fn test_start_failure_leaves_no_session() {
        let mut c = controller(1);
        c.host_mut().fail = true;
        assert!(matches!(c.start(1000), Err(ConfettiError::SurfaceUnavailable { .. })));
        assert!(!c.is_running());
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(c.host().listeners.is_empty());

        c.host_mut().fail = false;
        assert_eq!(c.start(1000), Ok(StartOutcome::Started));
    }

    #[test]
    fn test_terminates_and_releases() {
        let mut c = controller(5);
        c.start(500).unwrap();
        let summary = c.run_to_completion().unwrap();

        assert!(summary.elapsed_ms >= 500.0);
        assert_eq!(c.state(), LifecycleState::Terminated);
        assert!(!c.is_running());
        assert_eq!(c.host().released, 1);
        assert!(c.host().listeners.is_empty());
        assert_eq!(c.tick(1e9), TickOutcome::Idle);
    }

    #[test]
    fn test_waits_for_spawn_duration() {
        let mut c = controller(5);
        c.start(60_000).unwrap();

        let mut last = TickOutcome::Idle;
        for _ in 0..600 {
            let now = c.clock_mut().next_frame();
            last = c.tick(now);
        }
        // All particles are long gone after 10 s but the session keeps going
        assert_eq!(last, TickOutcome::Continue { active: 0 });
        assert!(c.is_running());

        let summary = c.run_to_completion().unwrap();
        assert!(summary.elapsed_ms >= 60_000.0);
        assert!(summary.elapsed_ms < 60_000.0 + 17.0);
    }

    #[test]
    fn test_restart_after_termination() {
        let mut c = controller(9);
        c.start(100).unwrap();
        c.run_to_completion().unwrap();

        assert_eq!(c.start(100), Ok(StartOutcome::Started));
        assert_eq!(c.host().created, 2);
        assert_eq!(c.tick_count(), Some(0));
    }

    #[test]
    fn test_resize_updates_viewport_not_particles() {
        let mut c = controller(2);
        c.start(1000).unwrap();
        let now = c.clock_mut().next_frame();
        c.tick(now);
        let before: Vec<Particle> = c.particles().unwrap().to_vec();

        c.host_mut().viewport = Viewport::new(400.0, 300.0);
        c.host_mut().dpr = 1.5;
        c.handle_resize();

        assert_eq!(c.viewport(), Some(Viewport::new(400.0, 300.0)));
        assert_eq!(c.device_pixel_ratio(), Some(1.5));
        assert_eq!(c.particles().unwrap(), &before[..]);
        let resizes = &c.surface().unwrap().resizes;
        assert_eq!(resizes.last(), Some(&(Viewport::new(400.0, 300.0), 1.5)));
    }

    #[test]
    fn test_every_tick_renders() {
        let mut c = controller(4);
        c.start(0).unwrap();
        for expected in 1..=5 {
            let now = c.clock_mut().next_frame();
            if let TickOutcome::Terminated(_) = c.tick(now) {
                panic!("terminated with particles still on screen");
            }
            assert_eq!(c.surface().unwrap().frames, expected);
        }
    }
}
