//! # Session Lifecycle Tests
//!
//! Full confetti sessions on the headless host: resource ownership,
//! termination timing, resize handling and the reward trigger.

use choreboard_canvas::{HeadlessHandle, HeadlessHost};
use choreboard_confetti::{
    celebrate, ConfettiError, FixedStepClock, FrameClock, LifecycleController, LifecycleState,
    ParticleFactory, RewardCollected, Simulator, StartOutcome, TickOutcome, Viewport,
    DEFAULT_SPAWN_DURATION_MS, PARTICLE_COUNT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type Controller = LifecycleController<HeadlessHost, ChaCha8Rng, FixedStepClock>;

/// 20 ms frames keep elapsed time exact in f64.
const FRAME_MS: f64 = 20.0;

fn setup(seed: u64, viewport: Viewport) -> (Controller, HeadlessHandle) {
    setup_with_frame(seed, viewport, FRAME_MS)
}

fn setup_with_frame(seed: u64, viewport: Viewport, frame_ms: f64) -> (Controller, HeadlessHandle) {
    let host = HeadlessHost::new(viewport, 1.0);
    let handle = host.handle();
    let controller = LifecycleController::new(
        host,
        ChaCha8Rng::seed_from_u64(seed),
        FixedStepClock::new(0.0, frame_ms),
    );
    (controller, handle)
}

fn next_tick(controller: &mut Controller) -> TickOutcome {
    let now = controller.clock_mut().next_frame();
    controller.tick(now)
}

/// Tick on which the last particle of a seeded burst retires, computed
/// without the controller.
fn last_retirement_tick(seed: u64, viewport: Viewport) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut population = ParticleFactory::create_population(&mut rng, viewport);
    let simulator = Simulator::for_viewport(viewport);
    let mut tick = 0;
    loop {
        tick += 1;
        if simulator.step_all(population.as_mut_slice()) == 0 {
            return tick;
        }
    }
}

/// Test: a second start is absorbed without touching resources.
#[test]
fn test_double_start_allocates_once() {
    let (mut controller, handle) = setup(1, Viewport::new(1000.0, 800.0));

    assert_eq!(controller.start(5000).unwrap(), StartOutcome::Started);
    let particles = controller.particles().unwrap().to_vec();
    assert_eq!(controller.start(5000).unwrap(), StartOutcome::AlreadyRunning);

    let log = handle.log();
    assert_eq!(log.surfaces_created, 1);
    assert_eq!(log.listeners_attached, 1);
    assert_eq!(log.active_listeners.len(), 1);
    assert_eq!(controller.particles().unwrap(), &particles[..]);
    assert_eq!(particles.len(), PARTICLE_COUNT);
}

/// Test: start(5000) at 1000x800 ends exactly at the 5000 ms mark when
/// every particle has already fallen past 1860.
#[test]
fn test_terminates_at_spawn_duration() {
    let viewport = Viewport::new(1000.0, 800.0);
    let (mut controller, handle) = setup(42, viewport);
    assert!(last_retirement_tick(42, viewport) < 250);

    controller.start(5000).unwrap();
    let summary = controller.run_to_completion().unwrap();

    assert_eq!(summary.ticks, 250);
    assert!((summary.elapsed_ms - 5000.0).abs() < f64::EPSILON);
    assert_eq!(controller.state(), LifecycleState::Terminated);

    let log = handle.log();
    assert_eq!(log.live_surfaces(), 0);
    assert_eq!(log.listeners_detached, 1);
    assert!(log.active_listeners.is_empty());
}

/// Test: past the spawn duration the session waits for the last particle
/// and ends on the tick it crosses the bottom limit.
#[test]
fn test_waits_for_last_particle() {
    let viewport = Viewport::new(1000.0, 800.0);
    let seed = 7;
    let expected = last_retirement_tick(seed, viewport);
    // Spawn duration is long over by then
    assert!(expected as f64 * FRAME_MS > 500.0);

    let (mut controller, _handle) = setup(seed, viewport);
    controller.start(500).unwrap();

    for tick in 1..expected {
        match next_tick(&mut controller) {
            TickOutcome::Continue { active } => assert!(active > 0, "tick {tick}"),
            other => panic!("tick {tick}: unexpected {other:?}"),
        }
    }
    match next_tick(&mut controller) {
        TickOutcome::Terminated(summary) => assert_eq!(summary.ticks, expected),
        other => panic!("expected termination, got {other:?}"),
    }
}

/// Test: start(5000) at 1000x800 with slow frames. Confetti is still above
/// 1860 at the 5000 ms mark, so the session runs on until the tick the last
/// particle crosses it.
#[test]
fn test_spawn_duration_elapses_with_confetti_on_screen() {
    const SLOW_FRAME_MS: f64 = 100.0;
    let viewport = Viewport::new(1000.0, 800.0);
    let seed = 42;
    let expected = last_retirement_tick(seed, viewport);
    // Tick 50 is the 5000 ms mark
    assert!(expected > 50);

    let (mut controller, handle) = setup_with_frame(seed, viewport, SLOW_FRAME_MS);
    controller.start(5000).unwrap();

    for tick in 1..expected {
        match next_tick(&mut controller) {
            TickOutcome::Continue { active } => assert!(active > 0, "tick {tick}"),
            other => panic!("tick {tick}: unexpected {other:?}"),
        }
        if tick >= 50 {
            assert_eq!(controller.state(), LifecycleState::Running);
        }
    }

    match next_tick(&mut controller) {
        TickOutcome::Terminated(summary) => {
            assert_eq!(summary.ticks, expected);
            assert!((summary.elapsed_ms - expected as f64 * SLOW_FRAME_MS).abs() < 1e-6);
        }
        other => panic!("expected termination, got {other:?}"),
    }
    assert_eq!(handle.log().live_surfaces(), 0);
}

/// Test: the same seed terminates on the same tick.
#[test]
fn test_termination_tick_is_reproducible() {
    let run = |seed| {
        let (mut controller, _) = setup(seed, Viewport::new(1000.0, 800.0));
        controller.start(100).unwrap();
        controller.run_to_completion().unwrap().ticks
    };
    assert_eq!(run(99), run(99));
}

/// Test: population size is fixed and retirement never reverses.
#[test]
fn test_population_invariants_during_session() {
    let (mut controller, _) = setup(3, Viewport::new(800.0, 600.0));
    controller.start(0).unwrap();
    let mut retired = vec![false; PARTICLE_COUNT];

    while let TickOutcome::Continue { active } = next_tick(&mut controller) {
        let particles = controller.particles().unwrap();
        assert_eq!(particles.len(), PARTICLE_COUNT);
        assert_eq!(particles.iter().filter(|p| p.is_active()).count(), active);

        for (was_retired, p) in retired.iter_mut().zip(particles) {
            if *was_retired {
                assert!(!p.is_active());
            }
            *was_retired = !p.is_active();
        }
    }
}

/// Test: resize reshapes the surface and leaves particles alone.
#[test]
fn test_resize_during_session() {
    let (mut controller, handle) = setup(5, Viewport::new(1000.0, 800.0));
    controller.start(1000).unwrap();
    next_tick(&mut controller);
    let particles = controller.particles().unwrap().to_vec();

    assert!(handle.resize(Viewport::new(500.0, 400.0), 2.0));
    controller.handle_resize();

    let surface = controller.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (1000, 800));
    assert_eq!(surface.resize_count(), 2);
    assert_eq!(controller.particles().unwrap(), &particles[..]);
    assert_eq!(controller.viewport(), Some(Viewport::new(500.0, 400.0)));

    // Smaller viewport, lower bottom limit: session still completes
    assert!(controller.run_to_completion().is_some());
    assert!(!handle.resize(Viewport::new(100.0, 100.0), 1.0));
}

/// Test: rendered frames show confetti while it falls.
#[test]
fn test_frames_are_painted() {
    let (mut controller, _) = setup(11, Viewport::new(400.0, 300.0));
    controller.start(1000).unwrap();
    for _ in 0..15 {
        next_tick(&mut controller);
    }

    let surface = controller.surface().unwrap();
    assert_eq!(surface.frames(), 15);
    assert_eq!(surface.last_draw_count(), PARTICLE_COUNT);
    assert!(surface.painted_pixels() > 0);
}

/// Test: a missing drawing surface fails fast and leaves nothing behind.
#[test]
fn test_surface_failure() {
    let (mut controller, handle) = setup(1, Viewport::new(1000.0, 800.0));
    handle.refuse_surfaces(true);

    assert!(matches!(
        controller.start(1000),
        Err(ConfettiError::SurfaceUnavailable { .. })
    ));
    assert_eq!(controller.state(), LifecycleState::Idle);
    assert_eq!(next_tick(&mut controller), TickOutcome::Idle);

    let log = handle.log();
    assert_eq!(log.surface_failures, 1);
    assert_eq!(log.listeners_attached, 0);
}

/// Test: collecting rewards back to back plays one celebration.
#[test]
fn test_reward_trigger() {
    let (mut controller, handle) = setup(8, Viewport::new(1000.0, 800.0));
    let reward = RewardCollected {
        instance_id: 12,
        points: 30,
    };

    assert_eq!(celebrate(&mut controller, &reward).unwrap(), StartOutcome::Started);
    next_tick(&mut controller);
    assert_eq!(
        celebrate(&mut controller, &reward).unwrap(),
        StartOutcome::AlreadyRunning
    );

    let summary = controller.run_to_completion().unwrap();
    assert!(summary.elapsed_ms >= f64::from(DEFAULT_SPAWN_DURATION_MS));
    assert_eq!(handle.log().surfaces_created, 1);

    // A later reward starts a fresh session
    assert_eq!(celebrate(&mut controller, &reward).unwrap(), StartOutcome::Started);
    assert_eq!(handle.log().surfaces_created, 2);
}
