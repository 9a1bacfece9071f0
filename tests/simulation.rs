use std::f32::consts::PI;
use std::time::Duration;

use bouncelab::body::Ball;
use bouncelab::config::{PhysicsConfig, MIN_BALL_COUNT};
use bouncelab::diagnostics::SimDiagnostics;
use bouncelab::pacer::FramePacer;
use bouncelab::physics;
use bouncelab::vec3::Vec3;
use bouncelab::world::World;

/// Build a planar ball from scalar components
fn ball(px: f32, py: f32, vx: f32, vy: f32, radius: f32) -> Ball {
    Ball::new(Vec3::new(px, py, 0.0), Vec3::new(vx, vy, 0.0), radius)
}

/// Default physics with gravity switched off, for isolated-collision checks
fn no_gravity() -> PhysicsConfig {
    PhysicsConfig {
        gravity_enabled: false,
        ..PhysicsConfig::default()
    }
}

fn momentum(balls: &[Ball]) -> Vec3 {
    balls
        .iter()
        .fold(Vec3::ZERO, |acc, b| acc + b.velocity * b.mass())
}

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

// ==================================================================================
// Collection tests
// ==================================================================================

#[test]
fn add_inserts_at_front() {
    let mut world = World::new(Some(1));
    world.add(ball(0.1, 0.0, 0.0, 0.0, 0.05));
    world.add(ball(0.2, 0.0, 0.0, 0.0, 0.05));

    assert_eq!(world.len(), 2);
    assert_eq!(world.balls()[0].position.x, 0.2, "front is most recent add");
    assert_eq!(world.balls()[1].position.x, 0.1);
}

#[test]
fn remove_at_front_removes_most_recent_add() {
    let mut world = World::new(Some(1));
    world.add(ball(0.1, 0.0, 0.0, 0.0, 0.05));
    let size_before = world.len();
    world.add(ball(0.2, 0.0, 0.0, 0.0, 0.05));

    assert!(world.remove_at(0));
    assert_eq!(world.len(), size_before);
    assert_eq!(world.balls()[0].position.x, 0.1, "survivor is the older ball");
}

#[test]
fn remove_at_out_of_range_fails() {
    let mut world = World::new(Some(1));
    assert!(!world.remove_at(0), "empty collection");

    world.add(ball(0.0, 0.0, 0.0, 0.0, 0.05));
    assert!(!world.remove_at(1));
    assert!(!world.remove_at(17));
    assert_eq!(world.len(), 1);
}

#[test]
fn remove_random_on_single_ball_empties() {
    let mut world = World::new(Some(1));
    world.add(ball(0.0, 0.0, 0.0, 0.0, 0.05));

    assert!(world.remove_random());
    assert!(world.is_empty());
    assert!(!world.remove_random(), "nothing left to remove");
}

// ==================================================================================
// Population sync tests
// ==================================================================================

#[test]
fn sync_population_spawns_to_target() {
    let mut world = World::new(Some(3));
    world.sync_population(5);
    assert_eq!(world.len(), 5);
}

#[test]
fn sync_population_is_idempotent_at_target() {
    let mut world = World::new(Some(3));
    world.sync_population(5);
    let before: Vec<Vec3> = world.balls().iter().map(|b| b.position).collect();

    world.sync_population(5);

    let after: Vec<Vec3> = world.balls().iter().map(|b| b.position).collect();
    assert_eq!(before, after, "no add/remove once size == target");
}

#[test]
fn sync_population_removes_down_to_target() {
    let mut world = World::new(Some(3));
    world.sync_population(8);
    world.sync_population(3);
    assert_eq!(world.len(), 3);
}

#[test]
fn spawn_ranges_respected() {
    let mut world = World::new(Some(11));
    world.sync_population(200);

    for b in world.balls() {
        assert!(b.radius() >= 0.04 && b.radius() <= 0.10, "radius {}", b.radius());
        assert!(b.position.x >= -1.0 && b.position.x <= 0.5, "x {}", b.position.x);
        assert_eq!(b.position.y, 0.5);
        assert_eq!(b.position.z, 0.0);
        assert_eq!(b.velocity.z, 0.0);
    }
}

#[test]
fn seeded_worlds_reproduce_identical_spawns() {
    let mut a = World::new(Some(7));
    let mut b = World::new(Some(7));
    a.sync_population(10);
    b.sync_population(10);

    for (x, y) in a.balls().iter().zip(b.balls()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.velocity, y.velocity);
        assert_eq!(x.radius(), y.radius());
    }
}

// ==================================================================================
// Body tests
// ==================================================================================

#[test]
fn mass_follows_radius() {
    let b = ball(0.0, 0.0, 0.0, 0.0, 0.05);
    assert!(approx(b.mass(), PI * 0.05 * 0.05, 1e-7));
}

#[test]
fn mass_invariant_survives_stepping() {
    let mut world = World::new(Some(5));
    world.sync_population(6);
    let cfg = PhysicsConfig::default();
    for _ in 0..50 {
        world.step(&cfg);
    }
    for b in world.balls() {
        assert!(approx(b.mass(), PI * b.radius() * b.radius(), 1e-6));
    }
    assert_eq!(world.frame, 50);
}

// ==================================================================================
// Physics tests
// ==================================================================================

#[test]
fn gravity_lowers_vertical_velocity_per_tick() {
    let cfg = PhysicsConfig::default();
    let mut balls = vec![ball(0.0, 0.0, 0.0, 0.01, 0.05)];
    physics::step(&mut balls, &cfg);
    assert!(approx(balls[0].velocity.y, 0.01 + cfg.gravity, 1e-7));

    let mut coasting = vec![ball(0.0, 0.0, 0.0, 0.01, 0.05)];
    physics::step(&mut coasting, &no_gravity());
    assert_eq!(coasting[0].velocity.y, 0.01, "disabled gravity leaves velocity alone");
}

#[test]
fn distant_pair_advances_exactly_by_velocity() {
    let mut balls = vec![
        ball(-0.90, 0.0, 0.02, 0.0, 0.05),
        ball(0.5, 0.0, -0.01, 0.0, 0.05),
    ];
    physics::step(&mut balls, &no_gravity());

    assert!(approx(balls[0].position.x, -0.88, 1e-6));
    assert!(approx(balls[1].position.x, 0.49, 1e-6));
    assert_eq!(balls[0].velocity.x, 0.02, "no collision, velocity untouched");
    assert_eq!(balls[1].velocity.x, -0.01);
}

#[test]
fn equal_mass_head_on_pair_exchanges_velocities() {
    let mut balls = vec![
        ball(-0.05, 0.0, 0.02, 0.0, 0.06),
        ball(0.05, 0.0, -0.02, 0.0, 0.06),
    ];
    physics::step(&mut balls, &no_gravity());

    assert!(approx(balls[0].velocity.x, -0.02, 1e-6));
    assert!(approx(balls[1].velocity.x, 0.02, 1e-6));
}

#[test]
fn pair_collision_conserves_momentum() {
    let mut balls = vec![
        ball(-0.03, 0.01, 0.015, -0.002, 0.05),
        ball(0.04, 0.0, -0.01, 0.003, 0.08),
    ];
    let before = momentum(&balls);
    physics::step(&mut balls, &no_gravity());
    let after = momentum(&balls);

    assert!(
        (after - before).length() < 1e-6,
        "momentum drifted: before ({}, {}), after ({}, {})",
        before.x,
        before.y,
        after.x,
        after.y,
    );
}

#[test]
fn separating_pair_is_not_resolved() {
    // Overlapping but already moving apart; the impulse must not fire.
    let mut balls = vec![
        ball(-0.02, 0.0, -0.01, 0.0, 0.05),
        ball(0.02, 0.0, 0.01, 0.0, 0.05),
    ];
    physics::step(&mut balls, &no_gravity());

    assert_eq!(balls[0].velocity.x, -0.01);
    assert_eq!(balls[1].velocity.x, 0.01);
}

#[test]
fn overlapping_equal_mass_pair_separates_in_one_step() {
    let mut balls = vec![
        ball(-0.02, 0.0, 0.01, 0.0, 0.05),
        ball(0.02, 0.0, -0.01, 0.0, 0.05),
    ];
    physics::step(&mut balls, &no_gravity());

    assert!(approx(balls[0].velocity.x, -0.01, 1e-6), "velocity negated");
    assert!(approx(balls[1].velocity.x, 0.01, 1e-6));

    let dist = (balls[0].position - balls[1].position).length();
    let radius_sum = balls[0].radius() + balls[1].radius();
    assert!(
        dist >= radius_sum - 1e-6,
        "penetration remains: dist {} < radii {}",
        dist,
        radius_sum,
    );
}

#[test]
fn coincident_centers_do_not_poison_the_ensemble() {
    let mut balls = vec![
        ball(0.0, 0.0, 0.01, 0.0, 0.05),
        ball(0.0, 0.0, -0.01, 0.0, 0.05),
    ];
    physics::step(&mut balls, &no_gravity());

    for b in &balls {
        assert!(b.position.x.is_finite() && b.position.y.is_finite());
        assert!(b.velocity.x.is_finite() && b.velocity.y.is_finite());
    }
}

#[test]
fn wall_contact_clamps_and_flips_velocity() {
    let cfg = no_gravity();
    let mut balls = vec![ball(0.98, 0.0, 0.05, 0.0, 0.05)];
    physics::step(&mut balls, &cfg);

    assert_eq!(balls[0].position.x, cfg.bounds.right - 0.05, "clamped to wall - radius");
    assert_eq!(balls[0].velocity.x, -0.05, "sign flipped");
}

#[test]
fn corner_hit_reflects_both_axes_in_one_tick() {
    let cfg = no_gravity();
    let mut balls = vec![ball(0.97, 0.97, 0.05, 0.05, 0.05)];
    physics::step(&mut balls, &cfg);

    assert_eq!(balls[0].position.x, cfg.bounds.right - 0.05);
    assert_eq!(balls[0].position.y, cfg.bounds.top - 0.05);
    assert_eq!(balls[0].velocity.x, -0.05);
    assert_eq!(balls[0].velocity.y, -0.05);
}

#[test]
fn ensemble_stays_inside_bounds_under_gravity() {
    let mut world = World::new(Some(9));
    world.sync_population(24);
    let cfg = PhysicsConfig::default();
    for _ in 0..500 {
        world.step(&cfg);
    }
    for b in world.balls() {
        assert!(b.position.x >= cfg.bounds.left && b.position.x <= cfg.bounds.right);
        assert!(b.position.y >= cfg.bounds.bottom && b.position.y <= cfg.bounds.top);
    }
}

// ==================================================================================
// Pacer tests
// ==================================================================================

#[test]
fn pacer_waits_out_the_frame_budget() {
    let mut pacer = FramePacer::new(30);
    assert_eq!(pacer.target_interval(), Duration::from_millis(33));

    pacer.begin_frame();
    let elapsed = pacer.end_frame();
    assert!(
        elapsed >= pacer.target_interval(),
        "frame ended after {:?}",
        elapsed,
    );
}

#[test]
fn pacer_reports_long_frames_without_extra_wait() {
    let mut pacer = FramePacer::new(30);
    pacer.begin_frame();
    std::thread::sleep(Duration::from_millis(50));
    let elapsed = pacer.end_frame();

    assert!(elapsed >= Duration::from_millis(50));
    assert!(
        elapsed < Duration::from_millis(200),
        "overlong frame should return promptly, took {:?}",
        elapsed,
    );
}

// ==================================================================================
// Diagnostics tests
// ==================================================================================

#[test]
fn diagnostics_match_hand_computation() {
    let mut world = World::new(Some(1));
    world.add(ball(-0.02, 0.0, 0.01, 0.0, 0.05));
    world.add(ball(0.02, 0.0, -0.01, 0.0, 0.05));

    let diag = SimDiagnostics::from_world(&world);
    let m = PI * 0.05 * 0.05;

    assert_eq!(diag.ball_count, 2);
    assert!(approx(diag.total_mass, 2.0 * m, 1e-6));
    assert!(approx(diag.momentum.x, 0.0, 1e-7), "opposite velocities cancel");
    assert!(approx(diag.kinetic_energy, 2.0 * 0.5 * m * 0.01 * 0.01, 1e-9));
    assert!(approx(diag.max_speed, 0.01, 1e-7));
    assert_eq!(diag.overlapping_pairs, 1);
    assert_eq!(diag.coincident_pairs, 0);
}

#[test]
fn minimum_population_floor_is_one() {
    // The floor is enforced by callers; the constant is what they clamp to.
    assert_eq!(MIN_BALL_COUNT, 1);
}
