// ============================================================================
// physics.rs — bouncelab
// One fixed tick over the whole ensemble: gravity, pairwise elastic
// collision resolution, integration, boundary reflection.
// ============================================================================

use crate::body::Ball;
use crate::config::{Bounds, PhysicsConfig};

/// Two centers closer than this have no usable collision normal; the pair
/// is skipped for the tick instead of dividing by zero.
pub const COINCIDENT_EPS_SQ: f32 = 1e-12;

/// Advances every ball by one tick. Velocities are per-frame displacements;
/// there is no dt term because the loop is paced to a fixed rate.
pub fn step(balls: &mut [Ball], cfg: &PhysicsConfig) {
    if cfg.gravity_enabled {
        apply_gravity(balls, cfg.gravity);
    }
    resolve_collisions(balls, cfg.restitution);
    integrate(balls);
    reflect_at_bounds(balls, &cfg.bounds);
}

fn apply_gravity(balls: &mut [Ball], gravity: f32) {
    for ball in balls {
        ball.velocity.y += gravity;
    }
}

/// Brute-force pass over every unordered pair, each index paired against all
/// later indices, so a tick performs n·(n−1)/2 checks. Single pass, no
/// sub-stepping: dense clusters may keep residual overlap for a few frames.
fn resolve_collisions(balls: &mut [Ball], restitution: f32) {
    for i in 0..balls.len() {
        for j in (i + 1)..balls.len() {
            let (head, tail) = balls.split_at_mut(j);
            resolve_pair(&mut head[i], &mut tail[0], restitution);
        }
    }
}

fn resolve_pair(a: &mut Ball, b: &mut Ball, restitution: f32) {
    let diff = a.position - b.position;
    let dist_sq = diff.length_squared();
    let radius_sum = a.radius() + b.radius();
    if dist_sq > radius_sum * radius_sum {
        return;
    }
    if dist_sq <= COINCIDENT_EPS_SQ {
        return;
    }

    let dist = dist_sq.sqrt();
    let normal = diff / dist;
    let relative_velocity = a.velocity - b.velocity;
    let velocity_along_normal = relative_velocity.dot(normal);

    // Already separating; resolving again would glue the pair together.
    if velocity_along_normal > 0.0 {
        return;
    }

    let m1 = a.mass();
    let m2 = b.mass();
    let impulse = -(1.0 + restitution) * velocity_along_normal / (1.0 / m1 + 1.0 / m2);
    a.velocity += normal * (impulse / m1);
    b.velocity -= normal * (impulse / m2);

    let penetration = radius_sum - dist;
    if penetration > 0.0 {
        let correction = normal * (penetration / 2.0);
        a.position += correction;
        b.position -= correction;
    }
}

fn integrate(balls: &mut [Ball]) {
    for ball in balls {
        let velocity = ball.velocity;
        ball.position += velocity;
    }
}

/// Checks the four walls in fixed order: left, right, top, bottom. A corner
/// hit reflects on both axes in the same tick, sequentially.
fn reflect_at_bounds(balls: &mut [Ball], bounds: &Bounds) {
    for ball in balls {
        let r = ball.radius();
        if ball.position.x < bounds.left + r {
            ball.position.x = bounds.left + r;
            ball.velocity.x = -ball.velocity.x;
        }
        if ball.position.x > bounds.right - r {
            ball.position.x = bounds.right - r;
            ball.velocity.x = -ball.velocity.x;
        }
        if ball.position.y > bounds.top - r {
            ball.position.y = bounds.top - r;
            ball.velocity.y = -ball.velocity.y;
        }
        if ball.position.y < bounds.bottom + r {
            ball.position.y = bounds.bottom + r;
            ball.velocity.y = -ball.velocity.y;
        }
    }
}
