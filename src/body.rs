// ============================================================================
// body.rs — bouncelab
// A single ball: position, velocity, radius, and derived mass.
// ============================================================================

use rand::Rng;

use crate::config::BALL_SPEED;
use crate::vec3::Vec3;

/// One ball of the ensemble.
///
/// `radius` and `mass` are private so the mass stays a pure function of the
/// radius: `mass = π · radius²`, a disk-area proxy used as the inertia
/// surrogate (the simulation is planar, z stays 0).
#[derive(Clone, Debug)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    radius: f32,
    mass: f32,
}

impl Ball {
    pub fn new(position: Vec3, velocity: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            mass: std::f32::consts::PI * radius * radius,
        }
    }

    /// Samples a fresh ball within the spawn ranges: x in [-1.0, 0.5] with
    /// y pinned to 0.5, velocity components in a symmetric band scaled by
    /// the ball speed constant, radius in {0.04, 0.05, …, 0.10}.
    pub fn spawn(rng: &mut impl Rng) -> Self {
        let position = Vec3::new(rng.gen_range(-1.0..=0.5), 0.5, 0.0);
        let velocity = Vec3::new(
            rng.gen_range(-0.75..=0.75) * BALL_SPEED,
            rng.gen_range(-0.75..=0.75) * BALL_SPEED,
            0.0,
        );
        let radius = rng.gen_range(4..=10) as f32 / 100.0;
        Ball::new(position, velocity, radius)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
