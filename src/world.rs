// ============================================================================
// world.rs — bouncelab
// World: the insertion-ordered ball collection, population sync against the
// UI target count, and the per-frame step entry point.
// ============================================================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::Ball;
use crate::config::PhysicsConfig;
use crate::physics;

/// Owns every live ball plus the RNG used for spawning and random removal.
///
/// Balls are kept in a `Vec` with front insertion, so index 0 is always the
/// most recently added ball and traversal order matches insertion history
/// newest-first. Exactly one `World` exists per simulation run.
pub struct World {
    balls: Vec<Ball>,
    rng: StdRng,
    pub frame: u64,
}

impl World {
    /// A fixed seed makes spawn positions and random removal reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            balls: Vec::new(),
            rng,
            frame: 0,
        }
    }

    // ======================== Collection ========================

    /// Inserts at the front of the traversal order.
    pub fn add(&mut self, ball: Ball) {
        self.balls.insert(0, ball);
    }

    /// Removes the ball at `index` in traversal order. Returns false if the
    /// index is out of range; callers skip and carry on.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.balls.len() {
            return false;
        }
        self.balls.remove(index);
        true
    }

    /// Removes a uniformly random ball. Returns false on an empty world.
    pub fn remove_random(&mut self) -> bool {
        if self.balls.is_empty() {
            return false;
        }
        let index = self.rng.gen_range(0..self.balls.len());
        self.remove_at(index)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    // ======================== Population Sync ========================

    /// Reconciles the live count with the UI target. Spawns one ball per
    /// missing slot, removes random balls one at a time when over target.
    /// A no-op once `len() == target`; the floor of 1 is the caller's job.
    pub fn sync_population(&mut self, target: usize) {
        while self.balls.len() < target {
            let ball = Ball::spawn(&mut self.rng);
            self.add(ball);
        }
        while self.balls.len() > target {
            self.remove_random();
        }
    }

    /// Drops every ball and refills to `target` with fresh samples.
    pub fn respawn(&mut self, target: usize) {
        self.balls.clear();
        self.sync_population(target);
    }

    // ======================== Step ========================

    /// Advances the ensemble by one fixed tick.
    pub fn step(&mut self, cfg: &PhysicsConfig) {
        physics::step(&mut self.balls, cfg);
        self.frame += 1;
    }
}
