// ============================================================================
// diagnostics.rs — bouncelab
// Ensemble measurements per frame: momentum, kinetic energy, overlap counts.
// Feeds periodic log output and the analysis panel's time series.
// ============================================================================

use crate::physics::COINCIDENT_EPS_SQ;
use crate::vec3::Vec3;
use crate::world::World;

// ======================== Snapshot ========================

/// Measurements over the current ensemble state.
pub struct SimDiagnostics {
    pub ball_count: usize,
    pub total_mass: f32,
    /// Σ m·v. Conserved across isolated ball-ball impacts, not across wall
    /// bounces or gravity.
    pub momentum: Vec3,
    /// Σ ½·m·|v|².
    pub kinetic_energy: f32,
    pub max_speed: f32,
    /// Pairs still interpenetrating after the last tick (single-pass
    /// resolution leaves these in dense clusters).
    pub overlapping_pairs: usize,
    /// Pairs with effectively coincident centers, skipped by the resolver.
    pub coincident_pairs: usize,
}

impl SimDiagnostics {
    pub fn from_world(world: &World) -> Self {
        let balls = world.balls();

        let mut total_mass = 0.0f32;
        let mut momentum = Vec3::ZERO;
        let mut kinetic_energy = 0.0f32;
        let mut max_speed = 0.0f32;

        for ball in balls {
            let m = ball.mass();
            total_mass += m;
            momentum += ball.velocity * m;
            kinetic_energy += 0.5 * m * ball.velocity.length_squared();
            max_speed = max_speed.max(ball.speed());
        }

        let mut overlapping_pairs = 0;
        let mut coincident_pairs = 0;
        for i in 0..balls.len() {
            for j in (i + 1)..balls.len() {
                let dist_sq = (balls[i].position - balls[j].position).length_squared();
                let radius_sum = balls[i].radius() + balls[j].radius();
                if dist_sq <= COINCIDENT_EPS_SQ {
                    coincident_pairs += 1;
                } else if dist_sq < radius_sum * radius_sum {
                    overlapping_pairs += 1;
                }
            }
        }

        SimDiagnostics {
            ball_count: balls.len(),
            total_mass,
            momentum,
            kinetic_energy,
            max_speed,
            overlapping_pairs,
            coincident_pairs,
        }
    }

    /// Logs the snapshot at INFO level.
    pub fn log(&self, frame: u64) {
        log::info!(
            "Frame {} | balls={} | mass={:.4} | p=({:+.5}, {:+.5}) |p|={:.5}",
            frame,
            self.ball_count,
            self.total_mass,
            self.momentum.x,
            self.momentum.y,
            self.momentum.length(),
        );
        log::info!(
            "         | E_k={:.6} | v_max={:.4} | overlapping={} | coincident={}",
            self.kinetic_energy,
            self.max_speed,
            self.overlapping_pairs,
            self.coincident_pairs,
        );
    }
}

// ======================== History ========================

/// One plotted sample.
#[derive(Clone, Copy, Debug)]
pub struct DiagRecord {
    pub frame: u64,
    pub fps: f32,
    pub ball_count: usize,
    pub kinetic_energy: f32,
    pub momentum_mag: f32,
}

/// Bounded ring of samples for the analysis panel.
pub struct DiagHistory {
    records: Vec<DiagRecord>,
    capacity: usize,
}

impl Default for DiagHistory {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            capacity: 2048,
        }
    }
}

impl DiagHistory {
    pub fn record(&mut self, diag: &SimDiagnostics, frame: u64, fps: f32) {
        if self.records.len() == self.capacity {
            self.records.remove(0);
        }
        self.records.push(DiagRecord {
            frame,
            fps,
            ball_count: diag.ball_count,
            kinetic_energy: diag.kinetic_energy,
            momentum_mag: diag.momentum.length(),
        });
    }

    pub fn records(&self) -> &[DiagRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&DiagRecord> {
        self.records.last()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
