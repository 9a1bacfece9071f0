// ============================================================================
// config.rs — bouncelab
// Tuning constants, world geometry, and runtime simulation parameters.
// ============================================================================

// ======================== Constants ========================

/// The physics tick is coupled to this rate: velocities are per-frame, not
/// per-second, so changing the target FPS changes observable dynamics.
pub const TARGET_FPS: u32 = 30;

/// Vertical velocity change per tick while gravity is enabled.
pub const GRAVITY_PER_TICK: f32 = -0.005;

/// Scale applied to sampled spawn velocities.
pub const BALL_SPEED: f32 = 0.01;

/// Perfectly elastic ball-ball impacts.
pub const RESTITUTION: f32 = 1.0;

/// The UI never requests fewer balls than this.
pub const MIN_BALL_COUNT: usize = 1;

pub const DEFAULT_BALL_COUNT: usize = 1;

// ======================== World Geometry ========================

/// Axis-aligned reflective walls, in the same space the renderer draws in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
        }
    }
}

// ======================== Physics Configuration ========================

/// Everything one physics tick needs, passed in explicitly each frame.
#[derive(Clone, Copy, Debug)]
pub struct PhysicsConfig {
    pub gravity_enabled: bool,
    pub gravity: f32,
    pub restitution: f32,
    pub bounds: Bounds,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_enabled: true,
            gravity: GRAVITY_PER_TICK,
            restitution: RESTITUTION,
            bounds: Bounds::default(),
        }
    }
}

// ======================== Runtime Parameters ========================

/// Runtime simulation parameters adjustable via the control panel.
#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub paused: bool,
    pub gravity_enabled: bool,
    pub target_ball_count: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            paused: false,
            gravity_enabled: true,
            target_ball_count: DEFAULT_BALL_COUNT,
        }
    }
}

impl SimulationParams {
    /// The per-tick physics view of the current parameters.
    pub fn physics(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity_enabled: self.gravity_enabled,
            ..PhysicsConfig::default()
        }
    }
}
