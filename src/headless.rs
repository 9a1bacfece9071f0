// ============================================================================
// headless.rs — bouncelab
// Headless simulation runner for fast long-horizon batches. No window, no
// GPU: population sync + physics tick in a tight loop with progress logging.
// ============================================================================

use std::time::Instant;

use crate::config::{PhysicsConfig, MIN_BALL_COUNT};
use crate::diagnostics::SimDiagnostics;
use crate::world::World;

#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    pub frames: u64,
    pub ball_count: usize,
    pub gravity_enabled: bool,
    pub seed: Option<u64>,
    pub progress_interval: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: 10_000,
            ball_count: 32,
            gravity_enabled: true,
            seed: None,
            progress_interval: 1000,
        }
    }
}

pub fn run_headless(config: &HeadlessConfig) -> Result<(), String> {
    if config.frames == 0 {
        return Err(String::from("Headless run needs at least one frame"));
    }
    let target = config.ball_count.max(MIN_BALL_COUNT);

    let mut world = World::new(config.seed);
    let physics = PhysicsConfig {
        gravity_enabled: config.gravity_enabled,
        ..PhysicsConfig::default()
    };

    log::info!(
        "Headless run started: {} frames, {} balls, gravity {} (seed: {:?})",
        config.frames,
        target,
        if config.gravity_enabled { "ON" } else { "OFF" },
        config.seed,
    );

    let started = Instant::now();
    let mut last_report = Instant::now();
    let mut last_report_frame = 0u64;

    for step in 0..config.frames {
        world.sync_population(target);
        world.step(&physics);

        if config.progress_interval > 0 && (step + 1) % config.progress_interval == 0 {
            let done = step + 1;
            let total_elapsed = started.elapsed().as_secs_f64().max(1e-6);
            let total_fps = done as f64 / total_elapsed;

            let window_elapsed = last_report.elapsed().as_secs_f64().max(1e-6);
            let window_frames = done - last_report_frame;
            let window_fps = window_frames as f64 / window_elapsed;

            let remaining = config.frames.saturating_sub(done);
            let eta_secs = if total_fps > 1e-6 {
                remaining as f64 / total_fps
            } else {
                0.0
            };

            log::info!(
                "Headless progress: {}/{} | fps={:.0} (window {:.0}) | ETA={:.1} s",
                done,
                config.frames,
                total_fps,
                window_fps,
                eta_secs,
            );

            last_report = Instant::now();
            last_report_frame = done;
        }
    }

    SimDiagnostics::from_world(&world).log(world.frame);
    log::info!(
        "Headless run finished: {} frames in {:.2} s",
        config.frames,
        started.elapsed().as_secs_f64(),
    );

    Ok(())
}
