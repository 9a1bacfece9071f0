// ============================================================================
// pacer.rs — bouncelab
// Fixed-rate frame pacer: measures elapsed wall time per frame and
// yield-spins until the frame budget elapses.
// ============================================================================

use std::time::{Duration, Instant};

/// Caps the main loop at a fixed rate.
///
/// Each iteration runs two phases: Running (input, physics, render) between
/// `begin_frame` and `end_frame`, then Waiting inside `end_frame`, which
/// polls a monotonic clock in a yield loop until the target interval has
/// elapsed since `begin_frame`. The spin trades CPU for timing precision;
/// there is no blocking sleep and no mid-frame cancellation.
pub struct FramePacer {
    target: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            // Integer millisecond budget, 33 ms at the 30 Hz default.
            target: Duration::from_millis(1000 / u64::from(target_fps.max(1))),
            frame_start: Instant::now(),
        }
    }

    pub fn target_interval(&self) -> Duration {
        self.target
    }

    /// Marks the start of the Running phase.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Transitions to Waiting and spins out the rest of the frame budget.
    /// Returns the total measured frame time, spin included.
    pub fn end_frame(&mut self) -> Duration {
        loop {
            let elapsed = self.frame_start.elapsed();
            if elapsed >= self.target {
                return elapsed;
            }
            std::thread::yield_now();
        }
    }
}
