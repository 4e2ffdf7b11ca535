//! Animation clock.
//!
//! The shader time is a frame accumulator, not wall-clock time: every
//! rendered frame adds a fixed step, so the animation speed follows the
//! display refresh rate. Wall-clock time is only used for the FPS readout.
//!
//! # Example
//!
//! ```ignore
//! use iridescent::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per frame:
//! let t = time.tick();
//! println!("t = {t:.2}, frame {}, {:.1} fps", time.frame(), time.fps());
//! ```

use std::time::{Duration, Instant};

/// Amount the accumulator advances per frame.
pub const DEFAULT_STEP: f32 = 0.01;

/// Per-frame time accumulator with pause and FPS tracking.
#[derive(Debug)]
pub struct Time {
    /// Accumulated shader time.
    value: f32,
    /// Added to `value` on every unpaused tick.
    step: f32,
    /// Total ticks since start or last reset.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    paused: bool,
}

impl Time {
    /// Start at zero with the default step.
    pub fn new() -> Self {
        Self::with_step(DEFAULT_STEP)
    }

    /// Start at zero with a custom step. Negative steps are treated as zero.
    pub fn with_step(step: f32) -> Self {
        Self {
            value: 0.0,
            step: step.max(0.0),
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: Duration::from_millis(500),
            paused: false,
        }
    }

    /// Advance one frame. Call once per rendered frame.
    ///
    /// Returns the time to upload for this frame.
    pub fn tick(&mut self) -> f32 {
        self.frame_count += 1;

        let now = Instant::now();
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        if !self.paused {
            self.value += self.step;
        }
        self.value
    }

    /// Current accumulated time.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Per-frame step.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total frames since start or last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop advancing. Frames are still counted.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Change the per-frame step. Negative steps are treated as zero.
    pub fn set_step(&mut self, step: f32) {
        self.step = step.max(0.0);
    }

    /// Return the accumulator to zero.
    ///
    /// The pause state is kept, so a paused animation stays frozen at 0.
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.frame_count = 0;
        self.fps_frame_count = 0;
        self.fps_update_time = Instant::now();
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
