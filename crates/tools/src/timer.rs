use std::time::{Duration, Instant};

/// Longest step handed to the simulation, in seconds. Gaps from window
/// drags or breakpoints are cut down to this.
pub const MAX_DELTA: f32 = 0.1;

/// Per-frame delta time plus a once-per-second FPS estimate.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    start: Instant,
    last: Instant,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last: now,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Advance to now and return the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now
            .saturating_duration_since(self.last)
            .as_secs_f32()
            .min(MAX_DELTA);
        self.last = now;

        self.window_frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }
        dt
    }

    /// Seconds from the start to the latest tick, unclamped.
    pub fn elapsed(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }

    /// Frames per second over the last full one-second window.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_between_ticks() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0);
        let dt = timer.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn large_gaps_are_clamped() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0);
        assert_eq!(timer.tick_at(t0 + Duration::from_secs(5)), MAX_DELTA);
        // elapsed time is not clamped
        assert!((timer.elapsed() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn time_never_runs_backwards() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0 + Duration::from_secs(1));
        assert_eq!(timer.tick_at(t0), 0.0);
    }

    #[test]
    fn fps_over_one_second_window() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(t0);
        assert_eq!(timer.fps(), 0.0);
        for i in 1..=60 {
            timer.tick_at(t0 + Duration::from_micros(i * 16_667));
        }
        assert!((timer.fps() - 60.0).abs() < 0.5);
    }
}
