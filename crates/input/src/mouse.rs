/// Turns absolute cursor positions into per-event look offsets.
///
/// The first sample after construction, or after focus is lost, only
/// records a baseline and yields zero offsets, so the view does not jump
/// when the cursor re-enters the window somewhere else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseTracker {
    first: bool,
    last_x: f32,
    last_y: f32,
}

impl MouseTracker {
    /// Start with the baseline at the window center.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            first: true,
            last_x: width as f32 / 2.0,
            last_y: height as f32 / 2.0,
        }
    }

    /// Record a cursor position and return `(x_offset, y_offset)`.
    ///
    /// The y offset is reversed: window coordinates grow downwards while
    /// pitch grows upwards.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> (f32, f32) {
        let (x, y) = (x as f32, y as f32);
        if self.first {
            self.last_x = x;
            self.last_y = y;
            self.first = false;
        }

        let dx = x - self.last_x;
        let dy = self.last_y - y;
        self.last_x = x;
        self.last_y = y;
        (dx, dy)
    }

    pub fn on_focus_changed(&mut self, focused: bool) {
        if !focused {
            tracing::trace!("focus lost, re-arming first mouse sample");
            self.first = true;
        }
    }

    pub fn last_position(&self) -> (f32, f32) {
        (self.last_x, self.last_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_a_baseline() {
        let mut m = MouseTracker::new(800, 600);
        assert_eq!(m.last_position(), (400.0, 300.0));
        assert_eq!(m.on_cursor_moved(10.0, 20.0), (0.0, 0.0));
        assert_eq!(m.last_position(), (10.0, 20.0));
    }

    #[test]
    fn y_offset_is_reversed() {
        let mut m = MouseTracker::new(800, 600);
        m.on_cursor_moved(100.0, 100.0);
        assert_eq!(m.on_cursor_moved(110.0, 90.0), (10.0, 10.0));
        assert_eq!(m.on_cursor_moved(105.0, 95.0), (-5.0, -5.0));
    }

    #[test]
    fn focus_loss_rearms_baseline() {
        let mut m = MouseTracker::new(800, 600);
        m.on_cursor_moved(0.0, 0.0);
        m.on_focus_changed(false);
        assert_eq!(m.on_cursor_moved(500.0, 500.0), (0.0, 0.0));
    }

    #[test]
    fn focus_gain_keeps_tracking() {
        let mut m = MouseTracker::new(800, 600);
        m.on_cursor_moved(0.0, 0.0);
        m.on_focus_changed(true);
        assert_eq!(m.on_cursor_moved(3.0, 0.0), (3.0, 0.0));
    }
}
