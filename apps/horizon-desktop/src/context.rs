use horizon_input::{Action, MouseTracker, MoveDirection, Movement};
use horizon_render::Camera;
use horizon_tools::FrameTimer;
use winit::keyboard::KeyCode;

/// Wheel pixels that count as one scroll line on touchpads.
pub const PIXELS_PER_LINE: f64 = 20.0;

pub fn action_for_key(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::KeyW => Action::Move(MoveDirection::Forward),
        KeyCode::KeyS => Action::Move(MoveDirection::Backward),
        KeyCode::KeyA => Action::Move(MoveDirection::Left),
        KeyCode::KeyD => Action::Move(MoveDirection::Right),
        KeyCode::Space => Action::Move(MoveDirection::Up),
        KeyCode::ShiftLeft => Action::Move(MoveDirection::Down),
        KeyCode::Escape => Action::Quit,
        KeyCode::F11 => Action::ToggleFullscreen,
        KeyCode::Tab => Action::ToggleCursorLock,
        _ => return None,
    };
    Some(action)
}

/// Something the window has to do in response to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Quit,
    SetFullscreen(bool),
    /// Hide and grab the pointer (`true`) or release it.
    GrabCursor(bool),
}

/// Per-window state: framebuffer size, camera and input bookkeeping.
///
/// Handlers only touch this struct and return a [`WindowCommand`] when the
/// window itself must change, so they run without a display.
#[derive(Debug)]
pub struct AppContext {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub mouse: MouseTracker,
    pub movement: Movement,
    pub fullscreen: bool,
    pub timer: FrameTimer,
    /// Look input comes from raw device motion instead of cursor
    /// positions. Set while the pointer is hard-locked, since the cursor
    /// then stops moving.
    pub raw_motion: bool,
    /// Frames are being captured at a fixed size; the window must not
    /// switch to fullscreen.
    pub recording: bool,
}

impl AppContext {
    pub fn new(width: u32, height: u32, camera: Camera) -> Self {
        Self {
            width,
            height,
            camera,
            mouse: MouseTracker::new(width, height),
            movement: Movement::new(),
            fullscreen: false,
            timer: FrameTimer::new(),
            raw_motion: false,
            recording: false,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "framebuffer resized");
        self.width = width;
        self.height = height;
    }

    pub fn on_cursor_move(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.mouse.on_cursor_moved(x, y);
        if !self.raw_motion {
            self.camera.process_look(dx, dy);
        }
    }

    /// Relative pointer motion in device units, y growing downwards.
    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.raw_motion {
            self.camera.process_look(dx as f32, -dy as f32);
        }
    }

    pub fn on_scroll(&mut self, _dx: f32, dy: f32) {
        self.camera.process_zoom(dy);
    }

    pub fn on_focus_change(&mut self, focused: bool) {
        self.mouse.on_focus_changed(focused);
        if !focused {
            // releases are not delivered to an unfocused window
            self.movement.clear();
        }
    }

    pub fn on_key(&mut self, action: Action, pressed: bool) -> Option<WindowCommand> {
        match action {
            Action::Move(dir) => {
                self.movement.set(dir, pressed);
                None
            }
            _ if !pressed => None,
            Action::Quit => Some(WindowCommand::Quit),
            Action::ToggleFullscreen if self.recording => {
                tracing::warn!("fullscreen is disabled while recording");
                None
            }
            Action::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                tracing::info!(fullscreen = self.fullscreen, "toggled fullscreen");
                Some(WindowCommand::SetFullscreen(self.fullscreen))
            }
            Action::ToggleCursorLock => {
                if self.camera.is_locked() {
                    self.camera.unlock();
                } else {
                    self.camera.lock();
                }
                Some(WindowCommand::GrabCursor(self.camera.is_locked()))
            }
        }
    }

    /// A left click locks the camera; it never unlocks.
    pub fn on_click(&mut self) -> Option<WindowCommand> {
        if self.camera.is_locked() {
            return None;
        }
        self.camera.lock();
        Some(WindowCommand::GrabCursor(true))
    }

    /// Apply held movement for this frame.
    pub fn update(&mut self, dt: f32) {
        self.camera.process_movement(&self.movement, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn ctx() -> AppContext {
        AppContext::new(800, 600, Camera::default())
    }

    #[test]
    fn key_bindings() {
        assert_eq!(
            action_for_key(KeyCode::KeyW),
            Some(Action::Move(MoveDirection::Forward))
        );
        assert_eq!(
            action_for_key(KeyCode::ShiftLeft),
            Some(Action::Move(MoveDirection::Down))
        );
        assert_eq!(action_for_key(KeyCode::Escape), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::F11), Some(Action::ToggleFullscreen));
        assert_eq!(action_for_key(KeyCode::Tab), Some(Action::ToggleCursorLock));
        assert_eq!(action_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn aspect_ratio_guards_zero_height() {
        let mut c = ctx();
        assert!((c.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
        c.on_resize(1024, 0);
        assert_eq!(c.aspect_ratio(), 1.0);
    }

    #[test]
    fn tab_toggles_lock() {
        let mut c = ctx();
        assert_eq!(
            c.on_key(Action::ToggleCursorLock, true),
            Some(WindowCommand::GrabCursor(true))
        );
        assert!(c.camera.is_locked());
        assert_eq!(c.on_key(Action::ToggleCursorLock, false), None);
        assert_eq!(
            c.on_key(Action::ToggleCursorLock, true),
            Some(WindowCommand::GrabCursor(false))
        );
        assert!(!c.camera.is_locked());
    }

    #[test]
    fn click_only_locks() {
        let mut c = ctx();
        assert_eq!(c.on_click(), Some(WindowCommand::GrabCursor(true)));
        assert_eq!(c.on_click(), None);
        assert!(c.camera.is_locked());
    }

    #[test]
    fn fullscreen_flips_on_press() {
        let mut c = ctx();
        assert_eq!(
            c.on_key(Action::ToggleFullscreen, true),
            Some(WindowCommand::SetFullscreen(true))
        );
        assert_eq!(
            c.on_key(Action::ToggleFullscreen, true),
            Some(WindowCommand::SetFullscreen(false))
        );
        assert!(!c.fullscreen);
    }

    #[test]
    fn fullscreen_is_ignored_while_recording() {
        let mut c = ctx();
        c.recording = true;
        assert_eq!(c.on_key(Action::ToggleFullscreen, true), None);
        assert!(!c.fullscreen);

        c.recording = false;
        assert_eq!(
            c.on_key(Action::ToggleFullscreen, true),
            Some(WindowCommand::SetFullscreen(true))
        );
    }

    #[test]
    fn escape_quits() {
        let mut c = ctx();
        assert_eq!(c.on_key(Action::Quit, true), Some(WindowCommand::Quit));
        assert_eq!(c.on_key(Action::Quit, false), None);
    }

    #[test]
    fn held_keys_move_a_locked_camera() {
        let mut c = ctx();
        c.on_key(Action::Move(MoveDirection::Forward), true);
        c.update(0.5);
        assert_eq!(c.camera.position, Vec3::new(0.0, 0.0, 3.0));

        c.on_click();
        c.update(0.5);
        assert!(c.camera.position.z < 3.0);

        let z = c.camera.position.z;
        c.on_key(Action::Move(MoveDirection::Forward), false);
        c.update(0.5);
        assert_eq!(c.camera.position.z, z);
    }

    #[test]
    fn focus_loss_drops_held_keys() {
        let mut c = ctx();
        c.on_key(Action::Move(MoveDirection::Left), true);
        c.on_focus_change(false);
        assert!(c.movement.is_empty());
    }

    #[test]
    fn cursor_look_uses_positions() {
        let mut c = ctx();
        c.on_click();
        c.on_cursor_move(400.0, 300.0);
        assert_eq!(c.camera.yaw(), -90.0);
        c.on_cursor_move(500.0, 300.0);
        assert!(c.camera.yaw() > -90.0);
        // raw deltas are ignored in this mode
        let yaw = c.camera.yaw();
        c.on_mouse_motion(100.0, 0.0);
        assert_eq!(c.camera.yaw(), yaw);
    }

    #[test]
    fn raw_motion_look() {
        let mut c = ctx();
        c.on_click();
        c.raw_motion = true;
        c.on_cursor_move(400.0, 300.0);
        c.on_cursor_move(900.0, 300.0);
        assert_eq!(c.camera.yaw(), -90.0);

        c.on_mouse_motion(0.0, -10.0);
        assert!(c.camera.pitch() > 0.0);
    }

    #[test]
    fn scroll_zooms_a_locked_camera() {
        let mut c = ctx();
        c.on_scroll(0.0, 1.0);
        assert_eq!(c.camera.fov, 45.0);
        c.on_click();
        c.on_scroll(0.0, 1.0);
        assert!(c.camera.fov < 45.0);
    }

    #[test]
    fn camera_state_dumps_as_json() {
        let mut c = ctx();
        c.camera.position = Vec3::new(1.0, 2.0, 3.0);
        let json = serde_json::to_string(&c.camera).unwrap();
        let back: Camera = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c.camera);
    }
}
