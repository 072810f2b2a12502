use crate::movement::MoveDirection;

/// A high-level action the desktop driver produces from raw key events.
///
/// Scenes and the camera consume actions, never raw key codes, so the key
/// bindings live in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Push the camera while held.
    Move(MoveDirection),
    /// Request the frame loop to stop.
    Quit,
    /// Switch between windowed and borderless fullscreen.
    ToggleFullscreen,
    /// Capture the pointer and enable camera input, or release it.
    ToggleCursorLock,
}

impl Action {
    /// Actions that act once per press rather than while held.
    pub fn is_edge_triggered(&self) -> bool {
        !matches!(self, Action::Move(_))
    }
}
