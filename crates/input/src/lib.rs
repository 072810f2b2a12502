//! Input vocabulary shared by the camera and the desktop driver.
//!
//! # Invariants
//! - No windowing types leak into this crate; the driver maps its own key
//!   codes onto [`Action`].
//! - Cursor positions become look offsets only through [`MouseTracker`].

pub mod action;
pub mod mouse;
pub mod movement;

pub use action::Action;
pub use mouse::MouseTracker;
pub use movement::{MoveDirection, Movement};

pub fn crate_info() -> &'static str {
    "horizon-input v0.1.0"
}
