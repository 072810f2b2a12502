//! Developer tooling: frame timing, camera inspection, video capture.
//!
//! # Invariants
//! - Tools observe the renderer; none of them change what is drawn.
//! - A failing recorder never takes the render loop down with it.

pub mod inspector;
pub mod recorder;
pub mod timer;

pub use inspector::{CameraInspector, CameraSummary};
pub use recorder::{FrameRecorder, RecorderConfig, ToolsError};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "horizon-tools v0.1.0"
}
