use crate::gl::ShaderStage;
use std::path::PathBuf;

/// Resource failures inside the render core.
///
/// None of these abort rendering: callers log them and carry on with an
/// invalid or unlinked resource.
#[derive(Debug, thiserror::Error)]
pub enum GfxError {
    #[error("failed to read shader source {}: {source}", .path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} shader compilation failed:\n{log}", .stage.name())]
    Compile { stage: ShaderStage, log: String },
    #[error("program linking failed:\n{0}")]
    Link(String),
    #[error("failed to create GPU object ({what}): {reason}")]
    Create { what: &'static str, reason: String },
}
