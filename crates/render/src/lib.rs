//! Render core: camera, geometry, transforms and shader programs.
//!
//! Everything here talks to the GPU through [`GraphicsApi`], so the same
//! code runs against real OpenGL (`horizon-render-gl`) and against the
//! recording [`HeadlessGl`] in tests.
//!
//! # Invariants
//! - GPU object handles are `u32` names; `0` means "no object".
//! - Resource failures (missing shader file, compile/link errors, refused
//!   object creation) are logged and produce an invalid or unlinked
//!   resource. They never abort a frame.
//! - The camera basis is always orthonormal and pitch stays in `[-89, 89]`.

pub mod camera;
pub mod error;
pub mod gl;
pub mod headless;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod shader;
pub mod shapes;

pub use camera::{Camera, CameraState, Orbit};
pub use error::GfxError;
pub use gl::{GraphicsApi, INVALID};
pub use headless::HeadlessGl;
pub use mesh::{Mesh, VertexAttribute};
pub use model::Model;
pub use scene::{FrameInfo, Scene};
pub use shader::ShaderProgram;

pub fn crate_info() -> &'static str {
    "horizon-render v0.1.0"
}
