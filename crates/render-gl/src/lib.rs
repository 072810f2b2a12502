//! OpenGL backend for the render core.
//!
//! [`GlowBackend`] implements `horizon_render::GraphicsApi` over a
//! `glow::Context`; [`GlSurface`] opens a winit window with a current
//! OpenGL 3.3 core context through glutin.
//!
//! # Invariants
//! - Every GL call happens on the thread that made the context current.
//! - Handle `0` is never passed to glow as an object; it maps to `None`.

mod backend;
pub mod convert;
mod surface;

pub use backend::GlowBackend;
pub use surface::{GlSurface, GlSurfaceError};

pub fn crate_info() -> &'static str {
    "horizon-render-gl v0.1.0"
}
