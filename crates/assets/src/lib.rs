//! Images in, GPU textures out.
//!
//! Decoding goes through the `image` crate. Uploads go through
//! `horizon_render::GraphicsApi`, so the loaders work on any backend.
//!
//! # Layout
//! Cross cubemaps are a 4x3 grid of cells: `-X +Z +X -Z` across the middle
//! row, `+Y` above `+Z` and `-Y` below it. Faces are square with side
//! `min(width / 4, height / 3)`.

mod error;
pub mod raster;
pub mod texture;

pub use error::AssetError;
pub use raster::{CrossLayout, FACE_NAMES, HdrImage, RawImage, SkyImage, cross_faces, decode};
pub use texture::{load_cubemap_cross, load_equirect, load_texture, texture_from_image};

pub fn crate_info() -> &'static str {
    "horizon-assets v0.1.0"
}
