use std::path::PathBuf;

/// Errors from decoding, unwrapping or uploading images.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{width}x{height} image is too small to hold a cross cubemap")]
    CrossTooSmall { width: u32, height: u32 },
    #[error("face {face} ({size}px at {x},{y}) does not fit the {width}x{height} source")]
    FaceOutOfBounds {
        face: usize,
        x: u32,
        y: u32,
        size: u32,
        width: u32,
        height: u32,
    },
    #[error("pixel buffer holds {actual} bytes, {expected} needed")]
    ShortBuffer { expected: usize, actual: usize },
    #[error("failed to create texture: {0}")]
    Create(String),
}
