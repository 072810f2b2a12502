use crate::error::AssetError;
use image::{ColorType, DynamicImage, ExtendedColorType};
use std::path::Path;

/// Face names in GL cube-face order.
pub const FACE_NAMES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

/// Decoded 8-bit image, rows top to bottom, channels interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl RawImage {
    /// Keep 1, 3 and 4 channel images as they are; convert anything else
    /// to RGB.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, pixels) = match img.color().channel_count() {
            1 => (1, img.into_luma8().into_raw()),
            4 => (4, img.into_rgba8().into_raw()),
            _ => (3, img.into_rgb8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Bytes a consistent buffer of this size holds.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Copy the `size x size` square whose top-left corner is `(x, y)`.
    ///
    /// Returns `None` when the square leaves the image, when `size` is
    /// zero, or when `pixels` is shorter than the stated dimensions.
    pub fn crop_square(&self, x: u32, y: u32, size: u32) -> Option<RawImage> {
        if size == 0 || self.pixels.len() < self.expected_len() {
            return None;
        }
        if x.checked_add(size)? > self.width || y.checked_add(size)? > self.height {
            return None;
        }

        let ch = self.channels as usize;
        let row_len = size as usize * ch;
        let mut pixels = Vec::with_capacity(row_len * size as usize);
        for row in 0..size as usize {
            let start = ((y as usize + row) * self.width as usize + x as usize) * ch;
            pixels.extend_from_slice(&self.pixels[start..start + row_len]);
        }

        Some(RawImage {
            width: size,
            height: size,
            channels: self.channels,
            pixels,
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        let color = match self.channels {
            1 => ColorType::L8,
            4 => ColorType::Rgba8,
            _ => ColorType::Rgb8,
        };
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::from(color),
            image::ImageFormat::Png,
        )
        .map_err(|source| AssetError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Decoded floating-point RGB image.
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

impl HdrImage {
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        Self {
            width,
            height,
            pixels: img.into_rgb32f().into_raw(),
        }
    }
}

/// Either kind of sky image.
#[derive(Debug, Clone, PartialEq)]
pub enum SkyImage {
    Ldr(RawImage),
    Hdr(HdrImage),
}

pub(crate) fn open(path: &Path) -> Result<DynamicImage, AssetError> {
    image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode an 8-bit image file.
pub fn decode(path: impl AsRef<Path>) -> Result<RawImage, AssetError> {
    let img = open(path.as_ref())?;
    Ok(RawImage::from_dynamic(img))
}

/// Decode a sky image, keeping float precision when the file has it.
pub fn decode_sky(path: impl AsRef<Path>) -> Result<SkyImage, AssetError> {
    let img = open(path.as_ref())?;
    Ok(match img.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => SkyImage::Hdr(HdrImage::from_dynamic(img)),
        _ => SkyImage::Ldr(RawImage::from_dynamic(img)),
    })
}

/// Face size and top-left corners of a horizontal-cross cubemap.
///
/// ```text
///        +Y
///   -X   +Z   +X   -Z
///        -Y
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossLayout {
    pub face_size: u32,
    /// In GL cube-face order: +X, -X, +Y, -Y, +Z, -Z.
    pub origins: [(u32, u32); 6],
}

impl CrossLayout {
    /// `None` if the image is smaller than 4x3 pixels.
    pub fn for_size(width: u32, height: u32) -> Option<Self> {
        let (fw, fh) = (width / 4, height / 3);
        let face_size = fw.min(fh);
        if face_size == 0 {
            return None;
        }
        Some(Self {
            face_size,
            origins: [
                (2 * fw, fh),
                (0, fh),
                (fw, 0),
                (fw, 2 * fh),
                (fw, fh),
                (3 * fw, fh),
            ],
        })
    }
}

/// Crop the six faces of a cross cubemap, in GL cube-face order.
pub fn cross_faces(image: &RawImage) -> Result<Vec<RawImage>, AssetError> {
    let layout =
        CrossLayout::for_size(image.width, image.height).ok_or(AssetError::CrossTooSmall {
            width: image.width,
            height: image.height,
        })?;

    if image.pixels.len() < image.expected_len() {
        return Err(AssetError::ShortBuffer {
            expected: image.expected_len(),
            actual: image.pixels.len(),
        });
    }

    layout
        .origins
        .iter()
        .enumerate()
        .map(|(face, &(x, y))| {
            image
                .crop_square(x, y, layout.face_size)
                .ok_or(AssetError::FaceOutOfBounds {
                    face,
                    x,
                    y,
                    size: layout.face_size,
                    width: image.width,
                    height: image.height,
                })
        })
        .collect()
}
