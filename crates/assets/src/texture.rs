//! Texture upload.
//!
//! Every loader is best-effort: on failure it logs the [`AssetError`] and
//! returns [`INVALID`], which samples as black.

use crate::error::AssetError;
use crate::raster::{self, HdrImage, RawImage, SkyImage};
use horizon_render::gl::{
    CubeFace, GraphicsApi, INVALID, ImageDesc, ImageTarget, PixelFormat, PixelType, Sampling,
    TextureTarget,
};
use std::path::Path;

fn log_invalid(e: AssetError) -> u32 {
    tracing::error!("{e}");
    INVALID
}

fn raw_desc(image: &RawImage) -> Result<ImageDesc, AssetError> {
    let desc = ImageDesc {
        width: image.width,
        height: image.height,
        format: PixelFormat::from_channels(image.channels),
        pixel_type: PixelType::U8,
    };
    if image.pixels.len() < desc.byte_len() {
        return Err(AssetError::ShortBuffer {
            expected: desc.byte_len(),
            actual: image.pixels.len(),
        });
    }
    Ok(desc)
}

/// Upload a decoded image as a repeating, mipmapped 2D texture.
pub fn texture_from_image<G: GraphicsApi>(gl: &G, image: &RawImage) -> u32 {
    try_texture_from_image(gl, image).unwrap_or_else(log_invalid)
}

fn try_texture_from_image<G: GraphicsApi>(gl: &G, image: &RawImage) -> Result<u32, AssetError> {
    let desc = raw_desc(image)?;
    let texture = gl.create_texture().map_err(AssetError::Create)?;
    gl.bind_texture(TextureTarget::Texture2d, texture);
    gl.set_sampling(TextureTarget::Texture2d, Sampling::REPEAT_LINEAR);
    gl.tex_image_2d(ImageTarget::Texture2d, desc, &image.pixels);
    gl.generate_mipmap(TextureTarget::Texture2d);
    Ok(texture)
}

/// Decode `path` and upload it with [`texture_from_image`].
pub fn load_texture<G: GraphicsApi>(gl: &G, path: impl AsRef<Path>) -> u32 {
    let path = path.as_ref();
    match raster::decode(path) {
        Ok(image) => {
            tracing::debug!(
                path = %path.display(),
                width = image.width,
                height = image.height,
                channels = image.channels,
                "texture decoded"
            );
            texture_from_image(gl, &image)
        }
        Err(e) => log_invalid(e),
    }
}

/// Upload an equirectangular sky map as a clamped 2D texture.
///
/// Radiance (`.hdr`) files keep float precision; other formats upload as
/// 8-bit.
pub fn load_equirect<G: GraphicsApi>(gl: &G, path: impl AsRef<Path>) -> u32 {
    let path = path.as_ref();
    let result = raster::decode_sky(path).and_then(|sky| {
        let hdr = matches!(sky, SkyImage::Hdr(_));
        tracing::debug!(path = %path.display(), hdr, "sky decoded");
        upload_sky(gl, &sky)
    });
    result.unwrap_or_else(log_invalid)
}

fn upload_sky<G: GraphicsApi>(gl: &G, sky: &SkyImage) -> Result<u32, AssetError> {
    let (desc, bytes): (ImageDesc, &[u8]) = match sky {
        SkyImage::Ldr(image) => (raw_desc(image)?, image.pixels.as_slice()),
        SkyImage::Hdr(HdrImage {
            width,
            height,
            pixels,
        }) => {
            let desc = ImageDesc {
                width: *width,
                height: *height,
                format: PixelFormat::Rgb,
                pixel_type: PixelType::F32,
            };
            let bytes: &[u8] = bytemuck::cast_slice(pixels);
            if bytes.len() < desc.byte_len() {
                return Err(AssetError::ShortBuffer {
                    expected: desc.byte_len(),
                    actual: bytes.len(),
                });
            }
            (desc, bytes)
        }
    };

    let texture = gl.create_texture().map_err(AssetError::Create)?;
    gl.bind_texture(TextureTarget::Texture2d, texture);
    gl.set_sampling(TextureTarget::Texture2d, Sampling::CLAMP_LINEAR);
    gl.tex_image_2d(ImageTarget::Texture2d, desc, bytes);
    Ok(texture)
}

/// Unwrap a horizontal-cross image into a clamped cubemap.
pub fn load_cubemap_cross<G: GraphicsApi>(gl: &G, path: impl AsRef<Path>) -> u32 {
    let path = path.as_ref();
    raster::decode(path)
        .and_then(|image| cubemap_from_cross(gl, &image))
        .unwrap_or_else(log_invalid)
}

pub fn cubemap_from_cross<G: GraphicsApi>(gl: &G, image: &RawImage) -> Result<u32, AssetError> {
    let faces = raster::cross_faces(image)?;
    let texture = gl.create_texture().map_err(AssetError::Create)?;
    gl.bind_texture(TextureTarget::CubeMap, texture);
    gl.set_sampling(TextureTarget::CubeMap, Sampling::CLAMP_LINEAR);
    for (target, face) in CubeFace::ALL.into_iter().zip(&faces) {
        let desc = raw_desc(face)?;
        gl.tex_image_2d(ImageTarget::CubeFace(target), desc, &face.pixels);
    }
    tracing::debug!(face_size = faces[0].width, "cubemap uploaded");
    Ok(texture)
}
