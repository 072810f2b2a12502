//! Render-core enums to OpenGL constants.

use horizon_render::gl::{
    AttributeType, BufferTarget, DepthFunc, ImageTarget, PixelFormat, PixelType, Sampling,
    ShaderStage, TextureTarget, Wrap,
};

pub fn shader_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub fn attribute_type(kind: AttributeType) -> u32 {
    match kind {
        AttributeType::F32 => glow::FLOAT,
        AttributeType::I32 => glow::INT,
        AttributeType::U32 => glow::UNSIGNED_INT,
        AttributeType::I16 => glow::SHORT,
        AttributeType::U16 => glow::UNSIGNED_SHORT,
        AttributeType::I8 => glow::BYTE,
        AttributeType::U8 => glow::UNSIGNED_BYTE,
    }
}

pub fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2d => glow::TEXTURE_2D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
    }
}

pub fn image_target(target: ImageTarget) -> u32 {
    match target {
        ImageTarget::Texture2d => glow::TEXTURE_2D,
        ImageTarget::CubeFace(face) => glow::TEXTURE_CUBE_MAP_POSITIVE_X + face.index(),
    }
}

pub fn pixel_format(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Red => glow::RED,
        PixelFormat::Rgb => glow::RGB,
        PixelFormat::Rgba => glow::RGBA,
    }
}

pub fn pixel_type(ty: PixelType) -> u32 {
    match ty {
        PixelType::U8 => glow::UNSIGNED_BYTE,
        PixelType::F32 => glow::FLOAT,
    }
}

/// 8-bit uploads keep the unsized client format; float uploads go to
/// half-float storage.
pub fn internal_format(format: PixelFormat, ty: PixelType) -> i32 {
    let internal = match (ty, format) {
        (PixelType::U8, f) => pixel_format(f),
        (PixelType::F32, PixelFormat::Red) => glow::R16F,
        (PixelType::F32, PixelFormat::Rgb) => glow::RGB16F,
        (PixelType::F32, PixelFormat::Rgba) => glow::RGBA16F,
    };
    internal as i32
}

pub fn wrap(wrap: Wrap) -> i32 {
    match wrap {
        Wrap::Repeat => glow::REPEAT as i32,
        Wrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
    }
}

pub fn min_filter(sampling: Sampling) -> i32 {
    let filter = match (sampling.linear, sampling.mipmaps) {
        (true, true) => glow::LINEAR_MIPMAP_LINEAR,
        (true, false) => glow::LINEAR,
        (false, true) => glow::NEAREST_MIPMAP_NEAREST,
        (false, false) => glow::NEAREST,
    };
    filter as i32
}

pub fn mag_filter(sampling: Sampling) -> i32 {
    if sampling.linear {
        glow::LINEAR as i32
    } else {
        glow::NEAREST as i32
    }
}

pub fn depth_func(func: DepthFunc) -> u32 {
    match func {
        DepthFunc::Less => glow::LESS,
        DepthFunc::LessEqual => glow::LEQUAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_render::gl::CubeFace;

    #[test]
    fn cube_faces_follow_gl_order() {
        let faces: Vec<u32> = CubeFace::ALL
            .into_iter()
            .map(|face| image_target(ImageTarget::CubeFace(face)))
            .collect();
        assert_eq!(
            faces,
            vec![
                glow::TEXTURE_CUBE_MAP_POSITIVE_X,
                glow::TEXTURE_CUBE_MAP_NEGATIVE_X,
                glow::TEXTURE_CUBE_MAP_POSITIVE_Y,
                glow::TEXTURE_CUBE_MAP_NEGATIVE_Y,
                glow::TEXTURE_CUBE_MAP_POSITIVE_Z,
                glow::TEXTURE_CUBE_MAP_NEGATIVE_Z,
            ]
        );
    }

    #[test]
    fn internal_formats() {
        assert_eq!(
            internal_format(PixelFormat::Rgb, PixelType::U8),
            glow::RGB as i32
        );
        assert_eq!(
            internal_format(PixelFormat::Red, PixelType::U8),
            glow::RED as i32
        );
        assert_eq!(
            internal_format(PixelFormat::Rgb, PixelType::F32),
            glow::RGB16F as i32
        );
    }

    #[test]
    fn filters_follow_sampling() {
        assert_eq!(
            min_filter(Sampling::REPEAT_LINEAR),
            glow::LINEAR_MIPMAP_LINEAR as i32
        );
        assert_eq!(min_filter(Sampling::CLAMP_LINEAR), glow::LINEAR as i32);
        assert_eq!(mag_filter(Sampling::REPEAT_LINEAR), glow::LINEAR as i32);
        assert_eq!(wrap(Wrap::ClampToEdge), glow::CLAMP_TO_EDGE as i32);
    }

    #[test]
    fn enums_map_to_gl() {
        assert_eq!(shader_stage(ShaderStage::Vertex), glow::VERTEX_SHADER);
        assert_eq!(buffer_target(BufferTarget::ElementArray), glow::ELEMENT_ARRAY_BUFFER);
        assert_eq!(attribute_type(AttributeType::U8), glow::UNSIGNED_BYTE);
        assert_eq!(texture_target(TextureTarget::CubeMap), glow::TEXTURE_CUBE_MAP);
        assert_eq!(pixel_type(PixelType::F32), glow::FLOAT);
        assert_eq!(depth_func(DepthFunc::LessEqual), glow::LEQUAL);
    }
}
