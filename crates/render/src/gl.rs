//! The graphics-API seam.
//!
//! [`GraphicsApi`] is the narrow slice of OpenGL the core needs. Object
//! handles are plain `u32` names with [`INVALID`] as the "no object" value,
//! exactly as GL itself reports them, so the core can store and zero them
//! without knowing which backend produced them.

/// Sentinel for "no GPU object".
pub const INVALID: u32 = 0;

/// Location of a uniform inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

/// Scalar type of one vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    F32,
    I32,
    U32,
    I16,
    U16,
    I8,
    U8,
}

impl AttributeType {
    pub fn size_bytes(self) -> usize {
        match self {
            AttributeType::F32 | AttributeType::I32 | AttributeType::U32 => 4,
            AttributeType::I16 | AttributeType::U16 => 2,
            AttributeType::I8 | AttributeType::U8 => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    Texture2d,
    CubeMap,
}

/// Where a `tex_image_2d` upload lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Texture2d,
    CubeFace(CubeFace),
}

/// One face of a cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// GL upload order: +X, -X, +Y, -Y, +Z, -Z.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Offset from `TEXTURE_CUBE_MAP_POSITIVE_X`.
    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Format for a decoded image with `channels` interleaved components.
    /// Unknown channel counts fall back to RGB.
    pub fn from_channels(channels: u8) -> Self {
        match channels {
            1 => PixelFormat::Red,
            4 => PixelFormat::Rgba,
            _ => PixelFormat::Rgb,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    U8,
    F32,
}

impl PixelType {
    pub fn size_bytes(self) -> usize {
        match self {
            PixelType::U8 => 1,
            PixelType::F32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
}

/// Sampler state applied to the currently bound texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub wrap: Wrap,
    pub linear: bool,
    pub mipmaps: bool,
}

impl Sampling {
    pub const REPEAT_LINEAR: Sampling = Sampling {
        wrap: Wrap::Repeat,
        linear: true,
        mipmaps: true,
    };

    pub const CLAMP_LINEAR: Sampling = Sampling {
        wrap: Wrap::ClampToEdge,
        linear: true,
        mipmaps: false,
    };
}

/// Image description for a texture upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixel_type: PixelType,
}

impl ImageDesc {
    pub fn byte_len(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.format.channels()
            * self.pixel_type.size_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessEqual,
}

/// The OpenGL entry points used by meshes, shaders, textures and scenes.
///
/// Every method takes `&self`: GL state lives in the driver, not in the
/// Rust value, and all calls happen on the thread owning the context.
/// Creation methods return the backend's error string on failure; callers
/// decide whether that degrades to [`INVALID`].
pub trait GraphicsApi {
    // objects
    fn create_vertex_array(&self) -> Result<u32, String>;
    fn create_buffer(&self) -> Result<u32, String>;
    fn create_texture(&self) -> Result<u32, String>;
    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String>;
    fn create_program(&self) -> Result<u32, String>;
    fn delete_vertex_array(&self, vao: u32);
    fn delete_buffer(&self, buffer: u32);
    fn delete_texture(&self, texture: u32);
    fn delete_shader(&self, shader: u32);
    fn delete_program(&self, program: u32);

    // vertex state
    fn bind_vertex_array(&self, vao: u32);
    fn bind_buffer(&self, target: BufferTarget, buffer: u32);
    /// Upload `data` to the buffer bound at `target` with static usage.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        components: i32,
        kind: AttributeType,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);

    // shaders
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn attach_shader(&self, program: u32, shader: u32);
    fn detach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);

    // uniforms
    fn uniform_location(&self, program: u32, name: &str) -> Option<UniformLocation>;
    fn uniform_1_i32(&self, location: UniformLocation, value: i32);
    fn uniform_1_f32(&self, location: UniformLocation, value: f32);
    fn uniform_2_f32(&self, location: UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32);
    /// Column-major 4x4 matrix, not transposed.
    fn uniform_matrix_4_f32(&self, location: UniformLocation, value: &[f32; 16]);

    // textures
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture(&self, target: TextureTarget, texture: u32);
    fn set_sampling(&self, target: TextureTarget, sampling: Sampling);
    fn tex_image_2d(&self, target: ImageTarget, desc: ImageDesc, pixels: &[u8]);
    fn generate_mipmap(&self, target: TextureTarget);

    // frame
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear(&self, r: f32, g: f32, b: f32, a: f32);
    fn set_depth_test(&self, enabled: bool);
    fn set_depth_func(&self, func: DepthFunc);
    fn set_depth_write(&self, enabled: bool);
    fn draw_arrays(&self, first: i32, count: i32);
    fn draw_elements(&self, count: i32);
    /// Read back the bottom-left `width x height` region as tightly packed RGB8.
    fn read_pixels_rgb(&self, width: u32, height: u32, out: &mut [u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_sizes() {
        assert_eq!(AttributeType::F32.size_bytes(), 4);
        assert_eq!(AttributeType::U16.size_bytes(), 2);
        assert_eq!(AttributeType::I8.size_bytes(), 1);
    }

    #[test]
    fn pixel_format_from_channels() {
        assert_eq!(PixelFormat::from_channels(1), PixelFormat::Red);
        assert_eq!(PixelFormat::from_channels(3), PixelFormat::Rgb);
        assert_eq!(PixelFormat::from_channels(4), PixelFormat::Rgba);
        assert_eq!(PixelFormat::from_channels(2), PixelFormat::Rgb);
    }

    #[test]
    fn image_desc_byte_len() {
        let desc = ImageDesc {
            width: 4,
            height: 2,
            format: PixelFormat::Rgb,
            pixel_type: PixelType::F32,
        };
        assert_eq!(desc.byte_len(), 4 * 2 * 3 * 4);
    }

    #[test]
    fn cube_faces_index_in_upload_order() {
        let indices: Vec<u32> = CubeFace::ALL.into_iter().map(CubeFace::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }
}
