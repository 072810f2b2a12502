use crate::convert;
use glow::HasContext;
use horizon_render::gl::{
    AttributeType, BufferTarget, DepthFunc, GraphicsApi, ImageDesc, ImageTarget, Sampling,
    ShaderStage, TextureTarget, UniformLocation,
};
use std::num::NonZeroU32;

/// [`GraphicsApi`] over a current `glow::Context`.
///
/// Object handles cross the seam as raw GL names. The conversions below
/// turn name `0` into `None`, which glow treats as "unbind".
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    pub fn new(gl: glow::Context) -> Self {
        // rows of RGB8 images are not 4-byte aligned
        unsafe {
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
        }
        Self { gl }
    }

    pub fn version(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

impl std::fmt::Debug for GlowBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowBackend").finish_non_exhaustive()
    }
}

fn vertex_array(name: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn buffer(name: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn texture(name: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn shader(name: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn program(name: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn location(loc: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(loc.0)
}

impl GraphicsApi for GlowBackend {
    fn create_vertex_array(&self) -> Result<u32, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| v.0.get())
    }

    fn create_buffer(&self) -> Result<u32, String> {
        unsafe { self.gl.create_buffer() }.map(|b| b.0.get())
    }

    fn create_texture(&self) -> Result<u32, String> {
        unsafe { self.gl.create_texture() }.map(|t| t.0.get())
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        unsafe { self.gl.create_shader(convert::shader_stage(stage)) }.map(|s| s.0.get())
    }

    fn create_program(&self) -> Result<u32, String> {
        unsafe { self.gl.create_program() }.map(|p| p.0.get())
    }

    fn delete_vertex_array(&self, vao: u32) {
        if let Some(vao) = vertex_array(vao) {
            unsafe { self.gl.delete_vertex_array(vao) }
        }
    }

    fn delete_buffer(&self, name: u32) {
        if let Some(b) = buffer(name) {
            unsafe { self.gl.delete_buffer(b) }
        }
    }

    fn delete_texture(&self, name: u32) {
        if let Some(t) = texture(name) {
            unsafe { self.gl.delete_texture(t) }
        }
    }

    fn delete_shader(&self, name: u32) {
        if let Some(s) = shader(name) {
            unsafe { self.gl.delete_shader(s) }
        }
    }

    fn delete_program(&self, name: u32) {
        if let Some(p) = program(name) {
            unsafe { self.gl.delete_program(p) }
        }
    }

    fn bind_vertex_array(&self, vao: u32) {
        unsafe { self.gl.bind_vertex_array(vertex_array(vao)) }
    }

    fn bind_buffer(&self, target: BufferTarget, name: u32) {
        unsafe { self.gl.bind_buffer(convert::buffer_target(target), buffer(name)) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(convert::buffer_target(target), data, glow::STATIC_DRAW)
        }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        components: i32,
        kind: AttributeType,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                components,
                convert::attribute_type(kind),
                false,
                stride,
                offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn shader_source(&self, name: u32, source: &str) {
        if let Some(s) = shader(name) {
            unsafe { self.gl.shader_source(s, source) }
        }
    }

    fn compile_shader(&self, name: u32) {
        if let Some(s) = shader(name) {
            unsafe { self.gl.compile_shader(s) }
        }
    }

    fn shader_compile_status(&self, name: u32) -> bool {
        shader(name).is_some_and(|s| unsafe { self.gl.get_shader_compile_status(s) })
    }

    fn shader_info_log(&self, name: u32) -> String {
        shader(name)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn attach_shader(&self, prog: u32, name: u32) {
        if let (Some(p), Some(s)) = (program(prog), shader(name)) {
            unsafe { self.gl.attach_shader(p, s) }
        }
    }

    fn detach_shader(&self, prog: u32, name: u32) {
        if let (Some(p), Some(s)) = (program(prog), shader(name)) {
            unsafe { self.gl.detach_shader(p, s) }
        }
    }

    fn link_program(&self, name: u32) {
        if let Some(p) = program(name) {
            unsafe { self.gl.link_program(p) }
        }
    }

    fn program_link_status(&self, name: u32) -> bool {
        program(name).is_some_and(|p| unsafe { self.gl.get_program_link_status(p) })
    }

    fn program_info_log(&self, name: u32) -> String {
        program(name)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn use_program(&self, name: u32) {
        unsafe { self.gl.use_program(program(name)) }
    }

    fn uniform_location(&self, prog: u32, name: &str) -> Option<UniformLocation> {
        let p = program(prog)?;
        unsafe { self.gl.get_uniform_location(p, name) }.map(|loc| UniformLocation(loc.0))
    }

    fn uniform_1_i32(&self, loc: UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(&location(loc)), value) }
    }

    fn uniform_1_f32(&self, loc: UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(&location(loc)), value) }
    }

    fn uniform_2_f32(&self, loc: UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(Some(&location(loc)), x, y) }
    }

    fn uniform_3_f32(&self, loc: UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(Some(&location(loc)), x, y, z) }
    }

    fn uniform_matrix_4_f32(&self, loc: UniformLocation, value: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(&location(loc)), false, value)
        }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: TextureTarget, name: u32) {
        unsafe { self.gl.bind_texture(convert::texture_target(target), texture(name)) }
    }

    fn set_sampling(&self, target: TextureTarget, sampling: Sampling) {
        let target = convert::texture_target(target);
        let wrap = convert::wrap(sampling.wrap);
        unsafe {
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap);
            if target == glow::TEXTURE_CUBE_MAP {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_R, wrap);
            }
            self.gl
                .tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, convert::min_filter(sampling));
            self.gl
                .tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, convert::mag_filter(sampling));
        }
    }

    fn tex_image_2d(&self, target: ImageTarget, desc: ImageDesc, pixels: &[u8]) {
        if pixels.len() < desc.byte_len() {
            tracing::error!(
                expected = desc.byte_len(),
                actual = pixels.len(),
                "texture upload skipped: pixel buffer too short"
            );
            return;
        }
        unsafe {
            self.gl.tex_image_2d(
                convert::image_target(target),
                0,
                convert::internal_format(desc.format, desc.pixel_type),
                desc.width as i32,
                desc.height as i32,
                0,
                convert::pixel_format(desc.format),
                convert::pixel_type(desc.pixel_type),
                glow::PixelUnpackData::Slice(Some(pixels)),
            )
        }
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        unsafe { self.gl.generate_mipmap(convert::texture_target(target)) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_depth_func(&self, func: DepthFunc) {
        unsafe { self.gl.depth_func(convert::depth_func(func)) }
    }

    fn set_depth_write(&self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn draw_elements(&self, count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_INT, 0)
        }
    }

    fn read_pixels_rgb(&self, width: u32, height: u32, out: &mut [u8]) {
        let needed = width as usize * height as usize * 3;
        if out.len() < needed {
            tracing::error!(needed, actual = out.len(), "read-back buffer too short");
            return;
        }
        unsafe {
            self.gl.read_pixels(
                0,
                0,
                width as i32,
                height as i32,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(&mut out[..needed])),
            )
        }
    }
}
