//! A recording [`GraphicsApi`] backend that needs no GPU.
//!
//! `HeadlessGl` hands out object names, tracks which objects are alive, and
//! logs every call. Linking collects the `uniform` declarations of the
//! attached sources so name lookups behave like a real driver: declared
//! names resolve, anything else does not. Tests use it to check exactly
//! which calls the core issues.

use crate::gl::{
    AttributeType, BufferTarget, DepthFunc, GraphicsApi, ImageDesc, ImageTarget, Sampling,
    ShaderStage, TextureTarget, UniformLocation,
};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

/// A uniform value as it was uploaded.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateVertexArray(u32),
    CreateBuffer(u32),
    CreateTexture(u32),
    CreateShader(ShaderStage, u32),
    CreateProgram(u32),
    DeleteVertexArray(u32),
    DeleteBuffer(u32),
    DeleteTexture(u32),
    DeleteShader(u32),
    DeleteProgram(u32),
    BindVertexArray(u32),
    BindBuffer(BufferTarget, u32),
    BufferData(BufferTarget, usize),
    VertexAttribPointer {
        index: u32,
        components: i32,
        kind: AttributeType,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    CompileShader(u32),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(u32),
    Uniform { program: u32, name: String, value: UniformValue },
    ActiveTexture(u32),
    BindTexture(TextureTarget, u32),
    SetSampling(TextureTarget, Sampling),
    TexImage2d(ImageTarget, ImageDesc),
    GenerateMipmap(TextureTarget),
    Viewport(i32, i32, i32, i32),
    Clear,
    DepthTest(bool),
    DepthFunc(DepthFunc),
    DepthWrite(bool),
    DrawArrays { first: i32, count: i32 },
    DrawElements { count: i32 },
    ReadPixels { width: u32, height: u32 },
}

#[derive(Debug)]
struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    uniforms: Vec<String>,
    log: String,
}

#[derive(Debug, Default)]
struct State {
    next_name: u32,
    calls: Vec<GlCall>,
    live: BTreeSet<u32>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    /// Location index -> (program, uniform name).
    locations: Vec<(u32, String)>,
    current_program: u32,
    fail_creation: bool,
}

impl State {
    fn allocate(&mut self) -> Result<u32, String> {
        if self.fail_creation {
            return Err("headless: object creation disabled".into());
        }
        self.next_name += 1;
        self.live.insert(self.next_name);
        Ok(self.next_name)
    }

    fn release(&mut self, name: u32) {
        self.live.remove(&name);
    }

    fn record_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        if let Some((program, name)) = self.locations.get(location.0 as usize).cloned() {
            self.calls.push(GlCall::Uniform {
                program,
                name,
                value,
            });
        }
    }
}

/// Recording backend. See the module docs.
#[derive(Debug, Default)]
pub struct HeadlessGl {
    state: RefCell<State>,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_*` call fail, as a lost context would.
    pub fn fail_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_creation = fail;
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Return and forget the recorded calls.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Number of objects created and not yet deleted.
    pub fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn is_live(&self, name: u32) -> bool {
        self.state.borrow().live.contains(&name)
    }

    /// The most recent value uploaded to uniform `name`, on any program.
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.state
            .borrow()
            .calls
            .iter()
            .rev()
            .find_map(|call| match call {
                GlCall::Uniform { name: n, value, .. } if n == name => Some(value.clone()),
                _ => None,
            })
    }

    /// Number of draw calls of either kind.
    pub fn draw_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, GlCall::DrawArrays { .. } | GlCall::DrawElements { .. }))
            .count()
    }

    fn push(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

/// Names declared by `uniform <type> <name>;` lines.
fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let rest = line.trim().strip_prefix("uniform ")?;
        let name = rest.split_whitespace().nth(1)?;
        let name = name.trim_end_matches(';');
        let name = name.split('[').next().unwrap_or(name);
        (!name.is_empty()).then(|| name.to_string())
    })
}

impl GraphicsApi for HeadlessGl {
    fn create_vertex_array(&self) -> Result<u32, String> {
        let name = self.state.borrow_mut().allocate()?;
        self.push(GlCall::CreateVertexArray(name));
        Ok(name)
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let name = self.state.borrow_mut().allocate()?;
        self.push(GlCall::CreateBuffer(name));
        Ok(name)
    }

    fn create_texture(&self) -> Result<u32, String> {
        let name = self.state.borrow_mut().allocate()?;
        self.push(GlCall::CreateTexture(name));
        Ok(name)
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.allocate()?;
        state.shaders.insert(
            name,
            ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        state.calls.push(GlCall::CreateShader(stage, name));
        Ok(name)
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.allocate()?;
        state.programs.insert(name, ProgramObject::default());
        state.calls.push(GlCall::CreateProgram(name));
        Ok(name)
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.state.borrow_mut().release(vao);
        self.push(GlCall::DeleteVertexArray(vao));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.state.borrow_mut().release(buffer);
        self.push(GlCall::DeleteBuffer(buffer));
    }

    fn delete_texture(&self, texture: u32) {
        self.state.borrow_mut().release(texture);
        self.push(GlCall::DeleteTexture(texture));
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.release(shader);
        state.calls.push(GlCall::DeleteShader(shader));
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.release(program);
        state.programs.remove(&program);
        state.calls.push(GlCall::DeleteProgram(program));
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.push(GlCall::BindVertexArray(vao));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        self.push(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.push(GlCall::BufferData(target, data.len()));
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        components: i32,
        kind: AttributeType,
        stride: i32,
        offset: i32,
    ) {
        self.push(GlCall::VertexAttribPointer {
            index,
            components,
            kind,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.push(GlCall::EnableVertexAttribArray(index));
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(obj) = self.state.borrow_mut().shaders.get_mut(&shader) {
            obj.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(obj) = state.shaders.get_mut(&shader) {
            obj.compiled = !obj.source.trim().is_empty() && !obj.source.contains("#error");
        }
        state.calls.push(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(s) if !s.compiled && s.source.trim().is_empty() => {
                "0:0: error: empty shader source".into()
            }
            Some(s) if !s.compiled => "0:1: error: #error directive".into(),
            _ => String::new(),
        }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.push(shader);
        }
        state.calls.push(GlCall::AttachShader { program, shader });
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
        state.calls.push(GlCall::DetachShader { program, shader });
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let attached = match state.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => return,
        };

        let mut stages = Vec::new();
        let mut uniforms = Vec::new();
        let mut all_compiled = true;
        for shader in &attached {
            if let Some(obj) = state.shaders.get(shader) {
                all_compiled &= obj.compiled;
                stages.push(obj.stage);
                uniforms.extend(declared_uniforms(&obj.source));
            }
        }
        let complete =
            stages.contains(&ShaderStage::Vertex) && stages.contains(&ShaderStage::Fragment);

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = all_compiled && complete;
            p.log = if p.linked {
                String::new()
            } else {
                "error: program has unresolved or uncompiled stages".into()
            };
            p.uniforms = if p.linked { uniforms } else { Vec::new() };
        }
        state.calls.push(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.current_program = program;
        state.calls.push(GlCall::UseProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<UniformLocation> {
        let mut state = self.state.borrow_mut();
        let declared = state
            .programs
            .get(&program)
            .is_some_and(|p| p.uniforms.iter().any(|u| u == name));
        if !declared {
            return None;
        }
        let existing = state
            .locations
            .iter()
            .position(|(p, n)| *p == program && n == name);
        let index = match existing {
            Some(i) => i,
            None => {
                state.locations.push((program, name.to_string()));
                state.locations.len() - 1
            }
        };
        Some(UniformLocation(index as u32))
    }

    fn uniform_1_i32(&self, location: UniformLocation, value: i32) {
        self.state
            .borrow_mut()
            .record_uniform(location, UniformValue::Int(value));
    }

    fn uniform_1_f32(&self, location: UniformLocation, value: f32) {
        self.state
            .borrow_mut()
            .record_uniform(location, UniformValue::Float(value));
    }

    fn uniform_2_f32(&self, location: UniformLocation, x: f32, y: f32) {
        self.state
            .borrow_mut()
            .record_uniform(location, UniformValue::Vec2([x, y]));
    }

    fn uniform_3_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32) {
        self.state
            .borrow_mut()
            .record_uniform(location, UniformValue::Vec3([x, y, z]));
    }

    fn uniform_matrix_4_f32(&self, location: UniformLocation, value: &[f32; 16]) {
        self.state
            .borrow_mut()
            .record_uniform(location, UniformValue::Mat4(*value));
    }

    fn active_texture_unit(&self, unit: u32) {
        self.push(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: u32) {
        self.push(GlCall::BindTexture(target, texture));
    }

    fn set_sampling(&self, target: TextureTarget, sampling: Sampling) {
        self.push(GlCall::SetSampling(target, sampling));
    }

    fn tex_image_2d(&self, target: ImageTarget, desc: ImageDesc, _pixels: &[u8]) {
        self.push(GlCall::TexImage2d(target, desc));
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        self.push(GlCall::GenerateMipmap(target));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.push(GlCall::Viewport(x, y, width, height));
    }

    fn clear(&self, _r: f32, _g: f32, _b: f32, _a: f32) {
        self.push(GlCall::Clear);
    }

    fn set_depth_test(&self, enabled: bool) {
        self.push(GlCall::DepthTest(enabled));
    }

    fn set_depth_func(&self, func: DepthFunc) {
        self.push(GlCall::DepthFunc(func));
    }

    fn set_depth_write(&self, enabled: bool) {
        self.push(GlCall::DepthWrite(enabled));
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        self.push(GlCall::DrawArrays { first, count });
    }

    fn draw_elements(&self, count: i32) {
        self.push(GlCall::DrawElements { count });
    }

    fn read_pixels_rgb(&self, width: u32, height: u32, out: &mut [u8]) {
        out.fill(0);
        self.push(GlCall::ReadPixels { width, height });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "#version 330 core\nuniform mat4 model;\nuniform mat4 view;\nvoid main() {}\n";
    const FS: &str = "#version 330 core\nuniform sampler2D uTexture;\nuniform float weights[4];\nvoid main() {}\n";

    fn linked_program(gl: &HeadlessGl) -> u32 {
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, VS);
        gl.compile_shader(vs);
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(fs, FS);
        gl.compile_shader(fs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        program
    }

    #[test]
    fn names_are_nonzero_and_tracked() {
        let gl = HeadlessGl::new();
        let a = gl.create_buffer().unwrap();
        let b = gl.create_buffer().unwrap();
        assert_ne!(a, 0);
        assert_ne!(a, b);
        assert_eq!(gl.live_objects(), 2);
        gl.delete_buffer(a);
        assert!(!gl.is_live(a));
        assert!(gl.is_live(b));
    }

    #[test]
    fn creation_can_be_forced_to_fail() {
        let gl = HeadlessGl::new();
        gl.fail_creation(true);
        assert!(gl.create_vertex_array().is_err());
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn declared_uniforms_resolve_after_link() {
        let gl = HeadlessGl::new();
        let program = linked_program(&gl);
        assert!(gl.program_link_status(program));
        assert!(gl.uniform_location(program, "model").is_some());
        assert!(gl.uniform_location(program, "uTexture").is_some());
        assert!(gl.uniform_location(program, "weights").is_some());
        assert!(gl.uniform_location(program, "missing").is_none());
    }

    #[test]
    fn same_name_gets_same_location() {
        let gl = HeadlessGl::new();
        let program = linked_program(&gl);
        let a = gl.uniform_location(program, "view");
        let b = gl.uniform_location(program, "view");
        assert_eq!(a, b);
    }

    #[test]
    fn error_directive_fails_compilation() {
        let gl = HeadlessGl::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, "#error broken\n");
        gl.compile_shader(vs);
        assert!(!gl.shader_compile_status(vs));
        assert!(!gl.shader_info_log(vs).is_empty());
    }

    #[test]
    fn uniform_uploads_are_recorded_by_name() {
        let gl = HeadlessGl::new();
        let program = linked_program(&gl);
        let loc = gl.uniform_location(program, "uTexture").unwrap();
        gl.uniform_1_i32(loc, 3);
        assert_eq!(gl.last_uniform("uTexture"), Some(UniformValue::Int(3)));
    }
}
