use crate::error::GfxError;
use crate::gl::{GraphicsApi, INVALID, ShaderStage};
use glam::{Mat4, Vec2, Vec3};
use std::path::Path;

/// A linked GPU program plus name-based uniform setters.
///
/// Construction is best-effort: read, compile and link failures are
/// logged and the (possibly unusable) program is returned anyway. Check
/// [`ShaderProgram::linked`] if the caller cares.
///
/// Uniform locations are looked up on every set. Setting a name the
/// program does not declare does nothing.
#[derive(Debug, PartialEq, Eq)]
pub struct ShaderProgram {
    id: u32,
    linked: bool,
}

impl ShaderProgram {
    /// Read, compile and link the two stage files.
    pub fn create<G: GraphicsApi>(
        gl: &G,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Self {
        let vertex = read_source(vertex_path.as_ref());
        let fragment = read_source(fragment_path.as_ref());
        tracing::debug!(
            vertex = %vertex_path.as_ref().display(),
            fragment = %fragment_path.as_ref().display(),
            "building shader program"
        );
        Self::from_sources(gl, &vertex, &fragment)
    }

    /// Compile and link in-memory sources.
    pub fn from_sources<G: GraphicsApi>(gl: &G, vertex: &str, fragment: &str) -> Self {
        let vs = compile_stage(gl, ShaderStage::Vertex, vertex);
        let fs = compile_stage(gl, ShaderStage::Fragment, fragment);

        let id = match gl.create_program() {
            Ok(id) => id,
            Err(reason) => {
                tracing::error!(
                    "{}",
                    GfxError::Create {
                        what: "program",
                        reason
                    }
                );
                for shader in [vs, fs].into_iter().flatten() {
                    gl.delete_shader(shader);
                }
                return Self {
                    id: INVALID,
                    linked: false,
                };
            }
        };

        let stages: Vec<u32> = [vs, fs].into_iter().flatten().collect();
        for &shader in &stages {
            gl.attach_shader(id, shader);
        }
        gl.link_program(id);
        let linked = gl.program_link_status(id);
        if !linked {
            tracing::error!("{}", GfxError::Link(gl.program_info_log(id)));
        }
        for &shader in &stages {
            gl.detach_shader(id, shader);
            gl.delete_shader(shader);
        }

        Self { id, linked }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn linked(&self) -> bool {
        self.linked
    }

    pub fn use_program<G: GraphicsApi>(&self, gl: &G) {
        gl.use_program(self.id);
    }

    pub fn set_int<G: GraphicsApi>(&self, gl: &G, name: &str, value: i32) {
        if let Some(loc) = gl.uniform_location(self.id, name) {
            gl.uniform_1_i32(loc, value);
        }
    }

    pub fn set_float<G: GraphicsApi>(&self, gl: &G, name: &str, value: f32) {
        if let Some(loc) = gl.uniform_location(self.id, name) {
            gl.uniform_1_f32(loc, value);
        }
    }

    pub fn set_vec2<G: GraphicsApi>(&self, gl: &G, name: &str, value: Vec2) {
        if let Some(loc) = gl.uniform_location(self.id, name) {
            gl.uniform_2_f32(loc, value.x, value.y);
        }
    }

    pub fn set_vec3<G: GraphicsApi>(&self, gl: &G, name: &str, value: Vec3) {
        if let Some(loc) = gl.uniform_location(self.id, name) {
            gl.uniform_3_f32(loc, value.x, value.y, value.z);
        }
    }

    pub fn set_mat4<G: GraphicsApi>(&self, gl: &G, name: &str, value: &Mat4) {
        if let Some(loc) = gl.uniform_location(self.id, name) {
            gl.uniform_matrix_4_f32(loc, &value.to_cols_array());
        }
    }

    /// Delete the program. Calling it again is a no-op.
    pub fn destroy<G: GraphicsApi>(&mut self, gl: &G) {
        if self.id != INVALID {
            gl.delete_program(self.id);
            self.id = INVALID;
            self.linked = false;
        }
    }
}

fn read_source(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|source| {
        tracing::error!(
            "{}",
            GfxError::ShaderRead {
                path: path.to_path_buf(),
                source
            }
        );
        String::new()
    })
}

/// Compile one stage. A stage that fails to compile is still returned so
/// the link step reports the combined failure, matching what a driver does.
fn compile_stage<G: GraphicsApi>(gl: &G, stage: ShaderStage, source: &str) -> Option<u32> {
    let shader = match gl.create_shader(stage) {
        Ok(shader) => shader,
        Err(reason) => {
            tracing::error!(
                "{}",
                GfxError::Create {
                    what: "shader",
                    reason
                }
            );
            return None;
        }
    };
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        tracing::error!("{}", GfxError::Compile { stage, log });
    }
    Some(shader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{GlCall, HeadlessGl, UniformValue};
    use std::io::Write;

    const VS: &str = "#version 330 core\nuniform mat4 model;\nuniform vec3 tint;\nvoid main() {}\n";
    const FS: &str = "#version 330 core\nuniform sampler2D uTexture;\nuniform float fov;\nuniform vec2 resolution;\nvoid main() {}\n";

    #[test]
    fn builds_and_links() {
        let gl = HeadlessGl::new();
        let shader = ShaderProgram::from_sources(&gl, VS, FS);
        assert_ne!(shader.id(), INVALID);
        assert!(shader.linked());
    }

    #[test]
    fn stage_objects_are_released_after_link() {
        let gl = HeadlessGl::new();
        let shader = ShaderProgram::from_sources(&gl, VS, FS);
        // only the program survives
        assert_eq!(gl.live_objects(), 1);
        assert!(gl.is_live(shader.id()));
        let detaches = gl
            .calls()
            .iter()
            .filter(|c| matches!(c, GlCall::DetachShader { .. }))
            .count();
        assert_eq!(detaches, 2);
    }

    #[test]
    fn compile_failure_still_returns_program() {
        let gl = HeadlessGl::new();
        let shader = ShaderProgram::from_sources(&gl, "#error nope\n", FS);
        assert_ne!(shader.id(), INVALID);
        assert!(!shader.linked());
    }

    #[test]
    fn missing_file_compiles_empty_source() {
        let gl = HeadlessGl::new();
        let shader = ShaderProgram::create(&gl, "/nonexistent/a.vert", "/nonexistent/a.frag");
        assert_ne!(shader.id(), INVALID);
        assert!(!shader.linked());
    }

    #[test]
    fn create_reads_files() {
        let mut vs = tempfile::NamedTempFile::new().unwrap();
        vs.write_all(VS.as_bytes()).unwrap();
        let mut fs = tempfile::NamedTempFile::new().unwrap();
        fs.write_all(FS.as_bytes()).unwrap();

        let gl = HeadlessGl::new();
        let shader = ShaderProgram::create(&gl, vs.path(), fs.path());
        assert!(shader.linked());
    }

    #[test]
    fn program_creation_failure_yields_invalid() {
        let gl = HeadlessGl::new();
        gl.fail_creation(true);
        let shader = ShaderProgram::from_sources(&gl, VS, FS);
        assert_eq!(shader.id(), INVALID);
        assert!(!shader.linked());
    }

    #[test]
    fn setters_upload_declared_uniforms() {
        let gl = HeadlessGl::new();
        let shader = ShaderProgram::from_sources(&gl, VS, FS);
        shader.use_program(&gl);
        shader.set_int(&gl, "uTexture", 0);
        shader.set_float(&gl, "fov", 90.0);
        shader.set_vec2(&gl, "resolution", Vec2::new(800.0, 600.0));
        shader.set_vec3(&gl, "tint", Vec3::new(1.0, 0.5, 0.0));
        shader.set_mat4(&gl, "model", &Mat4::IDENTITY);

        assert_eq!(gl.last_uniform("uTexture"), Some(UniformValue::Int(0)));
        assert_eq!(gl.last_uniform("fov"), Some(UniformValue::Float(90.0)));
        assert_eq!(
            gl.last_uniform("resolution"),
            Some(UniformValue::Vec2([800.0, 600.0]))
        );
        assert_eq!(
            gl.last_uniform("tint"),
            Some(UniformValue::Vec3([1.0, 0.5, 0.0]))
        );
        assert_eq!(
            gl.last_uniform("model"),
            Some(UniformValue::Mat4(Mat4::IDENTITY.to_cols_array()))
        );
    }

    #[test]
    fn unknown_uniform_is_ignored() {
        let gl = HeadlessGl::new();
        let shader = ShaderProgram::from_sources(&gl, VS, FS);
        gl.take_calls();
        shader.set_int(&gl, "doesNotExist", 7);
        shader.set_mat4(&gl, "projection", &Mat4::IDENTITY);
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn destroy_is_idempotent() {
        let gl = HeadlessGl::new();
        let mut shader = ShaderProgram::from_sources(&gl, VS, FS);
        let id = shader.id();
        shader.destroy(&gl);
        assert_eq!(shader.id(), INVALID);
        assert!(!gl.is_live(id));

        gl.take_calls();
        shader.destroy(&gl);
        assert!(gl.calls().is_empty());
    }
}
