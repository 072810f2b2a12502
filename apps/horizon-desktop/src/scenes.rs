//! The three demos.

use glam::{Vec2, Vec3};
use horizon_assets::{load_cubemap_cross, load_equirect, load_texture};
use horizon_render::gl::{DepthFunc, TextureTarget};
use horizon_render::{
    Camera, FrameInfo, GraphicsApi, INVALID, Mesh, Model, Orbit, Scene, ShaderProgram, shapes,
};
use std::path::{Path, PathBuf};

const CLEAR: [f32; 3] = [26.0 / 255.0, 26.0 / 255.0, 30.0 / 255.0];

const CUBE_POSITIONS: [Vec3; 9] = [
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Where shader sources and image assets are read from.
#[derive(Debug, Clone)]
pub struct ScenePaths {
    pub shader_dir: PathBuf,
    pub asset_dir: PathBuf,
}

impl ScenePaths {
    pub fn shader(&self, name: impl AsRef<Path>) -> PathBuf {
        self.shader_dir.join(name)
    }

    pub fn asset(&self, name: impl AsRef<Path>) -> PathBuf {
        self.asset_dir.join(name)
    }
}

fn clear_frame<G: GraphicsApi>(gl: &G) {
    gl.clear(CLEAR[0], CLEAR[1], CLEAR[2], 1.0);
}

fn delete_texture<G: GraphicsApi>(gl: &G, texture: &mut u32) {
    if *texture != INVALID {
        gl.delete_texture(*texture);
        *texture = INVALID;
    }
}

/// Textured shader shared by the cube and quad demos.
fn textured_program<G: GraphicsApi>(gl: &G, paths: &ScenePaths) -> ShaderProgram {
    let shader = ShaderProgram::create(
        gl,
        paths.shader("vertex_shader.vert"),
        paths.shader("fragment_shader.frag"),
    );
    shader.use_program(gl);
    shader.set_int(gl, "uTexture", 0);
    shader
}

/// Ten textured cubes spinning at different rates.
pub struct CubesScene {
    shader: ShaderProgram,
    mesh: Mesh,
    texture: u32,
    center: Model,
    cubes: [Model; 9],
}

impl CubesScene {
    pub fn new<G: GraphicsApi>(gl: &G, paths: &ScenePaths) -> Self {
        Self {
            shader: textured_program(gl, paths),
            mesh: shapes::cube(gl),
            texture: load_texture(gl, paths.asset("container.jpg")),
            center: Model::default(),
            cubes: CUBE_POSITIONS.map(Model::at),
        }
    }
}

impl<G: GraphicsApi> Scene<G> for CubesScene {
    fn draw(&mut self, gl: &G, frame: &FrameInfo<'_>) {
        gl.set_depth_test(true);
        clear_frame(gl);

        gl.active_texture_unit(0);
        gl.bind_texture(TextureTarget::Texture2d, self.texture);
        self.shader.use_program(gl);
        frame
            .camera
            .push_to_shader(gl, &self.shader, frame.aspect_ratio());

        self.center
            .set_rotation_deg(frame.time * 50.0, Vec3::new(0.5, 1.0, 0.2));
        self.center.push_to_shader(gl, &self.shader);
        self.mesh.draw(gl);

        for (i, cube) in self.cubes.iter_mut().enumerate() {
            cube.set_rotation_deg(20.0 * i as f32 * frame.time, Vec3::new(1.0, 0.3, 0.5));
            cube.push_to_shader(gl, &self.shader);
            self.mesh.draw(gl);
        }
    }

    fn destroy(&mut self, gl: &G) {
        self.mesh.destroy(gl);
        self.shader.destroy(gl);
        delete_texture(gl, &mut self.texture);
    }
}

/// One textured square at the origin.
pub struct QuadScene {
    shader: ShaderProgram,
    mesh: Mesh,
    texture: u32,
    model: Model,
}

impl QuadScene {
    pub fn new<G: GraphicsApi>(gl: &G, paths: &ScenePaths) -> Self {
        Self {
            shader: textured_program(gl, paths),
            mesh: shapes::square(gl),
            texture: load_texture(gl, paths.asset("container.jpg")),
            model: Model::default(),
        }
    }
}

impl<G: GraphicsApi> Scene<G> for QuadScene {
    fn draw(&mut self, gl: &G, frame: &FrameInfo<'_>) {
        gl.set_depth_test(true);
        clear_frame(gl);

        gl.active_texture_unit(0);
        gl.bind_texture(TextureTarget::Texture2d, self.texture);
        self.shader.use_program(gl);
        frame
            .camera
            .push_to_shader(gl, &self.shader, frame.aspect_ratio());
        self.model.push_to_shader(gl, &self.shader);
        self.mesh.draw(gl);
    }

    fn destroy(&mut self, gl: &G) {
        self.mesh.destroy(gl);
        self.shader.destroy(gl);
        delete_texture(gl, &mut self.texture);
    }
}

/// Background the black hole lenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sky {
    /// Equirectangular 2D texture on unit 0.
    Equirect(u32),
    /// Cube map on unit 1.
    Cubemap(u32),
}

const EQUIRECT_UNIT: u32 = 0;
const CUBEMAP_UNIT: u32 = 1;

/// Full-screen raymarch of a Schwarzschild black hole against a sky map,
/// seen from a camera orbiting the hole.
pub struct BlackHoleScene {
    shader: ShaderProgram,
    mesh: Mesh,
    sky: Sky,
    orbit: Orbit,
}

impl BlackHoleScene {
    pub const ORBIT_DISTANCE: f32 = 8.0;
    pub const ORBIT_SPEED: f32 = -0.1;

    /// Load the sky and put `camera` on its orbit.
    pub fn new<G: GraphicsApi>(
        gl: &G,
        paths: &ScenePaths,
        cross_map: bool,
        camera: &mut Camera,
    ) -> Self {
        let shader = ShaderProgram::create(
            gl,
            paths.shader("simple.vert"),
            paths.shader("blackhole/black_hole.frag"),
        );
        let sky = if cross_map {
            Sky::Cubemap(load_cubemap_cross(gl, paths.asset("skybox_cross.png")))
        } else {
            Sky::Equirect(load_equirect(gl, paths.asset("starmap_2020_8k_gal.hdr")))
        };

        camera.fov = 90.0;
        camera.set_zoom_limits(1.0, 120.0);
        let orbit = Orbit::new(Self::ORBIT_DISTANCE, Self::ORBIT_SPEED);
        orbit.place(camera);

        Self {
            shader,
            mesh: shapes::skybox(gl),
            sky,
            orbit,
        }
    }

    pub fn sky(&self) -> Sky {
        self.sky
    }
}

impl<G: GraphicsApi> Scene<G> for BlackHoleScene {
    fn update(&mut self, camera: &mut Camera, dt: f32) {
        self.orbit.advance(camera, dt);
    }

    fn draw(&mut self, gl: &G, frame: &FrameInfo<'_>) {
        gl.set_depth_test(true);
        clear_frame(gl);
        gl.set_depth_func(DepthFunc::LessEqual);
        gl.set_depth_write(false);

        let camera = frame.camera;
        let shader = &self.shader;
        shader.use_program(gl);
        shader.set_vec2(
            gl,
            "resolution",
            Vec2::new(frame.width as f32, frame.height as f32),
        );
        shader.set_vec3(gl, "cam_pos", camera.position);
        shader.set_vec3(gl, "cam_x", camera.right());
        shader.set_vec3(gl, "cam_y", camera.up());
        shader.set_vec3(gl, "cam_z", camera.front());
        shader.set_float(gl, "fov", camera.fov);

        // both samplers always point at distinct units
        shader.set_int(gl, "equirectangularMap", EQUIRECT_UNIT as i32);
        shader.set_int(gl, "skybox", CUBEMAP_UNIT as i32);
        match self.sky {
            Sky::Equirect(texture) => {
                gl.active_texture_unit(EQUIRECT_UNIT);
                gl.bind_texture(TextureTarget::Texture2d, texture);
                shader.set_int(gl, "useCubemap", 0);
            }
            Sky::Cubemap(texture) => {
                gl.active_texture_unit(CUBEMAP_UNIT);
                gl.bind_texture(TextureTarget::CubeMap, texture);
                shader.set_int(gl, "useCubemap", 1);
            }
        }

        self.mesh.draw(gl);

        gl.set_depth_write(true);
        gl.set_depth_func(DepthFunc::Less);
    }

    fn destroy(&mut self, gl: &G) {
        self.mesh.destroy(gl);
        self.shader.destroy(gl);
        let (Sky::Equirect(texture) | Sky::Cubemap(texture)) = &mut self.sky;
        delete_texture(gl, texture);
    }
}
