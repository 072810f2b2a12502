use crate::camera::Camera;
use crate::gl::GraphicsApi;

/// Per-frame inputs a scene draws from.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub camera: &'a Camera,
    /// Framebuffer size in pixels.
    pub width: u32,
    pub height: u32,
    /// Seconds since the scene started.
    pub time: f32,
}

impl FrameInfo<'_> {
    /// Width over height; 1.0 for a degenerate (minimized) framebuffer.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// A demo the desktop driver can run.
///
/// Scenes own their GPU resources and release them in
/// [`Scene::destroy`]. They read the camera but never own it.
pub trait Scene<G: GraphicsApi> {
    /// Per-frame simulation step, run after held movement has moved the
    /// camera and before [`Scene::draw`].
    fn update(&mut self, _camera: &mut Camera, _dt: f32) {}

    fn draw(&mut self, gl: &G, frame: &FrameInfo<'_>);

    fn destroy(&mut self, gl: &G);
}
