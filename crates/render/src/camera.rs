use crate::gl::GraphicsApi;
use crate::shader::ShaderProgram;
use glam::{Mat4, Vec3};
use horizon_input::{MoveDirection, Movement};
use serde::{Deserialize, Serialize};

pub const PITCH_LIMIT: f32 = 89.0;

/// Euler-angle fly camera.
///
/// Yaw and pitch are stored in degrees. `front`, `right` and `up` are
/// derived from them and `world_up` by [`Camera::update_vectors`] and are
/// never written any other way, so they always form an orthonormal
/// right-handed basis.
///
/// Movement, look and zoom input only has an effect while the camera is
/// locked, i.e. while the driver has captured the pointer.
///
/// Serialized as a [`CameraState`]; the basis is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CameraState", from = "CameraState")]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    roll: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    zoom_limits: (f32, f32),
    pub near: f32,
    pub far: f32,
    locked: bool,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            roll: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            fov: 45.0,
            zoom_limits: (1.0, 45.0),
            near: 0.1,
            far: 100.0,
            locked: false,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// Range scroll zoom clamps `fov` into, `min <= max`.
    pub fn zoom_limits(&self) -> (f32, f32) {
        self.zoom_limits
    }

    /// Set the zoom range; the bounds may be given in either order.
    pub fn set_zoom_limits(&mut self, a: f32, b: f32) {
        self.zoom_limits = (a.min(b), a.max(b));
    }

    /// Set yaw and pitch in degrees (pitch clamped) and rebuild the basis.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Rebuild `front`, `right`, `up` from yaw, pitch and `world_up`.
    pub fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// OpenGL clip-space perspective (depth in `[-1, 1]`).
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect_ratio, self.near, self.far)
    }

    /// Upload `view` and `projection` uniforms.
    pub fn push_to_shader<G: GraphicsApi>(
        &self,
        gl: &G,
        shader: &ShaderProgram,
        aspect_ratio: f32,
    ) {
        shader.set_mat4(gl, "view", &self.view_matrix());
        shader.set_mat4(gl, "projection", &self.projection_matrix(aspect_ratio));
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Move along the held directions for `dt` seconds.
    ///
    /// Forward/back and strafing stay in the horizontal plane: the height
    /// only changes through `Up`/`Down`, which move at half speed.
    pub fn process_movement(&mut self, movement: &Movement, dt: f32) {
        if !self.locked {
            return;
        }

        let speed = self.movement_speed * dt;
        let strafe = self.front.cross(self.up).normalize();
        for dir in movement.iter() {
            let y = self.position.y;
            match dir {
                MoveDirection::Forward => self.position += self.front * speed,
                MoveDirection::Backward => self.position -= self.front * speed,
                MoveDirection::Left => self.position -= strafe * speed,
                MoveDirection::Right => self.position += strafe * speed,
                MoveDirection::Up => {
                    self.position.y += speed * 0.5;
                    continue;
                }
                MoveDirection::Down => {
                    self.position.y -= speed * 0.5;
                    continue;
                }
            }
            self.position.y = y;
        }
    }

    /// Apply a mouse offset in window pixels.
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32) {
        if !self.locked {
            return;
        }

        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Apply a scroll offset; positive zooms in.
    pub fn process_zoom(&mut self, y_offset: f32) {
        if !self.locked {
            return;
        }

        let (min, max) = self.zoom_limits;
        // max/min instead of clamp: a NaN bound must not panic
        self.fov = (self.fov - y_offset).max(min).min(max);
    }
}

/// The persisted part of a [`Camera`]: everything except the derived
/// basis vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub fov: f32,
    pub zoom_limits: (f32, f32),
    pub near: f32,
    pub far: f32,
    pub locked: bool,
}

impl From<Camera> for CameraState {
    fn from(camera: Camera) -> Self {
        Self {
            position: camera.position,
            yaw: camera.yaw,
            pitch: camera.pitch,
            movement_speed: camera.movement_speed,
            mouse_sensitivity: camera.mouse_sensitivity,
            fov: camera.fov,
            zoom_limits: camera.zoom_limits,
            near: camera.near,
            far: camera.far,
            locked: camera.locked,
        }
    }
}

impl From<CameraState> for Camera {
    fn from(state: CameraState) -> Self {
        let mut camera = Camera::new(state.position);
        camera.movement_speed = state.movement_speed;
        camera.mouse_sensitivity = state.mouse_sensitivity;
        camera.fov = state.fov;
        camera.set_zoom_limits(state.zoom_limits.0, state.zoom_limits.1);
        camera.near = state.near;
        camera.far = state.far;
        camera.locked = state.locked;
        camera.set_orientation(state.yaw, state.pitch);
        camera
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

/// Circles the camera around the world origin in the XZ plane, always
/// facing the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Radians; 0 puts the camera on +Z.
    pub angle: f32,
    pub distance: f32,
    /// Radians per second.
    pub angular_speed: f32,
}

impl Orbit {
    pub fn new(distance: f32, angular_speed: f32) -> Self {
        Self {
            angle: 0.0,
            distance,
            angular_speed,
        }
    }

    /// Place `camera` for the current angle without advancing.
    pub fn place(&self, camera: &mut Camera) {
        camera.position.x = self.distance * self.angle.sin();
        camera.position.z = self.distance * self.angle.cos();
        camera.set_orientation(-self.angle.to_degrees() - 90.0, 0.0);
    }

    pub fn advance(&mut self, camera: &mut Camera, dt: f32) {
        self.angle += self.angular_speed * dt;
        self.place(camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn locked_camera() -> Camera {
        let mut cam = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        cam.lock();
        cam
    }

    fn held(dirs: &[MoveDirection]) -> Movement {
        dirs.iter().copied().collect()
    }

    fn assert_orthonormal(cam: &Camera) {
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        assert!((f.length() - 1.0).abs() < EPS);
        assert!((r.length() - 1.0).abs() < EPS);
        assert!((u.length() - 1.0).abs() < EPS);
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn defaults() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(cam.fov, 45.0);
        assert_eq!(cam.movement_speed, 2.5);
        assert_eq!(cam.mouse_sensitivity, 0.1);
        assert!(!cam.is_locked());
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
        assert!((cam.up() - Vec3::Y).length() < EPS);
        assert!((cam.right() - Vec3::X).length() < EPS);
    }

    #[test]
    fn basis_is_orthonormal_across_orientations() {
        let mut cam = Camera::default();
        let mut yaw = -720.0;
        while yaw <= 720.0 {
            let mut pitch = -89.0;
            while pitch <= 89.0 {
                cam.set_orientation(yaw, pitch);
                assert_orthonormal(&cam);
                pitch += 7.5;
            }
            yaw += 13.0;
        }
    }

    #[test]
    fn basis_survives_repeated_updates() {
        let mut cam = locked_camera();
        for i in 0..5000 {
            cam.process_look((i % 7) as f32 - 3.0, (i % 5) as f32 - 2.0);
        }
        assert_orthonormal(&cam);
    }

    #[test]
    fn forward_scenario() {
        let mut cam = locked_camera();
        cam.process_movement(&held(&[MoveDirection::Forward]), 1.0);
        assert!((cam.position - Vec3::new(0.0, 0.0, 0.5)).length() < EPS);
    }

    #[test]
    fn forward_keeps_height_when_pitched() {
        let mut cam = locked_camera();
        cam.set_orientation(-90.0, 45.0);
        cam.process_movement(&held(&[MoveDirection::Forward]), 1.0);
        assert_eq!(cam.position.y, 0.0);
        assert!(cam.position.z < 3.0);

        cam.process_movement(&held(&[MoveDirection::Backward]), 1.0);
        assert_eq!(cam.position.y, 0.0);
    }

    #[test]
    fn strafe_moves_along_right() {
        let mut cam = locked_camera();
        cam.process_movement(&held(&[MoveDirection::Right]), 1.0);
        assert!((cam.position - Vec3::new(2.5, 0.0, 3.0)).length() < EPS);
        cam.process_movement(&held(&[MoveDirection::Left]), 2.0);
        assert!((cam.position - Vec3::new(-2.5, 0.0, 3.0)).length() < EPS);
    }

    #[test]
    fn vertical_moves_at_half_speed() {
        let mut cam = locked_camera();
        cam.process_movement(&held(&[MoveDirection::Up]), 1.0);
        assert!((cam.position.y - 1.25).abs() < EPS);
        cam.process_movement(&held(&[MoveDirection::Down, MoveDirection::Down]), 2.0);
        assert!((cam.position.y + 1.25).abs() < EPS);
    }

    #[test]
    fn look_clamps_pitch() {
        let mut cam = locked_camera();
        cam.process_look(0.0, 1.0e6);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        cam.process_look(0.0, -1.0e6);
        assert_eq!(cam.pitch(), -PITCH_LIMIT);
        for _ in 0..100 {
            cam.process_look(3.0, 50.0);
            assert!(cam.pitch() <= PITCH_LIMIT);
        }
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut cam = locked_camera();
        cam.process_look(100.0, 50.0);
        assert!((cam.yaw() - (-80.0)).abs() < EPS);
        assert!((cam.pitch() - 5.0).abs() < EPS);
    }

    #[test]
    fn zoom_clamps_fov() {
        let mut cam = locked_camera();
        cam.process_zoom(1000.0);
        assert_eq!(cam.fov, 1.0);
        cam.process_zoom(-1000.0);
        assert_eq!(cam.fov, 45.0);
        cam.process_zoom(5.0);
        assert_eq!(cam.fov, 40.0);
    }

    #[test]
    fn zoom_respects_scene_limits() {
        let mut cam = locked_camera();
        cam.set_zoom_limits(1.0, 120.0);
        cam.fov = 90.0;
        cam.process_zoom(-50.0);
        assert_eq!(cam.fov, 120.0);
    }

    #[test]
    fn inverted_zoom_limits_are_ordered() {
        let mut cam = locked_camera();
        cam.set_zoom_limits(45.0, 1.0);
        assert_eq!(cam.zoom_limits(), (1.0, 45.0));
        cam.process_zoom(1.0);
        assert_eq!(cam.fov, 44.0);
        cam.process_zoom(100.0);
        assert_eq!(cam.fov, 1.0);
    }

    #[test]
    fn nan_zoom_limit_does_not_panic() {
        let mut cam = locked_camera();
        cam.set_zoom_limits(f32::NAN, 30.0);
        cam.process_zoom(-100.0);
        assert_eq!(cam.fov, 30.0);
    }

    #[test]
    fn json_round_trip() {
        let mut cam = locked_camera();
        cam.set_orientation(10.0, -20.0);
        cam.set_zoom_limits(1.0, 120.0);
        let json = serde_json::to_string(&cam).unwrap();
        let back: Camera = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position, cam.position);
        assert_eq!(back.zoom_limits(), (1.0, 120.0));
        assert!(back.is_locked());
        assert!((back.front() - cam.front()).length() < EPS);
    }

    #[test]
    fn loading_rebuilds_basis_and_clamps_pitch() {
        let json = r#"{
            "position": [0.0, 1.0, 2.0],
            "yaw": -90.0,
            "pitch": 500.0,
            "front": [3.0, 0.0, 0.0],
            "movement_speed": 2.5,
            "mouse_sensitivity": 0.1,
            "fov": 45.0,
            "zoom_limits": [60.0, 1.0],
            "near": 0.1,
            "far": 100.0,
            "locked": false
        }"#;
        let cam: Camera = serde_json::from_str(json).unwrap();
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert_eq!(cam.zoom_limits(), (1.0, 60.0));
        assert_orthonormal(&cam);
    }

    #[test]
    fn unlocked_camera_ignores_input() {
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let before = cam.clone();
        let all: Movement = MoveDirection::ALL.into_iter().collect();
        cam.process_movement(&all, 10.0);
        cam.process_look(500.0, -300.0);
        cam.process_zoom(20.0);
        assert_eq!(cam, before);
    }

    #[test]
    fn lock_toggles() {
        let mut cam = Camera::default();
        cam.lock();
        assert!(cam.is_locked());
        cam.unlock();
        assert!(!cam.is_locked());
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        let view = cam.view_matrix();
        let p = view.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, -3.0)).length() < EPS);
    }

    #[test]
    fn projection_is_finite() {
        let cam = Camera::default();
        let proj = cam.projection_matrix(800.0 / 600.0);
        assert!(proj.is_finite());
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -cam.near));
        assert!((near.z + 1.0).abs() < 1e-3);
    }

    #[test]
    fn orbit_faces_origin() {
        let mut cam = Camera::default();
        let mut orbit = Orbit::new(8.0, -0.1);
        for _ in 0..120 {
            orbit.advance(&mut cam, 1.0 / 60.0);
            assert!((cam.position.length() - 8.0).abs() < 1e-3);
            let to_center = (-cam.position).normalize();
            assert!((cam.front() - to_center).length() < 1e-3);
        }
        assert!((orbit.angle + 0.2).abs() < 1e-4);
    }

    #[test]
    fn orbit_start_matches_default_view() {
        let mut cam = Camera::default();
        Orbit::new(8.0, 0.0).place(&mut cam);
        assert!((cam.position - Vec3::new(0.0, 0.0, 8.0)).length() < EPS);
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
    }
}
