use crate::gl::GraphicsApi;
use crate::shader::ShaderProgram;
use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Placement of one drawable instance: position, orientation, scale.
///
/// The orientation is renormalized after every rotation so repeated
/// composition never drifts away from a unit quaternion. Loading does
/// the same; an orientation that cannot be normalized becomes identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModelState")]
pub struct Model {
    pub position: Vec3,
    orientation: Quat,
    pub scale: Vec3,
}

#[derive(Deserialize)]
struct ModelState {
    position: Vec3,
    orientation: Quat,
    scale: Vec3,
}

impl From<ModelState> for Model {
    fn from(state: ModelState) -> Self {
        let orientation = if state.orientation.is_normalized() {
            state.orientation
        } else {
            Vec4::from(state.orientation)
                .try_normalize()
                .map_or(Quat::IDENTITY, Quat::from_vec4)
        };
        Self {
            position: state.position,
            orientation,
            scale: state.scale,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Model {
    /// Identity orientation and unit scale at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Replace the orientation with `radians` about `axis`.
    /// A zero axis leaves the orientation unchanged.
    pub fn set_rotation(&mut self, radians: f32, axis: Vec3) {
        if let Some(axis) = axis.try_normalize() {
            self.orientation = Quat::from_axis_angle(axis, radians).normalize();
        }
    }

    pub fn set_rotation_deg(&mut self, degrees: f32, axis: Vec3) {
        self.set_rotation(degrees.to_radians(), axis);
    }

    /// Compose `radians` about `axis` onto the current orientation.
    pub fn add_rotation(&mut self, radians: f32, axis: Vec3) {
        if let Some(axis) = axis.try_normalize() {
            let delta = Quat::from_axis_angle(axis, radians);
            self.orientation = (self.orientation * delta).normalize();
        }
    }

    pub fn add_rotation_deg(&mut self, degrees: f32, axis: Vec3) {
        self.add_rotation(degrees.to_radians(), axis);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// `T(position) * R(orientation) * S(scale)`.
    pub fn compose(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_quat(self.orientation)
            * Mat4::from_scale(self.scale)
    }

    /// Upload [`Model::compose`] as the `model` uniform.
    pub fn push_to_shader<G: GraphicsApi>(&self, gl: &G, shader: &ShaderProgram) {
        shader.set_mat4(gl, "model", &self.compose());
    }
}
