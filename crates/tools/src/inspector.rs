use glam::Vec3;
use horizon_render::Camera;

/// Read-only camera queries for logs and the window title.
pub struct CameraInspector;

impl CameraInspector {
    pub fn summary(camera: &Camera) -> CameraSummary {
        CameraSummary {
            position: camera.position,
            front: camera.front(),
            yaw: camera.yaw(),
            pitch: camera.pitch(),
            fov: camera.fov,
            locked: camera.is_locked(),
        }
    }

    /// `"<base> | 60 fps | pos=(..) ..."`.
    pub fn title(base: &str, camera: &Camera, fps: f32) -> String {
        format!("{base} | {fps:.0} fps | {}", Self::summary(camera))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraSummary {
    pub position: Vec3,
    pub front: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub locked: bool,
}

impl std::fmt::Display for CameraSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} fov={:.1}{}",
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
            self.pitch,
            self.fov,
            if self.locked { " [locked]" } else { "" }
        )
    }
}
