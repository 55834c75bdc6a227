//! # Camera State Management
//!
//! Keeps the driver's camera attached to the streaming viewpoint and holds the
//! packed uniform the GPU renderer consumes.

use cgmath::Point3;

pub mod camera;

/// Height above the viewpoint the camera hovers at.
pub const CAMERA_EYE_HEIGHT: f32 = 12.0;

/// The camera together with its GPU uniform.
#[derive(Debug, Default)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// GPU-optimized camera data for shaders
    pub camera_uniform: camera::CameraUniform,
}

impl CameraState {
    pub fn new(camera: camera::Camera) -> Self {
        let mut camera_uniform = camera::CameraUniform::new();
        camera_uniform.update_view_proj_and_pos(&camera);
        CameraState {
            camera,
            camera_uniform,
        }
    }

    /// Moves the camera to hover over `viewpoint` and refreshes the uniform.
    pub fn follow(&mut self, viewpoint: Point3<f32>) {
        self.camera.position = Point3::new(
            viewpoint.x,
            viewpoint.y + CAMERA_EYE_HEIGHT,
            viewpoint.z,
        );
        self.camera_uniform.update_view_proj_and_pos(&self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_hovers_above_viewpoint() {
        let mut state = CameraState::default();
        state.follow(Point3::new(10.0, 100.0, 5.0));
        assert_eq!(state.camera.position, Point3::new(10.0, 112.0, 5.0));
    }
}
