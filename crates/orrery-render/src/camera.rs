//! Look-at camera and the shared camera uniform bound at group 0 by every
//! scene pipeline.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// GPU-side camera data, shared by all scene pipelines.
///
/// `camera_pos.w` carries elapsed seconds for animated shaders.
/// `viewport` is `(width_px, height_px, pixel_ratio, 0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub viewport: [f32; 4],
}

impl CameraUniform {
    /// Size of the uniform in bytes, for buffer creation.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}

/// A perspective camera looking from `eye` at `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    /// Near clip plane distance (positive).
    pub near: f32,
    /// Far clip plane distance (positive, > near).
    pub far: f32,
}

impl Camera {
    /// Right-handed look-at view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Reverse-Z perspective: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from eye toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    /// Update the aspect ratio. Zero heights are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Build the GPU uniform for this frame.
    pub fn to_uniform(&self, viewport: (u32, u32), pixel_ratio: f32, time: f32) -> CameraUniform {
        let view = self.view_matrix();
        let proj = self.projection_matrix();
        let view_proj = proj * view;
        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_pos: Vec4::new(self.eye.x, self.eye.y, self.eye.z, time).to_array(),
            viewport: [viewport.0 as f32, viewport.1 as f32, pixel_ratio, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 15.0, 40.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_16_byte_aligned() {
        assert_eq!(CameraUniform::SIZE % 16, 0);
        assert_eq!(CameraUniform::SIZE, 288);
    }

    #[test]
    fn test_view_matrix_places_eye_at_origin() {
        let camera = Camera::default();
        let eye_in_view = camera.view_matrix().transform_point3(camera.eye);
        assert!(eye_in_view.length() < 1e-4);
    }

    #[test]
    fn test_target_is_in_front() {
        let camera = Camera::default();
        let target_in_view = camera.view_matrix().transform_point3(camera.target);
        assert!(target_in_view.z < 0.0);
        assert!(target_in_view.x.abs() < 1e-4);
    }

    #[test]
    fn test_reverse_z_near_maps_to_one() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        let near = proj * Vec4::new(0.0, 0.0, -camera.near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -camera.far, 1.0);
        assert!((near.z / near.w - 1.0).abs() < 1e-4);
        assert!((far.z / far.w).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_ratio_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 0.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect_ratio(800.0, 800.0);
        assert_eq!(camera.aspect_ratio, 1.0);
    }

    #[test]
    fn test_uniform_carries_time_and_viewport() {
        let camera = Camera::default();
        let u = camera.to_uniform((1280, 720), 2.0, 3.5);
        assert_eq!(u.camera_pos[3], 3.5);
        assert_eq!(u.viewport, [1280.0, 720.0, 2.0, 0.0]);
    }

    #[test]
    fn test_inverse_view_proj_roundtrips() {
        let camera = Camera::default();
        let u = camera.to_uniform((100, 100), 1.0, 0.0);
        let vp = Mat4::from_cols_array_2d(&u.view_proj);
        let inv = Mat4::from_cols_array_2d(&u.inv_view_proj);
        let p = Vec3::new(3.0, -2.0, 5.0);
        let back = inv.project_point3(vp.project_point3(p));
        assert!((back - p).length() < 1e-2);
    }
}
