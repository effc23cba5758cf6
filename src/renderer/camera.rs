//! Scene camera
//!
//! World space is y-down (positive y is toward the road surface) with the
//! camera on +z looking at the origin, the classic sketchbook default: 60°
//! vertical field of view and an eye distance that maps one world unit to
//! one pixel on the z = 0 plane.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// Backbuffer size in device pixels back to the CSS size the camera frames
pub fn css_viewport(device_size: (u32, u32), device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let scale = |px: u32| ((px as f64 / dpr).round() as u32).max(1);
    (scale(device_size.0), scale(device_size.1))
}

impl Camera {
    /// Default camera for a viewport of the given CSS pixel size
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let fov_y = std::f32::consts::FRAC_PI_3;
        let eye_z = (h / 2.0) / (fov_y / 2.0).tan();
        Self {
            eye: Vec3::new(0.0, 0.0, eye_z),
            target: Vec3::ZERO,
            fov_y,
            aspect: w / h,
            near: eye_z / 10.0,
            far: eye_z * 10.0,
        }
    }

    /// World-to-clip transform (depth in [0, 1])
    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        // Flip y so that +y points down the screen
        proj * view * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
    }

    /// Project a world point to normalized device coordinates
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_proj().project_point3(point)
    }
}
