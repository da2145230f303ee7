//! Camera and view transform
//!
//! The samples use a fixed left-handed look-at camera with a perspective
//! projection mapping depth to wgpu's 0..1 range.

use glam::{Mat4, Vec3};

/// Viewport information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Get the aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// View and projection matrices for one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub view: Mat4,
    pub proj: Mat4,
}

impl ViewTransform {
    /// Combined projection * view.
    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }
}

/// A fixed camera description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera looking from `eye` at `at` with the samples' default lens
    /// (60 degrees, near 0.1, far 100).
    pub fn look_at(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            at,
            up,
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// View transform for a viewport with the given aspect ratio.
    pub fn view_transform(&self, aspect: f32) -> ViewTransform {
        ViewTransform {
            view: Mat4::look_at_lh(self.eye, self.at, self.up),
            proj: Mat4::perspective_lh(self.fov_degrees.to_radians(), aspect, self.near, self.far),
        }
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_view(view: &ViewTransform) -> Self {
        Self {
            view_proj: view.view_proj().to_cols_array_2d(),
        }
    }
}

/// Per-draw model matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub transform: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            transform: matrix.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, -35.0), Vec3::ZERO, Vec3::Y);
        let vp = camera.view_transform(16.0 / 9.0).view_proj();
        let clip = vp * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_left_handed_x_points_right() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, -35.0), Vec3::ZERO, Vec3::Y);
        let vp = camera.view_transform(1.0).view_proj();
        let clip = vp * Vec3::new(5.0, 0.0, 0.0).extend(1.0);
        assert!(clip.x / clip.w > 0.0);
    }

    #[test]
    fn test_depth_range() {
        let camera = Camera::look_at(Vec3::ZERO, Vec3::Z, Vec3::Y);
        let vp = camera.view_transform(1.0).view_proj();
        let near = vp * Vec3::new(0.0, 0.0, 0.1).extend(1.0);
        let far = vp * Vec3::new(0.0, 0.0, 100.0).extend(1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 64);
    }
}
