//! 01-cubes: an 11x11 grid of rotating cubes, one draw call each

use super::{grid_camera, grid_transform, GRID_SIDE};
use crate::context::WgpuContext;
use crate::renderer::program::ProgramLibrary;
use crate::renderer::submit::CubeRenderer;
use crate::renderer::view::Camera;
use crate::sample::{FrameState, Sample};
use glam::Mat4;

/// Model matrices for the grid at `time`, row by row.
pub fn cube_grid_transforms(time: f32) -> Vec<Mat4> {
    (0..GRID_SIDE)
        .flat_map(|y| (0..GRID_SIDE).map(move |x| grid_transform(time, x, y)))
        .collect()
}

pub struct CubesSample {
    camera: Camera,
    renderer: Option<CubeRenderer>,
}

impl CubesSample {
    pub fn new() -> Self {
        Self {
            camera: grid_camera(),
            renderer: None,
        }
    }
}

impl Default for CubesSample {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample for CubesSample {
    fn title(&self) -> &str {
        "01-cubes"
    }

    fn description(&self) -> &str {
        "Rendering simple static mesh."
    }

    fn init(
        &mut self,
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        library: &ProgramLibrary,
    ) -> anyhow::Result<()> {
        self.renderer = Some(CubeRenderer::new(ctx, library, format)?);
        Ok(())
    }

    fn update(&mut self, ctx: &WgpuContext, frame: &FrameState) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.set_view_transform(ctx, &self.camera.view_transform(frame.aspect()));
        for transform in cube_grid_transforms(frame.time()) {
            renderer.submit(transform);
        }
    }

    fn render(&mut self, ctx: &WgpuContext, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.flush(ctx, pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_grid_layout() {
        let transforms = cube_grid_transforms(0.0);
        assert_eq!(transforms.len(), 121);

        let first = transforms[0].w_axis.truncate();
        assert_eq!(first, Vec3::new(-15.0, -15.0, 0.0));

        // x varies fastest
        let second = transforms[1].w_axis.truncate();
        assert_eq!(second, Vec3::new(-12.0, -15.0, 0.0));

        let last = transforms[120].w_axis.truncate();
        assert_eq!(last, Vec3::new(15.0, 15.0, 0.0));
    }

    #[test]
    fn test_rotation_keeps_scale() {
        for transform in cube_grid_transforms(1.7) {
            let (scale, _, _) = transform.to_scale_rotation_translation();
            assert!((scale - Vec3::ONE).abs().max_element() < 1e-5);
        }
    }

    #[test]
    fn test_first_cube_identity_at_zero() {
        let transforms = cube_grid_transforms(0.0);
        let rotation = Mat4::from_mat3(glam::Mat3::from_mat4(transforms[0]));
        assert!(rotation.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }
}
