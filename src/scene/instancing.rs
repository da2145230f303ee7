//! 05-instancing: the cube grid as one instanced draw with per-instance color

use super::{grid_camera, grid_position, GRID_SIDE};
use crate::context::WgpuContext;
use crate::core::instance::InstanceData;
use crate::renderer::instanced::InstancedCubeRenderer;
use crate::renderer::program::ProgramLibrary;
use crate::renderer::view::Camera;
use crate::sample::{FrameState, Sample};
use glam::Mat4;

/// Transform of grid cell (`x`, `y`) at `time`. Unlike the cubes grid the
/// X rotation is applied last.
fn instance_transform(time: f32, x: u32, y: u32) -> Mat4 {
    Mat4::from_translation(grid_position(x, y))
        * Mat4::from_rotation_x(time + x as f32 * 0.21)
        * Mat4::from_rotation_y(time + y as f32 * 0.37)
}

/// Color of grid cell (`x`, `y`) at `time`.
fn instance_color(time: f64, x: u32, y: u32) -> [f32; 4] {
    [
        ((time + x as f64 / 11.0).sin() * 0.5 + 0.5) as f32,
        ((time + y as f64 / 11.0).cos() * 0.5 + 0.5) as f32,
        ((time * 3.0).sin() * 0.5 + 0.5) as f32,
        1.0,
    ]
}

/// Per-instance data for the grid at `time`, row by row.
pub fn instance_grid(time: f64) -> Vec<InstanceData> {
    let t = time as f32;
    (0..GRID_SIDE)
        .flat_map(|y| {
            (0..GRID_SIDE).map(move |x| {
                InstanceData::with_transform_and_color(
                    instance_transform(t, x, y),
                    instance_color(time, x, y),
                )
            })
        })
        .collect()
}

pub struct InstancingSample {
    camera: Camera,
    renderer: Option<InstancedCubeRenderer>,
}

impl InstancingSample {
    pub fn new() -> Self {
        Self {
            camera: grid_camera(),
            renderer: None,
        }
    }
}

impl Default for InstancingSample {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample for InstancingSample {
    fn title(&self) -> &str {
        "05-instancing"
    }

    fn description(&self) -> &str {
        "Geometry instancing."
    }

    fn init(
        &mut self,
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        library: &ProgramLibrary,
    ) -> anyhow::Result<()> {
        let capacity = GRID_SIDE * GRID_SIDE;
        self.renderer = Some(InstancedCubeRenderer::new(ctx, library, format, capacity)?);
        Ok(())
    }

    fn update(&mut self, ctx: &WgpuContext, frame: &FrameState) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.set_view_transform(ctx, &self.camera.view_transform(frame.aspect()));
        renderer.set_instances(ctx, &instance_grid(frame.elapsed_time));
    }

    fn render(&mut self, _ctx: &WgpuContext, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.draw(pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec3};

    #[test]
    fn test_instance_count_and_layout() {
        let instances = instance_grid(0.0);
        assert_eq!(instances.len(), 121);
        assert_eq!(instances[0].translation(), Vec3::new(-15.0, -15.0, 0.0));
        assert_eq!(instances[120].translation(), Vec3::new(15.0, 15.0, 0.0));
    }

    #[test]
    fn test_rotation_order() {
        let time = 0.7f32;
        let instances = instance_grid(time as f64);
        let first = Mat3::from_mat4(Mat4::from_cols_array_2d(&instances[0].transform));
        let expected = Mat3::from_rotation_x(time) * Mat3::from_rotation_y(time);
        assert!(first.abs_diff_eq(expected, 1e-5));

        // The cubes grid rotates the other way round.
        let swapped = Mat3::from_rotation_y(time) * Mat3::from_rotation_x(time);
        assert!(!first.abs_diff_eq(swapped, 1e-3));
    }

    #[test]
    fn test_colors_at_zero() {
        let instances = instance_grid(0.0);
        // sin(0) = 0, cos(0) = 1
        assert_eq!(instances[0].color, [0.5, 1.0, 0.5, 1.0]);

        for instance in &instances {
            assert!(instance.color.iter().all(|c| (0.0..=1.0).contains(c)));
            assert_eq!(instance.color[3], 1.0);
        }
    }

    #[test]
    fn test_blue_channel_is_shared() {
        let instances = instance_grid(0.4);
        let blue = instances[0].color[2];
        assert!(instances.iter().all(|i| i.color[2] == blue));
        assert!((blue - ((1.2f64).sin() * 0.5 + 0.5) as f32).abs() < 1e-6);
    }
}
