//! 17-drawstress: a dim^3 cube volume, one draw call per cube, sized by the
//! adaptive LOD controller

use crate::context::WgpuContext;
use crate::lod::AdaptiveLod;
use crate::overlay::DebugText;
use crate::renderer::program::ProgramLibrary;
use crate::renderer::submit::CubeRenderer;
use crate::renderer::view::Camera;
use crate::sample::{FrameState, Sample};
use crate::window::WindowSettings;
use glam::{Mat4, Vec3};

/// Spacing between neighboring cubes.
pub const STEP: f32 = 0.6;
/// Uniform scale applied to every cube.
pub const SCALE: f32 = 0.25;

/// Model matrices for a `dim`^3 volume at `time`, with x varying fastest
/// and z slowest.
pub fn drawstress_transforms(time: f32, dim: u32) -> impl Iterator<Item = Mat4> {
    let half = -STEP * dim as f32 / 2.0;
    let origin = Vec3::new(half, half, -15.0);
    let scale = Mat4::from_scale(Vec3::splat(SCALE));

    (0..dim).flat_map(move |z| {
        (0..dim).flat_map(move |y| {
            (0..dim).map(move |x| {
                let rotation = Mat4::from_rotation_z(time + z as f32 * 0.13)
                    * Mat4::from_rotation_y(time + y as f32 * 0.37)
                    * Mat4::from_rotation_x(time + x as f32 * 0.21);
                let position = origin + Vec3::new(x as f32, y as f32, z as f32) * STEP;
                Mat4::from_translation(position) * rotation * scale
            })
        })
    })
}

/// Overlay line for the draw call count. `limit` is the most draws the
/// renderer can record per frame, if it exists yet.
fn draw_calls_line(requested: u64, limit: Option<u32>) -> String {
    match limit {
        Some(limit) if requested > u64::from(limit) => {
            format!("Draw calls: {limit} (clamped from {requested})")
        }
        _ => format!("Draw calls: {requested}"),
    }
}

pub struct DrawStressSample {
    camera: Camera,
    lod: AdaptiveLod,
    renderer: Option<CubeRenderer>,
    draw_calls: u32,
}

impl DrawStressSample {
    pub fn new() -> Self {
        Self::with_lod(AdaptiveLod::default())
    }

    /// Use a custom controller, e.g. with different frame rate targets.
    pub fn with_lod(lod: AdaptiveLod) -> Self {
        Self {
            camera: Camera::look_at(Vec3::new(0.0, 0.0, -35.0), Vec3::ZERO, Vec3::Y),
            lod,
            renderer: None,
            draw_calls: 0,
        }
    }

    pub fn lod(&self) -> &AdaptiveLod {
        &self.lod
    }

    /// Draw calls recorded in the last rendered frame.
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }
}

impl Default for DrawStressSample {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample for DrawStressSample {
    fn title(&self) -> &str {
        "17-drawstress"
    }

    fn description(&self) -> &str {
        "Draw stress, maximizing number of draw calls."
    }

    fn window_settings(&self) -> WindowSettings {
        WindowSettings::new().title(self.title()).vsync(false)
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
        let dim = self.lod.update(frame.delta_time);

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.set_view_transform(ctx, &self.camera.view_transform(frame.aspect()));
        for transform in drawstress_transforms(frame.time(), dim) {
            renderer.submit(transform);
        }
    }

    fn overlay(&self, text: &mut DebugText) {
        let limit = self.renderer.as_ref().map(CubeRenderer::max_draws);
        text.print(0, 5, 0x0f, draw_calls_line(self.lod.object_count(), limit));
        text.print(0, 6, 0x0f, format!("Dim: {}", self.lod.dimension()));
        text.print(
            0,
            7,
            0x0f,
            format!("AvgFrame: {:7.3}[ms]", self.lod.average_frame_time() * 1000.0),
        );
    }

    fn render(&mut self, ctx: &WgpuContext, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(renderer) = self.renderer.as_mut() {
            self.draw_calls = renderer.flush(ctx, pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lod::LodConfig;

    #[test]
    fn test_volume_count() {
        assert_eq!(drawstress_transforms(0.0, 12).count(), 1728);
        assert_eq!(drawstress_transforms(0.0, 2).count(), 8);
        assert_eq!(drawstress_transforms(0.0, 0).count(), 0);
    }

    #[test]
    fn test_volume_placement() {
        let transforms: Vec<Mat4> = drawstress_transforms(0.0, 4).collect();
        let first = transforms[0].w_axis.truncate();
        assert!((first - Vec3::new(-1.2, -1.2, -15.0)).abs().max_element() < 1e-5);

        // x fastest, then y, then z
        let next_x = transforms[1].w_axis.truncate();
        let next_y = transforms[4].w_axis.truncate();
        let next_z = transforms[16].w_axis.truncate();
        assert!((next_x - first - Vec3::X * STEP).abs().max_element() < 1e-5);
        assert!((next_y - first - Vec3::Y * STEP).abs().max_element() < 1e-5);
        assert!((next_z - first - Vec3::Z * STEP).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_cubes_are_scaled() {
        for transform in drawstress_transforms(0.9, 3) {
            let (scale, _, _) = transform.to_scale_rotation_translation();
            assert!((scale - Vec3::splat(SCALE)).abs().max_element() < 1e-5);
        }
    }

    #[test]
    fn test_overlay_lines() {
        let sample = DrawStressSample::new();
        let mut text = DebugText::new();
        sample.overlay(&mut text);

        let rows = text.to_rows();
        assert_eq!(rows[5], "Draw calls: 1728");
        assert_eq!(rows[6], "Dim: 12");
        assert_eq!(rows[7], "AvgFrame:   0.000[ms]");
    }

    #[test]
    fn test_draw_calls_line_reports_clamp() {
        assert_eq!(draw_calls_line(1728, None), "Draw calls: 1728");
        assert_eq!(draw_calls_line(1728, Some(4096)), "Draw calls: 1728");
        assert_eq!(draw_calls_line(4096, Some(4096)), "Draw calls: 4096");
        assert_eq!(
            draw_calls_line(8000, Some(4096)),
            "Draw calls: 4096 (clamped from 8000)"
        );
    }

    #[test]
    fn test_custom_lod_and_settings() {
        let lod = AdaptiveLod::new(LodConfig::new().initial_dimension(4)).unwrap();
        let sample = DrawStressSample::with_lod(lod);
        assert_eq!(sample.lod().dimension(), 4);
        assert_eq!(sample.draw_calls(), 0);
        assert!(!sample.window_settings().vsync);
    }
}
