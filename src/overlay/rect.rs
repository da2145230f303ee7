//! Solid rectangles behind debug text

use crate::context::WgpuContext;
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{srgb_to_linear, BlendState, CullState};
use crate::renderer::program::{ProgramError, ProgramLibrary};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Vertex for a screen-space rectangle, position in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RectVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl RectVertex {
    const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Batches rectangles and draws them in one call.
pub struct RectRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertices: Vec<RectVertex>,
    uploaded: u32,
    screen_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    screen_size: [f32; 2],
    linear_output: bool,
}

impl RectRenderer {
    pub fn new(
        ctx: &WgpuContext,
        library: &ProgramLibrary,
        format: wgpu::TextureFormat,
    ) -> Result<Self, ProgramError> {
        let program = library.load("debug_rect")?;

        let vertex_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("debug rect vertices"),
            size: 256 * std::mem::size_of::<RectVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("debug rect screen"),
                contents: bytemuck::cast_slice(&[1.0f32; 4]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("debug rect layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("debug rect bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        let pipeline = PipelineBuilder::new(ctx, &program)
            .vertex_layout(RectVertex::layout())
            .bind_group_layout(&bind_group_layout)
            .color_format(format)
            .blend(BlendState::Alpha)
            .cull(CullState::None)
            .build();

        Ok(Self {
            pipeline,
            vertex_buffer,
            vertices: Vec::new(),
            uploaded: 0,
            screen_buffer,
            bind_group,
            screen_size: [0.0, 0.0],
            linear_output: format.is_srgb(),
        })
    }

    /// Queue a rectangle with an sRGB color.
    pub fn push(&mut self, x: f32, y: f32, w: f32, h: f32, srgb: [u8; 3]) {
        let [r, g, b] = srgb.map(|c| {
            let c = c as f32 / 255.0;
            if self.linear_output {
                srgb_to_linear(c)
            } else {
                c
            }
        });
        let color = [r, g, b, 1.0];

        let corner = |px: f32, py: f32| RectVertex {
            position: [px, py],
            color,
        };
        let (v0, v1, v2, v3) = (
            corner(x, y),
            corner(x, y + h),
            corner(x + w, y + h),
            corner(x + w, y),
        );
        self.vertices.extend_from_slice(&[v0, v1, v2, v0, v2, v3]);
    }

    /// Upload the queued rectangles and clear the queue.
    pub fn prepare(&mut self, ctx: &WgpuContext, width: u32, height: u32) {
        let size = [width.max(1) as f32, height.max(1) as f32];
        if self.screen_size != size {
            self.screen_size = size;
            ctx.queue.write_buffer(
                &self.screen_buffer,
                0,
                bytemuck::cast_slice(&[size[0], size[1], 0.0, 0.0]),
            );
        }

        let needed_size = (self.vertices.len() * std::mem::size_of::<RectVertex>()) as u64;
        if needed_size > self.vertex_buffer.size() {
            self.vertex_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("debug rect vertices"),
                size: needed_size * 2,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }

        if !self.vertices.is_empty() {
            ctx.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        }
        self.uploaded = self.vertices.len() as u32;
        self.vertices.clear();
    }

    /// Draw what the last [`RectRenderer::prepare`] uploaded.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.uploaded == 0 {
            return;
        }

        let used = self.uploaded as u64 * std::mem::size_of::<RectVertex>() as u64;
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..used));
        pass.draw(0..self.uploaded, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_vertex_size() {
        assert_eq!(std::mem::size_of::<RectVertex>(), 24);
    }
}
