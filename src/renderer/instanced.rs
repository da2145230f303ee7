//! Instanced cube rendering
//!
//! All cubes go out in a single `draw_indexed` call, with transform and
//! color streamed per instance.

use crate::context::WgpuContext;
use crate::core::buffer::UniformBuffer;
use crate::core::instance::{InstanceBuffer, InstanceData};
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{CullState, DepthState};
use crate::core::vertex::PosColorVertex;
use crate::renderer::cube::CubeMesh;
use crate::renderer::program::{ProgramError, ProgramLibrary};
use crate::renderer::view::{CameraUniform, ViewTransform};
use glam::Mat4;

/// Draws many cubes with one instanced draw call.
pub struct InstancedCubeRenderer {
    pipeline: wgpu::RenderPipeline,
    camera: UniformBuffer<CameraUniform>,
    instances: InstanceBuffer,
    mesh: CubeMesh,
}

impl InstancedCubeRenderer {
    /// Load the `instancing` program and build the pipeline.
    pub fn new(
        ctx: &WgpuContext,
        library: &ProgramLibrary,
        format: wgpu::TextureFormat,
        capacity: u32,
    ) -> Result<Self, ProgramError> {
        let program = library.load("instancing")?;

        let camera = UniformBuffer::new(
            ctx,
            &CameraUniform::from_view(&ViewTransform {
                view: Mat4::IDENTITY,
                proj: Mat4::IDENTITY,
            }),
            wgpu::ShaderStages::VERTEX,
            "instancing camera",
        );

        let pipeline = PipelineBuilder::new(ctx, &program)
            .vertex_layout(PosColorVertex::layout())
            .vertex_layout(InstanceData::layout())
            .bind_group_layout(camera.bind_group_layout())
            .color_format(format)
            .depth(DepthState::read_write())
            .cull(CullState::Back)
            .build();

        Ok(Self {
            pipeline,
            camera,
            instances: InstanceBuffer::with_capacity(ctx, capacity, Some("instance buffer")),
            mesh: CubeMesh::new(ctx),
        })
    }

    /// Set the view and projection used by the next draw.
    pub fn set_view_transform(&self, ctx: &WgpuContext, view: &ViewTransform) {
        self.camera.update(ctx, &CameraUniform::from_view(view));
    }

    /// Replace this frame's instance data.
    pub fn set_instances(&mut self, ctx: &WgpuContext, instances: &[InstanceData]) {
        self.instances.write(ctx, instances);
    }

    /// Record the instanced draw. Returns the number of instances drawn.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) -> u32 {
        let count = self.instances.count();
        if count == 0 {
            return 0;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.camera.bind_group(), &[]);
        self.mesh.bind(pass);
        pass.set_vertex_buffer(1, self.instances.slice());
        pass.draw_indexed(0..self.mesh.index_count(), 0, 0..count);
        count
    }
}
