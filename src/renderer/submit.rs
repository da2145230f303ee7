//! Per-draw cube submission
//!
//! Mirrors an immediate-mode "set transform, submit" API: every
//! [`CubeRenderer::submit`] becomes its own `draw_indexed` call, with the
//! model matrix selected through a dynamic uniform offset.

use crate::context::WgpuContext;
use crate::core::buffer::{DynamicUniformBuffer, UniformBuffer};
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{BlendState, CullState, DepthState};
use crate::core::vertex::PosColorVertex;
use crate::renderer::cube::CubeMesh;
use crate::renderer::program::{ProgramError, ProgramLibrary};
use crate::renderer::view::{CameraUniform, ModelUniform, ViewTransform};
use glam::Mat4;

/// Initial number of transform slots.
const INITIAL_CAPACITY: u32 = 256;

/// Draws cubes one draw call at a time.
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    camera: UniformBuffer<CameraUniform>,
    transforms: DynamicUniformBuffer<ModelUniform>,
    mesh: CubeMesh,
    pending: Vec<ModelUniform>,
    clamp_reported: bool,
}

impl CubeRenderer {
    /// Load the `cubes` program and build the pipeline.
    pub fn new(
        ctx: &WgpuContext,
        library: &ProgramLibrary,
        format: wgpu::TextureFormat,
    ) -> Result<Self, ProgramError> {
        let program = library.load("cubes")?;

        let camera = UniformBuffer::new(
            ctx,
            &CameraUniform::from_view(&ViewTransform {
                view: Mat4::IDENTITY,
                proj: Mat4::IDENTITY,
            }),
            wgpu::ShaderStages::VERTEX,
            "cubes camera",
        );
        let transforms = DynamicUniformBuffer::new(
            ctx,
            INITIAL_CAPACITY,
            wgpu::ShaderStages::VERTEX,
            "cubes transforms",
        );

        let pipeline = PipelineBuilder::new(ctx, &program)
            .vertex_layout(PosColorVertex::layout())
            .bind_group_layout(camera.bind_group_layout())
            .bind_group_layout(transforms.bind_group_layout())
            .color_format(format)
            .depth(DepthState::read_write())
            .blend(BlendState::Opaque)
            .cull(CullState::Back)
            .build();

        Ok(Self {
            pipeline,
            camera,
            transforms,
            mesh: CubeMesh::new(ctx),
            pending: Vec::with_capacity(INITIAL_CAPACITY as usize),
            clamp_reported: false,
        })
    }

    /// Set the view and projection used by the next flush.
    pub fn set_view_transform(&self, ctx: &WgpuContext, view: &ViewTransform) {
        self.camera.update(ctx, &CameraUniform::from_view(view));
    }

    /// Queue one cube with the given model matrix.
    pub fn submit(&mut self, transform: Mat4) {
        self.pending.push(ModelUniform::from_matrix(transform));
    }

    /// Number of cubes queued since the last flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Most draws one flush can record; the rest of the queue is dropped.
    pub fn max_draws(&self) -> u32 {
        self.transforms.max_capacity()
    }

    /// Upload the queued transforms and record one draw per cube.
    /// Returns the number of draw calls recorded.
    pub fn flush(&mut self, ctx: &WgpuContext, pass: &mut wgpu::RenderPass<'_>) -> u32 {
        let written = self.transforms.write(ctx, &self.pending);
        if (written as usize) < self.pending.len() && !self.clamp_reported {
            tracing::warn!(
                requested = self.pending.len(),
                drawn = written,
                "transform buffer is at the device limit, dropping draws"
            );
            self.clamp_reported = true;
        }
        self.pending.clear();

        if written == 0 {
            return 0;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.camera.bind_group(), &[]);
        self.mesh.bind(pass);

        let index_count = self.mesh.index_count();
        for draw in 0..written {
            pass.set_bind_group(1, self.transforms.bind_group(), &[self.transforms.offset(draw)]);
            pass.draw_indexed(0..index_count, 0, 0..1);
        }
        written
    }
}
