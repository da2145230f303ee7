//! Render pipeline builder
//!
//! Turns a loaded [`Program`] plus fixed-function state into a wgpu pipeline.

use crate::context::WgpuContext;
use crate::core::render_states::{BlendState, CullState, DepthState};
use crate::core::texture::DepthTexture;
use crate::renderer::program::Program;

/// Builder for creating render pipelines from a program.
pub struct PipelineBuilder<'a> {
    ctx: &'a WgpuContext,
    program: &'a Program,
    vertex_layouts: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    color_format: wgpu::TextureFormat,
    depth_state: Option<DepthState>,
    blend_state: BlendState,
    cull_state: CullState,
}

impl<'a> PipelineBuilder<'a> {
    /// Start a pipeline for `program`.
    pub fn new(ctx: &'a WgpuContext, program: &'a Program) -> Self {
        Self {
            ctx,
            program,
            vertex_layouts: Vec::new(),
            bind_group_layouts: Vec::new(),
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            depth_state: None,
            blend_state: BlendState::Opaque,
            cull_state: CullState::Back,
        }
    }

    /// Add a vertex buffer layout.
    pub fn vertex_layout(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_layouts.push(layout);
        self
    }

    /// Add a bind group layout. Groups are numbered in call order.
    pub fn bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Set the color target format.
    pub fn color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    /// Enable depth testing against [`DepthTexture::FORMAT`].
    pub fn depth(mut self, state: DepthState) -> Self {
        self.depth_state = Some(state);
        self
    }

    /// Set the blend state.
    pub fn blend(mut self, state: BlendState) -> Self {
        self.blend_state = state;
        self
    }

    /// Set the cull state.
    pub fn cull(mut self, state: CullState) -> Self {
        self.cull_state = state;
        self
    }

    /// Compile the program and build the pipeline.
    pub fn build(self) -> wgpu::RenderPipeline {
        let label = Some(self.program.name());
        let shader_module = self.program.create_module(self.ctx);

        let pipeline_layout =
            self.ctx
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label,
                    bind_group_layouts: &self.bind_group_layouts,
                    immediate_size: 0,
                });

        let depth_stencil = self
            .depth_state
            .map(|state| state.to_wgpu(DepthTexture::FORMAT));

        let constants = override_constants(self.program, self.color_format);

        tracing::debug!(program = self.program.name(), ?constants, "building pipeline");

        self.ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader_module,
                    entry_point: Some(Program::VERTEX_ENTRY),
                    buffers: &self.vertex_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader_module,
                    entry_point: Some(Program::FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: self.blend_state.to_wgpu(),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions {
                        constants: &constants,
                        ..Default::default()
                    },
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_state.to_wgpu(),
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
    }
}

/// Fragment override values for `program` drawing into `format`. Only
/// overrides the program declares are set.
fn override_constants(
    program: &Program,
    format: wgpu::TextureFormat,
) -> Vec<(&'static str, f64)> {
    let mut constants = Vec::new();
    if program.declares_override(Program::SRGB_TARGET) {
        let srgb = if format.is_srgb() { 1.0 } else { 0.0 };
        constants.push((Program::SRGB_TARGET, srgb));
    }
    constants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::program::ProgramLibrary;

    #[test]
    fn test_srgb_override_follows_format() {
        let library = ProgramLibrary::new();
        for name in ["cubes", "instancing"] {
            let program = library.load(name).unwrap();
            assert_eq!(
                override_constants(&program, wgpu::TextureFormat::Bgra8UnormSrgb),
                vec![(Program::SRGB_TARGET, 1.0)]
            );
            assert_eq!(
                override_constants(&program, wgpu::TextureFormat::Bgra8Unorm),
                vec![(Program::SRGB_TARGET, 0.0)]
            );
        }

        let rect = library.load("debug_rect").unwrap();
        assert!(override_constants(&rect, wgpu::TextureFormat::Bgra8UnormSrgb).is_empty());
    }
}
