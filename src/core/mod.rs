//! Core rendering abstractions
//!
//! Thin wrappers over the wgpu primitives the samples touch directly.

pub mod buffer;
pub mod instance;
pub mod pipeline;
pub mod render_states;
pub mod render_target;
pub mod texture;
pub mod vertex;

pub use buffer::{DynamicUniformBuffer, IndexBuffer, UniformBuffer, VertexBuffer};
pub use instance::{InstanceBuffer, InstanceData};
pub use pipeline::PipelineBuilder;
pub use render_states::{BlendState, ClearState, CullState, DepthState};
pub use render_target::RenderTarget;
pub use texture::DepthTexture;
pub use vertex::PosColorVertex;
