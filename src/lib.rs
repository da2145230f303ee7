//! cubeworks
//!
//! Small rendering samples on wgpu: a grid of rotating cubes, the same grid
//! drawn with instancing, and a draw call stress test whose object count is
//! driven by an adaptive level of detail controller.
//!
//! # Architecture
//!
//! 1. **lod** - Adaptive LOD controller (frame time window, dimension rule)
//! 2. **context** - Device and queue wrapper
//! 3. **core** - GPU primitives (buffers, pipeline builder, render states)
//! 4. **renderer** - Camera, cube mesh, program library, cube submission
//! 5. **overlay** - Debug text grid, drawn with glyphon (feature = "gui")
//! 6. **window** - winit frame loop (feature = "window")
//! 7. **sample** - `Sample` trait and `run_sample` driver
//! 8. **scene** - The cubes, instancing and drawstress samples
//! 9. **logging** - tracing subscriber setup for binaries (feature = "logging")

pub mod context;
pub mod core;
pub mod lod;
#[cfg(feature = "logging")]
pub mod logging;
pub mod overlay;
pub mod renderer;
pub mod sample;
pub mod scene;
pub mod window;

pub use glam;

pub use context::WgpuContext;

pub use core::{
    BlendState, ClearState, CullState, DepthState, DepthTexture, DynamicUniformBuffer,
    IndexBuffer, InstanceBuffer, InstanceData, PipelineBuilder, PosColorVertex, RenderTarget,
    UniformBuffer, VertexBuffer,
};

pub use lod::{AdaptiveLod, FrameTimer, LodChange, LodConfig, LodConfigError, LodState};

#[cfg(feature = "logging")]
pub use logging::init_logging;

pub use overlay::{attribute_colors, DebugText};

#[cfg(feature = "gui")]
pub use overlay::DebugOverlay;

pub use renderer::{
    Camera, CubeMesh, CubeRenderer, InstancedCubeRenderer, Program, ProgramError,
    ProgramLibrary, ViewTransform, Viewport,
};

pub use sample::{FrameState, Sample};

#[cfg(all(feature = "window", feature = "gui"))]
pub use sample::run_sample;

pub use scene::{CubesSample, DrawStressSample, InstancingSample};

pub use window::WindowSettings;

#[cfg(feature = "window")]
pub use window::{screen_target, Event, FrameInput, FrameOutput, Key, Window};
