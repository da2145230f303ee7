//! Per-frame data passed to and from the render loop callback

use crate::context::WgpuContext;
use crate::core::texture::DepthTexture;
pub use crate::renderer::view::Viewport;
use crate::window::event::Event;

/// Input data for a frame.
pub struct FrameInput<'a> {
    /// Events received since the last frame.
    pub events: Vec<Event>,
    /// Seconds since the loop started.
    pub elapsed_time: f64,
    /// Seconds since the previous frame.
    pub delta_time: f64,
    pub viewport: Viewport,
    pub ctx: &'a WgpuContext,
    pub surface_view: &'a wgpu::TextureView,
    pub depth_texture: &'a DepthTexture,
    pub surface_format: wgpu::TextureFormat,
}

impl FrameInput<'_> {
    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    /// Whether any event this frame asks to quit.
    pub fn exit_requested(&self) -> bool {
        self.events.iter().any(Event::is_exit_request)
    }
}

/// What the callback wants the loop to do next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutput {
    pub exit: bool,
}

impl FrameOutput {
    /// Keep running.
    pub fn new() -> Self {
        Self { exit: false }
    }

    /// Stop the loop after this frame.
    pub fn exit() -> Self {
        Self { exit: true }
    }
}
