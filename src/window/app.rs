//! winit application handler driving the frame loop

use super::event::{Event, Key};
use super::frame_io::{FrameInput, FrameOutput, Viewport};
use super::settings::WindowSettings;
use crate::context::WgpuContext;
use crate::core::texture::DepthTexture;
use crate::core::RenderTarget;
use anyhow::Context as _;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// A window with a GPU rendering context.
pub struct Window {
    settings: WindowSettings,
}

impl Window {
    pub fn new(settings: WindowSettings) -> Self {
        Self { settings }
    }

    /// Run the frame loop until the callback asks to exit, the window is
    /// closed, or the callback fails. A callback error ends the loop and is
    /// returned here.
    pub fn render_loop<F, S>(self, state: S, callback: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut S, FrameInput<'_>) -> anyhow::Result<FrameOutput> + 'static,
        S: 'static,
    {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            settings: self.settings,
            state,
            callback,
            graphics: None,
            events: Vec::new(),
            clock: FrameClock::new(Instant::now()),
            error: None,
        };

        event_loop.run_app(&mut app)?;
        match app.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

struct Graphics {
    window: Arc<winit::window::Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    ctx: WgpuContext,
    depth_texture: DepthTexture,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> anyhow::Result<Self> {
        let window_attrs = winit::window::WindowAttributes::default()
            .with_title(&settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(settings.size.0, settings.size.1))
            .with_resizable(settings.resizable);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let (adapter, ctx) = WgpuContext::request_blocking(&instance, Some(&surface))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: settings.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);
        tracing::info!(
            ?format,
            present_mode = ?config.present_mode,
            width = config.width,
            height = config.height,
            "surface configured"
        );

        let depth_texture =
            DepthTexture::new(&ctx, config.width, config.height, Some("depth texture"));

        Ok(Self {
            window,
            surface,
            config,
            ctx,
            depth_texture,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.ctx.device, &self.config);
        self.depth_texture.resize(&self.ctx, width, height);
    }
}

/// Frame timing. Only frames handed to the callback advance it, so a
/// skipped frame's time is carried into the next delivered one.
#[derive(Debug, Clone, Copy)]
struct FrameClock {
    start: Instant,
    last_frame: Instant,
}

impl FrameClock {
    fn new(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
        }
    }

    /// Seconds since start and since the previous delivered frame.
    fn tick(&mut self, now: Instant) -> (f64, f64) {
        let elapsed = (now - self.start).as_secs_f64();
        let delta = (now - self.last_frame).as_secs_f64();
        self.last_frame = now;
        (elapsed, delta)
    }
}

struct App<S, F> {
    settings: WindowSettings,
    state: S,
    callback: F,
    graphics: Option<Graphics>,
    events: Vec<Event>,
    clock: FrameClock,
    error: Option<anyhow::Error>,
}

impl<S, F> App<S, F>
where
    F: FnMut(&mut S, FrameInput<'_>) -> anyhow::Result<FrameOutput>,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        let surface_texture = match graphics.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                graphics
                    .surface
                    .configure(&graphics.ctx.device, &graphics.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e:?}");
                return;
            }
        };

        let (elapsed_time, delta_time) = self.clock.tick(Instant::now());

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let input = FrameInput {
            events: std::mem::take(&mut self.events),
            elapsed_time,
            delta_time,
            viewport: Viewport {
                x: 0,
                y: 0,
                width: graphics.config.width,
                height: graphics.config.height,
            },
            ctx: &graphics.ctx,
            surface_view: &view,
            depth_texture: &graphics.depth_texture,
            surface_format: graphics.config.format,
        };

        let output = (self.callback)(&mut self.state, input);
        surface_texture.present();

        match output {
            Ok(output) if output.exit => event_loop.exit(),
            Ok(_) => {}
            Err(error) => self.fail(event_loop, error),
        }
    }
}

impl<S, F> ApplicationHandler for App<S, F>
where
    F: FnMut(&mut S, FrameInput<'_>) -> anyhow::Result<FrameOutput> + 'static,
    S: 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match Graphics::new(event_loop, &self.settings) {
            Ok(graphics) => {
                self.graphics = Some(graphics);
                self.clock = FrameClock::new(Instant::now());
            }
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.events.push(Event::CloseRequested);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(size.width, size.height);
                }
                self.events.push(Event::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if let Some(key) = Key::from_winit(&key_event.logical_key) {
                    self.events.push(match key_event.state {
                        ElementState::Pressed => Event::KeyPress { key },
                        ElementState::Released => Event::KeyRelease { key },
                    });
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}

/// The window's surface and depth buffer as a render target.
pub fn screen_target<'a>(input: &FrameInput<'a>) -> RenderTarget<'a> {
    RenderTarget::from_surface(
        input.surface_view,
        Some(input.depth_texture),
        input.viewport.width,
        input.viewport.height,
        input.surface_format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_delivered_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);

        let (elapsed, delta) = clock.tick(start + Duration::from_millis(10));
        assert!((elapsed - 0.010).abs() < 1e-9);
        assert!((delta - 0.010).abs() < 1e-9);

        let (elapsed, delta) = clock.tick(start + Duration::from_millis(25));
        assert!((elapsed - 0.025).abs() < 1e-9);
        assert!((delta - 0.015).abs() < 1e-9);
    }

    #[test]
    fn test_clock_skipped_frame_time_carries_over() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        clock.tick(start + Duration::from_millis(10));

        // A frame at 20 ms never reached the callback, so the clock was not
        // ticked. The next delivered frame covers both intervals.
        let (elapsed, delta) = clock.tick(start + Duration::from_millis(30));
        assert!((elapsed - 0.030).abs() < 1e-9);
        assert!((delta - 0.020).abs() < 1e-9);
    }
}
