//! Sample harness
//!
//! A [`Sample`] describes one demo: it creates its GPU resources once,
//! updates per frame, prints extra overlay lines, and records its draws into
//! the scene pass. [`run_sample`] owns everything else: window, clear,
//! overlay header, present, and exit on Escape or close.

use crate::context::WgpuContext;
use crate::overlay::DebugText;
use crate::renderer::program::ProgramLibrary;
use crate::renderer::view::Viewport;
use crate::window::WindowSettings;

/// Clear color of the scene pass, `0xRRGGBBAA`.
pub const CLEAR_COLOR: u32 = 0x3030_30ff;

/// Timing and size of the frame being rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the sample started.
    pub elapsed_time: f64,
    /// Seconds since the previous frame.
    pub delta_time: f64,
    pub viewport: Viewport,
}

impl FrameState {
    /// Animation time in seconds.
    pub fn time(&self) -> f32 {
        self.elapsed_time as f32
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }
}

/// One demo program.
pub trait Sample {
    fn title(&self) -> &str;

    fn description(&self) -> &str;

    /// Window the sample wants. Vsync is on unless overridden.
    fn window_settings(&self) -> WindowSettings {
        WindowSettings::new().title(self.title())
    }

    /// Create GPU resources. Called once, on the first frame.
    fn init(
        &mut self,
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        library: &ProgramLibrary,
    ) -> anyhow::Result<()>;

    /// Advance animation and upload per-frame data.
    fn update(&mut self, ctx: &WgpuContext, frame: &FrameState);

    /// Print sample-specific lines below the standard header.
    fn overlay(&self, _text: &mut DebugText) {}

    /// Record draws into the scene pass.
    fn render(&mut self, ctx: &WgpuContext, pass: &mut wgpu::RenderPass<'_>);
}

/// Print the title, description and frame time lines every sample shows.
pub fn print_header(text: &mut DebugText, title: &str, description: &str, delta_time: f64) {
    text.print(0, 1, 0x4f, title);
    text.print(0, 2, 0x6f, format!("Description: {description}"));
    text.print(0, 3, 0x0f, format!("Frame: {:7.3}[ms]", delta_time * 1000.0));
}

#[cfg(all(feature = "window", feature = "gui"))]
pub use self::runner::run_sample;

#[cfg(all(feature = "window", feature = "gui"))]
mod runner {
    use super::{print_header, FrameState, Sample, CLEAR_COLOR};
    use crate::core::render_states::ClearState;
    use crate::overlay::{DebugOverlay, DebugText};
    use crate::renderer::program::ProgramLibrary;
    use crate::window::{screen_target, FrameOutput, Window};
    use anyhow::Context as _;

    struct Running<S> {
        sample: S,
        library: ProgramLibrary,
        overlay: Option<DebugOverlay>,
        text: DebugText,
    }

    /// Open a window and run `sample` until Escape is pressed or the window
    /// is closed.
    ///
    /// Initialization errors, such as a program that fails to load, end the
    /// loop and are returned.
    pub fn run_sample<S: Sample + 'static>(sample: S) -> anyhow::Result<()> {
        let settings = sample.window_settings();
        tracing::info!(title = %settings.title, vsync = settings.vsync, "starting sample");

        let library = ProgramLibrary::from_env();
        if let Some(dir) = library.search_dir() {
            tracing::info!(dir = %dir.display(), "loading programs from directory");
        }

        let state = Running {
            sample,
            library,
            overlay: None,
            text: DebugText::new(),
        };

        Window::new(settings).render_loop(state, |state, frame| {
            if frame.exit_requested() {
                return Ok(FrameOutput::exit());
            }

            let ctx = frame.ctx;
            if state.overlay.is_none() {
                state
                    .sample
                    .init(ctx, frame.surface_format, &state.library)
                    .with_context(|| format!("failed to initialize {}", state.sample.title()))?;
                let overlay = DebugOverlay::new(ctx, &state.library, frame.surface_format)
                    .context("failed to create debug overlay")?;
                state.overlay = Some(overlay);
            }
            let Some(overlay) = state.overlay.as_mut() else {
                return Ok(FrameOutput::new());
            };

            let frame_state = FrameState {
                elapsed_time: frame.elapsed_time,
                delta_time: frame.delta_time,
                viewport: frame.viewport,
            };
            state.sample.update(ctx, &frame_state);

            state.text.clear();
            print_header(
                &mut state.text,
                state.sample.title(),
                state.sample.description(),
                frame.delta_time,
            );
            state.sample.overlay(&mut state.text);
            overlay.prepare(ctx, &state.text, frame.width(), frame.height())?;

            let target = screen_target(&frame);
            let mut clear = ClearState::packed_rgba(CLEAR_COLOR, 1.0);
            if target.format().is_srgb() {
                clear = clear.srgb_to_linear();
            }

            let mut encoder = ctx.create_encoder(Some("sample frame"));
            {
                let mut pass = target.begin_render_pass(&mut encoder, clear);
                state.sample.render(ctx, &mut pass);
            }
            {
                let mut pass = target.begin_overlay_pass(&mut encoder);
                overlay.render(&mut pass)?;
            }
            ctx.submit([encoder.finish()]);
            overlay.trim();

            Ok(FrameOutput::new())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines() {
        let mut text = DebugText::new();
        print_header(&mut text, "01-cubes", "Rendering simple static mesh.", 0.016_667);

        let entries = text.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!((entries[0].row, entries[0].attr), (1, 0x4f));
        assert_eq!(entries[0].text, "01-cubes");
        assert_eq!((entries[1].row, entries[1].attr), (2, 0x6f));
        assert_eq!(entries[1].text, "Description: Rendering simple static mesh.");
        assert_eq!((entries[2].row, entries[2].attr), (3, 0x0f));
        assert_eq!(entries[2].text, "Frame:  16.667[ms]");
    }

    #[test]
    fn test_frame_state_time() {
        let frame = FrameState {
            elapsed_time: 2.5,
            delta_time: 0.01,
            viewport: Viewport {
                x: 0,
                y: 0,
                width: 200,
                height: 100,
            },
        };
        assert_eq!(frame.time(), 2.5);
        assert_eq!(frame.aspect(), 2.0);
    }
}
