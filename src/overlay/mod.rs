//! Debug text overlay
//!
//! [`DebugText`] collects what a sample prints each frame. With the `gui`
//! feature, [`DebugOverlay`] draws it over the scene: a solid background
//! rectangle per entry, then the glyphs.

pub mod debug_text;
#[cfg(feature = "gui")]
pub mod rect;
#[cfg(feature = "gui")]
pub mod text;

pub use debug_text::{attribute_colors, DebugText, TextEntry, CELL_HEIGHT, CELL_WIDTH, PALETTE};

#[cfg(feature = "gui")]
pub use self::renderer::DebugOverlay;

#[cfg(feature = "gui")]
mod renderer {
    use super::debug_text::{attribute_colors, DebugText};
    use super::rect::RectRenderer;
    use super::text::GlyphRenderer;
    use crate::context::WgpuContext;
    use crate::renderer::program::{ProgramError, ProgramLibrary};

    /// Draws a [`DebugText`] grid on top of a rendered frame.
    pub struct DebugOverlay {
        rects: RectRenderer,
        glyphs: GlyphRenderer,
    }

    impl DebugOverlay {
        pub fn new(
            ctx: &WgpuContext,
            library: &ProgramLibrary,
            format: wgpu::TextureFormat,
        ) -> Result<Self, ProgramError> {
            Ok(Self {
                rects: RectRenderer::new(ctx, library, format)?,
                glyphs: GlyphRenderer::new(ctx, format),
            })
        }

        /// Upload backgrounds and glyphs for this frame.
        pub fn prepare(
            &mut self,
            ctx: &WgpuContext,
            text: &DebugText,
            width: u32,
            height: u32,
        ) -> anyhow::Result<()> {
            for entry in text.entries() {
                let (_, background) = attribute_colors(entry.attr);
                // Black backgrounds are left transparent.
                if entry.attr >> 4 == 0 {
                    continue;
                }
                let (x, y, w, h) = entry.pixel_rect();
                self.rects.push(x, y, w, h, background);
            }
            self.rects.prepare(ctx, width, height);
            self.glyphs.prepare(ctx, text.entries(), width, height)
        }

        /// Record the overlay into a pass that loads the scene's color.
        pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) -> anyhow::Result<()> {
            self.rects.render(pass);
            self.glyphs.render(pass)
        }

        pub fn trim(&mut self) {
            self.glyphs.trim();
        }
    }
}
