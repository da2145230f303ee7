//! Glyph rendering for the debug text grid

use crate::context::WgpuContext;
use crate::overlay::debug_text::{attribute_colors, TextEntry, CELL_HEIGHT, CELL_WIDTH};
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer,
};

/// Font size that makes a monospace glyph roughly one cell wide.
const FONT_SIZE: f32 = 13.0;

/// Shapes and draws [`TextEntry`] strings with glyphon.
pub struct GlyphRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    renderer: TextRenderer,
    viewport: glyphon::Viewport,
    buffers: Vec<Buffer>,
    colors: Vec<Color>,
    origins: Vec<(f32, f32)>,
}

impl GlyphRenderer {
    pub fn new(ctx: &WgpuContext, format: wgpu::TextureFormat) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(&ctx.device);
        let mut atlas = TextAtlas::new(&ctx.device, &ctx.queue, &cache, format);
        let renderer = TextRenderer::new(
            &mut atlas,
            &ctx.device,
            wgpu::MultisampleState::default(),
            None,
        );
        let viewport = glyphon::Viewport::new(&ctx.device, &cache);

        Self {
            font_system,
            swash_cache,
            atlas,
            renderer,
            viewport,
            buffers: Vec::new(),
            colors: Vec::new(),
            origins: Vec::new(),
        }
    }

    /// Shape `entries` and upload their glyphs for a `width` x `height` target.
    pub fn prepare(
        &mut self,
        ctx: &WgpuContext,
        entries: &[TextEntry],
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        self.viewport
            .update(&ctx.queue, Resolution { width, height });

        while self.buffers.len() < entries.len() {
            self.buffers.push(Buffer::new(
                &mut self.font_system,
                Metrics::new(FONT_SIZE, CELL_HEIGHT),
            ));
        }

        self.colors.clear();
        self.origins.clear();
        for (buffer, entry) in self.buffers.iter_mut().zip(entries) {
            buffer.set_text(
                &mut self.font_system,
                &entry.text,
                &Attrs::new().family(Family::Monospace),
                Shaping::Advanced,
                None,
            );
            let line_width = (entry.width_in_cells() + 1) as f32 * CELL_WIDTH;
            buffer.set_size(&mut self.font_system, Some(line_width), Some(CELL_HEIGHT));
            buffer.shape_until_scroll(&mut self.font_system, false);

            let ([r, g, b], _) = attribute_colors(entry.attr);
            self.colors.push(Color::rgb(r, g, b));
            let (x, y, _, _) = entry.pixel_rect();
            self.origins.push((x, y));
        }

        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        let text_areas = self
            .buffers
            .iter()
            .zip(self.colors.iter().zip(&self.origins))
            .map(|(buffer, (&color, &(left, top)))| TextArea {
                buffer,
                left,
                top,
                scale: 1.0,
                bounds,
                default_color: color,
                custom_glyphs: &[],
            });

        self.renderer.prepare(
            &ctx.device,
            &ctx.queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )?;
        Ok(())
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) -> anyhow::Result<()> {
        self.renderer.render(&self.atlas, &self.viewport, pass)?;
        Ok(())
    }

    /// Release atlas space no longer referenced by prepared glyphs.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
