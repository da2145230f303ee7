//! Render state configurations
//!
//! Small value types that map onto wgpu pipeline and pass state.

/// Clear state for render targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearState {
    /// Color to clear to (RGBA), or None to not clear.
    pub color: Option<[f32; 4]>,
    /// Depth value to clear to (0.0-1.0), or None to not clear.
    pub depth: Option<f32>,
}

impl ClearState {
    /// Create a clear state that clears both color and depth.
    pub fn color_and_depth(color: [f32; 4], depth: f32) -> Self {
        Self {
            color: Some(color),
            depth: Some(depth),
        }
    }

    /// Clear color and depth, with the color given as packed `0xRRGGBBAA`.
    pub fn packed_rgba(rgba: u32, depth: f32) -> Self {
        Self::color_and_depth(unpack_rgba(rgba), depth)
    }

    /// Create a clear state that keeps the existing contents.
    pub fn none() -> Self {
        Self {
            color: None,
            depth: None,
        }
    }

    /// Treat the clear color as sRGB encoded and convert it to linear, for
    /// targets whose format applies the sRGB curve on write.
    pub fn srgb_to_linear(self) -> Self {
        Self {
            color: self
                .color
                .map(|[r, g, b, a]| [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]),
            depth: self.depth,
        }
    }

    /// Get the wgpu load operation for color.
    pub fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.color {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Get the wgpu load operation for depth.
    pub fn depth_load_op(&self) -> wgpu::LoadOp<f32> {
        match self.depth {
            Some(d) => wgpu::LoadOp::Clear(d),
            None => wgpu::LoadOp::Load,
        }
    }
}

impl Default for ClearState {
    fn default() -> Self {
        Self::color_and_depth([0.0, 0.0, 0.0, 1.0], 1.0)
    }
}

/// Split `0xRRGGBBAA` into normalized channels.
pub fn unpack_rgba(rgba: u32) -> [f32; 4] {
    let channel = |shift: u32| ((rgba >> shift) & 0xff) as f32 / 255.0;
    [channel(24), channel(16), channel(8), channel(0)]
}

/// Convert one sRGB encoded channel in `0..=1` to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Blend state configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendState {
    /// No blending (opaque).
    #[default]
    Opaque,
    /// Standard alpha blending.
    Alpha,
}

impl BlendState {
    /// Convert to wgpu blend state.
    pub fn to_wgpu(&self) -> Option<wgpu::BlendState> {
        match self {
            BlendState::Opaque => None,
            BlendState::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
        }
    }
}

/// Depth test configuration.
#[derive(Debug, Clone, Copy)]
pub struct DepthState {
    /// Whether to write to the depth buffer.
    pub write: bool,
    /// Comparison function for depth test.
    pub compare: wgpu::CompareFunction,
}

impl DepthState {
    /// Depth testing enabled with writes.
    pub fn read_write() -> Self {
        Self {
            write: true,
            compare: wgpu::CompareFunction::Less,
        }
    }

    /// Convert to wgpu depth stencil state.
    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.write,
            depth_compare: self.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

impl Default for DepthState {
    fn default() -> Self {
        Self::read_write()
    }
}

/// Cull mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullState {
    /// No culling.
    None,
    /// Cull back faces.
    #[default]
    Back,
}

impl CullState {
    /// Convert to wgpu cull mode.
    pub fn to_wgpu(&self) -> Option<wgpu::Face> {
        match self {
            CullState::None => None,
            CullState::Back => Some(wgpu::Face::Back),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_rgba_clear() {
        let clear = ClearState::packed_rgba(0x303030ff, 1.0);
        let [r, g, b, a] = clear.color.unwrap();
        assert!((r - 48.0 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 1.0);
        assert_eq!(clear.depth, Some(1.0));
    }

    #[test]
    fn test_none_loads() {
        let clear = ClearState::none();
        assert!(matches!(clear.color_load_op(), wgpu::LoadOp::Load));
        assert!(matches!(clear.depth_load_op(), wgpu::LoadOp::Load));
    }

    #[test]
    fn test_srgb_to_linear() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);

        let clear = ClearState::packed_rgba(0x303030ff, 1.0).srgb_to_linear();
        let [r, _, _, a] = clear.color.unwrap();
        assert!(r < 48.0 / 255.0);
        assert_eq!(a, 1.0);
    }
}
