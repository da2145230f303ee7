//! Vertex types
//!
//! The samples share one vertex layout: a position and a packed ABGR color.

use bytemuck::{Pod, Zeroable};

/// Vertex with position and a packed 8-bit-per-channel color.
///
/// The color is stored as `0xAABBGGRR`, so on little-endian targets its bytes
/// read R, G, B, A and decode directly as `Unorm8x4`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PosColorVertex {
    pub position: [f32; 3],
    pub abgr: u32,
}

impl PosColorVertex {
    pub const fn new(x: f32, y: f32, z: f32, abgr: u32) -> Self {
        Self {
            position: [x, y, z],
            abgr,
        }
    }

    /// Unpack the color into normalized RGBA.
    pub fn rgba(&self) -> [f32; 4] {
        let channel = |shift: u32| ((self.abgr >> shift) & 0xff) as f32 / 255.0;
        [channel(0), channel(8), channel(16), channel(24)]
    }

    /// Get the vertex buffer layout for this vertex type.
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PosColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color0
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<PosColorVertex>(), 16); // 3 floats + 1 packed color
    }

    #[test]
    fn test_abgr_unpacks_red_first() {
        let v = PosColorVertex::new(0.0, 0.0, 0.0, 0xff0000ff);
        assert_eq!(v.rgba(), [1.0, 0.0, 0.0, 1.0]);

        let v = PosColorVertex::new(0.0, 0.0, 0.0, 0xffff0000);
        assert_eq!(v.rgba(), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_color_bytes_match_attribute_order() {
        let v = PosColorVertex::new(0.0, 0.0, 0.0, 0x80402010);
        let bytes = bytemuck::bytes_of(&v);
        if cfg!(target_endian = "little") {
            assert_eq!(&bytes[12..16], &[0x10, 0x20, 0x40, 0x80]);
        }
    }
}
