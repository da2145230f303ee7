//! Static cube geometry
//!
//! Eight colored corners of the `[-1, 1]^3` cube and the twelve triangles
//! that close it, uploaded once and shared by every draw.

use crate::context::WgpuContext;
use crate::core::buffer::{IndexBuffer, VertexBuffer};
use crate::core::vertex::PosColorVertex;

/// Cube corners with distinct colors.
pub const CUBE_VERTICES: [PosColorVertex; 8] = [
    PosColorVertex::new(-1.0, 1.0, 1.0, 0xff000000),
    PosColorVertex::new(1.0, 1.0, 1.0, 0xff0000ff),
    PosColorVertex::new(-1.0, -1.0, 1.0, 0xff00ff00),
    PosColorVertex::new(1.0, -1.0, 1.0, 0xff00ffff),
    PosColorVertex::new(-1.0, 1.0, -1.0, 0xffff0000),
    PosColorVertex::new(1.0, 1.0, -1.0, 0xffff00ff),
    PosColorVertex::new(-1.0, -1.0, -1.0, 0xffffff00),
    PosColorVertex::new(1.0, -1.0, -1.0, 0xffffffff),
];

/// Triangle list, two triangles per face.
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, // 0
    1, 3, 2,
    4, 6, 5, // 2
    5, 6, 7,
    0, 2, 4, // 4
    4, 2, 6,
    1, 5, 3, // 6
    5, 7, 3,
    0, 4, 1, // 8
    4, 5, 1,
    2, 3, 6, // 10
    6, 3, 7,
];

/// The cube's vertex and index buffers.
pub struct CubeMesh {
    vertices: VertexBuffer,
    indices: IndexBuffer,
}

impl CubeMesh {
    pub fn new(ctx: &WgpuContext) -> Self {
        Self {
            vertices: VertexBuffer::new(ctx, &CUBE_VERTICES, Some("cube vertices")),
            indices: IndexBuffer::new_u16(ctx, &CUBE_INDICES, Some("cube indices")),
        }
    }

    /// Bind the vertex buffer to slot 0 and the index buffer.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertices.slice());
        pass.set_index_buffer(self.indices.slice(), self.indices.format());
    }

    pub fn index_count(&self) -> u32 {
        self.indices.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn corner(i: u16) -> Vec3 {
        Vec3::from(CUBE_VERTICES[i as usize].position)
    }

    #[test]
    fn test_indices_reference_vertices() {
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
    }

    #[test]
    fn test_every_face_covered_twice() {
        // Each triangle lies on one face; every face gets two triangles.
        let mut faces = std::collections::HashMap::new();
        for tri in CUBE_INDICES.chunks_exact(3) {
            let [a, b, c] = [corner(tri[0]), corner(tri[1]), corner(tri[2])];
            let normal = (b - a).cross(c - a).normalize();
            let key = (normal.x as i32, normal.y as i32, normal.z as i32);
            *faces.entry(key).or_insert(0) += 1;
        }
        assert_eq!(faces.len(), 6);
        assert!(faces.values().all(|&n| n == 2));
    }

    #[test]
    fn test_consistent_winding() {
        // With counter-clockwise fronts every triangle's normal points away
        // from the cube center when viewed in a left-handed frame.
        for tri in CUBE_INDICES.chunks_exact(3) {
            let [a, b, c] = [corner(tri[0]), corner(tri[1]), corner(tri[2])];
            let centroid = (a + b + c) / 3.0;
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(centroid) < 0.0, "triangle {:?}", tri);
        }
    }
}
