//! Instance buffer for instanced rendering
//!
//! Per-instance data is a transform followed by a color, 80 bytes per entry.

use crate::context::WgpuContext;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Per-instance data for instanced rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Model transform matrix (column-major).
    pub transform: [[f32; 4]; 4],
    /// Instance color (RGBA).
    pub color: [f32; 4],
}

impl InstanceData {
    /// Create a new instance with identity transform and white color.
    pub fn new() -> Self {
        Self::with_transform_and_color(glam::Mat4::IDENTITY, [1.0, 1.0, 1.0, 1.0])
    }

    /// Create a new instance with the given transform and color.
    pub fn with_transform_and_color(transform: glam::Mat4, color: [f32; 4]) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color,
        }
    }

    /// Translation part of the transform.
    pub fn translation(&self) -> glam::Vec3 {
        glam::Mat4::from_cols_array_2d(&self.transform)
            .w_axis
            .truncate()
    }

    /// Get the vertex buffer layout for instance data.
    ///
    /// Locations 0 and 1 belong to the per-vertex layout.
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // transform column 0
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // transform column 1
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // transform column 2
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // transform column 3
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU buffer for storing instance data.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    count: u32,
    capacity: u32,
}

impl InstanceBuffer {
    /// Create a new instance buffer from a slice of instance data.
    pub fn new(ctx: &WgpuContext, instances: &[InstanceData], label: Option<&str>) -> Self {
        if instances.is_empty() {
            return Self::with_capacity(ctx, 1, label);
        }

        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(instances),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            buffer,
            count: instances.len() as u32,
            capacity: instances.len() as u32,
        }
    }

    /// Create an empty instance buffer with the given capacity.
    pub fn with_capacity(ctx: &WgpuContext, capacity: u32, label: Option<&str>) -> Self {
        let capacity = capacity.max(1);
        let size = (capacity as usize * std::mem::size_of::<InstanceData>()) as u64;
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            count: 0,
            capacity,
        }
    }

    /// Replace the instance data, reallocating when it outgrows the buffer.
    pub fn write(&mut self, ctx: &WgpuContext, instances: &[InstanceData]) {
        let needed = instances.len() as u32;
        if needed > self.capacity {
            *self = Self::with_capacity(
                ctx,
                needed.next_power_of_two(),
                Some("instance buffer"),
            );
        }

        if !instances.is_empty() {
            ctx.queue
                .write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
        self.count = needed;
    }

    /// Get the number of instances.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Get the buffer capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Slice covering the written instances.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        let used = self.count.max(1) as u64 * std::mem::size_of::<InstanceData>() as u64;
        self.buffer.slice(..used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_data_size() {
        // 16 floats for transform + 4 floats for color = 20 floats * 4 bytes = 80 bytes
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
    }

    #[test]
    fn test_instance_data_default() {
        let instance = InstanceData::new();
        assert_eq!(instance.transform[0][0], 1.0);
        assert_eq!(instance.transform[1][1], 1.0);
        assert_eq!(instance.transform[2][2], 1.0);
        assert_eq!(instance.transform[3][3], 1.0);
        assert_eq!(instance.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_instance_translation() {
        let m = glam::Mat4::from_translation(glam::Vec3::new(3.0, -2.0, 1.0));
        let instance = InstanceData::with_transform_and_color(m, [0.0; 4]);
        assert_eq!(instance.translation(), glam::Vec3::new(3.0, -2.0, 1.0));
    }
}
