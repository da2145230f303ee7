//! GPU buffer abstractions
//!
//! Typed wrappers for vertex, index and uniform buffers.

use crate::context::WgpuContext;
use bytemuck::{Pod, Zeroable};
use std::marker::PhantomData;
use wgpu::util::DeviceExt;

/// A GPU buffer containing vertex data.
pub struct VertexBuffer {
    pub(crate) buffer: wgpu::Buffer,
}

impl VertexBuffer {
    /// Create a new vertex buffer from a slice of vertices.
    pub fn new<V: Pod + Zeroable>(ctx: &WgpuContext, vertices: &[V], label: Option<&str>) -> Self {
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Self { buffer }
    }

    /// Create a buffer slice for the entire buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// A GPU buffer containing 16-bit index data.
pub struct IndexBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) count: u32,
}

impl IndexBuffer {
    /// Create a new index buffer from u16 indices.
    pub fn new_u16(ctx: &WgpuContext, indices: &[u16], label: Option<&str>) -> Self {
        // wgpu requires buffer sizes to be a multiple of 4 bytes.
        let mut padded = indices.to_vec();
        if padded.len() % 2 == 1 {
            padded.push(0);
        }
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(&padded),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            buffer,
            count: indices.len() as u32,
        }
    }

    /// Get the number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Get the index format.
    pub fn format(&self) -> wgpu::IndexFormat {
        wgpu::IndexFormat::Uint16
    }

    /// Create a buffer slice for the entire buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// A typed GPU uniform buffer with its own bind group.
pub struct UniformBuffer<T> {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod + Zeroable> UniformBuffer<T> {
    /// Create a new uniform buffer with initial data.
    pub fn new(ctx: &WgpuContext, data: &T, visibility: wgpu::ShaderStages, label: &str) -> Self {
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(data),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} layout", label)),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bind group", label)),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
            _marker: PhantomData,
        }
    }

    /// Update the buffer contents.
    pub fn update(&self, ctx: &WgpuContext, data: &T) {
        ctx.queue
            .write_buffer(&self.buffer, 0, bytemuck::bytes_of(data));
    }

    /// Get the bind group layout.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get the bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Stride between consecutive elements of a dynamic uniform buffer.
pub fn dynamic_stride(element_size: u64, alignment: u64) -> u64 {
    wgpu::util::align_to(element_size, alignment.max(1))
}

/// A uniform buffer holding many `T` slots, one of which is bound per draw
/// through a dynamic offset.
///
/// The buffer grows by doubling and never exceeds the device's maximum
/// buffer size; [`DynamicUniformBuffer::write`] reports how many elements
/// actually fit.
pub struct DynamicUniformBuffer<T> {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u32,
    max_capacity: u32,
    staging: Vec<u8>,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: Pod + Zeroable> DynamicUniformBuffer<T> {
    /// Create a buffer with room for `capacity` elements.
    pub fn new(
        ctx: &WgpuContext,
        capacity: u32,
        visibility: wgpu::ShaderStages,
        label: &str,
    ) -> Self {
        let element_size = std::mem::size_of::<T>() as u64;
        let stride = dynamic_stride(element_size, ctx.uniform_alignment());
        let max_capacity = (ctx.max_buffer_size() / stride).min(u32::MAX as u64) as u32;
        let capacity = capacity.clamp(1, max_capacity.max(1));

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} layout", label)),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(element_size),
                        },
                        count: None,
                    }],
                });

        let (buffer, bind_group) =
            Self::allocate(ctx, &bind_group_layout, capacity, stride, label);

        Self {
            buffer,
            bind_group_layout,
            bind_group,
            stride,
            capacity,
            max_capacity,
            staging: Vec::new(),
            label: label.to_string(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        ctx: &WgpuContext,
        layout: &wgpu::BindGroupLayout,
        capacity: u32,
        stride: u64,
        label: &str,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bind group", label)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    /// Upload `items`, growing the buffer if needed. Returns the number of
    /// elements written, which is less than `items.len()` only when the
    /// device cannot hold them all.
    pub fn write(&mut self, ctx: &WgpuContext, items: &[T]) -> u32 {
        let wanted = items.len().min(u32::MAX as usize) as u32;
        if wanted > self.capacity && self.capacity < self.max_capacity {
            let grown = wanted
                .checked_next_power_of_two()
                .unwrap_or(u32::MAX)
                .min(self.max_capacity);
            tracing::debug!(from = self.capacity, to = grown, "growing {}", self.label);
            let (buffer, bind_group) =
                Self::allocate(ctx, &self.bind_group_layout, grown, self.stride, &self.label);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = grown;
        }

        let count = wanted.min(self.capacity);
        if count == 0 {
            return 0;
        }

        let element_size = std::mem::size_of::<T>();
        self.staging.clear();
        self.staging.resize(count as usize * self.stride as usize, 0);
        for (slot, item) in self
            .staging
            .chunks_exact_mut(self.stride as usize)
            .zip(items.iter())
        {
            slot[..element_size].copy_from_slice(bytemuck::bytes_of(item));
        }
        ctx.queue.write_buffer(&self.buffer, 0, &self.staging);
        count
    }

    /// Dynamic offset of element `index`.
    pub fn offset(&self, index: u32) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    /// Distance in bytes between consecutive elements.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of elements the current allocation holds.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Most elements a write can ever upload on this device.
    pub fn max_capacity(&self) -> u32 {
        self.max_capacity.max(self.capacity)
    }

    /// Get the bind group layout.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get the bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_stride_alignment() {
        assert_eq!(dynamic_stride(64, 256), 256);
        assert_eq!(dynamic_stride(64, 64), 64);
        assert_eq!(dynamic_stride(80, 64), 128);
        assert_eq!(dynamic_stride(300, 256), 512);
    }

    #[test]
    fn test_dynamic_stride_zero_alignment() {
        assert_eq!(dynamic_stride(64, 0), 64);
    }
}
