//! GPU upload helpers for uniform blocks (behind the `gpu` feature).
//!
//! Thin wrappers over `wgpu` buffers that keep a host-side block value next
//! to its GPU buffer. The lifetime contract from the crate root applies:
//! a buffer written this frame must not be rewritten until the GPU has
//! finished the draws that reference it, which is what [`UniformRing`]
//! exists for.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

use crate::blocks::UniformBlock;

/// A uniform block paired with the GPU buffer it uploads into.
pub struct UniformBuffer<T: UniformBlock> {
    value: T,
    buffer: wgpu::Buffer,
}

impl<T: UniformBlock> UniformBuffer<T> {
    /// Create the buffer, initialized with the block's default values.
    pub fn new(device: &wgpu::Device) -> Self {
        let value = T::default();
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(T::NAME),
                contents: bytemuck::bytes_of(&value),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        log::debug!("created uniform buffer {} ({} bytes)", T::NAME, T::SIZE);
        Self { value, buffer }
    }

    /// The current host-side value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the host-side value; call
    /// [`upload`](Self::upload) afterwards to make the GPU see the change.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Write the host-side value into the GPU buffer.
    pub fn upload(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&self.value));
    }

    /// The underlying GPU buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Binding resource covering the whole buffer.
    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Bind group layout entry for this block, with the block size as the
    /// minimum binding size so wgpu validates the layout contract too.
    pub fn bind_group_layout_entry(
        binding: u32,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(T::SIZE as u64),
            },
            count: None,
        }
    }
}

/// A ring of per-frame uniform buffers for frames in flight.
///
/// With `frames_in_flight` slots, a slot is rewritten only after that many
/// newer frames have been submitted, so the host never overwrites a buffer
/// the GPU may still be reading.
pub struct UniformRing<T: UniformBlock> {
    buffers: Vec<wgpu::Buffer>,
    cursor: usize,
    _marker: PhantomData<T>,
}

impl<T: UniformBlock> UniformRing<T> {
    /// Create a ring with one buffer per frame in flight.
    pub fn new(device: &wgpu::Device, frames_in_flight: usize) -> Self {
        let slots = frames_in_flight.max(1);
        let buffers = (0..slots)
            .map(|_| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(T::NAME),
                    size: T::SIZE as u64,
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();
        log::debug!(
            "created uniform ring {} ({} slots of {} bytes)",
            T::NAME,
            slots,
            T::SIZE
        );
        Self {
            buffers,
            cursor: 0,
            _marker: PhantomData,
        }
    }

    /// Number of slots in the ring.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the ring has no slots (never true; `new` allocates at least
    /// one).
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Write `value` into the next slot and return that slot's buffer for
    /// this frame's bind group.
    pub fn push(&mut self, queue: &wgpu::Queue, value: &T) -> &wgpu::Buffer {
        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.buffers.len();
        let buffer = &self.buffers[slot];
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(value));
        buffer
    }
}
