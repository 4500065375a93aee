/// VulkanVertexBuffer - host-visible vertex buffer filled at creation

use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::any::Any;
use std::sync::Arc;
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{Vertex, VertexBuffer};
use swapframe_engine::{engine_err, engine_error};

use crate::vulkan_context::{lock, GpuContext};

pub struct VulkanVertexBuffer {
    ctx: Arc<GpuContext>,
    buffer: vk::Buffer,
    allocation: Option<Allocation>,
    vertex_count: u32,
}

impl VulkanVertexBuffer {
    pub(crate) fn new(ctx: Arc<GpuContext>, vertices: &[Vertex]) -> Result<Self> {
        if vertices.is_empty() {
            return Err(Error::InvalidResource("vertex buffer needs at least one vertex".to_string()));
        }
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let size = bytes.len() as u64;

        let buffer_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(vk::BufferUsageFlags::VERTEX_BUFFER)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let buffer = unsafe { ctx.device.create_buffer(&buffer_info, None) }.map_err(|e| {
            engine_err!("swapframe::vulkan", "Failed to create vertex buffer of {} bytes: {:?}", size, e)
        })?;

        // Drop releases the buffer (and the allocation once set) on any error below
        let mut vertex_buffer = Self {
            ctx,
            buffer,
            allocation: None,
            vertex_count: vertices.len() as u32,
        };

        let requirements = unsafe { vertex_buffer.ctx.device.get_buffer_memory_requirements(buffer) };
        let allocation = lock(&vertex_buffer.ctx.allocator, "allocator")?
            .allocate(&AllocationCreateDesc {
                name: "vertex buffer",
                requirements,
                location: MemoryLocation::CpuToGpu,
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })
            .map_err(|e| {
                engine_error!("swapframe::vulkan", "Out of GPU memory for vertex buffer ({} bytes): {:?}",
                    requirements.size, e);
                Error::OutOfMemory
            })?;
        let allocation = vertex_buffer.allocation.insert(allocation);

        unsafe {
            vertex_buffer
                .ctx
                .device
                .bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
        }
        .map_err(|e| engine_err!("swapframe::vulkan", "Failed to bind vertex buffer memory: {:?}", e))?;

        let mapped = allocation
            .mapped_slice_mut()
            .ok_or_else(|| engine_err!("swapframe::vulkan", "Vertex buffer memory is not host-visible"))?;
        mapped[..bytes.len()].copy_from_slice(bytes);

        Ok(vertex_buffer)
    }

    pub(crate) fn buffer(&self) -> vk::Buffer {
        self.buffer
    }
}

impl VertexBuffer for VulkanVertexBuffer {
    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanVertexBuffer {
    fn drop(&mut self) {
        unsafe {
            if let Some(allocation) = self.allocation.take() {
                // Don't panic if the lock is poisoned, the buffer still has to go
                if let Ok(mut allocator) = self.ctx.allocator.lock() {
                    allocator.free(allocation).ok();
                }
            }
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
