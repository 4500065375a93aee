/// VulkanDevice - Vulkan implementation of GraphicsDevice

use ash::vk;
use ash::vk::Handle;
use std::any::Any;
use std::sync::Arc;
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{
    AdapterDesc, CommandAllocator, CommandList, CommandQueue, DescriptorHeap, Fence, FenceEvent,
    GraphicsDevice, PipelineState, PipelineStateDesc, RenderTargetView, ResourceId,
    SurfaceTarget, SwapChain, SwapChainDesc, Vertex, VertexBuffer,
};
use swapframe_engine::engine_err;

use crate::vulkan_buffer::VulkanVertexBuffer;
use crate::vulkan_command_list::{VulkanCommandAllocator, VulkanCommandList};
use crate::vulkan_command_queue::VulkanCommandQueue;
use crate::vulkan_context::{backend, GpuContext};
use crate::vulkan_descriptor_heap::VulkanDescriptorHeap;
use crate::vulkan_fence::{VulkanFence, VulkanFenceEvent};
use crate::vulkan_format::vk_error;
use crate::vulkan_pipeline_state::VulkanPipelineState;
use crate::vulkan_swap_chain::VulkanSwapChain;

/// Logical device on one adapter
pub struct VulkanDevice {
    adapter: AdapterDesc,
    ctx: Arc<GpuContext>,
}

impl VulkanDevice {
    pub(crate) fn new(adapter: AdapterDesc, ctx: Arc<GpuContext>) -> Self {
        Self { adapter, ctx }
    }
}

impl GraphicsDevice for VulkanDevice {
    fn adapter(&self) -> &AdapterDesc {
        &self.adapter
    }

    fn create_command_queue(&self) -> Result<Box<dyn CommandQueue>> {
        Ok(Box::new(VulkanCommandQueue::new(Arc::clone(&self.ctx))))
    }

    fn create_swap_chain(
        &self,
        queue: &dyn CommandQueue,
        target: &SurfaceTarget,
        desc: &SwapChainDesc,
    ) -> Result<Box<dyn SwapChain>> {
        // Presentation goes through the device's single graphics queue
        backend::<VulkanCommandQueue>(queue.as_any(), "command queue")?;
        Ok(Box::new(VulkanSwapChain::new(Arc::clone(&self.ctx), target, desc)?))
    }

    fn create_descriptor_heap(&self, capacity: u32) -> Result<Box<dyn DescriptorHeap>> {
        if capacity == 0 {
            return Err(Error::InvalidResource("descriptor heap capacity must be at least 1".to_string()));
        }
        Ok(Box::new(VulkanDescriptorHeap::new(Arc::clone(&self.ctx), capacity)))
    }

    fn create_render_target_view(
        &self,
        swap_chain: &dyn SwapChain,
        buffer_index: u32,
        heap: &mut dyn DescriptorHeap,
        slot: u32,
    ) -> Result<RenderTargetView> {
        let swap_chain = backend::<VulkanSwapChain>(swap_chain.as_any(), "swap chain")?;
        let heap = heap
            .as_any_mut()
            .downcast_mut::<VulkanDescriptorHeap>()
            .ok_or_else(|| Error::InvalidResource("descriptor heap was not created by the Vulkan backend".to_string()))?;
        if slot >= heap.capacity() {
            return Err(Error::InvalidResource(format!(
                "descriptor slot {} out of range (capacity {})",
                slot,
                heap.capacity()
            )));
        }

        let image = swap_chain.image(buffer_index)?;
        let view_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(swap_chain.vk_format())
            .components(vk::ComponentMapping::default())
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });
        let view = unsafe { self.ctx.device.create_image_view(&view_info, None) }.map_err(|e| {
            engine_err!("swapframe::vulkan", "Failed to create view of back buffer {}: {:?}", buffer_index, e)
        })?;
        heap.store(slot, view);

        Ok(RenderTargetView {
            slot,
            resource: ResourceId(image.as_raw()),
            raw: view.as_raw(),
            width: swap_chain.width(),
            height: swap_chain.height(),
            format: swap_chain.format(),
        })
    }

    fn create_command_allocator(&self) -> Result<Box<dyn CommandAllocator>> {
        Ok(Box::new(VulkanCommandAllocator::new(Arc::clone(&self.ctx))?))
    }

    fn create_command_list(
        &self,
        allocator: &dyn CommandAllocator,
        _pipeline_state: Option<&dyn PipelineState>,
    ) -> Result<Box<dyn CommandList>> {
        // The pipeline state is bound on each reset; a new list starts closed
        let allocator = backend::<VulkanCommandAllocator>(allocator.as_any(), "command allocator")?;
        Ok(Box::new(VulkanCommandList::new(Arc::clone(&self.ctx), allocator)?))
    }

    fn create_fence(&self, initial_value: u64) -> Result<Box<dyn Fence>> {
        Ok(Box::new(VulkanFence::new(Arc::clone(&self.ctx), initial_value)?))
    }

    fn create_fence_event(&self) -> Result<Box<dyn FenceEvent>> {
        Ok(Box::new(VulkanFenceEvent::new(Arc::clone(&self.ctx))))
    }

    fn create_pipeline_state(&self, desc: &PipelineStateDesc) -> Result<Box<dyn PipelineState>> {
        Ok(Box::new(VulkanPipelineState::new(Arc::clone(&self.ctx), desc)?))
    }

    fn create_vertex_buffer(&self, vertices: &[Vertex]) -> Result<Box<dyn VertexBuffer>> {
        Ok(Box::new(VulkanVertexBuffer::new(Arc::clone(&self.ctx), vertices)?))
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe { self.ctx.device.device_wait_idle() }.map_err(|e| vk_error("vkDeviceWaitIdle", e))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
