/// VulkanDescriptorHeap - fixed set of render-target view slots
///
/// Vulkan has no render-target descriptor heaps; the slots hold the image
/// views and destroy them with the heap.

use ash::vk;
use ash::vk::Handle;
use std::any::Any;
use std::sync::Arc;
use swapframe_engine::swapframe::graphics::DescriptorHeap;

use crate::vulkan_context::GpuContext;

pub struct VulkanDescriptorHeap {
    ctx: Arc<GpuContext>,
    views: Vec<vk::ImageView>,
}

impl VulkanDescriptorHeap {
    pub(crate) fn new(ctx: Arc<GpuContext>, capacity: u32) -> Self {
        Self {
            ctx,
            views: vec![vk::ImageView::null(); capacity as usize],
        }
    }

    /// Put `view` in `slot`, destroying the view it replaces
    pub(crate) fn store(&mut self, slot: u32, view: vk::ImageView) {
        if let Some(previous) = self.views.get_mut(slot as usize) {
            let old = std::mem::replace(previous, view);
            if old != vk::ImageView::null() {
                unsafe { self.ctx.device.destroy_image_view(old, None) };
            }
        }
    }
}

impl DescriptorHeap for VulkanDescriptorHeap {
    fn capacity(&self) -> u32 {
        self.views.len() as u32
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for VulkanDescriptorHeap {
    fn drop(&mut self) {
        unsafe {
            for view in self.views.drain(..) {
                self.ctx.device.destroy_image_view(view, None);
            }
        }
    }
}
