/// VulkanFence - timeline semaphore used as a monotonic fence
/// VulkanFenceEvent - host wait on a timeline value

use ash::vk;
use std::any::Any;
use std::sync::{Arc, Mutex};
use swapframe_engine::swapframe::Result;
use swapframe_engine::swapframe::graphics::{Fence, FenceEvent};
use swapframe_engine::engine_err;

use crate::vulkan_context::{backend, lock, GpuContext};
use crate::vulkan_format::vk_error;

pub struct VulkanFence {
    ctx: Arc<GpuContext>,
    semaphore: vk::Semaphore,
}

impl VulkanFence {
    pub(crate) fn new(ctx: Arc<GpuContext>, initial_value: u64) -> Result<Self> {
        let mut type_info = vk::SemaphoreTypeCreateInfo::default()
            .semaphore_type(vk::SemaphoreType::TIMELINE)
            .initial_value(initial_value);
        let create_info = vk::SemaphoreCreateInfo::default().push_next(&mut type_info);
        let semaphore = unsafe { ctx.device.create_semaphore(&create_info, None) }
            .map_err(|e| engine_err!("swapframe::vulkan", "Failed to create timeline semaphore: {:?}", e))?;
        Ok(Self { ctx, semaphore })
    }

    pub(crate) fn semaphore(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl Fence for VulkanFence {
    fn completed_value(&self) -> Result<u64> {
        unsafe { self.ctx.device.get_semaphore_counter_value(self.semaphore) }
            .map_err(|e| vk_error("vkGetSemaphoreCounterValue", e))
    }

    fn set_event_on_completion(&self, value: u64, event: &dyn FenceEvent) -> Result<()> {
        let event = backend::<VulkanFenceEvent>(event.as_any(), "fence event")?;
        *lock(&event.armed, "fence event")? = Some((self.semaphore, value));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanFence {
    fn drop(&mut self) {
        unsafe { self.ctx.device.destroy_semaphore(self.semaphore, None) };
    }
}

pub struct VulkanFenceEvent {
    ctx: Arc<GpuContext>,
    /// Semaphore and value of the pending wait
    armed: Mutex<Option<(vk::Semaphore, u64)>>,
}

impl VulkanFenceEvent {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self {
            ctx,
            armed: Mutex::new(None),
        }
    }
}

impl FenceEvent for VulkanFenceEvent {
    fn wait(&self) -> Result<()> {
        let armed = lock(&self.armed, "fence event")?.take();
        let Some((semaphore, value)) = armed else {
            return Ok(());
        };
        let semaphores = [semaphore];
        let values = [value];
        let wait_info = vk::SemaphoreWaitInfo::default()
            .semaphores(&semaphores)
            .values(&values);
        unsafe { self.ctx.device.wait_semaphores(&wait_info, u64::MAX) }
            .map_err(|e| vk_error("vkWaitSemaphores", e))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
