/// VulkanCommandQueue - submission and timeline fence signals on the graphics queue

use ash::vk;
use std::any::Any;
use std::sync::Arc;
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{CommandList, CommandQueue, Fence};

use crate::vulkan_command_list::VulkanCommandList;
use crate::vulkan_context::{backend, GpuContext};
use crate::vulkan_fence::VulkanFence;
use crate::vulkan_format::vk_error;

pub struct VulkanCommandQueue {
    ctx: Arc<GpuContext>,
}

impl VulkanCommandQueue {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }
}

impl CommandQueue for VulkanCommandQueue {
    /// Waits on the swap chain's acquire semaphore and signals the
    /// semaphore the next present waits on
    fn execute_command_lists(&self, lists: &[&dyn CommandList]) -> Result<()> {
        let mut command_buffers = Vec::with_capacity(lists.len());
        for list in lists {
            let list = backend::<VulkanCommandList>(list.as_any(), "command list")?;
            if list.is_recording() {
                return Err(Error::InvalidResource("cannot submit an open command list".to_string()));
            }
            command_buffers.push(list.command_buffer());
        }

        let mut state = self.ctx.lock_queue()?;
        let wait_semaphores: Vec<vk::Semaphore> = state.semaphores.acquired.take().into_iter().collect();
        let wait_stages = vec![vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT; wait_semaphores.len()];
        let render_finished = state.semaphores.render_finished.take();
        let signal_semaphores: Vec<vk::Semaphore> = render_finished.into_iter().collect();

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.ctx
                .device
                .queue_submit(state.queue, &[submit_info], vk::Fence::null())
                .map_err(|e| vk_error("vkQueueSubmit", e))?;
        }
        if render_finished.is_some() {
            state.semaphores.ready_to_present = render_finished;
        }
        Ok(())
    }

    fn signal(&self, fence: &dyn Fence, value: u64) -> Result<()> {
        let fence = backend::<VulkanFence>(fence.as_any(), "fence")?;
        let semaphores = [fence.semaphore()];
        let values = [value];
        let mut timeline_info = vk::TimelineSemaphoreSubmitInfo::default().signal_semaphore_values(&values);
        let submit_info = vk::SubmitInfo::default()
            .signal_semaphores(&semaphores)
            .push_next(&mut timeline_info);

        let state = self.ctx.lock_queue()?;
        unsafe {
            self.ctx
                .device
                .queue_submit(state.queue, &[submit_info], vk::Fence::null())
                .map_err(|e| vk_error("vkQueueSubmit (fence signal)", e))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
