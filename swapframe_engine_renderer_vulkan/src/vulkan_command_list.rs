/// VulkanCommandAllocator - command pool reset once per frame
/// VulkanCommandList - one primary command buffer recorded with dynamic rendering
///
/// Render passes are implicit: clearing or drawing begins rendering into
/// the bound render target, a barrier or `close` ends it.

use ash::vk;
use ash::vk::Handle;
use std::any::Any;
use std::sync::Arc;
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{
    CommandAllocator, CommandList, PipelineState, Rect2D, RenderTargetView, TransitionBarrier,
    VertexBuffer, Viewport,
};
use swapframe_engine::engine_err;

use crate::vulkan_buffer::VulkanVertexBuffer;
use crate::vulkan_context::{backend, GpuContext};
use crate::vulkan_format::{barrier_masks, vk_error};
use crate::vulkan_pipeline_state::VulkanPipelineState;

pub struct VulkanCommandAllocator {
    ctx: Arc<GpuContext>,
    pool: vk::CommandPool,
}

impl VulkanCommandAllocator {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Result<Self> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(ctx.graphics_queue_family);
        let pool = unsafe { ctx.device.create_command_pool(&create_info, None) }
            .map_err(|e| engine_err!("swapframe::vulkan", "Failed to create command pool: {:?}", e))?;
        Ok(Self { ctx, pool })
    }
}

impl CommandAllocator for VulkanCommandAllocator {
    fn reset(&mut self) -> Result<()> {
        unsafe {
            self.ctx
                .device
                .reset_command_pool(self.pool, vk::CommandPoolResetFlags::empty())
        }
        .map_err(|e| vk_error("vkResetCommandPool", e))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanCommandAllocator {
    fn drop(&mut self) {
        unsafe { self.ctx.device.destroy_command_pool(self.pool, None) };
    }
}

pub struct VulkanCommandList {
    ctx: Arc<GpuContext>,
    /// Pool the command buffer was allocated from
    pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
    recording: bool,
    /// Inside vkCmdBeginRendering
    rendering: bool,
    render_target: Option<RenderTargetView>,
}

impl VulkanCommandList {
    pub(crate) fn new(ctx: Arc<GpuContext>, allocator: &VulkanCommandAllocator) -> Result<Self> {
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(allocator.pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        let command_buffer = unsafe { ctx.device.allocate_command_buffers(&allocate_info) }
            .map_err(|e| engine_err!("swapframe::vulkan", "Failed to allocate command buffer: {:?}", e))?
            .into_iter()
            .next()
            .ok_or_else(|| engine_err!("swapframe::vulkan", "Driver returned no command buffer"))?;

        Ok(Self {
            ctx,
            pool: allocator.pool,
            command_buffer,
            recording: false,
            rendering: false,
            render_target: None,
        })
    }

    pub(crate) fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    fn ensure_recording(&self, what: &str) -> Result<()> {
        if self.recording {
            Ok(())
        } else {
            Err(Error::InvalidResource(format!("{}: command list is closed", what)))
        }
    }

    fn begin_rendering(&mut self, view: &RenderTargetView, clear_color: Option<[f32; 4]>) {
        let (load_op, clear_value) = match clear_color {
            Some(color) => (
                vk::AttachmentLoadOp::CLEAR,
                vk::ClearValue {
                    color: vk::ClearColorValue { float32: color },
                },
            ),
            None => (vk::AttachmentLoadOp::LOAD, vk::ClearValue::default()),
        };
        let attachments = [vk::RenderingAttachmentInfo::default()
            .image_view(vk::ImageView::from_raw(view.raw))
            .image_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
            .load_op(load_op)
            .store_op(vk::AttachmentStoreOp::STORE)
            .clear_value(clear_value)];
        let rendering_info = vk::RenderingInfo::default()
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: vk::Extent2D { width: view.width, height: view.height },
            })
            .layer_count(1)
            .color_attachments(&attachments);

        unsafe { self.ctx.device.cmd_begin_rendering(self.command_buffer, &rendering_info) };
        self.rendering = true;
    }

    fn end_rendering(&mut self) {
        if self.rendering {
            unsafe { self.ctx.device.cmd_end_rendering(self.command_buffer) };
            self.rendering = false;
        }
    }
}

impl CommandList for VulkanCommandList {
    fn reset(
        &mut self,
        allocator: &dyn CommandAllocator,
        pipeline_state: Option<&dyn PipelineState>,
    ) -> Result<()> {
        if self.recording {
            return Err(Error::InvalidResource("reset() on an open command list".to_string()));
        }
        let allocator = backend::<VulkanCommandAllocator>(allocator.as_any(), "command allocator")?;
        if allocator.pool != self.pool {
            return Err(Error::InvalidResource(
                "command list reset on a different allocator than it was created with".to_string(),
            ));
        }
        let pipeline = pipeline_state
            .map(|pso| backend::<VulkanPipelineState>(pso.as_any(), "pipeline state").map(|p| p.pipeline()))
            .transpose()?;

        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        unsafe {
            self.ctx
                .device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| vk_error("vkBeginCommandBuffer", e))?;
            if let Some(pipeline) = pipeline {
                self.ctx
                    .device
                    .cmd_bind_pipeline(self.command_buffer, vk::PipelineBindPoint::GRAPHICS, pipeline);
            }
        }
        self.recording = true;
        self.rendering = false;
        self.render_target = None;
        Ok(())
    }

    fn resource_barrier(&mut self, barriers: &[TransitionBarrier]) -> Result<()> {
        self.ensure_recording("resource_barrier")?;
        self.end_rendering();

        let mut src_stage = vk::PipelineStageFlags::empty();
        let mut dst_stage = vk::PipelineStageFlags::empty();
        let image_barriers: Vec<vk::ImageMemoryBarrier> = barriers
            .iter()
            .map(|barrier| {
                let masks = barrier_masks(barrier.before, barrier.after);
                src_stage |= masks.src_stage;
                dst_stage |= masks.dst_stage;
                vk::ImageMemoryBarrier::default()
                    .src_access_mask(masks.src_access)
                    .dst_access_mask(masks.dst_access)
                    .old_layout(masks.old_layout)
                    .new_layout(masks.new_layout)
                    .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .image(vk::Image::from_raw(barrier.resource.0))
                    .subresource_range(vk::ImageSubresourceRange {
                        aspect_mask: vk::ImageAspectFlags::COLOR,
                        base_mip_level: 0,
                        level_count: 1,
                        base_array_layer: 0,
                        layer_count: 1,
                    })
            })
            .collect();
        if image_barriers.is_empty() {
            return Ok(());
        }

        unsafe {
            self.ctx.device.cmd_pipeline_barrier(
                self.command_buffer,
                src_stage,
                dst_stage,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &image_barriers,
            );
        }
        Ok(())
    }

    fn set_render_target(&mut self, view: &RenderTargetView) -> Result<()> {
        self.ensure_recording("set_render_target")?;
        self.end_rendering();
        self.render_target = Some(*view);
        Ok(())
    }

    fn clear_render_target(&mut self, view: &RenderTargetView, color: [f32; 4]) -> Result<()> {
        self.ensure_recording("clear_render_target")?;
        self.end_rendering();
        self.begin_rendering(view, Some(color));
        // Later draws in this pass go to the cleared target
        self.render_target = Some(*view);
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.ensure_recording("set_viewport")?;
        let viewports = [vk::Viewport {
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
            min_depth: viewport.min_depth,
            max_depth: viewport.max_depth,
        }];
        unsafe { self.ctx.device.cmd_set_viewport(self.command_buffer, 0, &viewports) };
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.ensure_recording("set_scissor")?;
        let scissors = [vk::Rect2D {
            offset: vk::Offset2D { x: scissor.x, y: scissor.y },
            extent: vk::Extent2D { width: scissor.width, height: scissor.height },
        }];
        unsafe { self.ctx.device.cmd_set_scissor(self.command_buffer, 0, &scissors) };
        Ok(())
    }

    fn set_vertex_buffer(&mut self, buffer: &dyn VertexBuffer) -> Result<()> {
        self.ensure_recording("set_vertex_buffer")?;
        let buffer = backend::<VulkanVertexBuffer>(buffer.as_any(), "vertex buffer")?;
        unsafe {
            self.ctx
                .device
                .cmd_bind_vertex_buffers(self.command_buffer, 0, &[buffer.buffer()], &[0]);
        }
        Ok(())
    }

    fn draw_instanced(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()> {
        self.ensure_recording("draw_instanced")?;
        if !self.rendering {
            let view = self.render_target.ok_or_else(|| {
                Error::InvalidResource("draw_instanced() without a render target".to_string())
            })?;
            self.begin_rendering(&view, None);
        }
        unsafe {
            self.ctx.device.cmd_draw(
                self.command_buffer,
                vertex_count,
                instance_count,
                first_vertex,
                first_instance,
            );
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_recording("close")?;
        self.end_rendering();
        self.recording = false;
        unsafe { self.ctx.device.end_command_buffer(self.command_buffer) }
            .map_err(|e| vk_error("vkEndCommandBuffer", e))
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanCommandList {
    fn drop(&mut self) {
        unsafe {
            self.ctx
                .device
                .free_command_buffers(self.pool, &[self.command_buffer]);
        }
    }
}
