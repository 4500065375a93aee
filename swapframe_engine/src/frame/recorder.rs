/// Frame recorder - builds the command list of one frame

use crate::error::Result;
use crate::frame::transition::BackBuffer;
use crate::graphics_device::{
    CommandAllocator, CommandList, GraphicsDevice, PipelineState, Rect2D, RenderTargetView,
    ResourceId, VertexBuffer, Viewport,
};

/// Back buffer a frame renders into
#[derive(Debug, Clone, Copy)]
pub struct FrameTarget<'a> {
    pub index: u32,
    pub resource: ResourceId,
    pub view: &'a RenderTargetView,
    pub clear_color: [f32; 4],
}

/// Geometry drawn after the clear
pub struct DrawPayload<'a> {
    pub pipeline_state: &'a dyn PipelineState,
    pub vertex_buffer: &'a dyn VertexBuffer,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub viewport: Viewport,
    pub scissor: Rect2D,
}

/// Command allocator and the single reusable command list recorded from it
///
/// The allocator is reset at the start of every frame, which is only legal
/// once the previous submission has retired. The presentation pipeline
/// guarantees that by waiting on the frame synchronizer after each frame.
pub struct FrameRecorder {
    list: Box<dyn CommandList>,
    allocator: Box<dyn CommandAllocator>,
}

impl FrameRecorder {
    /// Create the allocator and its command list (closed)
    pub fn new(device: &dyn GraphicsDevice, pipeline_state: Option<&dyn PipelineState>) -> Result<Self> {
        let allocator = device.create_command_allocator()?;
        let list = device.create_command_list(&*allocator, pipeline_state)?;
        Ok(Self { list, allocator })
    }

    /// Record the frame: transition, clear, optional draw, transition back, close
    pub fn record(&mut self, target: &FrameTarget<'_>, payload: Option<&DrawPayload<'_>>) -> Result<()> {
        self.allocator.reset()?;
        self.list
            .reset(&*self.allocator, payload.map(|p| p.pipeline_state))?;

        let list = &mut *self.list;
        let buffer = BackBuffer::new(target.index, target.resource).begin_render(list)?;

        list.set_render_target(target.view)?;
        list.clear_render_target(target.view, target.clear_color)?;

        if let Some(payload) = payload {
            list.set_viewport(payload.viewport)?;
            list.set_scissor(payload.scissor)?;
            list.set_vertex_buffer(payload.vertex_buffer)?;
            list.draw_instanced(payload.vertex_count, payload.instance_count, 0, 0)?;
        }

        let _presentable = buffer.end_render(list)?;
        list.close()
    }

    /// The command list, closed after a successful `record`
    pub fn command_list(&self) -> &dyn CommandList {
        &*self.list
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
