/// Command allocator and command list traits - per-frame command recording

use std::any::Any;
use crate::error::Result;
use crate::graphics_device::{PipelineState, RenderTargetView, TransitionBarrier, VertexBuffer};

/// Viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Viewport covering a whole `width` x `height` target
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 2D rectangle (scissor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Backing memory for command lists
///
/// Must not be reset while the GPU still executes a list recorded from it.
pub trait CommandAllocator: Send + Sync {
    /// Reclaim the memory of every list recorded from this allocator
    fn reset(&mut self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

/// Reusable single-writer command list
///
/// Lifecycle: `reset` opens it, commands are recorded, `close` seals it for
/// submission. Lists are created closed.
pub trait CommandList: Send + Sync {
    /// Reopen the list on `allocator`, optionally binding an initial pipeline state
    fn reset(
        &mut self,
        allocator: &dyn CommandAllocator,
        pipeline_state: Option<&dyn PipelineState>,
    ) -> Result<()>;

    /// Record resource state transitions
    fn resource_barrier(&mut self, barriers: &[TransitionBarrier]) -> Result<()>;

    /// Bind the render target used by later clear and draw commands
    fn set_render_target(&mut self, view: &RenderTargetView) -> Result<()>;

    /// Clear a render target to `color`
    fn clear_render_target(&mut self, view: &RenderTargetView, color: [f32; 4]) -> Result<()>;

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Bind the vertex buffer at slot 0
    fn set_vertex_buffer(&mut self, buffer: &dyn VertexBuffer) -> Result<()>;

    /// Draw non-indexed, instanced primitives
    fn draw_instanced(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()>;

    /// Seal the list for submission
    fn close(&mut self) -> Result<()>;

    /// Whether the list is open for recording
    fn is_recording(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}
