/// GraphicsDevice trait - creation of every GPU object the pipeline owns

use std::any::Any;
use crate::error::Result;
use crate::graphics_device::{
    AdapterDesc, CommandAllocator, CommandList, CommandQueue, DescriptorHeap, Fence,
    FenceEvent, PipelineState, PipelineStateDesc, RenderTargetView, SurfaceTarget,
    SwapChain, SwapChainDesc, Vertex, VertexBuffer,
};

/// Logical GPU device
///
/// Implemented by backends (e.g. the Vulkan backend). Objects it creates
/// must be dropped before the device.
pub trait GraphicsDevice: Send + Sync {
    /// Adapter the device was created on
    fn adapter(&self) -> &AdapterDesc;

    /// Create the direct command queue
    fn create_command_queue(&self) -> Result<Box<dyn CommandQueue>>;

    /// Create a swap chain presenting to `target` through `queue`
    fn create_swap_chain(
        &self,
        queue: &dyn CommandQueue,
        target: &SurfaceTarget,
        desc: &SwapChainDesc,
    ) -> Result<Box<dyn SwapChain>>;

    /// Create a descriptor heap with `capacity` render-target view slots
    fn create_descriptor_heap(&self, capacity: u32) -> Result<Box<dyn DescriptorHeap>>;

    /// Write a view of back buffer `buffer_index` into `heap` at `slot`
    fn create_render_target_view(
        &self,
        swap_chain: &dyn SwapChain,
        buffer_index: u32,
        heap: &mut dyn DescriptorHeap,
        slot: u32,
    ) -> Result<RenderTargetView>;

    fn create_command_allocator(&self) -> Result<Box<dyn CommandAllocator>>;

    /// Create a command list on `allocator`, returned closed
    fn create_command_list(
        &self,
        allocator: &dyn CommandAllocator,
        pipeline_state: Option<&dyn PipelineState>,
    ) -> Result<Box<dyn CommandList>>;

    fn create_fence(&self, initial_value: u64) -> Result<Box<dyn Fence>>;

    fn create_fence_event(&self) -> Result<Box<dyn FenceEvent>>;

    fn create_pipeline_state(&self, desc: &PipelineStateDesc) -> Result<Box<dyn PipelineState>>;

    /// Create a vertex buffer and upload `vertices` into it
    fn create_vertex_buffer(&self, vertices: &[Vertex]) -> Result<Box<dyn VertexBuffer>>;

    /// Block until the device has no pending work
    fn wait_idle(&self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}
