/// Mock graphics backend for unit tests (no GPU required)
///
/// Every mock object shares one `MockGpu` journal. The simulated GPU runs
/// lazily: submitted work stays in flight until a fence event wait (or
/// `retire_all`) lets it retire, so tests can observe what the CPU side
/// does while the GPU is still busy.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::error::{Error, Result};
use crate::graphics_device::{
    AdapterDesc, AdapterKind, CommandAllocator, CommandList, CommandQueue, DescriptorHeap,
    FeatureLevel, Fence, FenceEvent, GpuPreference, GraphicsDevice, GraphicsFactory,
    PipelineState, PipelineStateDesc, Rect2D, RenderTargetView, ResourceId, SurfaceTarget,
    SwapChain, SwapChainDesc, TextureFormat, TransitionBarrier, Vertex, VertexBuffer, Viewport,
};

// ============================================================================
// Shared journal
// ============================================================================

/// A command recorded into a mock command list
#[derive(Debug, Clone, PartialEq)]
pub enum MockCommand {
    SetPipelineState,
    Barrier(TransitionBarrier),
    SetRenderTarget { slot: u32 },
    Clear { slot: u32, color: [f32; 4] },
    SetViewport(Viewport),
    SetScissor(Rect2D),
    SetVertexBuffer { vertex_count: u32 },
    Draw { vertex_count: u32, instance_count: u32 },
}

/// State of the simulated GPU and everything the tests want to inspect
#[derive(Debug, Default)]
pub struct MockGpuState {
    /// Adapters in enumeration order, with their feature-level support
    pub adapters: Vec<(AdapterDesc, bool)>,
    pub warp: Option<AdapterDesc>,
    pub last_preference: Option<GpuPreference>,
    /// Adapter indices probed by `check_feature_level`
    pub probed: Vec<u32>,
    pub devices_created: Vec<AdapterDesc>,
    /// Name of the next operation that must fail
    pub fail_on: Option<&'static str>,

    /// Command lists executed, in submission order
    pub submitted: Vec<Vec<MockCommand>>,
    /// Executed lists not yet retired
    pub in_flight: usize,
    pending_signals: Vec<u64>,
    pub completed: u64,
    pub signals: Vec<u64>,
    armed: Option<u64>,
    pub armed_waits: u32,
    /// Retire every signal immediately (GPU faster than the CPU)
    pub auto_retire: bool,

    pub allocator_resets: u32,
    pub swap_chain_desc: Option<SwapChainDesc>,
    /// Smallest image count the simulated surface accepts
    pub min_image_count: u32,
    pub swap_index: u32,
    pub presents: Vec<(u32, u32)>,
    pub views_created: u32,
    pub pipeline_states: Vec<PipelineStateDesc>,
    pub vertex_uploads: Vec<Vec<Vertex>>,
    pub wait_idle_calls: u32,
    /// Objects in the order they were dropped
    pub released: Vec<&'static str>,
}

impl MockGpuState {
    fn retire_all(&mut self) {
        if let Some(max) = self.pending_signals.iter().copied().max() {
            self.completed = self.completed.max(max);
        }
        self.pending_signals.clear();
        self.in_flight = 0;
    }
}

/// Handle on the shared journal
#[derive(Debug, Clone, Default)]
pub struct MockGpu {
    state: Arc<Mutex<MockGpuState>>,
}

impl MockGpu {
    /// One discrete adapter supporting the required level
    pub fn new() -> Self {
        Self::with_adapters(vec![(mock_adapter(0, "Mock Discrete GPU", AdapterKind::Discrete), true)])
    }

    pub fn with_adapters(adapters: Vec<(AdapterDesc, bool)>) -> Self {
        let gpu = Self::default();
        {
            let mut state = gpu.state();
            state.adapters = adapters;
            state.warp = Some(mock_adapter(99, "Mock WARP", AdapterKind::Software));
        }
        gpu
    }

    pub fn state(&self) -> MutexGuard<'_, MockGpuState> {
        self.state.lock().unwrap()
    }

    /// Make the next call of operation `name` fail
    pub fn fail_on(&self, name: &'static str) {
        self.state().fail_on = Some(name);
    }

    pub fn retire_all(&self) {
        self.state().retire_all();
    }

    pub fn factory(&self) -> MockFactory {
        MockFactory { gpu: self.clone() }
    }

    fn check(&self, name: &'static str) -> Result<()> {
        let mut state = self.state();
        if state.fail_on == Some(name) {
            state.fail_on = None;
            return Err(Error::BackendError(format!("mock failure in {}", name)));
        }
        Ok(())
    }

    fn release(&self, name: &'static str) {
        if let Ok(mut state) = self.state.lock() {
            state.released.push(name);
        }
    }
}

pub fn mock_adapter(index: u32, name: &str, kind: AdapterKind) -> AdapterDesc {
    AdapterDesc {
        index,
        name: name.to_string(),
        kind,
        dedicated_video_memory: if kind == AdapterKind::Discrete { 8 << 30 } else { 0 },
    }
}

// ============================================================================
// Factory and device
// ============================================================================

pub struct MockFactory {
    gpu: MockGpu,
}

impl GraphicsFactory for MockFactory {
    fn enumerate_adapters(&self, preference: GpuPreference) -> Result<Vec<AdapterDesc>> {
        self.gpu.check("enumerate_adapters")?;
        let mut state = self.gpu.state();
        state.last_preference = Some(preference);
        let mut adapters: Vec<AdapterDesc> = state.adapters.iter().map(|(a, _)| a.clone()).collect();
        if preference == GpuPreference::HighPerformance {
            adapters.sort_by_key(|a| a.kind != AdapterKind::Discrete);
        }
        Ok(adapters)
    }

    fn check_feature_level(&self, adapter: &AdapterDesc, level: FeatureLevel) -> bool {
        let mut state = self.gpu.state();
        state.probed.push(adapter.index);
        level <= FeatureLevel::REQUIRED
            && state
                .adapters
                .iter()
                .any(|(a, supported)| a.index == adapter.index && *supported)
    }

    fn warp_adapter(&self) -> Result<AdapterDesc> {
        self.gpu
            .state()
            .warp
            .clone()
            .ok_or(Error::NoSuitableAdapter)
    }

    fn create_device(&self, adapter: &AdapterDesc, _level: FeatureLevel) -> Result<Box<dyn GraphicsDevice>> {
        self.gpu.check("create_device")?;
        self.gpu.state().devices_created.push(adapter.clone());
        Ok(Box::new(MockDevice {
            gpu: self.gpu.clone(),
            adapter: adapter.clone(),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockDevice {
    gpu: MockGpu,
    adapter: AdapterDesc,
}

impl GraphicsDevice for MockDevice {
    fn adapter(&self) -> &AdapterDesc {
        &self.adapter
    }

    fn create_command_queue(&self) -> Result<Box<dyn CommandQueue>> {
        self.gpu.check("create_command_queue")?;
        Ok(Box::new(MockQueue { gpu: self.gpu.clone() }))
    }

    fn create_swap_chain(
        &self,
        queue: &dyn CommandQueue,
        target: &SurfaceTarget,
        desc: &SwapChainDesc,
    ) -> Result<Box<dyn SwapChain>> {
        self.gpu.check("create_swap_chain")?;
        if queue.as_any().downcast_ref::<MockQueue>().is_none() {
            return Err(Error::InvalidResource("queue is not a mock queue".to_string()));
        }
        if (target.width, target.height) != (desc.width, desc.height) {
            return Err(Error::InvalidResource("swap chain size differs from window".to_string()));
        }
        let mut created = *desc;
        {
            let mut state = self.gpu.state();
            state.swap_chain_desc = Some(*desc);
            created.buffer_count = created.buffer_count.max(state.min_image_count);
        }
        Ok(Box::new(MockSwapChain {
            gpu: self.gpu.clone(),
            desc: created,
        }))
    }

    fn create_descriptor_heap(&self, capacity: u32) -> Result<Box<dyn DescriptorHeap>> {
        self.gpu.check("create_descriptor_heap")?;
        Ok(Box::new(MockDescriptorHeap {
            gpu: self.gpu.clone(),
            slots: vec![None; capacity as usize],
        }))
    }

    fn create_render_target_view(
        &self,
        swap_chain: &dyn SwapChain,
        buffer_index: u32,
        heap: &mut dyn DescriptorHeap,
        slot: u32,
    ) -> Result<RenderTargetView> {
        self.gpu.check("create_render_target_view")?;
        let resource = swap_chain.back_buffer(buffer_index)?;
        let heap = heap
            .as_any_mut()
            .downcast_mut::<MockDescriptorHeap>()
            .ok_or_else(|| Error::InvalidResource("heap is not a mock heap".to_string()))?;
        let entry = heap
            .slots
            .get_mut(slot as usize)
            .ok_or_else(|| Error::InvalidResource(format!("heap slot {} out of range", slot)))?;
        let view = RenderTargetView {
            slot,
            resource,
            raw: 0x2000 + slot as u64,
            width: swap_chain.width(),
            height: swap_chain.height(),
            format: swap_chain.format(),
        };
        *entry = Some(view);
        self.gpu.state().views_created += 1;
        Ok(view)
    }

    fn create_command_allocator(&self) -> Result<Box<dyn CommandAllocator>> {
        self.gpu.check("create_command_allocator")?;
        Ok(Box::new(MockAllocator { gpu: self.gpu.clone() }))
    }

    fn create_command_list(
        &self,
        _allocator: &dyn CommandAllocator,
        _pipeline_state: Option<&dyn PipelineState>,
    ) -> Result<Box<dyn CommandList>> {
        self.gpu.check("create_command_list")?;
        Ok(Box::new(MockCommandList {
            gpu: self.gpu.clone(),
            recording: false,
            commands: Vec::new(),
        }))
    }

    fn create_fence(&self, initial_value: u64) -> Result<Box<dyn Fence>> {
        self.gpu.check("create_fence")?;
        self.gpu.state().completed = initial_value;
        Ok(Box::new(MockFence { gpu: self.gpu.clone() }))
    }

    fn create_fence_event(&self) -> Result<Box<dyn FenceEvent>> {
        self.gpu.check("create_fence_event")?;
        Ok(Box::new(MockFenceEvent { gpu: self.gpu.clone() }))
    }

    fn create_pipeline_state(&self, desc: &PipelineStateDesc) -> Result<Box<dyn PipelineState>> {
        self.gpu.check("create_pipeline_state")?;
        self.gpu.state().pipeline_states.push(desc.clone());
        Ok(Box::new(MockPipelineState { gpu: self.gpu.clone() }))
    }

    fn create_vertex_buffer(&self, vertices: &[Vertex]) -> Result<Box<dyn VertexBuffer>> {
        self.gpu.check("create_vertex_buffer")?;
        self.gpu.state().vertex_uploads.push(vertices.to_vec());
        Ok(Box::new(MockVertexBuffer {
            gpu: self.gpu.clone(),
            vertex_count: vertices.len() as u32,
        }))
    }

    fn wait_idle(&self) -> Result<()> {
        let mut state = self.gpu.state();
        state.wait_idle_calls += 1;
        state.retire_all();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.gpu.release("device");
    }
}

// ============================================================================
// Queue, swap chain, heap
// ============================================================================

pub struct MockQueue {
    gpu: MockGpu,
}

impl CommandQueue for MockQueue {
    fn execute_command_lists(&self, lists: &[&dyn CommandList]) -> Result<()> {
        self.gpu.check("execute_command_lists")?;
        let mut recorded = Vec::with_capacity(lists.len());
        for list in lists {
            let list = list
                .as_any()
                .downcast_ref::<MockCommandList>()
                .ok_or_else(|| Error::InvalidResource("not a mock command list".to_string()))?;
            if list.recording {
                return Err(Error::InvalidResource("command list submitted while open".to_string()));
            }
            recorded.push(list.commands.clone());
        }
        let mut state = self.gpu.state();
        state.in_flight += recorded.len();
        state.submitted.extend(recorded);
        Ok(())
    }

    fn signal(&self, fence: &dyn Fence, value: u64) -> Result<()> {
        self.gpu.check("signal")?;
        if fence.as_any().downcast_ref::<MockFence>().is_none() {
            return Err(Error::InvalidResource("not a mock fence".to_string()));
        }
        let mut state = self.gpu.state();
        state.signals.push(value);
        state.pending_signals.push(value);
        if state.auto_retire {
            state.retire_all();
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockQueue {
    fn drop(&mut self) {
        self.gpu.release("queue");
    }
}

pub struct MockSwapChain {
    gpu: MockGpu,
    desc: SwapChainDesc,
}

impl SwapChain for MockSwapChain {
    fn buffer_count(&self) -> u32 {
        self.desc.buffer_count
    }

    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn format(&self) -> TextureFormat {
        self.desc.format
    }

    fn current_back_buffer_index(&mut self) -> Result<u32> {
        Ok(self.gpu.state().swap_index)
    }

    fn back_buffer(&self, index: u32) -> Result<ResourceId> {
        if index >= self.desc.buffer_count {
            return Err(Error::InvalidResource(format!("back buffer {} out of range", index)));
        }
        Ok(ResourceId(0x100 + index as u64))
    }

    fn present(&mut self, sync_interval: u32) -> Result<()> {
        self.gpu.check("present")?;
        let mut state = self.gpu.state();
        let index = state.swap_index;
        state.presents.push((index, sync_interval));
        state.swap_index = (index + 1) % self.desc.buffer_count;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockSwapChain {
    fn drop(&mut self) {
        self.gpu.release("swap_chain");
    }
}

pub struct MockDescriptorHeap {
    gpu: MockGpu,
    pub slots: Vec<Option<RenderTargetView>>,
}

impl DescriptorHeap for MockDescriptorHeap {
    fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for MockDescriptorHeap {
    fn drop(&mut self) {
        self.gpu.release("descriptor_heap");
    }
}

// ============================================================================
// Recording
// ============================================================================

pub struct MockAllocator {
    gpu: MockGpu,
}

impl CommandAllocator for MockAllocator {
    fn reset(&mut self) -> Result<()> {
        self.gpu.check("allocator_reset")?;
        let mut state = self.gpu.state();
        if state.in_flight > 0 {
            return Err(Error::InvalidResource(
                "command allocator reset while the GPU still executes its lists".to_string(),
            ));
        }
        state.allocator_resets += 1;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockAllocator {
    fn drop(&mut self) {
        self.gpu.release("allocator");
    }
}

pub struct MockCommandList {
    gpu: MockGpu,
    recording: bool,
    pub commands: Vec<MockCommand>,
}

impl MockCommandList {
    fn push(&mut self, command: MockCommand) -> Result<()> {
        if !self.recording {
            return Err(Error::InvalidResource("command list is closed".to_string()));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn reset(
        &mut self,
        allocator: &dyn CommandAllocator,
        pipeline_state: Option<&dyn PipelineState>,
    ) -> Result<()> {
        if self.recording {
            return Err(Error::InvalidResource("command list reset while open".to_string()));
        }
        if allocator.as_any().downcast_ref::<MockAllocator>().is_none() {
            return Err(Error::InvalidResource("not a mock allocator".to_string()));
        }
        self.recording = true;
        self.commands.clear();
        if pipeline_state.is_some() {
            self.commands.push(MockCommand::SetPipelineState);
        }
        Ok(())
    }

    fn resource_barrier(&mut self, barriers: &[TransitionBarrier]) -> Result<()> {
        for barrier in barriers {
            self.push(MockCommand::Barrier(*barrier))?;
        }
        Ok(())
    }

    fn set_render_target(&mut self, view: &RenderTargetView) -> Result<()> {
        self.push(MockCommand::SetRenderTarget { slot: view.slot })
    }

    fn clear_render_target(&mut self, view: &RenderTargetView, color: [f32; 4]) -> Result<()> {
        self.push(MockCommand::Clear { slot: view.slot, color })
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.push(MockCommand::SetViewport(viewport))
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.push(MockCommand::SetScissor(scissor))
    }

    fn set_vertex_buffer(&mut self, buffer: &dyn VertexBuffer) -> Result<()> {
        self.push(MockCommand::SetVertexBuffer { vertex_count: buffer.vertex_count() })
    }

    fn draw_instanced(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        _first_vertex: u32,
        _first_instance: u32,
    ) -> Result<()> {
        self.push(MockCommand::Draw { vertex_count, instance_count })
    }

    fn close(&mut self) -> Result<()> {
        self.gpu.check("close")?;
        if !self.recording {
            return Err(Error::InvalidResource("command list closed twice".to_string()));
        }
        self.recording = false;
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockCommandList {
    fn drop(&mut self) {
        self.gpu.release("command_list");
    }
}

// ============================================================================
// Synchronization
// ============================================================================

pub struct MockFence {
    gpu: MockGpu,
}

impl Fence for MockFence {
    fn completed_value(&self) -> Result<u64> {
        Ok(self.gpu.state().completed)
    }

    fn set_event_on_completion(&self, value: u64, event: &dyn FenceEvent) -> Result<()> {
        if event.as_any().downcast_ref::<MockFenceEvent>().is_none() {
            return Err(Error::InvalidResource("not a mock fence event".to_string()));
        }
        self.gpu.state().armed = Some(value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockFence {
    fn drop(&mut self) {
        self.gpu.release("fence");
    }
}

pub struct MockFenceEvent {
    gpu: MockGpu,
}

impl FenceEvent for MockFenceEvent {
    fn wait(&self) -> Result<()> {
        self.gpu.check("wait")?;
        let mut state = self.gpu.state();
        if let Some(value) = state.armed.take() {
            // Blocking stands for letting the GPU run until the value is reached
            if state.completed < value {
                state.retire_all();
            }
            state.armed_waits += 1;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockFenceEvent {
    fn drop(&mut self) {
        self.gpu.release("fence_event");
    }
}

// ============================================================================
// Content objects
// ============================================================================

pub struct MockPipelineState {
    gpu: MockGpu,
}

impl PipelineState for MockPipelineState {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockPipelineState {
    fn drop(&mut self) {
        self.gpu.release("pipeline_state");
    }
}

pub struct MockVertexBuffer {
    gpu: MockGpu,
    vertex_count: u32,
}

impl VertexBuffer for MockVertexBuffer {
    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockVertexBuffer {
    fn drop(&mut self) {
        self.gpu.release("vertex_buffer");
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
