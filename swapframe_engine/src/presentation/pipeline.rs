/// Presentation pipeline - device, queue, swap chain and the per-frame loop body

use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::{DrawPayload, FrameRecorder, FrameSynchronizer, FrameTarget};
use crate::graphics_device::{
    AdapterDesc, CommandQueue, DescriptorHeap, FeatureLevel, GraphicsDevice, GraphicsFactory,
    PipelineState, PipelineStateDesc, Rect2D, RenderTargetView, SurfaceTarget, SwapChain,
    SwapChainDesc, TextureFormat, VertexBuffer, Viewport, FRAME_COUNT,
};
use crate::presentation::adapter_selector::select_adapter;
use crate::presentation::content::ContentProvider;
use crate::surface::Surface;
use crate::{engine_error, engine_info, engine_warn};

/// Sync interval used by `present` (one vertical blank)
const PRESENT_SYNC_INTERVAL: u32 = 1;

/// Pipeline state and vertex buffer created from the content provider
struct LoadedContent {
    pipeline_state: Box<dyn PipelineState>,
    vertex_buffer: Box<dyn VertexBuffer>,
}

/// Every GPU object the pipeline owns
///
/// Fields drop in declaration order: content and recording objects first,
/// the device last.
struct GpuObjects {
    content: Option<LoadedContent>,
    recorder: FrameRecorder,
    synchronizer: FrameSynchronizer,
    render_targets: Vec<RenderTargetView>,
    rtv_heap: Box<dyn DescriptorHeap>,
    swap_chain: Box<dyn SwapChain>,
    queue: Box<dyn CommandQueue>,
    device: Box<dyn GraphicsDevice>,
}

/// Objects created by `load_pipeline`, before any content exists
struct PipelineCore {
    frame_index: u32,
    render_targets: Vec<RenderTargetView>,
    rtv_heap: Box<dyn DescriptorHeap>,
    swap_chain: Box<dyn SwapChain>,
    queue: Box<dyn CommandQueue>,
    device: Box<dyn GraphicsDevice>,
}

/// Owner of the GPU device and everything presented through it
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::swapframe::{Config, Result};
/// # use swapframe_engine::swapframe::graphics::GraphicsFactory;
/// # use swapframe_engine::swapframe::presentation::{NoContent, PresentationPipeline};
/// # use swapframe_engine::swapframe::surface::Surface;
/// # fn demo(config: &Config, factory: Box<dyn GraphicsFactory>, surface: &Surface) -> Result<()> {
/// let mut pipeline = PresentationPipeline::new(config, factory, Box::new(NoContent));
/// pipeline.initialize(surface)?;
/// pipeline.render()?;
/// pipeline.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct PresentationPipeline {
    gpu: Option<GpuObjects>,
    frame_index: u32,
    use_warp_device: bool,
    high_performance_adapter: bool,
    clear_color: [f32; 4],
    content: Box<dyn ContentProvider>,
    /// Dropped after the device
    factory: Box<dyn GraphicsFactory>,
}

impl PresentationPipeline {
    pub fn new(config: &Config, factory: Box<dyn GraphicsFactory>, content: Box<dyn ContentProvider>) -> Self {
        Self {
            gpu: None,
            frame_index: 0,
            use_warp_device: config.use_warp_device,
            high_performance_adapter: config.high_performance_adapter,
            clear_color: config.clear_color,
            content,
            factory,
        }
    }

    /// Create every GPU object for `surface`
    ///
    /// Any failure is fatal: objects created so far are released and the
    /// error is returned.
    pub fn initialize(&mut self, surface: &Surface) -> Result<()> {
        if self.gpu.is_some() {
            engine_warn!("swapframe::PresentationPipeline", "initialize() unexpectedly called multiple times");
            return Ok(());
        }

        let target = surface.target()?;
        let core = self.load_pipeline(&target)?;
        let frame_index = core.frame_index;
        let gpu = self.load_assets(core)?;
        self.frame_index = frame_index;

        engine_info!(
            "swapframe::PresentationPipeline",
            "Pipeline initialized on '{}' ({}x{}, {} buffers, frame index {})",
            gpu.device.adapter().name,
            gpu.swap_chain.width(),
            gpu.swap_chain.height(),
            gpu.render_targets.len(),
            self.frame_index
        );
        self.gpu = Some(gpu);
        Ok(())
    }

    fn load_pipeline(&self, target: &SurfaceTarget) -> Result<PipelineCore> {
        let adapter = if self.use_warp_device {
            let adapter = self.factory.warp_adapter()?;
            engine_info!("swapframe::PresentationPipeline", "Using software adapter '{}'", adapter.name);
            adapter
        } else {
            select_adapter(&*self.factory, self.high_performance_adapter, false)?
        };

        let device = self.factory.create_device(&adapter, FeatureLevel::REQUIRED).map_err(|e| {
            engine_error!("swapframe::PresentationPipeline", "Device creation failed on '{}': {}", adapter.name, e);
            e
        })?;
        let queue = device.create_command_queue()?;

        let desc = SwapChainDesc {
            buffer_count: FRAME_COUNT,
            width: target.width,
            height: target.height,
            format: TextureFormat::R8G8B8A8_UNORM,
        };
        let mut swap_chain = device.create_swap_chain(&*queue, target, &desc)?;
        let buffer_count = swap_chain.buffer_count();
        if buffer_count != FRAME_COUNT {
            engine_error!(
                "swapframe::PresentationPipeline",
                "Swap chain has {} buffers, {} required",
                buffer_count,
                FRAME_COUNT
            );
            return Err(Error::InitializationFailed(format!(
                "swap chain created with {} buffers instead of {}",
                buffer_count, FRAME_COUNT
            )));
        }
        let frame_index = swap_chain.current_back_buffer_index()?;

        let mut rtv_heap = device.create_descriptor_heap(buffer_count)?;
        let mut render_targets = Vec::with_capacity(buffer_count as usize);
        for index in 0..buffer_count {
            render_targets.push(device.create_render_target_view(&*swap_chain, index, &mut *rtv_heap, index)?);
        }

        Ok(PipelineCore {
            frame_index,
            render_targets,
            rtv_heap,
            swap_chain,
            queue,
            device,
        })
    }

    fn load_assets(&mut self, core: PipelineCore) -> Result<GpuObjects> {
        let device = &*core.device;

        let content = match self.content.load_assets()? {
            Some(desc) => {
                let pipeline_state = device.create_pipeline_state(&PipelineStateDesc {
                    vertex_shader: desc.vertex_shader,
                    fragment_shader: desc.fragment_shader,
                    render_target_format: core.swap_chain.format(),
                })?;
                let vertex_buffer = device.create_vertex_buffer(&desc.vertices)?;
                Some(LoadedContent {
                    pipeline_state,
                    vertex_buffer,
                })
            }
            None => None,
        };

        let recorder = FrameRecorder::new(device, content.as_ref().map(|c| &*c.pipeline_state))?;
        let synchronizer = FrameSynchronizer::new(device)?;

        Ok(GpuObjects {
            content,
            recorder,
            synchronizer,
            render_targets: core.render_targets,
            rtv_heap: core.rtv_heap,
            swap_chain: core.swap_chain,
            queue: core.queue,
            device: core.device,
        })
    }

    /// Record, submit and present one frame, then wait for the GPU to retire it
    ///
    /// Any GPU failure here is reported as `Error::DeviceLost`.
    pub fn render(&mut self) -> Result<()> {
        let gpu = self.gpu.as_mut().ok_or_else(|| {
            Error::InvalidResource("render() called before initialize()".to_string())
        })?;

        let view = *gpu
            .render_targets
            .get(self.frame_index as usize)
            .ok_or_else(|| Error::DeviceLost(format!("back buffer index {} out of range", self.frame_index)))?;
        let target = FrameTarget {
            index: self.frame_index,
            resource: view.resource,
            view: &view,
            clear_color: self.content.clear_color().unwrap_or(self.clear_color),
        };

        let params = self.content.draw_params();
        let payload = gpu.content.as_ref().map(|content| {
            let vertex_count = if params.vertex_count == 0 {
                content.vertex_buffer.vertex_count()
            } else {
                params.vertex_count
            };
            DrawPayload {
                pipeline_state: &*content.pipeline_state,
                vertex_buffer: &*content.vertex_buffer,
                vertex_count,
                instance_count: params.instance_count,
                viewport: Viewport::full(view.width, view.height),
                scissor: Rect2D::full(view.width, view.height),
            }
        });

        gpu.recorder.record(&target, payload.as_ref()).map_err(device_lost)?;
        gpu.queue
            .execute_command_lists(&[gpu.recorder.command_list()])
            .map_err(device_lost)?;
        gpu.swap_chain.present(PRESENT_SYNC_INTERVAL).map_err(device_lost)?;
        gpu.synchronizer.wait_for_idle(&*gpu.queue).map_err(device_lost)?;

        let index = gpu.swap_chain.current_back_buffer_index().map_err(device_lost)?;
        if index as usize >= gpu.render_targets.len() {
            return Err(device_lost(Error::InvalidResource(format!(
                "swap chain returned back buffer index {}",
                index
            ))));
        }
        self.frame_index = index;
        Ok(())
    }

    /// Wait for the GPU to retire all submitted work, then release every GPU object
    ///
    /// Safe to call more than once. Objects are released even if the wait fails.
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(mut gpu) = self.gpu.take() else {
            return Ok(());
        };

        let result = gpu
            .synchronizer
            .wait_for_idle(&*gpu.queue)
            .map(|_| ())
            .or_else(|e| {
                engine_warn!("swapframe::PresentationPipeline", "Fence wait failed during shutdown: {}", e);
                gpu.device.wait_idle()
            });

        drop(gpu);
        engine_info!("swapframe::PresentationPipeline", "GPU objects released");
        result
    }

    /// Index of the back buffer the next frame renders into
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Fence value the next frame signals, `None` before `initialize`
    pub fn next_fence_value(&self) -> Option<u64> {
        self.gpu.as_ref().map(|gpu| gpu.synchronizer.next_value())
    }

    /// Highest fence value the GPU has reached
    pub fn completed_fence_value(&self) -> Result<u64> {
        match &self.gpu {
            Some(gpu) => gpu.synchronizer.completed_value(),
            None => Err(Error::InvalidResource("pipeline is not initialized".to_string())),
        }
    }

    /// Adapter the device runs on, `None` before `initialize`
    pub fn adapter(&self) -> Option<&AdapterDesc> {
        self.gpu.as_ref().map(|gpu| gpu.device.adapter())
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Drop for PresentationPipeline {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            engine_error!("swapframe::PresentationPipeline", "Shutdown failed: {}", e);
        }
    }
}

fn device_lost(error: Error) -> Error {
    match error {
        Error::DeviceLost(_) => error,
        other => {
            engine_error!("swapframe::PresentationPipeline", "GPU failure during frame: {}", other);
            Error::DeviceLost(other.to_string())
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
