/// VulkanSwapChain - Vulkan implementation of SwapChain
///
/// The surface is created from the window's raw handles together with the
/// swap chain and destroyed with it. Images are acquired lazily, the first
/// time the current index is read after a present.

use ash::vk;
use ash::vk::Handle;
use std::any::Any;
use std::sync::Arc;
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{
    ResourceId, SurfaceTarget, SwapChain, SwapChainDesc, TextureFormat,
};
use swapframe_engine::{engine_debug, engine_error, engine_info, engine_trace, engine_warn};

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{
    choose_surface_format, swap_chain_extent, swap_chain_image_count, vk_error, vk_format_to_format,
};

pub struct VulkanSwapChain {
    ctx: Arc<GpuContext>,
    surface: vk::SurfaceKHR,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    format: TextureFormat,
    vk_format: vk::Format,
    extent: vk::Extent2D,
    /// Signaled by the presentation engine when the acquired image is free
    image_available: vk::Semaphore,
    /// One per image, signaled by the frame's submission
    render_finished: Vec<vk::Semaphore>,
    /// Image acquired and not yet presented
    current: Option<u32>,
}

impl VulkanSwapChain {
    pub(crate) fn new(ctx: Arc<GpuContext>, target: &SurfaceTarget, desc: &SwapChainDesc) -> Result<Self> {
        let surface = unsafe {
            ash_window::create_surface(
                &ctx.instance.entry,
                &ctx.instance.instance,
                target.display,
                target.window,
                None,
            )
        }
        .map_err(|e| {
            engine_error!("swapframe::vulkan", "Failed to create surface: {:?}", e);
            Error::InitializationFailed(format!("Failed to create surface: {:?}", e))
        })?;

        // Everything below is released by Drop if a later step fails
        let mut chain = Self {
            ctx,
            surface,
            swapchain: vk::SwapchainKHR::null(),
            images: Vec::new(),
            format: desc.format,
            vk_format: vk::Format::UNDEFINED,
            extent: vk::Extent2D { width: desc.width, height: desc.height },
            image_available: vk::Semaphore::null(),
            render_finished: Vec::new(),
            current: None,
        };
        chain.create_swapchain(desc)?;
        chain.create_semaphores()?;

        engine_info!("swapframe::vulkan", "Swap chain created: {} x {:?} {}x{}",
            chain.images.len(), chain.format, chain.extent.width, chain.extent.height);
        Ok(chain)
    }

    fn create_swapchain(&mut self, desc: &SwapChainDesc) -> Result<()> {
        let ctx = &self.ctx;
        let surface_loader = &ctx.instance.surface_loader;
        unsafe {
            let supported = surface_loader
                .get_physical_device_surface_support(ctx.physical_device, ctx.graphics_queue_family, self.surface)
                .unwrap_or(false);
            if !supported {
                engine_error!("swapframe::vulkan", "Graphics queue family {} cannot present to this window",
                    ctx.graphics_queue_family);
                return Err(Error::InitializationFailed(
                    "graphics queue cannot present to the window".to_string(),
                ));
            }

            let capabilities = surface_loader
                .get_physical_device_surface_capabilities(ctx.physical_device, self.surface)
                .map_err(|e| {
                    engine_error!("swapframe::vulkan", "Failed to query surface capabilities: {:?}", e);
                    Error::InitializationFailed(format!("Failed to query surface capabilities: {:?}", e))
                })?;
            let formats = surface_loader
                .get_physical_device_surface_formats(ctx.physical_device, self.surface)
                .map_err(|e| {
                    engine_error!("swapframe::vulkan", "Failed to query surface formats: {:?}", e);
                    Error::InitializationFailed(format!("Failed to query surface formats: {:?}", e))
                })?;

            let surface_format = choose_surface_format(&formats, desc.format).ok_or_else(|| {
                engine_error!("swapframe::vulkan", "No 32-bit linear surface format among {:?}", formats);
                Error::InitializationFailed("no supported surface format".to_string())
            })?;
            let format = vk_format_to_format(surface_format.format).ok_or_else(|| {
                Error::InitializationFailed(format!("unsupported surface format {:?}", surface_format.format))
            })?;
            if format != desc.format {
                engine_debug!("swapframe::vulkan", "{:?} not offered by the surface, using {:?}", desc.format, format);
            }

            let image_count = swap_chain_image_count(desc.buffer_count, &capabilities);
            if image_count != desc.buffer_count {
                engine_error!("swapframe::vulkan", "Surface requires {} images instead of {}",
                    image_count, desc.buffer_count);
                return Err(Error::InitializationFailed(format!(
                    "surface cannot be presented with {} images",
                    desc.buffer_count
                )));
            }
            let extent = swap_chain_extent(desc.width, desc.height, &capabilities);

            let composite_alpha = [
                vk::CompositeAlphaFlagsKHR::OPAQUE,
                vk::CompositeAlphaFlagsKHR::INHERIT,
                vk::CompositeAlphaFlagsKHR::PRE_MULTIPLIED,
                vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED,
            ]
            .into_iter()
            .find(|mode| capabilities.supported_composite_alpha.contains(*mode))
            .unwrap_or(vk::CompositeAlphaFlagsKHR::OPAQUE);

            // FIFO is the only mode every implementation supports, and it
            // waits for one vertical blank per present
            let create_info = vk::SwapchainCreateInfoKHR::default()
                .surface(self.surface)
                .min_image_count(image_count)
                .image_format(surface_format.format)
                .image_color_space(surface_format.color_space)
                .image_extent(extent)
                .image_array_layers(1)
                .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
                .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
                .pre_transform(capabilities.current_transform)
                .composite_alpha(composite_alpha)
                .present_mode(vk::PresentModeKHR::FIFO)
                .clipped(true);

            self.swapchain = ctx.swapchain_loader.create_swapchain(&create_info, None).map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to create swapchain: {:?}", e);
                Error::InitializationFailed(format!("Failed to create swapchain: {:?}", e))
            })?;
            self.images = ctx.swapchain_loader.get_swapchain_images(self.swapchain).map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to get swapchain images: {:?}", e);
                Error::InitializationFailed(format!("Failed to get swapchain images: {:?}", e))
            })?;
            self.format = format;
            self.vk_format = surface_format.format;
            self.extent = extent;
        }
        Ok(())
    }

    fn create_semaphores(&mut self) -> Result<()> {
        let info = vk::SemaphoreCreateInfo::default();
        let create = |what: &str| {
            unsafe { self.ctx.device.create_semaphore(&info, None) }.map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to create {} semaphore: {:?}", what, e);
                Error::InitializationFailed(format!("Failed to create semaphore: {:?}", e))
            })
        };
        self.image_available = create("image available")?;
        for _ in 0..self.images.len() {
            let semaphore = create("render finished")?;
            self.render_finished.push(semaphore);
        }
        Ok(())
    }

    /// Image of back buffer `index`
    pub(crate) fn image(&self, index: u32) -> Result<vk::Image> {
        self.images.get(index as usize).copied().ok_or_else(|| {
            Error::InvalidResource(format!(
                "back buffer {} out of range ({} buffers)",
                index,
                self.images.len()
            ))
        })
    }

    pub(crate) fn vk_format(&self) -> vk::Format {
        self.vk_format
    }

    fn acquire(&mut self) -> Result<u32> {
        let (index, suboptimal) = unsafe {
            self.ctx.swapchain_loader.acquire_next_image(
                self.swapchain,
                u64::MAX,
                self.image_available,
                vk::Fence::null(),
            )
        }
        .map_err(|e| vk_error("vkAcquireNextImageKHR", e))?;
        if suboptimal {
            engine_debug!("swapframe::vulkan", "Swap chain is suboptimal for the surface");
        }

        let render_finished = self.render_finished.get(index as usize).copied().ok_or_else(|| {
            Error::BackendError(format!("acquired image {} out of range", index))
        })?;
        let mut state = self.ctx.lock_queue()?;
        state.semaphores.acquired = Some(self.image_available);
        state.semaphores.render_finished = Some(render_finished);
        Ok(index)
    }
}

impl SwapChain for VulkanSwapChain {
    fn buffer_count(&self) -> u32 {
        self.images.len() as u32
    }

    fn width(&self) -> u32 {
        self.extent.width
    }

    fn height(&self) -> u32 {
        self.extent.height
    }

    fn format(&self) -> TextureFormat {
        self.format
    }

    fn current_back_buffer_index(&mut self) -> Result<u32> {
        match self.current {
            Some(index) => Ok(index),
            None => {
                let index = self.acquire()?;
                self.current = Some(index);
                Ok(index)
            }
        }
    }

    fn back_buffer(&self, index: u32) -> Result<ResourceId> {
        Ok(ResourceId(self.image(index)?.as_raw()))
    }

    /// The present mode is FIFO, so every present waits for a vertical
    /// blank whatever `sync_interval` says
    fn present(&mut self, sync_interval: u32) -> Result<()> {
        let index = self.current.take().ok_or_else(|| {
            Error::InvalidResource("present() called without an acquired back buffer".to_string())
        })?;
        if sync_interval != 1 {
            engine_trace!("swapframe::vulkan", "sync interval {} ignored by FIFO presentation", sync_interval);
        }

        let mut state = self.ctx.lock_queue()?;
        let wait_semaphores: Vec<vk::Semaphore> =
            state.semaphores.ready_to_present.take().into_iter().collect();
        let swapchains = [self.swapchain];
        let image_indices = [index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        match unsafe { self.ctx.swapchain_loader.queue_present(state.queue, &present_info) } {
            Ok(false) => Ok(()),
            Ok(true) => {
                engine_debug!("swapframe::vulkan", "Present reported a suboptimal swap chain");
                Ok(())
            }
            Err(e) => Err(vk_error("vkQueuePresentKHR", e)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanSwapChain {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.device_wait_idle().ok();
            if let Ok(mut state) = self.ctx.queue.lock() {
                state.semaphores = Default::default();
            }
            for semaphore in self.render_finished.drain(..) {
                self.ctx.device.destroy_semaphore(semaphore, None);
            }
            self.ctx.device.destroy_semaphore(self.image_available, None);
            self.ctx.swapchain_loader.destroy_swapchain(self.swapchain, None);
            self.ctx.instance.surface_loader.destroy_surface(self.surface, None);
        }
    }
}
