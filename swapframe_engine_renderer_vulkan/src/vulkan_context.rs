/// Shared Vulkan state - instance, logical device, allocator and queue
///
/// Every backend object holds an `Arc<GpuContext>`, so the device outlives
/// all of them, and the device holds the instance the same way.

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::any::Any;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex, MutexGuard};
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::engine_err;

/// Vulkan instance and the instance-level loaders
pub(crate) struct InstanceContext {
    /// Kept alive for the loaded Vulkan library
    pub entry: ash::Entry,
    pub instance: ash::Instance,
    pub surface_loader: ash::khr::surface::Instance,
    #[cfg(feature = "vulkan-validation")]
    pub debug: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl Drop for InstanceContext {
    fn drop(&mut self) {
        unsafe {
            #[cfg(feature = "vulkan-validation")]
            if let Some((loader, messenger)) = self.debug.take() {
                loader.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

/// Semaphores handed from the swap chain to the queue and back
///
/// Acquire stores `acquired` and `render_finished`, submission consumes them
/// and stores `ready_to_present`, present consumes that.
#[derive(Default)]
pub(crate) struct FrameSemaphores {
    pub acquired: Option<vk::Semaphore>,
    pub render_finished: Option<vk::Semaphore>,
    pub ready_to_present: Option<vk::Semaphore>,
}

/// The graphics queue and the semaphores of the frame in progress
///
/// `vkQueueSubmit` and `vkQueuePresentKHR` need external synchronization,
/// so both go through this lock.
pub(crate) struct QueueState {
    pub queue: vk::Queue,
    pub semaphores: FrameSemaphores,
}

/// Logical device shared by every object created from it
pub(crate) struct GpuContext {
    pub instance: Arc<InstanceContext>,
    pub physical_device: vk::PhysicalDevice,
    pub device: ash::Device,
    /// Dropped before the device is destroyed
    pub allocator: ManuallyDrop<Mutex<Allocator>>,
    pub graphics_queue_family: u32,
    pub swapchain_loader: ash::khr::swapchain::Device,
    pub queue: Mutex<QueueState>,
}

impl GpuContext {
    pub fn lock_queue(&self) -> Result<MutexGuard<'_, QueueState>> {
        lock(&self.queue, "queue")
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();
            ManuallyDrop::drop(&mut self.allocator);
            self.device.destroy_device(None);
        }
    }
}

/// Lock `mutex`, turning poisoning into a backend error
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| engine_err!("swapframe::vulkan", "{} lock poisoned", what))
}

/// Downcast an engine trait object to the Vulkan type behind it
pub(crate) fn backend<'a, T: 'static>(any: &'a dyn Any, what: &str) -> Result<&'a T> {
    any.downcast_ref::<T>().ok_or_else(|| {
        Error::InvalidResource(format!("{} was not created by the Vulkan backend", what))
    })
}
