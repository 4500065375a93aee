/*!
# Swapframe Engine - Vulkan Backend

Vulkan implementation of the `swapframe_engine` graphics traits, using Ash
for the bindings, ash-window for surfaces and gpu-allocator for memory.

| Engine concept      | Vulkan object                               |
|---------------------|---------------------------------------------|
| Factory / adapters  | Instance / physical devices                 |
| Command queue       | Graphics queue                              |
| Swap chain          | `VkSwapchainKHR` (FIFO) + `VkSurfaceKHR`    |
| Render-target view  | `VkImageView`                               |
| Command allocator   | `VkCommandPool`                             |
| Command list        | Primary command buffer, dynamic rendering   |
| Fence / fence event | Timeline semaphore / `vkWaitSemaphores`     |

Requires Vulkan 1.3 (timeline semaphores and dynamic rendering).

# Example

```no_run
use swapframe_engine::swapframe::Config;
use swapframe_engine::swapframe::graphics::{GpuPreference, GraphicsFactory};
use swapframe_engine_renderer_vulkan::swapframe::VulkanFactory;

let factory = VulkanFactory::new(&Config::default())?;
for adapter in factory.enumerate_adapters(GpuPreference::HighPerformance)? {
    println!("{} ({:?})", adapter.name, adapter.kind);
}
# Ok::<(), swapframe_engine::swapframe::Error>(())
```
*/

mod vulkan_buffer;
mod vulkan_command_list;
mod vulkan_command_queue;
mod vulkan_context;
mod vulkan_debug;
mod vulkan_descriptor_heap;
mod vulkan_device;
mod vulkan_factory;
mod vulkan_fence;
mod vulkan_format;
mod vulkan_pipeline_state;
mod vulkan_swap_chain;

pub mod swapframe {
    pub use crate::vulkan_factory::VulkanFactory;
    pub use crate::vulkan_device::VulkanDevice;
    pub use crate::vulkan_swap_chain::VulkanSwapChain;
    pub use crate::vulkan_debug::{print_validation_stats_report, validation_stats, ValidationStats};
}
