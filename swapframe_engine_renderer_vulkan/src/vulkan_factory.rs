/// VulkanFactory - Vulkan implementation of GraphicsFactory
///
/// Owns the instance. Adapters are the physical devices, in the order the
/// loader reports them; their `index` is the position in that list.

use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use std::any::Any;
use std::ffi::{CStr, CString};
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};
use swapframe_engine::swapframe::{Config, Error, Result};
use swapframe_engine::swapframe::graphics::{
    AdapterDesc, AdapterKind, FeatureLevel, GpuPreference, GraphicsDevice, GraphicsFactory,
};
use swapframe_engine::{engine_debug, engine_error, engine_info, engine_warn};

use crate::vulkan_context::{FrameSemaphores, GpuContext, InstanceContext, QueueState};
use crate::vulkan_debug;
use crate::vulkan_device::VulkanDevice;
use crate::vulkan_format::{adapter_kind, feature_level_to_api_version, performance_rank};

/// Platform surface extensions, enabled when the loader has them
const PLATFORM_SURFACE_EXTENSIONS: [&CStr; 6] = [
    ash::khr::win32_surface::NAME,
    ash::khr::xlib_surface::NAME,
    ash::khr::xcb_surface::NAME,
    ash::khr::wayland_surface::NAME,
    ash::ext::metal_surface::NAME,
    ash::khr::android_surface::NAME,
];

#[cfg(feature = "vulkan-validation")]
const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Vulkan graphics factory
pub struct VulkanFactory {
    instance: Arc<InstanceContext>,
    physical_devices: Vec<vk::PhysicalDevice>,
}

impl VulkanFactory {
    /// Load the Vulkan library and create the instance
    ///
    /// Validation layers are enabled when `config.enable_validation` is set
    /// and the crate is built with the `vulkan-validation` feature.
    pub fn new(config: &Config) -> Result<Self> {
        unsafe {
            let entry = ash::Entry::load().map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
            })?;

            let app_name = CString::new(config.app_name.as_str()).map_err(|_| {
                Error::InitializationFailed(format!("Invalid application name '{}'", config.app_name))
            })?;
            let (major, minor, patch) = config.app_version;
            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, major, minor, patch))
                .engine_name(c"Swapframe")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_3);

            let available = entry.enumerate_instance_extension_properties(None).map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to enumerate instance extensions: {:?}", e);
                Error::InitializationFailed(format!("Failed to enumerate instance extensions: {:?}", e))
            })?;
            let has_extension = |name: &CStr| {
                available
                    .iter()
                    .any(|p| p.extension_name_as_c_str().map(|n| n == name).unwrap_or(false))
            };

            if !has_extension(ash::khr::surface::NAME) {
                engine_error!("swapframe::vulkan", "VK_KHR_surface is not available");
                return Err(Error::InitializationFailed("VK_KHR_surface is not available".to_string()));
            }
            let mut extension_names = vec![ash::khr::surface::NAME.as_ptr()];
            for name in PLATFORM_SURFACE_EXTENSIONS {
                if has_extension(name) {
                    engine_debug!("swapframe::vulkan", "Enabling {:?}", name);
                    extension_names.push(name.as_ptr());
                }
            }

            #[cfg(feature = "vulkan-validation")]
            let validation = config.enable_validation && Self::has_validation_layer(&entry);
            #[cfg(not(feature = "vulkan-validation"))]
            let validation = {
                if config.enable_validation {
                    engine_warn!("swapframe::vulkan",
                        "Validation requested but the backend was built without the vulkan-validation feature");
                }
                false
            };

            #[cfg(feature = "vulkan-validation")]
            let layer_names = if validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
                vec![VALIDATION_LAYER.as_ptr()]
            } else {
                vec![]
            };
            #[cfg(not(feature = "vulkan-validation"))]
            let layer_names: Vec<*const std::os::raw::c_char> = Vec::new();

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry.create_instance(&create_info, None).map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to create Vulkan instance: {:?}", e);
                Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
            })?;
            let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);

            vulkan_debug::reset_validation_stats();
            let instance = Arc::new(InstanceContext {
                #[cfg(feature = "vulkan-validation")]
                debug: if validation {
                    Self::create_messenger(&entry, &instance)
                } else {
                    None
                },
                entry,
                instance,
                surface_loader,
            });

            let physical_devices = instance.instance.enumerate_physical_devices().map_err(|e| {
                engine_error!("swapframe::vulkan", "Failed to enumerate physical devices: {:?}", e);
                Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
            })?;

            engine_info!("swapframe::vulkan", "Vulkan instance created ({} physical device(s), validation {})",
                physical_devices.len(), if validation { "on" } else { "off" });

            Ok(Self { instance, physical_devices })
        }
    }

    #[cfg(feature = "vulkan-validation")]
    fn has_validation_layer(entry: &ash::Entry) -> bool {
        let found = unsafe { entry.enumerate_instance_layer_properties() }
            .map(|layers| {
                layers.iter().any(|l| {
                    l.layer_name_as_c_str().map(|n| n == VALIDATION_LAYER).unwrap_or(false)
                })
            })
            .unwrap_or(false);
        if !found {
            engine_warn!("swapframe::vulkan", "Validation layer {:?} not installed, continuing without it",
                VALIDATION_LAYER);
        }
        found
    }

    /// Messenger failures only cost the validation output, so they are a warning
    #[cfg(feature = "vulkan-validation")]
    fn create_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let loader = ash::ext::debug_utils::Instance::new(entry, instance);
        let info = vulkan_debug::messenger_create_info();
        match unsafe { loader.create_debug_utils_messenger(&info, None) } {
            Ok(messenger) => Some((loader, messenger)),
            Err(e) => {
                engine_warn!("swapframe::vulkan", "Failed to create debug messenger: {:?}", e);
                None
            }
        }
    }

    fn physical_device(&self, adapter: &AdapterDesc) -> Result<vk::PhysicalDevice> {
        self.physical_devices
            .get(adapter.index as usize)
            .copied()
            .ok_or_else(|| Error::InvalidResource(format!("Unknown adapter index {}", adapter.index)))
    }

    fn describe(&self, index: usize, physical_device: vk::PhysicalDevice) -> AdapterDesc {
        let instance = &self.instance.instance;
        let (properties, memory) = unsafe {
            (
                instance.get_physical_device_properties(physical_device),
                instance.get_physical_device_memory_properties(physical_device),
            )
        };
        let name = properties
            .device_name_as_c_str()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|_| format!("Vulkan device {}", index));
        let dedicated_video_memory = memory.memory_heaps[..memory.memory_heap_count as usize]
            .iter()
            .filter(|heap| heap.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL))
            .map(|heap| heap.size)
            .sum();

        AdapterDesc {
            index: index as u32,
            name,
            kind: adapter_kind(properties.device_type),
            dedicated_video_memory,
        }
    }

    fn graphics_queue_family(&self, physical_device: vk::PhysicalDevice) -> Option<u32> {
        let families = unsafe {
            self.instance
                .instance
                .get_physical_device_queue_family_properties(physical_device)
        };
        families
            .iter()
            .position(|f| f.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .map(|i| i as u32)
    }

    fn has_swapchain_extension(&self, physical_device: vk::PhysicalDevice) -> bool {
        unsafe {
            self.instance
                .instance
                .enumerate_device_extension_properties(physical_device)
        }
        .map(|extensions| {
            extensions.iter().any(|e| {
                e.extension_name_as_c_str()
                    .map(|n| n == ash::khr::swapchain::NAME)
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
    }

    /// Why `physical_device` cannot run the pipeline at `level`, if it cannot
    fn unsupported_reason(&self, physical_device: vk::PhysicalDevice, level: FeatureLevel) -> Option<String> {
        let instance = &self.instance.instance;
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        if properties.api_version < feature_level_to_api_version(level) {
            return Some(format!(
                "API version {}.{} below {}.{}",
                vk::api_version_major(properties.api_version),
                vk::api_version_minor(properties.api_version),
                level.major,
                level.minor
            ));
        }

        let (timeline_semaphore, dynamic_rendering) = {
            let mut features12 = vk::PhysicalDeviceVulkan12Features::default();
            let mut features13 = vk::PhysicalDeviceVulkan13Features::default();
            let mut features2 = vk::PhysicalDeviceFeatures2::default()
                .push_next(&mut features12)
                .push_next(&mut features13);
            unsafe { instance.get_physical_device_features2(physical_device, &mut features2) };
            (features12.timeline_semaphore == vk::TRUE, features13.dynamic_rendering == vk::TRUE)
        };
        if !timeline_semaphore {
            return Some("timeline semaphores not supported".to_string());
        }
        if !dynamic_rendering {
            return Some("dynamic rendering not supported".to_string());
        }
        if self.graphics_queue_family(physical_device).is_none() {
            return Some("no graphics queue family".to_string());
        }
        if !self.has_swapchain_extension(physical_device) {
            return Some("VK_KHR_swapchain not supported".to_string());
        }
        None
    }
}

impl GraphicsFactory for VulkanFactory {
    fn enumerate_adapters(&self, preference: GpuPreference) -> Result<Vec<AdapterDesc>> {
        let mut adapters: Vec<AdapterDesc> = self
            .physical_devices
            .iter()
            .enumerate()
            .map(|(i, pd)| self.describe(i, *pd))
            .collect();

        if preference == GpuPreference::HighPerformance {
            // Stable: equal kinds keep the loader order
            adapters.sort_by_key(|a| performance_rank(a.kind));
        }
        Ok(adapters)
    }

    fn check_feature_level(&self, adapter: &AdapterDesc, level: FeatureLevel) -> bool {
        let physical_device = match self.physical_device(adapter) {
            Ok(pd) => pd,
            Err(_) => return false,
        };
        match self.unsupported_reason(physical_device, level) {
            Some(reason) => {
                engine_debug!("swapframe::vulkan", "Adapter '{}' rejected: {}", adapter.name, reason);
                false
            }
            None => true,
        }
    }

    fn warp_adapter(&self) -> Result<AdapterDesc> {
        self.enumerate_adapters(GpuPreference::Unspecified)?
            .into_iter()
            .find(|a| a.kind == AdapterKind::Software)
            .ok_or_else(|| {
                engine_error!("swapframe::vulkan", "No software rasterizer adapter (e.g. lavapipe) is installed");
                Error::NoSuitableAdapter
            })
    }

    fn create_device(&self, adapter: &AdapterDesc, level: FeatureLevel) -> Result<Box<dyn GraphicsDevice>> {
        let physical_device = self.physical_device(adapter)?;
        if let Some(reason) = self.unsupported_reason(physical_device, level) {
            engine_error!("swapframe::vulkan", "Cannot create device on '{}': {}", adapter.name, reason);
            return Err(Error::InitializationFailed(format!("{}: {}", adapter.name, reason)));
        }
        let graphics_queue_family = self
            .graphics_queue_family(physical_device)
            .ok_or_else(|| Error::InitializationFailed("No graphics queue family".to_string()))?;

        let instance = &self.instance.instance;
        unsafe {
            let queue_priorities = [1.0];
            let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(graphics_queue_family)
                .queue_priorities(&queue_priorities)];
            let extension_names = [ash::khr::swapchain::NAME.as_ptr()];

            let mut features12 = vk::PhysicalDeviceVulkan12Features::default().timeline_semaphore(true);
            let mut features13 = vk::PhysicalDeviceVulkan13Features::default().dynamic_rendering(true);
            let device_create_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_create_infos)
                .enabled_extension_names(&extension_names)
                .push_next(&mut features12)
                .push_next(&mut features13);

            let device = instance
                .create_device(physical_device, &device_create_info, None)
                .map_err(|e| {
                    engine_error!("swapframe::vulkan", "Failed to create logical device: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create device: {:?}", e))
                })?;

            let allocator = match Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            }) {
                Ok(allocator) => allocator,
                Err(e) => {
                    device.destroy_device(None);
                    engine_error!("swapframe::vulkan", "Failed to create GPU allocator: {:?}", e);
                    return Err(Error::InitializationFailed(format!("Failed to create allocator: {:?}", e)));
                }
            };

            let queue = device.get_device_queue(graphics_queue_family, 0);
            let swapchain_loader = ash::khr::swapchain::Device::new(instance, &device);

            let ctx = Arc::new(GpuContext {
                instance: Arc::clone(&self.instance),
                physical_device,
                device,
                allocator: ManuallyDrop::new(Mutex::new(allocator)),
                graphics_queue_family,
                swapchain_loader,
                queue: Mutex::new(QueueState {
                    queue,
                    semaphores: FrameSemaphores::default(),
                }),
            });

            engine_info!("swapframe::vulkan", "Device created on '{}' (queue family {})",
                adapter.name, graphics_queue_family);
            Ok(Box::new(VulkanDevice::new(adapter.clone(), ctx)))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
