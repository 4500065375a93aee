/// Conversions between engine types and Vulkan enums
///
/// Pure functions only, so they can be tested without a GPU.

use ash::vk;
use swapframe_engine::swapframe::Error;
use swapframe_engine::swapframe::graphics::{
    AdapterKind, FeatureLevel, ResourceState, TextureFormat, Vertex,
};
use swapframe_engine::engine_error;

/// Engine back buffer format to Vulkan format
pub(crate) fn format_to_vk(format: TextureFormat) -> vk::Format {
    match format {
        TextureFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        TextureFormat::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
    }
}

/// Vulkan format to engine back buffer format (`None` if not a supported back buffer format)
pub(crate) fn vk_format_to_format(format: vk::Format) -> Option<TextureFormat> {
    match format {
        vk::Format::R8G8B8A8_UNORM => Some(TextureFormat::R8G8B8A8_UNORM),
        vk::Format::B8G8R8A8_UNORM => Some(TextureFormat::B8G8R8A8_UNORM),
        _ => None,
    }
}

/// Pick the surface format: the requested one, else any other 32-bit linear format
pub(crate) fn choose_surface_format(
    available: &[vk::SurfaceFormatKHR],
    requested: TextureFormat,
) -> Option<vk::SurfaceFormatKHR> {
    let wanted = format_to_vk(requested);
    available
        .iter()
        .find(|f| f.format == wanted)
        .or_else(|| available.iter().find(|f| vk_format_to_format(f.format).is_some()))
        .copied()
}

/// Number of swap chain images to request for `wanted` buffers
pub(crate) fn swap_chain_image_count(wanted: u32, capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = wanted.max(capabilities.min_image_count);
    if capabilities.max_image_count > 0 {
        count.min(capabilities.max_image_count)
    } else {
        count
    }
}

/// Swap chain extent: the surface's current extent, or the window size clamped
/// to the surface limits when the surface lets the swap chain decide
pub(crate) fn swap_chain_extent(width: u32, height: u32, capabilities: &vk::SurfaceCapabilitiesKHR) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        vk::Extent2D {
            width: width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}

/// Image layout of a back buffer in `state`
pub(crate) fn resource_state_to_layout(state: ResourceState) -> vk::ImageLayout {
    match state {
        ResourceState::Presentable => vk::ImageLayout::PRESENT_SRC_KHR,
        ResourceState::RenderTarget => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
    }
}

/// Layouts, stages and access masks of one back buffer transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BarrierMasks {
    pub old_layout: vk::ImageLayout,
    pub new_layout: vk::ImageLayout,
    pub src_stage: vk::PipelineStageFlags,
    pub src_access: vk::AccessFlags,
    pub dst_stage: vk::PipelineStageFlags,
    pub dst_access: vk::AccessFlags,
}

pub(crate) fn barrier_masks(before: ResourceState, after: ResourceState) -> BarrierMasks {
    let stage_and_access = |state| match state {
        ResourceState::RenderTarget => (
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
        ),
        ResourceState::Presentable => (
            vk::PipelineStageFlags::BOTTOM_OF_PIPE,
            vk::AccessFlags::empty(),
        ),
    };

    // The previous contents of a presented image are never read back
    let (old_layout, src_stage, src_access) = match before {
        ResourceState::Presentable => (
            vk::ImageLayout::UNDEFINED,
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            vk::AccessFlags::empty(),
        ),
        ResourceState::RenderTarget => {
            let (stage, access) = stage_and_access(before);
            (resource_state_to_layout(before), stage, access)
        }
    };
    let (dst_stage, dst_access) = stage_and_access(after);

    BarrierMasks {
        old_layout,
        new_layout: resource_state_to_layout(after),
        src_stage,
        src_access,
        dst_stage,
        dst_access,
    }
}

/// Adapter category of a physical device type
pub(crate) fn adapter_kind(device_type: vk::PhysicalDeviceType) -> AdapterKind {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => AdapterKind::Discrete,
        vk::PhysicalDeviceType::INTEGRATED_GPU => AdapterKind::Integrated,
        vk::PhysicalDeviceType::VIRTUAL_GPU => AdapterKind::Virtual,
        vk::PhysicalDeviceType::CPU => AdapterKind::Software,
        _ => AdapterKind::Other,
    }
}

/// Sort key for the high-performance enumeration order (lower first)
pub(crate) fn performance_rank(kind: AdapterKind) -> u8 {
    match kind {
        AdapterKind::Discrete => 0,
        AdapterKind::Integrated => 1,
        AdapterKind::Virtual => 2,
        AdapterKind::Other => 3,
        AdapterKind::Software => 4,
    }
}

/// Vulkan API version of a feature level
pub(crate) fn feature_level_to_api_version(level: FeatureLevel) -> u32 {
    vk::make_api_version(0, level.major, level.minor, 0)
}

/// Vertex input layout of `Vertex`: binding 0, position then color
pub(crate) fn vertex_input_layout() -> (
    vk::VertexInputBindingDescription,
    [vk::VertexInputAttributeDescription; 2],
) {
    let binding = vk::VertexInputBindingDescription {
        binding: 0,
        stride: Vertex::STRIDE,
        input_rate: vk::VertexInputRate::VERTEX,
    };
    let attributes = [
        vk::VertexInputAttributeDescription {
            location: 0,
            binding: 0,
            format: vk::Format::R32G32B32_SFLOAT,
            offset: 0,
        },
        vk::VertexInputAttributeDescription {
            location: 1,
            binding: 0,
            format: vk::Format::R32G32B32A32_SFLOAT,
            offset: Vertex::COLOR_OFFSET,
        },
    ];
    (binding, attributes)
}

/// Log a failed Vulkan call and convert it to an engine error
pub(crate) fn vk_error(what: &str, result: vk::Result) -> Error {
    engine_error!("swapframe::vulkan", "{} failed: {:?}", what, result);
    match result {
        vk::Result::ERROR_DEVICE_LOST => Error::DeviceLost(format!("{}: {:?}", what, result)),
        vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Error::OutOfMemory,
        _ => Error::BackendError(format!("{}: {:?}", what, result)),
    }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
