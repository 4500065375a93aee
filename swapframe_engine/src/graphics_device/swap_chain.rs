/// Swap chain trait - ring of presentable back buffers

use std::any::Any;
use crate::error::Result;
use crate::graphics_device::ResourceId;

/// Number of back buffers in the swap chain
pub const FRAME_COUNT: u32 = 2;

/// Back buffer pixel formats (32 bits per pixel, linear)
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    B8G8R8A8_UNORM,
}

/// Swap chain creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainDesc {
    pub buffer_count: u32,
    pub width: u32,
    pub height: u32,
    /// Preferred format; backends may fall back to another 32-bit linear format
    pub format: TextureFormat,
}

/// Swap chain bound to a native window
///
/// The current back-buffer index advances on `present`. It is only
/// meaningful to read it once the GPU work of the presented frame retired.
pub trait SwapChain: Send + Sync {
    /// Number of back buffers actually created
    fn buffer_count(&self) -> u32;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn format(&self) -> TextureFormat;

    /// Index of the back buffer the next frame renders into
    fn current_back_buffer_index(&mut self) -> Result<u32>;

    /// Image of back buffer `index`
    fn back_buffer(&self, index: u32) -> Result<ResourceId>;

    /// Queue the current back buffer for display
    ///
    /// `sync_interval` 1 waits for one vertical blank.
    fn present(&mut self, sync_interval: u32) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}
