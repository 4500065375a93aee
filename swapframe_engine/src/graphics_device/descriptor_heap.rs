/// Descriptor heap trait and render-target views

use std::any::Any;
use crate::graphics_device::{ResourceId, TextureFormat};

/// Fixed-capacity storage for render-target views
///
/// Views written into a heap live as long as the heap.
pub trait DescriptorHeap: Send + Sync {
    /// Number of slots
    fn capacity(&self) -> u32;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A render-target view written into a descriptor heap slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetView {
    /// Heap slot holding the view
    pub slot: u32,
    /// Image the view looks at
    pub resource: ResourceId,
    /// Backend view handle (e.g. a `VkImageView`)
    pub raw: u64,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}
