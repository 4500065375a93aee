/// Graphics factory trait - adapter enumeration and device creation

use std::any::Any;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use crate::error::Result;
use crate::graphics_device::{AdapterDesc, FeatureLevel, GpuPreference, GraphicsDevice};

/// Native window a swap chain is created for
#[derive(Debug, Clone, Copy)]
pub struct SurfaceTarget {
    pub display: RawDisplayHandle,
    pub window: RawWindowHandle,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

/// Entry point of a GPU backend
pub trait GraphicsFactory: Send + Sync {
    /// List adapters in the requested preference order
    fn enumerate_adapters(&self, preference: GpuPreference) -> Result<Vec<AdapterDesc>>;

    /// Check whether a device could be created at `level`, without creating it
    fn check_feature_level(&self, adapter: &AdapterDesc, level: FeatureLevel) -> bool;

    /// The software rasterizer adapter, if the platform has one
    fn warp_adapter(&self) -> Result<AdapterDesc>;

    /// Create a device on `adapter`
    fn create_device(
        &self,
        adapter: &AdapterDesc,
        level: FeatureLevel,
    ) -> Result<Box<dyn GraphicsDevice>>;

    fn as_any(&self) -> &dyn Any;
}
