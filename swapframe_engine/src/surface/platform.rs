/// Window platform trait - the OS windowing layer behind a surface

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use crate::error::Result;
use crate::surface::message::SurfaceHandle;

/// Native window creation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDesc {
    /// Registered class the window is created from
    pub class_name: String,
    /// Title bar text
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

/// OS windowing layer
///
/// `pump` must translate each queued native message and hand it to
/// `surface::route_message`, which finds the owning surface by handle.
pub trait WindowPlatform {
    /// Create a native window (hidden until `show`)
    fn create_window(&mut self, desc: &WindowDesc) -> Result<SurfaceHandle>;

    /// Show, raise and focus a window
    fn show(&mut self, handle: SurfaceHandle);

    /// Release a window's native resources
    ///
    /// A window the user closed is reported gone by `is_window` right away,
    /// but stays allocated until this call, so GPU objects bound to it can
    /// be released first.
    fn destroy(&mut self, handle: SurfaceHandle);

    /// Whether the window still exists for the application (not closed)
    fn is_window(&self, handle: SurfaceHandle) -> bool;

    /// Dispatch the messages currently queued, without blocking
    ///
    /// Returns `true` if at least one message for `handle` was processed.
    fn pump(&mut self, handle: SurfaceHandle) -> Result<bool>;

    /// Ask for a paint notification on the next pump
    fn request_redraw(&self, handle: SurfaceHandle);

    /// Raw display and window handles, for GPU swap chain creation
    fn raw_handles(&self, handle: SurfaceHandle) -> Result<(RawDisplayHandle, RawWindowHandle)>;
}
