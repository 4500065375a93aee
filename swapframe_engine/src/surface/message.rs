/// Messages exchanged between the window platform and the surface

use crate::input::KeyCode;

/// Opaque native window handle
///
/// Stable for the whole life of one native window and never reused for
/// another window while the registry still knows about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// A translated native window message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMessage {
    /// Key pressed, with its virtual-key code
    KeyDown(KeyCode),
    /// Key released, with its virtual-key code
    KeyUp(KeyCode),
    /// The window contents must be redrawn
    Paint,
    /// The native window has been destroyed
    Destroy,
    /// Any message the surface does not act upon
    Other,
}

/// Liveness signal returned by one pump step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpResult {
    /// The window is alive, keep looping
    Continue,
    /// The window no longer exists
    Closed,
}
