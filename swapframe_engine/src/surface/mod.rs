/// Surface module - native window, message pump and message routing

pub mod keymap;
pub mod message;
pub mod platform;
pub mod registry;
mod surface;
mod winit_platform;

#[cfg(test)]
pub(crate) mod mock_platform;

pub use message::{PumpResult, SurfaceHandle, SurfaceMessage};
pub use platform::{WindowDesc, WindowPlatform};
pub use registry::{route_message, RenderCallback};
pub use surface::Surface;
pub use winit_platform::WinitPlatform;
