/*!
# Swapframe Engine

Core of a minimal real-time presentation loop: a native window with its
message pump, a double-buffered swap chain driven through a GPU backend,
and fence-based CPU/GPU pacing.

The GPU is reached only through the traits of the `graphics` namespace.
Backend crates (e.g. `swapframe_engine_renderer_vulkan`) implement them.

## Architecture

- **Surface**: native window, non-blocking message pump, key/paint routing
- **select_adapter**: picks the first hardware adapter with the required feature level
- **PresentationPipeline**: device, queue, swap chain, render-target views
- **FrameRecorder**: per-frame command list with paired state transitions
- **FrameSynchronizer**: fence counter and blocking wait
- **Application**: pump / update / render loop and lifecycle
*/

// Internal modules
mod app;
mod config;
mod engine;
mod error;
mod input;
pub mod frame;
pub mod graphics_device;
pub mod log;
pub mod presentation;
pub mod surface;

// Main swapframe namespace module
pub mod swapframe {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{Config, RenderTrigger};

    // Application shell
    pub use crate::app::{Application, Simulation};

    // Input
    pub use crate::input::{InputSink, KeyCode};

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{format_entry, DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Window and message pump
    pub mod surface {
        pub use crate::surface::*;
    }

    // Backend traits and types
    pub mod graphics {
        pub use crate::graphics_device::*;
    }

    // Per-frame recording and synchronization
    pub mod frame {
        pub use crate::frame::*;
    }

    // Adapter selection, content and the presentation pipeline
    pub mod presentation {
        pub use crate::presentation::*;
    }
}
