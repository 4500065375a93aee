//! Error types for the Swapframe engine
//!
//! This module defines the error types used throughout the engine:
//! window setup, adapter selection, GPU object creation and per-frame submission.

use std::fmt;

/// Result type for Swapframe engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Swapframe engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (Vulkan, platform windowing, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, shader, view, etc.)
    InvalidResource(String),

    /// Initialization failed (device, queue, swap chain, heap, fence)
    InitializationFailed(String),

    /// No adapter supports the required feature level
    NoSuitableAdapter,

    /// The native window or its class could not be created
    WindowCreationFailed(String),

    /// A GPU call failed while the frame loop was running
    DeviceLost(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::NoSuitableAdapter => {
                write!(f, "No adapter supports the required feature level")
            }
            Error::WindowCreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
            Error::DeviceLost(msg) => write!(f, "Device lost: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::engine_err;
/// let err = engine_err!("swapframe::vulkan", "Failed to create fence: {}", 42);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::swapframe::Error::BackendError(message)
    }};
}

/// Log a WARN message and build an `Error::BackendError` from it
#[macro_export]
macro_rules! engine_warn_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_warn!($source, "{}", message);
        $crate::swapframe::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return `Err(Error::BackendError)` from the enclosing function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log a WARN message and return `Err(Error::BackendError)` from the enclosing function
#[macro_export]
macro_rules! engine_bail_warn {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_warn_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
