/// Surface - the native on-screen window and its message pump

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::graphics_device::SurfaceTarget;
use crate::input::InputSink;
use crate::surface::message::{PumpResult, SurfaceHandle};
use crate::surface::platform::{WindowDesc, WindowPlatform};
use crate::surface::registry::{self, RenderCallback, SurfaceSinks};
use crate::{engine_error, engine_info, engine_warn};

/// Native window owned by the application
///
/// The window class is registered at construction, the window itself is
/// created by `initialize`. Dimensions never change afterwards.
///
/// # Example
///
/// ```no_run
/// use swapframe_engine::swapframe::Config;
/// use swapframe_engine::swapframe::surface::{PumpResult, Surface, WinitPlatform};
///
/// let config = Config::default();
/// let mut surface = Surface::new(&config, Box::new(WinitPlatform::new()?))?;
/// surface.initialize()?;
/// while surface.pump_step()? == PumpResult::Continue {}
/// # Ok::<(), swapframe_engine::swapframe::Error>(())
/// ```
pub struct Surface {
    platform: Box<dyn WindowPlatform>,
    class_name: String,
    title: String,
    width: u32,
    height: u32,
    /// Set by `initialize`, nulled when the window goes away
    handle: Option<SurfaceHandle>,
    /// Handle of a closed window whose native resources are released on drop
    retired: Option<SurfaceHandle>,
    sinks: Rc<RefCell<SurfaceSinks>>,
    closed: bool,
}

impl Surface {
    /// Describe the window and register its class
    pub fn new(config: &Config, platform: Box<dyn WindowPlatform>) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::WindowCreationFailed(format!(
                "Invalid window size {}x{}",
                config.width, config.height
            )));
        }
        registry::register_class(&config.window_class)?;

        Ok(Self {
            platform,
            class_name: config.window_class.clone(),
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            handle: None,
            retired: None,
            sinks: Rc::new(RefCell::new(SurfaceSinks::default())),
            closed: false,
        })
    }

    /// Create, show and focus the native window
    ///
    /// A second call is a warning and does nothing.
    pub fn initialize(&mut self) -> Result<()> {
        if self.handle.is_some() {
            engine_warn!("swapframe::Surface", "initialize() unexpectedly called multiple times");
            return Ok(());
        }
        if self.closed {
            return Err(Error::WindowCreationFailed(
                "surface was already closed".to_string(),
            ));
        }

        engine_info!("swapframe::Surface", "Creating window '{}' ({}x{})", self.title, self.width, self.height);
        let desc = WindowDesc {
            class_name: self.class_name.clone(),
            title: self.title.clone(),
            width: self.width,
            height: self.height,
        };
        let handle = self.platform.create_window(&desc).map_err(|e| {
            engine_error!("swapframe::Surface", "Could not create window: {}", e);
            match e {
                Error::WindowCreationFailed(_) => e,
                other => Error::WindowCreationFailed(other.to_string()),
            }
        })?;

        registry::attach(handle, &self.sinks);
        self.handle = Some(handle);
        self.platform.show(handle);
        Ok(())
    }

    /// Dispatch the queued messages and report whether the window still exists
    ///
    /// `Closed` is reported by the step that dispatches the window's
    /// destruction, or the first step that finds it gone. At that point the
    /// handle is nulled and the class unregistered. Later calls keep
    /// returning `Closed` without unregistering again.
    pub fn pump_step(&mut self) -> Result<PumpResult> {
        if self.closed {
            engine_warn!("swapframe::Surface", "pump_step() called after the window was closed");
            return Ok(PumpResult::Closed);
        }
        let handle = self.handle.ok_or_else(|| {
            Error::InvalidResource("pump_step() called before initialize()".to_string())
        })?;

        let processed = self.platform.pump(handle)?;

        if let Some(err) = self.sinks.borrow_mut().pending_error.take() {
            return Err(err);
        }

        let destroyed = self.sinks.borrow().destroyed;
        if destroyed || (!processed && !self.platform.is_window(handle)) {
            self.close(handle);
            return Ok(PumpResult::Closed);
        }
        Ok(PumpResult::Continue)
    }

    fn close(&mut self, handle: SurfaceHandle) {
        engine_info!("swapframe::Surface", "Window '{}' closed", self.title);
        registry::detach(handle);
        registry::unregister_class(&self.class_name);
        self.retired = self.handle.take();
        self.closed = true;
    }

    /// Register the input sink (replaces any previous one)
    pub fn set_input_sink(&mut self, sink: Rc<RefCell<dyn InputSink>>) {
        self.sinks.borrow_mut().input_sink = Some(sink);
    }

    pub fn clear_input_sink(&mut self) {
        self.sinks.borrow_mut().input_sink = None;
    }

    /// Register the update+render callback run on paint notifications
    pub fn set_render_callback(&mut self, callback: RenderCallback) {
        self.sinks.borrow_mut().render_callback = Some(callback);
    }

    pub fn clear_render_callback(&mut self) {
        self.sinks.borrow_mut().render_callback = None;
    }

    /// Ask the platform for a paint notification
    pub fn request_redraw(&self) {
        if let Some(handle) = self.handle {
            self.platform.request_redraw(handle);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native handle, `None` before `initialize` and after close
    pub fn handle(&self) -> Option<SurfaceHandle> {
        self.handle
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Raw handles and size for swap chain creation
    pub fn target(&self) -> Result<SurfaceTarget> {
        let handle = self.handle.ok_or_else(|| {
            Error::InvalidResource("surface has no native window".to_string())
        })?;
        let (display, window) = self.platform.raw_handles(handle)?;
        Ok(SurfaceTarget {
            display,
            window,
            width: self.width,
            height: self.height,
        })
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take().or(self.retired.take()) {
            registry::detach(handle);
            self.platform.destroy(handle);
        }
        if !self.closed && registry::is_class_registered(&self.class_name) {
            registry::unregister_class(&self.class_name);
        }
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
