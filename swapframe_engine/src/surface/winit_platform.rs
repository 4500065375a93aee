/// Winit window platform
///
/// Runs the winit event loop in pump mode: each `pump` call processes the
/// events already queued (zero timeout) and returns, so the frame loop keeps
/// control of the thread.

use std::time::Duration;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use rustc_hash::{FxHashMap, FxHashSet};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::error::{Error, Result};
use crate::surface::keymap::virtual_key_code;
use crate::surface::message::{SurfaceHandle, SurfaceMessage};
use crate::surface::platform::{WindowDesc, WindowPlatform};
use crate::surface::registry::route_message;
use crate::{engine_debug, engine_warn};

fn surface_handle(id: WindowId) -> SurfaceHandle {
    SurfaceHandle(u64::from(id))
}

/// Window platform backed by a winit event loop
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    windows: FxHashMap<SurfaceHandle, Window>,
    /// Closed by the user; the `Window` is kept until `destroy`
    closed: FxHashSet<SurfaceHandle>,
}

impl WinitPlatform {
    /// Create the event loop
    ///
    /// Must be called on the main thread on most platforms.
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| {
            Error::WindowCreationFailed(format!("Failed to create event loop: {}", e))
        })?;
        Ok(Self {
            event_loop,
            windows: FxHashMap::default(),
            closed: FxHashSet::default(),
        })
    }

    fn window(&self, handle: SurfaceHandle) -> Result<&Window> {
        self.windows.get(&handle).ok_or_else(|| {
            Error::InvalidResource(format!("Window {:?} does not exist", handle))
        })
    }
}

impl WindowPlatform for WinitPlatform {
    fn create_window(&mut self, desc: &WindowDesc) -> Result<SurfaceHandle> {
        let attributes = Window::default_attributes()
            .with_title(desc.title.clone())
            .with_inner_size(PhysicalSize::new(desc.width, desc.height))
            .with_resizable(false)
            .with_visible(false);

        #[allow(deprecated)]
        let window = self
            .event_loop
            .create_window(attributes)
            .map_err(|e| Error::WindowCreationFailed(format!("{}", e)))?;

        let handle = surface_handle(window.id());
        self.windows.insert(handle, window);
        Ok(handle)
    }

    fn show(&mut self, handle: SurfaceHandle) {
        if let Some(window) = self.windows.get(&handle) {
            window.set_visible(true);
            window.focus_window();
        }
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        // Dropping the winit window destroys the native one
        let was_closed = self.closed.remove(&handle);
        if self.windows.remove(&handle).is_some() && !was_closed {
            route_message(handle, SurfaceMessage::Destroy);
        }
    }

    fn is_window(&self, handle: SurfaceHandle) -> bool {
        self.windows.contains_key(&handle) && !self.closed.contains(&handle)
    }

    fn pump(&mut self, handle: SurfaceHandle) -> Result<bool> {
        let mut dispatcher = Dispatcher {
            windows: &mut self.windows,
            closed: &mut self.closed,
            watched: handle,
            processed: false,
        };

        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut dispatcher);

        let processed = dispatcher.processed;
        if let PumpStatus::Exit(code) = status {
            engine_warn!("swapframe::Surface", "Event loop exited with code {}", code);
            for handle in self.windows.keys() {
                if self.closed.insert(*handle) {
                    route_message(*handle, SurfaceMessage::Destroy);
                }
            }
        }
        Ok(processed)
    }

    fn request_redraw(&self, handle: SurfaceHandle) {
        if self.closed.contains(&handle) {
            return;
        }
        if let Some(window) = self.windows.get(&handle) {
            window.request_redraw();
        }
    }

    fn raw_handles(&self, handle: SurfaceHandle) -> Result<(RawDisplayHandle, RawWindowHandle)> {
        let window = self.window(handle)?;
        let display = window
            .display_handle()
            .map_err(|e| Error::BackendError(format!("No display handle: {}", e)))?
            .as_raw();
        let raw_window = window
            .window_handle()
            .map_err(|e| Error::BackendError(format!("No window handle: {}", e)))?
            .as_raw();
        Ok((display, raw_window))
    }
}

/// Event handler for one pump step
struct Dispatcher<'a> {
    windows: &'a mut FxHashMap<SurfaceHandle, Window>,
    closed: &'a mut FxHashSet<SurfaceHandle>,
    watched: SurfaceHandle,
    processed: bool,
}

impl ApplicationHandler for Dispatcher<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let handle = surface_handle(window_id);
        if handle == self.watched {
            self.processed = true;
        }

        let message = match event {
            WindowEvent::KeyboardInput { event, .. } => match virtual_key_code(event.physical_key) {
                Some(code) if event.state == ElementState::Pressed => SurfaceMessage::KeyDown(code),
                Some(code) => SurfaceMessage::KeyUp(code),
                None => SurfaceMessage::Other,
            },
            WindowEvent::RedrawRequested => SurfaceMessage::Paint,
            WindowEvent::CloseRequested => {
                engine_debug!("swapframe::Surface", "Close requested for window {:?}", handle);
                // The window itself lives on until the surface releases it
                if !self.windows.contains_key(&handle) || !self.closed.insert(handle) {
                    return;
                }
                SurfaceMessage::Destroy
            }
            WindowEvent::Destroyed => {
                let known = self.windows.remove(&handle).is_some();
                let first = self.closed.insert(handle);
                if !known || !first {
                    return;
                }
                SurfaceMessage::Destroy
            }
            _ => SurfaceMessage::Other,
        };

        route_message(handle, message);
    }
}
