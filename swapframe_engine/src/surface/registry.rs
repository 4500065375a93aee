/// Surface registry - native handle to owning surface, plus window classes
///
/// The OS dispatches window messages through one global entry point that
/// carries no instance context. The registry is that context: each surface
/// attaches its dispatch state under its native handle when the window is
/// created, and `route_message` looks it up again for every message.
///
/// The frame loop is single-threaded, so the registry is thread-local.
/// Entries hold weak references; a dropped surface simply stops receiving.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::input::InputSink;
use crate::surface::message::{SurfaceHandle, SurfaceMessage};
use crate::{engine_debug, engine_trace, engine_warn};

/// Update+render callback invoked on paint notifications
pub type RenderCallback = Box<dyn FnMut() -> Result<()>>;

/// Per-surface dispatch state shared between a surface and the registry
#[derive(Default)]
pub struct SurfaceSinks {
    pub(crate) input_sink: Option<Rc<RefCell<dyn InputSink>>>,
    pub(crate) render_callback: Option<RenderCallback>,
    /// First error raised by the render callback, drained by `pump_step`
    pub(crate) pending_error: Option<Error>,
    pub(crate) destroyed: bool,
}

#[derive(Default)]
struct Registry {
    windows: FxHashMap<SurfaceHandle, Weak<RefCell<SurfaceSinks>>>,
    classes: FxHashSet<String>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

// ===== WINDOW CLASSES =====

/// Register a window class name
///
/// Registering a name twice is accepted and logged.
pub fn register_class(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::WindowCreationFailed(
            "window class name is empty".to_string(),
        ));
    }
    engine_debug!("swapframe::Surface", "Registering window class '{}'", name);
    let inserted = REGISTRY.with(|r| r.borrow_mut().classes.insert(name.to_string()));
    if !inserted {
        engine_debug!("swapframe::Surface", "Window class '{}' was already registered", name);
    }
    Ok(())
}

/// Unregister a window class name
///
/// Returns `false` (with a warning) if the class was not registered.
pub fn unregister_class(name: &str) -> bool {
    let removed = REGISTRY.with(|r| r.borrow_mut().classes.remove(name));
    if removed {
        engine_debug!("swapframe::Surface", "Unregistered window class '{}'", name);
    } else {
        engine_warn!("swapframe::Surface", "Window class '{}' is not registered", name);
    }
    removed
}

/// Whether a window class name is currently registered
pub fn is_class_registered(name: &str) -> bool {
    REGISTRY.with(|r| r.borrow().classes.contains(name))
}

// ===== WINDOWS =====

/// Attach a surface's dispatch state to its native handle
pub(crate) fn attach(handle: SurfaceHandle, sinks: &Rc<RefCell<SurfaceSinks>>) {
    REGISTRY.with(|r| {
        r.borrow_mut().windows.insert(handle, Rc::downgrade(sinks));
    });
}

/// Forget a native handle
pub(crate) fn detach(handle: SurfaceHandle) {
    REGISTRY.with(|r| {
        r.borrow_mut().windows.remove(&handle);
    });
}

/// Whether a native handle currently routes to a surface
pub fn is_attached(handle: SurfaceHandle) -> bool {
    REGISTRY.with(|r| {
        r.borrow()
            .windows
            .get(&handle)
            .is_some_and(|weak| weak.strong_count() > 0)
    })
}

/// Route one native message to the surface that owns `handle`
///
/// This is the single entry point every window platform calls. Messages for
/// unknown handles are dropped. Returns whether a surface received it.
pub fn route_message(handle: SurfaceHandle, message: SurfaceMessage) -> bool {
    let sinks = REGISTRY.with(|r| r.borrow().windows.get(&handle).and_then(Weak::upgrade));
    let Some(sinks) = sinks else {
        engine_trace!("swapframe::Surface", "Dropped {:?} for unknown window {:?}", message, handle);
        return false;
    };

    match message {
        SurfaceMessage::KeyDown(code) => {
            let sink = sinks.borrow().input_sink.clone();
            if let Some(sink) = sink {
                sink.borrow_mut().on_key_down(code);
            }
        }
        SurfaceMessage::KeyUp(code) => {
            let sink = sinks.borrow().input_sink.clone();
            if let Some(sink) = sink {
                sink.borrow_mut().on_key_up(code);
            }
        }
        SurfaceMessage::Paint => {
            if sinks.borrow().destroyed {
                engine_trace!("swapframe::Surface", "Ignored paint for destroyed window {:?}", handle);
                return true;
            }
            // Taken out while it runs so the callback may touch the surface state
            let callback = sinks.borrow_mut().render_callback.take();
            if let Some(mut callback) = callback {
                let outcome = callback();
                let mut state = sinks.borrow_mut();
                if let Err(err) = outcome {
                    state.pending_error.get_or_insert(err);
                }
                if state.render_callback.is_none() {
                    state.render_callback = Some(callback);
                }
            }
        }
        SurfaceMessage::Destroy => {
            engine_debug!("swapframe::Surface", "Window {:?} destroyed", handle);
            sinks.borrow_mut().destroyed = true;
        }
        SurfaceMessage::Other => {}
    }
    true
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
