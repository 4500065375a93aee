/// Mock window platform for unit testing (no display required)
///
/// Tests keep a `MockPlatformControl` to queue messages, close windows and
/// inspect what the surface asked the platform to do.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle, WebDisplayHandle, WebWindowHandle};
use crate::error::{Error, Result};
use crate::surface::message::{SurfaceHandle, SurfaceMessage};
use crate::surface::platform::{WindowDesc, WindowPlatform};
use crate::surface::registry::route_message;

/// Platform-side event queued by a test
#[derive(Debug, Clone, Copy)]
enum MockEvent {
    Message(SurfaceMessage),
    /// User closed the window: it stops existing for the surface and
    /// `Destroy` is delivered, the native resources stay until `destroy`
    Close,
}

#[derive(Default)]
pub struct MockPlatformState {
    next_id: u64,
    alive: Vec<SurfaceHandle>,
    /// Closed by the user, not yet released by `destroy`
    closing: Vec<SurfaceHandle>,
    queue: VecDeque<(SurfaceHandle, MockEvent)>,
    pub fail_create: bool,
    pub created: Vec<WindowDesc>,
    pub shown: Vec<SurfaceHandle>,
    pub destroyed: Vec<SurfaceHandle>,
    pub redraw_requests: u32,
    pub pump_calls: u32,
}

/// Mock window platform
pub struct MockPlatform {
    state: Rc<RefCell<MockPlatformState>>,
}

/// Test-side handle on a mock platform
#[derive(Clone)]
pub struct MockPlatformControl {
    state: Rc<RefCell<MockPlatformState>>,
}

impl MockPlatform {
    pub fn new() -> (Self, MockPlatformControl) {
        let state = Rc::new(RefCell::new(MockPlatformState::default()));
        (
            Self { state: state.clone() },
            MockPlatformControl { state },
        )
    }
}

impl MockPlatformControl {
    /// Queue a message for the next pump
    pub fn post(&self, handle: SurfaceHandle, message: SurfaceMessage) {
        self.state
            .borrow_mut()
            .queue
            .push_back((handle, MockEvent::Message(message)));
    }

    /// Queue a user close for the next pump
    pub fn close(&self, handle: SurfaceHandle) {
        self.state.borrow_mut().queue.push_back((handle, MockEvent::Close));
    }

    /// Make the next `create_window` fail
    pub fn fail_next_create(&self) {
        self.state.borrow_mut().fail_create = true;
    }

    /// Windows closed by the user whose native resources are still held
    pub fn closing(&self) -> Vec<SurfaceHandle> {
        self.state.borrow().closing.clone()
    }

    pub fn state(&self) -> std::cell::Ref<'_, MockPlatformState> {
        self.state.borrow()
    }
}

impl WindowPlatform for MockPlatform {
    fn create_window(&mut self, desc: &WindowDesc) -> Result<SurfaceHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            state.fail_create = false;
            return Err(Error::WindowCreationFailed("mock refused window".to_string()));
        }
        state.next_id += 1;
        let handle = SurfaceHandle(0x1000 + state.next_id);
        state.alive.push(handle);
        state.created.push(desc.clone());
        Ok(handle)
    }

    fn show(&mut self, handle: SurfaceHandle) {
        self.state.borrow_mut().shown.push(handle);
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        let was_alive = {
            let mut state = self.state.borrow_mut();
            let before = state.alive.len();
            state.alive.retain(|h| *h != handle);
            state.closing.retain(|h| *h != handle);
            state.destroyed.push(handle);
            before != state.alive.len()
        };
        if was_alive {
            route_message(handle, SurfaceMessage::Destroy);
        }
    }

    fn is_window(&self, handle: SurfaceHandle) -> bool {
        self.state.borrow().alive.contains(&handle)
    }

    fn pump(&mut self, handle: SurfaceHandle) -> Result<bool> {
        // Drain what is queued now; messages posted by handlers wait for the next pump
        let pending: Vec<_> = {
            let mut state = self.state.borrow_mut();
            state.pump_calls += 1;
            state.queue.drain(..).collect()
        };

        let mut processed = false;
        for (target, event) in pending {
            processed |= target == handle;
            match event {
                MockEvent::Message(message) => {
                    route_message(target, message);
                }
                MockEvent::Close => {
                    let was_alive = {
                        let mut state = self.state.borrow_mut();
                        let before = state.alive.len();
                        state.alive.retain(|h| *h != target);
                        if before != state.alive.len() {
                            state.closing.push(target);
                        }
                        before != state.alive.len()
                    };
                    if was_alive {
                        route_message(target, SurfaceMessage::Destroy);
                    }
                }
            }
        }
        Ok(processed)
    }

    fn request_redraw(&self, handle: SurfaceHandle) {
        let mut state = self.state.borrow_mut();
        state.redraw_requests += 1;
        state.queue.push_back((handle, MockEvent::Message(SurfaceMessage::Paint)));
    }

    fn raw_handles(&self, handle: SurfaceHandle) -> Result<(RawDisplayHandle, RawWindowHandle)> {
        let state = self.state.borrow();
        if !state.alive.contains(&handle) && !state.closing.contains(&handle) {
            return Err(Error::InvalidResource(format!("Window {:?} does not exist", handle)));
        }
        Ok((
            RawDisplayHandle::Web(WebDisplayHandle::new()),
            RawWindowHandle::Web(WebWindowHandle::new(handle.0 as u32)),
        ))
    }
}
