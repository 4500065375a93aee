//! Unit tests for Surface, driven by the mock window platform

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::Config;
use crate::error::Error;
use crate::input::InputSink;
use crate::surface::message::{PumpResult, SurfaceMessage};
use crate::surface::mock_platform::{MockPlatform, MockPlatformControl};
use crate::surface::registry;
use crate::surface::Surface;

// ============================================================================
// TEST HELPERS
// ============================================================================

#[derive(Default)]
struct RecordingSink {
    downs: Vec<u8>,
    ups: Vec<u8>,
}

impl InputSink for RecordingSink {
    fn on_key_down(&mut self, code: u8) {
        self.downs.push(code);
    }

    fn on_key_up(&mut self, code: u8) {
        self.ups.push(code);
    }
}

fn config(class: &str) -> Config {
    Config {
        window_class: class.to_string(),
        ..Config::default()
    }
}

fn create_surface(class: &str) -> (Surface, MockPlatformControl) {
    let (platform, control) = MockPlatform::new();
    let surface = Surface::new(&config(class), Box::new(platform)).unwrap();
    (surface, control)
}

// ============================================================================
// CONSTRUCTION AND INITIALIZATION
// ============================================================================

#[test]
fn test_new_registers_class_and_keeps_dimensions() {
    let (surface, _control) = create_surface("SurfaceNew");
    assert!(registry::is_class_registered("SurfaceNew"));
    assert_eq!(surface.width(), 800);
    assert_eq!(surface.height(), 600);
    assert!(surface.handle().is_none());
}

#[test]
fn test_new_rejects_empty_size() {
    let (platform, _control) = MockPlatform::new();
    let cfg = Config { width: 0, ..config("SurfaceZero") };
    assert!(matches!(
        Surface::new(&cfg, Box::new(platform)),
        Err(Error::WindowCreationFailed(_))
    ));
}

#[test]
fn test_initialize_creates_and_shows_window() {
    let (mut surface, control) = create_surface("SurfaceInit");
    surface.initialize().unwrap();

    let handle = surface.handle().unwrap();
    let state = control.state();
    assert_eq!(state.created.len(), 1);
    assert_eq!(state.created[0].title, "Hello World");
    assert_eq!(state.created[0].class_name, "SurfaceInit");
    assert_eq!((state.created[0].width, state.created[0].height), (800, 600));
    assert_eq!(state.shown, vec![handle]);
    assert!(registry::is_attached(handle));
}

#[test]
fn test_initialize_twice_is_a_noop() {
    let (mut surface, control) = create_surface("SurfaceInitTwice");
    surface.initialize().unwrap();
    let handle = surface.handle();

    surface.initialize().unwrap();
    assert_eq!(surface.handle(), handle);
    assert_eq!(control.state().created.len(), 1);
}

#[test]
fn test_initialize_failure_is_fatal() {
    let (mut surface, control) = create_surface("SurfaceInitFail");
    control.fail_next_create();

    let result = surface.initialize();
    assert!(matches!(result, Err(Error::WindowCreationFailed(_))));
    assert!(surface.handle().is_none());
}

#[test]
fn test_pump_before_initialize_fails() {
    let (mut surface, _control) = create_surface("SurfaceEarlyPump");
    assert!(matches!(surface.pump_step(), Err(Error::InvalidResource(_))));
}

// ============================================================================
// PUMP AND CLOSE
// ============================================================================

#[test]
fn test_pump_continues_while_window_alive() {
    let (mut surface, control) = create_surface("SurfaceAlive");
    surface.initialize().unwrap();
    let handle = surface.handle().unwrap();

    for i in 0..10 {
        if i % 3 == 0 {
            control.post(handle, SurfaceMessage::Other);
        }
        assert_eq!(surface.pump_step().unwrap(), PumpResult::Continue);
    }
    assert_eq!(control.state().pump_calls, 10);
}

#[test]
fn test_closed_reported_once_then_idempotent() {
    let (mut surface, control) = create_surface("SurfaceClose");
    surface.initialize().unwrap();
    let handle = surface.handle().unwrap();

    assert_eq!(surface.pump_step().unwrap(), PumpResult::Continue);

    // The step that dispatches the close reports it and unregisters
    control.close(handle);
    assert_eq!(surface.pump_step().unwrap(), PumpResult::Closed);
    assert!(surface.handle().is_none());
    assert!(surface.is_closed());
    assert!(!registry::is_class_registered("SurfaceClose"));
    assert!(!registry::is_attached(handle));

    // Later steps stay closed and never touch the platform or the class again
    let pumps = control.state().pump_calls;
    assert_eq!(surface.pump_step().unwrap(), PumpResult::Closed);
    assert_eq!(control.state().pump_calls, pumps);
    assert!(!registry::is_class_registered("SurfaceClose"));
}

#[test]
fn test_closed_window_released_on_drop() {
    let (mut surface, control) = create_surface("SurfaceCloseRelease");
    surface.initialize().unwrap();
    let handle = surface.handle().unwrap();

    control.close(handle);
    assert_eq!(surface.pump_step().unwrap(), PumpResult::Closed);

    // Still allocated until the surface goes away
    assert!(control.state().destroyed.is_empty());
    assert_eq!(control.closing(), vec![handle]);

    drop(surface);
    assert_eq!(control.state().destroyed, vec![handle]);
    assert!(control.closing().is_empty());
}

#[test]
fn test_initialize_after_close_fails() {
    let (mut surface, control) = create_surface("SurfaceReinit");
    surface.initialize().unwrap();
    control.close(surface.handle().unwrap());
    assert_eq!(surface.pump_step().unwrap(), PumpResult::Closed);

    assert!(matches!(surface.initialize(), Err(Error::WindowCreationFailed(_))));
}

// ============================================================================
// INPUT AND PAINT DISPATCH
// ============================================================================

#[test]
fn test_key_down_reaches_sink_before_pump_returns() {
    let (mut surface, control) = create_surface("SurfaceKeys");
    surface.initialize().unwrap();
    let handle = surface.handle().unwrap();

    let sink = Rc::new(RefCell::new(RecordingSink::default()));
    surface.set_input_sink(sink.clone());

    control.post(handle, SurfaceMessage::KeyDown(0x41));
    assert_eq!(surface.pump_step().unwrap(), PumpResult::Continue);

    assert_eq!(sink.borrow().downs, vec![0x41]);
    assert!(sink.borrow().ups.is_empty());
}

#[test]
fn test_key_up_and_cleared_sink() {
    let (mut surface, control) = create_surface("SurfaceKeyUp");
    surface.initialize().unwrap();
    let handle = surface.handle().unwrap();

    let sink = Rc::new(RefCell::new(RecordingSink::default()));
    surface.set_input_sink(sink.clone());
    control.post(handle, SurfaceMessage::KeyUp(0x20));
    surface.pump_step().unwrap();

    surface.clear_input_sink();
    control.post(handle, SurfaceMessage::KeyDown(0x41));
    surface.pump_step().unwrap();

    assert_eq!(sink.borrow().ups, vec![0x20]);
    assert!(sink.borrow().downs.is_empty());
}

#[test]
fn test_paint_invokes_render_callback() {
    let (mut surface, control) = create_surface("SurfacePaint");
    surface.initialize().unwrap();

    let frames = Rc::new(RefCell::new(0u32));
    let counter = frames.clone();
    surface.set_render_callback(Box::new(move || {
        *counter.borrow_mut() += 1;
        Ok(())
    }));

    surface.request_redraw();
    surface.pump_step().unwrap();
    assert_eq!(*frames.borrow(), 1);
    assert_eq!(control.state().redraw_requests, 1);

    // No redraw requested, no paint
    surface.pump_step().unwrap();
    assert_eq!(*frames.borrow(), 1);
}

#[test]
fn test_render_callback_error_surfaces_from_pump() {
    let (mut surface, _control) = create_surface("SurfacePaintError");
    surface.initialize().unwrap();
    surface.set_render_callback(Box::new(|| Err(Error::DeviceLost("queue".to_string()))));

    surface.request_redraw();
    assert_eq!(surface.pump_step(), Err(Error::DeviceLost("queue".to_string())));
}

// ============================================================================
// TARGET AND DROP
// ============================================================================

#[test]
fn test_target_carries_dimensions() {
    let (mut surface, _control) = create_surface("SurfaceTarget");
    assert!(surface.target().is_err());

    surface.initialize().unwrap();
    let target = surface.target().unwrap();
    assert_eq!((target.width, target.height), (800, 600));
}

#[test]
fn test_drop_destroys_window_and_unregisters() {
    let (mut surface, control) = create_surface("SurfaceDrop");
    surface.initialize().unwrap();
    let handle = surface.handle().unwrap();

    drop(surface);
    assert_eq!(control.state().destroyed, vec![handle]);
    assert!(!registry::is_class_registered("SurfaceDrop"));
    assert!(!registry::is_attached(handle));
}
