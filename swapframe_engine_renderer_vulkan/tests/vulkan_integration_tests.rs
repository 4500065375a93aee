//! Integration tests for the Vulkan backend
//!
//! These tests require a Vulkan 1.3 capable driver and are ignored by default.
//! Run with: cargo test -p swapframe_engine_renderer_vulkan -- --ignored --test-threads=1

use serial_test::serial;
use swapframe_engine::swapframe::{Config, Error};
use swapframe_engine::swapframe::frame::FrameSynchronizer;
use swapframe_engine::swapframe::graphics::{
    FeatureLevel, GpuPreference, GraphicsDevice, GraphicsFactory, Vertex,
};
use swapframe_engine::swapframe::presentation::{select_adapter, NoContent, PresentationPipeline};
use swapframe_engine::swapframe::surface::{PumpResult, Surface, WinitPlatform};
use swapframe_engine_renderer_vulkan::swapframe::VulkanFactory;

// ============================================================================
// HELPERS
// ============================================================================

fn config() -> Config {
    Config {
        app_name: "Swapframe Vulkan Tests".to_string(),
        enable_validation: false,
        ..Config::default()
    }
}

fn create_device(factory: &VulkanFactory) -> Box<dyn GraphicsDevice> {
    let adapter = select_adapter(factory, true, true).expect("no Vulkan 1.3 adapter");
    factory
        .create_device(&adapter, FeatureLevel::REQUIRED)
        .expect("device creation failed")
}

// ============================================================================
// FACTORY
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_factory_enumerates_adapters() {
    let factory = VulkanFactory::new(&config()).unwrap();

    let adapters = factory.enumerate_adapters(GpuPreference::Unspecified).unwrap();
    assert!(!adapters.is_empty());
    for (i, adapter) in adapters.iter().enumerate() {
        assert_eq!(adapter.index, i as u32);
        assert!(!adapter.name.is_empty());
    }

    // Same adapters, software ones last
    let fast = factory.enumerate_adapters(GpuPreference::HighPerformance).unwrap();
    assert_eq!(fast.len(), adapters.len());
    if let Some(first_software) = fast.iter().position(|a| a.is_software()) {
        assert!(fast[first_software..].iter().all(|a| a.is_software()));
    }
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_feature_level_probe() {
    let factory = VulkanFactory::new(&config()).unwrap();
    let adapters = factory.enumerate_adapters(GpuPreference::Unspecified).unwrap();

    assert!(adapters.iter().any(|a| factory.check_feature_level(a, FeatureLevel::REQUIRED)));
    assert!(adapters
        .iter()
        .all(|a| !factory.check_feature_level(a, FeatureLevel { major: 9, minor: 0 })));
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_select_adapter_never_returns_software() {
    let factory = VulkanFactory::new(&config()).unwrap();
    match select_adapter(&factory, true, false) {
        Ok(adapter) => assert!(!adapter.is_software()),
        Err(e) => assert_eq!(e, Error::NoSuitableAdapter),
    }
}

// ============================================================================
// DEVICE OBJECTS (no window)
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_fence_signal_and_wait() {
    let factory = VulkanFactory::new(&config()).unwrap();
    let device = create_device(&factory);
    let queue = device.create_command_queue().unwrap();

    let mut synchronizer = FrameSynchronizer::new(&*device).unwrap();
    assert_eq!(synchronizer.next_value(), 1);

    assert_eq!(synchronizer.wait_for_idle(&*queue).unwrap(), 1);
    assert_eq!(synchronizer.wait_for_idle(&*queue).unwrap(), 2);
    assert!(synchronizer.completed_value().unwrap() >= 2);
    assert_eq!(synchronizer.next_value(), 3);
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_command_list_created_closed() {
    let factory = VulkanFactory::new(&config()).unwrap();
    let device = create_device(&factory);
    let allocator = device.create_command_allocator().unwrap();
    let mut list = device.create_command_list(&*allocator, None).unwrap();

    assert!(!list.is_recording());
    assert!(list.close().is_err());

    list.reset(&*allocator, None).unwrap();
    assert!(list.is_recording());
    list.close().unwrap();
    assert!(!list.is_recording());
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_vertex_buffer_upload() {
    let factory = VulkanFactory::new(&config()).unwrap();
    let device = create_device(&factory);

    let vertices = [
        Vertex::new([0.0, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
        Vertex::new([0.5, -0.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
        Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
    ];
    let buffer = device.create_vertex_buffer(&vertices).unwrap();
    assert_eq!(buffer.vertex_count(), 3);

    assert!(matches!(device.create_vertex_buffer(&[]), Err(Error::InvalidResource(_))));
}

// ============================================================================
// WINDOWED FRAMES
// ============================================================================

/// Only one winit event loop may exist per process, so every windowed check
/// lives in this single test.
#[test]
#[ignore] // Requires GPU and a display
#[serial]
fn test_present_frames_to_window() {
    let config = config();
    let mut surface = Surface::new(&config, Box::new(WinitPlatform::new().unwrap())).unwrap();
    surface.initialize().unwrap();

    let factory = VulkanFactory::new(&config).unwrap();
    let mut pipeline = PresentationPipeline::new(&config, Box::new(factory), Box::new(NoContent));
    pipeline.initialize(&surface).unwrap();
    assert!(pipeline.is_initialized());
    assert_eq!(pipeline.next_fence_value(), Some(1));

    for frame in 0..10u64 {
        if surface.pump_step().unwrap() == PumpResult::Closed {
            break;
        }
        pipeline.render().unwrap();

        // The frame's fence value has been reached before render returns
        assert_eq!(pipeline.next_fence_value(), Some(frame + 2));
        assert!(pipeline.completed_fence_value().unwrap() >= frame + 1);
        assert!(pipeline.frame_index() < 2);
    }

    pipeline.shutdown().unwrap();
    assert!(!pipeline.is_initialized());
    pipeline.shutdown().unwrap();
}
