//! Unit tests for config.rs

use crate::config::{Config, RenderTrigger};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.title, "Hello World");
    assert_eq!(config.width, 800);
    assert_eq!(config.height, 600);
    assert!(!config.use_warp_device);
    assert!(config.high_performance_adapter);
    assert_eq!(config.render_trigger, RenderTrigger::Loop);
    assert_eq!(config.enable_validation, cfg!(debug_assertions));
}

#[test]
fn test_from_args_warp_switches() {
    for switch in ["-warp", "/warp", "--warp", "/WARP", "-Warp"] {
        let config = Config::from_args(["swapframe_demo", switch]);
        assert!(config.use_warp_device, "switch {} not recognised", switch);
    }
}

#[test]
fn test_from_args_ignores_unknown_arguments() {
    let config = Config::from_args(["swapframe_demo", "warp", "-fast", "/w"]);
    assert!(!config.use_warp_device);
}

#[test]
fn test_from_args_empty() {
    let config = Config::from_args(Vec::<String>::new());
    assert!(!config.use_warp_device);
    assert_eq!(config.window_class, "SwapframeWindowClass");
}

#[test]
fn test_apply_args_keeps_other_fields() {
    let mut config = Config {
        width: 1280,
        height: 720,
        ..Config::default()
    };
    config.apply_args(["--warp"]);
    assert!(config.use_warp_device);
    assert_eq!((config.width, config.height), (1280, 720));
}
