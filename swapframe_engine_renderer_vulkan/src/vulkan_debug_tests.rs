//! Unit tests for validation message accounting
//!
//! The counters are process-wide, so these tests run serially.

use ash::vk;
use serial_test::serial;
use swapframe_engine::swapframe::log::LogSeverity;
use crate::vulkan_debug::*;

#[test]
fn test_message_severity_mapping() {
    type Flags = vk::DebugUtilsMessageSeverityFlagsEXT;
    assert_eq!(message_severity(Flags::ERROR), LogSeverity::Error);
    assert_eq!(message_severity(Flags::WARNING), LogSeverity::Warn);
    assert_eq!(message_severity(Flags::INFO), LogSeverity::Info);
    assert_eq!(message_severity(Flags::VERBOSE), LogSeverity::Trace);
    // The most severe bit wins
    assert_eq!(message_severity(Flags::WARNING | Flags::ERROR), LogSeverity::Error);
}

#[test]
#[serial]
fn test_record_message_counts_by_severity() {
    reset_validation_stats();

    record_message(LogSeverity::Error, "VUID-a");
    record_message(LogSeverity::Warn, "VUID-b");
    record_message(LogSeverity::Warn, "VUID-c");
    record_message(LogSeverity::Trace, "loader");

    let stats = validation_stats();
    assert_eq!(stats, ValidationStats { errors: 1, warnings: 2, info: 0, verbose: 1 });
    assert_eq!(stats.total(), 4);
}

#[test]
#[serial]
fn test_record_message_tracks_repeats() {
    reset_validation_stats();

    assert_eq!(record_message(LogSeverity::Error, "same"), 1);
    assert_eq!(record_message(LogSeverity::Error, "same"), 2);
    assert_eq!(record_message(LogSeverity::Error, "other"), 1);
    assert_eq!(validation_stats().errors, 3);
}

#[test]
#[serial]
fn test_reset_clears_counters() {
    record_message(LogSeverity::Info, "something");
    reset_validation_stats();
    assert_eq!(validation_stats().total(), 0);
    assert_eq!(record_message(LogSeverity::Info, "something"), 1);
}

#[test]
#[serial]
fn test_repeat_tracking_is_bounded() {
    reset_validation_stats();

    for i in 0..MAX_TRACKED_MESSAGES + 10 {
        record_message(LogSeverity::Warn, &format!("object 0x{:x} leaked", i));
    }

    // Past the limit new messages are counted but not remembered
    let untracked = format!("object 0x{:x} leaked", MAX_TRACKED_MESSAGES + 5);
    assert_eq!(record_message(LogSeverity::Warn, &untracked), 1);
    assert_eq!(record_message(LogSeverity::Warn, "object 0x0 leaked"), 2);
    assert_eq!(validation_stats().warnings, MAX_TRACKED_MESSAGES as u32 + 12);
}
