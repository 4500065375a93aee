/// Validation layer messages - routed to the engine logger and counted
///
/// The messenger itself only exists when the `vulkan-validation` feature is
/// enabled; the statistics are always available (all zero otherwise).

use ash::vk;
use colored::*;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use swapframe_engine::swapframe::log::LogSeverity;

/// Log source of validation messages
pub(crate) const VALIDATION_SOURCE: &str = "swapframe::vulkan::validation";

/// Global validation statistics (thread-safe atomic counters)
static VALIDATION_STATS: ValidationStatsTracker = ValidationStatsTracker::new();

/// Occurrences of each distinct message, to spot repeated ones in the report
static MESSAGE_COUNTS: Mutex<Option<FxHashMap<String, u32>>> = Mutex::new(None);

/// Distinct messages tracked for repeats; later new messages are only counted
pub(crate) const MAX_TRACKED_MESSAGES: usize = 1024;

/// Validation message counts since the instance was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

struct ValidationStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    verbose: AtomicU32,
}

impl ValidationStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            verbose: AtomicU32::new(0),
        }
    }

    fn count(&self, severity: LogSeverity) {
        let counter = match severity {
            LogSeverity::Error => &self.errors,
            LogSeverity::Warn => &self.warnings,
            LogSeverity::Info => &self.info,
            _ => &self.verbose,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self) -> ValidationStats {
        ValidationStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            verbose: self.verbose.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.verbose.store(0, Ordering::Relaxed);
    }
}

/// Current validation statistics
pub fn validation_stats() -> ValidationStats {
    VALIDATION_STATS.get()
}

/// Print a colored summary of the validation messages to stdout
pub fn print_validation_stats_report() {
    let stats = validation_stats();

    if stats.total() == 0 {
        println!("\n{}", "No validation messages".green().bold());
        return;
    }

    println!("\n{}", "=== Validation Statistics Report ===".bright_blue().bold());
    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.verbose > 0 {
        println!("  {} {}", "Verbose:".bright_black(), stats.verbose);
    }
    println!("  {} {}", "Total:".white().bold(), stats.total());

    let repeated = MESSAGE_COUNTS
        .lock()
        .ok()
        .and_then(|counts| counts.as_ref().map(|c| c.values().filter(|&&n| n > 1).count()))
        .unwrap_or(0);
    if repeated > 0 {
        println!("\n  {} message(s) appeared multiple times", repeated);
    }
    println!("{}\n", "====================================".bright_blue().bold());
}

/// Clear the counters (a new instance starts a new report)
pub(crate) fn reset_validation_stats() {
    VALIDATION_STATS.reset();
    if let Ok(mut counts) = MESSAGE_COUNTS.lock() {
        *counts = Some(FxHashMap::default());
    }
}

/// Engine severity of a validation message
pub(crate) fn message_severity(flags: vk::DebugUtilsMessageSeverityFlagsEXT) -> LogSeverity {
    if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        LogSeverity::Error
    } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        LogSeverity::Warn
    } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        LogSeverity::Info
    } else {
        LogSeverity::Trace
    }
}

/// Count one message and return how many times it was seen
pub(crate) fn record_message(severity: LogSeverity, message: &str) -> u32 {
    VALIDATION_STATS.count(severity);
    match MESSAGE_COUNTS.lock() {
        Ok(mut counts) => {
            let counts = counts.get_or_insert_with(FxHashMap::default);
            if let Some(count) = counts.get_mut(message) {
                *count += 1;
                return *count;
            }
            if counts.len() < MAX_TRACKED_MESSAGES {
                counts.insert(message.to_string(), 1);
            }
            1
        }
        Err(_) => 1,
    }
}

/// Messenger create info routing every severity to `vulkan_debug_callback`
#[cfg(feature = "vulkan-validation")]
pub(crate) fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(vulkan_debug_callback))
}

/// Vulkan debug messenger callback
///
/// Called by the validation layers, possibly from driver threads.
#[cfg(feature = "vulkan-validation")]
unsafe extern "system" fn vulkan_debug_callback(
    message_severity_flags: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    use swapframe_engine::{engine_debug, engine_error, engine_info, engine_trace, engine_warn};

    if p_callback_data.is_null() {
        return vk::FALSE;
    }
    let data = unsafe { &*p_callback_data };
    let id = unsafe { data.message_id_name_as_c_str() }
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string());
    let message = unsafe { data.message_as_c_str() }
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "No message".to_string());

    let severity = message_severity(message_severity_flags);
    // Repeats are counted but only logged at trace level
    if record_message(severity, &message) > 1 {
        engine_trace!(VALIDATION_SOURCE, "[{:?}] {} (repeated)", message_type, id);
        return vk::FALSE;
    }

    match severity {
        LogSeverity::Error => engine_error!(VALIDATION_SOURCE, "[{:?}] {}: {}", message_type, id, message),
        LogSeverity::Warn => engine_warn!(VALIDATION_SOURCE, "[{:?}] {}: {}", message_type, id, message),
        LogSeverity::Info => engine_info!(VALIDATION_SOURCE, "[{:?}] {}: {}", message_type, id, message),
        LogSeverity::Debug => engine_debug!(VALIDATION_SOURCE, "[{:?}] {}: {}", message_type, id, message),
        LogSeverity::Trace => engine_trace!(VALIDATION_SOURCE, "[{:?}] {}: {}", message_type, id, message),
    }

    vk::FALSE
}

#[cfg(test)]
#[path = "vulkan_debug_tests.rs"]
mod tests;
