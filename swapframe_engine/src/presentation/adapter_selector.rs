/// Adapter selection

use crate::error::{Error, Result};
use crate::graphics_device::{AdapterDesc, FeatureLevel, GpuPreference, GraphicsFactory};
use crate::{engine_debug, engine_error, engine_info};

/// Pick the first adapter able to run the pipeline
///
/// Adapters are visited in the factory's preference order (high-performance
/// first when `require_high_performance` is set). Software adapters are
/// skipped unless `allow_warp` is set. The feature-level check does not
/// create a device.
///
/// # Errors
///
/// `Error::NoSuitableAdapter` when nothing qualifies. Callers treat it as fatal.
pub fn select_adapter(
    factory: &dyn GraphicsFactory,
    require_high_performance: bool,
    allow_warp: bool,
) -> Result<AdapterDesc> {
    let preference = if require_high_performance {
        GpuPreference::HighPerformance
    } else {
        GpuPreference::Unspecified
    };

    for adapter in factory.enumerate_adapters(preference)? {
        if adapter.is_software() && !allow_warp {
            engine_debug!("swapframe::select_adapter", "Skipping software adapter '{}'", adapter.name);
            continue;
        }
        if !factory.check_feature_level(&adapter, FeatureLevel::REQUIRED) {
            engine_debug!(
                "swapframe::select_adapter",
                "Skipping adapter '{}': feature level {}.{} not supported",
                adapter.name,
                FeatureLevel::REQUIRED.major,
                FeatureLevel::REQUIRED.minor
            );
            continue;
        }

        engine_info!("swapframe::select_adapter", "Selected adapter '{}' ({:?})", adapter.name, adapter.kind);
        return Ok(adapter);
    }

    engine_error!("swapframe::select_adapter", "No adapter supports the required feature level");
    Err(Error::NoSuitableAdapter)
}

#[cfg(test)]
#[path = "adapter_selector_tests.rs"]
mod tests;
