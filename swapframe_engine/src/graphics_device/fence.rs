/// Fence and fence event traits - CPU/GPU synchronization primitives

use std::any::Any;
use crate::error::Result;

/// GPU-visible 64-bit counter
///
/// The completed value never decreases.
pub trait Fence: Send + Sync {
    /// Highest value the GPU has reached
    fn completed_value(&self) -> Result<u64>;

    /// Arm `event` so that it fires once the fence reaches `value`
    fn set_event_on_completion(&self, value: u64, event: &dyn FenceEvent) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

/// OS wait primitive armed by a fence
pub trait FenceEvent: Send + Sync {
    /// Block until the armed fence value is reached
    ///
    /// No timeout: a hung GPU blocks forever. Returns immediately if the
    /// event is not armed.
    fn wait(&self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}
