/// Command queue trait - submission and queue-side fence signals

use std::any::Any;
use crate::error::Result;
use crate::graphics_device::{CommandList, Fence};

/// Direct (graphics) command queue
pub trait CommandQueue: Send + Sync {
    /// Submit closed command lists for execution, in order
    fn execute_command_lists(&self, lists: &[&dyn CommandList]) -> Result<()>;

    /// Set `fence` to `value` once all previously submitted work retires
    fn signal(&self, fence: &dyn Fence, value: u64) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}
