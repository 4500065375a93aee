/// Frame synchronizer - fence-based CPU/GPU pacing
///
/// Full pipeline flush: after each frame the CPU blocks until the GPU has
/// retired everything submitted so far. Frame k+1 is therefore never
/// recorded while frame k still executes.

use crate::error::Result;
use crate::graphics_device::{CommandQueue, Fence, FenceEvent, GraphicsDevice};
use crate::engine_trace;

pub struct FrameSynchronizer {
    fence: Box<dyn Fence>,
    event: Box<dyn FenceEvent>,
    /// Value the next `wait_for_idle` signals
    next_value: u64,
}

impl FrameSynchronizer {
    /// Create the fence (at 0) and its wait event
    pub fn new(device: &dyn GraphicsDevice) -> Result<Self> {
        let fence = device.create_fence(0)?;
        let event = device.create_fence_event()?;
        Ok(Self {
            fence,
            event,
            next_value: 1,
        })
    }

    /// Signal the next fence value on `queue` and block until the GPU reaches it
    ///
    /// Returns the value that was signaled. There is no timeout.
    pub fn wait_for_idle(&mut self, queue: &dyn CommandQueue) -> Result<u64> {
        let value = self.next_value;
        queue.signal(&*self.fence, value)?;
        self.next_value += 1;

        if self.fence.completed_value()? < value {
            engine_trace!("swapframe::FrameSynchronizer", "Waiting for fence value {}", value);
            self.fence.set_event_on_completion(value, &*self.event)?;
            self.event.wait()?;
        }
        Ok(value)
    }

    /// Value the next wait will signal
    pub fn next_value(&self) -> u64 {
        self.next_value
    }

    /// Highest value the GPU has reached
    pub fn completed_value(&self) -> Result<u64> {
        self.fence.completed_value()
    }
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
