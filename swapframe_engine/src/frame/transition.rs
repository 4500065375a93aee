/// Back buffer state machine (Presentable <-> RenderTarget)
///
/// A back buffer can only be rendered into after `begin_render` and only
/// handed back to the swap chain after `end_render`. Each call records
/// exactly one barrier, so a frame that compiles is a frame whose
/// transitions are balanced.

use std::marker::PhantomData;
use crate::error::Result;
use crate::graphics_device::{CommandList, ResourceId, ResourceState, TransitionBarrier};

/// Owned by the presentation engine
#[derive(Debug, Clone, Copy)]
pub struct Presentable;

/// Bound as a color attachment
#[derive(Debug, Clone, Copy)]
pub struct RenderTarget;

/// Compile-time buffer state
pub trait BufferState {
    const STATE: ResourceState;
}

impl BufferState for Presentable {
    const STATE: ResourceState = ResourceState::Presentable;
}

impl BufferState for RenderTarget {
    const STATE: ResourceState = ResourceState::RenderTarget;
}

/// Swap chain buffer tagged with its current usage state
#[derive(Debug)]
#[must_use = "a back buffer must be transitioned back to Presentable before submission"]
pub struct BackBuffer<S: BufferState> {
    index: u32,
    resource: ResourceId,
    _state: PhantomData<S>,
}

impl<S: BufferState> BackBuffer<S> {
    /// Swap chain index of the buffer
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn state(&self) -> ResourceState {
        S::STATE
    }

    fn transition<T: BufferState>(self, list: &mut dyn CommandList) -> Result<BackBuffer<T>> {
        list.resource_barrier(&[TransitionBarrier::new(self.resource, S::STATE, T::STATE)])?;
        Ok(BackBuffer {
            index: self.index,
            resource: self.resource,
            _state: PhantomData,
        })
    }
}

impl BackBuffer<Presentable> {
    /// Wrap a buffer the swap chain just handed out
    pub fn new(index: u32, resource: ResourceId) -> Self {
        Self {
            index,
            resource,
            _state: PhantomData,
        }
    }

    /// Record the Presentable -> RenderTarget barrier
    pub fn begin_render(self, list: &mut dyn CommandList) -> Result<BackBuffer<RenderTarget>> {
        self.transition(list)
    }
}

impl BackBuffer<RenderTarget> {
    /// Record the RenderTarget -> Presentable barrier
    pub fn end_render(self, list: &mut dyn CommandList) -> Result<BackBuffer<Presentable>> {
        self.transition(list)
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
