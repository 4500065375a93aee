/// GPU resource identifiers and state transitions

/// Backend handle of a GPU image (e.g. a `VkImage`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u64);

/// Usage state of a swap chain buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Owned by the presentation engine
    Presentable,
    /// Bound as a color attachment
    RenderTarget,
}

/// A declared change of usage state for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionBarrier {
    pub resource: ResourceId,
    pub before: ResourceState,
    pub after: ResourceState,
}

impl TransitionBarrier {
    pub fn new(resource: ResourceId, before: ResourceState, after: ResourceState) -> Self {
        Self { resource, before, after }
    }
}
