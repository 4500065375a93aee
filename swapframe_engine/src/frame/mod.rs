/// Frame module - per-frame command recording and CPU/GPU pacing

pub mod recorder;
pub mod synchronizer;
pub mod transition;

pub use recorder::{DrawPayload, FrameRecorder, FrameTarget};
pub use synchronizer::FrameSynchronizer;
pub use transition::{BackBuffer, BufferState, Presentable, RenderTarget};
