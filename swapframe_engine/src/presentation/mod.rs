/// Presentation module - adapter selection, content and the presentation pipeline

pub mod adapter_selector;
pub mod content;
pub mod pipeline;

pub use adapter_selector::select_adapter;
pub use content::{ContentDesc, ContentProvider, DrawParams, NoContent};
pub use pipeline::PresentationPipeline;
