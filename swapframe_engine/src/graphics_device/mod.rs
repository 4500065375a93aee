/// Graphics device module - backend traits and types

// Module declarations
pub mod adapter;
pub mod command_list;
pub mod command_queue;
pub mod descriptor_heap;
pub mod factory;
pub mod fence;
pub mod graphics_device;
pub mod pipeline_state;
pub mod resource;
pub mod swap_chain;

// Re-exports
pub use adapter::*;
pub use command_list::*;
pub use command_queue::*;
pub use descriptor_heap::*;
pub use factory::*;
pub use fence::*;
pub use graphics_device::*;
pub use pipeline_state::*;
pub use resource::*;
pub use swap_chain::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
