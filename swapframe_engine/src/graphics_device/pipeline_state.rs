/// Pipeline state, shader and vertex buffer types

use std::any::Any;
use bytemuck::{Pod, Zeroable};
use crate::graphics_device::TextureFormat;

/// Fixed vertex layout: position followed by RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    /// Byte stride of one vertex
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;
    /// Byte offset of `color`
    pub const COLOR_OFFSET: u32 = 12;

    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Compiled shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    pub stage: ShaderStage,
    pub entry_point: String,
    /// SPIR-V words
    pub spirv: Vec<u32>,
}

/// Graphics pipeline creation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStateDesc {
    pub vertex_shader: ShaderDesc,
    pub fragment_shader: ShaderDesc,
    /// Format of the render target the pipeline draws into
    pub render_target_format: TextureFormat,
}

/// Compiled graphics pipeline (shaders, vertex layout, fixed-function state)
pub trait PipelineState: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// GPU vertex buffer using the `Vertex` layout
pub trait VertexBuffer: Send + Sync {
    fn vertex_count(&self) -> u32;

    fn as_any(&self) -> &dyn Any;
}
