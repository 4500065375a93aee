/// Content provider - shaders, geometry and draw parameters supplied by the caller

use crate::error::Result;
use crate::graphics_device::{ShaderDesc, Vertex};

/// GPU content created once by the presentation pipeline
#[derive(Debug, Clone)]
pub struct ContentDesc {
    pub vertex_shader: ShaderDesc,
    pub fragment_shader: ShaderDesc,
    /// Vertices in the fixed position + color layout
    pub vertices: Vec<Vertex>,
}

/// Per-frame draw parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawParams {
    /// Number of vertices to draw, 0 for the whole vertex buffer
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            vertex_count: 0,
            instance_count: 1,
        }
    }
}

/// Supplies what the frame recorder draws after the clear
pub trait ContentProvider {
    /// Called once during pipeline initialization
    ///
    /// `None` means clear-only frames.
    fn load_assets(&mut self) -> Result<Option<ContentDesc>>;

    /// Clear color override, `None` to use the configured one
    fn clear_color(&self) -> Option<[f32; 4]> {
        None
    }

    fn draw_params(&self) -> DrawParams {
        DrawParams::default()
    }
}

/// Clear-only content
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContent;

impl ContentProvider for NoContent {
    fn load_assets(&mut self) -> Result<Option<ContentDesc>> {
        Ok(None)
    }
}
