/// Triangle content - one vertex-colored triangle drawn over the clear color

use swapframe_engine::swapframe::Result;
use swapframe_engine::swapframe::graphics::{ShaderStage, Vertex};
use swapframe_engine::swapframe::presentation::{ContentDesc, ContentProvider};

use crate::shader::compile_wgsl;

const TRIANGLE_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new([0.0, 0.25, 0.0], [1.0, 0.0, 0.0, 1.0]),
    Vertex::new([0.25, -0.25, 0.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::new([-0.25, -0.25, 0.0], [0.0, 0.0, 1.0, 1.0]),
];

#[derive(Debug, Default)]
pub struct TriangleContent;

impl ContentProvider for TriangleContent {
    fn load_assets(&mut self) -> Result<Option<ContentDesc>> {
        Ok(Some(ContentDesc {
            vertex_shader: compile_wgsl(TRIANGLE_WGSL, ShaderStage::Vertex, "vs_main")?,
            fragment_shader: compile_wgsl(TRIANGLE_WGSL, ShaderStage::Fragment, "fs_main")?,
            vertices: TRIANGLE_VERTICES.to_vec(),
        }))
    }
}
