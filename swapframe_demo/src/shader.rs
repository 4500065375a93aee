/// WGSL to SPIR-V compilation through naga

use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{ShaderDesc, ShaderStage};
use swapframe_engine::engine_error;

/// Parse, validate and translate one entry point of a WGSL module
pub fn compile_wgsl(source: &str, stage: ShaderStage, entry_point: &str) -> Result<ShaderDesc> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        engine_error!("swapframe::demo", "WGSL parse error: {}", e.emit_to_string(source));
        Error::InvalidResource(format!("WGSL parse error: {}", e))
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    let info = validator.validate(&module).map_err(|e| {
        engine_error!("swapframe::demo", "WGSL validation error: {}", e);
        Error::InvalidResource(format!("WGSL validation error: {}", e))
    })?;

    let pipeline_options = naga::back::spv::PipelineOptions {
        shader_stage: match stage {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        },
        entry_point: entry_point.to_string(),
    };
    let spirv = naga::back::spv::write_vec(
        &module,
        &info,
        &naga::back::spv::Options::default(),
        Some(&pipeline_options),
    )
    .map_err(|e| {
        engine_error!("swapframe::demo", "SPIR-V generation failed for '{}': {}", entry_point, e);
        Error::InvalidResource(format!("SPIR-V generation failed: {}", e))
    })?;

    Ok(ShaderDesc {
        stage,
        entry_point: entry_point.to_string(),
        spirv,
    })
}
