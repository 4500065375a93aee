/// VulkanPipelineState - graphics pipeline for dynamic rendering
///
/// Fixed state: triangle list, no culling, no blending, one color
/// attachment. Viewport and scissor are dynamic.

use ash::vk;
use std::any::Any;
use std::ffi::CString;
use std::sync::Arc;
use swapframe_engine::swapframe::{Error, Result};
use swapframe_engine::swapframe::graphics::{PipelineState, PipelineStateDesc, ShaderDesc, ShaderStage};
use swapframe_engine::{engine_bail_warn, engine_err, engine_error};

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{format_to_vk, vertex_input_layout};

pub struct VulkanPipelineState {
    ctx: Arc<GpuContext>,
    pipeline: vk::Pipeline,
    layout: vk::PipelineLayout,
}

impl VulkanPipelineState {
    pub(crate) fn new(ctx: Arc<GpuContext>, desc: &PipelineStateDesc) -> Result<Self> {
        if desc.vertex_shader.stage != ShaderStage::Vertex || desc.fragment_shader.stage != ShaderStage::Fragment {
            engine_bail_warn!("swapframe::vulkan", "Pipeline needs a vertex and a fragment shader, got {:?} and {:?}",
                desc.vertex_shader.stage, desc.fragment_shader.stage);
        }
        let vertex_entry = entry_point(&desc.vertex_shader)?;
        let fragment_entry = entry_point(&desc.fragment_shader)?;

        let device = &ctx.device;
        unsafe {
            let vertex_module = create_shader_module(device, &desc.vertex_shader)?;
            let fragment_module = match create_shader_module(device, &desc.fragment_shader) {
                Ok(module) => module,
                Err(e) => {
                    device.destroy_shader_module(vertex_module, None);
                    return Err(e);
                }
            };

            let result = Self::create_pipeline(
                device,
                desc,
                [(vertex_module, vertex_entry.as_c_str()), (fragment_module, fragment_entry.as_c_str())],
            );

            device.destroy_shader_module(vertex_module, None);
            device.destroy_shader_module(fragment_module, None);

            let (pipeline, layout) = result?;
            Ok(Self { ctx, pipeline, layout })
        }
    }

    unsafe fn create_pipeline(
        device: &ash::Device,
        desc: &PipelineStateDesc,
        [(vertex_module, vertex_entry), (fragment_module, fragment_entry)]: [(vk::ShaderModule, &std::ffi::CStr); 2],
    ) -> Result<(vk::Pipeline, vk::PipelineLayout)> {
        let layout = unsafe { device.create_pipeline_layout(&vk::PipelineLayoutCreateInfo::default(), None) }
            .map_err(|e| engine_err!("swapframe::vulkan", "Failed to create pipeline layout: {:?}", e))?;

        let stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vertex_module)
                .name(vertex_entry),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(fragment_module)
                .name(fragment_entry),
        ];

        let (binding, attributes) = vertex_input_layout();
        let bindings = [binding];
        let vertex_input = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&bindings)
            .vertex_attribute_descriptions(&attributes);
        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST);
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewport_count(1)
            .scissor_count(1);
        let rasterization = vk::PipelineRasterizationStateCreateInfo::default()
            .polygon_mode(vk::PolygonMode::FILL)
            .cull_mode(vk::CullModeFlags::NONE)
            .front_face(vk::FrontFace::CLOCKWISE)
            .line_width(1.0);
        let multisample = vk::PipelineMultisampleStateCreateInfo::default()
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);
        let blend_attachments = [vk::PipelineColorBlendAttachmentState::default()
            .blend_enable(false)
            .color_write_mask(vk::ColorComponentFlags::RGBA)];
        let color_blend = vk::PipelineColorBlendStateCreateInfo::default()
            .attachments(&blend_attachments);
        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::default()
            .dynamic_states(&dynamic_states);

        let color_formats = [format_to_vk(desc.render_target_format)];
        let mut rendering_info = vk::PipelineRenderingCreateInfo::default()
            .color_attachment_formats(&color_formats);

        let create_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&stages)
            .vertex_input_state(&vertex_input)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization)
            .multisample_state(&multisample)
            .color_blend_state(&color_blend)
            .dynamic_state(&dynamic_state)
            .layout(layout)
            .push_next(&mut rendering_info);

        match unsafe { device.create_graphics_pipelines(vk::PipelineCache::null(), &[create_info], None) } {
            Ok(pipelines) => match pipelines.into_iter().next() {
                Some(pipeline) => Ok((pipeline, layout)),
                None => {
                    unsafe { device.destroy_pipeline_layout(layout, None) };
                    Err(engine_err!("swapframe::vulkan", "Driver returned no pipeline"))
                }
            },
            Err((_, e)) => {
                unsafe { device.destroy_pipeline_layout(layout, None) };
                engine_error!("swapframe::vulkan", "Failed to create graphics pipeline: {:?}", e);
                Err(Error::BackendError(format!("Failed to create graphics pipeline: {:?}", e)))
            }
        }
    }

    pub(crate) fn pipeline(&self) -> vk::Pipeline {
        self.pipeline
    }
}

fn entry_point(shader: &ShaderDesc) -> Result<CString> {
    CString::new(shader.entry_point.as_str()).map_err(|_| {
        Error::InvalidResource(format!("Invalid shader entry point '{}'", shader.entry_point))
    })
}

unsafe fn create_shader_module(device: &ash::Device, shader: &ShaderDesc) -> Result<vk::ShaderModule> {
    if shader.spirv.is_empty() {
        return Err(Error::InvalidResource(format!("{:?} shader has no SPIR-V code", shader.stage)));
    }
    let create_info = vk::ShaderModuleCreateInfo::default().code(&shader.spirv);
    unsafe { device.create_shader_module(&create_info, None) }
        .map_err(|e| engine_err!("swapframe::vulkan", "Failed to create {:?} shader module: {:?}", shader.stage, e))
}

impl PipelineState for VulkanPipelineState {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanPipelineState {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_pipeline(self.pipeline, None);
            self.ctx.device.destroy_pipeline_layout(self.layout, None);
        }
    }
}
