use crate::layout::ShaderStages;
use crate::reflection::{DescriptorRange, DescriptorType};
use ash::vk::{DescriptorSetLayoutBinding, ShaderStageFlags};

impl DescriptorType {
	pub fn to_ash_descriptor_type(&self) -> ash::vk::DescriptorType {
		match self {
			DescriptorType::Cbv => ash::vk::DescriptorType::UNIFORM_BUFFER,
			DescriptorType::TextureSrv => ash::vk::DescriptorType::SAMPLED_IMAGE,
			DescriptorType::TextureUav => ash::vk::DescriptorType::STORAGE_IMAGE,
			DescriptorType::RawBufferSrv
			| DescriptorType::RawBufferUav
			| DescriptorType::StructuredBufferSrv
			| DescriptorType::StructuredBufferUav => ash::vk::DescriptorType::STORAGE_BUFFER,
			DescriptorType::TypedBufferSrv => ash::vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
			DescriptorType::TypedBufferUav => ash::vk::DescriptorType::STORAGE_TEXEL_BUFFER,
			DescriptorType::Sampler => ash::vk::DescriptorType::SAMPLER,
		}
	}
}

impl ShaderStages {
	pub fn to_ash_shader_stage_flags(&self) -> ShaderStageFlags {
		let mut out = ShaderStageFlags::empty();
		for (stage, flag) in [
			(ShaderStages::VERTEX, ShaderStageFlags::VERTEX),
			(ShaderStages::HULL, ShaderStageFlags::TESSELLATION_CONTROL),
			(ShaderStages::DOMAIN, ShaderStageFlags::TESSELLATION_EVALUATION),
			(ShaderStages::GEOMETRY, ShaderStageFlags::GEOMETRY),
			(ShaderStages::FRAGMENT, ShaderStageFlags::FRAGMENT),
			(ShaderStages::COMPUTE, ShaderStageFlags::COMPUTE),
			(ShaderStages::RAY_GENERATION, ShaderStageFlags::RAYGEN_KHR),
			(ShaderStages::INTERSECTION, ShaderStageFlags::INTERSECTION_KHR),
			(ShaderStages::ANY_HIT, ShaderStageFlags::ANY_HIT_KHR),
			(ShaderStages::CLOSEST_HIT, ShaderStageFlags::CLOSEST_HIT_KHR),
			(ShaderStages::MISS, ShaderStageFlags::MISS_KHR),
			(ShaderStages::CALLABLE, ShaderStageFlags::CALLABLE_KHR),
			(ShaderStages::TASK, ShaderStageFlags::TASK_EXT),
			(ShaderStages::MESH, ShaderStageFlags::MESH_EXT),
		] {
			if self.contains(stage) {
				out |= flag;
			}
		}
		out
	}
}

impl DescriptorRange {
	/// Vulkan has no register spaces, the base register index of a range is its binding.
	pub fn to_ash_descriptor_set_layout_binding(&self, stages: ShaderStages) -> DescriptorSetLayoutBinding<'static> {
		DescriptorSetLayoutBinding::default()
			.binding(self.base_reg_index)
			.descriptor_type(self.descriptor_type.to_ash_descriptor_type())
			.descriptor_count(self.count)
			.stage_flags(stages.to_ash_shader_stage_flags())
	}
}
