#![cfg(test)]

use crate::fixtures::{constant_buffer, float_n, foo, texture, uniform};
use ash::vk::{DescriptorType, ShaderStageFlags};
use program_reflection::layout::{EntryPointLayout, ParameterCategory, ProgramLayout, ShaderStage, TypeLayout, VarLayout};
use program_reflection::platform::ash::AshLayoutCollector;
use program_reflection::reflection::{ProgramReflection, ReflectionOptions};
use program_reflection::sink::BindingScope;
use std::sync::Arc;

/// A compute shader with 6 bytes of uniform parameters, as if followed by a `half`.
fn program() -> ProgramLayout {
	let scope = TypeLayout::structure("main", []).with_size(ParameterCategory::Uniform, 6);
	let compute = EntryPointLayout::new("main", ShaderStage::Compute)
		.with_scope(Arc::new(VarLayout::new("main", Arc::new(scope))))
		.with_parameter(uniform("offset", float_n(1), 0));
	ProgramLayout::new()
		.with_global(constant_buffer("foo", foo(), 0))
		.with_global(texture("tex", 1))
		.with_entry_point(compute)
}

#[test]
fn test_collect_vulkan_layout() -> anyhow::Result<()> {
	let reflection = ProgramReflection::create(&program(), ReflectionOptions::vulkan())?;
	let collector = AshLayoutCollector::collect(&reflection);

	assert_eq!(collector.set_layouts.len(), 2);
	for layout in &collector.set_layouts {
		assert_eq!(layout.scope, BindingScope::Global);
		assert_eq!(layout.bindings.len(), 1);
		assert_eq!(layout.bindings[0].stage_flags, ShaderStageFlags::COMPUTE);
	}
	let tex = &collector.set_layouts[0].bindings[0];
	assert_eq!((tex.binding, tex.descriptor_type), (1, DescriptorType::SAMPLED_IMAGE));
	let foo = &collector.set_layouts[1].bindings[0];
	assert_eq!((foo.binding, foo.descriptor_type), (0, DescriptorType::UNIFORM_BUFFER));

	assert_eq!(collector.push_constant_ranges.len(), 1);
	let push = collector.push_constant_ranges[0];
	assert_eq!((push.offset, push.size), (0, 8));
	assert_eq!(push.stage_flags, ShaderStageFlags::COMPUTE);
	Ok(())
}
