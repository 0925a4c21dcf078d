#![cfg(test)]

use crate::fixtures::{float_n, texture, uniform};
use program_reflection::layout::{ParameterCategory, ProgramLayout, TypeKind, TypeLayout, VarLayout};
use program_reflection::reflection::{BindingFlavor, DescriptorClass, ProgramReflection, ReflectionOptions};
use std::sync::Arc;

/// `ILight light`, specialized to a type whose data was laid out after all other parameters.
fn light(pending_data: TypeLayout, pending_uniform: usize, pending_srv: usize) -> Arc<VarLayout> {
	let interface = TypeLayout::new(TypeKind::Interface)
		.with_size(ParameterCategory::Uniform, 16)
		.with_pending_data_type_layout(Arc::new(pending_data));
	let pending_var = VarLayout::new("pending", Arc::new(TypeLayout::structure("Pending", [])))
		.with_offset(ParameterCategory::Uniform, pending_uniform)
		.with_offset(ParameterCategory::ShaderResource, pending_srv);
	let specialized = TypeLayout {
		element_type_layout: Some(Arc::new(interface)),
		specialized_pending_var_layout: Some(Arc::new(pending_var)),
		..TypeLayout::new(TypeKind::Specialized)
	};
	Arc::new(VarLayout::new("light", Arc::new(specialized)))
}

#[test]
fn test_pending_resources_merge_into_enclosing_block() -> anyhow::Result<()> {
	let pending_data =
		TypeLayout::structure("PointLight", [texture("shadow", 0)]).with_size(ParameterCategory::ShaderResource, 1);
	let layout = ProgramLayout::new()
		.with_global(texture("albedo", 0))
		.with_global(light(pending_data, 0, 5));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	let block = reflection.default_parameter_block();
	assert_eq!(block.interface_sub_object_range_indices(), &[1]);
	let binding = &block.resource_ranges()[1];
	assert_eq!(binding.flavor, BindingFlavor::Interface);

	let sub = binding.sub_object.as_ref().unwrap();
	assert_eq!(sub.resource_ranges()[0].reg_index, 5);
	assert!(!sub.has_default_constant_buffer());
	let interface = reflection.find_member("light").unwrap().ty().as_interface().unwrap();
	assert!(Arc::ptr_eq(interface.parameter_block().unwrap(), sub));

	assert_eq!(block.descriptor_sets().len(), 1);
	let srv = &block.descriptor_sets()[0];
	let registers = srv.layout.ranges().iter().map(|r| r.base_reg_index).collect::<Vec<_>>();
	assert_eq!(registers, vec![0, 5]);
	assert_eq!(srv.sub_objects[0].resource_range_index_of_sub_object, 1);
	Ok(())
}

#[test]
fn test_pending_uniforms_skip_default_constant_buffer() -> anyhow::Result<()> {
	let pending_data = TypeLayout::structure("SpotLight", [uniform("angle", float_n(1), 0), texture("cookie", 0)])
		.with_size(ParameterCategory::Uniform, 4)
		.with_size(ParameterCategory::ShaderResource, 1);
	let layout = ProgramLayout::new().with_global(light(pending_data, 32, 2));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	let block = reflection.default_parameter_block();
	let sub = block.resource_ranges()[0].sub_object.as_ref().unwrap();
	assert_eq!(sub.descriptor_sets().len(), 2);
	assert_eq!(block.resource_ranges()[0].reg_index, 32);

	// the pending uniform data lives in the enclosing block's constant buffer
	let classes = block
		.descriptor_sets()
		.iter()
		.flat_map(|set| set.layout.ranges())
		.map(|range| range.descriptor_type.class())
		.collect::<Vec<_>>();
	assert_eq!(classes, vec![DescriptorClass::Srv]);
	Ok(())
}
