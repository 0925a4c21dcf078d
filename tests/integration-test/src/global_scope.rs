#![cfg(test)]

use crate::fixtures::{constant_buffer, float_n, foo, texture, uniform};
use program_reflection::layout::{ParameterCategory, ProgramLayout, TypeKind, TypeLayout, VarLayout};
use program_reflection::reflection::{
	Backend, BindingFlavor, DescriptorClass, DescriptorType, ParameterBlockReflection, ProgramReflection,
	ReflectionDiagnostic, ReflectionError, ReflectionOptions, RootDescriptorRejection, ResourceKind,
	ShaderVarOffset, SubObjectInfo, TypedShaderVarOffset, ROOT_DESCRIPTOR_ATTRIBUTE,
};
use std::sync::Arc;

fn constant_buffer_and_texture() -> ProgramLayout {
	ProgramLayout::new()
		.with_global(constant_buffer("foo", foo(), 0))
		.with_global(texture("tex", 0))
}

#[test]
fn test_one_set_per_space_and_class() -> anyhow::Result<()> {
	let reflection = ProgramReflection::create(&constant_buffer_and_texture(), ReflectionOptions::default())?;
	let block = reflection.default_parameter_block();
	assert!(!block.has_default_constant_buffer());
	assert_eq!(block.descriptor_sets().len(), 2);

	let class_of = |set: usize| {
		let range = block.descriptor_sets()[set].layout.ranges()[0];
		(range.reg_space, range.descriptor_type.class())
	};
	// simple ranges are bound before the contents of constant buffers are merged
	assert_eq!(class_of(0), (0, DescriptorClass::Srv));
	assert_eq!(class_of(1), (0, DescriptorClass::Cbv));

	let srv_set = &block.descriptor_sets()[0];
	assert_eq!(srv_set.resource_range_indices, vec![1]);
	assert_eq!(block.resource_ranges()[1].descriptor_set_index, Some(0));

	let cbv_set = &block.descriptor_sets()[1];
	assert!(cbv_set.resource_range_indices.is_empty());
	assert_eq!(
		cbv_set.sub_objects,
		vec![SubObjectInfo {
			resource_range_index_of_sub_object: 0,
			set_index_in_sub_object: 0,
		}]
	);
	assert_eq!(block.resource_ranges()[0].flavor, BindingFlavor::ConstantBuffer);
	assert_eq!(block.resource_ranges()[0].descriptor_set_index, None);
	assert_eq!(block.constant_buffer_sub_object_range_indices(), &[0]);
	assert!(reflection.diagnostics().is_empty());
	Ok(())
}

#[test]
fn test_constant_buffer_block() -> anyhow::Result<()> {
	let reflection = ProgramReflection::create(&constant_buffer_and_texture(), ReflectionOptions::default())?;
	let foo = reflection.parameter_block("foo").unwrap();
	assert_eq!(foo.element_type().byte_size(), 8);
	let cb = foo.default_constant_buffer().unwrap();
	assert_eq!((cb.reg_index, cb.reg_space, cb.descriptor_set_index), (0, 0, Some(0)));
	assert_eq!(foo.find_member("b").map(|b| b.offset().byte_offset), Some(4));

	let resource = reflection.resource("foo").unwrap().ty().as_resource().unwrap();
	assert_eq!(resource.kind, ResourceKind::ConstantBuffer);
	assert!(Arc::ptr_eq(resource.parameter_block().unwrap(), foo));
	assert!(reflection.parameter_block("tex").is_none());
	assert!(reflection.parameter_block("missing").is_none());
	assert!(Arc::ptr_eq(
		reflection.parameter_block("").unwrap(),
		reflection.default_parameter_block()
	));
	Ok(())
}

#[test]
fn test_resource_binding() -> anyhow::Result<()> {
	let reflection = ProgramReflection::create(&constant_buffer_and_texture(), ReflectionOptions::default())?;
	let binding = reflection.resource_binding("tex").unwrap();
	assert_eq!(binding.offset().range_index, 1);
	assert_eq!(
		binding.ty().as_resource().map(|r| r.descriptor_type()),
		Some(DescriptorType::TextureSrv)
	);
	let block = reflection.default_parameter_block();
	assert_eq!(block.member_for_range(1).map(|var| var.name()), Some("tex"));
	assert_eq!(
		block.root_offset().member("tex").map(|tex| tex.offset()),
		Some(ShaderVarOffset::new(0, 1))
	);
	Ok(())
}

#[test]
fn test_reflection_is_deterministic() -> anyhow::Result<()> {
	let layout = constant_buffer_and_texture();
	let a = ProgramReflection::create(&layout, ReflectionOptions::default())?;
	let b = ProgramReflection::create(&layout, ReflectionOptions::default())?;
	assert_eq!(
		a.default_parameter_block().descriptor_sets(),
		b.default_parameter_block().descriptor_sets()
	);
	assert_eq!(a.default_parameter_block().element_type(), b.default_parameter_block().element_type());
	Ok(())
}

/// `struct S { float3 v[4]; float w; }` with the array stride the compiler chose.
fn padded_array_struct() -> TypeLayout {
	let array = TypeLayout::array(float_n(3), 4)
		.with_element_stride(ParameterCategory::Uniform, 16)
		.with_size(ParameterCategory::Uniform, 64);
	TypeLayout::structure("S", [uniform("v", Arc::new(array), 0), uniform("w", float_n(1), 64)])
		.with_size(ParameterCategory::Uniform, 68)
}

#[test]
fn test_array_uses_declared_stride() -> anyhow::Result<()> {
	let layout = ProgramLayout::new().with_named_type("S", Arc::new(padded_array_struct()));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;
	let s = reflection.find_type("S").unwrap();
	assert_eq!(s.byte_size(), 68);

	let v = s.find_member("v").unwrap();
	let array = v.ty().as_array().unwrap();
	assert_eq!(array.element_count, 4);
	assert_eq!(array.element_byte_stride, 16);
	assert_eq!(v.ty().byte_size(), 64);
	assert_eq!(array.element_type.as_basic().map(|b| b.to_string()), Some("float3".to_string()));
	assert!(reflection.find_type("T").is_none());
	Ok(())
}

#[test]
fn test_member_by_offset() -> anyhow::Result<()> {
	let layout = ProgramLayout::new().with_named_type("S", Arc::new(padded_array_struct()));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;
	let root = TypedShaderVarOffset::new(reflection.find_type("S").unwrap().clone(), ShaderVarOffset::new(32, 0));

	let w = root.member_by_offset(32 + 64).unwrap();
	assert_eq!(w.offset().byte_offset, 96);
	assert!(w.ty().as_basic().is_some());
	let v = root.member_by_offset(32 + 20).unwrap();
	assert_eq!(v.offset().byte_offset, 32);
	assert!(root.member_by_offset(32 + 68).is_none());
	assert!(root.member_by_offset(0).is_none());
	Ok(())
}

/// `struct Material { float4 color; Texture2D albedo; Texture2D normal; SamplerState sampler; }`
fn material() -> TypeLayout {
	let sampler = Arc::new(VarLayout::new("sampler", Arc::new(TypeLayout::sampler())));
	TypeLayout::structure(
		"Material",
		[uniform("color", float_n(4), 0), texture("albedo", 0), texture("normal", 1), sampler],
	)
	.with_size(ParameterCategory::Uniform, 16)
	.with_size(ParameterCategory::ShaderResource, 2)
	.with_size(ParameterCategory::SamplerState, 1)
}

#[test]
fn test_block_from_element_type() -> anyhow::Result<()> {
	let layout = ProgramLayout::new().with_named_type("Material", Arc::new(material()));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;
	let material = reflection.find_type("Material").unwrap();

	let registers = |block: &ParameterBlockReflection| {
		let cb = block.default_constant_buffer().map(|cb| cb.reg_index);
		let ranges = block.resource_ranges().iter().map(|r| r.reg_index).collect::<Vec<_>>();
		(cb, ranges)
	};

	let d3d12 = ParameterBlockReflection::from_element_type(material.clone(), &ReflectionOptions::default());
	assert_eq!(registers(&d3d12), (Some(0), vec![0, 1, 0]));
	assert_eq!(d3d12.descriptor_sets().len(), 3);

	let options = ReflectionOptions::vulkan();
	assert_eq!(options.backend, Backend::Vulkan);
	let vulkan = ParameterBlockReflection::from_element_type(material.clone(), &options);
	assert_eq!(registers(&vulkan), (Some(0), vec![1, 2, 3]));
	Ok(())
}

#[test]
fn test_illegal_root_descriptor_is_dropped() -> anyhow::Result<()> {
	let root_texture = Arc::new(
		VarLayout::clone(&texture("t", 1)).with_user_attribute(ROOT_DESCRIPTOR_ATTRIBUTE),
	);
	let layout = ProgramLayout::new()
		.with_global(texture("kept", 0))
		.with_global(root_texture);
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	assert!(reflection.find_member("t").is_none());
	assert!(reflection.find_member("kept").is_some());
	assert_eq!(reflection.default_parameter_block().resource_range_count(), 1);
	assert_eq!(
		reflection.diagnostics(),
		&[ReflectionDiagnostic::IllegalRootDescriptor {
			variable: "t".to_string(),
			reason: RootDescriptorRejection::NotABuffer(ResourceKind::Texture),
		}]
	);
	Ok(())
}

#[test]
fn test_unsupported_type_aborts() {
	let texture_buffer = Arc::new(VarLayout::new("tb", Arc::new(TypeLayout::new(TypeKind::TextureBuffer))));
	let layout = ProgramLayout::new().with_global(texture_buffer);
	let result = ProgramReflection::create(&layout, ReflectionOptions::default());
	assert!(matches!(
		result,
		Err(ReflectionError::UnsupportedType {
			kind: TypeKind::TextureBuffer,
			..
		})
	));
}
