#![cfg(test)]

use crate::fixtures::{parameter_block, rw_structured_buffer, texture, RecordingSink};
use program_reflection::layout::{ParameterCategory, ProgramLayout, TypeLayout, VarLayout};
use program_reflection::reflection::{
	BindingFlavor, DescriptorType, ProgramReflection, ReflectionDiagnostic, ReflectionOptions,
	ROOT_DESCRIPTOR_ATTRIBUTE,
};
use program_reflection::sink::BindingScope;
use std::sync::Arc;

/// `struct Bar { [root] RWStructuredBuffer<float> buf; }`
fn bar() -> TypeLayout {
	let buf = rw_structured_buffer("buf", 0).with_user_attribute(ROOT_DESCRIPTOR_ATTRIBUTE);
	TypeLayout::structure("Bar", [Arc::new(buf)]).with_size(ParameterCategory::UnorderedAccess, 1)
}

#[test]
fn test_root_descriptor_in_parameter_block() -> anyhow::Result<()> {
	let layout = ProgramLayout::new().with_global(parameter_block("bar", bar(), 1));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;
	assert!(reflection.diagnostics().is_empty());

	let global = reflection.default_parameter_block();
	assert_eq!(global.resource_ranges()[0].flavor, BindingFlavor::ParameterBlock);
	assert_eq!(global.parameter_block_sub_object_range_indices(), &[0]);
	// the block is bound on its own
	assert!(global.descriptor_sets().is_empty());

	let bar = reflection.parameter_block("bar").unwrap();
	assert_eq!(bar.root_descriptor_range_indices(), &[0]);
	let buf = &bar.resource_ranges()[0];
	assert_eq!(buf.flavor, BindingFlavor::RootDescriptor);
	assert_eq!((buf.reg_index, buf.reg_space), (0, 1));
	assert_eq!(buf.descriptor_set_index, Some(0));
	assert_eq!(
		bar.element_type().resource_ranges()[0].descriptor_type,
		DescriptorType::StructuredBufferUav
	);
	Ok(())
}

#[test]
fn test_registers_restart_in_block_space() -> anyhow::Result<()> {
	let element = TypeLayout::structure("Block", [texture("inner", 0)]).with_size(ParameterCategory::ShaderResource, 1);
	let layout = ProgramLayout::new()
		.with_global(texture("outer", 3))
		.with_global(parameter_block("block", element, 2));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	let outer = &reflection.default_parameter_block().resource_ranges()[0];
	assert_eq!((outer.reg_index, outer.reg_space), (3, 0));
	let block = &reflection.default_parameter_block().resource_ranges()[1];
	assert_eq!((block.reg_index, block.reg_space), (0, 2));
	let inner = &reflection.parameter_block("block").unwrap().resource_ranges()[0];
	assert_eq!((inner.reg_index, inner.reg_space), (0, 2));
	Ok(())
}

#[test]
fn test_visit_nested_blocks() -> anyhow::Result<()> {
	let inner = TypeLayout::structure("Inner", [texture("t", 0)]).with_size(ParameterCategory::ShaderResource, 1);
	let outer = TypeLayout::structure("Outer", [parameter_block("inner", inner, 1)])
		.with_size(ParameterCategory::RegisterSpace, 1);
	let layout = ProgramLayout::new()
		.with_global(texture("g", 0))
		.with_global(parameter_block("outer", outer, 1))
		.with_global(parameter_block("bar", bar(), 3));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	let mut sink = RecordingSink::default();
	reflection.visit_bindings(&mut sink);

	assert_eq!(sink.sets_of(&BindingScope::Global).len(), 1);
	let outer_scope = BindingScope::ParameterBlock {
		path: "outer".to_string(),
	};
	assert!(sink.sets_of(&outer_scope).is_empty());

	let inner_scope = BindingScope::ParameterBlock {
		path: "outer.inner".to_string(),
	};
	let inner_sets = sink.sets_of(&inner_scope);
	assert_eq!(inner_sets.len(), 1);
	// spaces accumulate across nested blocks
	assert_eq!(inner_sets[0].layout.ranges()[0].reg_space, 2);

	let bar_scope = BindingScope::ParameterBlock { path: "bar".to_string() };
	assert_eq!(sink.sets_of(&bar_scope).len(), 1);
	assert_eq!(sink.root_descriptors.len(), 1);
	let (scope, range) = &sink.root_descriptors[0];
	assert_eq!(scope, &bar_scope);
	assert_eq!((range.base_reg_index, range.reg_space, range.count), (0, 3, 1));
	assert!(sink.root_constants.is_empty());
	Ok(())
}

/// `struct S { [root] RWStructuredBuffer<float> b; }; S arr[4];`
#[test]
fn test_root_descriptor_array_stays_unbound() -> anyhow::Result<()> {
	let b = rw_structured_buffer("b", 0).with_user_attribute(ROOT_DESCRIPTOR_ATTRIBUTE);
	let s = TypeLayout::structure("S", [Arc::new(b)]).with_size(ParameterCategory::UnorderedAccess, 1);
	let arr = VarLayout::new("arr", Arc::new(TypeLayout::array(Arc::new(s), 4)));
	let layout = ProgramLayout::new().with_global(Arc::new(arr));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	assert_eq!(
		reflection.diagnostics(),
		&[ReflectionDiagnostic::RootDescriptorArray {
			reg_index: 0,
			reg_space: 0,
			count: 4,
		}]
	);
	let global = reflection.default_parameter_block();
	let range = &global.resource_ranges()[0];
	assert_eq!(range.flavor, BindingFlavor::RootDescriptor);
	assert_eq!(range.descriptor_set_index, None);
	assert!(global.root_descriptor_range_indices().is_empty());
	assert!(global.descriptor_sets().is_empty());

	let mut sink = RecordingSink::default();
	reflection.visit_bindings(&mut sink);
	assert!(sink.root_descriptors.is_empty());
	Ok(())
}

/// `struct Holder { ParameterBlock<Inner> pb; }; Holder s;`
#[test]
fn test_block_in_struct_member_reports_full_path() -> anyhow::Result<()> {
	let inner = TypeLayout::structure("Inner", [texture("t", 0)]).with_size(ParameterCategory::ShaderResource, 1);
	let holder = TypeLayout::structure("Holder", [parameter_block("pb", inner, 0)])
		.with_size(ParameterCategory::RegisterSpace, 1);
	let s = VarLayout::new("s", Arc::new(holder)).with_offset(ParameterCategory::RegisterSpace, 1);
	let layout = ProgramLayout::new().with_global(texture("g", 0)).with_global(Arc::new(s));
	let reflection = ProgramReflection::create(&layout, ReflectionOptions::default())?;

	let global = reflection.default_parameter_block();
	assert_eq!(global.member_path_for_range(0).as_deref(), Some("g"));
	assert_eq!(global.member_path_for_range(1).as_deref(), Some("s.pb"));
	assert_eq!(global.member_for_range(1).map(|var| var.name()), Some("s"));

	let mut sink = RecordingSink::default();
	reflection.visit_bindings(&mut sink);
	let pb_scope = BindingScope::ParameterBlock {
		path: "s.pb".to_string(),
	};
	let pb_sets = sink.sets_of(&pb_scope);
	assert_eq!(pb_sets.len(), 1);
	assert_eq!(pb_sets[0].layout.ranges()[0].reg_space, 1);
	assert!(sink
		.sets_of(&BindingScope::ParameterBlock { path: "s".to_string() })
		.is_empty());
	Ok(())
}
