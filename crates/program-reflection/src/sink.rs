//! Consumers of finalized binding layouts, such as pipeline layout builders, implement [`BindingSink`] and are driven
//! by [`ProgramReflection::visit_bindings`](crate::reflection::ProgramReflection::visit_bindings).

use crate::reflection::{
	BindingFlavor, DefaultConstantBufferBindingInfo, DescriptorRange, DescriptorSetInfo, ParameterBlockReflection,
};

/// The independently bound scope a binding belongs to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum BindingScope {
	Global,
	/// a parameter block nested within the global scope, `path` is the dotted name of the block's variable
	ParameterBlock { path: String },
	EntryPointGroup { group_index: u32 },
}

pub trait BindingSink {
	fn descriptor_set(&mut self, scope: &BindingScope, set_index: u32, set: &DescriptorSetInfo);

	/// A root descriptor, which is also part of the descriptor set reported for it.
	fn root_descriptor(&mut self, scope: &BindingScope, range: &DescriptorRange) {
		let _ = (scope, range);
	}

	/// The default constant buffer of a scope bound as root constants.
	fn root_constants(&mut self, scope: &BindingScope, binding: &DefaultConstantBufferBindingInfo, byte_size: usize) {
		let _ = (scope, binding, byte_size);
	}
}

/// Reports the descriptor sets, root descriptors and root constants of `block`, then recurses into every parameter
/// block nested within it, including those nested within constant buffers.
pub fn visit_parameter_block(block: &ParameterBlockReflection, scope: &BindingScope, sink: &mut impl BindingSink) {
	for (set_index, set) in block.descriptor_sets().iter().enumerate() {
		sink.descriptor_set(scope, set_index as u32, set);
	}

	for &range_index in block.root_descriptor_range_indices() {
		let binding = &block.resource_ranges()[range_index];
		let range = &block.element_type().resource_ranges()[range_index];
		sink.root_descriptor(
			scope,
			&DescriptorRange {
				descriptor_type: range.descriptor_type,
				base_reg_index: binding.reg_index,
				count: range.count,
				reg_space: binding.reg_space,
			},
		);
	}

	if let Some(binding) = block.default_constant_buffer().filter(|cb| cb.use_root_constants) {
		sink.root_constants(scope, binding, block.element_type().byte_size());
	}

	let prefix = match scope {
		BindingScope::ParameterBlock { path } => path.as_str(),
		_ => "",
	};
	visit_nested_blocks(block, prefix, sink);
}

fn visit_nested_blocks(block: &ParameterBlockReflection, prefix: &str, sink: &mut impl BindingSink) {
	for (range_index, binding) in block.resource_ranges().iter().enumerate() {
		let Some(sub_object) = &binding.sub_object else {
			continue;
		};
		let name = block.member_path_for_range(range_index).unwrap_or_default();
		let path = match prefix {
			"" => name,
			prefix => format!("{prefix}.{name}"),
		};
		match binding.flavor {
			BindingFlavor::ParameterBlock => {
				visit_parameter_block(sub_object, &BindingScope::ParameterBlock { path }, sink);
			}
			// merged into this block, but may contain parameter blocks of their own
			BindingFlavor::ConstantBuffer | BindingFlavor::Interface => visit_nested_blocks(sub_object, &path, sink),
			BindingFlavor::Simple | BindingFlavor::RootDescriptor => {}
		}
	}
}
