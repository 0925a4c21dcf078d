use crate::reflection::{
	BindingFlavor, DescriptorClass, DescriptorRange, DescriptorSetInfo, DescriptorType, Diagnostics,
	ParameterBlockBuilder, ParameterBlockReflection, PendingSubObject, ReflectionDiagnostic, ResourceRange, ResourceRangeBindingInfo,
	SubObjectInfo,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Descriptors of one class in one register space share a descriptor set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct SetKey {
	reg_space: u32,
	class: DescriptorClass,
}

impl SetKey {
	fn of(range: &DescriptorRange) -> Self {
		Self {
			reg_space: range.reg_space,
			class: range.descriptor_type.class(),
		}
	}
}

/// Assigns descriptor sets to the ranges of one block, allocating sets in first-seen order.
struct BindingFinalizer<'a> {
	diagnostics: &'a mut Diagnostics,
	descriptor_sets: Vec<DescriptorSetInfo>,
	set_indices: FxHashMap<SetKey, u32>,
}

impl BindingFinalizer<'_> {
	fn set_index(&mut self, key: SetKey) -> u32 {
		*self.set_indices.entry(key).or_insert_with(|| {
			let index = self.descriptor_sets.len() as u32;
			self.descriptor_sets.push(DescriptorSetInfo::default());
			log::debug!(
				"allocated descriptor set {} for {:?} descriptors in space {}",
				index,
				key.class,
				key.reg_space
			);
			index
		})
	}

	fn add_range(&mut self, range: DescriptorRange) -> u32 {
		let set_index = self.set_index(SetKey::of(&range));
		self.descriptor_sets[set_index as usize].layout.add_range(range);
		set_index
	}

	/// Binds a range owned by this block directly through a descriptor set.
	fn bind_range(&mut self, range_index: usize, binding: &mut ResourceRangeBindingInfo, range: &ResourceRange) {
		let set_index = self.add_range(DescriptorRange {
			descriptor_type: range.descriptor_type,
			base_reg_index: binding.reg_index,
			count: range.count,
			reg_space: binding.reg_space,
		});
		self.descriptor_sets[set_index as usize]
			.resource_range_indices
			.push(range_index);
		binding.descriptor_set_index = Some(set_index);
	}

	/// Merges all descriptor sets of `sub_object` into the sets of this block, scaling counts by `multiplier` for
	/// arrays of sub-objects. With `skip_default_constant_buffer` the sub-object's own default constant buffer is
	/// left out, as its data lives in this block's default constant buffer.
	fn add_sub_object_resources(
		&mut self,
		range_index: usize,
		sub_object: &ParameterBlockReflection,
		skip_default_constant_buffer: bool,
		multiplier: u32,
	) {
		let default_set = sub_object
			.default_constant_buffer()
			.and_then(|cb| cb.descriptor_set_index);
		for (sub_set_index, sub_set) in sub_object.descriptor_sets().iter().enumerate() {
			let skip = skip_default_constant_buffer && default_set == Some(sub_set_index as u32);
			let mut ranges = sub_set.layout.ranges().iter().skip(skip as usize).peekable();
			let Some(first) = ranges.peek() else {
				continue;
			};

			let set_index = self.set_index(SetKey::of(first));
			let set = &mut self.descriptor_sets[set_index as usize];
			set.sub_objects.push(SubObjectInfo {
				resource_range_index_of_sub_object: range_index,
				set_index_in_sub_object: sub_set_index,
			});
			for range in ranges {
				set.layout.add_range(DescriptorRange {
					count: range.count * multiplier,
					..*range
				});
			}
		}
	}
}

impl ParameterBlockBuilder {
	/// Finalizes all nested sub-objects, then assigns descriptor sets to this block's ranges:
	/// 1. the default constant buffer, unless bound as root constants
	/// 2. simple ranges and root descriptors, in declaration order
	/// 3. the contents of nested constant buffers
	/// 4. nested parameter blocks are only recorded, they are bound separately
	/// 5. the specialized contents of interfaces
	pub fn finalize(self, diagnostics: &mut Diagnostics) -> Arc<ParameterBlockReflection> {
		let (element_type, pending_ranges, mut default_constant_buffer) = self.into_parts();
		let element_type = element_type.expect("element type must be set before finalizing");
		assert_eq!(
			element_type.resource_range_count(),
			pending_ranges.len(),
			"every resource range of the element type must have exactly one binding"
		);

		let mut resource_ranges: Vec<ResourceRangeBindingInfo> = pending_ranges
			.into_iter()
			.map(|pending| {
				let sub_object = pending.sub_object.map(|sub| {
					let PendingSubObject { builder, slot } = *sub;
					let block = builder.finalize(diagnostics);
					slot.fill(block.clone());
					block
				});
				ResourceRangeBindingInfo {
					reg_index: pending.reg_index,
					reg_space: pending.reg_space,
					flavor: pending.flavor,
					sub_object,
					descriptor_set_index: None,
				}
			})
			.collect();

		let mut finalizer = BindingFinalizer {
			diagnostics,
			descriptor_sets: Vec::new(),
			set_indices: FxHashMap::default(),
		};

		let default_constant_buffer = (element_type.byte_size() != 0).then(|| {
			if !default_constant_buffer.use_root_constants {
				default_constant_buffer.descriptor_set_index = Some(finalizer.add_range(DescriptorRange {
					descriptor_type: DescriptorType::Cbv,
					base_reg_index: default_constant_buffer.reg_index,
					count: 1,
					reg_space: default_constant_buffer.reg_space,
				}));
			}
			default_constant_buffer
		});

		let mut root_descriptor_range_indices = Vec::new();
		for (range_index, binding) in resource_ranges.iter_mut().enumerate() {
			let range = &element_type.resource_ranges()[range_index];
			match binding.flavor {
				BindingFlavor::Simple => finalizer.bind_range(range_index, binding, range),
				BindingFlavor::RootDescriptor => {
					if range.count > 1 {
						finalizer.diagnostics.report(ReflectionDiagnostic::RootDescriptorArray {
							reg_index: binding.reg_index,
							reg_space: binding.reg_space,
							count: range.count,
						});
					} else {
						finalizer.bind_range(range_index, binding, range);
						root_descriptor_range_indices.push(range_index);
					}
				}
				_ => {}
			}
		}

		let mut constant_buffer_sub_object_range_indices = Vec::new();
		let mut parameter_block_sub_object_range_indices = Vec::new();
		let mut interface_sub_object_range_indices = Vec::new();
		for (range_index, binding) in resource_ranges.iter().enumerate() {
			if binding.flavor == BindingFlavor::ConstantBuffer {
				constant_buffer_sub_object_range_indices.push(range_index);
				if let Some(sub_object) = &binding.sub_object {
					let count = element_type.resource_ranges()[range_index].count;
					finalizer.add_sub_object_resources(range_index, sub_object, false, count);
				}
			}
		}
		for (range_index, binding) in resource_ranges.iter().enumerate() {
			if binding.flavor == BindingFlavor::ParameterBlock {
				parameter_block_sub_object_range_indices.push(range_index);
			}
		}
		for (range_index, binding) in resource_ranges.iter().enumerate() {
			if binding.flavor == BindingFlavor::Interface {
				interface_sub_object_range_indices.push(range_index);
				if let Some(sub_object) = &binding.sub_object {
					let skip = sub_object.has_default_constant_buffer();
					finalizer.add_sub_object_resources(range_index, sub_object, skip, 1);
				}
			}
		}

		Arc::new(ParameterBlockReflection {
			element_type,
			resource_ranges,
			default_constant_buffer,
			descriptor_sets: finalizer.descriptor_sets,
			root_descriptor_range_indices,
			constant_buffer_sub_object_range_indices,
			parameter_block_sub_object_range_indices,
			interface_sub_object_range_indices,
		})
	}
}
