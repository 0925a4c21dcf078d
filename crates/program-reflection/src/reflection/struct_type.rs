use crate::reflection::{
	DescriptorCounts, Diagnostics, ReflectionDiagnostic, ReflectionType, ReflectionTypeKind, ReflectionVar,
	ResourceRange, ResourceRanges,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A struct with named members in declaration order.
#[derive(Debug)]
pub struct StructType {
	name: String,
	members: Vec<Arc<ReflectionVar>>,
	name_to_index: FxHashMap<String, usize>,
}

impl StructType {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn members(&self) -> &[Arc<ReflectionVar>] {
		&self.members
	}

	pub fn member_index(&self, name: &str) -> Option<usize> {
		self.name_to_index.get(name).copied()
	}

	pub fn member(&self, name: &str) -> Option<&Arc<ReflectionVar>> {
		self.member_index(name).map(|index| &self.members[index])
	}
}

impl PartialEq for StructType {
	fn eq(&self, other: &Self) -> bool {
		self.members == other.members
	}
}

/// Result of [`StructTypeBuilder::add_member`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddMember {
	/// The member was appended at this index.
	Added(usize),
	/// An identical member of this name already exists at this index, nothing changed.
	Duplicate(usize),
	/// A different member of this name already exists at this index and is kept, the new one was dropped.
	Conflict(usize),
}

impl AddMember {
	pub fn is_added(&self) -> bool {
		matches!(self, AddMember::Added(_))
	}
}

/// Builds a [`StructType`] member by member. Entry points of one group share a struct, so members may be added more
/// than once.
#[derive(Debug)]
pub struct StructTypeBuilder {
	name: String,
	byte_size: usize,
	members: Vec<Arc<ReflectionVar>>,
	name_to_index: FxHashMap<String, usize>,
	resource_ranges: ResourceRanges,
	descriptor_counts: DescriptorCounts,
}

impl StructTypeBuilder {
	pub fn new(name: &str, byte_size: usize) -> Self {
		Self {
			name: name.to_string(),
			byte_size,
			members: Vec::new(),
			name_to_index: FxHashMap::default(),
			resource_ranges: ResourceRanges::new(),
			descriptor_counts: DescriptorCounts::ZERO,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn resource_range_count(&self) -> usize {
		self.resource_ranges.len()
	}

	pub fn set_byte_size(&mut self, byte_size: usize) {
		self.byte_size = byte_size;
	}

	/// Appends `var` and its resource ranges, rebasing each range onto the running per-class descriptor count.
	/// Redeclaring a name with a different type or offset reports [`ReflectionDiagnostic::DeclarationMismatch`].
	pub fn add_member(&mut self, var: Arc<ReflectionVar>, diagnostics: &mut Diagnostics) -> AddMember {
		if let Some(&index) = self.name_to_index.get(var.name()) {
			// the range index depends on when the member was declared, it does not make declarations differ
			let existing = &self.members[index];
			return if existing.ty() == var.ty() && existing.offset().byte_offset == var.offset().byte_offset {
				AddMember::Duplicate(index)
			} else {
				diagnostics.report(ReflectionDiagnostic::DeclarationMismatch {
					variable: var.name().to_string(),
					struct_name: self.name.clone(),
				});
				AddMember::Conflict(index)
			};
		}

		for range in var.ty().resource_ranges() {
			let base_index = self
				.descriptor_counts
				.allocate(range.descriptor_type.class(), range.count);
			self.resource_ranges.push(ResourceRange {
				descriptor_type: range.descriptor_type,
				count: range.count,
				base_index,
			});
		}

		let index = self.members.len();
		self.name_to_index.insert(var.name().to_string(), index);
		self.members.push(var);
		AddMember::Added(index)
	}

	pub fn build(self) -> Arc<ReflectionType> {
		ReflectionType::new(
			ReflectionTypeKind::Struct(StructType {
				name: self.name,
				members: self.members,
				name_to_index: self.name_to_index,
			}),
			self.byte_size,
			self.resource_ranges,
		)
	}
}
