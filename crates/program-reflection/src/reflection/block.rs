use crate::layout::TypeLayout;
use crate::reflection::{
	Backend, DescriptorCounts, DescriptorType, Diagnostics, ParameterBlockSlot, ReflectionError, ReflectionOptions,
	ReflectionPath, ReflectionType, ReflectionVar, ShaderVarOffset, StructTypeBuilder, TypeReflector, TypedShaderVarOffset,
};
use smallvec::SmallVec;
use std::sync::Arc;

/// How a resource range is bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BindingFlavor {
	/// through a descriptor set
	Simple,
	/// directly as a root descriptor, outside of any descriptor set
	RootDescriptor,
	/// a constant buffer whose contents are merged into the enclosing block's descriptor sets
	ConstantBuffer,
	/// a parameter block with descriptor sets of its own
	ParameterBlock,
	/// an interface whose specialized contents are merged into the enclosing block's descriptor sets
	Interface,
}

/// Binding of one resource range of a finalized [`ParameterBlockReflection`].
#[derive(Clone, Debug)]
pub struct ResourceRangeBindingInfo {
	pub reg_index: u32,
	pub reg_space: u32,
	pub flavor: BindingFlavor,
	pub sub_object: Option<Arc<ParameterBlockReflection>>,
	/// `None` for ranges whose contents live in a sub-object and for rejected root descriptors
	pub descriptor_set_index: Option<u32>,
}

/// Binding of the implicit constant buffer holding a block's uniform data.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DefaultConstantBufferBindingInfo {
	pub reg_index: u32,
	pub reg_space: u32,
	pub use_root_constants: bool,
	/// `None` when bound as root constants
	pub descriptor_set_index: Option<u32>,
}

/// A range of descriptors within a [`DescriptorSetLayout`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DescriptorRange {
	pub descriptor_type: DescriptorType,
	pub base_reg_index: u32,
	pub count: u32,
	pub reg_space: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DescriptorSetLayout {
	ranges: SmallVec<[DescriptorRange; 4]>,
}

impl DescriptorSetLayout {
	pub fn add_range(&mut self, range: DescriptorRange) {
		self.ranges.push(range);
	}

	pub fn ranges(&self) -> &[DescriptorRange] {
		&self.ranges
	}

	pub fn range(&self, index: usize) -> Option<&DescriptorRange> {
		self.ranges.get(index)
	}

	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}
}

/// Records that a [`DescriptorSetInfo`] holds ranges merged from a set of a nested block.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubObjectInfo {
	pub resource_range_index_of_sub_object: usize,
	pub set_index_in_sub_object: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DescriptorSetInfo {
	pub layout: DescriptorSetLayout,
	/// resource ranges of the owning block bound directly through this set
	pub resource_range_indices: Vec<usize>,
	pub sub_objects: Vec<SubObjectInfo>,
}

/// A sub-block created while reflecting a constant buffer, parameter block or interface. It is finalized together
/// with its enclosing block, which then fills `slot`.
#[derive(Debug)]
pub struct PendingSubObject {
	pub builder: ParameterBlockBuilder,
	pub slot: ParameterBlockSlot,
}

/// Binding of one resource range of a [`ParameterBlockBuilder`], before finalization.
#[derive(Debug)]
pub struct PendingRangeBinding {
	pub reg_index: u32,
	pub reg_space: u32,
	pub flavor: BindingFlavor,
	pub sub_object: Option<Box<PendingSubObject>>,
}

impl PendingRangeBinding {
	pub fn new(reg_index: u32, reg_space: u32) -> Self {
		Self {
			reg_index,
			reg_space,
			flavor: BindingFlavor::Simple,
			sub_object: None,
		}
	}
}

/// Bindings of resource ranges in declaration order, as collected while reflecting a type.
pub type RangeBindings = Vec<PendingRangeBinding>;

/// A [`ParameterBlockReflection`] under construction. Once the element type is set and one binding was added per
/// resource range of the element type, [`Self::finalize`] turns it into an immutable reflection.
#[derive(Debug, Default)]
pub struct ParameterBlockBuilder {
	element_type: Option<Arc<ReflectionType>>,
	resource_ranges: RangeBindings,
	default_constant_buffer: DefaultConstantBufferBindingInfo,
}

impl ParameterBlockBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Must be called exactly once.
	pub fn set_element_type(&mut self, element_type: Arc<ReflectionType>) {
		assert!(self.element_type.is_none(), "element type must only be set once");
		self.element_type = Some(element_type);
	}

	pub fn element_type(&self) -> Option<&Arc<ReflectionType>> {
		self.element_type.as_ref()
	}

	pub fn add_resource_range(&mut self, binding: PendingRangeBinding) {
		self.resource_ranges.push(binding);
	}

	pub fn add_resource_ranges(&mut self, bindings: RangeBindings) {
		self.resource_ranges.extend(bindings);
	}

	pub fn resource_range_count(&self) -> usize {
		self.resource_ranges.len()
	}

	pub fn set_default_constant_buffer(&mut self, info: DefaultConstantBufferBindingInfo) {
		self.default_constant_buffer = info;
	}

	/// A block has a default constant buffer iff its element type has uniform data.
	pub fn has_default_constant_buffer(&self) -> bool {
		self.element_type.as_ref().is_some_and(|ty| ty.byte_size() != 0)
	}

	pub(crate) fn into_parts(
		self,
	) -> (
		Option<Arc<ReflectionType>>,
		RangeBindings,
		DefaultConstantBufferBindingInfo,
	) {
		(self.element_type, self.resource_ranges, self.default_constant_buffer)
	}
}

/// An independently bindable scope of shader parameters with finalized descriptor sets.
#[derive(Debug)]
pub struct ParameterBlockReflection {
	pub(crate) element_type: Arc<ReflectionType>,
	pub(crate) resource_ranges: Vec<ResourceRangeBindingInfo>,
	pub(crate) default_constant_buffer: Option<DefaultConstantBufferBindingInfo>,
	pub(crate) descriptor_sets: Vec<DescriptorSetInfo>,
	pub(crate) root_descriptor_range_indices: Vec<usize>,
	pub(crate) constant_buffer_sub_object_range_indices: Vec<usize>,
	pub(crate) parameter_block_sub_object_range_indices: Vec<usize>,
	pub(crate) interface_sub_object_range_indices: Vec<usize>,
}

impl ParameterBlockReflection {
	/// Reflects a standalone type into a new block, using the register offsets the compiler assigned.
	pub fn from_type_layout(
		type_layout: &Arc<TypeLayout>,
		options: &ReflectionOptions,
	) -> Result<Arc<Self>, ReflectionError> {
		let mut diagnostics = Diagnostics::new();
		let mut ranges = RangeBindings::new();
		let element_type = TypeReflector::new(options, &mut diagnostics)
			.reflect_type(type_layout, &mut ranges, &ReflectionPath::root())?
			.unwrap_or_else(|| StructTypeBuilder::new("", 0).build());

		let mut builder = ParameterBlockBuilder::new();
		builder.set_element_type(element_type);
		builder.add_resource_ranges(ranges);
		Ok(builder.finalize(&mut diagnostics))
	}

	/// Builds a block from an already reflected type, assigning registers in space 0 as `options.backend` would:
	/// per-class counters on [`Backend::D3D12`], one binding per range on [`Backend::Vulkan`]. The default constant
	/// buffer, if any, takes the first register.
	pub fn from_element_type(element_type: Arc<ReflectionType>, options: &ReflectionOptions) -> Arc<Self> {
		let mut counts = DescriptorCounts::ZERO;
		let mut binding_count = 0;
		let mut allocate = |descriptor_type: DescriptorType, count: u32| match options.backend {
			Backend::D3D12 => counts.allocate(descriptor_type.class(), count),
			Backend::Vulkan => {
				binding_count += 1;
				binding_count - 1
			}
		};

		let mut builder = ParameterBlockBuilder::new();
		if element_type.byte_size() != 0 {
			builder.set_default_constant_buffer(DefaultConstantBufferBindingInfo {
				reg_index: allocate(DescriptorType::Cbv, 1),
				..DefaultConstantBufferBindingInfo::default()
			});
		}
		for range in element_type.resource_ranges() {
			let reg_index = allocate(range.descriptor_type, range.count);
			builder.add_resource_range(PendingRangeBinding::new(reg_index, 0));
		}
		builder.set_element_type(element_type);
		builder.finalize(&mut Diagnostics::new())
	}

	pub fn element_type(&self) -> &Arc<ReflectionType> {
		&self.element_type
	}

	pub fn resource_ranges(&self) -> &[ResourceRangeBindingInfo] {
		&self.resource_ranges
	}

	pub fn resource_range(&self, index: usize) -> Option<&ResourceRangeBindingInfo> {
		self.resource_ranges.get(index)
	}

	pub fn resource_range_count(&self) -> usize {
		self.resource_ranges.len()
	}

	pub fn has_default_constant_buffer(&self) -> bool {
		self.default_constant_buffer.is_some()
	}

	pub fn default_constant_buffer(&self) -> Option<&DefaultConstantBufferBindingInfo> {
		self.default_constant_buffer.as_ref()
	}

	pub fn descriptor_sets(&self) -> &[DescriptorSetInfo] {
		&self.descriptor_sets
	}

	pub fn descriptor_set(&self, index: usize) -> Option<&DescriptorSetInfo> {
		self.descriptor_sets.get(index)
	}

	pub fn root_descriptor_range_indices(&self) -> &[usize] {
		&self.root_descriptor_range_indices
	}

	pub fn constant_buffer_sub_object_range_indices(&self) -> &[usize] {
		&self.constant_buffer_sub_object_range_indices
	}

	pub fn parameter_block_sub_object_range_indices(&self) -> &[usize] {
		&self.parameter_block_sub_object_range_indices
	}

	pub fn interface_sub_object_range_indices(&self) -> &[usize] {
		&self.interface_sub_object_range_indices
	}

	pub fn find_member(&self, name: &str) -> Option<&Arc<ReflectionVar>> {
		self.element_type.find_member(name)
	}

	/// A member that is a resource, or an array of resources.
	pub fn resource(&self, name: &str) -> Option<&Arc<ReflectionVar>> {
		self.find_member(name)
			.filter(|var| var.ty().unwrap_array().as_resource().is_some())
	}

	/// The offset of the resource `name`, to be used when binding it.
	pub fn resource_binding(&self, name: &str) -> Option<TypedShaderVarOffset> {
		self.resource(name)
			.map(|var| TypedShaderVarOffset::new(var.ty().clone(), var.offset()))
	}

	/// The root of this block's element type.
	pub fn root_offset(&self) -> TypedShaderVarOffset {
		TypedShaderVarOffset::new(self.element_type.clone(), ShaderVarOffset::ZERO)
	}

	/// The member whose resource ranges include `range_index`.
	pub fn member_for_range(&self, range_index: usize) -> Option<&Arc<ReflectionVar>> {
		member_containing_range(&self.element_type, range_index)
	}

	/// Dotted path from the top-level member down to the innermost struct member owning `range_index`, such as
	/// `material.textures`.
	pub fn member_path_for_range(&self, range_index: usize) -> Option<String> {
		let mut var = self.member_for_range(range_index)?;
		let mut path = var.name().to_string();
		let mut range_index = range_index - var.offset().range_index as usize;
		while let Some(member) = member_containing_range(var.ty().unwrap_array(), range_index) {
			path.push('.');
			path.push_str(member.name());
			range_index -= member.offset().range_index as usize;
			var = member;
		}
		Some(path)
	}
}

fn member_containing_range(ty: &ReflectionType, range_index: usize) -> Option<&Arc<ReflectionVar>> {
	ty.as_struct()?.members().iter().find(|var| {
		let first = var.offset().range_index as usize;
		(first..first + var.ty().resource_range_count()).contains(&range_index)
	})
}
