use crate::layout::ScalarType;
use crate::reflection::{ParameterBlockReflection, ReflectionVar, StructType, TypedShaderVarOffset};
use core::fmt::{Display, Formatter};
use once_cell::sync::OnceCell;
use smallvec::SmallVec;
use static_assertions::const_assert_eq;
use std::sync::Arc;

/// The type of a single descriptor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DescriptorType {
	Cbv,
	TextureSrv,
	TextureUav,
	RawBufferSrv,
	RawBufferUav,
	TypedBufferSrv,
	TypedBufferUav,
	StructuredBufferSrv,
	StructuredBufferUav,
	Sampler,
}

/// The coarse class of a [`DescriptorType`], descriptors of one class share a heap and a register counter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DescriptorClass {
	Cbv,
	Srv,
	Uav,
	Sampler,
}

impl DescriptorType {
	pub const fn class(&self) -> DescriptorClass {
		match self {
			DescriptorType::Cbv => DescriptorClass::Cbv,
			DescriptorType::TextureSrv
			| DescriptorType::RawBufferSrv
			| DescriptorType::TypedBufferSrv
			| DescriptorType::StructuredBufferSrv => DescriptorClass::Srv,
			DescriptorType::TextureUav
			| DescriptorType::RawBufferUav
			| DescriptorType::TypedBufferUav
			| DescriptorType::StructuredBufferUav => DescriptorClass::Uav,
			DescriptorType::Sampler => DescriptorClass::Sampler,
		}
	}
}

/// A contiguous span of `count` descriptors of one type, starting at `base_index` within its parent type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ResourceRange {
	pub descriptor_type: DescriptorType,
	pub count: u32,
	pub base_index: u32,
}

const_assert_eq!(core::mem::size_of::<ResourceRange>(), 12);

pub type ResourceRanges = SmallVec<[ResourceRange; 2]>;

/// A node of the reflected type tree. Types are immutable once built and shared via [`Arc`].
#[derive(Debug)]
pub struct ReflectionType {
	kind: ReflectionTypeKind,
	byte_size: usize,
	resource_ranges: ResourceRanges,
}

#[derive(Debug)]
pub enum ReflectionTypeKind {
	Basic(BasicType),
	Struct(StructType),
	Array(ArrayType),
	Resource(ResourceType),
	Interface(InterfaceType),
}

impl ReflectionType {
	pub(crate) fn new(kind: ReflectionTypeKind, byte_size: usize, resource_ranges: ResourceRanges) -> Arc<Self> {
		Arc::new(Self {
			kind,
			byte_size,
			resource_ranges,
		})
	}

	pub fn kind(&self) -> &ReflectionTypeKind {
		&self.kind
	}

	/// Bytes of uniform data.
	pub fn byte_size(&self) -> usize {
		self.byte_size
	}

	pub fn resource_ranges(&self) -> &[ResourceRange] {
		&self.resource_ranges
	}

	pub fn resource_range(&self, index: usize) -> Option<&ResourceRange> {
		self.resource_ranges.get(index)
	}

	pub fn resource_range_count(&self) -> usize {
		self.resource_ranges.len()
	}

	pub fn as_basic(&self) -> Option<&BasicType> {
		match &self.kind {
			ReflectionTypeKind::Basic(basic) => Some(basic),
			_ => None,
		}
	}

	pub fn as_struct(&self) -> Option<&StructType> {
		match &self.kind {
			ReflectionTypeKind::Struct(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&ArrayType> {
		match &self.kind {
			ReflectionTypeKind::Array(array) => Some(array),
			_ => None,
		}
	}

	pub fn as_resource(&self) -> Option<&ResourceType> {
		match &self.kind {
			ReflectionTypeKind::Resource(resource) => Some(resource),
			_ => None,
		}
	}

	pub fn as_interface(&self) -> Option<&InterfaceType> {
		match &self.kind {
			ReflectionTypeKind::Interface(interface) => Some(interface),
			_ => None,
		}
	}

	/// Strips all array levels, returning the innermost element type.
	pub fn unwrap_array(&self) -> &ReflectionType {
		let mut ty = self;
		while let ReflectionTypeKind::Array(array) = &ty.kind {
			ty = &array.element_type;
		}
		ty
	}

	/// The number of innermost elements across all array levels, 1 for non-arrays.
	pub fn total_array_element_count(&self) -> u32 {
		let mut count = 1;
		let mut ty = self;
		while let ReflectionTypeKind::Array(array) = &ty.kind {
			count *= array.element_count;
			ty = &array.element_type;
		}
		count
	}

	/// Looks up a direct member of a struct type.
	pub fn find_member(&self, name: &str) -> Option<&Arc<ReflectionVar>> {
		self.as_struct().and_then(|s| s.member(name))
	}

	/// The offset and type of a direct member of a struct type, relative to the start of this type.
	pub fn member_offset(&self, name: &str) -> Option<TypedShaderVarOffset> {
		self.find_member(name)
			.map(|var| TypedShaderVarOffset::new(var.ty().clone(), var.offset()))
	}

	/// The struct member whose uniform data covers `byte_offset`.
	pub fn find_member_by_offset(&self, byte_offset: usize) -> Option<&Arc<ReflectionVar>> {
		self.as_struct()?.members().iter().find(|var| {
			let start = var.offset().byte_offset;
			let size = var.ty().byte_size();
			size != 0 && (start..start + size).contains(&byte_offset)
		})
	}
}

impl PartialEq for ReflectionType {
	fn eq(&self, other: &Self) -> bool {
		if self.byte_size != other.byte_size {
			return false;
		}
		match (&self.kind, &other.kind) {
			(ReflectionTypeKind::Basic(a), ReflectionTypeKind::Basic(b)) => a == b,
			(ReflectionTypeKind::Struct(a), ReflectionTypeKind::Struct(b)) => a == b,
			(ReflectionTypeKind::Array(a), ReflectionTypeKind::Array(b)) => a == b,
			(ReflectionTypeKind::Resource(a), ReflectionTypeKind::Resource(b)) => a == b,
			// interfaces only become distinguishable once specialized
			(ReflectionTypeKind::Interface(_), ReflectionTypeKind::Interface(_)) => true,
			_ => false,
		}
	}
}

/// A scalar, vector or matrix.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BasicType {
	pub scalar_type: ScalarType,
	pub rows: u8,
	pub columns: u8,
	pub row_major: bool,
}

impl BasicType {
	/// Returns `None` for shapes that have no GPU representation. Matrices must be floating point and at least 2x2.
	pub fn new(scalar_type: ScalarType, rows: u32, columns: u32) -> Option<Self> {
		let in_range = |n: u32| (1..=4).contains(&n);
		let valid = scalar_type != ScalarType::None
			&& in_range(rows)
			&& in_range(columns)
			&& (rows == 1 || (scalar_type.is_float() && columns >= 2));
		valid.then_some(Self {
			scalar_type,
			rows: rows as u8,
			columns: columns as u8,
			row_major: false,
		})
	}

	pub fn with_row_major(self, row_major: bool) -> Self {
		Self { row_major, ..self }
	}

	pub fn is_matrix(&self) -> bool {
		self.rows > 1
	}
}

impl Display for BasicType {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		let scalar = match self.scalar_type {
			ScalarType::None => "void",
			ScalarType::Bool => "bool",
			ScalarType::Int8 => "int8_t",
			ScalarType::UInt8 => "uint8_t",
			ScalarType::Int16 => "int16_t",
			ScalarType::UInt16 => "uint16_t",
			ScalarType::Int32 => "int",
			ScalarType::UInt32 => "uint",
			ScalarType::Int64 => "int64_t",
			ScalarType::UInt64 => "uint64_t",
			ScalarType::Float16 => "half",
			ScalarType::Float32 => "float",
			ScalarType::Float64 => "double",
		};
		match (self.rows, self.columns) {
			(1, 1) => write!(f, "{scalar}"),
			(1, columns) => write!(f, "{scalar}{columns}"),
			(rows, columns) => write!(f, "{scalar}{rows}x{columns}"),
		}
	}
}

#[derive(Debug)]
pub struct ArrayType {
	pub element_type: Arc<ReflectionType>,
	pub element_count: u32,
	pub element_byte_stride: usize,
}

impl PartialEq for ArrayType {
	fn eq(&self, other: &Self) -> bool {
		self.element_count == other.element_count
			&& self.element_byte_stride == other.element_byte_stride
			&& self.element_type == other.element_type
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ResourceKind {
	Texture,
	StructuredBuffer,
	RawBuffer,
	TypedBuffer,
	Sampler,
	ConstantBuffer,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dimensions {
	Unknown,
	Texture1D,
	Texture2D,
	Texture3D,
	TextureCube,
	Texture1DArray,
	Texture2DArray,
	Texture2DMS,
	Texture2DMSArray,
	TextureCubeArray,
	Buffer,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderAccess {
	Undefined,
	Read,
	ReadWrite,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ReturnType {
	Unknown,
	Float,
	Double,
	Int,
	Uint,
}

impl ReturnType {
	pub fn from_scalar(scalar_type: ScalarType) -> Self {
		match scalar_type {
			ScalarType::Float32 => ReturnType::Float,
			ScalarType::Int32 => ReturnType::Int,
			ScalarType::UInt32 => ReturnType::Uint,
			ScalarType::Float64 => ReturnType::Double,
			_ => ReturnType::Unknown,
		}
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StructuredBufferKind {
	Default,
	Counter,
	Append,
	Consume,
}

/// Write-once slot for the [`ParameterBlockReflection`] attached to a constant buffer, parameter block or interface.
/// It is filled when the enclosing block is finalized.
#[derive(Clone, Default)]
pub struct ParameterBlockSlot(Arc<OnceCell<Arc<ParameterBlockReflection>>>);

impl ParameterBlockSlot {
	pub fn get(&self) -> Option<&Arc<ParameterBlockReflection>> {
		self.0.get()
	}

	pub(crate) fn fill(&self, block: Arc<ParameterBlockReflection>) {
		let result = self.0.set(block);
		assert!(result.is_ok(), "ParameterBlockSlot must only be filled once");
	}
}

impl core::fmt::Debug for ParameterBlockSlot {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		match self.get() {
			Some(_) => f.write_str("ParameterBlockSlot(finalized)"),
			None => f.write_str("ParameterBlockSlot(pending)"),
		}
	}
}

#[derive(Debug)]
pub struct ResourceType {
	pub kind: ResourceKind,
	pub dimensions: Dimensions,
	pub structured_kind: Option<StructuredBufferKind>,
	pub return_type: ReturnType,
	pub access: ShaderAccess,
	/// element type of structured buffers
	pub struct_type: Option<Arc<ReflectionType>>,
	pub(crate) parameter_block: Option<ParameterBlockSlot>,
}

impl ResourceType {
	/// Textures and buffers are bound as SRVs when read-only and as UAVs otherwise.
	pub fn descriptor_type(&self) -> DescriptorType {
		let read = self.access == ShaderAccess::Read;
		match (self.kind, read) {
			(ResourceKind::ConstantBuffer, _) => DescriptorType::Cbv,
			(ResourceKind::Sampler, _) => DescriptorType::Sampler,
			(ResourceKind::Texture, true) => DescriptorType::TextureSrv,
			(ResourceKind::Texture, false) => DescriptorType::TextureUav,
			(ResourceKind::RawBuffer, true) => DescriptorType::RawBufferSrv,
			(ResourceKind::RawBuffer, false) => DescriptorType::RawBufferUav,
			(ResourceKind::TypedBuffer, true) => DescriptorType::TypedBufferSrv,
			(ResourceKind::TypedBuffer, false) => DescriptorType::TypedBufferUav,
			(ResourceKind::StructuredBuffer, true) => DescriptorType::StructuredBufferSrv,
			(ResourceKind::StructuredBuffer, false) => DescriptorType::StructuredBufferUav,
		}
	}

	/// The reflection of the contents of a constant buffer or parameter block, available once the enclosing block
	/// was finalized.
	pub fn parameter_block(&self) -> Option<&Arc<ParameterBlockReflection>> {
		self.parameter_block.as_ref().and_then(|slot| slot.get())
	}
}

impl PartialEq for ResourceType {
	fn eq(&self, other: &Self) -> bool {
		self.dimensions == other.dimensions
			&& self.structured_kind == other.structured_kind
			&& self.return_type == other.return_type
			&& self.access == other.access
			&& self.kind == other.kind
			&& self.struct_type == other.struct_type
	}
}

#[derive(Debug)]
pub struct InterfaceType {
	pub(crate) parameter_block: Option<ParameterBlockSlot>,
}

impl InterfaceType {
	/// The reflection of the specialization-pending data, if the compiler reported any.
	pub fn parameter_block(&self) -> Option<&Arc<ParameterBlockReflection>> {
		self.parameter_block.as_ref().and_then(|slot| slot.get())
	}
}
