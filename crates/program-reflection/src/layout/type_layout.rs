use crate::layout::{CategoryTable, ParameterCategory, VarLayout};
use std::sync::Arc;

/// The kind of a type as reported by the shader compiler.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TypeKind {
	#[default]
	None,
	Struct,
	Array,
	Matrix,
	Vector,
	Scalar,
	ConstantBuffer,
	Resource,
	SamplerState,
	TextureBuffer,
	ShaderStorageBuffer,
	ParameterBlock,
	GenericTypeParameter,
	Interface,
	Specialized,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ScalarType {
	#[default]
	None,
	Bool,
	Int8,
	UInt8,
	Int16,
	UInt16,
	Int32,
	UInt32,
	Int64,
	UInt64,
	Float16,
	Float32,
	Float64,
}

impl ScalarType {
	/// The size of a single scalar when stored as uniform data. Bools occupy 4 bytes on the GPU.
	pub const fn byte_size(&self) -> usize {
		match self {
			ScalarType::None => 0,
			ScalarType::Int8 | ScalarType::UInt8 => 1,
			ScalarType::Int16 | ScalarType::UInt16 | ScalarType::Float16 => 2,
			ScalarType::Bool | ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
			ScalarType::Int64 | ScalarType::UInt64 | ScalarType::Float64 => 8,
		}
	}

	pub const fn is_float(&self) -> bool {
		matches!(self, ScalarType::Float16 | ScalarType::Float32 | ScalarType::Float64)
	}
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MatrixLayout {
	#[default]
	ColumnMajor,
	RowMajor,
}

/// The base shape of a texture or buffer resource.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ResourceShape {
	#[default]
	None,
	Texture1D,
	Texture1DArray,
	Texture2D,
	Texture2DArray,
	Texture2DMultisample,
	Texture2DMultisampleArray,
	Texture3D,
	TextureCube,
	TextureCubeArray,
	TextureBuffer,
	StructuredBuffer,
	ByteAddressBuffer,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ResourceAccess {
	#[default]
	None,
	Read,
	ReadWrite,
	RasterOrdered,
	Append,
	Consume,
}

/// Layout of a single type, as computed by the shader compiler for one program. Layouts form a tree through
/// [`Self::fields`], [`Self::element_type_layout`] and the pending layouts introduced by specialization.
#[derive(Clone, Debug, Default)]
pub struct TypeLayout {
	pub kind: TypeKind,
	pub name: Option<String>,
	pub scalar_type: ScalarType,
	pub row_count: u32,
	pub column_count: u32,
	pub matrix_layout: MatrixLayout,
	pub sizes: CategoryTable,
	pub element_strides: CategoryTable,
	pub element_count: usize,
	pub fields: Vec<Arc<VarLayout>>,
	pub element_type_layout: Option<Arc<TypeLayout>>,
	pub resource_shape: ResourceShape,
	pub resource_access: ResourceAccess,
	/// scalar type of the values a resource returns when sampled or loaded
	pub result_scalar_type: ScalarType,
	pub pending_data_type_layout: Option<Arc<TypeLayout>>,
	pub specialized_pending_var_layout: Option<Arc<VarLayout>>,
}

impl TypeLayout {
	pub fn new(kind: TypeKind) -> Self {
		Self {
			kind,
			..Self::default()
		}
	}

	pub fn scalar(scalar_type: ScalarType) -> Self {
		Self {
			row_count: 1,
			column_count: 1,
			scalar_type,
			..Self::new(TypeKind::Scalar)
		}
		.with_size(ParameterCategory::Uniform, scalar_type.byte_size())
	}

	pub fn vector(scalar_type: ScalarType, components: u32) -> Self {
		Self {
			row_count: 1,
			column_count: components,
			scalar_type,
			..Self::new(TypeKind::Vector)
		}
		.with_size(ParameterCategory::Uniform, scalar_type.byte_size() * components as usize)
	}

	pub fn matrix(scalar_type: ScalarType, rows: u32, columns: u32) -> Self {
		Self {
			row_count: rows,
			column_count: columns,
			scalar_type,
			..Self::new(TypeKind::Matrix)
		}
		.with_size(
			ParameterCategory::Uniform,
			scalar_type.byte_size() * (rows * columns) as usize,
		)
	}

	/// A struct without any sizes, callers are expected to attach the sizes the compiler computed.
	pub fn structure(name: &str, fields: impl IntoIterator<Item = Arc<VarLayout>>) -> Self {
		Self {
			name: Some(name.to_string()),
			fields: fields.into_iter().collect(),
			..Self::new(TypeKind::Struct)
		}
	}

	/// An array with tightly packed elements, use [`Self::with_size`] and [`Self::with_element_stride`] to apply
	/// padding rules.
	pub fn array(element: Arc<TypeLayout>, count: usize) -> Self {
		let mut out = Self {
			element_count: count,
			..Self::new(TypeKind::Array)
		};
		for category in element.sizes.categories() {
			let size = element.size(category);
			out.sizes.set(category, size * count);
			out.element_strides.set(category, size);
		}
		out.element_type_layout = Some(element);
		out
	}

	/// A texture or buffer resource consuming one slot of `category`.
	pub fn resource(shape: ResourceShape, access: ResourceAccess, category: ParameterCategory) -> Self {
		Self {
			resource_shape: shape,
			resource_access: access,
			result_scalar_type: ScalarType::Float32,
			..Self::new(TypeKind::Resource)
		}
		.with_size(category, 1)
	}

	pub fn structured_buffer(element: Arc<TypeLayout>, access: ResourceAccess, category: ParameterCategory) -> Self {
		Self {
			element_type_layout: Some(element),
			result_scalar_type: ScalarType::None,
			..Self::resource(ResourceShape::StructuredBuffer, access, category)
		}
	}

	pub fn sampler() -> Self {
		Self::new(TypeKind::SamplerState).with_size(ParameterCategory::SamplerState, 1)
	}

	pub fn constant_buffer(element: Arc<TypeLayout>) -> Self {
		Self {
			element_type_layout: Some(element),
			..Self::new(TypeKind::ConstantBuffer)
		}
		.with_size(ParameterCategory::ConstantBuffer, 1)
	}

	/// A parameter block allocated into its own register space.
	pub fn parameter_block(element: Arc<TypeLayout>) -> Self {
		Self {
			element_type_layout: Some(element),
			..Self::new(TypeKind::ParameterBlock)
		}
		.with_size(ParameterCategory::RegisterSpace, 1)
	}

	pub fn with_name(mut self, name: &str) -> Self {
		self.name = Some(name.to_string());
		self
	}

	pub fn with_size(mut self, category: ParameterCategory, size: usize) -> Self {
		self.sizes.set(category, size);
		self
	}

	pub fn with_element_stride(mut self, category: ParameterCategory, stride: usize) -> Self {
		self.element_strides.set(category, stride);
		self
	}

	pub fn with_matrix_layout(mut self, matrix_layout: MatrixLayout) -> Self {
		self.matrix_layout = matrix_layout;
		self
	}

	pub fn with_result_scalar_type(mut self, scalar_type: ScalarType) -> Self {
		self.result_scalar_type = scalar_type;
		self
	}

	pub fn with_pending_data_type_layout(mut self, pending: Arc<TypeLayout>) -> Self {
		self.pending_data_type_layout = Some(pending);
		self
	}

	pub fn size(&self, category: ParameterCategory) -> usize {
		self.sizes.get(category)
	}

	pub fn element_stride(&self, category: ParameterCategory) -> usize {
		self.element_strides.get(category)
	}

	/// Bytes of uniform data this type occupies.
	pub fn uniform_size(&self) -> usize {
		self.size(ParameterCategory::Uniform)
	}

	pub fn categories(&self) -> impl Iterator<Item = ParameterCategory> + '_ {
		self.sizes.categories()
	}

	/// The single category this type consumes, [`ParameterCategory::Mixed`] if it consumes multiple. Constant
	/// buffers and parameter blocks always report [`ParameterCategory::ConstantBuffer`], as their uniform contents
	/// are bound through one.
	pub fn parameter_category(&self) -> ParameterCategory {
		let mut categories = self.categories();
		let category = match (categories.next(), categories.next()) {
			(None, _) => ParameterCategory::None,
			(Some(category), None) => category,
			(Some(_), Some(_)) => ParameterCategory::Mixed,
		};
		match (category, self.kind) {
			(ParameterCategory::Mixed, TypeKind::ConstantBuffer | TypeKind::ParameterBlock | TypeKind::None) => {
				ParameterCategory::ConstantBuffer
			}
			(category, _) => category,
		}
	}

	/// Whether this type was allocated a register space of its own.
	pub fn uses_register_space(&self) -> bool {
		self.sizes.contains(ParameterCategory::RegisterSpace)
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self.kind, TypeKind::Scalar | TypeKind::Vector | TypeKind::Matrix)
	}
}
