use crate::layout::{MatrixLayout, ParameterCategory, ResourceAccess, ResourceShape, TypeKind, TypeLayout, VarLayout};
use crate::reflection::{
	register_index_from_path, register_space_from_path, AddMember, ArrayType, BasicType, BindingFlavor,
	DefaultConstantBufferBindingInfo, DescriptorType, Diagnostics, Dimensions, InterfaceType, ParameterBlockBuilder,
	ParameterBlockSlot, PendingRangeBinding, PendingSubObject, RangeBindings, ReflectionDiagnostic, ReflectionError,
	ReflectionOptions, ReflectionPath, ReflectionType, ReflectionTypeKind, ReflectionVar, ResourceKind, ResourceRange,
	ResourceRanges, ResourceType, ReturnType, RootDescriptorRejection, ShaderAccess, ShaderVarOffset,
	StructTypeBuilder, StructuredBufferKind,
};
use smallvec::smallvec;
use std::sync::Arc;

/// Variables carrying this user attribute are bound as root descriptors.
pub const ROOT_DESCRIPTOR_ATTRIBUTE: &str = "root";

/// Converts compiler [`TypeLayout`]s into [`ReflectionType`]s, collecting a binding for every resource range
/// encountered.
pub struct TypeReflector<'a> {
	options: &'a ReflectionOptions,
	diagnostics: &'a mut Diagnostics,
}

impl<'a> TypeReflector<'a> {
	pub fn new(options: &'a ReflectionOptions, diagnostics: &'a mut Diagnostics) -> Self {
		Self { options, diagnostics }
	}

	/// The binding of the default constant buffer holding the uniform parameters of an entry point, `scope` being the
	/// variable that holds all of its parameters.
	pub fn entry_point_default_constant_buffer(&self, scope: &Arc<VarLayout>) -> DefaultConstantBufferBindingInfo {
		let category = scope.type_layout.parameter_category();
		let path = ReflectionPath::root().extend(scope);
		DefaultConstantBufferBindingInfo {
			reg_index: register_index_from_path(path.primary.as_ref(), category),
			reg_space: register_space_from_path(path.primary.as_ref(), category),
			use_root_constants: self.options.entry_point_uniforms_as_root_constants,
			descriptor_set_index: None,
		}
	}

	pub fn diagnostics(&mut self) -> &mut Diagnostics {
		self.diagnostics
	}

	/// Reflects a variable declared at the root of some scope, such as a global or an entry point parameter.
	pub fn reflect_top_level_variable(
		&mut self,
		var_layout: &Arc<VarLayout>,
		range_index: usize,
		ranges: &mut RangeBindings,
	) -> Result<Option<Arc<ReflectionVar>>, ReflectionError> {
		let path = ReflectionPath::root().extend(var_layout);
		self.reflect_variable(var_layout, range_index, ranges, &path)
	}

	/// `path` must already include `var_layout`. `range_index` is the index of the variable's first resource range
	/// within its parent.
	pub fn reflect_variable(
		&mut self,
		var_layout: &Arc<VarLayout>,
		range_index: usize,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Option<Arc<ReflectionVar>>, ReflectionError> {
		let Some(ty) = self.reflect_type(&var_layout.type_layout, ranges, path)? else {
			return Ok(None);
		};
		let offset = ShaderVarOffset::new(var_layout.offset(ParameterCategory::Uniform), range_index as u32);
		Ok(Some(ReflectionVar::new(&var_layout.name, ty, offset)))
	}

	/// Returns `Ok(None)` for types without any representation and for resources that were rejected.
	pub fn reflect_type(
		&mut self,
		type_layout: &Arc<TypeLayout>,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Option<Arc<ReflectionType>>, ReflectionError> {
		match type_layout.kind {
			TypeKind::Scalar | TypeKind::Vector | TypeKind::Matrix => self.reflect_basic_type(type_layout, path).map(Some),
			TypeKind::Struct => self.reflect_struct_type(type_layout, ranges, path).map(Some),
			TypeKind::Array => self.reflect_array_type(type_layout, ranges, path),
			TypeKind::ConstantBuffer
			| TypeKind::ParameterBlock
			| TypeKind::Resource
			| TypeKind::SamplerState
			| TypeKind::ShaderStorageBuffer => self.reflect_resource_type(type_layout, ranges, path),
			TypeKind::Interface => self.reflect_interface_type(type_layout, ranges, path).map(Some),
			TypeKind::Specialized => self.reflect_specialized_type(type_layout, ranges, path),
			TypeKind::None => Ok(None),
			TypeKind::TextureBuffer | TypeKind::GenericTypeParameter => Err(ReflectionError::UnsupportedType {
				variable: variable_name(path),
				kind: type_layout.kind,
			}),
		}
	}

	fn reflect_basic_type(
		&mut self,
		type_layout: &TypeLayout,
		path: &ReflectionPath,
	) -> Result<Arc<ReflectionType>, ReflectionError> {
		let basic = BasicType::new(type_layout.scalar_type, type_layout.row_count, type_layout.column_count)
			.ok_or_else(|| ReflectionError::UnsupportedBasicType {
				variable: variable_name(path),
				scalar_type: type_layout.scalar_type,
				rows: type_layout.row_count,
				columns: type_layout.column_count,
			})?
			.with_row_major(type_layout.matrix_layout == MatrixLayout::RowMajor);
		Ok(ReflectionType::new(
			ReflectionTypeKind::Basic(basic),
			type_layout.uniform_size(),
			ResourceRanges::new(),
		))
	}

	/// The bindings of a field are only committed to `ranges` if the field is accepted as a member.
	fn reflect_struct_type(
		&mut self,
		type_layout: &TypeLayout,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Arc<ReflectionType>, ReflectionError> {
		// the element type of a `cbuffer` is an anonymous struct
		let name = type_layout.name.as_deref().unwrap_or("");
		let mut builder = StructTypeBuilder::new(name, type_layout.uniform_size());
		for field in &type_layout.fields {
			self.reflect_member(&mut builder, field, &path.extend(field), ranges)?;
		}
		Ok(builder.build())
	}

	/// Reflects `var_layout` and adds it as a member of `builder`. `path` must already include `var_layout`. Returns
	/// `None` if the variable had no representation.
	pub fn reflect_member(
		&mut self,
		builder: &mut StructTypeBuilder,
		var_layout: &Arc<VarLayout>,
		path: &ReflectionPath,
		ranges: &mut RangeBindings,
	) -> Result<Option<AddMember>, ReflectionError> {
		let mut member_ranges = RangeBindings::new();
		let range_index = builder.resource_range_count();
		let Some(var) = self.reflect_variable(var_layout, range_index, &mut member_ranges, path)? else {
			return Ok(None);
		};
		let result = builder.add_member(var, self.diagnostics);
		if result.is_added() {
			ranges.extend(member_ranges);
		}
		Ok(Some(result))
	}

	fn reflect_array_type(
		&mut self,
		type_layout: &TypeLayout,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Option<Arc<ReflectionType>>, ReflectionError> {
		let Some(element_layout) = &type_layout.element_type_layout else {
			return Err(ReflectionError::UnsupportedType {
				variable: variable_name(path),
				kind: type_layout.kind,
			});
		};
		let Some(element_type) = self.reflect_type(element_layout, ranges, path)? else {
			return Ok(None);
		};

		let element_count = type_layout.element_count as u32;
		let resource_ranges = element_type
			.resource_ranges()
			.iter()
			.map(|range| ResourceRange {
				descriptor_type: range.descriptor_type,
				count: range.count * element_count,
				base_index: range.base_index * element_count,
			})
			.collect();
		Ok(Some(ReflectionType::new(
			ReflectionTypeKind::Array(ArrayType {
				element_type,
				element_count,
				element_byte_stride: type_layout.element_stride(ParameterCategory::Uniform),
			}),
			type_layout.uniform_size(),
			resource_ranges,
		)))
	}

	fn reflect_resource_type(
		&mut self,
		type_layout: &TypeLayout,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Option<Arc<ReflectionType>>, ReflectionError> {
		let kind = resource_kind(type_layout, path)?;
		let access = shader_access(type_layout);
		let structured_kind = structured_buffer_kind(type_layout);

		let mut binding = if type_layout.kind == TypeKind::ParameterBlock && type_layout.uses_register_space() {
			// registers restart at 0 in the block's own space
			PendingRangeBinding::new(
				0,
				register_space_from_path(path.primary.as_ref(), ParameterCategory::RegisterSpace),
			)
		} else {
			let category = type_layout.parameter_category();
			PendingRangeBinding::new(
				register_index_from_path(path.primary.as_ref(), category),
				register_space_from_path(path.primary.as_ref(), category),
			)
		};

		if let Some(var) = path.var().filter(|var| var.has_user_attribute(ROOT_DESCRIPTOR_ATTRIBUTE)) {
			if let Some(reason) = root_descriptor_rejection(kind, access, structured_kind, var) {
				self.diagnostics.report(ReflectionDiagnostic::IllegalRootDescriptor {
					variable: var.name.clone(),
					reason,
				});
				return Ok(None);
			}
			binding.flavor = BindingFlavor::RootDescriptor;
		}

		let mut struct_type = None;
		let mut parameter_block = None;
		match kind {
			ResourceKind::StructuredBuffer => {
				if let Some(element_layout) = &type_layout.element_type_layout {
					// the elements of a structured buffer are not bound individually
					let mut element_ranges = RangeBindings::new();
					struct_type = self.reflect_type(element_layout, &mut element_ranges, path)?;
				}
			}
			ResourceKind::ConstantBuffer => {
				let mut sub_block = ParameterBlockBuilder::new();
				let mut sub_ranges = RangeBindings::new();
				let element_type = match &type_layout.element_type_layout {
					Some(element_layout) => self.reflect_type(element_layout, &mut sub_ranges, path)?,
					None => None,
				}
				.unwrap_or_else(|| StructTypeBuilder::new("", 0).build());
				sub_block.add_resource_ranges(sub_ranges);
				if element_type.byte_size() != 0 {
					sub_block.set_default_constant_buffer(DefaultConstantBufferBindingInfo {
						reg_index: binding.reg_index,
						reg_space: binding.reg_space,
						..DefaultConstantBufferBindingInfo::default()
					});
				}
				sub_block.set_element_type(element_type.clone());
				struct_type = Some(element_type);

				binding.flavor = match type_layout.kind {
					TypeKind::ParameterBlock => BindingFlavor::ParameterBlock,
					_ => BindingFlavor::ConstantBuffer,
				};
				let slot = ParameterBlockSlot::default();
				binding.sub_object = Some(Box::new(PendingSubObject {
					builder: sub_block,
					slot: slot.clone(),
				}));
				parameter_block = Some(slot);
			}
			_ => {}
		}

		let resource = ResourceType {
			kind,
			dimensions: dimensions(type_layout.resource_shape),
			structured_kind,
			return_type: ReturnType::from_scalar(type_layout.result_scalar_type),
			access,
			struct_type,
			parameter_block,
		};
		let range = ResourceRange {
			descriptor_type: resource.descriptor_type(),
			count: 1,
			base_index: 0,
		};
		ranges.push(binding);
		Ok(Some(ReflectionType::new(
			ReflectionTypeKind::Resource(resource),
			type_layout.uniform_size(),
			smallvec![range],
		)))
	}

	/// Specialization-pending data of an interface is reflected into a block of its own, which is later merged into
	/// the enclosing block.
	fn reflect_interface_type(
		&mut self,
		type_layout: &TypeLayout,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Arc<ReflectionType>, ReflectionError> {
		let category = type_layout.parameter_category();
		let mut binding = PendingRangeBinding::new(
			register_index_from_path(path.primary.as_ref(), category),
			register_space_from_path(path.primary.as_ref(), category),
		);
		binding.flavor = BindingFlavor::Interface;

		let mut parameter_block = None;
		if let Some(pending_layout) = &type_layout.pending_data_type_layout {
			let sub_path = path.deferred_as_primary();
			let mut sub_block = ParameterBlockBuilder::new();
			let mut sub_ranges = RangeBindings::new();
			let pending_type = self
				.reflect_type(pending_layout, &mut sub_ranges, &sub_path)?
				.unwrap_or_else(|| StructTypeBuilder::new("", 0).build());
			sub_block.add_resource_ranges(sub_ranges);
			sub_block.set_element_type(pending_type);

			let slot = ParameterBlockSlot::default();
			binding.sub_object = Some(Box::new(PendingSubObject {
				builder: sub_block,
				slot: slot.clone(),
			}));
			parameter_block = Some(slot);

			binding.reg_index = register_index_from_path(path.deferred.as_ref(), ParameterCategory::Uniform);
			binding.reg_space = register_space_from_path(path.primary.as_ref(), ParameterCategory::Uniform);
		}

		ranges.push(binding);
		Ok(ReflectionType::new(
			ReflectionTypeKind::Interface(InterfaceType { parameter_block }),
			type_layout.uniform_size(),
			smallvec![ResourceRange {
				descriptor_type: DescriptorType::Cbv,
				count: 1,
				base_index: 0,
			}],
		))
	}

	/// A specialized type is reflected as its base type, with the deferred chain rerouted to the pending data.
	fn reflect_specialized_type(
		&mut self,
		type_layout: &TypeLayout,
		ranges: &mut RangeBindings,
		path: &ReflectionPath,
	) -> Result<Option<Arc<ReflectionType>>, ReflectionError> {
		let Some(base_layout) = &type_layout.element_type_layout else {
			return Err(ReflectionError::UnsupportedType {
				variable: variable_name(path),
				kind: type_layout.kind,
			});
		};
		let specialized_path = match &type_layout.specialized_pending_var_layout {
			Some(pending_var) => path.specialize(pending_var),
			None => path.clone(),
		};
		self.reflect_type(base_layout, ranges, &specialized_path)
	}
}

fn variable_name(path: &ReflectionPath) -> String {
	path.var().map(|var| var.name.clone()).unwrap_or_default()
}

fn resource_kind(type_layout: &TypeLayout, path: &ReflectionPath) -> Result<ResourceKind, ReflectionError> {
	Ok(match type_layout.kind {
		TypeKind::ConstantBuffer | TypeKind::ParameterBlock => ResourceKind::ConstantBuffer,
		TypeKind::SamplerState => ResourceKind::Sampler,
		TypeKind::ShaderStorageBuffer => ResourceKind::StructuredBuffer,
		_ => match type_layout.resource_shape {
			ResourceShape::StructuredBuffer => ResourceKind::StructuredBuffer,
			ResourceShape::ByteAddressBuffer => ResourceKind::RawBuffer,
			ResourceShape::TextureBuffer => ResourceKind::TypedBuffer,
			ResourceShape::None => {
				return Err(ReflectionError::UnsupportedResourceShape {
					variable: variable_name(path),
					shape: type_layout.resource_shape,
				})
			}
			_ => ResourceKind::Texture,
		},
	})
}

fn dimensions(shape: ResourceShape) -> Dimensions {
	match shape {
		ResourceShape::Texture1D => Dimensions::Texture1D,
		ResourceShape::Texture1DArray => Dimensions::Texture1DArray,
		ResourceShape::Texture2D => Dimensions::Texture2D,
		ResourceShape::Texture2DArray => Dimensions::Texture2DArray,
		ResourceShape::Texture2DMultisample => Dimensions::Texture2DMS,
		ResourceShape::Texture2DMultisampleArray => Dimensions::Texture2DMSArray,
		ResourceShape::Texture3D => Dimensions::Texture3D,
		ResourceShape::TextureCube => Dimensions::TextureCube,
		ResourceShape::TextureCubeArray => Dimensions::TextureCubeArray,
		ResourceShape::TextureBuffer | ResourceShape::StructuredBuffer | ResourceShape::ByteAddressBuffer => {
			Dimensions::Buffer
		}
		ResourceShape::None => Dimensions::Unknown,
	}
}

fn shader_access(type_layout: &TypeLayout) -> ShaderAccess {
	match type_layout.kind {
		TypeKind::SamplerState | TypeKind::ConstantBuffer | TypeKind::ParameterBlock => ShaderAccess::Read,
		_ => match type_layout.resource_access {
			ResourceAccess::None => ShaderAccess::Undefined,
			ResourceAccess::Read => ShaderAccess::Read,
			_ => ShaderAccess::ReadWrite,
		},
	}
}

fn structured_buffer_kind(type_layout: &TypeLayout) -> Option<StructuredBufferKind> {
	if type_layout.kind != TypeKind::Resource || type_layout.resource_shape != ResourceShape::StructuredBuffer {
		return None;
	}
	match type_layout.resource_access {
		ResourceAccess::Read => Some(StructuredBufferKind::Default),
		ResourceAccess::ReadWrite | ResourceAccess::RasterOrdered => Some(StructuredBufferKind::Counter),
		ResourceAccess::Append => Some(StructuredBufferKind::Append),
		ResourceAccess::Consume => Some(StructuredBufferKind::Consume),
		ResourceAccess::None => None,
	}
}

/// Root descriptors must be single raw or structured buffers with SRV or UAV access.
fn root_descriptor_rejection(
	kind: ResourceKind,
	access: ShaderAccess,
	structured_kind: Option<StructuredBufferKind>,
	var: &VarLayout,
) -> Option<RootDescriptorRejection> {
	if !matches!(kind, ResourceKind::RawBuffer | ResourceKind::StructuredBuffer) {
		Some(RootDescriptorRejection::NotABuffer(kind))
	} else if !matches!(access, ShaderAccess::Read | ShaderAccess::ReadWrite) {
		Some(RootDescriptorRejection::Access(access))
	} else if matches!(
		structured_kind,
		Some(StructuredBufferKind::Append | StructuredBufferKind::Consume)
	) {
		Some(RootDescriptorRejection::AppendConsume)
	} else if var.type_layout.kind == TypeKind::Array {
		Some(RootDescriptorRejection::Array)
	} else {
		None
	}
}
