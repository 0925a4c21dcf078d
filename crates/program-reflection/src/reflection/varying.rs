use crate::layout::{ParameterCategory, TypeKind, TypeLayout, VarLayout};
use crate::reflection::{register_index_from_path, BasicType, ReflectionError, ReflectionPath};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A vertex attribute or pixel shader output.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ShaderVariable {
	pub bind_location: u32,
	pub semantic_name: String,
	pub ty: BasicType,
}

pub type VariableMap = FxHashMap<String, ShaderVariable>;

/// Varying parameters of one kind, flattened to their scalar, vector and matrix leaves and indexed both by dotted name
/// and by semantic. Elements of arrays are keyed as `name[i]` and `SEMANTIC[i]`.
#[derive(Clone, Debug, Default)]
pub struct VaryingMaps {
	by_name: VariableMap,
	by_semantic: VariableMap,
}

impl VaryingMaps {
	pub fn get(&self, name: &str) -> Option<&ShaderVariable> {
		self.by_name.get(name)
	}

	pub fn get_by_semantic(&self, semantic: &str) -> Option<&ShaderVariable> {
		self.by_semantic.get(semantic)
	}

	pub fn by_name(&self) -> &VariableMap {
		&self.by_name
	}

	pub fn by_semantic(&self) -> &VariableMap {
		&self.by_semantic
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}

	/// Adds all leaves of `parameter` that consume `category`.
	pub fn reflect_parameter(
		&mut self,
		parameter: &Arc<VarLayout>,
		category: ParameterCategory,
	) -> Result<(), ReflectionError> {
		let path = ReflectionPath::root().extend(parameter);
		self.reflect_varying(&path, &parameter.name, category)
	}

	fn reflect_varying(
		&mut self,
		path: &ReflectionPath,
		name: &str,
		category: ParameterCategory,
	) -> Result<(), ReflectionError> {
		let Some(var) = path.var() else {
			return Ok(());
		};
		let type_layout = &var.type_layout;
		if type_layout.size(category) == 0 {
			return Ok(());
		}

		let base_location = register_index_from_path(path.primary.as_ref(), category);
		let semantic = var.semantic_name.as_deref().unwrap_or("");
		match type_layout.kind {
			TypeKind::Scalar | TypeKind::Vector | TypeKind::Matrix => {
				let ty = basic_type(type_layout, name)?;
				self.insert(name.to_string(), semantic.to_string(), base_location, ty);
			}
			TypeKind::Array => {
				let element = type_layout
					.element_type_layout
					.as_ref()
					.filter(|element| element.is_leaf())
					.ok_or_else(|| ReflectionError::UnsupportedVarying {
						variable: name.to_string(),
					})?;
				let ty = basic_type(element, name)?;
				let stride = type_layout.element_stride(category) as u32;
				for i in 0..type_layout.element_count as u32 {
					self.insert(
						format!("{name}[{i}]"),
						format!("{semantic}[{i}]"),
						base_location + i * stride,
						ty,
					);
				}
			}
			TypeKind::Struct => {
				for field in &type_layout.fields {
					self.reflect_varying(&path.extend(field), &format!("{name}.{}", field.name), category)?;
				}
			}
			_ => {}
		}
		Ok(())
	}

	fn insert(&mut self, name: String, semantic_name: String, bind_location: u32, ty: BasicType) {
		let variable = ShaderVariable {
			bind_location,
			semantic_name,
			ty,
		};
		if !variable.semantic_name.is_empty() {
			self.by_semantic
				.insert(variable.semantic_name.clone(), variable.clone());
		}
		self.by_name.insert(name, variable);
	}
}

fn basic_type(type_layout: &TypeLayout, name: &str) -> Result<BasicType, ReflectionError> {
	BasicType::new(type_layout.scalar_type, type_layout.row_count, type_layout.column_count).ok_or_else(|| {
		ReflectionError::UnsupportedBasicType {
			variable: name.to_string(),
			scalar_type: type_layout.scalar_type,
			rows: type_layout.row_count,
			columns: type_layout.column_count,
		}
	})
}
