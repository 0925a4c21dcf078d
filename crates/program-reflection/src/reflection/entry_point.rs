use crate::layout::{EntryPointLayout, ShaderStages, VarLayout};
use crate::reflection::{
	Diagnostics, ParameterBlockBuilder, ParameterBlockReflection, RangeBindings, ReflectionError, ReflectionOptions,
	ReflectionPath, StructTypeBuilder, TypeReflector,
};
use core::ops::Deref;
use std::sync::Arc;

/// The uniform parameters of a group of entry points that are bound together, eg. the vertex and fragment shader of
/// a raster pipeline. Parameters declared by multiple entry points of the group must match.
#[derive(Debug)]
pub struct EntryPointGroupReflection {
	group_index: u32,
	entry_point_names: Vec<String>,
	stages: ShaderStages,
	block: Arc<ParameterBlockReflection>,
}

impl EntryPointGroupReflection {
	pub(crate) fn create(
		group_index: u32,
		entry_points: &[&EntryPointLayout],
		options: &ReflectionOptions,
		diagnostics: &mut Diagnostics,
	) -> Result<Self, ReflectionError> {
		let name = match entry_points {
			[entry_point] => entry_point.name.as_str(),
			_ => "",
		};
		let largest = entry_points
			.iter()
			.max_by_key(|entry_point| entry_point.uniform_type_layout().uniform_size());
		let byte_size = largest.map_or(0, |entry_point| entry_point.uniform_type_layout().uniform_size());

		let mut element = StructTypeBuilder::new(name, byte_size);
		let mut ranges = RangeBindings::new();
		let mut reflector = TypeReflector::new(options, diagnostics);
		for entry_point in entry_points {
			for parameter in entry_point.parameters.iter().filter(|p| !is_varying(p)) {
				let path = ReflectionPath::root().extend(parameter);
				reflector.reflect_member(&mut element, parameter, &path, &mut ranges)?;
			}
		}
		let element_type = element.build();

		let mut builder = ParameterBlockBuilder::new();
		if let Some(entry_point) = largest.filter(|_| element_type.byte_size() != 0) {
			builder.set_default_constant_buffer(reflector.entry_point_default_constant_buffer(&entry_point.scope));
		}
		builder.set_element_type(element_type);
		builder.add_resource_ranges(ranges);
		let block = builder.finalize(reflector.diagnostics());

		Ok(Self {
			group_index,
			entry_point_names: entry_points.iter().map(|e| e.name.clone()).collect(),
			stages: entry_points.iter().map(|e| e.stage).collect(),
			block,
		})
	}

	pub fn group_index(&self) -> u32 {
		self.group_index
	}

	pub fn entry_point_names(&self) -> &[String] {
		&self.entry_point_names
	}

	pub fn stages(&self) -> ShaderStages {
		self.stages
	}

	pub fn parameter_block(&self) -> &Arc<ParameterBlockReflection> {
		&self.block
	}
}

impl Deref for EntryPointGroupReflection {
	type Target = ParameterBlockReflection;

	fn deref(&self) -> &Self::Target {
		&self.block
	}
}

/// Varying parameters are per-invocation inputs and outputs, they are reflected separately.
fn is_varying(parameter: &VarLayout) -> bool {
	parameter.type_layout.categories().any(|category| category.is_varying())
}
