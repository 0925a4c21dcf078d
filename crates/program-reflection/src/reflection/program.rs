use crate::layout::{EntryPointLayout, ParameterCategory, ShaderStage, ShaderStages, TypeLayoutSource, VarLayout};
use crate::reflection::{
	Diagnostics, EntryPointGroupReflection, ParameterBlockBuilder, ParameterBlockReflection, RangeBindings,
	ReflectionDiagnostic, ReflectionError, ReflectionOptions, ReflectionPath, ReflectionType, ReflectionVar,
	ShaderVariable, StructTypeBuilder, TypeReflector, TypedShaderVarOffset, VaryingMaps,
};
use crate::sink::{visit_parameter_block, BindingScope, BindingSink};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The reflection of one compiled program: all global parameters in the default parameter block, one block per entry
/// point group, the varying inputs and outputs and all named types.
#[derive(Debug)]
pub struct ProgramReflection {
	options: ReflectionOptions,
	default_block: Arc<ParameterBlockReflection>,
	entry_point_groups: Vec<EntryPointGroupReflection>,
	stages: ShaderStages,
	thread_group_size: [u32; 3],
	is_sample_frequency: bool,
	vertex_attributes: VaryingMaps,
	pixel_shader_outputs: VaryingMaps,
	types: FxHashMap<String, Arc<ReflectionType>>,
	diagnostics: Vec<ReflectionDiagnostic>,
}

impl ProgramReflection {
	pub fn create(source: &impl TypeLayoutSource, options: ReflectionOptions) -> Result<Self, ReflectionError> {
		let mut diagnostics = Diagnostics::new();
		let default_block = reflect_globals(source.global_parameters(), &options, &mut diagnostics)?;

		let entry_points = source.entry_points();
		let mut group_indices = Vec::new();
		for entry_point in entry_points {
			if !group_indices.contains(&entry_point.group_index) {
				group_indices.push(entry_point.group_index);
			}
		}
		let entry_point_groups = group_indices
			.into_iter()
			.map(|group_index| {
				let members = entry_points
					.iter()
					.filter(|e| e.group_index == group_index)
					.collect::<Vec<&EntryPointLayout>>();
				EntryPointGroupReflection::create(group_index, &members, &options, &mut diagnostics)
			})
			.collect::<Result<Vec<_>, _>>()?;

		let mut thread_group_size = [1; 3];
		let mut is_sample_frequency = false;
		let mut vertex_attributes = VaryingMaps::default();
		let mut pixel_shader_outputs = VaryingMaps::default();
		for entry_point in entry_points {
			match entry_point.stage {
				ShaderStage::Compute => thread_group_size = entry_point.thread_group_size,
				ShaderStage::Vertex => {
					for parameter in &entry_point.parameters {
						vertex_attributes.reflect_parameter(parameter, ParameterCategory::VaryingInput)?;
					}
				}
				ShaderStage::Fragment => {
					is_sample_frequency = entry_point.uses_sample_rate_input;
					for parameter in &entry_point.parameters {
						pixel_shader_outputs.reflect_parameter(parameter, ParameterCategory::VaryingOutput)?;
					}
				}
				_ => {}
			}
		}

		let mut types = FxHashMap::default();
		for (name, type_layout) in source.named_types() {
			let mut ranges = RangeBindings::new();
			let Some(ty) = TypeReflector::new(&options, &mut diagnostics).reflect_type(
				type_layout,
				&mut ranges,
				&ReflectionPath::root(),
			)?
			else {
				continue;
			};
			// finalizes the blocks of nested constant buffers so they can be queried
			let mut block = ParameterBlockBuilder::new();
			block.set_element_type(ty.clone());
			block.add_resource_ranges(ranges);
			block.finalize(&mut diagnostics);
			types.insert(name.to_string(), ty);
		}

		log::debug!(
			"reflected {} globals, {} entry point groups and {} named types with {} diagnostics",
			source.global_parameters().len(),
			entry_point_groups.len(),
			types.len(),
			diagnostics.as_slice().len()
		);
		Ok(Self {
			options,
			default_block,
			entry_point_groups,
			stages: entry_points.iter().map(|e| e.stage).collect(),
			thread_group_size,
			is_sample_frequency,
			vertex_attributes,
			pixel_shader_outputs,
			types,
			diagnostics: diagnostics.into_vec(),
		})
	}

	pub fn options(&self) -> &ReflectionOptions {
		&self.options
	}

	/// The block holding all global parameters.
	pub fn default_parameter_block(&self) -> &Arc<ParameterBlockReflection> {
		&self.default_block
	}

	/// The block of the global constant buffer or parameter block `name`, or the default block for an empty name.
	pub fn parameter_block(&self, name: &str) -> Option<&Arc<ParameterBlockReflection>> {
		if name.is_empty() {
			return Some(&self.default_block);
		}
		self.default_block.resource(name)?.ty().as_resource()?.parameter_block()
	}

	pub fn find_member(&self, name: &str) -> Option<&Arc<ReflectionVar>> {
		self.default_block.find_member(name)
	}

	pub fn resource(&self, name: &str) -> Option<&Arc<ReflectionVar>> {
		self.default_block.resource(name)
	}

	pub fn resource_binding(&self, name: &str) -> Option<TypedShaderVarOffset> {
		self.default_block.resource_binding(name)
	}

	pub fn find_type(&self, name: &str) -> Option<&Arc<ReflectionType>> {
		self.types.get(name)
	}

	pub fn entry_point_groups(&self) -> &[EntryPointGroupReflection] {
		&self.entry_point_groups
	}

	pub fn entry_point_group(&self, index: usize) -> Option<&EntryPointGroupReflection> {
		self.entry_point_groups.get(index)
	}

	pub fn stages(&self) -> ShaderStages {
		self.stages
	}

	/// The thread group size of the compute entry point, `[1, 1, 1]` for programs without one.
	pub fn thread_group_size(&self) -> [u32; 3] {
		self.thread_group_size
	}

	/// Whether the fragment shader runs per sample.
	pub fn is_sample_frequency(&self) -> bool {
		self.is_sample_frequency
	}

	pub fn vertex_attributes(&self) -> &VaryingMaps {
		&self.vertex_attributes
	}

	pub fn vertex_attribute(&self, name: &str) -> Option<&ShaderVariable> {
		self.vertex_attributes.get(name)
	}

	pub fn vertex_attribute_by_semantic(&self, semantic: &str) -> Option<&ShaderVariable> {
		self.vertex_attributes.get_by_semantic(semantic)
	}

	pub fn pixel_shader_outputs(&self) -> &VaryingMaps {
		&self.pixel_shader_outputs
	}

	pub fn pixel_shader_output(&self, name: &str) -> Option<&ShaderVariable> {
		self.pixel_shader_outputs.get(name)
	}

	/// Problems found during reflection, all of which were logged when found.
	pub fn diagnostics(&self) -> &[ReflectionDiagnostic] {
		&self.diagnostics
	}

	/// Reports the bindings of the default block, all parameter blocks nested within it and all entry point groups.
	pub fn visit_bindings(&self, sink: &mut impl BindingSink) {
		visit_parameter_block(&self.default_block, &BindingScope::Global, sink);
		for group in &self.entry_point_groups {
			let scope = BindingScope::EntryPointGroup {
				group_index: group.group_index(),
			};
			visit_parameter_block(group, &scope, sink);
		}
	}
}

/// Globals are collected into an unnamed struct without uniform data of its own.
fn reflect_globals(
	globals: &[Arc<VarLayout>],
	options: &ReflectionOptions,
	diagnostics: &mut Diagnostics,
) -> Result<Arc<ParameterBlockReflection>, ReflectionError> {
	let mut element = StructTypeBuilder::new("", 0);
	let mut ranges = RangeBindings::new();
	let mut reflector = TypeReflector::new(options, diagnostics);
	for global in globals {
		let path = ReflectionPath::root().extend(global);
		reflector.reflect_member(&mut element, global, &path, &mut ranges)?;
	}

	let mut block = ParameterBlockBuilder::new();
	block.set_element_type(element.build());
	block.add_resource_ranges(ranges);
	Ok(block.finalize(reflector.diagnostics()))
}
