use crate::layout::{ShaderStage, TypeLayout, VarLayout};
use std::sync::Arc;

/// Layout of one entry point of a program.
#[derive(Clone, Debug)]
pub struct EntryPointLayout {
	pub name: String,
	pub stage: ShaderStage,
	/// entry points sharing a group index are bound together, eg. the vertex and fragment shader of a raster pipeline
	pub group_index: u32,
	/// the variable holding all entry point parameters, its offsets locate the entry point's default constant buffer
	pub scope: Arc<VarLayout>,
	pub parameters: Vec<Arc<VarLayout>>,
	pub thread_group_size: [u32; 3],
	pub uses_sample_rate_input: bool,
}

impl EntryPointLayout {
	/// An entry point in group 0 with an empty parameter scope.
	pub fn new(name: &str, stage: ShaderStage) -> Self {
		let scope = VarLayout::new(name, Arc::new(TypeLayout::structure(name, [])));
		Self {
			name: name.to_string(),
			stage,
			group_index: 0,
			scope: Arc::new(scope),
			parameters: Vec::new(),
			thread_group_size: [1; 3],
			uses_sample_rate_input: false,
		}
	}

	pub fn with_group_index(mut self, group_index: u32) -> Self {
		self.group_index = group_index;
		self
	}

	pub fn with_scope(mut self, scope: Arc<VarLayout>) -> Self {
		self.scope = scope;
		self
	}

	pub fn with_parameter(mut self, parameter: Arc<VarLayout>) -> Self {
		self.parameters.push(parameter);
		self
	}

	pub fn with_thread_group_size(mut self, thread_group_size: [u32; 3]) -> Self {
		self.thread_group_size = thread_group_size;
		self
	}

	pub fn with_sample_rate_input(mut self, uses_sample_rate_input: bool) -> Self {
		self.uses_sample_rate_input = uses_sample_rate_input;
		self
	}

	/// The layout of the uniform data of all parameters, unwrapping the constant buffer the compiler may have
	/// wrapped them in.
	pub fn uniform_type_layout(&self) -> &Arc<TypeLayout> {
		let scope = &self.scope.type_layout;
		scope.element_type_layout.as_ref().unwrap_or(scope)
	}
}

/// Source of the type layouts of one compiled program.
pub trait TypeLayoutSource {
	fn global_parameters(&self) -> &[Arc<VarLayout>];

	fn entry_points(&self) -> &[EntryPointLayout];

	/// All types that may be looked up by name, see [`crate::reflection::ProgramReflection::find_type`].
	fn named_types(&self) -> impl Iterator<Item = (&str, &Arc<TypeLayout>)> + '_;
}

/// Owned [`TypeLayoutSource`].
#[derive(Clone, Debug, Default)]
pub struct ProgramLayout {
	pub global_parameters: Vec<Arc<VarLayout>>,
	pub entry_points: Vec<EntryPointLayout>,
	pub named_types: Vec<(String, Arc<TypeLayout>)>,
}

impl ProgramLayout {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_global(mut self, global: Arc<VarLayout>) -> Self {
		self.global_parameters.push(global);
		self
	}

	pub fn with_entry_point(mut self, entry_point: EntryPointLayout) -> Self {
		self.entry_points.push(entry_point);
		self
	}

	pub fn with_named_type(mut self, name: &str, type_layout: Arc<TypeLayout>) -> Self {
		self.named_types.push((name.to_string(), type_layout));
		self
	}
}

impl TypeLayoutSource for ProgramLayout {
	fn global_parameters(&self) -> &[Arc<VarLayout>] {
		&self.global_parameters
	}

	fn entry_points(&self) -> &[EntryPointLayout] {
		&self.entry_points
	}

	fn named_types(&self) -> impl Iterator<Item = (&str, &Arc<TypeLayout>)> + '_ {
		self.named_types.iter().map(|(name, layout)| (name.as_str(), layout))
	}
}
