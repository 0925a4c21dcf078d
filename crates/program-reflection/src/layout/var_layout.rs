use crate::layout::{CategoryTable, ParameterCategory, TypeLayout};
use std::sync::Arc;

/// Layout of a variable: a named [`TypeLayout`] placed at some offset within its parent, per category.
#[derive(Clone, Debug)]
pub struct VarLayout {
	pub name: String,
	pub type_layout: Arc<TypeLayout>,
	pub offsets: CategoryTable,
	pub binding_spaces: CategoryTable,
	pub semantic_name: Option<String>,
	pub user_attributes: Vec<String>,
	/// layout of the data that was deferred until specialization
	pub pending_data_layout: Option<Arc<VarLayout>>,
}

impl VarLayout {
	pub fn new(name: &str, type_layout: Arc<TypeLayout>) -> Self {
		Self {
			name: name.to_string(),
			type_layout,
			offsets: CategoryTable::new(),
			binding_spaces: CategoryTable::new(),
			semantic_name: None,
			user_attributes: Vec::new(),
			pending_data_layout: None,
		}
	}

	pub fn with_offset(mut self, category: ParameterCategory, offset: usize) -> Self {
		self.offsets.set(category, offset);
		self
	}

	pub fn with_binding_space(mut self, category: ParameterCategory, space: usize) -> Self {
		self.binding_spaces.set(category, space);
		self
	}

	pub fn with_semantic(mut self, semantic: &str) -> Self {
		self.semantic_name = Some(semantic.to_string());
		self
	}

	pub fn with_user_attribute(mut self, attribute: &str) -> Self {
		self.user_attributes.push(attribute.to_string());
		self
	}

	pub fn with_pending_data_layout(mut self, pending: Arc<VarLayout>) -> Self {
		self.pending_data_layout = Some(pending);
		self
	}

	pub fn offset(&self, category: ParameterCategory) -> usize {
		self.offsets.get(category)
	}

	pub fn binding_space(&self, category: ParameterCategory) -> usize {
		self.binding_spaces.get(category)
	}

	pub fn has_user_attribute(&self, name: &str) -> bool {
		self.user_attributes.iter().any(|a| a == name)
	}
}
