use crate::layout::{ParameterCategory, TypeKind, VarLayout};
use std::sync::Arc;

/// One link of the chain of variables enclosing the variable currently being reflected. Links are immutable and
/// shared, siblings extend the same parent link.
#[derive(Debug)]
pub struct PathLink {
	parent: Option<Arc<PathLink>>,
	var: Arc<VarLayout>,
}

impl PathLink {
	pub fn parent(&self) -> Option<&Arc<PathLink>> {
		self.parent.as_ref()
	}

	pub fn var(&self) -> &Arc<VarLayout> {
		&self.var
	}

	fn ancestors(self: &Arc<Self>) -> impl Iterator<Item = &Arc<PathLink>> {
		core::iter::successors(Some(self), |link| link.parent.as_ref())
	}

	fn is_parameter_block(&self) -> bool {
		self.var.type_layout.kind == TypeKind::ParameterBlock
	}

	/// A parameter block that was allocated its own register space resets all register indices within it.
	fn is_space_allocating_block(&self) -> bool {
		self.is_parameter_block() && self.var.type_layout.uses_register_space()
	}
}

/// The primary chain of enclosing variables, and the deferred chain locating data whose layout was deferred until
/// specialization.
#[derive(Clone, Debug, Default)]
pub struct ReflectionPath {
	pub primary: Option<Arc<PathLink>>,
	pub deferred: Option<Arc<PathLink>>,
}

impl ReflectionPath {
	pub fn root() -> Self {
		Self::default()
	}

	/// Descends into `var`. If `var` carries pending data, the deferred chain descends into it as well.
	pub fn extend(&self, var: &Arc<VarLayout>) -> Self {
		let primary = Some(Arc::new(PathLink {
			parent: self.primary.clone(),
			var: var.clone(),
		}));
		let deferred = match &var.pending_data_layout {
			Some(pending) => Some(Arc::new(PathLink {
				parent: self.deferred.clone(),
				var: pending.clone(),
			})),
			None => self.deferred.clone(),
		};
		Self { primary, deferred }
	}

	/// Reroutes the deferred chain to `pending_var`, placed within the current primary chain.
	pub fn specialize(&self, pending_var: &Arc<VarLayout>) -> Self {
		Self {
			primary: self.primary.clone(),
			deferred: Some(Arc::new(PathLink {
				parent: self.primary.clone(),
				var: pending_var.clone(),
			})),
		}
	}

	/// Continues along the deferred chain as if it was the primary one.
	pub fn deferred_as_primary(&self) -> Self {
		Self {
			primary: self.deferred.clone(),
			deferred: None,
		}
	}

	/// The innermost variable.
	pub fn var(&self) -> Option<&Arc<VarLayout>> {
		self.primary.as_ref().map(|link| link.var())
	}
}

/// Sums the offsets in `category` from `link` up to the root, stopping at the first parameter block that was
/// allocated its own register space.
pub fn register_index_from_path(link: Option<&Arc<PathLink>>, category: ParameterCategory) -> u32 {
	let mut offset = 0;
	let Some(link) = link else { return 0 };
	for link in link.ancestors() {
		if category != ParameterCategory::RegisterSpace && link.is_space_allocating_block() {
			return offset as u32;
		}
		offset += link.var.offset(category);
	}
	offset as u32
}

/// Sums the binding spaces in `category` from `link` up to the first enclosing parameter block, which contributes its
/// register space offset instead of its binding spaces. Unlike [`register_index_from_path`] the walk stops at every
/// parameter block, whether or not it was allocated a space of its own.
pub fn register_space_from_path(link: Option<&Arc<PathLink>>, category: ParameterCategory) -> u32 {
	let mut offset = 0;
	let Some(link) = link else { return 0 };
	for link in link.ancestors() {
		if link.is_parameter_block() {
			return offset as u32 + register_index_from_path(Some(link), ParameterCategory::RegisterSpace);
		}
		offset += link.var.binding_space(category);
	}
	offset as u32
}
