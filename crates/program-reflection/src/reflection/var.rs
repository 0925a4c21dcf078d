use crate::reflection::{ReflectionType, ShaderVarOffset};
use std::sync::Arc;

/// A named variable of some [`ReflectionType`], placed at an offset within its parent struct.
#[derive(Debug, PartialEq)]
pub struct ReflectionVar {
	name: String,
	ty: Arc<ReflectionType>,
	offset: ShaderVarOffset,
}

impl ReflectionVar {
	pub fn new(name: &str, ty: Arc<ReflectionType>, offset: ShaderVarOffset) -> Arc<Self> {
		Arc::new(Self {
			name: name.to_string(),
			ty,
			offset,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ty(&self) -> &Arc<ReflectionType> {
		&self.ty
	}

	pub fn offset(&self) -> ShaderVarOffset {
		self.offset
	}
}
