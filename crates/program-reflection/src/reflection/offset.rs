use crate::reflection::ReflectionType;
use core::ops::Add;
use std::sync::Arc;

/// Location of a variable within its parent: a byte offset into the parent's uniform data, plus the index of its
/// first resource range and the array element within that range.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ShaderVarOffset {
	pub byte_offset: usize,
	pub range_index: u32,
	pub array_index: u32,
}

impl ShaderVarOffset {
	pub const ZERO: Self = Self {
		byte_offset: 0,
		range_index: 0,
		array_index: 0,
	};

	pub const fn new(byte_offset: usize, range_index: u32) -> Self {
		Self {
			byte_offset,
			range_index,
			array_index: 0,
		}
	}
}

impl Add for ShaderVarOffset {
	type Output = ShaderVarOffset;

	fn add(self, rhs: Self) -> Self::Output {
		Self {
			byte_offset: self.byte_offset + rhs.byte_offset,
			range_index: self.range_index + rhs.range_index,
			array_index: self.array_index + rhs.array_index,
		}
	}
}

/// A [`ShaderVarOffset`] together with the type of the variable found there. Supports walking into members by name.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedShaderVarOffset {
	ty: Arc<ReflectionType>,
	offset: ShaderVarOffset,
}

impl TypedShaderVarOffset {
	pub fn new(ty: Arc<ReflectionType>, offset: ShaderVarOffset) -> Self {
		Self { ty, offset }
	}

	pub fn ty(&self) -> &Arc<ReflectionType> {
		&self.ty
	}

	pub fn offset(&self) -> ShaderVarOffset {
		self.offset
	}

	/// The member `name` of this struct, with its offset made absolute.
	pub fn member(&self, name: &str) -> Option<TypedShaderVarOffset> {
		let var = self.ty.find_member(name)?;
		Some(Self::new(var.ty().clone(), self.offset + var.offset()))
	}

	/// The member containing the absolute `byte_offset`.
	pub fn member_by_offset(&self, byte_offset: usize) -> Option<TypedShaderVarOffset> {
		let relative = byte_offset.checked_sub(self.offset.byte_offset)?;
		let var = self.ty.find_member_by_offset(relative)?;
		Some(Self::new(var.ty().clone(), self.offset + var.offset()))
	}
}
