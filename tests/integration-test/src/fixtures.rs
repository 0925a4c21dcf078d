//! Hand-written type layouts, as a compiler front end would report them for small HLSL programs.

use program_reflection::layout::{ParameterCategory, ResourceAccess, ResourceShape, ScalarType, TypeLayout, VarLayout};
use program_reflection::reflection::{DefaultConstantBufferBindingInfo, DescriptorRange, DescriptorSetInfo};
use program_reflection::sink::{BindingScope, BindingSink};
use std::sync::Arc;

pub fn float_n(n: u32) -> Arc<TypeLayout> {
	Arc::new(TypeLayout::vector(ScalarType::Float32, n))
}

/// A uniform field at `byte_offset`.
pub fn uniform(name: &str, ty: Arc<TypeLayout>, byte_offset: usize) -> Arc<VarLayout> {
	Arc::new(VarLayout::new(name, ty).with_offset(ParameterCategory::Uniform, byte_offset))
}

/// `Texture2D name : register(t{register})`
pub fn texture(name: &str, register: usize) -> Arc<VarLayout> {
	let ty = TypeLayout::resource(
		ResourceShape::Texture2D,
		ResourceAccess::Read,
		ParameterCategory::ShaderResource,
	);
	Arc::new(VarLayout::new(name, Arc::new(ty)).with_offset(ParameterCategory::ShaderResource, register))
}

/// `RWStructuredBuffer<float> name : register(u{register})`
pub fn rw_structured_buffer(name: &str, register: usize) -> VarLayout {
	let ty = TypeLayout::structured_buffer(
		Arc::new(TypeLayout::scalar(ScalarType::Float32)),
		ResourceAccess::ReadWrite,
		ParameterCategory::UnorderedAccess,
	);
	VarLayout::new(name, Arc::new(ty)).with_offset(ParameterCategory::UnorderedAccess, register)
}

/// `cbuffer name : register(b{register}) { element }`
pub fn constant_buffer(name: &str, element: TypeLayout, register: usize) -> Arc<VarLayout> {
	let ty = TypeLayout::constant_buffer(Arc::new(element));
	Arc::new(VarLayout::new(name, Arc::new(ty)).with_offset(ParameterCategory::ConstantBuffer, register))
}

/// `ParameterBlock<element> name`, allocated register space `space` relative to its parent.
pub fn parameter_block(name: &str, element: TypeLayout, space: usize) -> Arc<VarLayout> {
	let ty = TypeLayout::parameter_block(Arc::new(element));
	Arc::new(VarLayout::new(name, Arc::new(ty)).with_offset(ParameterCategory::RegisterSpace, space))
}

/// `struct Foo { float a; float b; }`
pub fn foo() -> TypeLayout {
	TypeLayout::structure("Foo", [uniform("a", float_n(1), 0), uniform("b", float_n(1), 4)])
		.with_size(ParameterCategory::Uniform, 8)
}

/// Records everything reported to a [`BindingSink`].
#[derive(Debug, Default)]
pub struct RecordingSink {
	pub sets: Vec<(BindingScope, u32, DescriptorSetInfo)>,
	pub root_descriptors: Vec<(BindingScope, DescriptorRange)>,
	pub root_constants: Vec<(BindingScope, usize)>,
}

impl RecordingSink {
	pub fn sets_of(&self, scope: &BindingScope) -> Vec<&DescriptorSetInfo> {
		self.sets
			.iter()
			.filter(|(s, _, _)| s == scope)
			.map(|(_, _, set)| set)
			.collect()
	}
}

impl BindingSink for RecordingSink {
	fn descriptor_set(&mut self, scope: &BindingScope, set_index: u32, set: &DescriptorSetInfo) {
		self.sets.push((scope.clone(), set_index, set.clone()));
	}

	fn root_descriptor(&mut self, scope: &BindingScope, range: &DescriptorRange) {
		self.root_descriptors.push((scope.clone(), *range));
	}

	fn root_constants(&mut self, scope: &BindingScope, _binding: &DefaultConstantBufferBindingInfo, byte_size: usize) {
		self.root_constants.push((scope.clone(), byte_size));
	}
}
