use smallvec::SmallVec;

/// The kind of binding resource a parameter consumes, as reported by the shader compiler. A single type may consume
/// multiple categories at once, eg. a struct containing both uniforms and textures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParameterCategory {
	None,
	Mixed,
	ConstantBuffer,
	ShaderResource,
	UnorderedAccess,
	VaryingInput,
	VaryingOutput,
	SamplerState,
	Uniform,
	DescriptorTableSlot,
	PushConstantBuffer,
	RegisterSpace,
	SubElementRegisterSpace,
	RayPayload,
	HitAttributes,
}

impl ParameterCategory {
	/// Varying categories are per-invocation inputs and outputs that never bind to a descriptor.
	pub fn is_varying(&self) -> bool {
		matches!(
			self,
			ParameterCategory::VaryingInput
				| ParameterCategory::VaryingOutput
				| ParameterCategory::RayPayload
				| ParameterCategory::HitAttributes
		)
	}
}

/// Sparse per-[`ParameterCategory`] table of sizes, strides, offsets or spaces. Missing categories read as 0.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CategoryTable {
	entries: SmallVec<[(ParameterCategory, usize); 2]>,
}

impl CategoryTable {
	pub const fn new() -> Self {
		Self {
			entries: SmallVec::new_const(),
		}
	}

	pub fn get(&self, category: ParameterCategory) -> usize {
		self.entries
			.iter()
			.find(|(c, _)| *c == category)
			.map_or(0, |(_, value)| *value)
	}

	pub fn set(&mut self, category: ParameterCategory, value: usize) {
		match self.entries.iter_mut().find(|(c, _)| *c == category) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((category, value)),
		}
	}

	/// Categories with a non-zero entry, in insertion order.
	pub fn categories(&self) -> impl Iterator<Item = ParameterCategory> + '_ {
		self.entries.iter().filter(|(_, v)| *v != 0).map(|(c, _)| *c)
	}

	pub fn contains(&self, category: ParameterCategory) -> bool {
		self.get(category) != 0
	}
}
