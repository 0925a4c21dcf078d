/// The binding model registers are allocated for.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Backend {
	/// per-class register counters (b#, t#, u#, s#) within register spaces
	#[default]
	D3D12,
	/// one binding counter per descriptor set
	Vulkan,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ReflectionOptions {
	pub backend: Backend,
	/// Bind the uniform parameters of entry points as root constants (push constants) instead of through a
	/// constant buffer descriptor.
	pub entry_point_uniforms_as_root_constants: bool,
}

impl Default for ReflectionOptions {
	fn default() -> Self {
		Self {
			backend: Backend::D3D12,
			entry_point_uniforms_as_root_constants: true,
		}
	}
}

impl ReflectionOptions {
	pub fn vulkan() -> Self {
		Self {
			backend: Backend::Vulkan,
			..Self::default()
		}
	}
}
