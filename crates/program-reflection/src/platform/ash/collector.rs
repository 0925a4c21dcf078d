use crate::layout::ShaderStages;
use crate::reflection::{DefaultConstantBufferBindingInfo, DescriptorSetInfo, ProgramReflection};
use crate::sink::{BindingScope, BindingSink};
use ash::vk::{DescriptorSetLayoutBinding, PushConstantRange};

/// The bindings of one descriptor set, ready for `vkCreateDescriptorSetLayout`.
#[derive(Clone, Debug)]
pub struct AshDescriptorSetLayout {
	pub scope: BindingScope,
	pub set_index: u32,
	pub bindings: Vec<DescriptorSetLayoutBinding<'static>>,
}

/// Collects the descriptor set layouts and push constant ranges of a [`ProgramReflection`]. Root descriptors are
/// bound through the descriptor set they are reported in, root constants become push constants.
#[derive(Clone, Debug)]
pub struct AshLayoutCollector {
	stages: ShaderStages,
	pub set_layouts: Vec<AshDescriptorSetLayout>,
	pub push_constant_ranges: Vec<PushConstantRange>,
	push_constant_size: u32,
}

impl AshLayoutCollector {
	/// All bindings are made visible to `stages`.
	pub fn new(stages: ShaderStages) -> Self {
		Self {
			stages,
			set_layouts: Vec::new(),
			push_constant_ranges: Vec::new(),
			push_constant_size: 0,
		}
	}

	/// Collects the layouts of `program`, visible to all of its stages.
	pub fn collect(program: &ProgramReflection) -> Self {
		let mut collector = Self::new(program.stages());
		program.visit_bindings(&mut collector);
		collector
	}

	/// The bytes of push constants across all ranges.
	pub fn push_constant_size(&self) -> u32 {
		self.push_constant_size
	}
}

impl BindingSink for AshLayoutCollector {
	fn descriptor_set(&mut self, scope: &BindingScope, set_index: u32, set: &DescriptorSetInfo) {
		let bindings = set
			.layout
			.ranges()
			.iter()
			.map(|range| range.to_ash_descriptor_set_layout_binding(self.stages))
			.collect::<Vec<_>>();
		log::trace!("{scope:?} set {set_index}: {} bindings", bindings.len());
		self.set_layouts.push(AshDescriptorSetLayout {
			scope: scope.clone(),
			set_index,
			bindings,
		});
	}

	fn root_constants(&mut self, scope: &BindingScope, _binding: &DefaultConstantBufferBindingInfo, byte_size: usize) {
		// push constant offsets and sizes must be multiples of 4
		let offset = self.push_constant_size.next_multiple_of(4);
		let size = (byte_size as u32).next_multiple_of(4);
		log::trace!("{scope:?} push constants: offset {offset}, size {size}");
		self.push_constant_ranges.push(PushConstantRange {
			stage_flags: self.stages.to_ash_shader_stage_flags(),
			offset,
			size,
		});
		self.push_constant_size = offset + size;
	}
}
