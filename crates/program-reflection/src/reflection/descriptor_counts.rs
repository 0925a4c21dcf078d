use crate::reflection::DescriptorClass;

/// Running count of descriptors per [`DescriptorClass`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DescriptorCounts {
	pub cbv: u32,
	pub srv: u32,
	pub uav: u32,
	pub samplers: u32,
}

impl DescriptorCounts {
	pub const ZERO: Self = DescriptorCounts {
		cbv: 0,
		srv: 0,
		uav: 0,
		samplers: 0,
	};

	pub fn get(&self, class: DescriptorClass) -> u32 {
		match class {
			DescriptorClass::Cbv => self.cbv,
			DescriptorClass::Srv => self.srv,
			DescriptorClass::Uav => self.uav,
			DescriptorClass::Sampler => self.samplers,
		}
	}

	fn get_mut(&mut self, class: DescriptorClass) -> &mut u32 {
		match class {
			DescriptorClass::Cbv => &mut self.cbv,
			DescriptorClass::Srv => &mut self.srv,
			DescriptorClass::Uav => &mut self.uav,
			DescriptorClass::Sampler => &mut self.samplers,
		}
	}

	/// Reserves `count` descriptors of `class`, returning the index of the first.
	pub fn allocate(&mut self, class: DescriptorClass, count: u32) -> u32 {
		let counter = self.get_mut(class);
		let base = *counter;
		*counter += count;
		base
	}
}
