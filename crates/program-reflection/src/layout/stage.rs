/// The pipeline stage an entry point is compiled for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
	Vertex,
	Hull,
	Domain,
	Geometry,
	Fragment,
	Compute,
	RayGeneration,
	Intersection,
	AnyHit,
	ClosestHit,
	Miss,
	Callable,
	Task,
	Mesh,
}

bitflags::bitflags! {
	#[repr(transparent)]
	#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
	pub struct ShaderStages: u32 {
		const VERTEX = 1 << 0;
		const HULL = 1 << 1;
		const DOMAIN = 1 << 2;
		const GEOMETRY = 1 << 3;
		const FRAGMENT = 1 << 4;
		const COMPUTE = 1 << 5;
		const RAY_GENERATION = 1 << 6;
		const INTERSECTION = 1 << 7;
		const ANY_HIT = 1 << 8;
		const CLOSEST_HIT = 1 << 9;
		const MISS = 1 << 10;
		const CALLABLE = 1 << 11;
		const TASK = 1 << 12;
		const MESH = 1 << 13;
	}
}

impl ShaderStage {
	pub const fn to_flag(&self) -> ShaderStages {
		match self {
			ShaderStage::Vertex => ShaderStages::VERTEX,
			ShaderStage::Hull => ShaderStages::HULL,
			ShaderStage::Domain => ShaderStages::DOMAIN,
			ShaderStage::Geometry => ShaderStages::GEOMETRY,
			ShaderStage::Fragment => ShaderStages::FRAGMENT,
			ShaderStage::Compute => ShaderStages::COMPUTE,
			ShaderStage::RayGeneration => ShaderStages::RAY_GENERATION,
			ShaderStage::Intersection => ShaderStages::INTERSECTION,
			ShaderStage::AnyHit => ShaderStages::ANY_HIT,
			ShaderStage::ClosestHit => ShaderStages::CLOSEST_HIT,
			ShaderStage::Miss => ShaderStages::MISS,
			ShaderStage::Callable => ShaderStages::CALLABLE,
			ShaderStage::Task => ShaderStages::TASK,
			ShaderStage::Mesh => ShaderStages::MESH,
		}
	}
}

impl FromIterator<ShaderStage> for ShaderStages {
	fn from_iter<T: IntoIterator<Item = ShaderStage>>(iter: T) -> Self {
		iter.into_iter().fold(ShaderStages::empty(), |acc, stage| acc | stage.to_flag())
	}
}
