mod block;
mod descriptor_counts;
mod entry_point;
mod error;
mod finalizer;
mod offset;
mod options;
mod path;
mod program;
mod reflector;
mod struct_type;
mod types;
mod var;
mod varying;

pub use block::*;
pub use descriptor_counts::*;
pub use entry_point::*;
pub use error::*;
pub use offset::*;
pub use options::*;
pub use path::*;
pub use program::*;
pub use reflector::*;
pub use struct_type::*;
pub use types::*;
pub use var::*;
pub use varying::*;
