//! An owned snapshot of the type layouts a shader compiler computed for one program. Compiler front-ends convert
//! their reflection into these types, or implement [`TypeLayoutSource`] directly.

mod category;
mod program_layout;
mod stage;
mod type_layout;
mod var_layout;

pub use category::*;
pub use program_layout::*;
pub use stage::*;
pub use type_layout::*;
pub use var_layout::*;
