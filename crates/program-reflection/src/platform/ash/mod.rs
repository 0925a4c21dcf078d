mod collector;
mod convert;

pub use collector::*;
pub use convert::*;
