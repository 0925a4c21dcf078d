#[cfg(feature = "ash")]
pub mod ash;
