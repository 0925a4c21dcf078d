//! Reflection of compiled shader programs into typed parameter blocks and the descriptor set layouts that bind them.
//!
//! A compiler front end describes the laid out interface of a program through [`layout::TypeLayoutSource`], which
//! [`reflection::ProgramReflection::create`] turns into an immutable reflection. Pipeline layouts are built from it by
//! implementing [`sink::BindingSink`], the `ash` feature provides one for Vulkan.

pub mod layout;
pub mod platform;
pub mod reflection;
pub mod sink;
