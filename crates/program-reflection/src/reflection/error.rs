use crate::layout::{ResourceShape, ScalarType, TypeKind};
use crate::reflection::{ResourceKind, ShaderAccess};
use core::fmt::{Display, Formatter};
use thiserror::Error;

/// A fatal error, the compiler reported something that cannot be reflected. Reflection of the program is aborted.
#[derive(Error)]
#[non_exhaustive]
pub enum ReflectionError {
	#[error("Variable \"{variable}\" has unsupported type kind {kind:?}")]
	UnsupportedType { variable: String, kind: TypeKind },
	#[error("Resource \"{variable}\" has unsupported resource shape {shape:?}")]
	UnsupportedResourceShape { variable: String, shape: ResourceShape },
	#[error("Variable \"{variable}\" has unsupported shape {scalar_type:?} with {rows} rows and {columns} columns")]
	UnsupportedBasicType {
		variable: String,
		scalar_type: ScalarType,
		rows: u32,
		columns: u32,
	},
	#[error("Varying parameter \"{variable}\" is an array of non-scalar, non-vector, non-matrix elements")]
	UnsupportedVarying { variable: String },
}

impl core::fmt::Debug for ReflectionError {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		Display::fmt(self, f)
	}
}

/// A non-fatal problem found during reflection. The offending declaration or binding is dropped and reflection
/// continues.
#[derive(Error, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ReflectionDiagnostic {
	#[error(
		"Variable \"{variable}\" in struct \"{struct_name}\" was declared again with a different type or binding, keeping the first declaration"
	)]
	DeclarationMismatch { variable: String, struct_name: String },
	#[error("Resource \"{variable}\" cannot be bound as a root descriptor: {reason}")]
	IllegalRootDescriptor {
		variable: String,
		reason: RootDescriptorRejection,
	},
	#[error("Root descriptor at register {reg_index} in space {reg_space} is an array of {count} descriptors")]
	RootDescriptorArray { reg_index: u32, reg_space: u32, count: u32 },
}

impl core::fmt::Debug for ReflectionDiagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		Display::fmt(self, f)
	}
}

/// Why a resource marked as a root descriptor was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RootDescriptorRejection {
	NotABuffer(ResourceKind),
	Access(ShaderAccess),
	AppendConsume,
	Array,
}

impl Display for RootDescriptorRejection {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		match self {
			RootDescriptorRejection::NotABuffer(kind) => {
				write!(f, "only raw and structured buffers are allowed, found {kind:?}")
			}
			RootDescriptorRejection::Access(access) => {
				write!(f, "only read or read-write access is allowed, found {access:?}")
			}
			RootDescriptorRejection::AppendConsume => f.write_str("append and consume buffers are not allowed"),
			RootDescriptorRejection::Array => f.write_str("arrays are not allowed"),
		}
	}
}

/// Collects [`ReflectionDiagnostic`]s, logging each as it is reported.
#[derive(Debug, Default)]
pub struct Diagnostics {
	reported: Vec<ReflectionDiagnostic>,
}

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn report(&mut self, diagnostic: ReflectionDiagnostic) {
		log::error!("{}", diagnostic);
		self.reported.push(diagnostic);
	}

	pub fn as_slice(&self) -> &[ReflectionDiagnostic] {
		&self.reported
	}

	pub fn into_vec(self) -> Vec<ReflectionDiagnostic> {
		self.reported
	}
}
