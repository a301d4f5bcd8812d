//! Error types for geometry construction.

use thiserror::Error;

/// Errors raised when geometry values are built from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
	/// A coordinate component was negative.
	#[error("invalid argument: {name} must be non-negative")]
	InvalidArgument {
		/// Name of the offending field.
		name: &'static str,
	},

	/// The supplied arguments do not describe the requested value.
	#[error("invalid arguments: expected {expected} scalars, found {found}")]
	InvalidArguments {
		/// Number of scalars the constructor accepts.
		expected: usize,
		/// Number of scalars that were supplied.
		found: usize,
	},

	/// A resource key could not be turned into a protocol URI.
	#[error("invalid resource uri: {0}")]
	InvalidUri(String),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
