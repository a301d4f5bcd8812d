//! Error types for document operations.

use quire_primitives::GeometryError;
use thiserror::Error;

/// Errors raised by the document layer.
///
/// Out-of-bounds positions and ranges are clamped rather than reported; only
/// requests that cannot be answered at all surface here.
#[derive(Debug, Error)]
pub enum DocumentError {
	/// A host locator could not be turned into a resource identifier.
	#[error("invalid resource locator {locator:?}: {reason}")]
	InvalidLocator {
		/// The locator the host supplied.
		locator: String,
		/// Why it was rejected.
		reason: String,
	},

	/// A line index beyond the end of the document.
	#[error("line {line} out of range (document has {line_count} lines)")]
	LineOutOfRange {
		/// The requested line.
		line: u32,
		/// Number of lines in the document.
		line_count: u32,
	},

	/// The host buffer was destroyed before it could be opened.
	#[error("host buffer {locator:?} is already destroyed")]
	BufferDestroyed {
		/// The locator the host supplied.
		locator: String,
	},

	/// Malformed options.
	#[error("invalid document options: {0}")]
	Config(#[from] toml::de::Error),

	/// A value could not be expressed in protocol form.
	#[error(transparent)]
	Geometry(#[from] GeometryError),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
