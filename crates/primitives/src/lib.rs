//! Core geometry for text documents: positions, ranges, selections and edits.
//!
//! Everything here is host-agnostic. Coordinates are zero-based
//! `(line, character)` pairs; conversion to and from any particular buffer
//! lives with the document adapters.

/// Edit descriptions.
pub mod edit;
/// Column units used by protocol peers.
pub mod encoding;
/// Geometry construction errors.
pub mod error;
/// Conversions to protocol shapes.
pub mod lsp;
/// Line/character coordinates.
pub mod position;
/// Ordered spans.
pub mod range;
/// Ranges with gestural direction.
pub mod selection;
/// Edits grouped by resource.
pub mod workspace_edit;

pub use edit::TextEdit;
pub use encoding::OffsetEncoding;
pub use error::{GeometryError, Result};
pub use position::Position;
pub use range::Range;
pub use selection::Selection;
pub use url::Url;
pub use workspace_edit::{ResourceEdits, WorkspaceEdit};
