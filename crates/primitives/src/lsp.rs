//! Conversions to and from [`lsp_types`] protocol shapes.
//!
//! The `From` impls copy columns through unchanged, so they are exact only
//! for peers that negotiated [`lsp_types::PositionEncodingKind::UTF32`]. For
//! any other encoding, re-encode columns against the line text with
//! [`Position::to_lsp_encoded`] and [`Position::from_lsp_encoded`], or with
//! the document-level helpers built on them.

use std::collections::HashMap;
use std::str::FromStr;

use crate::edit::TextEdit;
use crate::encoding::OffsetEncoding;
use crate::error::{GeometryError, Result};
use crate::position::Position;
use crate::range::Range;
use crate::workspace_edit::WorkspaceEdit;

impl OffsetEncoding {
	/// Parses a negotiated position encoding.
	pub fn from_lsp(kind: &lsp_types::PositionEncodingKind) -> Option<Self> {
		match kind.as_str() {
			"utf-8" => Some(Self::Utf8),
			"utf-16" => Some(Self::Utf16),
			"utf-32" => Some(Self::Utf32),
			_ => None,
		}
	}

	/// The protocol name of this encoding.
	pub fn to_lsp(self) -> lsp_types::PositionEncodingKind {
		match self {
			Self::Utf8 => lsp_types::PositionEncodingKind::UTF8,
			Self::Utf16 => lsp_types::PositionEncodingKind::UTF16,
			Self::Utf32 => lsp_types::PositionEncodingKind::UTF32,
		}
	}
}

impl Position {
	/// Converts to a protocol position, re-encoding the column against
	/// `line`, the text of this position's line.
	pub fn to_lsp_encoded(&self, line: &str, encoding: OffsetEncoding) -> lsp_types::Position {
		lsp_types::Position::new(self.line, encoding.encode_column(line, self.character))
	}

	/// Converts from a protocol position whose column counts `encoding` units
	/// on `line`.
	pub fn from_lsp_encoded(position: lsp_types::Position, line: &str, encoding: OffsetEncoding) -> Self {
		Self::new(position.line, encoding.decode_column(line, position.character))
	}
}

/// Copies columns unchanged; exact only under UTF-32 position encoding.
impl From<lsp_types::Position> for Position {
	fn from(p: lsp_types::Position) -> Self {
		Self::new(p.line, p.character)
	}
}

/// Copies columns unchanged; exact only under UTF-32 position encoding.
impl From<Position> for lsp_types::Position {
	fn from(p: Position) -> Self {
		Self::new(p.line, p.character)
	}
}

/// Protocol ranges are not guaranteed to be ordered, so they are normalized.
impl From<lsp_types::Range> for Range {
	fn from(r: lsp_types::Range) -> Self {
		Self::new(r.start.into(), r.end.into())
	}
}

impl From<Range> for lsp_types::Range {
	fn from(r: Range) -> Self {
		Self::new(r.start().into(), r.end().into())
	}
}

impl From<lsp_types::TextEdit> for TextEdit {
	fn from(e: lsp_types::TextEdit) -> Self {
		Self::new(e.range.into(), e.new_text)
	}
}

impl From<TextEdit> for lsp_types::TextEdit {
	fn from(e: TextEdit) -> Self {
		Self::new(e.range.into(), e.new_text)
	}
}

impl WorkspaceEdit {
	/// Builds a protocol workspace edit using the `changes` map, with columns
	/// copied unchanged (UTF-32 position encoding).
	pub fn to_lsp(&self) -> Result<lsp_types::WorkspaceEdit> {
		self.to_lsp_with(|_, range| (*range).into())
	}

	/// Builds a protocol workspace edit, converting each range with
	/// `convert_range(resource, range)`.
	pub fn to_lsp_with(
		&self,
		mut convert_range: impl FnMut(&url::Url, &Range) -> lsp_types::Range,
	) -> Result<lsp_types::WorkspaceEdit> {
		let mut changes = HashMap::with_capacity(self.len());
		for entry in self.entries() {
			let uri = lsp_types::Uri::from_str(entry.uri.as_str()).map_err(|_| GeometryError::InvalidUri(entry.uri.to_string()))?;
			let edits = entry
				.edits
				.iter()
				.map(|edit| lsp_types::TextEdit::new(convert_range(&entry.uri, &edit.range), edit.new_text.clone()))
				.collect();
			changes.insert(uri, edits);
		}
		Ok(lsp_types::WorkspaceEdit::new(changes))
	}
}

#[cfg(test)]
mod tests {
	use url::Url;

	use super::*;

	#[test]
	fn position_round_trip() {
		let p = Position::new(3, 7);
		let wire: lsp_types::Position = p.into();
		assert_eq!(wire, lsp_types::Position::new(3, 7));
		assert_eq!(Position::from(wire), p);
	}

	#[test]
	fn reversed_protocol_range_is_normalized() {
		let wire = lsp_types::Range::new(lsp_types::Position::new(4, 0), lsp_types::Position::new(1, 2));
		let range = Range::from(wire);
		assert_eq!(range, Range::from_coordinates(1, 2, 4, 0));
	}

	#[test]
	fn workspace_edit_to_lsp() {
		let uri = Url::parse("file:///tmp/a.rs").unwrap();
		let mut edit = WorkspaceEdit::new();
		edit.insert(&uri, Position::new(1, 0), "x");
		edit.delete(&uri, Range::from_coordinates(2, 0, 3, 0));

		let wire = edit.to_lsp().unwrap();
		let changes = wire.changes.unwrap();
		assert_eq!(changes.len(), 1);
		let (key, edits) = changes.iter().next().unwrap();
		assert_eq!(key.as_str(), "file:///tmp/a.rs");
		assert_eq!(edits.len(), 2);
		assert_eq!(edits[0].new_text, "x");
		assert_eq!(edits[1].range, lsp_types::Range::new(lsp_types::Position::new(2, 0), lsp_types::Position::new(3, 0)));
	}

	#[test]
	fn plain_conversion_copies_scalar_columns() {
		// "\u{1F600}a": the column after the emoji is 1 scalar but 2 UTF-16 units.
		let after_emoji = Position::new(0, 1);
		assert_eq!(lsp_types::Position::from(after_emoji), lsp_types::Position::new(0, 1));
		assert_eq!(
			after_emoji.to_lsp_encoded("\u{1F600}a", OffsetEncoding::Utf32),
			lsp_types::Position::new(0, 1)
		);
		assert_eq!(
			after_emoji.to_lsp_encoded("\u{1F600}a", OffsetEncoding::Utf16),
			lsp_types::Position::new(0, 2)
		);
		assert_eq!(
			Position::from_lsp_encoded(lsp_types::Position::new(0, 2), "\u{1F600}a", OffsetEncoding::Utf16),
			after_emoji
		);
	}

	#[test]
	fn encoding_kinds() {
		for encoding in [OffsetEncoding::Utf8, OffsetEncoding::Utf16, OffsetEncoding::Utf32] {
			assert_eq!(OffsetEncoding::from_lsp(&encoding.to_lsp()), Some(encoding));
		}
		assert_eq!(OffsetEncoding::from_lsp(&lsp_types::PositionEncodingKind::new("utf-7")), None);
	}

	#[test]
	fn workspace_edit_with_custom_ranges() {
		let uri = Url::parse("file:///tmp/a.rs").unwrap();
		let mut edit = WorkspaceEdit::new();
		edit.replace(&uri, Range::from_coordinates(0, 1, 0, 2), "b");

		let wire = edit
			.to_lsp_with(|_, range| {
				let start = range.start().to_lsp_encoded("\u{1F600}a", OffsetEncoding::Utf16);
				let end = range.end().to_lsp_encoded("\u{1F600}a", OffsetEncoding::Utf16);
				lsp_types::Range::new(start, end)
			})
			.unwrap();
		let changes = wire.changes.unwrap();
		let edits = changes.values().next().unwrap();
		assert_eq!(edits[0].range, lsp_types::Range::new(lsp_types::Position::new(0, 2), lsp_types::Position::new(0, 3)));
	}
}
