//! The text document query contract.

use std::borrow::Cow;

use async_trait::async_trait;
use quire_primitives::{OffsetEncoding, Position, Range, Url};

use crate::error::Result;
use crate::resource;

/// A snapshot of one line, taken at query time.
///
/// A `TextLine` never updates after later edits to the line it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
	/// Zero-based line number.
	pub line_number: u32,
	/// Line content without its terminator.
	pub text: String,
	/// Span of the line, excluding the terminator.
	pub range: Range,
	/// Span of the line including the terminator; deleting it removes the
	/// whole line.
	pub range_including_line_break: Range,
	/// Index of the first non-whitespace character, or the line length when
	/// the line is blank.
	pub first_non_whitespace_character_index: u32,
	/// True when `first_non_whitespace_character_index` equals the line length.
	pub is_empty_or_whitespace: bool,
}

impl TextLine {
	/// Builds a line snapshot from its text and its terminator-inclusive span.
	pub fn new(line_number: u32, text: String, range_including_line_break: Range) -> Self {
		let length = char_len(&text);
		let first_non_whitespace = char_len_u32(text.chars().take_while(|c| c.is_whitespace()).count());
		Self {
			line_number,
			range: Range::from_coordinates(line_number, 0, line_number, length),
			range_including_line_break,
			first_non_whitespace_character_index: first_non_whitespace,
			is_empty_or_whitespace: first_non_whitespace == length,
			text,
		}
	}

	/// Length of the line in characters.
	pub fn len(&self) -> u32 {
		self.range.end().character
	}

	/// Returns true if the line has no characters at all.
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

fn char_len(text: &str) -> u32 {
	char_len_u32(text.chars().count())
}

fn char_len_u32(len: usize) -> u32 {
	u32::try_from(len).unwrap_or(u32::MAX)
}

/// Text of `line`, or empty past the last line.
fn line_text<D: TextDocument + ?Sized>(document: &D, line: u32) -> String {
	document.line_at(line).map(|line| line.text).unwrap_or_default()
}

/// Read access to one open resource.
///
/// Out-of-bounds positions and ranges passed to any query are clamped into
/// the document rather than rejected.
#[async_trait]
pub trait TextDocument: Send + Sync {
	/// The resource identifier.
	fn uri(&self) -> &Url;

	/// Display name: the last segment of the resource path.
	fn file_name(&self) -> String {
		resource::display_name(self.uri())
	}

	/// Returns true if the resource has never been saved.
	fn is_untitled(&self) -> bool {
		resource::is_untitled(self.uri())
	}

	/// Language identifier.
	fn language_id(&self) -> &str;

	/// Version counter. Strictly increases on every content change.
	fn version(&self) -> i32;

	/// Whether there are unsaved changes.
	fn is_dirty(&self) -> bool;

	/// Whether the document has been closed.
	fn is_closed(&self) -> bool;

	/// Number of lines. Always at least one.
	fn line_count(&self) -> u32;

	/// Length of `line` in characters, excluding its terminator.
	fn line_length(&self, line: u32) -> u32;

	/// Snapshot of `line`.
	///
	/// Fails with [`crate::DocumentError::LineOutOfRange`] past the last line.
	fn line_at(&self, line: u32) -> Result<TextLine>;

	/// Snapshot of the line containing `position`.
	fn line_at_position(&self, position: &Position) -> Result<TextLine> {
		self.line_at(position.line)
	}

	/// Flat character offset of `position` after validation.
	fn offset_at(&self, position: &Position) -> usize;

	/// Position of flat character `offset`, clamped to the document end.
	fn position_at(&self, offset: usize) -> Position;

	/// Whole text, or the text of the validated `range`.
	fn get_text(&self, range: Option<&Range>) -> String;

	/// Span of the word at the validated `position`, if it sits inside one.
	fn word_range_at(&self, position: &Position) -> Option<Range>;

	/// Clamps `position` into the document.
	///
	/// Past the last line clamps to the end of the document; past the end of
	/// a line clamps to the end of that line. Returns the borrowed input when
	/// nothing changed.
	fn validate_position<'a>(&self, position: &'a Position) -> Cow<'a, Position> {
		let line_count = self.line_count();
		if position.line >= line_count {
			let last = line_count.saturating_sub(1);
			return Cow::Owned(Position::new(last, self.line_length(last)));
		}
		let max_character = self.line_length(position.line);
		if position.character > max_character {
			return Cow::Owned(position.with(None, Some(max_character)));
		}
		Cow::Borrowed(position)
	}

	/// Clamps both endpoints of `range`.
	///
	/// Returns the borrowed input when neither endpoint changed.
	fn validate_range<'a>(&self, range: &'a Range) -> Cow<'a, Range> {
		let start = range.start();
		let end = range.end();
		match (self.validate_position(&start), self.validate_position(&end)) {
			(Cow::Borrowed(_), Cow::Borrowed(_)) => Cow::Borrowed(range),
			(start, end) => Cow::Owned(Range::new(start.into_owned(), end.into_owned())),
		}
	}

	/// Converts `position` to protocol form, counting its column in
	/// `encoding` units of its line.
	///
	/// Columns past the end of the line keep their excess unchanged.
	fn to_lsp_position(&self, position: &Position, encoding: OffsetEncoding) -> lsp_types::Position {
		position.to_lsp_encoded(&line_text(self, position.line), encoding)
	}

	/// Converts a protocol position whose column counts `encoding` units.
	fn from_lsp_position(&self, position: lsp_types::Position, encoding: OffsetEncoding) -> Position {
		Position::from_lsp_encoded(position, &line_text(self, position.line), encoding)
	}

	/// [`TextDocument::to_lsp_position`] for both endpoints of `range`.
	fn to_lsp_range(&self, range: &Range, encoding: OffsetEncoding) -> lsp_types::Range {
		lsp_types::Range::new(
			self.to_lsp_position(&range.start(), encoding),
			self.to_lsp_position(&range.end(), encoding),
		)
	}

	/// [`TextDocument::from_lsp_position`] for both endpoints of `range`.
	fn from_lsp_range(&self, range: lsp_types::Range, encoding: OffsetEncoding) -> Range {
		Range::new(
			self.from_lsp_position(range.start, encoding),
			self.from_lsp_position(range.end, encoding),
		)
	}

	/// Asks the host to persist the document.
	///
	/// Resolves true once the host confirms the save, false if nothing was
	/// saved.
	async fn save(&self) -> bool;
}
