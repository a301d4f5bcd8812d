use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::position::Position;
use crate::range::Range;


/// A range annotated with the gesture that produced it.
///
/// The anchor is where the gesture started and the active end is where it
/// finished (the caret). [`Selection::range`] is the same span with the
/// endpoints geometrically ordered; use it for range operations and keep
/// `anchor`/`active` for intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSelection")]
pub struct Selection {
	anchor: Position,
	active: Position,
	#[serde(skip)]
	range: Range,
}

#[derive(Deserialize)]
struct RawSelection {
	anchor: Position,
	active: Position,
}

impl From<RawSelection> for Selection {
	fn from(raw: RawSelection) -> Self {
		Self::new(raw.anchor, raw.active)
	}
}

impl Selection {
	/// Creates a selection from its anchor and active positions.
	pub fn new(anchor: Position, active: Position) -> Self {
		Self {
			anchor,
			active,
			range: Range::new(anchor, active),
		}
	}

	/// Creates a collapsed selection (a caret) at `position`.
	pub fn caret(position: Position) -> Self {
		Self::new(position, position)
	}

	/// Creates a selection from anchor and active coordinates.
	pub fn from_coordinates(anchor_line: u32, anchor_character: u32, active_line: u32, active_character: u32) -> Self {
		Self::new(Position::new(anchor_line, anchor_character), Position::new(active_line, active_character))
	}

	/// Creates a selection from signed coordinates, rejecting negative components.
	pub fn try_from_coordinates(anchor_line: i64, anchor_character: i64, active_line: i64, active_character: i64) -> Result<Self> {
		Ok(Self::new(
			Position::try_new(anchor_line, anchor_character)?,
			Position::try_new(active_line, active_character)?,
		))
	}

	/// Where the gesture started.
	#[inline]
	pub fn anchor(&self) -> Position {
		self.anchor
	}

	/// Where the gesture ended (the caret).
	#[inline]
	pub fn active(&self) -> Position {
		self.active
	}

	/// The geometrically ordered span.
	#[inline]
	pub fn range(&self) -> Range {
		self.range
	}

	/// The earlier endpoint.
	#[inline]
	pub fn start(&self) -> Position {
		self.range.start()
	}

	/// The later endpoint.
	#[inline]
	pub fn end(&self) -> Position {
		self.range.end()
	}

	/// Returns true if the selection is a caret.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.range.is_empty()
	}

	/// Returns true if the selection spans a single line.
	#[inline]
	pub fn is_single_line(&self) -> bool {
		self.range.is_single_line()
	}

	/// Returns true if the gesture moved backward (the anchor is the end).
	pub fn is_reversed(&self) -> bool {
		!self.is_empty() && self.anchor == self.range.end()
	}

	/// Returns true if `position` lies within the selected span.
	pub fn contains(&self, position: &Position) -> bool {
		self.range.contains(position)
	}
}

impl From<Selection> for Range {
	fn from(selection: Selection) -> Self {
		selection.range
	}
}

impl TryFrom<&[i64]> for Selection {
	type Error = GeometryError;

	/// Builds a selection from exactly four scalars: anchor, then active.
	fn try_from(coordinates: &[i64]) -> Result<Self> {
		match *coordinates {
			[al, ac, pl, pc] => Self::try_from_coordinates(al, ac, pl, pc),
			_ => Err(GeometryError::InvalidArguments {
				expected: 4,
				found: coordinates.len(),
			}),
		}
	}
}
