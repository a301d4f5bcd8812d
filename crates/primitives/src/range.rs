use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::position::Position;


/// An ordered span between two positions.
///
/// The start is never after the end: constructors swap reversed endpoints
/// rather than rejecting them. A range with equal endpoints is empty and
/// denotes an insertion point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRange")]
pub struct Range {
	start: Position,
	end: Position,
}

#[derive(Deserialize)]
struct RawRange {
	start: Position,
	end: Position,
}

impl From<RawRange> for Range {
	fn from(raw: RawRange) -> Self {
		Self::new(raw.start, raw.end)
	}
}

impl Range {
	/// Creates a range from two positions in either order.
	pub fn new(a: Position, b: Position) -> Self {
		if b.is_before(&a) { Self { start: b, end: a } } else { Self { start: a, end: b } }
	}

	/// Creates an empty range at `position`.
	pub const fn empty(position: Position) -> Self {
		Self {
			start: position,
			end: position,
		}
	}

	/// Creates a range from `(start_line, start_character, end_line, end_character)`.
	pub fn from_coordinates(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
		Self::new(Position::new(start_line, start_character), Position::new(end_line, end_character))
	}

	/// Creates a range from signed coordinates, rejecting negative components.
	pub fn try_from_coordinates(start_line: i64, start_character: i64, end_line: i64, end_character: i64) -> Result<Self> {
		Ok(Self::new(
			Position::try_new(start_line, start_character)?,
			Position::try_new(end_line, end_character)?,
		))
	}

	/// The earlier endpoint.
	#[inline]
	pub fn start(&self) -> Position {
		self.start
	}

	/// The later endpoint.
	#[inline]
	pub fn end(&self) -> Position {
		self.end
	}

	/// Returns true if the endpoints are equal.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if both endpoints are on the same line.
	#[inline]
	pub fn is_single_line(&self) -> bool {
		self.start.line == self.end.line
	}

	/// Returns true if `start <= position <= end`.
	pub fn contains(&self, position: &Position) -> bool {
		self.start.is_before_or_equal(position) && position.is_before_or_equal(&self.end)
	}

	/// Returns true if both endpoints of `other` lie within this range.
	pub fn contains_range(&self, other: &Range) -> bool {
		self.contains(&other.start) && self.contains(&other.end)
	}

	/// Returns the overlap of two ranges.
	///
	/// Ranges that merely touch intersect in an empty range at the shared
	/// point. Returns `None` when the ranges are disjoint.
	pub fn intersection(&self, other: &Range) -> Option<Range> {
		let start = if other.start.is_after(&self.start) { other.start } else { self.start };
		let end = if other.end.is_before(&self.end) { other.end } else { self.end };
		if start.is_after(&end) {
			return None;
		}
		Some(Self { start, end })
	}

	/// Returns the smallest range covering both ranges.
	pub fn union(&self, other: &Range) -> Range {
		if self.contains_range(other) {
			return *self;
		}
		if other.contains_range(self) {
			return *other;
		}
		let start = if other.start.is_before(&self.start) { other.start } else { self.start };
		let end = if other.end.is_after(&self.end) { other.end } else { self.end };
		Self { start, end }
	}

	/// Returns a range with the given endpoints replaced.
	pub fn with(&self, start: Option<Position>, end: Option<Position>) -> Range {
		Self::new(start.unwrap_or(self.start), end.unwrap_or(self.end))
	}
}

impl TryFrom<&[i64]> for Range {
	type Error = GeometryError;

	/// Builds a range from exactly four scalars.
	fn try_from(coordinates: &[i64]) -> Result<Self> {
		match *coordinates {
			[sl, sc, el, ec] => Self::try_from_coordinates(sl, sc, el, ec),
			_ => Err(GeometryError::InvalidArguments {
				expected: 4,
				found: coordinates.len(),
			}),
		}
	}
}

impl std::fmt::Display for Range {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-{}", self.start, self.end)
	}
}
