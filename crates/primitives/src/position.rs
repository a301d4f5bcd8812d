use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

#[cfg(test)]
mod tests;

/// A zero-based `(line, character)` coordinate in a text document.
///
/// Positions are ordered by line, then by character. They are plain values:
/// every derived operation returns a new position and never mutates in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
	/// Zero-based line index.
	pub line: u32,
	/// Zero-based character offset within the line.
	pub character: u32,
}

/// Wire shape accepted before validation.
#[derive(Deserialize)]
struct RawPosition {
	line: i64,
	character: i64,
}

impl TryFrom<RawPosition> for Position {
	type Error = GeometryError;

	fn try_from(raw: RawPosition) -> Result<Self> {
		Self::try_new(raw.line, raw.character)
	}
}

impl Position {
	/// The origin `(0, 0)`.
	pub const ZERO: Self = Self::new(0, 0);

	/// Creates a new position.
	pub const fn new(line: u32, character: u32) -> Self {
		Self { line, character }
	}

	/// Creates a position from signed components.
	///
	/// Fails with [`GeometryError::InvalidArgument`] naming the first negative
	/// (or out of range) component.
	pub fn try_new(line: i64, character: i64) -> Result<Self> {
		Ok(Self::new(component(line, "line")?, component(character, "character")?))
	}

	/// Returns true if `self` is strictly before `other`.
	pub fn is_before(&self, other: &Position) -> bool {
		self.compare_to(other) == Ordering::Less
	}

	/// Returns true if `self` is before or equal to `other`.
	pub fn is_before_or_equal(&self, other: &Position) -> bool {
		self.compare_to(other) != Ordering::Greater
	}

	/// Returns true if `self` is strictly after `other`.
	pub fn is_after(&self, other: &Position) -> bool {
		!self.is_before_or_equal(other)
	}

	/// Returns true if `self` is after or equal to `other`.
	pub fn is_after_or_equal(&self, other: &Position) -> bool {
		!self.is_before(other)
	}

	/// Returns true if both components are equal.
	pub fn is_equal(&self, other: &Position) -> bool {
		self.compare_to(other) == Ordering::Equal
	}

	/// Compares by line, then by character.
	pub fn compare_to(&self, other: &Position) -> Ordering {
		self.line.cmp(&other.line).then(self.character.cmp(&other.character))
	}

	/// Returns a position shifted by the given deltas.
	///
	/// Fails if the shift would make a component negative.
	pub fn translate(&self, line_delta: i64, character_delta: i64) -> Result<Self> {
		if line_delta == 0 && character_delta == 0 {
			return Ok(*self);
		}
		Self::try_new(i64::from(self.line) + line_delta, i64::from(self.character) + character_delta)
	}

	/// Returns a position with the given components replaced.
	pub fn with(&self, line: Option<u32>, character: Option<u32>) -> Self {
		Self::new(line.unwrap_or(self.line), character.unwrap_or(self.character))
	}

	/// Returns the earliest position, keeping the first of equal candidates.
	///
	/// Returns `None` for an empty input.
	pub fn min_of(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
		positions.into_iter().reduce(|min, p| if p.is_before(&min) { p } else { min })
	}

	/// Returns the latest position, keeping the first of equal candidates.
	///
	/// Returns `None` for an empty input.
	pub fn max_of(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
		positions.into_iter().reduce(|max, p| if p.is_after(&max) { p } else { max })
	}
}

impl std::fmt::Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.character)
	}
}

fn component(value: i64, name: &'static str) -> Result<u32> {
	u32::try_from(value).map_err(|_| GeometryError::InvalidArgument { name })
}
