//! Text edit descriptions.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::range::Range;

/// A range plus its replacement text.
///
/// Constructing an edit has no effect on any document; it only describes a
/// mutation for a consumer to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
	/// The span being replaced.
	pub range: Range,
	/// The replacement text. Empty for deletions.
	#[serde(default)]
	pub new_text: String,
}

impl TextEdit {
	/// Creates an edit replacing `range` with `new_text`.
	pub fn new(range: Range, new_text: impl Into<String>) -> Self {
		Self {
			range,
			new_text: new_text.into(),
		}
	}

	/// Replaces `range` with `new_text`.
	pub fn replace(range: Range, new_text: impl Into<String>) -> Self {
		Self::new(range, new_text)
	}

	/// Inserts `new_text` at `position`.
	pub fn insert(position: Position, new_text: impl Into<String>) -> Self {
		Self::new(Range::empty(position), new_text)
	}

	/// Deletes the text in `range`.
	pub fn delete(range: Range) -> Self {
		Self::new(range, String::new())
	}

	/// Returns true if the edit only inserts text.
	pub fn is_insert(&self) -> bool {
		self.range.is_empty() && !self.new_text.is_empty()
	}

	/// Returns true if the edit only removes text.
	pub fn is_delete(&self) -> bool {
		!self.range.is_empty() && self.new_text.is_empty()
	}
}
