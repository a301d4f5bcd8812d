//! Multi-resource edit descriptions.

use indexmap::IndexMap;
use indexmap::map::Entry;
use url::Url;

use crate::edit::TextEdit;
use crate::position::Position;
use crate::range::Range;

/// Text edits grouped by resource.
///
/// Keyed by the canonical string form of each resource. Resources iterate in
/// the order they were first touched, and each resource holds exactly one
/// ordered edit sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceEdit {
	entries: IndexMap<String, ResourceEdits>,
}

/// The edits recorded for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEdits {
	/// The resource the edits apply to.
	pub uri: Url,
	/// Edits in the order they were recorded.
	pub edits: Vec<TextEdit>,
}

impl WorkspaceEdit {
	/// Creates an empty workspace edit.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the whole edit sequence for `uri`.
	pub fn set(&mut self, uri: &Url, edits: Vec<TextEdit>) {
		match self.entries.entry(uri.to_string()) {
			Entry::Occupied(mut entry) => entry.get_mut().edits = edits,
			Entry::Vacant(entry) => {
				entry.insert(ResourceEdits { uri: uri.clone(), edits });
			}
		}
	}

	/// Appends an edit replacing `range` with `new_text`.
	pub fn replace(&mut self, uri: &Url, range: Range, new_text: impl Into<String>) {
		self.push(uri, TextEdit::replace(range, new_text));
	}

	/// Appends an edit inserting `new_text` at `position`.
	pub fn insert(&mut self, uri: &Url, position: Position, new_text: impl Into<String>) {
		self.push(uri, TextEdit::insert(position, new_text));
	}

	/// Appends an edit deleting `range`.
	pub fn delete(&mut self, uri: &Url, range: Range) {
		self.push(uri, TextEdit::delete(range));
	}

	/// Appends `edit` to the sequence for `uri`, creating it if absent.
	pub fn push(&mut self, uri: &Url, edit: TextEdit) {
		self.entries
			.entry(uri.to_string())
			.or_insert_with(|| ResourceEdits {
				uri: uri.clone(),
				edits: Vec::new(),
			})
			.edits
			.push(edit);
	}

	/// Returns the edits recorded for `uri`.
	pub fn get(&self, uri: &Url) -> Option<&[TextEdit]> {
		self.entries.get(uri.as_str()).map(|e| e.edits.as_slice())
	}

	/// Returns true if any edit sequence exists for `uri`.
	pub fn has(&self, uri: &Url) -> bool {
		self.entries.contains_key(uri.as_str())
	}

	/// Number of distinct resources touched.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no resource has been touched.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates resources in first-touch order.
	pub fn entries(&self) -> impl Iterator<Item = &ResourceEdits> {
		self.entries.values()
	}

	/// Iterates every `(uri, edit)` pair, grouped by resource.
	pub fn iter_edits(&self) -> impl Iterator<Item = (&Url, &TextEdit)> {
		self.entries.values().flat_map(|e| e.edits.iter().map(move |edit| (&e.uri, edit)))
	}
}
