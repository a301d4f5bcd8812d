//! The editor host's buffer contract.
//!
//! A host exposes its live buffer in its own `(row, column)` coordinates.
//! Nothing in this module knows about [`quire_primitives::Position`]; the
//! translation happens in [`crate::adapter`].

use std::sync::Arc;

use crate::disposable::BoxDisposable;

/// A host-native buffer coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostPoint {
	/// Zero-based row.
	pub row: usize,
	/// Zero-based column within the row.
	pub column: usize,
}

impl HostPoint {
	/// Creates a new point.
	pub const fn new(row: usize, column: usize) -> Self {
		Self { row, column }
	}
}

/// A host-native span, start before end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HostRange {
	/// Inclusive start.
	pub start: HostPoint,
	/// Exclusive end.
	pub end: HostPoint,
}

impl HostRange {
	/// Creates a new range.
	pub const fn new(start: HostPoint, end: HostPoint) -> Self {
		Self { start, end }
	}
}

/// Payload of a host change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostChange {
	/// The replaced span, in pre-change coordinates.
	pub old_range: HostRange,
	/// The inserted span, in post-change coordinates.
	pub new_range: HostRange,
	/// Text that was removed.
	pub old_text: String,
	/// Text that was inserted.
	pub new_text: String,
}

impl HostChange {
	/// Returns true if the change left the buffer content untouched.
	pub fn is_noop(&self) -> bool {
		self.old_range == self.new_range && self.old_text == self.new_text
	}
}

/// Callback receiving change notifications.
pub type ChangeListener = Arc<dyn Fn(&HostChange) + Send + Sync>;

/// Callback receiving payload-free notifications (save, destroy).
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// A live, mutable text buffer owned by an editor host.
///
/// Implementations deliver notifications sequentially and must not hold
/// internal locks while invoking listeners, so listeners may query the
/// buffer re-entrantly.
pub trait HostBuffer: Send + Sync + 'static {
	/// Host-native locator: an absolute path or a URL.
	fn locator(&self) -> String;

	/// Language the host associated with the buffer, if any.
	fn language_hint(&self) -> Option<String>;

	/// Whether the buffer has been destroyed. A destroyed buffer delivers no
	/// further notifications.
	fn is_destroyed(&self) -> bool;

	/// Whether the buffer has unsaved modifications.
	fn is_modified(&self) -> bool;

	/// Number of rows. Always at least one.
	fn line_count(&self) -> usize;

	/// Text of `row` without its terminator, or `None` past the end.
	fn line_text(&self, row: usize) -> Option<String>;

	/// Span of `row`, optionally including its terminator.
	///
	/// Including the terminator extends the span to the start of the next
	/// row; the last row has no terminator.
	fn line_range(&self, row: usize, include_newline: bool) -> HostRange;

	/// Flat character index of `point`, clamped to the buffer.
	fn character_index_for_point(&self, point: HostPoint) -> usize;

	/// Point at flat character `index`, clamped to the buffer.
	fn point_for_character_index(&self, index: usize) -> HostPoint;

	/// Whole buffer text.
	fn text(&self) -> String;

	/// Text covered by `range`.
	fn text_in_range(&self, range: HostRange) -> String;

	/// Span of the word containing `point`, if it sits inside one.
	///
	/// Must not alter the host's cursors or selections.
	fn word_range_at(&self, point: HostPoint) -> Option<HostRange>;

	/// Subscribes to content changes, including undo and redo.
	fn on_did_change(&self, listener: ChangeListener) -> BoxDisposable;

	/// Subscribes to the buffer being destroyed.
	fn on_did_destroy(&self, listener: Listener) -> BoxDisposable;

	/// Subscribes to save completions.
	fn on_did_save(&self, listener: Listener) -> BoxDisposable;

	/// Requests the host persist the buffer.
	///
	/// Returns false when nothing was started. Completion is reported through
	/// [`HostBuffer::on_did_save`], possibly after this call returns.
	fn save(&self) -> bool;
}
