//! In-memory host buffer backed by a [`Rope`].
//!
//! [`RopeBuffer`] implements [`HostBuffer`] with snapshot undo/redo and an
//! optional deferred save, which is enough to drive adapters without a real
//! editor.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use ropey::{Rope, RopeSlice};
use slab::Slab;
use tracing::{debug, trace};

use crate::disposable::{BoxDisposable, DisposeFn};
use crate::host::{ChangeListener, HostBuffer, HostChange, HostPoint, HostRange, Listener};

/// Returns true if the character is part of a word (alphanumeric or underscore).
pub fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

fn is_line_break(c: char) -> bool {
	matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Number of terminator characters at the end of `line`.
fn terminator_len(line: RopeSlice) -> usize {
	let len = line.len_chars();
	let last = len.checked_sub(1).and_then(|i| line.get_char(i));
	let before_last = len.checked_sub(2).and_then(|i| line.get_char(i));
	match (before_last, last) {
		(Some('\r'), Some('\n')) => 2,
		(_, Some(c)) if is_line_break(c) => 1,
		_ => 0,
	}
}

fn content_len(line: RopeSlice) -> usize {
	line.len_chars() - terminator_len(line)
}

fn last_row(rope: &Rope) -> usize {
	rope.len_lines().saturating_sub(1)
}

fn char_index(rope: &Rope, point: HostPoint) -> usize {
	let row = point.row.min(last_row(rope));
	let column = point.column.min(content_len(rope.line(row)));
	rope.line_to_char(row) + column
}

fn point_at(rope: &Rope, index: usize) -> HostPoint {
	let index = index.min(rope.len_chars());
	let row = rope.char_to_line(index);
	let column = index - rope.line_to_char(row);
	HostPoint::new(row, column.min(content_len(rope.line(row))))
}

fn span(rope: &Rope, start: usize, end: usize) -> HostRange {
	HostRange::new(point_at(rope, start), point_at(rope, end))
}

fn full_span(rope: &Rope) -> HostRange {
	span(rope, 0, rope.len_chars())
}

#[derive(Default)]
struct Listeners {
	change: Slab<ChangeListener>,
	destroy: Slab<Listener>,
	save: Slab<Listener>,
}

#[derive(Clone, Copy)]
enum ListenerKind {
	Change,
	Destroy,
	Save,
}

struct BufferState {
	rope: Rope,
	saved: Rope,
	undo: Vec<Rope>,
	redo: Vec<Rope>,
	destroyed: bool,
	deferred_save: bool,
	pending_save: bool,
}

/// A rope-backed [`HostBuffer`].
///
/// Listeners are invoked after every internal lock has been released.
pub struct RopeBuffer {
	locator: String,
	language_hint: Option<String>,
	state: RwLock<BufferState>,
	listeners: Arc<Mutex<Listeners>>,
}

impl RopeBuffer {
	/// Creates an unmodified buffer holding `text`.
	pub fn new(locator: impl Into<String>, text: &str) -> Self {
		let rope = Rope::from_str(text);
		Self {
			locator: locator.into(),
			language_hint: None,
			state: RwLock::new(BufferState {
				saved: rope.clone(),
				rope,
				undo: Vec::new(),
				redo: Vec::new(),
				destroyed: false,
				deferred_save: false,
				pending_save: false,
			}),
			listeners: Arc::new(Mutex::new(Listeners::default())),
		}
	}

	/// Sets the language the buffer reports to adapters.
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language_hint = Some(language.into());
		self
	}

	/// Number of characters in the buffer.
	pub fn len_chars(&self) -> usize {
		self.state.read().rope.len_chars()
	}

	/// Inserts `text` at flat character `index`.
	pub fn insert(&self, index: usize, text: &str) -> bool {
		self.apply(index, index, text)
	}

	/// Deletes the characters in `range`.
	pub fn delete(&self, range: std::ops::Range<usize>) -> bool {
		self.apply(range.start, range.end, "")
	}

	/// Replaces the characters in `range` with `text`.
	pub fn replace(&self, range: std::ops::Range<usize>, text: &str) -> bool {
		self.apply(range.start, range.end, text)
	}

	/// Replaces the whole content.
	pub fn set_text(&self, text: &str) -> bool {
		self.apply(0, usize::MAX, text)
	}

	/// Reverts the most recent edit. Returns false if there is nothing to undo.
	pub fn undo(&self) -> bool {
		self.restore(|state| state.undo.pop(), |state, current| state.redo.push(current))
	}

	/// Reapplies the most recently undone edit.
	pub fn redo(&self) -> bool {
		self.restore(|state| state.redo.pop(), |state, current| state.undo.push(current))
	}

	/// When set, [`HostBuffer::save`] only starts a save; it completes on
	/// [`RopeBuffer::complete_pending_save`].
	pub fn set_deferred_save(&self, deferred: bool) {
		self.state.write().deferred_save = deferred;
	}

	/// Finishes a deferred save. Returns false if none was pending.
	pub fn complete_pending_save(&self) -> bool {
		{
			let mut state = self.state.write();
			if !state.pending_save || state.destroyed {
				return false;
			}
			state.pending_save = false;
			state.saved = state.rope.clone();
		}
		self.notify_saved();
		true
	}

	/// Destroys the buffer, notifying and then dropping every listener.
	///
	/// Edits and subscriptions are ignored afterwards.
	pub fn destroy(&self) {
		{
			let mut state = self.state.write();
			if state.destroyed {
				return;
			}
			state.destroyed = true;
			state.pending_save = false;
		}
		let destroy: Vec<Listener> = {
			let mut listeners = self.listeners.lock();
			let taken = std::mem::take(&mut *listeners);
			taken.destroy.into_iter().map(|(_, listener)| listener).collect()
		};
		debug!(locator = %self.locator, listeners = destroy.len(), "buffer destroyed");
		for listener in destroy {
			listener();
		}
	}

	fn apply(&self, start: usize, end: usize, text: &str) -> bool {
		let change = {
			let mut state = self.state.write();
			if state.destroyed {
				return false;
			}
			let len = state.rope.len_chars();
			let start = start.min(len);
			let end = end.clamp(start, len);
			let old_range = span(&state.rope, start, end);
			let old_text = state.rope.slice(start..end).to_string();

			let snapshot = state.rope.clone();
			state.undo.push(snapshot);
			state.redo.clear();
			state.rope.remove(start..end);
			state.rope.insert(start, text);

			let new_range = span(&state.rope, start, start + text.chars().count());
			HostChange {
				old_range,
				new_range,
				old_text,
				new_text: text.to_string(),
			}
		};
		self.notify_changed(&change);
		true
	}

	fn restore(
		&self,
		take: impl FnOnce(&mut BufferState) -> Option<Rope>,
		keep: impl FnOnce(&mut BufferState, Rope),
	) -> bool {
		let change = {
			let mut state = self.state.write();
			if state.destroyed {
				return false;
			}
			let Some(target) = take(&mut *state) else {
				return false;
			};
			let current = std::mem::replace(&mut state.rope, target);
			let change = HostChange {
				old_range: full_span(&current),
				new_range: full_span(&state.rope),
				old_text: current.to_string(),
				new_text: state.rope.to_string(),
			};
			keep(&mut *state, current);
			change
		};
		self.notify_changed(&change);
		true
	}

	fn notify_changed(&self, change: &HostChange) {
		let listeners: Vec<ChangeListener> = self.listeners.lock().change.iter().map(|(_, l)| l.clone()).collect();
		trace!(locator = %self.locator, listeners = listeners.len(), "buffer changed");
		for listener in listeners {
			listener(change);
		}
	}

	fn notify_saved(&self) {
		let listeners: Vec<Listener> = self.listeners.lock().save.iter().map(|(_, l)| l.clone()).collect();
		debug!(locator = %self.locator, "buffer saved");
		for listener in listeners {
			listener();
		}
	}

	fn subscribe(&self, kind: ListenerKind, insert: impl FnOnce(&mut Listeners) -> usize) -> BoxDisposable {
		if self.is_destroyed() {
			return Box::new(DisposeFn::new(|| {}));
		}
		let key = insert(&mut self.listeners.lock());
		let listeners: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
		Box::new(DisposeFn::new(move || {
			let Some(listeners) = listeners.upgrade() else {
				return;
			};
			let mut listeners = listeners.lock();
			match kind {
				ListenerKind::Change if listeners.change.contains(key) => drop(listeners.change.remove(key)),
				ListenerKind::Destroy if listeners.destroy.contains(key) => drop(listeners.destroy.remove(key)),
				ListenerKind::Save if listeners.save.contains(key) => drop(listeners.save.remove(key)),
				_ => {}
			}
		}))
	}
}

impl HostBuffer for RopeBuffer {
	fn locator(&self) -> String {
		self.locator.clone()
	}

	fn language_hint(&self) -> Option<String> {
		self.language_hint.clone()
	}

	fn is_destroyed(&self) -> bool {
		self.state.read().destroyed
	}

	fn is_modified(&self) -> bool {
		let state = self.state.read();
		state.rope != state.saved
	}

	fn line_count(&self) -> usize {
		self.state.read().rope.len_lines()
	}

	fn line_text(&self, row: usize) -> Option<String> {
		let state = self.state.read();
		let line = state.rope.get_line(row)?;
		Some(line.slice(..content_len(line)).to_string())
	}

	fn line_range(&self, row: usize, include_newline: bool) -> HostRange {
		let state = self.state.read();
		let row = row.min(last_row(&state.rope));
		let start = HostPoint::new(row, 0);
		if include_newline && row < last_row(&state.rope) {
			return HostRange::new(start, HostPoint::new(row + 1, 0));
		}
		HostRange::new(start, HostPoint::new(row, content_len(state.rope.line(row))))
	}

	fn character_index_for_point(&self, point: HostPoint) -> usize {
		char_index(&self.state.read().rope, point)
	}

	fn point_for_character_index(&self, index: usize) -> HostPoint {
		point_at(&self.state.read().rope, index)
	}

	fn text(&self) -> String {
		self.state.read().rope.to_string()
	}

	fn text_in_range(&self, range: HostRange) -> String {
		let state = self.state.read();
		let start = char_index(&state.rope, range.start);
		let end = char_index(&state.rope, range.end).max(start);
		state.rope.slice(start..end).to_string()
	}

	fn word_range_at(&self, point: HostPoint) -> Option<HostRange> {
		let state = self.state.read();
		let text = state.rope.slice(..);
		let index = char_index(&state.rope, point);

		let mut start = index;
		while start > 0 && text.get_char(start - 1).is_some_and(is_word_char) {
			start -= 1;
		}
		let mut end = index;
		while text.get_char(end).is_some_and(is_word_char) {
			end += 1;
		}
		(start < end).then(|| span(&state.rope, start, end))
	}

	fn on_did_change(&self, listener: ChangeListener) -> BoxDisposable {
		self.subscribe(ListenerKind::Change, |l| l.change.insert(listener))
	}

	fn on_did_destroy(&self, listener: Listener) -> BoxDisposable {
		self.subscribe(ListenerKind::Destroy, |l| l.destroy.insert(listener))
	}

	fn on_did_save(&self, listener: Listener) -> BoxDisposable {
		self.subscribe(ListenerKind::Save, |l| l.save.insert(listener))
	}

	fn save(&self) -> bool {
		{
			let mut state = self.state.write();
			if state.destroyed || state.rope == state.saved {
				return false;
			}
			if state.deferred_save {
				state.pending_save = true;
				return true;
			}
			state.saved = state.rope.clone();
		}
		self.notify_saved();
		true
	}
}

impl std::fmt::Debug for RopeBuffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.read();
		f.debug_struct("RopeBuffer")
			.field("locator", &self.locator)
			.field("len_chars", &state.rope.len_chars())
			.field("destroyed", &state.destroyed)
			.finish()
	}
}
