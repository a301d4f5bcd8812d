//! [`TextDocument`] over a live [`HostBuffer`].
//!
//! The adapter owns no text. Every query reads the host buffer at call time
//! and translates between host points and [`Position`]s at this boundary.
//! The adapter keeps only its version counter and closed flag, both driven
//! by host notifications.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use quire_primitives::{Position, Range, Url};
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::disposable::{CompositeDisposable, Disposable};
use crate::document::{TextDocument, TextLine};
use crate::error::{DocumentError, Result};
use crate::host::{HostBuffer, HostChange, HostPoint, HostRange};
use crate::options::DocumentOptions;
use crate::registry::{DocumentEvent, DocumentEventSender};
use crate::resource;

/// Runs once when the adapter closes.
pub(crate) type CloseHook = Box<dyn FnOnce(&Url) + Send>;

fn clamp_u32(value: usize) -> u32 {
	u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_point(position: &Position) -> HostPoint {
	HostPoint::new(position.line as usize, position.character as usize)
}

fn to_position(point: HostPoint) -> Position {
	Position::new(clamp_u32(point.row), clamp_u32(point.column))
}

fn to_host_range(range: &Range) -> HostRange {
	HostRange::new(to_point(&range.start()), to_point(&range.end()))
}

fn to_range(range: HostRange) -> Range {
	Range::new(to_position(range.start), to_position(range.end))
}

/// State shared between the adapter and its host listeners.
struct Lifecycle {
	uri: Url,
	version: AtomicI32,
	closed: AtomicBool,
	subscriptions: CompositeDisposable,
	on_close: Mutex<Option<CloseHook>>,
	events: Option<DocumentEventSender>,
}

impl Lifecycle {
	fn emit(&self, event: DocumentEvent) {
		if let Some(sender) = &self.events {
			let _ = sender.send(event);
		}
	}

	fn changed(&self, change: &HostChange, count_noop: bool) {
		if self.closed.load(Ordering::Acquire) {
			return;
		}
		if change.is_noop() && !count_noop {
			trace!(uri = %self.uri, "ignoring no-op change");
			return;
		}
		let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
		trace!(uri = %self.uri, version, "document changed");
		self.emit(DocumentEvent::Changed {
			uri: self.uri.clone(),
			version,
		});
	}

	/// Releases host subscriptions and fires the close hook, once.
	fn close(&self) {
		if self.closed.swap(true, Ordering::AcqRel) {
			return;
		}
		self.subscriptions.dispose();
		let hook = self.on_close.lock().take();
		if let Some(hook) = hook {
			hook(&self.uri);
		}
		debug!(uri = %self.uri, "document closed");
		self.emit(DocumentEvent::Closed { uri: self.uri.clone() });
	}
}

/// A [`TextDocument`] view of one host buffer.
///
/// Closes when the host buffer is destroyed or when disposed. Once closed,
/// the version stops changing and further host notifications are ignored.
pub struct BufferDocument<B: HostBuffer> {
	buffer: Arc<B>,
	language_id: String,
	state: Arc<Lifecycle>,
}

impl<B: HostBuffer> BufferDocument<B> {
	/// Attaches to `buffer` and subscribes to its notifications.
	///
	/// Fails if the buffer's locator is not a valid resource identifier or
	/// the buffer is already destroyed.
	pub fn attach(buffer: Arc<B>, options: &DocumentOptions) -> Result<Self> {
		let uri = resource::resource_from_locator(&buffer.locator())?;
		let document = Self::attach_with(buffer, uri, options, None, None);
		if document.is_closed() {
			return Err(DocumentError::BufferDestroyed {
				locator: document.buffer.locator(),
			});
		}
		Ok(document)
	}

	pub(crate) fn attach_with(
		buffer: Arc<B>,
		uri: Url,
		options: &DocumentOptions,
		events: Option<DocumentEventSender>,
		on_close: Option<CloseHook>,
	) -> Self {
		let language_id = options.resolve_language(&resource::display_name(&uri), buffer.language_hint());
		let state = Arc::new(Lifecycle {
			uri,
			version: AtomicI32::new(options.initial_version),
			closed: AtomicBool::new(false),
			subscriptions: CompositeDisposable::new(),
			on_close: Mutex::new(on_close),
			events,
		});

		let count_noop = options.count_noop_changes;
		let weak: Weak<Lifecycle> = Arc::downgrade(&state);
		state.subscriptions.add(buffer.on_did_change(Arc::new(move |change: &HostChange| {
			if let Some(state) = weak.upgrade() {
				state.changed(change, count_noop);
			}
		})));

		let weak = Arc::downgrade(&state);
		state.subscriptions.add(buffer.on_did_destroy(Arc::new(move || {
			if let Some(state) = weak.upgrade() {
				debug!(uri = %state.uri, "host buffer destroyed");
				state.close();
			}
		})));

		let weak = Arc::downgrade(&state);
		state.subscriptions.add(buffer.on_did_save(Arc::new(move || {
			if let Some(state) = weak.upgrade() {
				state.emit(DocumentEvent::Saved { uri: state.uri.clone() });
			}
		})));

		// The destroy notification cannot arrive for a buffer destroyed before
		// the subscriptions above were made.
		if buffer.is_destroyed() {
			debug!(uri = %state.uri, "host buffer destroyed before attach");
			state.close();
		} else {
			debug!(uri = %state.uri, language = %language_id, version = options.initial_version, "document attached");
		}
		Self {
			buffer,
			language_id,
			state,
		}
	}

	/// The host buffer this document reads from.
	pub fn buffer(&self) -> &Arc<B> {
		&self.buffer
	}
}

#[async_trait]
impl<B: HostBuffer> TextDocument for BufferDocument<B> {
	fn uri(&self) -> &Url {
		&self.state.uri
	}

	fn language_id(&self) -> &str {
		&self.language_id
	}

	fn version(&self) -> i32 {
		self.state.version.load(Ordering::Acquire)
	}

	fn is_dirty(&self) -> bool {
		self.buffer.is_modified()
	}

	fn is_closed(&self) -> bool {
		self.state.closed.load(Ordering::Acquire)
	}

	fn line_count(&self) -> u32 {
		clamp_u32(self.buffer.line_count().max(1))
	}

	fn line_length(&self, line: u32) -> u32 {
		clamp_u32(self.buffer.line_range(line as usize, false).end.column)
	}

	fn line_at(&self, line: u32) -> Result<TextLine> {
		let line_count = self.line_count();
		let out_of_range = || DocumentError::LineOutOfRange { line, line_count };
		if line >= line_count {
			return Err(out_of_range());
		}
		let text = self.buffer.line_text(line as usize).ok_or_else(out_of_range)?;
		let including_break = to_range(self.buffer.line_range(line as usize, true));
		Ok(TextLine::new(line, text, including_break))
	}

	fn offset_at(&self, position: &Position) -> usize {
		let position = self.validate_position(position);
		self.buffer.character_index_for_point(to_point(&position))
	}

	fn position_at(&self, offset: usize) -> Position {
		to_position(self.buffer.point_for_character_index(offset))
	}

	fn get_text(&self, range: Option<&Range>) -> String {
		match range {
			None => self.buffer.text(),
			Some(range) => self.buffer.text_in_range(to_host_range(&self.validate_range(range))),
		}
	}

	fn word_range_at(&self, position: &Position) -> Option<Range> {
		let position = self.validate_position(position);
		self.buffer.word_range_at(to_point(&position)).map(to_range)
	}

	async fn save(&self) -> bool {
		if self.is_closed() {
			return false;
		}
		let (tx, rx) = oneshot::channel::<()>();
		let tx = Mutex::new(Some(tx));
		let completion = self.buffer.on_did_save(Arc::new(move || {
			if let Some(tx) = tx.lock().take() {
				let _ = tx.send(());
			}
		}));

		if !self.buffer.save() {
			completion.dispose();
			debug!(uri = %self.state.uri, "save not started");
			return false;
		}

		// Resolves with an error if the host drops the listener, e.g. on destroy.
		let saved = rx.await.is_ok();
		completion.dispose();
		debug!(uri = %self.state.uri, saved, "save finished");
		saved
	}
}

impl<B: HostBuffer> Disposable for BufferDocument<B> {
	fn dispose(&self) {
		self.state.close();
	}
}

/// Dropping closes the document exactly like [`Disposable::dispose`].
impl<B: HostBuffer> Drop for BufferDocument<B> {
	fn drop(&mut self) {
		self.state.close();
	}
}

impl<B: HostBuffer> std::fmt::Debug for BufferDocument<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BufferDocument")
			.field("uri", &self.state.uri.as_str())
			.field("language_id", &self.language_id)
			.field("version", &self.version())
			.field("closed", &self.is_closed())
			.finish()
	}
}

#[cfg(test)]
mod tests;
