//! Open document tracking.
//!
//! [`DocumentRegistry`] keeps at most one adapter per resource. Adapters
//! remove themselves when their host buffer is destroyed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use quire_primitives::{OffsetEncoding, Url, WorkspaceEdit};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::adapter::{BufferDocument, CloseHook};
use crate::disposable::Disposable;
use crate::document::TextDocument;
use crate::error::{DocumentError, Result};
use crate::host::HostBuffer;
use crate::options::DocumentOptions;
use crate::resource;

/// Lifecycle notification for an open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
	/// An adapter was created.
	Opened {
		/// Resource identifier.
		uri: Url,
		/// Initial version.
		version: i32,
	},
	/// The content changed and the version advanced.
	Changed {
		/// Resource identifier.
		uri: Url,
		/// Version after the change.
		version: i32,
	},
	/// The host finished saving.
	Saved {
		/// Resource identifier.
		uri: Url,
	},
	/// The document closed.
	Closed {
		/// Resource identifier.
		uri: Url,
	},
}

impl DocumentEvent {
	/// The resource the event refers to.
	pub fn uri(&self) -> &Url {
		match self {
			Self::Opened { uri, .. } | Self::Changed { uri, .. } | Self::Saved { uri } | Self::Closed { uri } => uri,
		}
	}
}

/// Sender for document events.
pub type DocumentEventSender = mpsc::UnboundedSender<DocumentEvent>;

/// Receiver for document events.
pub type DocumentEventReceiver = mpsc::UnboundedReceiver<DocumentEvent>;

/// A document the registry can hand out and close.
pub trait ManagedDocument: TextDocument + Disposable {}

impl<T: TextDocument + Disposable> ManagedDocument for T {}

/// Shared handle to an open document.
pub type DocumentHandle = Arc<dyn ManagedDocument>;

struct Slot {
	id: u64,
	handle: DocumentHandle,
}

type Slots = RwLock<IndexMap<String, Slot>>;

/// Registry of open documents keyed by canonical URI string.
pub struct DocumentRegistry {
	documents: Arc<Slots>,
	options: DocumentOptions,
	event_sender: Option<DocumentEventSender>,
	next_id: AtomicU64,
}

impl std::fmt::Debug for DocumentRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DocumentRegistry")
			.field("documents", &self.uris())
			.field("has_event_sender", &self.event_sender.is_some())
			.finish()
	}
}

impl Default for DocumentRegistry {
	fn default() -> Self {
		Self::new(DocumentOptions::default())
	}
}

impl DocumentRegistry {
	/// Create an empty registry.
	pub fn new(options: DocumentOptions) -> Self {
		Self {
			documents: Arc::new(RwLock::new(IndexMap::new())),
			options,
			event_sender: None,
			next_id: AtomicU64::new(0),
		}
	}

	/// Create a registry with an event channel.
	///
	/// Returns the registry and a receiver for document events.
	pub fn with_events(options: DocumentOptions) -> (Self, DocumentEventReceiver) {
		let (sender, receiver) = mpsc::unbounded_channel();
		let registry = Self {
			event_sender: Some(sender),
			..Self::new(options)
		};
		(registry, receiver)
	}

	/// Options applied to every adapter this registry creates.
	pub fn options(&self) -> &DocumentOptions {
		&self.options
	}

	/// Returns the document for `buffer`, attaching a new adapter if the
	/// resource is not open yet.
	///
	/// Fails with [`DocumentError::BufferDestroyed`] for a destroyed buffer,
	/// which is never registered.
	pub fn open<B: HostBuffer>(&self, buffer: Arc<B>) -> Result<DocumentHandle> {
		let locator = buffer.locator();
		let destroyed = || DocumentError::BufferDestroyed { locator: locator.clone() };
		if buffer.is_destroyed() {
			return Err(destroyed());
		}
		let uri = resource::resource_from_locator(&locator)?;
		let key = uri.to_string();
		if let Some(slot) = self.documents.read().get(&key) {
			debug!(uri = %uri, "document already open");
			return Ok(slot.handle.clone());
		}

		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let documents: Weak<Slots> = Arc::downgrade(&self.documents);
		let on_close: CloseHook = Box::new(move |uri: &Url| {
			if let Some(documents) = documents.upgrade() {
				let mut documents = documents.write();
				if documents.get(uri.as_str()).is_some_and(|slot| slot.id == id) {
					documents.shift_remove(uri.as_str());
				}
			}
		});
		let handle: DocumentHandle = Arc::new(BufferDocument::attach_with(
			buffer,
			uri.clone(),
			&self.options,
			self.event_sender.clone(),
			Some(on_close),
		));
		if handle.is_closed() {
			return Err(destroyed());
		}

		let existing = {
			let mut documents = self.documents.write();
			match documents.get(&key) {
				Some(slot) => Some(slot.handle.clone()),
				None => {
					documents.insert(key, Slot {
						id,
						handle: handle.clone(),
					});
					None
				}
			}
		};
		if let Some(existing) = existing {
			warn!(uri = %uri, "document opened concurrently, keeping the first adapter");
			handle.dispose();
			return Ok(existing);
		}

		debug!(uri = %uri, language = handle.language_id(), "document opened");
		self.emit(DocumentEvent::Opened {
			uri,
			version: handle.version(),
		});
		Ok(handle)
	}

	/// Closes the document for `uri`. Returns false if it was not open.
	pub fn close(&self, uri: &Url) -> bool {
		let removed = self.documents.write().shift_remove(uri.as_str());
		match removed {
			Some(slot) => {
				slot.handle.dispose();
				true
			}
			None => false,
		}
	}

	/// Closes every open document.
	pub fn close_all(&self) {
		let slots: Vec<Slot> = self.documents.write().drain(..).map(|(_, slot)| slot).collect();
		for slot in slots {
			slot.handle.dispose();
		}
	}

	/// Returns the open document for `uri`.
	pub fn get(&self, uri: &Url) -> Option<DocumentHandle> {
		self.documents.read().get(uri.as_str()).map(|slot| slot.handle.clone())
	}

	/// Returns true if `uri` is open.
	pub fn contains(&self, uri: &Url) -> bool {
		self.documents.read().contains_key(uri.as_str())
	}

	/// Number of open documents.
	pub fn len(&self) -> usize {
		self.documents.read().len()
	}

	/// Returns true if no documents are open.
	pub fn is_empty(&self) -> bool {
		self.documents.read().is_empty()
	}

	/// Open resources, in opening order.
	pub fn uris(&self) -> Vec<Url> {
		self.documents.read().values().map(|slot| slot.handle.uri().clone()).collect()
	}

	/// Open documents, in opening order.
	pub fn documents(&self) -> Vec<DocumentHandle> {
		self.documents.read().values().map(|slot| slot.handle.clone()).collect()
	}

	/// Builds a protocol workspace edit with columns counted in `encoding`.
	///
	/// Columns are re-encoded against the current text of open documents.
	/// Edits for resources that are not open keep their columns unchanged.
	pub fn encode_workspace_edit(&self, edit: &WorkspaceEdit, encoding: OffsetEncoding) -> Result<lsp_types::WorkspaceEdit> {
		let wire = edit.to_lsp_with(|uri, range| match self.get(uri) {
			Some(document) => document.to_lsp_range(range, encoding),
			None => (*range).into(),
		})?;
		Ok(wire)
	}

	fn emit(&self, event: DocumentEvent) {
		if let Some(sender) = &self.event_sender {
			let _ = sender.send(event);
		}
	}
}
