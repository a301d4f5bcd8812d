//! Text documents over live editor buffers.
//!
//! [`TextDocument`] is the read contract consumers program against.
//! [`BufferDocument`] implements it over any [`HostBuffer`] without copying
//! text, and [`DocumentRegistry`] keeps one adapter per open resource.
//! [`RopeBuffer`] is an in-memory host for tools and tests.

/// Host-agnostic adapter over a [`HostBuffer`].
pub mod adapter;
/// Rope-backed reference host.
pub mod buffer;
pub mod disposable;
/// The document query contract.
pub mod document;
pub mod error;
/// The host buffer contract.
pub mod host;
pub mod options;
/// One adapter per open resource.
pub mod registry;
pub mod resource;

pub use adapter::BufferDocument;
pub use buffer::RopeBuffer;
pub use disposable::{BoxDisposable, CompositeDisposable, Disposable, DisposeFn};
pub use document::{TextDocument, TextLine};
pub use error::{DocumentError, Result};
pub use host::{ChangeListener, HostBuffer, HostChange, HostPoint, HostRange, Listener};
pub use options::DocumentOptions;
pub use registry::{DocumentEvent, DocumentEventReceiver, DocumentEventSender, DocumentHandle, DocumentRegistry, ManagedDocument};
pub use quire_primitives::{OffsetEncoding, Position, Range, Selection, TextEdit, Url, WorkspaceEdit};
