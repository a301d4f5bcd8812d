//! Releasable registrations.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// A registration that can be released.
///
/// Disposing more than once must be harmless.
pub trait Disposable: Send + Sync {
	/// Releases the registration.
	fn dispose(&self);
}

/// A boxed, type-erased [`Disposable`].
pub type BoxDisposable = Box<dyn Disposable>;

/// Runs a closure the first time it is disposed.
pub struct DisposeFn {
	action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl DisposeFn {
	/// Wraps `action`.
	pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
		Self {
			action: Mutex::new(Some(Box::new(action))),
		}
	}

	/// Returns true once the closure has run.
	pub fn is_disposed(&self) -> bool {
		self.action.lock().is_none()
	}
}

impl Disposable for DisposeFn {
	fn dispose(&self) {
		let action = self.action.lock().take();
		if let Some(action) = action {
			action();
		}
	}
}

impl std::fmt::Debug for DisposeFn {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DisposeFn").field("disposed", &self.is_disposed()).finish()
	}
}

/// Several registrations released together.
///
/// Entries are disposed in insertion order, each at most once.
#[derive(Default)]
pub struct CompositeDisposable {
	entries: Mutex<Vec<BoxDisposable>>,
	disposed: AtomicBool,
}

impl CompositeDisposable {
	/// Creates an empty composite.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a registration.
	///
	/// If the composite was already disposed, `entry` is disposed immediately.
	pub fn add(&self, entry: BoxDisposable) {
		if self.is_disposed() {
			entry.dispose();
			return;
		}
		self.entries.lock().push(entry);
	}

	/// Returns true once [`Disposable::dispose`] has been called.
	pub fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}

	/// Number of registrations still held.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Returns true if no registrations are held.
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

/// Collects registrations, skipping absent ones.
impl FromIterator<Option<BoxDisposable>> for CompositeDisposable {
	fn from_iter<I: IntoIterator<Item = Option<BoxDisposable>>>(iter: I) -> Self {
		Self {
			entries: Mutex::new(iter.into_iter().flatten().collect()),
			disposed: AtomicBool::new(false),
		}
	}
}

impl FromIterator<BoxDisposable> for CompositeDisposable {
	fn from_iter<I: IntoIterator<Item = BoxDisposable>>(iter: I) -> Self {
		iter.into_iter().map(Some).collect()
	}
}

impl Disposable for CompositeDisposable {
	fn dispose(&self) {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		let entries = std::mem::take(&mut *self.entries.lock());
		for entry in entries {
			entry.dispose();
		}
	}
}

impl std::fmt::Debug for CompositeDisposable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CompositeDisposable")
			.field("len", &self.len())
			.field("disposed", &self.is_disposed())
			.finish()
	}
}
