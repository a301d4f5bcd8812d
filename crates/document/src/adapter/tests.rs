use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use quire_primitives::OffsetEncoding;

use super::*;
use crate::buffer::RopeBuffer;

fn open(text: &str) -> (Arc<RopeBuffer>, BufferDocument<RopeBuffer>) {
	open_with(text, &DocumentOptions::default())
}

fn open_with(text: &str, options: &DocumentOptions) -> (Arc<RopeBuffer>, BufferDocument<RopeBuffer>) {
	let buffer = Arc::new(RopeBuffer::new("untitled:Untitled-1", text));
	let document = BufferDocument::attach(buffer.clone(), options).unwrap();
	(buffer, document)
}

#[test]
fn offsets_and_positions_on_two_lines() {
	let (_buffer, document) = open("abc\ndef");
	assert_eq!(document.line_count(), 2);
	assert_eq!(document.position_at(0), Position::new(0, 0));
	assert_eq!(document.position_at(3), Position::new(0, 3));
	assert_eq!(document.position_at(4), Position::new(1, 0));
	assert_eq!(document.position_at(7), Position::new(1, 3));
	assert_eq!(document.position_at(100), Position::new(1, 3));
	assert_eq!(document.offset_at(&Position::new(1, 1)), 5);
	for offset in 0..=7 {
		assert_eq!(document.offset_at(&document.position_at(offset)), offset);
	}
	for (line, len) in [(0, 3), (1, 3)] {
		for character in 0..=len {
			let position = Position::new(line, character);
			assert_eq!(document.position_at(document.offset_at(&position)), position);
		}
	}
}

#[rstest]
#[case(Position::new(0, 1), Position::new(0, 1))]
#[case(Position::new(1, 3), Position::new(1, 3))]
#[case(Position::new(0, 9), Position::new(0, 3))]
#[case(Position::new(5, 0), Position::new(1, 3))]
#[case(Position::new(2, 0), Position::new(1, 3))]
fn validate_position_clamps(#[case] input: Position, #[case] expected: Position) {
	let (_buffer, document) = open("abc\ndef");
	assert_eq!(*document.validate_position(&input), expected);
}

#[test]
fn in_bounds_values_are_returned_unchanged() {
	let (_buffer, document) = open("abc\ndef");
	let position = Position::new(1, 2);
	assert!(matches!(document.validate_position(&position), Cow::Borrowed(p) if std::ptr::eq(p, &position)));

	let range = Range::from_coordinates(0, 1, 1, 3);
	assert!(matches!(document.validate_range(&range), Cow::Borrowed(r) if std::ptr::eq(r, &range)));

	let out = Range::from_coordinates(0, 0, 9, 9);
	assert_eq!(
		document.validate_range(&out),
		Cow::<Range>::Owned(Range::from_coordinates(0, 0, 1, 3))
	);
}

#[test]
fn line_snapshots() {
	let (_buffer, document) = open("  foo\n   \nbar");

	let first = document.line_at(0).unwrap();
	assert_eq!(first.text, "  foo");
	assert_eq!(first.first_non_whitespace_character_index, 2);
	assert!(!first.is_empty_or_whitespace);
	assert_eq!(first.range, Range::from_coordinates(0, 0, 0, 5));
	assert_eq!(first.range_including_line_break, Range::from_coordinates(0, 0, 1, 0));

	let blank = document.line_at_position(&Position::new(1, 1)).unwrap();
	assert_eq!(blank.first_non_whitespace_character_index, 3);
	assert!(blank.is_empty_or_whitespace);

	let last = document.line_at(2).unwrap();
	assert_eq!(last.range_including_line_break, Range::from_coordinates(2, 0, 2, 3));

	let err = document.line_at(3).unwrap_err();
	assert!(matches!(err, DocumentError::LineOutOfRange { line: 3, line_count: 3 }), "{err}");
}

#[test]
fn non_ascii_text_uses_characters() {
	let (_buffer, document) = open("h\u{00E9}llo\nw\u{00F6}rld");
	assert_eq!(document.line_length(0), 5);
	assert_eq!(document.position_at(7), Position::new(1, 1));
	assert_eq!(
		document.get_text(Some(&Range::from_coordinates(0, 1, 1, 2))),
		"\u{00E9}llo\nw\u{00F6}"
	);
	assert_eq!(document.get_text(None), "h\u{00E9}llo\nw\u{00F6}rld");
}

#[test]
fn get_text_clamps_range() {
	let (_buffer, document) = open("abc\ndef");
	assert_eq!(document.get_text(Some(&Range::from_coordinates(0, 2, 7, 0))), "c\ndef");
	assert_eq!(document.get_text(Some(&Range::empty(Position::new(1, 1)))), "");
}

#[test]
fn word_ranges() {
	let (_buffer, document) = open("fn quire_main() {}");
	assert_eq!(
		document.word_range_at(&Position::new(0, 5)),
		Some(Range::from_coordinates(0, 3, 0, 13))
	);
	assert_eq!(document.word_range_at(&Position::new(0, 15)), None);
}

#[test]
fn metadata() {
	let mut options = DocumentOptions::default();
	options.languages.insert("rs".into(), "rust".into());

	let buffer = Arc::new(RopeBuffer::new("untitled:scratch.rs", ""));
	let document = BufferDocument::attach(buffer, &options).unwrap();
	assert_eq!(document.uri().as_str(), "untitled:scratch.rs");
	assert_eq!(document.file_name(), "scratch.rs");
	assert!(document.is_untitled());
	assert_eq!(document.language_id(), "rust");
	assert_eq!(document.line_count(), 1);

	let buffer = Arc::new(RopeBuffer::new("untitled:notes", "").with_language("markdown"));
	let document = BufferDocument::attach(buffer, &options).unwrap();
	assert_eq!(document.language_id(), "markdown");
}

#[test]
fn invalid_locator_fails_attach() {
	let buffer = Arc::new(RopeBuffer::new("relative/path.txt", ""));
	let err = BufferDocument::attach(buffer, &DocumentOptions::default()).unwrap_err();
	assert!(matches!(err, DocumentError::InvalidLocator { .. }), "{err}");
}

#[test]
fn version_follows_edits_undo_and_redo() {
	let (buffer, document) = open("abc");
	assert_eq!(document.version(), 1);
	assert!(!document.is_dirty());

	buffer.insert(3, "d");
	assert_eq!(document.version(), 2);
	assert!(document.is_dirty());

	buffer.undo();
	assert_eq!(document.version(), 3);
	buffer.redo();
	assert_eq!(document.version(), 4);
	assert_eq!(document.get_text(None), "abcd");
}

#[test]
fn noop_changes_follow_options() {
	let (buffer, document) = open("abc");
	buffer.set_text("abc");
	assert_eq!(document.version(), 2);

	let options = DocumentOptions {
		count_noop_changes: false,
		initial_version: 0,
		..DocumentOptions::default()
	};
	let (buffer, document) = open_with("abc", &options);
	buffer.set_text("abc");
	assert_eq!(document.version(), 0);
	buffer.set_text("abcd");
	assert_eq!(document.version(), 1);
}

#[test]
fn destroy_closes_and_freezes_version() {
	let closed = Arc::new(AtomicUsize::new(0));
	let count = closed.clone();
	let hook: CloseHook = Box::new(move |_: &Url| {
		count.fetch_add(1, Ordering::SeqCst);
	});
	let buffer = Arc::new(RopeBuffer::new("untitled:a", "abc"));
	let document = BufferDocument::attach_with(
		buffer.clone(),
		Url::parse("untitled:a").unwrap(),
		&DocumentOptions::default(),
		None,
		Some(hook),
	);

	buffer.destroy();
	assert!(document.is_closed());
	assert_eq!(closed.load(Ordering::SeqCst), 1);

	document.dispose();
	assert_eq!(closed.load(Ordering::SeqCst), 1);
	assert_eq!(document.version(), 1);
}

#[test]
fn attach_to_destroyed_buffer_fails() {
	let buffer = Arc::new(RopeBuffer::new("untitled:a", "abc"));
	buffer.destroy();
	let err = BufferDocument::attach(buffer, &DocumentOptions::default()).unwrap_err();
	assert!(matches!(err, DocumentError::BufferDestroyed { .. }), "{err}");
}

fn counting_hook() -> (Arc<AtomicUsize>, CloseHook) {
	let closed = Arc::new(AtomicUsize::new(0));
	let count = closed.clone();
	let hook: CloseHook = Box::new(move |_: &Url| {
		count.fetch_add(1, Ordering::SeqCst);
	});
	(closed, hook)
}

fn attach_hooked(buffer: &Arc<RopeBuffer>, hook: CloseHook) -> BufferDocument<RopeBuffer> {
	BufferDocument::attach_with(
		buffer.clone(),
		Url::parse("untitled:a").unwrap(),
		&DocumentOptions::default(),
		None,
		Some(hook),
	)
}

#[test]
fn drop_closes_once() {
	let buffer = Arc::new(RopeBuffer::new("untitled:a", "abc"));
	let (closed, hook) = counting_hook();
	drop(attach_hooked(&buffer, hook));
	assert_eq!(closed.load(Ordering::SeqCst), 1);

	let (closed, hook) = counting_hook();
	let document = attach_hooked(&buffer, hook);
	document.dispose();
	drop(document);
	assert_eq!(closed.load(Ordering::SeqCst), 1);

	// Destroy after drop reaches no listener.
	buffer.destroy();
	assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn attach_with_destroyed_buffer_starts_closed() {
	let buffer = Arc::new(RopeBuffer::new("untitled:a", "abc"));
	buffer.destroy();
	let (closed, hook) = counting_hook();
	let document = attach_hooked(&buffer, hook);
	assert!(document.is_closed());
	assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn protocol_positions_follow_encoding() {
	let (_buffer, document) = open("\u{1F600}a\nx");
	let after_emoji = document.position_at(1);
	assert_eq!(after_emoji, Position::new(0, 1));

	let utf16 = document.to_lsp_position(&after_emoji, OffsetEncoding::Utf16);
	assert_eq!(utf16, lsp_types::Position::new(0, 2));
	assert_eq!(document.from_lsp_position(utf16, OffsetEncoding::Utf16), after_emoji);

	assert_eq!(
		document.to_lsp_position(&after_emoji, OffsetEncoding::Utf8),
		lsp_types::Position::new(0, 4)
	);
	assert_eq!(
		document.to_lsp_position(&after_emoji, OffsetEncoding::Utf32),
		lsp_types::Position::from(after_emoji)
	);

	let range = Range::from_coordinates(0, 0, 1, 1);
	let wire = document.to_lsp_range(&range, OffsetEncoding::Utf16);
	assert_eq!(wire, lsp_types::Range::new(lsp_types::Position::new(0, 0), lsp_types::Position::new(1, 1)));
	assert_eq!(document.from_lsp_range(wire, OffsetEncoding::Utf16), range);
}

#[test]
fn dispose_releases_subscriptions() {
	let (buffer, document) = open("abc");
	document.dispose();
	assert!(document.is_closed());

	buffer.insert(0, "x");
	assert_eq!(document.version(), 1);
	assert_eq!(document.get_text(None), "xabc");
}

#[tokio::test]
async fn save_resolves_after_host_confirms() {
	let (buffer, document) = open("abc");
	assert!(!document.save().await);

	buffer.insert(0, "x");
	assert!(document.save().await);
	assert!(!document.is_dirty());
}

#[tokio::test]
async fn deferred_save_waits_for_completion() {
	let (buffer, document) = open("abc");
	buffer.set_deferred_save(true);
	buffer.insert(0, "x");

	let (saved, completed) = tokio::join!(document.save(), async {
		tokio::task::yield_now().await;
		buffer.complete_pending_save()
	});
	assert!(completed);
	assert!(saved);
	assert!(!document.is_dirty());
}

#[tokio::test]
async fn destroy_during_save_resolves_false() {
	let (buffer, document) = open("abc");
	buffer.set_deferred_save(true);
	buffer.insert(0, "x");

	let (saved, ()) = tokio::join!(document.save(), async {
		tokio::task::yield_now().await;
		buffer.destroy();
	});
	assert!(!saved);
	assert!(document.is_closed());
	assert!(!document.save().await);
}

proptest! {
	#[test]
	fn offset_round_trip(text in "[a-c\u{00E9} \n]{0,40}", offset in 0usize..48) {
		let (_buffer, document) = open(&text);
		let offset = offset.min(text.chars().count());
		prop_assert_eq!(document.offset_at(&document.position_at(offset)), offset);
	}

	#[test]
	fn validation_is_idempotent(text in "[ab\n]{0,20}", line in 0u32..8, character in 0u32..8) {
		let (_buffer, document) = open(&text);
		let position = Position::new(line, character);
		let once = document.validate_position(&position).into_owned();
		prop_assert!(matches!(document.validate_position(&once), Cow::Borrowed(_)));
	}
}
