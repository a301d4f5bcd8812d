//! Column encodings.
//!
//! [`Position`](crate::Position) columns count Unicode scalar values. Protocol
//! peers may count UTF-8 bytes or UTF-16 code units instead, so columns are
//! re-encoded against the text of their line at the boundary.

/// Unit in which a peer counts columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OffsetEncoding {
	/// UTF-8 byte offsets.
	Utf8,
	/// UTF-16 code units (protocol default).
	#[default]
	Utf16,
	/// Unicode scalar values, the native column unit.
	Utf32,
}

impl OffsetEncoding {
	/// Width of `c` in this encoding.
	#[inline]
	pub fn char_len(self, c: char) -> usize {
		match self {
			Self::Utf8 => c.len_utf8(),
			Self::Utf16 => c.len_utf16(),
			Self::Utf32 => 1,
		}
	}

	/// Converts a native column on `line` into this encoding.
	///
	/// Columns past the end of the line keep their excess unchanged.
	pub fn encode_column(self, line: &str, character: u32) -> u32 {
		let character = character as usize;
		let (taken, units) = line
			.chars()
			.take(character)
			.fold((0usize, 0usize), |(taken, units), c| (taken + 1, units + self.char_len(c)));
		saturate(units + (character - taken))
	}

	/// Converts a column in this encoding on `line` back to a native column.
	///
	/// An offset that falls inside a character resolves to that character's
	/// start. Offsets past the end of the line keep their excess unchanged.
	pub fn decode_column(self, line: &str, units: u32) -> u32 {
		let mut remaining = units as usize;
		let mut character = 0usize;
		for c in line.chars() {
			let width = self.char_len(c);
			if remaining < width {
				return saturate(character);
			}
			remaining -= width;
			character += 1;
		}
		saturate(character + remaining)
	}
}

fn saturate(value: usize) -> u32 {
	u32::try_from(value).unwrap_or(u32::MAX)
}
