//! Regex-based search over text content.

use regex::Regex;

use crate::interval::{CharIdx, Interval};

/// Single-pass iterator over non-overlapping regex matches.
///
/// Matches are reported as character intervals of the haystack, which
/// always begins at the start of the text. An empty match never repeats at the
/// position where the previous match ended.
#[derive(Debug)]
pub struct FindIter<'r> {
	regex: &'r Regex,
	/// Text from its start up to the end of the searched range.
	haystack: String,
	/// Byte position where the next search starts.
	byte_pos: usize,
	/// Byte and character positions of the last converted offset.
	cursor: (usize, CharIdx),
	/// Byte end of the last reported match.
	last_end: Option<usize>,
	done: bool,
}

impl<'r> FindIter<'r> {
	/// Searches `haystack` from character `start` on. Characters before
	/// `start` are only consulted as context for anchors and boundaries.
	pub fn new(regex: &'r Regex, haystack: String, start: CharIdx) -> Self {
		let start_byte = haystack
			.char_indices()
			.nth(start)
			.map_or(haystack.len(), |(byte, _)| byte);
		Self {
			regex,
			haystack,
			byte_pos: start_byte,
			cursor: (start_byte, start),
			last_end: None,
			done: false,
		}
	}

	/// Converts a byte offset to a character offset.
	///
	/// Offsets are requested in ascending order, so counting resumes from
	/// the previous conversion.
	fn char_offset(&mut self, byte_offset: usize) -> CharIdx {
		let (byte, chars) = self.cursor;
		debug_assert!(byte_offset >= byte);
		let chars = chars + self.haystack[byte..byte_offset].chars().count();
		self.cursor = (byte_offset, chars);
		chars
	}
}

impl Iterator for FindIter<'_> {
	type Item = Interval;

	fn next(&mut self) -> Option<Interval> {
		while !self.done && self.byte_pos <= self.haystack.len() {
			let Some(m) = self.regex.find_at(&self.haystack, self.byte_pos) else {
				self.done = true;
				break;
			};
			let (start, end) = (m.start(), m.end());

			if start == end {
				// Step over one character so the next search makes progress.
				match self.haystack[end..].chars().next() {
					Some(c) => self.byte_pos = end + c.len_utf8(),
					None => self.done = true,
				}
				if self.last_end == Some(end) {
					continue;
				}
			} else {
				self.byte_pos = end;
			}
			self.last_end = Some(end);

			let beg = self.char_offset(start);
			let end = self.char_offset(end);
			return Some(Interval::between(beg, end));
		}
		None
	}
}
