//! Text content addressed by interval and selection.
//!
//! [`Text`] is the capability the rest of the core relies on; [`RopeText`]
//! is the in-memory implementation backed by a [`Rope`]. Every transform
//! derives a new value and leaves the source untouched. Rope clones share
//! structure, so keeping old snapshots around is cheap.

use std::fmt;

use regex::Regex;
use ropey::Rope;
use tracing::trace;

use crate::interval::{CharIdx, CharLen, Interval};
use crate::selection::Selection;
use crate::transform::{TextTransformation, TransformError};

mod search;

pub use search::FindIter;

/// Content addressed by character position.
pub trait Text: Clone {
	/// Returns the length in characters.
	fn len_chars(&self) -> CharLen;

	/// Returns the character at `pos`, if any.
	fn char_at(&self, pos: CharIdx) -> Option<char>;

	/// Returns the content of `interval`, clamped to the text.
	fn slice(&self, interval: Interval) -> String;

	/// Returns the content of every interval of `selection`, in order.
	fn contents(&self, selection: &Selection) -> Vec<String> {
		selection.iter().map(|iv| self.slice(iv)).collect()
	}

	/// Lazily yields non-overlapping matches of `pattern` inside `within`.
	///
	/// The text is cut off at the end of `within` but not at its start, so
	/// anchors and word boundaries still see what precedes the interval.
	fn find_iter<'r>(&self, pattern: &'r Regex, within: Interval) -> FindIter<'r> {
		let within = within.clamp_to(self.len_chars());
		let haystack = self.slice(Interval::between(0, within.end()));
		FindIter::new(pattern, haystack, within.beg())
	}

	/// Derives the text produced by `transformation`.
	///
	/// # Errors
	///
	/// Fails if the transformation was built against different content.
	fn transform(&self, transformation: &TextTransformation) -> Result<Self, TransformError>;
}

/// Rope-backed [`Text`].
#[derive(Clone, PartialEq, Eq)]
pub struct RopeText {
	rope: Rope,
}

impl RopeText {
	pub fn new(content: &str) -> Self {
		Self {
			rope: Rope::from_str(content),
		}
	}

	/// Returns the underlying rope.
	pub fn rope(&self) -> &Rope {
		&self.rope
	}
}

impl Text for RopeText {
	fn len_chars(&self) -> CharLen {
		self.rope.len_chars()
	}

	fn char_at(&self, pos: CharIdx) -> Option<char> {
		(pos < self.rope.len_chars()).then(|| self.rope.char(pos))
	}

	fn slice(&self, interval: Interval) -> String {
		let interval = interval.clamp_to(self.rope.len_chars());
		self.rope.slice(interval.range()).to_string()
	}

	fn transform(&self, transformation: &TextTransformation) -> Result<Self, TransformError> {
		transformation.verify(self)?;

		let mut rope = self.rope.clone();
		let edits = transformation.selection().iter().zip(transformation.replacements());
		// Back to front so earlier positions stay valid.
		for (iv, replacement) in edits.rev() {
			if !iv.is_empty() {
				rope.remove(iv.range());
			}
			if !replacement.is_empty() {
				rope.insert(iv.beg(), replacement);
			}
		}

		trace!(
			intervals = transformation.selection().len(),
			len_before = self.rope.len_chars(),
			len_after = rope.len_chars(),
			"text transformed"
		);
		Ok(Self { rope })
	}
}

impl Default for RopeText {
	fn default() -> Self {
		Self { rope: Rope::new() }
	}
}

impl From<&str> for RopeText {
	fn from(content: &str) -> Self {
		Self::new(content)
	}
}

impl From<String> for RopeText {
	fn from(content: String) -> Self {
		Self::new(&content)
	}
}

impl From<Rope> for RopeText {
	fn from(rope: Rope) -> Self {
		Self { rope }
	}
}

impl fmt::Display for RopeText {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.rope, f)
	}
}

impl fmt::Debug for RopeText {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("RopeText").field(&self.rope.to_string()).finish()
	}
}
