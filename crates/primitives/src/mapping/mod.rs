//! Position mapping across a set of interval substitutions.
//!
//! An [`IntervalMapping`] translates positions from the coordinates of a text
//! *before* a set of substitutions to the coordinates of the text *after*.
//! Only the affected window (first substitution start to last substitution
//! end) is stored as a dense table; positions outside it map by a constant
//! offset.
//!
//! ```text
//! before:  a b | c d e          insertion of "XY" at 2
//! after:   a b X Y c d e
//!
//! position 2 -> Span(2, 4)      ambiguous: before or after "XY"
//! position 3 -> 5               outside the window, offset by +2
//! ```
//!
//! Ambiguous images only arise at insertion points. Callers resolve them with
//! a [`Bias`]; intervals resolve their start to the right and their end to the
//! left so that disjoint intervals stay disjoint.

use thiserror::Error;

use crate::interval::{CharIdx, CharLen, Interval};
use crate::selection::Selection;


/// Declares that the content in `interval` is replaced by content of
/// `new_len` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSubstitution {
	interval: Interval,
	new_len: CharLen,
}

impl IntervalSubstitution {
	pub fn new(interval: Interval, new_len: CharLen) -> Self {
		Self { interval, new_len }
	}

	/// Creates a pure insertion of `new_len` characters at `pos`.
	pub fn insertion(pos: CharIdx, new_len: CharLen) -> Self {
		Self::new(Interval::point(pos), new_len)
	}

	pub fn interval(&self) -> Interval {
		self.interval
	}

	pub fn old_len(&self) -> CharLen {
		self.interval.len()
	}

	pub fn new_len(&self) -> CharLen {
		self.new_len
	}

	/// Returns true if no existing content is replaced.
	pub fn is_insertion(&self) -> bool {
		self.interval.is_empty()
	}

	/// Returns true if the substitution carries no information.
	fn is_noop(&self) -> bool {
		self.is_insertion() && self.new_len == 0
	}
}

/// Bias determines how ambiguous positions at insertion points are mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Snap down: the position stays before the inserted text.
	Left,
	/// Snap up: the position moves after the inserted text.
	Right,
}

/// The image of a single original position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Image {
	/// The position maps to exactly one place.
	Point(CharIdx),
	/// The position sits at an insertion point and may map to either end of
	/// the inserted text.
	Span(CharIdx, CharIdx),
}

impl Image {
	/// Resolves the image to a single position.
	pub fn resolve(self, bias: Bias) -> CharIdx {
		match (self, bias) {
			(Image::Point(pos), _) => pos,
			(Image::Span(lo, _), Bias::Left) => lo,
			(Image::Span(_, hi), Bias::Right) => hi,
		}
	}
}

/// Errors raised while building an [`IntervalMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
	/// A substitution starts before the previous one ends.
	#[error("substitution {next:?} overlaps or precedes {prev:?}")]
	Overlapping {
		/// The earlier substitution's interval.
		prev: Interval,
		/// The offending substitution's interval.
		next: Interval,
	},
}

/// Maps positions and intervals through a sorted set of substitutions.
///
/// Built once, read-only afterwards. Construction and storage are
/// proportional to the affected window, never to the whole text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalMapping {
	/// First position covered by the table.
	start: CharIdx,
	/// Last position covered by the table (inclusive).
	end: CharIdx,
	/// Image of every position in `start..=end`.
	table: Vec<Image>,
	/// Upper image of `end`; positions past `end` map relative to it.
	end_image: CharIdx,
}

impl IntervalMapping {
	/// Builds the mapping for `substitutions`.
	///
	/// Substitutions must be sorted by start and must not overlap. They may
	/// be adjacent, and several insertions at the same position merge into
	/// one combined insertion in argument order. Insertions of length zero
	/// are ignored.
	///
	/// # Errors
	///
	/// Returns [`MappingError::Overlapping`] if a substitution begins before
	/// the previous one ends.
	pub fn new(
		substitutions: impl IntoIterator<Item = IntervalSubstitution>,
	) -> Result<Self, MappingError> {
		let subs: Vec<IntervalSubstitution> =
			substitutions.into_iter().filter(|sub| !sub.is_noop()).collect();

		for pair in subs.windows(2) {
			let (prev, next) = (pair[0].interval, pair[1].interval);
			if next.beg() < prev.end() {
				return Err(MappingError::Overlapping { prev, next });
			}
		}

		let (Some(first), Some(last)) = (subs.first(), subs.last()) else {
			return Ok(Self::default());
		};
		let start = first.interval.beg();
		let end = last.interval.end();

		let mut table = Vec::with_capacity(end - start + 1);
		let mut orig = start;
		let mut imag = start;
		// Lower image of insertions stacked at `orig`, whose entry is not yet written.
		let mut pending: Option<CharIdx> = None;

		for sub in &subs {
			let iv = sub.interval;
			if iv.beg() > orig {
				table.push(settle(pending.take(), imag));
				orig += 1;
				imag += 1;
				while orig < iv.beg() {
					table.push(Image::Point(imag));
					orig += 1;
					imag += 1;
				}
			}

			if sub.is_insertion() {
				pending.get_or_insert(imag);
				imag += sub.new_len;
			} else {
				table.push(settle(pending.take(), imag));
				table.extend(std::iter::repeat_n(Image::Point(imag), sub.old_len() - 1));
				orig = iv.end();
				imag += sub.new_len;
			}
		}
		table.push(settle(pending.take(), imag));

		debug_assert_eq!(table.len(), end - start + 1);
		debug_assert_eq!(
			imag as isize - end as isize,
			subs.iter().map(|s| s.new_len as isize - s.old_len() as isize).sum::<isize>(),
		);

		Ok(Self {
			start,
			end,
			table,
			end_image: imag,
		})
	}

	/// Returns the identity mapping.
	pub fn identity() -> Self {
		Self::default()
	}

	/// Returns true if every position maps to itself.
	pub fn is_identity(&self) -> bool {
		self.table.is_empty()
	}

	/// Returns the affected window `[start, end]` in original coordinates.
	pub fn window(&self) -> (CharIdx, CharIdx) {
		(self.start, self.end)
	}

	/// Net change in text length.
	pub fn delta(&self) -> isize {
		self.end_image as isize - self.end as isize
	}

	/// Returns the raw image of `pos`.
	pub fn image(&self, pos: CharIdx) -> Image {
		if pos < self.start {
			return Image::Point(pos);
		}
		if pos > self.end {
			return Image::Point(pos - self.end + self.end_image);
		}
		self.table.get(pos - self.start).copied().unwrap_or(Image::Point(pos))
	}

	/// Maps a position, resolving an ambiguous image with `bias`.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		self.image(pos).resolve(bias)
	}

	/// Maps an interval.
	///
	/// The start snaps up and the end snaps down, so text inserted at either
	/// boundary falls outside the mapped interval. An empty interval sitting
	/// exactly at an insertion point instead becomes the inserted text.
	pub fn map_interval(&self, interval: Interval) -> Interval {
		if interval.is_empty()
			&& let Image::Span(lo, hi) = self.image(interval.beg())
		{
			return Interval::between(lo, hi);
		}

		let beg = self.map_pos(interval.beg(), Bias::Right);
		let end = self.map_pos(interval.end(), Bias::Left);
		debug_assert!(beg <= end, "mapping is monotone");
		Interval::between(beg, end)
	}

	/// Maps every interval of `selection`, preserving order.
	pub fn map_selection(&self, selection: &Selection) -> Selection {
		selection.iter().map(|iv| self.map_interval(iv)).collect()
	}
}

fn settle(pending: Option<CharIdx>, imag: CharIdx) -> Image {
	match pending {
		Some(lo) => Image::Span(lo, imag),
		None => Image::Point(imag),
	}
}
