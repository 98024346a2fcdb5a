use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for weft.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// Errors raised when constructing an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntervalError {
	/// The bounds are reversed or negative.
	#[error("invalid interval [{beg}, {end})")]
	InvalidRange {
		/// Requested beginning.
		beg: isize,
		/// Requested end.
		end: isize,
	},
}

/// A half-open range of text positions `[beg, end)`.
///
/// Intervals are immutable values ordered by `(beg, end)`. The invariant
/// `beg <= end` is enforced at construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Interval {
	beg: CharIdx,
	end: CharIdx,
}

impl Interval {
	/// Creates the interval `[beg, end)`.
	///
	/// # Errors
	///
	/// Returns [`IntervalError::InvalidRange`] if `beg > end`.
	pub fn new(beg: CharIdx, end: CharIdx) -> Result<Self, IntervalError> {
		if beg > end {
			return Err(IntervalError::InvalidRange {
				beg: beg as isize,
				end: end as isize,
			});
		}
		Ok(Self { beg, end })
	}

	/// Creates the interval spanning `a` and `b`, whichever order they come in.
	pub fn between(a: CharIdx, b: CharIdx) -> Self {
		Self {
			beg: a.min(b),
			end: a.max(b),
		}
	}

	/// Creates an empty interval (cursor) at `pos`.
	pub fn point(pos: CharIdx) -> Self {
		Self { beg: pos, end: pos }
	}

	#[inline]
	pub fn beg(&self) -> CharIdx {
		self.beg
	}

	#[inline]
	pub fn end(&self) -> CharIdx {
		self.end
	}

	#[inline]
	pub fn len(&self) -> CharLen {
		self.end - self.beg
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.beg == self.end
	}

	/// Returns the interval as a std range, for slicing ropes.
	#[inline]
	pub fn range(&self) -> Range<CharIdx> {
		self.beg..self.end
	}

	/// Returns true if `pos` lies in `[beg, end)`.
	pub fn contains(&self, pos: CharIdx) -> bool {
		self.beg <= pos && pos < self.end
	}

	/// Returns true if the two intervals share at least one position.
	///
	/// An empty interval intersects a non-empty one when its position lies
	/// inside it, and another empty interval only at the same position.
	pub fn intersects(&self, other: &Interval) -> bool {
		match (self.is_empty(), other.is_empty()) {
			(false, false) => self.beg < other.end && other.beg < self.end,
			(true, false) => other.contains(self.beg),
			(false, true) => self.contains(other.beg),
			(true, true) => self.beg == other.beg,
		}
	}

	/// Returns true if the intervals overlap or touch, i.e. would merge
	/// into one when placed in the same selection.
	pub fn touches(&self, other: &Interval) -> bool {
		self.beg <= other.end && other.beg <= self.end
	}

	/// Returns the smallest interval covering both.
	pub fn merge(&self, other: &Interval) -> Self {
		Self {
			beg: self.beg.min(other.beg),
			end: self.end.max(other.end),
		}
	}

	/// Clips the interval to `[lo, hi]`, or `None` if nothing valid remains.
	pub fn clip(&self, lo: CharIdx, hi: CharIdx) -> Option<Self> {
		let beg = self.beg.max(lo);
		let end = self.end.min(hi);
		(beg <= end).then_some(Self { beg, end })
	}

	/// Clamps both bounds to `max`.
	pub fn clamp_to(&self, max: CharIdx) -> Self {
		Self {
			beg: self.beg.min(max),
			end: self.end.min(max),
		}
	}
}

impl fmt::Debug for Interval {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {})", self.beg, self.end)
	}
}

impl TryFrom<(isize, isize)> for Interval {
	type Error = IntervalError;

	fn try_from((beg, end): (isize, isize)) -> Result<Self, Self::Error> {
		if beg < 0 || end < beg {
			return Err(IntervalError::InvalidRange { beg, end });
		}
		Ok(Self {
			beg: beg as CharIdx,
			end: end as CharIdx,
		})
	}
}

impl From<Interval> for Range<CharIdx> {
	fn from(interval: Interval) -> Self {
		interval.range()
	}
}
