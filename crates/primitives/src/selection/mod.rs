use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

use crate::interval::{CharIdx, CharLen, Interval};


/// Errors raised when a selection is checked against live text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
	/// A document must always have at least one interval selected.
	#[error("selection must contain at least one interval")]
	Empty,
	/// The last interval extends past the end of the text.
	#[error("selection ends at {end} but the text has {len} characters")]
	OutOfBounds {
		/// End of the last interval.
		end: CharIdx,
		/// Length of the text it was checked against.
		len: CharLen,
	},
}

/// An ordered set of disjoint, non-adjacent intervals.
///
/// Intervals are kept sorted by start. Adding an interval that overlaps or
/// touches an existing one merges the two, so `[0, 5)` and `[5, 10)` collapse
/// into `[0, 10)`. All set operations have value semantics and return a new
/// selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
	intervals: SmallVec<[Interval; 1]>,
}

impl Selection {
	/// Creates an empty selection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a selection holding a single empty interval at `pos`.
	pub fn point(pos: CharIdx) -> Self {
		Interval::point(pos).into()
	}

	/// Creates a normalized selection from any collection of intervals.
	pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
		let mut sel = Self {
			intervals: intervals.into_iter().collect(),
		};
		sel.normalize();
		sel
	}

	/// Returns all intervals as a slice, in ascending order.
	pub fn intervals(&self) -> &[Interval] {
		&self.intervals
	}

	/// Returns the number of intervals.
	pub fn len(&self) -> usize {
		self.intervals.len()
	}

	pub fn is_empty(&self) -> bool {
		self.intervals.is_empty()
	}

	/// Iterates over the intervals in ascending order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = Interval> + ExactSizeIterator + '_ {
		self.intervals.iter().copied()
	}

	pub fn first(&self) -> Option<Interval> {
		self.intervals.first().copied()
	}

	pub fn last(&self) -> Option<Interval> {
		self.intervals.last().copied()
	}

	/// Returns the smallest interval covering the whole selection.
	pub fn span(&self) -> Option<Interval> {
		Some(Interval::between(self.first()?.beg(), self.last()?.end()))
	}

	/// Returns the union of this selection and `intervals`.
	pub fn add(&self, intervals: impl IntoIterator<Item = Interval>) -> Self {
		Self::from_intervals(self.iter().chain(intervals))
	}

	/// Returns this selection with `intervals` removed, splitting intervals
	/// that straddle a removed range.
	///
	/// If nothing would remain, the selection is returned unchanged. Empty
	/// intervals in `intervals` remove nothing.
	pub fn subtract(&self, intervals: impl IntoIterator<Item = Interval>) -> Self {
		let cuts = Self::from_intervals(intervals);
		let mut remaining: Vec<Interval> = self.intervals.to_vec();
		for cut in cuts.iter().filter(|cut| !cut.is_empty()) {
			remaining = remaining.into_iter().flat_map(|iv| difference(iv, &cut)).collect();
		}

		if remaining.is_empty() {
			trace!(selection = ?self, "subtract: result empty, keeping selection");
			return self.clone();
		}
		Self::from_intervals(remaining)
	}

	/// Returns the gaps of this selection within a text of `text_len`
	/// characters, including leading and trailing gaps.
	pub fn complement(&self, text_len: CharLen) -> Self {
		let mut gaps = Vec::with_capacity(self.len() + 1);
		let mut pos = 0;
		for iv in self.iter() {
			let beg = iv.beg().min(text_len);
			if beg > pos {
				gaps.push(Interval::between(pos, beg));
			}
			pos = pos.max(iv.end());
		}
		if pos < text_len {
			gaps.push(Interval::between(pos, text_len));
		}
		Self::from_intervals(gaps)
	}

	/// Clips every interval to `[lo, hi]`, dropping those left with no
	/// valid range.
	pub fn bound(&self, lo: CharIdx, hi: CharIdx) -> Self {
		self.iter().filter_map(|iv| iv.clip(lo, hi)).collect()
	}

	/// Returns true if any interval intersects `interval`.
	pub fn intersects(&self, interval: Interval) -> bool {
		self.intervals.iter().any(|iv| iv.intersects(&interval))
	}

	/// Returns true if any interval contains `pos`.
	pub fn contains(&self, pos: CharIdx) -> bool {
		self.intervals.iter().any(|iv| iv.contains(pos))
	}

	/// Returns `true` if no interval extends past `len`.
	#[inline]
	pub fn is_in_bounds(&self, len: CharLen) -> bool {
		self.last().is_none_or(|iv| iv.end() <= len)
	}

	/// Checks that no interval extends past `len`.
	pub fn check_bounds(&self, len: CharLen) -> Result<(), SelectionError> {
		match self.last() {
			Some(iv) if iv.end() > len => Err(SelectionError::OutOfBounds { end: iv.end(), len }),
			_ => Ok(()),
		}
	}

	/// Checks that this selection may be installed on a text of `len`
	/// characters: it must be non-empty and in bounds.
	pub fn validate(&self, len: CharLen) -> Result<(), SelectionError> {
		if self.is_empty() {
			return Err(SelectionError::Empty);
		}
		self.check_bounds(len)
	}

	/// Sorts intervals and merges those that overlap or touch.
	fn normalize(&mut self) {
		if self.intervals.len() <= 1 {
			return;
		}

		self.intervals.sort_unstable();

		let mut merged: SmallVec<[Interval; 1]> = SmallVec::with_capacity(self.intervals.len());
		for iv in &self.intervals {
			match merged.last_mut() {
				Some(last) if last.touches(iv) => *last = last.merge(iv),
				_ => merged.push(*iv),
			}
		}
		self.intervals = merged;
	}
}

/// Removes `cut` from `iv`, leaving up to two pieces.
fn difference(iv: Interval, cut: &Interval) -> SmallVec<[Interval; 2]> {
	let mut pieces = SmallVec::new();
	if iv.is_empty() {
		if !(cut.beg() <= iv.beg() && iv.beg() <= cut.end()) {
			pieces.push(iv);
		}
		return pieces;
	}
	if !iv.intersects(cut) {
		pieces.push(iv);
		return pieces;
	}
	if iv.beg() < cut.beg() {
		pieces.push(Interval::between(iv.beg(), cut.beg()));
	}
	if cut.end() < iv.end() {
		pieces.push(Interval::between(cut.end(), iv.end()));
	}
	pieces
}

impl From<Interval> for Selection {
	fn from(interval: Interval) -> Self {
		Self {
			intervals: SmallVec::from_elem(interval, 1),
		}
	}
}

impl FromIterator<Interval> for Selection {
	fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
		Self::from_intervals(iter)
	}
}

impl<'a> IntoIterator for &'a Selection {
	type Item = Interval;
	type IntoIter = std::iter::Copied<std::slice::Iter<'a, Interval>>;

	fn into_iter(self) -> Self::IntoIter {
		self.intervals.iter().copied()
	}
}
