//! Invertible text transformations.
//!
//! A [`TextTransformation`] replaces the content of every interval of a
//! [`Selection`] with a matching replacement string. It is built against one
//! text snapshot and captures the content it replaces, so the inverse can be
//! produced later without re-reading state that may have moved on.

use thiserror::Error;

use crate::interval::CharIdx;
use crate::mapping::{IntervalMapping, IntervalSubstitution, MappingError};
use crate::selection::{Selection, SelectionError};
use crate::text::Text;


/// Errors raised when building or applying a [`TextTransformation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
	/// Each interval needs exactly one replacement.
	#[error("selection has {selection} intervals but {replacements} replacements were given")]
	LengthMismatch {
		/// Number of selected intervals.
		selection: usize,
		/// Number of replacement strings.
		replacements: usize,
	},
	/// The selection does not fit the text.
	#[error(transparent)]
	Selection(#[from] SelectionError),
	/// The text differs from the snapshot the transformation was built on.
	#[error("content at {at:?} does not match the transformation snapshot")]
	ContentMismatch {
		/// Start of the first interval whose content differs.
		at: CharIdx,
	},
	/// The substitutions could not be mapped.
	#[error(transparent)]
	Mapping(#[from] MappingError),
}

/// Replaces every interval of a selection with new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTransformation {
	selection: Selection,
	replacements: Vec<String>,
	/// Content of `selection` in the source text.
	original_content: Vec<String>,
	mapping: IntervalMapping,
}

impl TextTransformation {
	/// Builds a transformation of `text` replacing the `i`th interval of
	/// `selection` with `replacements[i]`.
	///
	/// # Errors
	///
	/// Fails if the counts differ, if the selection extends past the text,
	/// or if the mapping cannot be built.
	pub fn new<T: Text>(
		text: &T,
		selection: Selection,
		replacements: Vec<String>,
	) -> Result<Self, TransformError> {
		if selection.len() != replacements.len() {
			return Err(TransformError::LengthMismatch {
				selection: selection.len(),
				replacements: replacements.len(),
			});
		}
		selection.check_bounds(text.len_chars())?;

		let mapping = IntervalMapping::new(
			selection
				.iter()
				.zip(&replacements)
				.map(|(iv, r)| IntervalSubstitution::new(iv, r.chars().count())),
		)?;
		let original_content = text.contents(&selection);

		Ok(Self {
			selection,
			replacements,
			original_content,
			mapping,
		})
	}

	/// Builds a transformation replacing every interval with `replacement`.
	pub fn uniform<T: Text>(
		text: &T,
		selection: Selection,
		replacement: &str,
	) -> Result<Self, TransformError> {
		let replacements = vec![replacement.to_owned(); selection.len()];
		Self::new(text, selection, replacements)
	}

	/// Builds a transformation deleting every selected interval.
	pub fn delete<T: Text>(text: &T, selection: Selection) -> Result<Self, TransformError> {
		Self::uniform(text, selection, "")
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn replacements(&self) -> &[String] {
		&self.replacements
	}

	/// Content the transformation replaces, captured at construction.
	pub fn original_content(&self) -> &[String] {
		&self.original_content
	}

	/// Mapping from positions before the transformation to positions after.
	pub fn mapping(&self) -> &IntervalMapping {
		&self.mapping
	}

	/// Returns true if applying the transformation changes nothing.
	pub fn is_noop(&self) -> bool {
		self.replacements == self.original_content
	}

	/// Returns the image of the selection after the transformation.
	///
	/// Each interval maps onto its replacement, so the result always has as
	/// many intervals as the source selection.
	pub fn compute_new_selection(&self) -> Selection {
		let selection = self.mapping.map_selection(&self.selection);
		debug_assert_eq!(selection.len(), self.selection.len());
		selection
	}

	/// Checks that `text` is the snapshot this transformation was built on.
	pub fn verify<T: Text>(&self, text: &T) -> Result<(), TransformError> {
		self.selection.check_bounds(text.len_chars())?;
		let mismatch = self
			.selection
			.iter()
			.zip(&self.original_content)
			.find(|(iv, content)| text.slice(*iv) != **content);
		match mismatch {
			Some((iv, _)) => Err(TransformError::ContentMismatch { at: iv.beg() }),
			None => Ok(()),
		}
	}

	/// Applies the transformation to `text`.
	pub fn apply_to<T: Text>(&self, text: &T) -> Result<T, TransformError> {
		text.transform(self)
	}

	/// Checks that `text` is what applying this transformation produced:
	/// every mapped interval must still hold its replacement.
	pub fn verify_result<T: Text>(&self, text: &T) -> Result<(), TransformError> {
		let selection = self.compute_new_selection();
		selection.check_bounds(text.len_chars())?;
		let mismatch = selection
			.iter()
			.zip(&self.replacements)
			.find(|(iv, content)| text.slice(*iv) != **content);
		match mismatch {
			Some((iv, _)) => Err(TransformError::ContentMismatch { at: iv.beg() }),
			None => Ok(()),
		}
	}

	/// Builds the transformation that undoes this one, given the text it
	/// produced.
	///
	/// # Errors
	///
	/// Fails with [`TransformError::ContentMismatch`] if `resulting` no longer
	/// holds the replacements, e.g. because it was edited in between.
	pub fn inverse<T: Text>(&self, resulting: &T) -> Result<Self, TransformError> {
		self.verify_result(resulting)?;
		Self::new(
			resulting,
			self.compute_new_selection(),
			self.original_content.clone(),
		)
	}
}
