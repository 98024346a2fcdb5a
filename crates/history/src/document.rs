//! Containers that own a text and its selection.
//!
//! Operations never hold on to a container. They receive an [`EditHost`]
//! for the duration of one execute or undo call, read its text, and hand
//! the result back through [`EditHost::commit`].

use tracing::{debug, trace};
use weft_primitives::{CharLen, RopeText, Selection, SelectionError, Text};

/// Trait for the container an [`Operation`](crate::Operation) edits.
///
/// The editor's buffer implements this to provide:
/// - Read access to the current text and selection
/// - Installation of a new text and selection after an edit
pub trait EditHost {
	/// The text representation the container stores.
	type Text: Text;

	/// Returns the current text.
	fn text(&self) -> &Self::Text;

	/// Returns the current selection.
	fn selection(&self) -> &Selection;

	/// Installs the result of an edit and notifies observers of the change.
	fn commit(&mut self, text: Self::Text, selection: Selection);
}

/// An in-memory document: a rope-backed text plus its selection.
///
/// The selection is never empty and always lies within the text.
#[derive(Debug, Clone)]
pub struct Document {
	text: RopeText,
	selection: Selection,
	/// Bumped on every committed change.
	version: u64,
	/// Set on every committed change, cleared by [`Document::mark_clean`].
	dirty: bool,
}

impl Document {
	/// Creates a clean document with the cursor at the start.
	pub fn new(text: impl Into<RopeText>) -> Self {
		Self {
			text: text.into(),
			selection: Selection::point(0),
			version: 0,
			dirty: false,
		}
	}

	pub fn text(&self) -> &RopeText {
		&self.text
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Returns the current content as a string.
	pub fn content(&self) -> String {
		self.text.to_string()
	}

	pub fn len_chars(&self) -> CharLen {
		self.text.len_chars()
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Clears the dirty flag, e.g. after the content was saved.
	pub fn mark_clean(&mut self) {
		self.dirty = false;
	}

	/// Replaces the selection.
	///
	/// # Errors
	///
	/// Rejects empty and out-of-bounds selections; the previous selection is
	/// kept.
	pub fn set_selection(&mut self, selection: Selection) -> Result<(), SelectionError> {
		selection.validate(self.text.len_chars())?;
		self.selection = selection;
		Ok(())
	}
}

impl EditHost for Document {
	type Text = RopeText;

	fn text(&self) -> &RopeText {
		&self.text
	}

	fn selection(&self) -> &Selection {
		&self.selection
	}

	fn commit(&mut self, text: RopeText, selection: Selection) {
		let len = text.len_chars();
		self.selection = match selection.validate(len) {
			Ok(()) => selection,
			Err(error) => {
				debug!(%error, "commit: unusable selection, clamping previous one");
				let clamped = self.selection.bound(0, len);
				if clamped.is_empty() { Selection::point(len) } else { clamped }
			}
		};
		self.text = text;
		self.version += 1;
		self.dirty = true;
		trace!(version = self.version, len, "document changed");
	}
}
