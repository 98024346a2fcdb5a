//! Live-preview editing.
//!
//! An interactive edit such as insert-mode typing is shown while it is
//! still in progress. Each keystroke hard-undoes the previous speculative
//! node and records a fresh one built from the same base selection, so the
//! history only ever holds the latest state of the edit. Finishing the edit
//! keeps that node as an ordinary undo step; aborting it discards it.

use tracing::trace;
use weft_primitives::{Selection, TextTransformation};

use crate::document::EditHost;
use crate::error::{HistoryError, Result};
use crate::operation::Operation;
use crate::tree::UndoTree;

/// An in-progress interactive edit over a fixed base selection.
#[derive(Debug, Clone)]
#[must_use = "a preview must be committed or cancelled"]
pub struct Preview {
	base: Selection,
	pending: bool,
}

impl Preview {
	/// Starts a preview replacing the host's current selection.
	pub fn new<H: EditHost>(host: &H) -> Self {
		Self::with_base(host.selection().clone())
	}

	/// Starts a preview replacing `base`.
	pub fn with_base(base: Selection) -> Self {
		Self {
			base,
			pending: false,
		}
	}

	/// Returns the selection the preview replaces, in base coordinates.
	pub fn base(&self) -> &Selection {
		&self.base
	}

	/// Returns `true` while a speculative node is recorded in the tree.
	pub fn is_pending(&self) -> bool {
		self.pending
	}

	/// Replaces every base interval with `content`, discarding the previous
	/// preview state first.
	///
	/// An update that would leave the base text unchanged records nothing.
	///
	/// # Errors
	///
	/// Fails if a sequence is open or the base selection no longer fits the
	/// host text. The previous preview state is already discarded then.
	pub fn update<H: EditHost>(
		&mut self,
		tree: &mut UndoTree,
		host: &mut H,
		content: &str,
	) -> Result<()> {
		if tree.in_sequence() {
			return Err(HistoryError::SequenceOpen("preview"));
		}
		self.discard(tree, host)?;

		let transformation = TextTransformation::uniform(host.text(), self.base.clone(), content)?;
		if transformation.is_noop() {
			trace!("preview: unchanged");
			return Ok(());
		}
		tree.add(host, Operation::new(transformation))?;
		self.pending = true;
		trace!(node = ?tree.current(), len = content.chars().count(), "preview: updated");
		Ok(())
	}

	/// Keeps the current preview state as a regular history node.
	///
	/// Returns `true` if a node was kept.
	pub fn commit(self) -> bool {
		trace!(kept = self.pending, "preview: committed");
		self.pending
	}

	/// Discards the preview, restoring the base text and selection.
	///
	/// Returns `true` if there was something to discard.
	pub fn cancel<H: EditHost>(mut self, tree: &mut UndoTree, host: &mut H) -> Result<bool> {
		let discarded = self.pending;
		self.discard(tree, host)?;
		trace!(discarded, "preview: cancelled");
		Ok(discarded)
	}

	fn discard<H: EditHost>(&mut self, tree: &mut UndoTree, host: &mut H) -> Result<()> {
		if self.pending {
			tree.hard_undo(host)?;
			self.pending = false;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use weft_primitives::Interval;

	use super::*;
	use crate::Document;

	#[test]
	fn each_update_replaces_the_previous_one() {
		let mut doc = Document::new("fn () {}");
		let mut tree = UndoTree::new();
		doc.set_selection(Selection::point(3)).unwrap();

		let mut preview = Preview::new(&doc);
		for typed in ["m", "ma", "mai", "main"] {
			preview.update(&mut tree, &mut doc, typed).unwrap();
			assert_eq!(tree.node_count(), 2);
		}
		assert_eq!(doc.content(), "fn main() {}");
		assert_eq!(doc.selection(), &Selection::from(Interval::new(3, 7).unwrap()));
		assert!(preview.commit());

		assert!(tree.undo(&mut doc).unwrap());
		assert_eq!(doc.content(), "fn () {}");
		assert!(!tree.undo(&mut doc).unwrap());
	}

	#[test]
	fn cancel_restores_base() {
		let mut doc = Document::new("abc");
		let mut tree = UndoTree::new();
		let base: Selection = Interval::new(1, 2).unwrap().into();
		doc.set_selection(base.clone()).unwrap();

		let mut preview = Preview::new(&doc);
		preview.update(&mut tree, &mut doc, "XYZ").unwrap();
		assert_eq!(doc.content(), "aXYZc");

		assert!(preview.cancel(&mut tree, &mut doc).unwrap());
		assert_eq!(doc.content(), "abc");
		assert_eq!(doc.selection(), &base);
		assert_eq!(tree.node_count(), 1);
	}

	#[test]
	fn unchanged_update_records_nothing() {
		let mut doc = Document::new("abc");
		let mut tree = UndoTree::new();
		let mut preview = Preview::new(&doc);
		preview.update(&mut tree, &mut doc, "q").unwrap();
		preview.update(&mut tree, &mut doc, "").unwrap();
		assert!(!preview.is_pending());
		assert_eq!(tree.node_count(), 1);
		assert!(!preview.commit());
	}

	#[test]
	fn multi_cursor_preview() {
		let mut doc = Document::new("a\nb\n");
		let mut tree = UndoTree::new();
		let mut preview = Preview::with_base(Selection::from_intervals([
			Interval::point(0),
			Interval::point(2),
		]));
		preview.update(&mut tree, &mut doc, "- ").unwrap();
		assert_eq!(doc.content(), "- a\n- b\n");
		assert!(preview.commit());
		assert_eq!(tree.depth(), 1);
	}

	#[test]
	fn update_rejected_inside_sequence() {
		let mut doc = Document::new("abc");
		let mut tree = UndoTree::new();
		let mut preview = Preview::new(&doc);
		tree.start_sequence();
		assert!(matches!(
			preview.update(&mut tree, &mut doc, "x"),
			Err(HistoryError::SequenceOpen("preview"))
		));
	}
}
