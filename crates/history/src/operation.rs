//! Reversible commands.

use weft_primitives::{Selection, Text, TextTransformation, TransformError};

use crate::document::EditHost;
use crate::error::{HistoryError, Result};

/// Lifecycle of an [`Operation`].
///
/// `Created -> Applied -> Undone -> Applied -> ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
	/// Built but never executed.
	Created,
	/// Its effect is present in the host.
	Applied,
	/// Its effect was reverted.
	Undone,
}

/// An undoable command wrapping one [`TextTransformation`].
///
/// Executing installs the transformed text and the mapped selection on the
/// host. Undoing computes the inverse from the host's current text and
/// executes that.
#[derive(Debug, Clone)]
pub struct Operation {
	transformation: TextTransformation,
	state: OperationState,
}

impl Operation {
	pub fn new(transformation: TextTransformation) -> Self {
		Self {
			transformation,
			state: OperationState::Created,
		}
	}

	/// Builds an operation replacing each interval of `selection` in `text`.
	pub fn replace<T: Text>(
		text: &T,
		selection: Selection,
		replacements: Vec<String>,
	) -> std::result::Result<Self, TransformError> {
		TextTransformation::new(text, selection, replacements).map(Self::new)
	}

	pub fn transformation(&self) -> &TextTransformation {
		&self.transformation
	}

	pub fn state(&self) -> OperationState {
		self.state
	}

	/// Applies the transformation to the host.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::StaleOperation`] if the host text is not the
	/// snapshot the operation was built on, and
	/// [`HistoryError::AlreadyApplied`] if it was executed already.
	pub fn execute<H: EditHost>(&mut self, host: &mut H) -> Result<()> {
		if self.state == OperationState::Applied {
			return Err(HistoryError::AlreadyApplied);
		}
		run(&self.transformation, host).map_err(HistoryError::StaleOperation)?;
		self.state = OperationState::Applied;
		Ok(())
	}

	/// Reverts the transformation on the host.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::StaleOperation`] if the host text is not the
	/// one the operation produced, and [`HistoryError::NotApplied`] if it
	/// is not currently applied.
	pub fn undo<H: EditHost>(&mut self, host: &mut H) -> Result<()> {
		if self.state != OperationState::Applied {
			return Err(HistoryError::NotApplied);
		}
		let inverse = self
			.transformation
			.inverse(host.text())
			.map_err(HistoryError::StaleOperation)?;
		run(&inverse, host).map_err(HistoryError::StaleOperation)?;
		self.state = OperationState::Undone;
		Ok(())
	}

	/// Returns the text executing would produce from `text`, leaving both
	/// the operation and any host untouched.
	pub fn executed_text<T: Text>(&self, text: &T) -> Result<T> {
		if self.state == OperationState::Applied {
			return Err(HistoryError::AlreadyApplied);
		}
		text.transform(&self.transformation)
			.map_err(HistoryError::StaleOperation)
	}

	/// Returns the text undoing would produce from `text`, leaving both the
	/// operation and any host untouched.
	pub fn undone_text<T: Text>(&self, text: &T) -> Result<T> {
		if self.state != OperationState::Applied {
			return Err(HistoryError::NotApplied);
		}
		self.transformation
			.inverse(text)
			.and_then(|inverse| text.transform(&inverse))
			.map_err(HistoryError::StaleOperation)
	}
}

fn run<H: EditHost>(
	transformation: &TextTransformation,
	host: &mut H,
) -> std::result::Result<(), TransformError> {
	let text = host.text().transform(transformation)?;
	host.commit(text, transformation.compute_new_selection());
	Ok(())
}
