//! Error types for history operations.

use thiserror::Error;
use weft_primitives::TransformError;

/// Errors raised while executing or navigating history.
///
/// Every variant signals a programming error in the caller. Ordinary edge
/// conditions such as undoing at the root are reported as `Ok(false)`.
#[derive(Debug, Error)]
pub enum HistoryError {
	/// An operation was run against text it was not built for.
	#[error("stale operation: {0}")]
	StaleOperation(#[source] TransformError),

	/// Building a new operation failed.
	#[error(transparent)]
	Transform(#[from] TransformError),

	/// An operation was executed twice without being undone in between.
	#[error("operation is already applied")]
	AlreadyApplied,

	/// An operation was undone without having been applied.
	#[error("operation is not applied")]
	NotApplied,

	/// Undo and redo are not allowed while a sequence is open.
	#[error("cannot {0} while a sequence is open")]
	SequenceOpen(&'static str),

	/// A redo branch index past the end of the child list.
	#[error("redo branch {index} does not exist ({children} available)")]
	NoSuchBranch {
		/// Requested branch index.
		index: usize,
		/// Number of branches available.
		children: usize,
	},
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
