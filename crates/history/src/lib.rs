//! Branching undo history for weft documents.
//!
//! An [`Operation`] wraps one [`TextTransformation`] as a reversible command
//! executed against an [`EditHost`]. The [`UndoTree`] executes operations,
//! records them as history nodes, and walks the tree on undo and redo.
//!
//! [`TextTransformation`]: weft_primitives::TextTransformation

/// History limits and their TOML form.
pub mod config;
/// Containers that own text and selection.
pub mod document;
/// History error types.
pub mod error;
/// Reversible commands.
pub mod operation;
/// Speculative edits replaced on every keystroke.
pub mod preview;
/// The branching undo tree.
pub mod tree;

pub use config::{ConfigError, HistoryConfig};
pub use document::{Document, EditHost};
pub use error::HistoryError;
pub use operation::{Operation, OperationState};
pub use preview::Preview;
pub use tree::{NodeId, UndoTree};
