//! Core types for text editing: intervals, selections, text, and transformations.

/// Half-open character intervals.
pub mod interval;
/// Interval substitutions and the before/after position mapping.
pub mod mapping;
/// Ordered sets of disjoint intervals.
pub mod selection;
/// Text content addressed by interval and selection.
pub mod text;
/// Invertible text transformations.
pub mod transform;

pub use interval::{CharIdx, CharLen, Interval, IntervalError};
pub use mapping::{Bias, Image, IntervalMapping, IntervalSubstitution, MappingError};
pub use regex::Regex;
pub use ropey::Rope;
pub use selection::{Selection, SelectionError};
pub use text::{FindIter, RopeText, Text};
pub use transform::{TextTransformation, TransformError};
