//! History limits.
//!
//! The undo tree grows for the whole session unless bounded. Limits are
//! written as a small TOML fragment:
//!
//! ```toml
//! max-depth = 1000
//! max-branches = 8
//! ```
//!
//! Both keys are optional; an absent key means no limit.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when parsing history configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A limit of zero would discard the edit that was just made.
	#[error("{0} must be at least 1")]
	Zero(&'static str),
}

/// Bounds on the size of an [`UndoTree`](crate::UndoTree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct HistoryConfig {
	/// Maximum number of undo steps kept along the current path. Older steps
	/// are folded into the root and can no longer be undone.
	pub max_depth: Option<usize>,
	/// Maximum number of redo branches kept per node. The oldest branches
	/// are discarded first.
	pub max_branches: Option<usize>,
}

impl HistoryConfig {
	/// Returns a configuration without limits.
	pub fn unbounded() -> Self {
		Self::default()
	}

	/// Parses a configuration from a TOML fragment.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks that every limit is at least 1.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_depth == Some(0) {
			return Err(ConfigError::Zero("max-depth"));
		}
		if self.max_branches == Some(0) {
			return Err(ConfigError::Zero("max-branches"));
		}
		Ok(())
	}
}
