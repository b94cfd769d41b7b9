//! Error types for configuration loading and planning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
///
/// Individual option values never produce an error; they are validated,
/// logged, and replaced by their documented default.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised by a single planner category.
///
/// A failing category contributes no entries to the pass; the other
/// categories are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
	/// A region handed to a planner does not address valid text.
	#[error("region {start}..{end} is outside the text or splits a character (len {len})")]
	InvalidRange {
		start: usize,
		end: usize,
		len: usize,
	},
}
