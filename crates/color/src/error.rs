use thiserror::Error;

/// Errors that can occur when parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
	/// The string is not `#RGB` or `#RRGGBB`.
	#[error("invalid color format: {0:?} (expected #RRGGBB)")]
	InvalidFormat(String),
}
