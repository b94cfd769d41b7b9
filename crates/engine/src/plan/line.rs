//! Active-line highlight.

use super::{Baseline, Styles};
use crate::cache::EditorState;
use crate::decoration::DecorationEntry;

/// One whole-line entry for the cursor line, coloured by the active depth.
///
/// Incrementally, nothing is emitted unless the line or depth moved; a depth
/// change also clears the bucket of the old depth.
pub fn plan(styles: &Styles<'_>, current: &EditorState, baseline: Baseline<'_>) -> Vec<DecorationEntry> {
	let previous = baseline.previous();
	let moved = previous.is_none_or(|p| {
		p.active_line_number() != current.active_line_number() || p.active_depth != current.active_depth
	});
	if !moved {
		return Vec::new();
	}

	let mut entries = Vec::new();
	if let (Some(line), Some(depth)) = (&current.active_line, current.active_depth) {
		entries.push(DecorationEntry::range(styles.line(depth), line.range.clone()));
	}
	if let Some(old) = previous
		.and_then(|p| p.active_depth)
		.filter(|&old| Some(old) != current.active_depth)
	{
		entries.push(DecorationEntry::clear(styles.line(old)));
	}
	entries
}
