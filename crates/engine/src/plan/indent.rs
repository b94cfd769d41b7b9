//! Indentation bands and indentation errors.

use super::{Baseline, Styles};
use crate::cache::EditorState;
use crate::decoration::DecorationEntry;
use crate::indent::IndentModel;

/// Plans indent bands for `current`.
///
/// A full pass emits every error span and every level (or only the active
/// level in `smart` mode). An incremental pass reacts to a change of active
/// depth only: the old active bucket is cleared and the new level is drawn
/// with the active alpha; with regular bands shown, the old level is redrawn
/// at the regular alpha and the new level's regular bucket is cleared.
pub fn plan(
	styles: &Styles<'_>,
	model: &IndentModel,
	current: &EditorState,
	baseline: Baseline<'_>,
) -> Vec<DecorationEntry> {
	let mode = styles.options.indent_mode;
	let (show_active, show_regular) = (mode.shows_active(), mode.shows_regular());
	if !mode.is_enabled() {
		return Vec::new();
	}
	let active = current.active_depth;
	let band = |depth: usize, is_active: bool| {
		let descriptor = styles.indent(depth, is_active);
		model
			.level(depth)
			.iter()
			.map(move |span| DecorationEntry::range(descriptor.clone(), span.clone()))
	};

	let Some(previous) = baseline.previous() else {
		let error = styles.indent_error();
		let errors = model
			.errors
			.iter()
			.map(|span| DecorationEntry::range(error.clone(), span.clone()));
		let levels = (0..model.levels.len())
			.filter(|&depth| show_regular || active == Some(depth))
			.flat_map(|depth| band(depth, show_active && active == Some(depth)));
		return errors.chain(levels).collect();
	};

	let mut entries = Vec::new();
	if !show_active || previous.active_depth == active {
		return entries;
	}
	if let Some(old) = previous.active_depth {
		entries.push(DecorationEntry::clear(styles.indent(old, true)));
	}
	if let Some(new) = active {
		entries.extend(band(new, true));
	}
	if show_regular {
		if let Some(old) = previous.active_depth {
			entries.extend(band(old, false));
		}
		if let Some(new) = active {
			entries.push(DecorationEntry::clear(styles.indent(new, false)));
		}
	}
	entries
}
