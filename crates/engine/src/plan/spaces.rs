//! Irregular spacing inside lines and at their ends.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::{Styles, hue};
use crate::decoration::DecorationEntry;
use crate::error::PlanError;
use crate::text::{leading_whitespace, lines, slice, visual_width};

static BODY_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}|\t+").expect("gap pattern is valid"));

const WS: [char; 2] = [' ', '\t'];

/// Runs of two or more spaces, or any tabs, between the first and last word.
///
/// The hue is the run's visual width minus one, measured from its real column.
pub fn plan_body(
	styles: &Styles<'_>,
	text: &str,
	region: Range<usize>,
	tab_size: usize,
) -> Result<Vec<DecorationEntry>, PlanError> {
	let mut entries = Vec::new();
	for line in lines(slice(text, region.clone())?, region.start) {
		let lead = leading_whitespace(line.text).len();
		let content = line.text[lead..].trim_end_matches(WS);
		let Some(first_gap) = content.find(WS) else {
			continue;
		};
		let last_char = content.char_indices().next_back().map_or(0, |(i, _)| i);
		let middle = &content[first_gap..last_char];
		for gap in BODY_GAP.find_iter(middle) {
			let at = lead + first_gap + gap.start();
			let col = visual_width(&line.text[..at], 0, tab_size);
			let width = visual_width(gap.as_str(), col, tab_size);
			entries.push(DecorationEntry::at(
				styles.body_space(hue(width.saturating_sub(1))),
				line.start + at,
				gap.len(),
			));
		}
	}
	Ok(entries)
}

/// Whitespace between the last non-blank character and the end of the line.
pub fn plan_trailing(
	styles: &Styles<'_>,
	text: &str,
	region: Range<usize>,
) -> Result<Vec<DecorationEntry>, PlanError> {
	let strict = styles.options.trailing_spaces_error_enabled;
	let mut entries = Vec::new();
	for line in lines(slice(text, region.clone())?, region.start) {
		let content = line.text.trim_end_matches(WS);
		let run = line.text.len() - content.len();
		if content.is_empty() || run == 0 {
			continue;
		}
		let descriptor = if strict {
			styles.trailing_space_error()
		} else {
			styles.trailing_space(hue(run))
		};
		entries.push(DecorationEntry::at(descriptor, line.start + content.len(), run));
	}
	Ok(entries)
}
