use std::ops::Range;

use super::{Styles, hue};
use crate::decoration::DecorationEntry;
use crate::error::PlanError;
use crate::text::{is_blank, lines, slice};

/// Runs of newline-terminated whitespace-only lines.
///
/// Each run spans from the start of its first line to the content end of its
/// last, drawn whole-line with hue `lines - 1`.
pub fn plan(styles: &Styles<'_>, text: &str, region: Range<usize>) -> Result<Vec<DecorationEntry>, PlanError> {
	let mut entries = Vec::new();
	let mut run: Option<(Range<usize>, usize)> = None;
	let mut flush = |run: &mut Option<(Range<usize>, usize)>| {
		if let Some((span, count)) = run.take() {
			entries.push(DecorationEntry::range(styles.blank_lines(hue(count - 1)), span));
		}
	};
	for line in lines(slice(text, region.clone())?, region.start) {
		if line.terminated && is_blank(line.text) {
			match &mut run {
				Some((span, count)) => {
					span.end = line.end();
					*count += 1;
				}
				None => run = Some((line.start..line.end(), 1)),
			}
		} else {
			flush(&mut run);
		}
	}
	flush(&mut run);
	Ok(entries)
}
