use std::ops::Range;

use super::Styles;
use crate::decoration::DecorationEntry;
use crate::error::PlanError;
use crate::text::slice;

/// Fixed hue per punctuation character; bracket pairs share one.
pub fn hue_of(symbol: char) -> Option<u32> {
	Some(match symbol {
		'!' => 1,
		'.' => 2,
		',' => 3,
		':' => 4,
		';' => 5,
		'(' | ')' => 6,
		'[' | ']' => 7,
		'{' | '}' => 8,
		'<' | '>' => 9,
		'"' => 10,
		'\'' => 11,
		'`' => 12,
		'#' => 13,
		'$' => 14,
		'%' => 15,
		'&' => 16,
		'=' => 17,
		'-' => 18,
		'+' => 19,
		'*' => 20,
		'@' => 21,
		'\\' => 22,
		'/' => 23,
		'|' => 24,
		'?' => 25,
		'^' => 26,
		'~' => 27,
		_ => return None,
	})
}

pub fn plan(styles: &Styles<'_>, text: &str, region: Range<usize>) -> Result<Vec<DecorationEntry>, PlanError> {
	let base = region.start;
	Ok(slice(text, region)?
		.char_indices()
		.filter_map(|(i, c)| {
			let descriptor = styles.symbol(c)?;
			Some(DecorationEntry::at(descriptor, base + i, c.len_utf8()))
		})
		.collect())
}
