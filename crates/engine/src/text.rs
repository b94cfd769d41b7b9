//! Line and column helpers over plain `&str` snapshots.

use std::ops::Range;

use crate::error::PlanError;

/// One line of a text, without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
	/// Absolute byte offset of the first character.
	pub start: usize,
	pub text: &'a str,
	/// Whether a `\n` follows the line.
	pub terminated: bool,
}

impl Line<'_> {
	pub fn end(&self) -> usize {
		self.start + self.text.len()
	}
}

/// Iterates the lines of `text`, reporting offsets relative to `base`.
///
/// `\r\n` and `\n` both terminate a line; a trailing `\r` is not part of the
/// line text.
pub(crate) fn lines(text: &str, base: usize) -> impl Iterator<Item = Line<'_>> {
	let mut pos = base;
	text.split_inclusive('\n').map(move |raw| {
		let start = pos;
		pos += raw.len();
		let (body, terminated) = match raw.strip_suffix('\n') {
			Some(body) => (body, true),
			None => (raw, false),
		};
		Line {
			start,
			text: body.strip_suffix('\r').unwrap_or(body),
			terminated,
		}
	})
}

/// The line containing byte `offset`, with its zero-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
	pub number: usize,
	pub range: Range<usize>,
}

pub(crate) fn line_at(text: &str, offset: usize) -> LineSpan {
	let offset = floor_char_boundary(text, offset.min(text.len()));
	let before = &text[..offset];
	let start = before.rfind('\n').map_or(0, |i| i + 1);
	let number = before.bytes().filter(|&b| b == b'\n').count();
	let mut end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
	if text[start..end].ends_with('\r') {
		end -= 1;
	}
	LineSpan {
		number,
		range: start..end.max(start),
	}
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
	while !text.is_char_boundary(offset) {
		offset -= 1;
	}
	offset
}

/// Leading run of spaces and tabs.
pub(crate) fn leading_whitespace(line: &str) -> &str {
	let rest = line.trim_start_matches([' ', '\t']);
	&line[..line.len() - rest.len()]
}

pub(crate) fn is_blank(line: &str) -> bool {
	line.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Columns spanned by `segment` when it starts at visual column `start_col`.
///
/// Tabs advance to the next multiple of `tab_size`; every other character is
/// one column wide.
pub fn visual_width(segment: &str, start_col: usize, tab_size: usize) -> usize {
	let tab_size = tab_size.max(1);
	let end = segment.chars().fold(start_col, |col, c| {
		if c == '\t' {
			col + tab_size - col % tab_size
		} else {
			col + 1
		}
	});
	end - start_col
}

/// `text[range]`, or an error when `range` does not address valid text.
pub(crate) fn slice(text: &str, range: Range<usize>) -> Result<&str, PlanError> {
	text.get(range.clone()).ok_or(PlanError::InvalidRange {
		start: range.start,
		end: range.end,
		len: text.len(),
	})
}
