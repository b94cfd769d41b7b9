//! Indentation unit inference and the per-depth level map.
//!
//! The unit is inferred from the distribution of leading-whitespace widths:
//! a tab when tabs dominate, otherwise the gcd of the frequent space widths.
//! Each run is then consumed greedily, unit by unit, into spans grouped by
//! depth. Remainders that cannot form a whole unit become error spans (or
//! stay at the current depth when errors are not reported).

use std::ops::Range;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::text::{leading_whitespace, lines, visual_width};

/// Widths considered when reducing the distribution.
const TOP_WIDTHS: usize = 10;

/// Leading whitespace of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentRun {
	/// Document offset of the line start.
	pub offset: usize,
	pub text: String,
}

/// Inputs to [`IndentModel::build`].
#[derive(Debug, Clone)]
pub struct IndentParams {
	pub tab_size: usize,
	/// Forced unit text; inferred when `None`.
	pub unit: Option<String>,
	/// Report misaligned remainders as errors instead of folding them into a level.
	pub record_errors: bool,
}

/// Indentation of a document or region: the unit, spans grouped by depth,
/// and misaligned spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentModel {
	pub unit: String,
	/// Visual width of `unit` in columns.
	pub unit_size: usize,
	/// Spaces, not tabs, are the dominant indent character.
	pub space_default: bool,
	/// `levels[d]` holds every span at depth `d`, in document order.
	pub levels: Vec<Vec<Range<usize>>>,
	pub errors: Vec<Range<usize>>,
	/// Every indented line, in document order.
	pub runs: Vec<IndentRun>,
}

impl IndentModel {
	/// Builds the model for `text`, whose first byte sits at document offset `base`.
	pub fn build(text: &str, base: usize, params: &IndentParams) -> Self {
		let tab_size = params.tab_size.max(1);
		let runs = scan_runs(text, base);
		let (unit, space_default) = match &params.unit {
			Some(unit) => (unit.clone(), !unit.is_empty() && unit.bytes().all(|b| b == b' ')),
			None => infer_unit(&runs, tab_size),
		};
		let unit_size = visual_width(&unit, 0, tab_size).max(1);

		let mut model = Self {
			unit,
			unit_size,
			space_default,
			levels: Vec::new(),
			errors: Vec::new(),
			runs: Vec::new(),
		};
		for run in &runs {
			model.walk(run, tab_size, params.record_errors);
		}
		model.runs = runs;
		model
	}

	pub fn level(&self, depth: usize) -> &[Range<usize>] {
		self.levels.get(depth).map_or(&[], Vec::as_slice)
	}

	/// Depth of a cursor whose line starts with `prefix` up to the cursor.
	pub fn depth_at(&self, prefix: &str, tab_size: usize) -> usize {
		visual_width(leading_whitespace(prefix), 0, tab_size) / self.unit_size.max(1)
	}

	fn record(&mut self, depth: usize, span: Range<usize>) {
		if self.levels.len() <= depth {
			self.levels.resize_with(depth + 1, Vec::new);
		}
		self.levels[depth].push(span);
	}

	fn misaligned(&mut self, depth: usize, span: Range<usize>, record_errors: bool) {
		if record_errors {
			self.errors.push(span);
		} else {
			self.record(depth, span);
		}
	}

	fn walk(&mut self, run: &IndentRun, tab_size: usize, record_errors: bool) {
		let unit = self.unit.clone();
		let mut rest = run.text.as_str();
		let mut cursor = run.offset;
		let mut col = 0;
		let mut depth = 0;

		while !rest.is_empty() {
			let width = visual_width(rest, col, tab_size);
			let consumed = if !unit.is_empty() && rest.starts_with(&unit) {
				self.record(depth, cursor..cursor + unit.len());
				depth += 1;
				unit.len()
			} else if width < self.unit_size {
				self.misaligned(depth, cursor..cursor + rest.len(), record_errors);
				rest.len()
			} else if self.space_default {
				// Spaces followed by a tab that overshoots the next unit boundary.
				let spaces = count_spaces(rest);
				let take = (spaces + 1).min(rest.len());
				if spaces > 0 {
					self.record(depth, cursor..cursor + spaces);
				}
				self.misaligned(depth, cursor + spaces..cursor + take, record_errors);
				depth += visual_width(&rest[..take], col, tab_size).div_ceil(self.unit_size);
				take
			} else {
				let n = count_spaces(rest).min(self.unit_size).max(1);
				self.misaligned(depth, cursor..cursor + n, record_errors);
				depth += 1;
				n
			};
			col += visual_width(&rest[..consumed], col, tab_size);
			cursor += consumed;
			rest = &rest[consumed..];
		}
	}
}

fn count_spaces(s: &str) -> usize {
	s.bytes().take_while(|&b| b == b' ').count()
}

/// Leading whitespace of every line that has any, whitespace-only lines included.
pub fn scan_runs(text: &str, base: usize) -> Vec<IndentRun> {
	lines(text, base)
		.filter_map(|line| {
			let ws = leading_whitespace(line.text);
			(!ws.is_empty()).then(|| IndentRun {
				offset: line.start,
				text: ws.to_string(),
			})
		})
		.collect()
}

/// Infers `(unit_text, space_default)` from the runs.
pub fn infer_unit(runs: &[IndentRun], tab_size: usize) -> (String, bool) {
	let mut spaces = 0;
	let mut tabs = 0;
	let mut widths: IndexMap<usize, usize, FxBuildHasher> = IndexMap::default();
	for run in runs {
		let run_tabs = run.text.bytes().filter(|&b| b == b'\t').count();
		tabs += run_tabs;
		spaces += run.text.len() - run_tabs;
		*widths.entry(visual_width(&run.text, 0, tab_size)).or_default() += 1;
	}

	if tabs * tab_size > spaces {
		return ("\t".to_string(), false);
	}

	let size = match widths.len() {
		0 => tab_size,
		1 => widths.keys().next().copied().unwrap_or(tab_size),
		_ => {
			let mut ranked: Vec<(usize, usize)> = widths.into_iter().collect();
			// Stable: equal counts keep first-seen order.
			ranked.sort_by(|a, b| b.1.cmp(&a.1));
			let top = ranked[0].1;
			ranked
				.iter()
				.take(TOP_WIDTHS)
				.filter(|&&(_, count)| count * 10 > top)
				.map(|&(width, _)| width)
				.fold(0, gcd)
		}
	};
	(" ".repeat(size.max(1)), true)
}

fn gcd(a: usize, b: usize) -> usize {
	if b == 0 { a } else { gcd(b, a % b) }
}
