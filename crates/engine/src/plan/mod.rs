//! Decoration planners.
//!
//! Every category is a pure function from text, the indent model and the
//! editor state to a list of entries. The update pass runs each category
//! through [`isolate`], so a category that fails contributes nothing while
//! the others still render.

pub mod blank;
pub mod indent;
pub mod line;
pub mod spaces;
pub mod symbol;
pub mod token;

use tracing::{trace_span, warn};

use crate::cache::EditorState;
use crate::config::{ColorOverride, ColorOverrides, Options};
use crate::decoration::{Category, ColorKey, DecorationDescriptor, DecorationEntry};
use crate::error::PlanError;

/// What the pass diffs against.
#[derive(Debug, Clone, Copy)]
pub enum Baseline<'a> {
	/// No usable previous state: every category plans from scratch.
	Full,
	/// Only cursor-related categories replan relative to this state.
	Since(&'a EditorState),
}

impl<'a> Baseline<'a> {
	pub fn previous(self) -> Option<&'a EditorState> {
		match self {
			Self::Full => None,
			Self::Since(state) => Some(state),
		}
	}

	pub fn is_full(self) -> bool {
		matches!(self, Self::Full)
	}
}

/// Runs one category, appending its entries or logging and dropping its failure.
pub fn isolate<F>(category: &'static str, entries: &mut Vec<DecorationEntry>, plan: F)
where
	F: FnOnce() -> Result<Vec<DecorationEntry>, PlanError>,
{
	let _span = trace_span!("plan", category).entered();
	match plan() {
		Ok(mut planned) => entries.append(&mut planned),
		Err(error) => warn!(category, %error, "planner failed, category skipped"),
	}
}

/// Descriptor factory for one language's options.
#[derive(Debug, Clone, Copy)]
pub struct Styles<'a> {
	pub options: &'a Options,
}

pub(crate) fn hue(n: usize) -> u32 {
	u32::try_from(n).unwrap_or(u32::MAX)
}

impl<'a> Styles<'a> {
	pub fn new(options: &'a Options) -> Self {
		Self { options }
	}

	fn space(&self, category: Category, hue: u32, alpha: u8) -> DecorationDescriptor {
		DecorationDescriptor::new(category, ColorKey::new(self.options.space_base(), hue), alpha)
	}

	pub fn indent(&self, depth: usize, active: bool) -> DecorationDescriptor {
		let alphas = &self.options.alphas;
		let alpha = if active { alphas.spaces_active } else { alphas.spaces };
		self.space(Category::Indent, hue(depth), alpha)
	}

	pub fn indent_error(&self) -> DecorationDescriptor {
		DecorationDescriptor::new(
			Category::IndentError,
			ColorKey::new(self.options.space_error_color, 0),
			self.options.alphas.spaces_error,
		)
		.with_overview(self.options.lanes.indent_error)
	}

	pub fn line(&self, depth: usize) -> DecorationDescriptor {
		self.space(Category::ActiveLine, hue(depth), self.options.alphas.spaces_active)
			.whole_line()
	}

	pub fn body_space(&self, hue: u32) -> DecorationDescriptor {
		self.space(Category::BodySpace, hue, self.options.alphas.spaces_active)
	}

	pub fn trailing_space(&self, hue: u32) -> DecorationDescriptor {
		self.space(Category::TrailingSpace, hue, self.options.alphas.spaces)
	}

	pub fn trailing_space_error(&self) -> DecorationDescriptor {
		DecorationDescriptor::new(
			Category::TrailingSpaceError,
			ColorKey::new(self.options.space_error_color, 0),
			self.options.alphas.spaces_error,
		)
		.with_overview(self.options.lanes.trailing_spaces_error)
	}

	pub fn blank_lines(&self, hue: u32) -> DecorationDescriptor {
		self.space(Category::BlankLine, hue, self.options.alphas.blank_lines)
			.with_overview(self.options.lanes.blank_lines)
			.whole_line()
	}

	/// `None` when the token is suppressed by the colour map.
	pub fn token(&self, token: &str, active: bool) -> Option<DecorationDescriptor> {
		let color = overridden(&self.options.token_color_map, token, || {
			ColorKey::new(self.options.token_base(), phitint_color::hash(token))
		})?;
		let alphas = &self.options.alphas;
		let (alpha, lane) = if active {
			(alphas.token_active, self.options.lanes.active_token)
		} else {
			(alphas.token, None)
		};
		Some(DecorationDescriptor::new(Category::Token(token.to_string()), color, alpha).with_overview(lane))
	}

	/// `None` when the symbol is suppressed or has no hue.
	pub fn symbol(&self, symbol: char) -> Option<DecorationDescriptor> {
		let mut key = [0u8; 4];
		let key = symbol.encode_utf8(&mut key);
		let color = match self.options.symbol_color_map.lookup(key) {
			ColorOverride::Derived => ColorKey::new(self.options.symbol_base(), symbol::hue_of(symbol)?),
			ColorOverride::Fixed(color) => ColorKey::new(color, 0),
			ColorOverride::Suppressed => return None,
		};
		Some(DecorationDescriptor::new(Category::Symbol, color, self.options.alphas.symbol))
	}
}

fn overridden(map: &ColorOverrides, key: &str, derived: impl FnOnce() -> ColorKey) -> Option<ColorKey> {
	match map.lookup(key) {
		ColorOverride::Derived => Some(derived()),
		ColorOverride::Fixed(color) => Some(ColorKey::new(color, 0)),
		ColorOverride::Suppressed => None,
	}
}

#[cfg(test)]
mod tests;
