//! Decoration descriptors and entries.
//!
//! A [`DecorationDescriptor`] is the full visual identity of a bucket. Two
//! descriptors are the same bucket exactly when they are equal, and their
//! [`Display`](fmt::Display) form is the canonical key used in logs and tests.

use std::fmt;
use std::ops::Range;

use phitint_color::{HexColor, tint};

use crate::config::OverviewLane;

/// Logical category of a decoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
	/// Indentation band; the hue index is the depth.
	Indent,
	IndentError,
	/// Whole-line highlight of the cursor line; the hue index is the active depth.
	ActiveLine,
	/// Occurrences of one word-like token.
	Token(String),
	Symbol,
	BodySpace,
	TrailingSpace,
	TrailingSpaceError,
	BlankLine,
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Indent => "indent",
			Self::IndentError => "indent-error",
			Self::ActiveLine => "line",
			Self::Token(token) => return write!(f, "token:{token}"),
			Self::Symbol => "symbol",
			Self::BodySpace => "body-space",
			Self::TrailingSpace => "trailing-space",
			Self::TrailingSpaceError => "trailing-space-error",
			Self::BlankLine => "blank-line",
		};
		f.write_str(name)
	}
}

/// Base colour plus golden-ratio hue index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey {
	pub base: HexColor,
	pub hue: u32,
}

impl ColorKey {
	pub fn new(base: HexColor, hue: u32) -> Self {
		Self { base, hue }
	}

	pub fn resolve(self) -> HexColor {
		tint(self.base, self.hue)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecorationDescriptor {
	pub category: Category,
	pub color: ColorKey,
	pub alpha: u8,
	pub overview: Option<OverviewLane>,
	pub whole_line: bool,
}

impl DecorationDescriptor {
	pub fn new(category: Category, color: ColorKey, alpha: u8) -> Self {
		Self {
			category,
			color,
			alpha,
			overview: None,
			whole_line: false,
		}
	}

	pub fn with_overview(mut self, lane: Option<OverviewLane>) -> Self {
		self.overview = lane;
		self
	}

	pub fn whole_line(mut self) -> Self {
		self.whole_line = true;
		self
	}

	/// Render parameters handed to the sink when the bucket is created.
	pub fn style(&self) -> BucketStyle {
		BucketStyle {
			background: self.color.resolve().with_alpha(self.alpha),
			overview: self.overview,
			whole_line: self.whole_line,
		}
	}
}

impl fmt::Display for DecorationDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}|{}+{}|{:02X}|",
			self.category, self.color.base, self.color.hue, self.alpha
		)?;
		match self.overview {
			Some(lane) => write!(f, "{lane}")?,
			None => f.write_str("-")?,
		}
		if self.whole_line {
			f.write_str("|line")?;
		}
		Ok(())
	}
}

/// How a bucket is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStyle {
	/// `#RRGGBBAA`.
	pub background: String,
	/// Overview marker lane; the marker uses `background` as its colour.
	pub overview: Option<OverviewLane>,
	pub whole_line: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySpan {
	Range(Range<usize>),
	/// Empties the bucket for this editor without adding a range.
	Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationEntry {
	pub descriptor: DecorationDescriptor,
	pub span: EntrySpan,
}

impl DecorationEntry {
	pub fn at(descriptor: DecorationDescriptor, start: usize, len: usize) -> Self {
		Self::range(descriptor, start..start + len)
	}

	pub fn range(descriptor: DecorationDescriptor, range: Range<usize>) -> Self {
		Self {
			descriptor,
			span: EntrySpan::Range(range),
		}
	}

	pub fn clear(descriptor: DecorationDescriptor) -> Self {
		Self {
			descriptor,
			span: EntrySpan::Clear,
		}
	}

	pub fn range_ref(&self) -> Option<&Range<usize>> {
		match &self.span {
			EntrySpan::Range(range) => Some(range),
			EntrySpan::Clear => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base() -> HexColor {
		HexColor::new(0x56, 0x79, 0xC9)
	}

	#[test]
	fn canonical_key_covers_every_visual_parameter() {
		let plain = DecorationDescriptor::new(Category::Indent, ColorKey::new(base(), 2), 64);
		assert_eq!(plain.to_string(), "indent|#5679C9+2|40|-");

		let marked = DecorationDescriptor::new(Category::Token("foo".into()), ColorKey::new(base(), 5), 96)
			.with_overview(Some(OverviewLane::Center));
		assert_eq!(marked.to_string(), "token:foo|#5679C9+5|60|center");

		let line = DecorationDescriptor::new(Category::ActiveLine, ColorKey::new(base(), 1), 128).whole_line();
		assert_eq!(line.to_string(), "line|#5679C9+1|80|-|line");
	}

	#[test]
	fn descriptors_differing_only_in_alpha_are_distinct_buckets() {
		let a = DecorationDescriptor::new(Category::Indent, ColorKey::new(base(), 1), 64);
		let b = DecorationDescriptor::new(Category::Indent, ColorKey::new(base(), 1), 128);
		assert_ne!(a, b);
		assert_ne!(a.to_string(), b.to_string());
	}

	#[test]
	fn style_renders_alpha_suffix() {
		let d = DecorationDescriptor::new(Category::IndentError, ColorKey::new(HexColor::new(0xDD, 0x44, 0x44), 0), 192)
			.with_overview(Some(OverviewLane::Left));
		let style = d.style();
		assert_eq!(style.background, "#DD4444C0");
		assert_eq!(style.overview, Some(OverviewLane::Left));
		assert!(!style.whole_line);
	}

	#[test]
	fn entry_constructors() {
		let d = DecorationDescriptor::new(Category::BlankLine, ColorKey::new(base(), 0), 48);
		assert_eq!(DecorationEntry::at(d.clone(), 3, 4).range_ref(), Some(&(3..7)));
		assert_eq!(DecorationEntry::clear(d).range_ref(), None);
	}
}
