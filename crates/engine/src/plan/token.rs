//! Word-token colouring and strong-token emphasis.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::{Baseline, Styles};
use crate::cache::TokenSet;
use crate::config::{ActiveScope, EmphasisMode};
use crate::decoration::DecorationEntry;
use crate::error::PlanError;
use crate::text::slice;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Word-like tokens of `line`.
pub fn words(line: &str) -> TokenSet {
	WORD.find_iter(line).map(|m| m.as_str().to_string()).collect()
}

/// Editors to re-queue after a strong-token set was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requeue {
	Nothing,
	/// Other visible editors of the same document.
	DocumentSiblings,
	/// Every other visible editor.
	OtherEditors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrongTokens {
	pub tokens: TokenSet,
	/// When not [`Requeue::Nothing`], `tokens` replaces the published set.
	pub requeue: Requeue,
}

impl StrongTokens {
	fn local(tokens: TokenSet) -> Self {
		Self {
			tokens,
			requeue: Requeue::Nothing,
		}
	}
}

/// Strong tokens for one editor.
///
/// Under `editor` scope, or for the active editor, they come from the cursor
/// line. The active editor publishes them under `document`/`window` scope and
/// asks for its siblings to be re-queued when the published set changes; the
/// other editors adopt the `published` set.
pub fn resolve_strong(
	mode: EmphasisMode,
	scope: ActiveScope,
	is_active: bool,
	cursor_line: &str,
	published: &TokenSet,
) -> StrongTokens {
	if !mode.shows_active() {
		return StrongTokens::local(TokenSet::new());
	}
	if !is_active && scope != ActiveScope::Editor {
		return StrongTokens::local(published.clone());
	}
	let tokens = words(cursor_line);
	let requeue = match scope {
		_ if tokens == *published => Requeue::Nothing,
		ActiveScope::Editor => Requeue::Nothing,
		ActiveScope::Document => Requeue::DocumentSiblings,
		ActiveScope::Window => Requeue::OtherEditors,
	};
	StrongTokens { tokens, requeue }
}

/// Whether token entries must be replanned this pass.
pub fn needs_rescan(mode: EmphasisMode, strong: &TokenSet, baseline: Baseline<'_>) -> bool {
	match baseline.previous() {
		None => true,
		Some(previous) => mode.shows_active() && previous.strong_tokens != *strong,
	}
}

/// Clears for buckets whose tokens changed strength since `previous`.
pub fn clears(styles: &Styles<'_>, strong: &TokenSet, previous: &TokenSet) -> Vec<DecorationEntry> {
	let weakened = previous
		.difference(strong)
		.filter_map(|token| styles.token(token, true));
	let strengthened = styles
		.options
		.token_mode
		.shows_regular()
		.then(|| strong.difference(previous).filter_map(|token| styles.token(token, false)))
		.into_iter()
		.flatten();
	weakened.chain(strengthened).map(DecorationEntry::clear).collect()
}

/// Token entries within `region`.
///
/// With `previous` given, only tokens whose strength changed are emitted.
pub fn plan(
	styles: &Styles<'_>,
	text: &str,
	region: Range<usize>,
	strong: &TokenSet,
	previous: Option<&TokenSet>,
) -> Result<Vec<DecorationEntry>, PlanError> {
	let show_regular = styles.options.token_mode.shows_regular();
	let base = region.start;
	let region_text = slice(text, region)?;
	Ok(WORD
		.find_iter(region_text)
		.filter_map(|m| {
			let token = m.as_str();
			let active = strong.contains(token);
			if previous.is_some_and(|p| p.contains(token) == active) {
				return None;
			}
			if !show_regular && !active {
				return None;
			}
			let descriptor = styles.token(token, active)?;
			Some(DecorationEntry::at(descriptor, base + m.start(), m.len()))
		})
		.collect())
}
