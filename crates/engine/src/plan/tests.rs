use std::ops::Range;

use phitint_color::HexColor;
use pretty_assertions::assert_eq;

use super::token::{Requeue, StrongTokens};
use super::*;
use crate::cache::TokenSet;
use crate::config::{ActiveScope, EmphasisMode, OverviewLane};
use crate::decoration::EntrySpan;
use crate::ids::DocumentId;
use crate::indent::{IndentModel, IndentParams};
use crate::text::LineSpan;

fn state(depth: Option<usize>, line: Option<(usize, Range<usize>)>) -> EditorState {
	let mut state = EditorState::new(DocumentId(1), 4);
	state.active_depth = depth;
	state.active_line = line.map(|(number, range)| LineSpan { number, range });
	state
}

fn tokens(list: &[&str]) -> TokenSet {
	list.iter().map(|t| t.to_string()).collect()
}

fn spans(entries: &[DecorationEntry]) -> Vec<Option<Range<usize>>> {
	entries.iter().map(|e| e.range_ref().cloned()).collect()
}

#[test]
fn trailing_spaces_on_single_line() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let text = "foo   \n";
	let entries = spaces::plan_trailing(&styles, text, 0..text.len()).unwrap();
	assert_eq!(entries, vec![DecorationEntry::at(styles.trailing_space(3), 3, 3)]);
}

#[test]
fn strict_trailing_spaces_use_the_error_bucket() {
	let options = Options {
		trailing_spaces_error_enabled: true,
		..Options::default()
	};
	let styles = Styles::new(&options);
	let entries = spaces::plan_trailing(&styles, "a \t\r\n   \nb", 0..10).unwrap();
	assert_eq!(entries, vec![DecorationEntry::at(styles.trailing_space_error(), 1, 2)]);
	assert_eq!(entries[0].descriptor.overview, Some(OverviewLane::Right));
}

#[test]
fn blank_line_run_between_content() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let text = "a\n\n\nb";
	let entries = blank::plan(&styles, text, 0..text.len()).unwrap();
	assert_eq!(entries, vec![DecorationEntry::range(styles.blank_lines(1), 2..3)]);
	assert!(entries[0].descriptor.whole_line);
}

#[test]
fn blank_line_runs_edge_cases() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let plan = |text: &str| spans(&blank::plan(&styles, text, 0..text.len()).unwrap());

	assert_eq!(plan("\n\nb"), vec![Some(0..1)]);
	assert_eq!(plan("a\n  \n\t\nb"), vec![Some(2..6)]);
	assert_eq!(plan("a\n\nb\n\n"), vec![Some(2..2), Some(5..5)]);
	assert!(plan("a\n  ").is_empty());
	assert_eq!(plan("a\r\n\r\nb"), vec![Some(3..3)]);
}

#[test]
fn body_spaces_use_visual_width() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let text = "let  x =\ty;\n    a  b   \n";
	let entries = spaces::plan_body(&styles, text, 0..text.len(), 4).unwrap();
	assert_eq!(
		entries,
		vec![
			DecorationEntry::at(styles.body_space(1), 3, 2),
			DecorationEntry::at(styles.body_space(3), 8, 1),
			DecorationEntry::at(styles.body_space(1), 17, 2),
		]
	);
}

#[test]
fn symbols_share_hues_across_bracket_pairs() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let entries = symbol::plan(&styles, "f(a, b);", 0..8).unwrap();
	let hues: Vec<_> = entries.iter().map(|e| e.descriptor.color.hue).collect();
	assert_eq!(spans(&entries), vec![Some(1..2), Some(3..4), Some(6..7), Some(7..8)]);
	assert_eq!(hues, vec![6, 3, 6, 5]);
	assert_eq!(entries[0].descriptor, entries[2].descriptor);
}

#[test]
fn symbol_overrides_fix_or_suppress() {
	let mut options = Options::default();
	options.symbol_color_map.insert(",", None);
	options.symbol_color_map.insert(";", Some(HexColor::new(0xFF, 0, 0)));
	let styles = Styles::new(&options);
	let entries = symbol::plan(&styles, "a,b;", 0..4).unwrap();
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].descriptor.color, ColorKey::new(HexColor::new(0xFF, 0, 0), 0));
	assert_eq!(symbol::hue_of('a'), None);
}

#[test]
fn smart_tokens_emit_only_strong_occurrences() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let strong = tokens(&["foo"]);
	let entries = token::plan(&styles, "foo bar foo", 0..11, &strong, None).unwrap();
	assert_eq!(spans(&entries), vec![Some(0..3), Some(8..11)]);
	let descriptor = &entries[0].descriptor;
	assert_eq!(descriptor.category, Category::Token("foo".into()));
	assert_eq!(descriptor.alpha, options.alphas.token_active);
	assert_eq!(descriptor.overview, Some(OverviewLane::Center));
	assert_eq!(descriptor.color.hue, phitint_color::hash("foo"));
}

#[test]
fn incremental_tokens_replan_only_changed_strength() {
	let options = Options {
		token_mode: EmphasisMode::Full,
		..Options::default()
	};
	let styles = Styles::new(&options);
	let strong = tokens(&["foo"]);
	let previous = tokens(&["bar"]);
	let text = "foo bar baz foo";
	let entries = token::plan(&styles, text, 0..text.len(), &strong, Some(&previous)).unwrap();
	assert_eq!(
		entries,
		vec![
			DecorationEntry::at(styles.token("foo", true).unwrap(), 0, 3),
			DecorationEntry::at(styles.token("bar", false).unwrap(), 4, 3),
			DecorationEntry::at(styles.token("foo", true).unwrap(), 12, 3),
		]
	);

	let clears = token::clears(&styles, &strong, &previous);
	assert_eq!(
		clears,
		vec![
			DecorationEntry::clear(styles.token("bar", true).unwrap()),
			DecorationEntry::clear(styles.token("foo", false).unwrap()),
		]
	);
}

#[test]
fn suppressed_tokens_emit_nothing() {
	let mut options = Options {
		token_mode: EmphasisMode::Full,
		..Options::default()
	};
	options.token_color_map.insert("self", None);
	let styles = Styles::new(&options);
	let strong = tokens(&["self"]);
	assert!(token::plan(&styles, "self self", 0..9, &strong, None).unwrap().is_empty());
	assert!(token::clears(&styles, &TokenSet::new(), &strong).is_empty());
}

#[test]
fn strong_token_scope_resolution() {
	let published = tokens(&["old"]);
	let line = "let x = y";

	let local = token::resolve_strong(EmphasisMode::Smart, ActiveScope::Editor, false, line, &published);
	assert_eq!(local.tokens, tokens(&["let", "x", "y"]));
	assert_eq!(local.requeue, Requeue::Nothing);

	let publish = token::resolve_strong(EmphasisMode::Full, ActiveScope::Document, true, line, &published);
	assert_eq!(publish.requeue, Requeue::DocumentSiblings);

	let window = token::resolve_strong(EmphasisMode::Full, ActiveScope::Window, true, line, &published);
	assert_eq!(window.requeue, Requeue::OtherEditors);

	let unchanged = token::resolve_strong(EmphasisMode::Smart, ActiveScope::Window, true, "old", &published);
	assert_eq!(unchanged.requeue, Requeue::Nothing);

	let follower = token::resolve_strong(EmphasisMode::Smart, ActiveScope::Window, false, line, &published);
	assert_eq!(
		follower,
		StrongTokens {
			tokens: published.clone(),
			requeue: Requeue::Nothing
		}
	);

	let light = token::resolve_strong(EmphasisMode::Light, ActiveScope::Editor, true, line, &published);
	assert!(light.tokens.is_empty());
}

#[test]
fn token_rescan_decision() {
	let strong = tokens(&["a"]);
	let mut previous = state(None, None);
	assert!(token::needs_rescan(EmphasisMode::Smart, &strong, Baseline::Full));
	assert!(token::needs_rescan(EmphasisMode::Smart, &strong, Baseline::Since(&previous)));
	previous.strong_tokens = strong.clone();
	assert!(!token::needs_rescan(EmphasisMode::Smart, &strong, Baseline::Since(&previous)));
	assert!(!token::needs_rescan(EmphasisMode::Light, &TokenSet::new(), Baseline::Since(&previous)));
}

fn nested_model() -> IndentModel {
	let params = IndentParams {
		tab_size: 4,
		unit: Some("    ".into()),
		record_errors: true,
	};
	IndentModel::build("a\n    b\n        c\n   d\n", 0, &params)
}

#[test]
fn full_indent_pass_by_mode() {
	let model = nested_model();
	assert_eq!(model.levels, vec![vec![2..6, 8..12], vec![12..16]]);
	assert_eq!(model.errors, vec![18..21]);
	let current = state(Some(1), None);

	let full = Options::default();
	let styles = Styles::new(&full);
	let entries = indent::plan(&styles, &model, &current, Baseline::Full);
	assert_eq!(
		entries,
		vec![
			DecorationEntry::range(styles.indent_error(), 18..21),
			DecorationEntry::range(styles.indent(0, false), 2..6),
			DecorationEntry::range(styles.indent(0, false), 8..12),
			DecorationEntry::range(styles.indent(1, true), 12..16),
		]
	);

	let smart = Options {
		indent_mode: EmphasisMode::Smart,
		..Options::default()
	};
	let styles = Styles::new(&smart);
	let entries = indent::plan(&styles, &model, &current, Baseline::Full);
	assert_eq!(spans(&entries), vec![Some(18..21), Some(12..16)]);

	let none = Options {
		indent_mode: EmphasisMode::None,
		..Options::default()
	};
	assert!(indent::plan(&Styles::new(&none), &model, &current, Baseline::Full).is_empty());
}

#[test]
fn smart_indent_depth_change_is_one_clear_and_one_bucket() {
	let model = nested_model();
	let options = Options {
		indent_mode: EmphasisMode::Smart,
		..Options::default()
	};
	let styles = Styles::new(&options);
	let previous = state(Some(1), None);
	let current = state(Some(0), None);
	let entries = indent::plan(&styles, &model, &current, Baseline::Since(&previous));

	let cleared: Vec<_> = entries.iter().filter(|e| e.span == EntrySpan::Clear).collect();
	assert_eq!(cleared.len(), 1);
	assert_eq!(cleared[0].descriptor, styles.indent(1, true));
	let added: Vec<_> = entries.iter().filter(|e| e.span != EntrySpan::Clear).collect();
	assert!(added.iter().all(|e| e.descriptor == styles.indent(0, true)));
	assert_eq!(added.len(), 2);

	assert!(indent::plan(&styles, &model, &current, Baseline::Since(&current)).is_empty());
}

#[test]
fn full_indent_depth_change_swaps_regular_and_active() {
	let model = nested_model();
	let options = Options::default();
	let styles = Styles::new(&options);
	let previous = state(Some(1), None);
	let current = state(Some(0), None);
	let entries = indent::plan(&styles, &model, &current, Baseline::Since(&previous));
	assert_eq!(
		entries,
		vec![
			DecorationEntry::clear(styles.indent(1, true)),
			DecorationEntry::range(styles.indent(0, true), 2..6),
			DecorationEntry::range(styles.indent(0, true), 8..12),
			DecorationEntry::range(styles.indent(1, false), 12..16),
			DecorationEntry::clear(styles.indent(0, false)),
		]
	);
}

#[test]
fn active_line_moves() {
	let options = Options::default();
	let styles = Styles::new(&options);
	let first = state(Some(1), Some((1, 2..7)));

	assert_eq!(
		line::plan(&styles, &first, Baseline::Full),
		vec![DecorationEntry::range(styles.line(1), 2..7)]
	);
	assert!(line::plan(&styles, &first, Baseline::Since(&first)).is_empty());

	let same_depth = state(Some(1), Some((2, 8..16)));
	assert_eq!(
		line::plan(&styles, &same_depth, Baseline::Since(&first)),
		vec![DecorationEntry::range(styles.line(1), 8..16)]
	);

	let deeper = state(Some(2), Some((2, 8..16)));
	assert_eq!(
		line::plan(&styles, &deeper, Baseline::Since(&first)),
		vec![
			DecorationEntry::range(styles.line(2), 8..16),
			DecorationEntry::clear(styles.line(1)),
		]
	);
}

#[test]
fn failing_category_is_isolated() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let options = Options::default();
	let styles = Styles::new(&options);
	let text = "héllo  ";
	let mut entries = Vec::new();
	isolate("trailing", &mut entries, || spaces::plan_trailing(&styles, text, 0..text.len()));
	isolate("symbol", &mut entries, || symbol::plan(&styles, text, 0..2));
	isolate("blank", &mut entries, || blank::plan(&styles, text, 0..99));
	assert_eq!(spans(&entries), vec![Some(6..8)]);
}
