//! The decoration pass for one editor.
//!
//! Gates run first (enablement, pause, size limit), then the document tier is
//! reused or rebuilt, the editor tier is recomputed from the cursor, every
//! category is planned against the previous editor state and the result is
//! pushed through the bucket table.

use std::ops::Range;

use tracing::{debug, info, trace_span};

use super::{EngineContext, clips, size_ratio};
use crate::cache::{DocumentCache, EditorState, TokenSet};
use crate::config::{ActiveScope, Options};
use crate::decoration::DecorationEntry;
use crate::host::{EditorView, HostIo};
use crate::ids::EditorId;
use crate::indent::{IndentModel, IndentParams};
use crate::plan::token::Requeue;
use crate::plan::{self, Baseline, Styles, isolate};
use crate::text::line_at;

/// Line-aligned hull of the visible ranges, clamped to the text.
fn visible_hull(text: &str, visible: &[Range<usize>]) -> Range<usize> {
	let start = visible.iter().map(|r| r.start).min().unwrap_or(0);
	let end = visible.iter().map(|r| r.end).max().unwrap_or(0);
	let start = line_at(text, start).range.start;
	let end = line_at(text, end).range.end;
	start..end.max(start)
}

fn clamp(range: &Range<usize>, len: usize) -> Range<usize> {
	let end = range.end.min(len);
	range.start.min(end)..end
}

fn build_document(text: &str, base: usize, tab_size: usize, options: &Options) -> DocumentCache {
	let indent = options.needs_indent_model().then(|| {
		let _span = trace_span!("indent_model", len = text.len(), base).entered();
		let params = IndentParams {
			tab_size,
			unit: options.indent.unit_text(),
			record_errors: options.indent_error_enabled,
		};
		IndentModel::build(text, base, &params)
	});
	DocumentCache {
		indent,
		tab_size,
		strong_tokens: TokenSet::new(),
	}
}

/// Keeps entries inside a visible range and strips their overview markers.
fn clip_entries(entries: &mut Vec<DecorationEntry>, visible: &[Range<usize>]) {
	entries.retain(|entry| {
		entry
			.range_ref()
			.is_none_or(|r| visible.iter().any(|v| v.start <= r.start && r.end <= v.end))
	});
	for entry in entries {
		entry.descriptor.overview = None;
	}
}

impl EngineContext {
	pub(super) fn update(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let host = io.host;
		let Some(view) = host.view(editor) else {
			debug!(editor = ?editor, "decorate.skip.gone");
			return;
		};
		if self.caches.editor(editor).is_some_and(|s| s.document != view.document) {
			self.caches.remove_editor(editor);
		}
		let options = self.config.options(view.language);

		let (muted, paused, cleared) = match self.caches.editor(editor) {
			Some(state) => (
				state.muted.or(self.muted_all),
				state.paused.unwrap_or(self.paused_all),
				state.cleared,
			),
			None => (self.muted_all, false, false),
		};
		let enabled = match muted {
			Some(muted) => !muted,
			None => options.enabled && (!view.is_panel || options.enabled_panels),
		};
		if !enabled {
			let pushed = self.buckets.clear_editor(editor, io.sink);
			if let Some(state) = self.caches.editor_mut(editor) {
				state.cleared = true;
			}
			debug!(editor = ?editor, pushed, "decorate.skip.disabled");
			return;
		}
		if host.active_editor() == Some(editor)
			&& let Some(previous) = self.last_active.replace(editor)
			&& previous != editor
			&& self.config.global().active_scope != ActiveScope::Editor
			&& host.visible_editors().contains(&previous)
		{
			// The editor that lost focus still shows its active line and depth.
			debug!(editor = ?previous, "decorate.requeue.inactive");
			self.schedule(previous, io);
		}
		if paused && !cleared {
			debug!(editor = ?editor, "decorate.skip.paused");
			return;
		}

		let len = view.text.len();
		let clip = clips(&options, len);
		if !clip && len > options.file_size_limit && !self.overridden.contains(&view.document) {
			self.over_limit(editor, &view, &options, io);
			return;
		}
		self.decorate(editor, &view, &options, clip, io);
	}

	fn over_limit(&mut self, editor: EditorId, view: &EditorView<'_>, options: &Options, io: &mut HostIo<'_>) {
		let len = view.text.len();
		let limit = options.file_size_limit;
		self.buckets.clear_editor(editor, io.sink);
		self.caches.drop_document(view.document);
		if options.over_limit_notice.admits(size_ratio(options, len)) && self.noticed.insert(view.document) {
			info!(document = ?view.document, len, limit, "decorate.over_limit.advised");
			io.sink.advise_over_limit(view.document, len, limit);
		} else {
			debug!(document = ?view.document, len, limit, "decorate.skip.over_limit");
		}
	}

	fn decorate(&mut self, editor: EditorId, view: &EditorView<'_>, options: &Options, clip: bool, io: &mut HostIo<'_>) {
		let text = view.text;
		let scope = self.config.global().active_scope;
		let is_active = self.last_active == Some(editor);
		let previous = self.caches.remove_editor(editor);
		let baseline = match &previous {
			Some(state) if !clip && state.is_valid_baseline() && state.tab_size == view.tab_size => Baseline::Since(state),
			_ => Baseline::Full,
		};

		let visible: Vec<Range<usize>> = view.visible.iter().map(|r| clamp(r, text.len())).collect();
		let mut document = if clip {
			let hull = visible_hull(text, &visible);
			build_document(&text[hull.clone()], hull.start, view.tab_size, options)
		} else {
			match self.caches.take_document(view.document) {
				Some(cached) if cached.tab_size == view.tab_size => cached,
				_ => build_document(text, 0, view.tab_size, options),
			}
		};

		let cursor = view.cursor.min(text.len());
		let cursor_line = line_at(text, cursor);
		let mut current = EditorState::new(view.document, view.tab_size);
		if let Some(model) = &document.indent
			&& (is_active || scope == ActiveScope::Editor)
		{
			let line = &cursor_line.range;
			let prefix = text.get(line.start..cursor.clamp(line.start, line.end)).unwrap_or_default();
			current.active_depth = Some(model.depth_at(prefix, view.tab_size));
			current.active_line = Some(cursor_line.clone());
		}
		if let Some(previous) = &previous {
			current.muted = previous.muted;
			current.paused = previous.paused;
		}

		let mut requeue = Vec::new();
		if options.token_mode.is_enabled() {
			let unshared = TokenSet::new();
			let published = match scope {
				ActiveScope::Editor => &unshared,
				ActiveScope::Document => &document.strong_tokens,
				ActiveScope::Window => &self.caches.window_tokens,
			};
			let strong = plan::token::resolve_strong(
				options.token_mode,
				scope,
				is_active,
				&text[cursor_line.range.clone()],
				published,
			);
			match strong.requeue {
				Requeue::Nothing => {}
				// Published only to this pass's hull model, which is never stored.
				Requeue::DocumentSiblings if clip => {}
				Requeue::DocumentSiblings => {
					document.strong_tokens = strong.tokens.clone();
					requeue = Self::editors_of(io.host, view.document);
				}
				Requeue::OtherEditors => {
					self.caches.window_tokens = strong.tokens.clone();
					requeue = io.host.visible_editors();
				}
			}
			requeue.retain(|&other| other != editor);
			current.strong_tokens = strong.tokens;
		}

		let regions = if clip { visible.clone() } else { vec![0..text.len()] };
		let styles = Styles::new(options);
		let mut entries = Vec::new();
		if options.line_enabled {
			entries.extend(plan::line::plan(&styles, &current, baseline));
		}
		if let Some(model) = &document.indent {
			let _span = trace_span!("plan", category = "indent").entered();
			entries.extend(plan::indent::plan(&styles, model, &current, baseline));
		}
		if options.token_mode.is_enabled() && plan::token::needs_rescan(options.token_mode, &current.strong_tokens, baseline) {
			let previous_tokens = baseline.previous().map(|p| &p.strong_tokens);
			if let Some(previous_tokens) = previous_tokens {
				entries.extend(plan::token::clears(&styles, &current.strong_tokens, previous_tokens));
			}
			for region in &regions {
				isolate("token", &mut entries, || {
					plan::token::plan(&styles, text, region.clone(), &current.strong_tokens, previous_tokens)
				});
			}
		}
		if baseline.is_full() {
			for region in &regions {
				if options.symbol_enabled {
					isolate("symbol", &mut entries, || plan::symbol::plan(&styles, text, region.clone()));
				}
				if options.body_spaces_enabled {
					isolate("body-space", &mut entries, || {
						plan::spaces::plan_body(&styles, text, region.clone(), view.tab_size)
					});
				}
				if options.trailing_spaces_enabled {
					isolate("trailing-space", &mut entries, || plan::spaces::plan_trailing(&styles, text, region.clone()));
				}
				if options.blank_lines_enabled {
					isolate("blank-line", &mut entries, || plan::blank::plan(&styles, text, region.clone()));
				}
			}
		}
		if clip {
			clip_entries(&mut entries, &visible);
		}

		let full = baseline.is_full();
		let planned = entries.len();
		let applied = self.buckets.render(editor, entries, full, io.sink);
		debug!(editor = ?editor, full, clip, planned, applied, "decorate.pass");

		if !clip {
			self.caches.put_document(view.document, document);
		}
		self.caches.put_editor(editor, current);
		self.schedule_all(requeue, io);
	}
}
