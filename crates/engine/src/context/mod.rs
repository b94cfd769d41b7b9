//! The engine context and its host-facing entry points.
//!
//! [`EngineContext`] owns every piece of mutable engine state: configuration,
//! both cache tiers, the scheduler, the shared bucket table and the
//! mute/pause flags. The host calls an entry point for each editor event;
//! entry points only invalidate caches and (re)arm timers. Decoration passes
//! run from [`EngineContext::on_timer`] when a token is still current.

mod update;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::cache::{CacheLayer, DocumentCache, EditorState};
use crate::config::{Config, Options};
use crate::differ::RenderBucketTable;
use crate::host::{EditorHost, HostIo};
use crate::ids::{DocumentId, EditorId};
use crate::scheduler::{Scheduler, TimerToken, delay_for};

/// Smallest limit used when relating a document size to `file_size_limit`.
const MIN_SIZE_LIMIT: usize = 1024;

/// Size of a document relative to its limit.
fn size_ratio(options: &Options, len: usize) -> f64 {
	len as f64 / options.file_size_limit.max(MIN_SIZE_LIMIT) as f64
}

fn clips(options: &Options, len: usize) -> bool {
	options.clip_by_visible_range.applies(size_ratio(options, len))
}

#[derive(Debug, Default)]
pub struct EngineContext {
	config: Config,
	caches: CacheLayer,
	scheduler: Scheduler,
	buckets: RenderBucketTable,
	/// Last editor that was active while enabled; survives focus moving to
	/// a disabled editor.
	last_active: Option<EditorId>,
	/// Global mute; `None` until first toggled.
	muted_all: Option<bool>,
	paused_all: bool,
	/// Documents decorated past the size limit on request.
	overridden: FxHashSet<DocumentId>,
	/// Documents that already raised the size advisory.
	noticed: FxHashSet<DocumentId>,
}

impl EngineContext {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn editor_state(&self, editor: EditorId) -> Option<&EditorState> {
		self.caches.editor(editor)
	}

	pub fn document_cache(&self, document: DocumentId) -> Option<&DocumentCache> {
		self.caches.document(document)
	}

	/// Whether `editor` may currently show decorations.
	pub fn is_decorated(&self, editor: EditorId) -> bool {
		self.buckets.is_decorated(editor)
	}

	pub fn bucket_count(&self) -> usize {
		self.buckets.len()
	}

	pub fn is_scheduled(&self, editor: EditorId) -> bool {
		self.scheduler.is_scheduled(editor)
	}

	/// Arms (or re-arms) the debounce timer of `editor`.
	fn schedule(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let host = io.host;
		let Some(view) = host.view(editor) else {
			return;
		};
		let options = self.config.options(view.language);
		let len = view.text.len();
		let clip = clips(&options, len);
		let delay = delay_for(&options, len, clip, self.caches.has_document(view.document));
		let (token, superseded) = self.scheduler.request(editor);
		if let Some(stale) = superseded {
			io.timer.cancel(stale);
		}
		io.timer.schedule(delay, token);
		trace!(editor = ?editor, delay_ms = delay.as_millis() as u64, clip, "decorate.schedule");
	}

	fn schedule_all(&mut self, editors: impl IntoIterator<Item = EditorId>, io: &mut HostIo<'_>) {
		for editor in editors {
			self.schedule(editor, io);
		}
	}

	/// Visible editors showing `document`.
	fn editors_of(host: &dyn EditorHost, document: DocumentId) -> Vec<EditorId> {
		host.visible_editors()
			.into_iter()
			.filter(|&editor| host.view(editor).is_some_and(|view| view.document == document))
			.collect()
	}

	/// Editor state for a toggle, created as a non-baseline placeholder when missing.
	fn state_for_toggle(&mut self, editor: EditorId, host: &dyn EditorHost) -> Option<&mut EditorState> {
		if self.caches.editor(editor).is_none() {
			let view = host.view(editor)?;
			let mut state = EditorState::new(view.document, view.tab_size);
			state.stale = true;
			self.caches.put_editor(editor, state);
		}
		self.caches.editor_mut(editor)
	}

	pub fn schedule_all_visible(&mut self, io: &mut HostIo<'_>) {
		let editors = io.host.visible_editors();
		self.schedule_all(editors, io);
	}

	/// Timer callback. Runs the pass only when `token` is the editor's latest request.
	pub fn on_timer(&mut self, token: TimerToken, io: &mut HostIo<'_>) {
		if !self.scheduler.fire(token) {
			debug!(editor = ?token.editor, "decorate.skip.stale_token");
			return;
		}
		self.update(token.editor, io);
	}

	pub fn on_text_changed(&mut self, document: DocumentId, io: &mut HostIo<'_>) {
		self.caches.invalidate_document(document);
		let editors = Self::editors_of(io.host, document);
		self.schedule_all(editors, io);
	}

	/// Cursor moved in `editor`. Only the active editor replans, and only
	/// when some category depends on the cursor.
	pub fn on_selection_changed(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		if io.host.active_editor() != Some(editor) {
			return;
		}
		let host = io.host;
		let Some(view) = host.view(editor) else {
			return;
		};
		let options = self.config.options(view.language);
		if options.indent_mode.shows_active() || options.token_mode.shows_active() || options.line_enabled {
			self.schedule(editor, io);
		}
	}

	/// Scrolling matters only when planning is clipped to the visible ranges.
	pub fn on_visible_range_changed(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let host = io.host;
		let Some(view) = host.view(editor) else {
			return;
		};
		if clips(&self.config.options(view.language), view.text.len()) {
			self.schedule(editor, io);
		}
	}

	/// Drops state of editors that are no longer visible and replans the new
	/// active editor. Its pass requeues the editor that lost focus.
	pub fn on_active_editor_changed(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let visible = io.host.visible_editors();
		self.caches.retain_visible(&visible);
		self.schedule(editor, io);
	}

	/// Disposes every bucket, drops both cache tiers and replans every visible editor.
	pub fn on_configuration_changed(&mut self, config: Config, io: &mut HostIo<'_>) {
		self.buckets.dispose_all(io.sink);
		self.caches.clear();
		self.config = config;
		debug!("decorate.config_changed");
		self.schedule_all_visible(io);
	}

	pub fn on_editor_closed(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		self.caches.remove_editor(editor);
		self.buckets.forget_editor(editor, io.sink);
		if let Some(token) = self.scheduler.forget(editor) {
			io.timer.cancel(token);
		}
		if self.last_active == Some(editor) {
			self.last_active = None;
		}
	}

	pub fn on_document_closed(&mut self, document: DocumentId, _io: &mut HostIo<'_>) {
		self.caches.drop_document(document);
		self.overridden.remove(&document);
		self.noticed.remove(&document);
	}

	/// Decorates the document of `editor` even past the size limit.
	pub fn request_recompute(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let Some(document) = io.host.view(editor).map(|view| view.document) else {
			return;
		};
		self.overridden.insert(document);
		let editors = Self::editors_of(io.host, document);
		self.schedule_all(editors, io);
	}

	pub fn toggle_mute(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let muted_all = self.muted_all;
		let Some(state) = self.state_for_toggle(editor, io.host) else {
			return;
		};
		state.muted = Some(!state.muted.or(muted_all).unwrap_or(false));
		state.paused = None;
		self.schedule(editor, io);
	}

	pub fn toggle_mute_all(&mut self, io: &mut HostIo<'_>) {
		self.muted_all = Some(!self.muted_all.unwrap_or(false));
		self.paused_all = false;
		for state in self.caches.editors_mut() {
			state.muted = None;
			state.paused = None;
		}
		self.schedule_all_visible(io);
	}

	/// A paused editor keeps what it shows and skips passes until un-paused.
	pub fn toggle_pause(&mut self, editor: EditorId, io: &mut HostIo<'_>) {
		let paused_all = self.paused_all;
		let Some(state) = self.state_for_toggle(editor, io.host) else {
			return;
		};
		let paused = !state.paused.unwrap_or(paused_all);
		state.paused = Some(paused);
		if !paused {
			self.schedule(editor, io);
		}
	}

	pub fn toggle_pause_all(&mut self, io: &mut HostIo<'_>) {
		self.paused_all = !self.paused_all;
		for state in self.caches.editors_mut() {
			state.paused = None;
		}
		self.schedule_all_visible(io);
	}
}
