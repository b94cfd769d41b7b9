//! Document- and editor-scoped caches.
//!
//! The document tier holds the content-derived indent model and is dropped on
//! every text change. The editor tier holds cursor-derived state and the
//! mute/pause flags, which must outlive text changes and active-editor
//! switches. Both are plain maps keyed by id; an editor state refers to its
//! document by id only.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::ids::{DocumentId, EditorId};
use crate::indent::IndentModel;
use crate::text::LineSpan;

/// Strong tokens, ordered for deterministic output.
pub type TokenSet = BTreeSet<String>;

/// Content-derived state of one document, rebuilt after any text change.
#[derive(Debug, Clone, Default)]
pub struct DocumentCache {
	/// `None` when no enabled category needs indentation.
	pub indent: Option<IndentModel>,
	/// Tab size the model was built with.
	pub tab_size: usize,
	/// Strong tokens published under document scope.
	pub strong_tokens: TokenSet,
}

/// What the last pass planned for one editor.
#[derive(Debug, Clone)]
pub struct EditorState {
	pub document: DocumentId,
	pub tab_size: usize,
	/// Indent depth at the cursor; `None` when the editor is not active.
	pub active_depth: Option<usize>,
	pub active_line: Option<LineSpan>,
	/// Strong tokens this editor decorated.
	pub strong_tokens: TokenSet,
	/// Per-editor override of the global mute.
	pub muted: Option<bool>,
	/// Per-editor override of the global pause.
	pub paused: Option<bool>,
	/// Decorations were cleared while disabled; the next pass must be full.
	pub cleared: bool,
	/// Document text changed since this state was planned.
	pub stale: bool,
}

impl EditorState {
	pub fn new(document: DocumentId, tab_size: usize) -> Self {
		Self {
			document,
			tab_size,
			active_depth: None,
			active_line: None,
			strong_tokens: TokenSet::new(),
			muted: None,
			paused: None,
			cleared: false,
			stale: false,
		}
	}

	pub fn active_line_number(&self) -> Option<usize> {
		self.active_line.as_ref().map(|line| line.number)
	}

	/// Whether incremental planning may diff against this state.
	pub fn is_valid_baseline(&self) -> bool {
		!self.cleared && !self.stale
	}
}

/// Both cache tiers, keyed by document and by editor.
#[derive(Debug, Default)]
pub struct CacheLayer {
	documents: FxHashMap<DocumentId, DocumentCache>,
	editors: FxHashMap<EditorId, EditorState>,
	/// Strong tokens published under window scope.
	pub window_tokens: TokenSet,
}

impl CacheLayer {
	pub fn document(&self, id: DocumentId) -> Option<&DocumentCache> {
		self.documents.get(&id)
	}

	pub fn has_document(&self, id: DocumentId) -> bool {
		self.documents.contains_key(&id)
	}

	/// Removes the entry so a pass can own it; store it back with [`Self::put_document`].
	pub fn take_document(&mut self, id: DocumentId) -> Option<DocumentCache> {
		self.documents.remove(&id)
	}

	pub fn put_document(&mut self, id: DocumentId, cache: DocumentCache) {
		self.documents.insert(id, cache);
	}

	pub fn editor(&self, id: EditorId) -> Option<&EditorState> {
		self.editors.get(&id)
	}

	pub fn editor_mut(&mut self, id: EditorId) -> Option<&mut EditorState> {
		self.editors.get_mut(&id)
	}

	pub fn put_editor(&mut self, id: EditorId, state: EditorState) {
		self.editors.insert(id, state);
	}

	pub fn remove_editor(&mut self, id: EditorId) -> Option<EditorState> {
		self.editors.remove(&id)
	}

	pub fn editors_mut(&mut self) -> impl Iterator<Item = &mut EditorState> {
		self.editors.values_mut()
	}

	/// Text changed: drops the model and marks the document's editors stale.
	pub fn invalidate_document(&mut self, id: DocumentId) {
		self.documents.remove(&id);
		for state in self.editors.values_mut().filter(|s| s.document == id) {
			state.stale = true;
		}
	}

	/// Document closed or over the size limit: drops every entry tied to it.
	pub fn drop_document(&mut self, id: DocumentId) {
		self.documents.remove(&id);
		self.editors.retain(|_, state| state.document != id);
	}

	/// Drops editor states for editors that are no longer visible.
	pub fn retain_visible(&mut self, visible: &[EditorId]) {
		self.editors.retain(|id, _| visible.contains(id));
	}

	pub fn clear(&mut self) {
		self.documents.clear();
		self.editors.clear();
		self.window_tokens.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_change_keeps_flags_but_invalidates_baseline() {
		let mut caches = CacheLayer::default();
		let doc = DocumentId(1);
		caches.put_document(doc, DocumentCache::default());
		let mut state = EditorState::new(doc, 4);
		state.muted = Some(true);
		caches.put_editor(EditorId(1), state);
		caches.put_editor(EditorId(2), EditorState::new(DocumentId(2), 4));

		caches.invalidate_document(doc);

		assert!(!caches.has_document(doc));
		let kept = caches.editor(EditorId(1)).unwrap();
		assert_eq!(kept.muted, Some(true));
		assert!(!kept.is_valid_baseline());
		assert!(caches.editor(EditorId(2)).unwrap().is_valid_baseline());
	}

	#[test]
	fn drop_document_removes_its_editors() {
		let mut caches = CacheLayer::default();
		caches.put_editor(EditorId(1), EditorState::new(DocumentId(1), 4));
		caches.put_editor(EditorId(2), EditorState::new(DocumentId(2), 4));
		caches.drop_document(DocumentId(1));
		assert!(caches.editor(EditorId(1)).is_none());
		assert!(caches.editor(EditorId(2)).is_some());
	}

	#[test]
	fn retain_visible_is_selective() {
		let mut caches = CacheLayer::default();
		for id in 1..=3 {
			caches.put_editor(EditorId(id), EditorState::new(DocumentId(1), 4));
		}
		caches.retain_visible(&[EditorId(1), EditorId(3)]);
		assert!(caches.editor(EditorId(2)).is_none());
		assert!(caches.editor(EditorId(3)).is_some());
	}
}
