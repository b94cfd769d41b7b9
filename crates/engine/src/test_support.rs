//! In-memory host collaborators for tests.

use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::decoration::BucketStyle;
use crate::host::{BucketHandle, EditorHost, EditorView, RenderSink};
use crate::ids::{DocumentId, EditorId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
	pub editor: EditorId,
	pub bucket: BucketHandle,
	pub ranges: Vec<Range<usize>>,
}

/// Sink that records every call and mirrors what each editor shows.
#[derive(Debug, Default)]
pub struct RecordingSink {
	next: u64,
	pub styles: FxHashMap<BucketHandle, BucketStyle>,
	pub applied: Vec<Applied>,
	pub disposed: Vec<BucketHandle>,
	pub advisories: Vec<(DocumentId, usize, usize)>,
	shown: FxHashMap<(EditorId, BucketHandle), Vec<Range<usize>>>,
}

impl RecordingSink {
	pub fn take_applied(&mut self) -> Vec<Applied> {
		std::mem::take(&mut self.applied)
	}

	/// Ranges currently shown in `editor` for `bucket`.
	pub fn shown(&self, editor: EditorId, bucket: BucketHandle) -> &[Range<usize>] {
		self.shown.get(&(editor, bucket)).map_or(&[], Vec::as_slice)
	}

	pub fn shows_anything(&self, editor: EditorId) -> bool {
		self.shown.iter().any(|((e, _), ranges)| *e == editor && !ranges.is_empty())
	}
}

impl RenderSink for RecordingSink {
	fn create_bucket(&mut self, style: &BucketStyle) -> BucketHandle {
		self.next += 1;
		let handle = BucketHandle(self.next);
		self.styles.insert(handle, style.clone());
		handle
	}

	fn apply(&mut self, editor: EditorId, bucket: BucketHandle, ranges: &[Range<usize>]) {
		self.shown.insert((editor, bucket), ranges.to_vec());
		self.applied.push(Applied {
			editor,
			bucket,
			ranges: ranges.to_vec(),
		});
	}

	fn dispose(&mut self, bucket: BucketHandle) {
		self.shown.retain(|(_, handle), _| *handle != bucket);
		self.disposed.push(bucket);
	}

	fn advise_over_limit(&mut self, document: DocumentId, len: usize, limit: usize) {
		self.advisories.push((document, len, limit));
	}
}

#[derive(Debug, Clone)]
pub struct FakeEditor {
	pub document: DocumentId,
	pub language: String,
	pub text: String,
	pub cursor: usize,
	/// `None` means the whole text is visible.
	pub visible: Option<Vec<Range<usize>>>,
	pub tab_size: usize,
	pub is_panel: bool,
	whole: Vec<Range<usize>>,
}

impl FakeEditor {
	pub fn new(document: u64, text: &str) -> Self {
		Self {
			document: DocumentId(document),
			language: "plaintext".into(),
			text: text.into(),
			cursor: 0,
			visible: None,
			tab_size: 4,
			is_panel: false,
			whole: vec![0..text.len()],
		}
	}

	pub fn language(mut self, language: &str) -> Self {
		self.language = language.into();
		self
	}

	pub fn visible(mut self, visible: Vec<Range<usize>>) -> Self {
		self.visible = Some(visible);
		self
	}
}

/// Host with a fixed set of visible editors. Editors sharing a document id
/// must be kept in sync by the test.
#[derive(Debug, Default)]
pub struct FakeHost {
	pub editors: Vec<(EditorId, FakeEditor)>,
	pub active: Option<EditorId>,
}

impl FakeHost {
	pub fn with(mut self, id: u64, editor: FakeEditor) -> Self {
		self.editors.push((EditorId(id), editor));
		self
	}

	pub fn active(mut self, id: u64) -> Self {
		self.active = Some(EditorId(id));
		self
	}

	pub fn editor_mut(&mut self, id: u64) -> &mut FakeEditor {
		&mut self
			.editors
			.iter_mut()
			.find(|(e, _)| *e == EditorId(id))
			.expect("unknown test editor")
			.1
	}

	/// Replaces the text of every editor showing `document`.
	pub fn set_text(&mut self, document: u64, text: &str) {
		for (_, editor) in self.editors.iter_mut().filter(|(_, e)| e.document == DocumentId(document)) {
			editor.text = text.into();
			editor.whole = vec![0..text.len()];
			editor.cursor = editor.cursor.min(text.len());
		}
	}

	pub fn close(&mut self, id: u64) {
		self.editors.retain(|(e, _)| *e != EditorId(id));
		if self.active == Some(EditorId(id)) {
			self.active = None;
		}
	}
}

impl EditorHost for FakeHost {
	fn visible_editors(&self) -> Vec<EditorId> {
		self.editors.iter().map(|(id, _)| *id).collect()
	}

	fn active_editor(&self) -> Option<EditorId> {
		self.active
	}

	fn view(&self, editor: EditorId) -> Option<EditorView<'_>> {
		let (_, e) = self.editors.iter().find(|(id, _)| *id == editor)?;
		Some(EditorView {
			document: e.document,
			language: &e.language,
			text: &e.text,
			cursor: e.cursor,
			visible: e.visible.as_deref().unwrap_or(&e.whole),
			tab_size: e.tab_size,
			is_panel: e.is_panel,
		})
	}
}
