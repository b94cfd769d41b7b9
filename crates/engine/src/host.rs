//! Interfaces to the editor-hosting layer.
//!
//! The engine never owns documents or editors. It reads snapshots through
//! [`EditorHost`], pushes ranges through [`RenderSink`] and arms timers
//! through [`Timer`](crate::timer::Timer).

use std::ops::Range;

use crate::decoration::BucketStyle;
use crate::ids::{DocumentId, EditorId};
use crate::timer::Timer;

/// Host-allocated render target for one decoration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketHandle(pub u64);

/// Snapshot of one editor, borrowed from the host for the duration of a call.
#[derive(Debug, Clone, Copy)]
pub struct EditorView<'a> {
	pub document: DocumentId,
	pub language: &'a str,
	pub text: &'a str,
	/// Byte offset of the primary cursor.
	pub cursor: usize,
	/// Visible byte ranges, in document order.
	pub visible: &'a [Range<usize>],
	pub tab_size: usize,
	/// Panels are editors outside the main editor columns.
	pub is_panel: bool,
}

pub trait EditorHost {
	fn visible_editors(&self) -> Vec<EditorId>;

	fn active_editor(&self) -> Option<EditorId>;

	/// `None` once the editor is gone.
	fn view(&self, editor: EditorId) -> Option<EditorView<'_>>;
}

/// Receiver of render instructions.
pub trait RenderSink {
	fn create_bucket(&mut self, style: &BucketStyle) -> BucketHandle;

	/// Replaces every range of `bucket` in `editor`; an empty slice clears it.
	fn apply(&mut self, editor: EditorId, bucket: BucketHandle, ranges: &[Range<usize>]);

	fn dispose(&mut self, bucket: BucketHandle);

	/// Raised at most once per document when it exceeds the size limit.
	///
	/// A host that offers "decorate anyway" answers with
	/// [`EngineContext::request_recompute`](crate::EngineContext::request_recompute).
	fn advise_over_limit(&mut self, _document: DocumentId, _len: usize, _limit: usize) {}
}

/// Host collaborators for one engine call.
pub struct HostIo<'a> {
	pub host: &'a dyn EditorHost,
	pub sink: &'a mut dyn RenderSink,
	pub timer: &'a mut dyn Timer,
}

impl<'a> HostIo<'a> {
	pub fn new(host: &'a dyn EditorHost, sink: &'a mut dyn RenderSink, timer: &'a mut dyn Timer) -> Self {
		Self { host, sink, timer }
	}
}
