//! Bucket table and minimal render updates.
//!
//! Buckets are shared by all editors and keyed by descriptor. Each pass
//! resets every bucket's staged ranges, stages the planned entries, then
//! pushes either every bucket the editor shows or plans (full pass) or only
//! the buckets the plan touched (incremental pass). Buckets absent from an
//! incremental plan keep whatever the editor already shows; the planners emit
//! explicit clears for buckets that must empty.
//!
//! A bucket lives while at least one editor shows a range from it. Once the
//! last editor empties or forgets it, the handle is disposed.

use std::ops::Range;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::trace;

use crate::decoration::{DecorationDescriptor, DecorationEntry, EntrySpan};
use crate::host::{BucketHandle, RenderSink};
use crate::ids::EditorId;

#[derive(Debug)]
struct Bucket {
	handle: BucketHandle,
	ranges: Vec<Range<usize>>,
	touched: bool,
	/// Editors currently showing at least one range of this bucket.
	users: FxHashSet<EditorId>,
}

impl Bucket {
	/// Whether a pass for `editor` has anything to push to this bucket.
	fn pending(&self, editor: EditorId, full: bool) -> bool {
		(full || self.touched) && (self.users.contains(&editor) || !self.ranges.is_empty())
	}
}

#[derive(Debug, Default)]
pub struct RenderBucketTable {
	buckets: IndexMap<DecorationDescriptor, Bucket, FxBuildHasher>,
}

impl RenderBucketTable {
	pub fn len(&self) -> usize {
		self.buckets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}

	/// Whether `editor` may still show ranges from an earlier push.
	pub fn is_decorated(&self, editor: EditorId) -> bool {
		self.buckets.values().any(|b| b.users.contains(&editor))
	}

	pub fn handle(&self, descriptor: &DecorationDescriptor) -> Option<BucketHandle> {
		self.buckets.get(descriptor).map(|b| b.handle)
	}

	fn reset(&mut self) {
		for bucket in self.buckets.values_mut() {
			bucket.ranges.clear();
			bucket.touched = false;
		}
	}

	/// Stages `entries` and pushes them to `editor`. Returns the number of `apply` calls.
	pub fn render(
		&mut self,
		editor: EditorId,
		entries: Vec<DecorationEntry>,
		full: bool,
		sink: &mut dyn RenderSink,
	) -> usize {
		self.reset();
		for DecorationEntry { descriptor, span } in entries {
			match span {
				EntrySpan::Range(range) => {
					let bucket = self.buckets.entry(descriptor).or_insert_with_key(|descriptor| Bucket {
						handle: sink.create_bucket(&descriptor.style()),
						ranges: Vec::new(),
						touched: false,
						users: FxHashSet::default(),
					});
					bucket.touched = true;
					bucket.ranges.push(range);
				}
				// A clear for a bucket nobody holds has nothing to empty.
				EntrySpan::Clear => {
					if let Some(bucket) = self.buckets.get_mut(&descriptor) {
						bucket.touched = true;
					}
				}
			}
		}

		let mut applied = 0;
		for bucket in self.buckets.values_mut().filter(|b| b.pending(editor, full)) {
			sink.apply(editor, bucket.handle, &bucket.ranges);
			if bucket.ranges.is_empty() {
				bucket.users.remove(&editor);
			} else {
				bucket.users.insert(editor);
			}
			applied += 1;
		}
		let disposed = self.release_unused(sink);
		trace!(editor = ?editor, applied, disposed, full, "buckets pushed");
		applied
	}

	/// Empties every bucket `editor` shows. Returns the number of `apply` calls.
	pub fn clear_editor(&mut self, editor: EditorId, sink: &mut dyn RenderSink) -> usize {
		self.reset();
		let mut applied = 0;
		for bucket in self.buckets.values_mut() {
			if bucket.users.remove(&editor) {
				sink.apply(editor, bucket.handle, &[]);
				applied += 1;
			}
		}
		self.release_unused(sink);
		applied
	}

	/// Forgets a closed editor without pushing anything, disposing the buckets only it held.
	pub fn forget_editor(&mut self, editor: EditorId, sink: &mut dyn RenderSink) {
		for bucket in self.buckets.values_mut() {
			bucket.users.remove(&editor);
		}
		let disposed = self.release_unused(sink);
		trace!(editor = ?editor, disposed, "buckets forgotten");
	}

	/// Disposes every bucket, e.g. after a configuration change.
	pub fn dispose_all(&mut self, sink: &mut dyn RenderSink) {
		for (_, bucket) in self.buckets.drain(..) {
			sink.dispose(bucket.handle);
		}
	}

	fn release_unused(&mut self, sink: &mut dyn RenderSink) -> usize {
		let before = self.buckets.len();
		self.buckets.retain(|_, bucket| {
			if bucket.users.is_empty() {
				sink.dispose(bucket.handle);
				false
			} else {
				true
			}
		});
		before - self.buckets.len()
	}
}
