//! Per-editor debounce bookkeeping.
//!
//! Every request bumps a monotonically increasing stamp and arms a timer
//! carrying it. Only the timer holding an editor's latest stamp may run a
//! pass; older ones fire as no-ops. A pass that is already running is never
//! interrupted.

use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::config::Options;
use crate::ids::EditorId;

/// Document size at which the delay stops growing linearly with length.
pub const SIZE_UNIT: usize = 16 * 1024;

/// Monotonic request counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestStamp(u64);

impl RequestStamp {
	fn next(self) -> Self {
		Self(self.0.wrapping_add(1))
	}
}

/// Payload of an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken {
	pub editor: EditorId,
	pub stamp: RequestStamp,
}

/// Debounce delay for a document of `len` bytes.
///
/// Clip mode uses the fixed `clip_delay`. Otherwise the base delay is scaled
/// by `sqrt(max(len, SIZE_UNIT) / SIZE_UNIT)`, and a document with no cached
/// indent model pays `additional_delay` on top.
pub fn delay_for(options: &Options, len: usize, clip: bool, cached: bool) -> Duration {
	if clip {
		return options.clip_delay;
	}
	let factor = (len.max(SIZE_UNIT) as f64 / SIZE_UNIT as f64).sqrt();
	let additional = if cached { Duration::ZERO } else { options.additional_delay };
	options.basic_delay.mul_f64(factor) + additional
}

#[derive(Debug, Default)]
pub struct Scheduler {
	last: RequestStamp,
	pending: FxHashMap<EditorId, RequestStamp>,
}

impl Scheduler {
	/// Issues a new token for `editor`, returning it with the token it supersedes.
	pub fn request(&mut self, editor: EditorId) -> (TimerToken, Option<TimerToken>) {
		self.last = self.last.next();
		let superseded = self
			.pending
			.insert(editor, self.last)
			.map(|stamp| TimerToken { editor, stamp });
		(TimerToken { editor, stamp: self.last }, superseded)
	}

	/// Consumes `token`. Returns `false` for a stale or unknown token.
	pub fn fire(&mut self, token: TimerToken) -> bool {
		match self.pending.get(&token.editor) {
			Some(&stamp) if stamp == token.stamp => {
				self.pending.remove(&token.editor);
				true
			}
			_ => false,
		}
	}

	pub fn is_scheduled(&self, editor: EditorId) -> bool {
		self.pending.contains_key(&editor)
	}

	/// Drops the pending request of a closed editor.
	pub fn forget(&mut self, editor: EditorId) -> Option<TimerToken> {
		self.pending
			.remove(&editor)
			.map(|stamp| TimerToken { editor, stamp })
	}
}
