//! Timer abstraction and a polled virtual-clock implementation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::scheduler::TimerToken;

/// Delayed-callback primitive provided by the host's event loop.
///
/// When the delay elapses the host hands the token back through
/// [`EngineContext::on_timer`](crate::EngineContext::on_timer).
pub trait Timer {
	fn schedule(&mut self, delay: Duration, token: TimerToken);

	/// Best effort; a stale token that still fires is ignored by the engine.
	fn cancel(&mut self, _token: TimerToken) {}
}

/// Deadline queue driven by an explicit clock.
///
/// Hosts without their own timer facility poll it from their event loop;
/// tests use it to step time deterministically.
#[derive(Debug, Default)]
pub struct DeadlineQueue {
	now: Duration,
	seq: u64,
	heap: BinaryHeap<Reverse<(Duration, u64, TimerToken)>>,
}

impl DeadlineQueue {
	pub fn now(&self) -> Duration {
		self.now
	}

	pub fn len(&self) -> usize {
		self.heap.len()
	}

	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}

	/// Deadline of the earliest pending token.
	pub fn next_deadline(&self) -> Option<Duration> {
		self.heap.peek().map(|Reverse((at, _, _))| *at)
	}

	/// Moves the clock forward and returns the tokens that came due, earliest first.
	pub fn advance(&mut self, by: Duration) -> Vec<TimerToken> {
		self.now += by;
		let mut due = Vec::new();
		while let Some(Reverse((at, _, token))) = self.heap.peek().copied() {
			if at > self.now {
				break;
			}
			self.heap.pop();
			due.push(token);
		}
		due
	}

	/// Pops the earliest token, moving the clock to its deadline.
	pub fn pop_next(&mut self) -> Option<TimerToken> {
		let Reverse((at, _, token)) = self.heap.pop()?;
		self.now = self.now.max(at);
		Some(token)
	}
}

impl Timer for DeadlineQueue {
	fn schedule(&mut self, delay: Duration, token: TimerToken) {
		self.seq += 1;
		self.heap.push(Reverse((self.now + delay, self.seq, token)));
	}

	fn cancel(&mut self, token: TimerToken) {
		self.heap.retain(|Reverse((_, _, t))| *t != token);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ids::EditorId;
	use crate::scheduler::Scheduler;

	#[test]
	fn tokens_come_due_in_deadline_order() {
		let mut sched = Scheduler::default();
		let mut queue = DeadlineQueue::default();
		let (slow, _) = sched.request(EditorId(1));
		let (fast, _) = sched.request(EditorId(2));
		queue.schedule(Duration::from_millis(50), slow);
		queue.schedule(Duration::from_millis(10), fast);

		assert_eq!(queue.next_deadline(), Some(Duration::from_millis(10)));
		assert!(queue.advance(Duration::from_millis(5)).is_empty());
		assert_eq!(queue.advance(Duration::from_millis(5)), vec![fast]);
		assert_eq!(queue.pop_next(), Some(slow));
		assert_eq!(queue.now(), Duration::from_millis(50));
		assert!(queue.is_empty());
	}

	#[test]
	fn cancel_removes_token() {
		let mut sched = Scheduler::default();
		let mut queue = DeadlineQueue::default();
		let (token, _) = sched.request(EditorId(1));
		queue.schedule(Duration::from_millis(1), token);
		queue.cancel(token);
		assert_eq!(queue.len(), 0);
	}
}
