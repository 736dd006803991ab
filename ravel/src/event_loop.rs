//! The event loop: one ready queue, one timer queue, one thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use scopeguard::guard;

use crate::callback::Callback;
use crate::ready_queue::ReadyQueue;
use crate::timer_queue::{TimerKey, TimerQueue};

struct LoopInner {
	ready: RefCell<ReadyQueue>,
	timers: RefCell<TimerQueue>,
}

/// Handle to one event loop.
///
/// The handle is cheap to clone; all clones address the same loop. The loop
/// is *driven* from exactly one place (the runner's turn/sleep cycle), while
/// task code reaches it through [`Context`](`crate::context::Context`) to
/// schedule wake-ups and timers.
///
/// # Logic
///
/// Task-initiated wake-ups **must** go through [`EventLoop::schedule`];
/// only the loop itself (queue drain, timer expiry) invokes callbacks
/// synchronously. This is what keeps awaiter polls from nesting.
#[derive(Clone)]
pub struct EventLoop {
	inner: Rc<LoopInner>,
}

impl Default for EventLoop {
	fn default() -> Self {
		Self::new()
	}
}

impl EventLoop {
	/// A fresh loop with empty queues.
	#[must_use]
	pub fn new() -> Self {
		Self {
			inner: Rc::new(LoopInner {
				ready: RefCell::new(ReadyQueue::new()),
				timers: RefCell::new(TimerQueue::new()),
			}),
		}
	}

	/// Queues `callback` to run on the next turn, after everything already
	/// queued.
	pub fn schedule(&self, callback: Callback) {
		self.inner.ready.borrow_mut().push(callback);
	}

	/// Queues `callback` to run once `deadline` has passed.
	///
	/// The key names the entry for [`EventLoop::cancel_timer`].
	pub fn insert_timer(&self, deadline: Instant, callback: Callback) -> TimerKey {
		self.inner.timers.borrow_mut().insert(deadline, callback)
	}

	/// Removes a queued timer entry; `false` if it already expired or was
	/// cancelled before.
	pub fn cancel_timer(&self, key: TimerKey) -> bool {
		self.inner.timers.borrow_mut().remove(key)
	}

	/// One turn of the loop.
	///
	/// 1. Takes the ready queue and drains it FIFO. Work queued during the
	///    drain runs next turn.
	/// 2. Pops and invokes expired timers (one `now` sample per turn), but
	///    only while the ready queue stays empty: fresh ready work preempts
	///    further timer dispatch.
	/// 3. **Returns** how long the caller may sleep until the next deadline,
	///    or [`None`] when there is nothing to sleep for (more ready work,
	///    or no timers at all).
	pub fn turn(&self) -> Option<Duration> {
		let drained = self.inner.ready.borrow_mut().take();
		if !drained.is_empty() {
			log::trace!("turn: draining {} ready callback(s)", drained.len());
		}
		// A callback that unwinds must not drop the work queued behind it.
		let mut drained = guard(drained, |rest| {
			if !rest.is_empty() {
				self.inner.ready.borrow_mut().requeue_front(rest);
			}
		});
		while let Some(callback) = drained.pop_front() {
			callback.invoke();
		}
		drop(drained);

		if self.inner.timers.borrow().is_empty() {
			return None;
		}
		let now = Instant::now();
		loop {
			let expired = self.inner.timers.borrow_mut().pop_expired(now);
			match expired {
				Some(callback) => {
					log::trace!("turn: timer expired");
					callback.invoke();
					if !self.inner.ready.borrow().is_empty() {
						return None;
					}
				}
				None => {
					let deadline = self.inner.timers.borrow().next_deadline()?;
					if self.inner.ready.borrow().is_empty() {
						return Some(deadline.duration_since(now));
					}
					return None;
				}
			}
		}
	}
}
