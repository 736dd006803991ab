//! One-to-many notification with FIFO waiters.

use core::pin::Pin;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use ravel::{Awaiter, Callback, Context, EventLoop, Outcome, Step, StopCallback, Task, Work};

#[derive(Default)]
struct EventInner {
	next_key: Cell<u64>,
	waiters: RefCell<BTreeMap<u64, Waiter>>,
}

struct Waiter {
	notified: Rc<Cell<bool>>,
	wake: Callback,
	event_loop: EventLoop,
}

/// A one-to-many notification primitive.
///
/// Waiters queue in FIFO order; [`Event::notify_one`] wakes the
/// longest-waiting one. The handle is cheap to clone; all clones address
/// the same waiter list, which is what lets task closures capture it.
#[derive(Clone, Default)]
pub struct Event {
	inner: Rc<EventInner>,
}

impl Event {
	/// An event with no waiters.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Task completing on a notification that arrives while it waits.
	#[must_use]
	pub fn wait(&self) -> EventWait {
		EventWait {
			inner: Rc::clone(&self.inner),
		}
	}

	/// Wakes the longest-waiting waiter.
	///
	/// **Returns** whether there was one to wake.
	pub fn notify_one(&self) -> bool {
		let front = self.inner.waiters.borrow_mut().pop_first();
		match front {
			Some((_, waiter)) => {
				log::trace!("event: waking one waiter");
				waiter.notified.set(true);
				waiter.event_loop.schedule(waiter.wake.clone());
				true
			}
			None => false,
		}
	}

	/// Wakes every current waiter, in FIFO order.
	///
	/// **Returns** how many were woken.
	pub fn notify_all(&self) -> usize {
		let mut woken = 0;
		while self.notify_one() {
			woken += 1;
		}
		woken
	}
}

/// Task of [`Event::wait`].
pub struct EventWait {
	inner: Rc<EventInner>,
}

/// Work of [`Event::wait`].
pub struct EventWaitWork {
	inner: Rc<EventInner>,
}

/// Awaiter of [`Event::wait`].
pub struct EventWaitAwaiter {
	inner: Rc<EventInner>,
	state: EventWaitState,
}

enum EventWaitState {
	Idle,
	Waiting {
		key: u64,
		notified: Rc<Cell<bool>>,
		_stop: StopCallback,
	},
	Done,
}

impl Task for EventWait {
	type Output = ();
	type Work = EventWaitWork;

	fn into_work(self) -> Self::Work {
		EventWaitWork { inner: self.inner }
	}
}

impl Work for EventWaitWork {
	type Output = ();
	type Awaiter = EventWaitAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		EventWaitAwaiter {
			inner: self.inner,
			state: EventWaitState::Idle,
		}
	}
}

impl Awaiter for EventWaitAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let this = self.get_mut();
		if let EventWaitState::Idle = this.state {
			let notified = Rc::new(Cell::new(false));
			let key = this.inner.next_key.get();
			this.inner.next_key.set(key + 1);
			this.inner.waiters.borrow_mut().insert(
				key,
				Waiter {
					notified: Rc::clone(&notified),
					wake: cx.wake_callback().clone(),
					event_loop: cx.event_loop().clone(),
				},
			);
			// A cancelled waiter unlinks itself before the chain unwinds.
			let stop = StopCallback::new(cx.stop_token(), {
				let inner = Rc::clone(&this.inner);
				let event_loop = cx.event_loop().clone();
				let wake = cx.wake_callback().clone();
				Callback::new(move || {
					inner.waiters.borrow_mut().remove(&key);
					event_loop.schedule(wake.clone());
				})
			});
			this.state = EventWaitState::Waiting {
				key,
				notified,
				_stop: stop,
			};
			return Step::Pending;
		}
		let notified = match &this.state {
			EventWaitState::Waiting { notified, .. } => notified.get(),
			_ => return Step::Pending,
		};
		if notified {
			this.state = EventWaitState::Done;
			return Step::Ready(Outcome::Value(()));
		}
		if cx.stop_token().stop_requested() {
			this.state = EventWaitState::Done;
			return Step::Ready(Outcome::Stopped);
		}
		Step::Pending
	}
}

impl Drop for EventWaitAwaiter {
	fn drop(&mut self) {
		if let EventWaitState::Waiting { key, .. } = &self.state {
			self.inner.waiters.borrow_mut().remove(key);
		}
	}
}
