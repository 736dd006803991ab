//! One armed timer entry with stop-linked removal, shared by the
//! time-driven awaiters.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use ravel::{Callback, Context, EventLoop, StopCallback, StopToken, TimerKey};

/// Lifecycle of one timer entry owned by an awaiter.
///
/// While armed, the entry's expiry sets a shared flag and wakes the chain
/// inline (the loop's timer dispatch is the one place synchronous wake-ups
/// are legal); a request on the linked token removes the entry and
/// schedules a wake-up instead. Dropping an armed value removes the entry.
pub(crate) enum DeadlineTimer {
	Idle,
	Armed {
		key: TimerKey,
		fired: Rc<Cell<bool>>,
		event_loop: EventLoop,
		_stop: StopCallback,
	},
	Done,
}

impl DeadlineTimer {
	pub(crate) fn new() -> Self {
		Self::Idle
	}

	pub(crate) fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}

	pub(crate) fn is_pending(&self) -> bool {
		matches!(self, Self::Armed { .. })
	}

	/// Inserts the entry and links its removal to `token`.
	pub(crate) fn arm(&mut self, cx: &Context<'_>, token: &StopToken, deadline: Instant) {
		debug_assert!(self.is_idle());
		let fired = Rc::new(Cell::new(false));
		let wake = cx.wake_callback().clone();
		let expiry = Callback::new({
			let fired = Rc::clone(&fired);
			move || {
				fired.set(true);
				wake.invoke();
			}
		});
		let event_loop = cx.event_loop().clone();
		let key = event_loop.insert_timer(deadline, expiry);
		let stop = StopCallback::new(token, {
			let event_loop = event_loop.clone();
			let wake = cx.wake_callback().clone();
			Callback::new(move || {
				event_loop.cancel_timer(key);
				event_loop.schedule(wake.clone());
			})
		});
		*self = Self::Armed {
			key,
			fired,
			event_loop,
			_stop: stop,
		};
	}

	/// Settles an armed entry.
	///
	/// **Returns** `true` exactly on the call that observes the expiry;
	/// a `cancelled` entry settles without firing.
	pub(crate) fn settle(&mut self, cancelled: bool) -> bool {
		let settled = match self {
			Self::Armed { fired, .. } => {
				if fired.get() {
					Some(true)
				} else if cancelled {
					Some(false)
				} else {
					None
				}
			}
			_ => None,
		};
		match settled {
			Some(expired) => {
				*self = Self::Done;
				expired
			}
			None => false,
		}
	}
}

impl Drop for DeadlineTimer {
	fn drop(&mut self) {
		if let Self::Armed {
			key, event_loop, ..
		} = self
		{
			// No-op if the entry already expired or was removed.
			event_loop.cancel_timer(*key);
		}
	}
}
