//! Scoped exclusive locking with FIFO hand-off.

use core::pin::Pin;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use ravel::{Awaiter, Callback, Context, EventLoop, Outcome, Step, StopCallback, Task, Work};

#[derive(Default)]
struct MutexInner {
	locked: Cell<bool>,
	next_key: Cell<u64>,
	waiters: RefCell<BTreeMap<u64, LockWaiter>>,
}

struct LockWaiter {
	granted: Rc<Cell<bool>>,
	wake: Callback,
	event_loop: EventLoop,
}

fn unlock(inner: &Rc<MutexInner>) {
	debug_assert!(inner.locked.get());
	let next = inner.waiters.borrow_mut().pop_first();
	match next {
		// The lock is handed over directly; it never reopens a race.
		Some((_, waiter)) => {
			log::trace!("mutex: handing the lock to the next waiter");
			waiter.granted.set(true);
			waiter.event_loop.schedule(waiter.wake.clone());
		}
		None => inner.locked.set(false),
	}
}

/// A non-reentrant exclusive lock for tasks.
///
/// Acquisition yields a scoped [`MutexGuard`]; dropping the guard releases
/// the lock and hands it to the longest-waiting acquirer, FIFO. The handle
/// is cheap to clone; all clones address the same lock.
#[derive(Clone, Default)]
pub struct Mutex {
	inner: Rc<MutexInner>,
}

impl Mutex {
	/// An unlocked mutex.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Task acquiring the lock: immediately when unheld, queued FIFO
	/// otherwise.
	///
	/// A token already requested at a would-be immediate acquisition fails
	/// the acquisition instead, keeping the fast path consistent with the
	/// queued one.
	#[must_use]
	pub fn lock(&self) -> Lock {
		Lock {
			inner: Rc::clone(&self.inner),
		}
	}

	/// Whether some guard currently holds the lock.
	#[must_use]
	pub fn is_locked(&self) -> bool {
		self.inner.locked.get()
	}
}

/// Scoped proof of exclusive access; dropping it releases the lock.
pub struct MutexGuard {
	inner: Rc<MutexInner>,
}

impl Drop for MutexGuard {
	fn drop(&mut self) {
		unlock(&self.inner);
	}
}

/// Task of [`Mutex::lock`].
pub struct Lock {
	inner: Rc<MutexInner>,
}

/// Work of [`Mutex::lock`].
pub struct LockWork {
	inner: Rc<MutexInner>,
}

/// Awaiter of [`Mutex::lock`].
pub struct LockAwaiter {
	inner: Rc<MutexInner>,
	state: LockState,
}

enum LockState {
	Idle,
	Waiting {
		key: u64,
		granted: Rc<Cell<bool>>,
		_stop: StopCallback,
	},
	Done,
}

impl Task for Lock {
	type Output = MutexGuard;
	type Work = LockWork;

	fn into_work(self) -> Self::Work {
		LockWork { inner: self.inner }
	}
}

impl Work for LockWork {
	type Output = MutexGuard;
	type Awaiter = LockAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		LockAwaiter {
			inner: self.inner,
			state: LockState::Idle,
		}
	}
}

impl Awaiter for LockAwaiter {
	type Output = MutexGuard;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let this = self.get_mut();
		if let LockState::Idle = this.state {
			if !this.inner.locked.get() {
				if cx.stop_token().stop_requested() {
					this.state = LockState::Done;
					return Step::Ready(Outcome::Stopped);
				}
				this.inner.locked.set(true);
				this.state = LockState::Done;
				return Step::Ready(Outcome::Value(MutexGuard {
					inner: Rc::clone(&this.inner),
				}));
			}
			let granted = Rc::new(Cell::new(false));
			let key = this.inner.next_key.get();
			this.inner.next_key.set(key + 1);
			this.inner.waiters.borrow_mut().insert(
				key,
				LockWaiter {
					granted: Rc::clone(&granted),
					wake: cx.wake_callback().clone(),
					event_loop: cx.event_loop().clone(),
				},
			);
			let stop = StopCallback::new(cx.stop_token(), {
				let inner = Rc::clone(&this.inner);
				let event_loop = cx.event_loop().clone();
				let wake = cx.wake_callback().clone();
				Callback::new(move || {
					inner.waiters.borrow_mut().remove(&key);
					event_loop.schedule(wake.clone());
				})
			});
			this.state = LockState::Waiting {
				key,
				granted,
				_stop: stop,
			};
			return Step::Pending;
		}
		let granted = match &this.state {
			LockState::Waiting { granted, .. } => granted.get(),
			_ => return Step::Pending,
		};
		if granted {
			// Hand-off: the releaser left the lock held for us.
			this.state = LockState::Done;
			return Step::Ready(Outcome::Value(MutexGuard {
				inner: Rc::clone(&this.inner),
			}));
		}
		if cx.stop_token().stop_requested() {
			this.state = LockState::Done;
			return Step::Ready(Outcome::Stopped);
		}
		Step::Pending
	}
}

impl Drop for LockAwaiter {
	fn drop(&mut self) {
		if let LockState::Waiting { key, granted, .. } = &self.state {
			self.inner.waiters.borrow_mut().remove(key);
			if granted.get() {
				// Handed over but never delivered; pass it on.
				unlock(&self.inner);
			}
		}
	}
}
