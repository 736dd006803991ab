//! Time-driven leaves: [`sleep_for`] and [`suspend_forever`].

use core::pin::Pin;
use std::time::{Duration, Instant};

use ravel::{Awaiter, Callback, Context, Outcome, Step, StopCallback, Task, Work};

use crate::deadline::DeadlineTimer;

/// Completes once `duration` has passed.
///
/// The absolute deadline is computed here, when the task value is created.
/// A zero duration is legal and still goes through the timer queue, so it
/// completes after any already-ready callbacks.
#[must_use]
pub fn sleep_for(duration: Duration) -> Sleep {
	Sleep {
		deadline: Instant::now() + duration,
	}
}

/// Never completes on its own; only cancellation ends it.
#[must_use]
pub fn suspend_forever() -> SuspendForever {
	SuspendForever(())
}

/// Task of [`sleep_for`].
pub struct Sleep {
	deadline: Instant,
}

/// Work of [`sleep_for`].
pub struct SleepWork {
	deadline: Instant,
}

/// Awaiter of [`sleep_for`].
pub struct SleepAwaiter {
	deadline: Instant,
	timer: DeadlineTimer,
}

impl Task for Sleep {
	type Output = ();
	type Work = SleepWork;

	fn into_work(self) -> Self::Work {
		SleepWork {
			deadline: self.deadline,
		}
	}
}

impl Work for SleepWork {
	type Output = ();
	type Awaiter = SleepAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		SleepAwaiter {
			deadline: self.deadline,
			timer: DeadlineTimer::new(),
		}
	}
}

impl Awaiter for SleepAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let this = self.get_mut();
		if this.timer.is_idle() {
			this.timer.arm(cx, cx.stop_token(), this.deadline);
			return Step::Pending;
		}
		if this.timer.settle(cx.stop_token().stop_requested()) {
			return Step::Ready(Outcome::Value(()));
		}
		if this.timer.is_pending() {
			// Spurious wake-up.
			return Step::Pending;
		}
		Step::Ready(Outcome::Stopped)
	}
}

/// Task of [`suspend_forever`].
pub struct SuspendForever(());

/// Work of [`suspend_forever`].
pub struct SuspendForeverWork(());

/// Awaiter of [`suspend_forever`].
pub struct SuspendForeverAwaiter {
	cancel: Option<StopCallback>,
	entered: bool,
}

impl Task for SuspendForever {
	type Output = ();
	type Work = SuspendForeverWork;

	fn into_work(self) -> Self::Work {
		SuspendForeverWork(())
	}
}

impl Work for SuspendForeverWork {
	type Output = ();
	type Awaiter = SuspendForeverAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		SuspendForeverAwaiter {
			cancel: None,
			entered: false,
		}
	}
}

impl Awaiter for SuspendForeverAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let this = self.get_mut();
		if !this.entered {
			this.entered = true;
			let event_loop = cx.event_loop().clone();
			let wake = cx.wake_callback().clone();
			this.cancel = Some(StopCallback::new(
				cx.stop_token(),
				Callback::new(move || event_loop.schedule(wake.clone())),
			));
			return Step::Pending;
		}
		if cx.stop_token().stop_requested() {
			this.cancel = None;
			return Step::Ready(Outcome::Stopped);
		}
		Step::Pending
	}
}
