//! Give the rest of the loop one turn.

use core::pin::Pin;

use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

/// Suspends for exactly one loop turn, behind everything already queued.
///
/// Checks the token on entry only: once the wake-up is queued the value is
/// delivered even if stop is requested meanwhile.
#[must_use]
pub fn yield_now() -> YieldNow {
	YieldNow(())
}

/// Task of [`yield_now`].
pub struct YieldNow(());

/// Work of [`yield_now`].
pub struct YieldNowWork(());

/// Awaiter of [`yield_now`].
pub struct YieldNowAwaiter {
	yielded: bool,
}

impl Task for YieldNow {
	type Output = ();
	type Work = YieldNowWork;

	fn into_work(self) -> Self::Work {
		YieldNowWork(())
	}
}

impl Work for YieldNowWork {
	type Output = ();
	type Awaiter = YieldNowAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		YieldNowAwaiter { yielded: false }
	}
}

impl Awaiter for YieldNowAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let this = self.get_mut();
		if this.yielded {
			return Step::Ready(Outcome::Value(()));
		}
		if cx.stop_token().stop_requested() {
			return Step::Ready(Outcome::Stopped);
		}
		this.yielded = true;
		cx.schedule_wake();
		Step::Pending
	}
}
