//! The do-nothing task.

use core::pin::Pin;

use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

/// Completes immediately with `()`, or stopped if cancellation was
/// already requested on entry.
#[must_use]
pub fn noop() -> Noop {
	Noop(())
}

/// Task of [`noop`].
pub struct Noop(());

/// Work of [`noop`].
pub struct NoopWork(());

/// Awaiter of [`noop`].
pub struct NoopAwaiter(());

impl Task for Noop {
	type Output = ();
	type Work = NoopWork;

	fn into_work(self) -> Self::Work {
		NoopWork(())
	}
}

impl Work for NoopWork {
	type Output = ();
	type Awaiter = NoopAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		NoopAwaiter(())
	}
}

impl Awaiter for NoopAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		if cx.stop_token().stop_requested() {
			Step::Ready(Outcome::Stopped)
		} else {
			Step::Ready(Outcome::Value(()))
		}
	}
}
