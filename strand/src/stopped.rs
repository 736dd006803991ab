//! Reify a child's cancellation into a value.

use core::pin::Pin;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

/// Runs `task` under the caller's token; a child cancellation *not
/// requested by the caller* becomes the value [`None`], while
/// caller-requested cancellation still propagates as stopped.
///
/// This is the canonical way to turn the stopped channel into data.
#[must_use]
pub fn stopped_as_optional<T: Task>(task: T) -> StoppedAsOptional<T> {
	StoppedAsOptional { task }
}

/// Task of [`stopped_as_optional`].
pub struct StoppedAsOptional<T> {
	task: T,
}

/// Work of [`stopped_as_optional`].
pub struct StoppedAsOptionalWork<W> {
	work: W,
}

/// Awaiter of [`stopped_as_optional`].
#[pin_project]
pub struct StoppedAsOptionalAwaiter<A> {
	#[pin]
	child: A,
}

impl<T: Task> Task for StoppedAsOptional<T> {
	type Output = Option<T::Output>;
	type Work = StoppedAsOptionalWork<T::Work>;

	fn into_work(self) -> Self::Work {
		StoppedAsOptionalWork {
			work: self.task.into_work(),
		}
	}
}

impl<W: Work> Work for StoppedAsOptionalWork<W> {
	type Output = Option<W::Output>;
	type Awaiter = StoppedAsOptionalAwaiter<W::Awaiter>;

	fn into_awaiter(self) -> Self::Awaiter {
		StoppedAsOptionalAwaiter {
			child: self.work.into_awaiter(),
		}
	}
}

impl<A: Awaiter> Awaiter for StoppedAsOptionalAwaiter<A> {
	type Output = Option<A::Output>;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		match self.project().child.poll(cx) {
			Step::Pending => Step::Pending,
			Step::Ready(Outcome::Value(value)) => Step::Ready(Outcome::Value(Some(value))),
			Step::Ready(Outcome::Panicked(payload)) => Step::Ready(Outcome::Panicked(payload)),
			Step::Ready(Outcome::Stopped) => {
				if cx.stop_token().stop_requested() {
					Step::Ready(Outcome::Stopped)
				} else {
					Step::Ready(Outcome::Value(None))
				}
			}
		}
	}
}
