//! Map a task's value through a closure.

use core::pin::Pin;
use std::panic::{catch_unwind, AssertUnwindSafe};

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

/// Runs `task`, then applies `f` to its value.
///
/// The child inherits the caller's stop token. A panic in `f` becomes the
/// combinator's panic outcome; a stopped child propagates without calling
/// `f` at all.
#[must_use]
pub fn then<T, F, U>(task: T, f: F) -> Then<T, F>
where
	T: Task,
	F: FnOnce(T::Output) -> U,
{
	Then { task, f }
}

/// Task of [`then`].
pub struct Then<T, F> {
	task: T,
	f: F,
}

/// Work of [`then`].
pub struct ThenWork<W, F> {
	work: W,
	f: F,
}

/// Awaiter of [`then`].
#[pin_project]
pub struct ThenAwaiter<A, F> {
	#[pin]
	child: A,
	f: Option<F>,
}

impl<T, F, U> Task for Then<T, F>
where
	T: Task,
	F: FnOnce(T::Output) -> U,
{
	type Output = U;
	type Work = ThenWork<T::Work, F>;

	fn into_work(self) -> Self::Work {
		ThenWork {
			work: self.task.into_work(),
			f: self.f,
		}
	}
}

impl<W, F, U> Work for ThenWork<W, F>
where
	W: Work,
	F: FnOnce(W::Output) -> U,
{
	type Output = U;
	type Awaiter = ThenAwaiter<W::Awaiter, F>;

	fn into_awaiter(self) -> Self::Awaiter {
		ThenAwaiter {
			child: self.work.into_awaiter(),
			f: Some(self.f),
		}
	}
}

impl<A, F, U> Awaiter for ThenAwaiter<A, F>
where
	A: Awaiter,
	F: FnOnce(A::Output) -> U,
{
	type Output = U;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let this = self.project();
		match this.child.poll(cx) {
			Step::Pending => Step::Pending,
			Step::Ready(Outcome::Stopped) => Step::Ready(Outcome::Stopped),
			Step::Ready(Outcome::Panicked(payload)) => Step::Ready(Outcome::Panicked(payload)),
			Step::Ready(Outcome::Value(value)) => {
				let f = this.f.take().expect("task polled after completion");
				match catch_unwind(AssertUnwindSafe(move || f(value))) {
					Ok(mapped) => Step::Ready(Outcome::Value(mapped)),
					Err(payload) => Step::Ready(Outcome::Panicked(payload)),
				}
			}
		}
	}
}
