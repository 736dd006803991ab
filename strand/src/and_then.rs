//! Sequence two tasks, feeding the first value into the builder of the
//! second.

use core::pin::Pin;
use std::panic::{catch_unwind, AssertUnwindSafe};

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

/// Runs `task`; on its value, builds the follow-up task with `f` and runs
/// that too. The combinator's value is the follow-up's value.
///
/// This is the sequencing primitive: whatever `f` captures (a lock guard,
/// a connection) stays alive across the follow-up's suspension points.
/// Both stages run under the caller's stop token; a stopped stage
/// propagates, and a panic in `f` becomes the combinator's panic outcome.
#[must_use]
pub fn and_then<T, F, T2>(task: T, f: F) -> AndThen<T, F>
where
	T: Task,
	F: FnOnce(T::Output) -> T2,
	T2: Task,
{
	AndThen { task, f }
}

/// Task of [`and_then`].
pub struct AndThen<T, F> {
	task: T,
	f: F,
}

/// Work of [`and_then`].
pub struct AndThenWork<W, F> {
	work: W,
	f: F,
}

/// Awaiter of [`and_then`].
#[pin_project]
pub struct AndThenAwaiter<A, F, T2: Task> {
	#[pin]
	first: A,
	f: Option<F>,
	#[pin]
	second: Option<<T2::Work as Work>::Awaiter>,
}

impl<T, F, T2> Task for AndThen<T, F>
where
	T: Task,
	F: FnOnce(T::Output) -> T2,
	T2: Task,
{
	type Output = T2::Output;
	type Work = AndThenWork<T::Work, F>;

	fn into_work(self) -> Self::Work {
		AndThenWork {
			work: self.task.into_work(),
			f: self.f,
		}
	}
}

impl<W, F, T2> Work for AndThenWork<W, F>
where
	W: Work,
	F: FnOnce(W::Output) -> T2,
	T2: Task,
{
	type Output = T2::Output;
	type Awaiter = AndThenAwaiter<W::Awaiter, F, T2>;

	fn into_awaiter(self) -> Self::Awaiter {
		AndThenAwaiter {
			first: self.work.into_awaiter(),
			f: Some(self.f),
			second: None,
		}
	}
}

impl<A, F, T2> Awaiter for AndThenAwaiter<A, F, T2>
where
	A: Awaiter,
	F: FnOnce(A::Output) -> T2,
	T2: Task,
{
	type Output = T2::Output;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let mut this = self.project();
		if this.second.is_none() {
			match this.first.poll(cx) {
				Step::Pending => return Step::Pending,
				Step::Ready(Outcome::Stopped) => return Step::Ready(Outcome::Stopped),
				Step::Ready(Outcome::Panicked(payload)) => {
					return Step::Ready(Outcome::Panicked(payload));
				}
				Step::Ready(Outcome::Value(value)) => {
					let f = this.f.take().expect("task polled after completion");
					match catch_unwind(AssertUnwindSafe(move || f(value))) {
						Ok(follow_up) => {
							this.second
								.as_mut()
								.set(Some(follow_up.into_work().into_awaiter()));
						}
						Err(payload) => return Step::Ready(Outcome::Panicked(payload)),
					}
				}
			}
		}
		// The follow-up may well complete during the poll that installed it.
		let second = this
			.second
			.as_pin_mut()
			.expect("follow-up awaiter just installed");
		second.poll(cx)
	}
}
