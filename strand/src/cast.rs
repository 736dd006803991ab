//! Convert a task's value into another type.

use core::marker::PhantomData;
use core::pin::Pin;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

/// Runs `task` and converts its value into `U`.
///
/// Chains exactly like [`then`](`crate::then`) with the conversion as the
/// mapping; its main use is homogenising the arms of
/// [`wait_any`](`crate::wait_any`).
#[must_use]
pub fn cast_result<U, T>(task: T) -> CastResult<U, T>
where
	T: Task,
	T::Output: Into<U>,
{
	CastResult {
		task,
		_cast: PhantomData,
	}
}

/// Task of [`cast_result`].
pub struct CastResult<U, T> {
	task: T,
	_cast: PhantomData<fn() -> U>,
}

/// Work of [`cast_result`].
pub struct CastResultWork<U, W> {
	work: W,
	_cast: PhantomData<fn() -> U>,
}

/// Awaiter of [`cast_result`].
#[pin_project]
pub struct CastResultAwaiter<U, A> {
	#[pin]
	child: A,
	_cast: PhantomData<fn() -> U>,
}

impl<U, T> Task for CastResult<U, T>
where
	T: Task,
	T::Output: Into<U>,
{
	type Output = U;
	type Work = CastResultWork<U, T::Work>;

	fn into_work(self) -> Self::Work {
		CastResultWork {
			work: self.task.into_work(),
			_cast: PhantomData,
		}
	}
}

impl<U, W> Work for CastResultWork<U, W>
where
	W: Work,
	W::Output: Into<U>,
{
	type Output = U;
	type Awaiter = CastResultAwaiter<U, W::Awaiter>;

	fn into_awaiter(self) -> Self::Awaiter {
		CastResultAwaiter {
			child: self.work.into_awaiter(),
			_cast: PhantomData,
		}
	}
}

impl<U, A> Awaiter for CastResultAwaiter<U, A>
where
	A: Awaiter,
	A::Output: Into<U>,
{
	type Output = U;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		match self.project().child.poll(cx) {
			Step::Pending => Step::Pending,
			Step::Ready(Outcome::Stopped) => Step::Ready(Outcome::Stopped),
			Step::Ready(Outcome::Panicked(payload)) => Step::Ready(Outcome::Panicked(payload)),
			Step::Ready(Outcome::Value(value)) => Step::Ready(Outcome::Value(value.into())),
		}
	}
}
