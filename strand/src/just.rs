//! Immediate-result tasks: a value, a panic, or cancellation.

use core::pin::Pin;
use std::any::Any;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, PanicPayload, Step, Task, Work};
use tap::Pipe;

/// Delivers `value` immediately, or stopped if cancellation was already
/// requested on entry.
#[must_use]
pub fn just<T>(value: T) -> Just<T> {
	Just { value }
}

/// Delivers `payload` on the panic channel immediately, or stopped if
/// cancellation was already requested on entry.
///
/// The payload surfaces as a resumed panic where the result is consumed,
/// exactly as if the task had panicked while running.
#[must_use]
pub fn just_panic<P: Any + Send>(payload: P) -> JustPanic {
	JustPanic {
		payload: Box::new(payload),
	}
}

/// Delivers cancellation unconditionally.
#[must_use]
pub fn just_stopped() -> JustStopped {
	JustStopped(())
}

/// Task of [`just`].
pub struct Just<T> {
	value: T,
}

/// Work of [`just`].
pub struct JustWork<T> {
	value: T,
}

/// Awaiter of [`just`].
#[pin_project]
pub struct JustAwaiter<T> {
	value: Option<T>,
}

impl<T> Task for Just<T> {
	type Output = T;
	type Work = JustWork<T>;

	fn into_work(self) -> Self::Work {
		JustWork { value: self.value }
	}
}

impl<T> Work for JustWork<T> {
	type Output = T;
	type Awaiter = JustAwaiter<T>;

	fn into_awaiter(self) -> Self::Awaiter {
		JustAwaiter {
			value: Some(self.value),
		}
	}
}

impl<T> Awaiter for JustAwaiter<T> {
	type Output = T;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		if cx.stop_token().stop_requested() {
			return Step::Ready(Outcome::Stopped);
		}
		self.project()
			.value
			.take()
			.expect("immediate task polled after completion")
			.pipe(Outcome::Value)
			.pipe(Step::Ready)
	}
}

/// Task of [`just_panic`].
pub struct JustPanic {
	payload: PanicPayload,
}

/// Work of [`just_panic`].
pub struct JustPanicWork {
	payload: PanicPayload,
}

/// Awaiter of [`just_panic`].
pub struct JustPanicAwaiter {
	payload: Option<PanicPayload>,
}

impl Task for JustPanic {
	type Output = ();
	type Work = JustPanicWork;

	fn into_work(self) -> Self::Work {
		JustPanicWork {
			payload: self.payload,
		}
	}
}

impl Work for JustPanicWork {
	type Output = ();
	type Awaiter = JustPanicAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		JustPanicAwaiter {
			payload: Some(self.payload),
		}
	}
}

impl Awaiter for JustPanicAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		if cx.stop_token().stop_requested() {
			return Step::Ready(Outcome::Stopped);
		}
		let payload = self
			.get_mut()
			.payload
			.take()
			.expect("immediate task polled after completion");
		Step::Ready(Outcome::Panicked(payload))
	}
}

/// Task of [`just_stopped`].
pub struct JustStopped(());

/// Work of [`just_stopped`].
pub struct JustStoppedWork(());

/// Awaiter of [`just_stopped`].
pub struct JustStoppedAwaiter(());

impl Task for JustStopped {
	type Output = ();
	type Work = JustStoppedWork;

	fn into_work(self) -> Self::Work {
		JustStoppedWork(())
	}
}

impl Work for JustStoppedWork {
	type Output = ();
	type Awaiter = JustStoppedAwaiter;

	fn into_awaiter(self) -> Self::Awaiter {
		JustStoppedAwaiter(())
	}
}

impl Awaiter for JustStoppedAwaiter {
	type Output = ();

	fn poll(self: Pin<&mut Self>, _cx: &Context<'_>) -> Step<Self::Output> {
		Step::Ready(Outcome::Stopped)
	}
}
