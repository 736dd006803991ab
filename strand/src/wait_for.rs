//! Bound a task's completion by a timeout.

use core::mem;
use core::pin::Pin;
use std::time::{Duration, Instant};

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

use crate::arm::{Arm, ScopeCore};
use crate::deadline::DeadlineTimer;

/// Runs `task` against a timer.
///
/// If the task finishes first its value is delivered and the timer is
/// cancelled. If the timer fires first the task is asked to stop through
/// the combinator's internal source and the result is [`None`] once it has
/// unwound, unless the task still manages to deliver a result before
/// unwinding, in which case the result wins. Cancellation from the caller
/// is forwarded to the internal source and surfaces as stopped.
///
/// The absolute deadline is computed here, when the task value is created.
#[must_use]
pub fn wait_for<T: Task>(task: T, timeout: Duration) -> WaitFor<T> {
	WaitFor {
		task,
		deadline: Instant::now() + timeout,
	}
}

/// Task of [`wait_for`].
pub struct WaitFor<T> {
	task: T,
	deadline: Instant,
}

/// Work of [`wait_for`].
pub struct WaitForWork<W> {
	work: W,
	deadline: Instant,
}

/// Awaiter of [`wait_for`].
#[pin_project]
pub struct WaitForAwaiter<A: Awaiter> {
	core: ScopeCore,
	deadline: Instant,
	state: WaitForState<A::Output>,
	timer: DeadlineTimer,
	#[pin]
	arm: Arm<A>,
}

enum WaitForState<T> {
	Running,
	TimedOut,
	Finished(Outcome<T>),
	Unwound,
}

impl<T: Task> Task for WaitFor<T> {
	type Output = Option<T::Output>;
	type Work = WaitForWork<T::Work>;

	fn into_work(self) -> Self::Work {
		WaitForWork {
			work: self.task.into_work(),
			deadline: self.deadline,
		}
	}
}

impl<W: Work> Work for WaitForWork<W> {
	type Output = Option<W::Output>;
	type Awaiter = WaitForAwaiter<W::Awaiter>;

	fn into_awaiter(self) -> Self::Awaiter {
		WaitForAwaiter {
			core: ScopeCore::new(),
			deadline: self.deadline,
			state: WaitForState::Running,
			timer: DeadlineTimer::new(),
			arm: Arm::new(self.work.into_awaiter()),
		}
	}
}

impl<A: Awaiter> Awaiter for WaitForAwaiter<A> {
	type Output = Option<A::Output>;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let mut this = self.project();
		this.core.start(cx);
		let token = this.core.token();

		// Settle the timer before polling the task, so an expiry observed
		// this turn reaches the task as a stop request in the same poll.
		if this.timer.settle(this.core.source().stop_requested())
			&& matches!(this.state, WaitForState::Running)
		{
			*this.state = WaitForState::TimedOut;
			this.core.source().request_stop();
		}

		let child_cx = cx.with_stop_token(&token);
		if let Some(outcome) = this.arm.as_mut().poll_arm(&child_cx) {
			match outcome {
				Outcome::Stopped => {
					if !this.core.source().stop_requested() {
						*this.state = WaitForState::Unwound;
						this.core.source().request_stop();
					}
				}
				outcome => {
					if matches!(this.state, WaitForState::Running | WaitForState::TimedOut) {
						*this.state = WaitForState::Finished(outcome);
						this.core.source().request_stop();
					}
				}
			}
		}

		if this.timer.is_idle() && !this.arm.is_done() {
			this.timer.arm(cx, &token, *this.deadline);
		} else {
			// An internal request made since the task ran settles the timer
			// now; completion below would otherwise never be reached.
			this.timer.settle(this.core.source().stop_requested());
		}

		if this.arm.is_done() && !this.timer.is_pending() {
			this.core.finish();
			if cx.stop_token().stop_requested() {
				return Step::Ready(Outcome::Stopped);
			}
			return match mem::replace(this.state, WaitForState::Running) {
				WaitForState::Unwound => Step::Ready(Outcome::Stopped),
				WaitForState::TimedOut => Step::Ready(Outcome::Value(None)),
				WaitForState::Finished(Outcome::Value(value)) => {
					Step::Ready(Outcome::Value(Some(value)))
				}
				WaitForState::Finished(Outcome::Panicked(payload)) => {
					Step::Ready(Outcome::Panicked(payload))
				}
				WaitForState::Finished(Outcome::Stopped) | WaitForState::Running => {
					unreachable!("timeout combinator completed without a result")
				}
			};
		}
		Step::Pending
	}
}
