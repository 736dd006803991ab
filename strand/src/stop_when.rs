//! Run a primary task until a trigger task ends the race.

use core::mem;
use core::pin::Pin;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, PanicPayload, Step, Task, Work};

use crate::arm::{Arm, ScopeCore};

/// Runs `primary` and `trigger` under a shared internal stop source; the
/// first side to complete requests it, asking the other side to unwind.
///
/// The combinator delivers the primary's value (or panic) if the primary
/// finished first, the trigger's panic if the trigger panicked first, and
/// [`None`] when the first event was the trigger's value or either side's
/// own unwind. Cancellation from the caller is forwarded to the internal
/// source and surfaces as stopped.
#[must_use]
pub fn stop_when<P: Task, T: Task>(primary: P, trigger: T) -> StopWhen<P, T> {
	StopWhen { primary, trigger }
}

/// Task of [`stop_when`].
pub struct StopWhen<P, T> {
	primary: P,
	trigger: T,
}

/// Work of [`stop_when`].
pub struct StopWhenWork<P, T> {
	primary: P,
	trigger: T,
}

/// Awaiter of [`stop_when`].
#[pin_project]
pub struct StopWhenAwaiter<A: Awaiter, B: Awaiter> {
	core: ScopeCore,
	state: StopWhenState<A::Output>,
	trigger_started: bool,
	#[pin]
	primary: Arm<A>,
	#[pin]
	trigger: Arm<B>,
}

enum StopWhenState<T> {
	Running,
	PrimaryDone(Outcome<T>),
	TriggerPanicked(PanicPayload),
	/// Either side unwound first, or the trigger delivered its value:
	/// the race is void and the result is [`None`].
	Disarmed,
}

impl<P: Task, T: Task> Task for StopWhen<P, T> {
	type Output = Option<P::Output>;
	type Work = StopWhenWork<P::Work, T::Work>;

	fn into_work(self) -> Self::Work {
		StopWhenWork {
			primary: self.primary.into_work(),
			trigger: self.trigger.into_work(),
		}
	}
}

impl<P: Work, T: Work> Work for StopWhenWork<P, T> {
	type Output = Option<P::Output>;
	type Awaiter = StopWhenAwaiter<P::Awaiter, T::Awaiter>;

	fn into_awaiter(self) -> Self::Awaiter {
		StopWhenAwaiter {
			core: ScopeCore::new(),
			state: StopWhenState::Running,
			trigger_started: false,
			primary: Arm::new(self.primary.into_awaiter()),
			trigger: Arm::new(self.trigger.into_awaiter()),
		}
	}
}

impl<A: Awaiter, B: Awaiter> Awaiter for StopWhenAwaiter<A, B> {
	type Output = Option<A::Output>;

	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
		let mut this = self.project();
		this.core.start(cx);
		let token = this.core.token();
		let child_cx = cx.with_stop_token(&token);

		if let Some(outcome) = this.primary.as_mut().poll_arm(&child_cx) {
			match outcome {
				Outcome::Stopped => {
					if !this.core.source().stop_requested() {
						*this.state = StopWhenState::Disarmed;
						this.core.source().request_stop();
					}
				}
				outcome => {
					// A late primary result still wins over the trigger's.
					if matches!(
						this.state,
						StopWhenState::Running | StopWhenState::Disarmed
					) {
						*this.state = StopWhenState::PrimaryDone(outcome);
						this.core.source().request_stop();
					}
				}
			}
		}

		// The trigger is never entered when the primary finished on the
		// very first poll.
		if *this.trigger_started || !this.primary.is_done() {
			*this.trigger_started = true;
			if let Some(outcome) = this.trigger.as_mut().poll_arm(&child_cx) {
				match outcome {
					Outcome::Value(_) => {
						if matches!(this.state, StopWhenState::Running) {
							*this.state = StopWhenState::Disarmed;
							this.core.source().request_stop();
						}
					}
					Outcome::Panicked(payload) => {
						if matches!(this.state, StopWhenState::Running) {
							*this.state = StopWhenState::TriggerPanicked(payload);
							this.core.source().request_stop();
						}
					}
					Outcome::Stopped => {
						if !this.core.source().stop_requested() {
							*this.state = StopWhenState::Disarmed;
							this.core.source().request_stop();
						}
					}
				}
			}
		}

		if this.primary.is_done() && (this.trigger.is_done() || !*this.trigger_started) {
			this.core.finish();
			if cx.stop_token().stop_requested() {
				return Step::Ready(Outcome::Stopped);
			}
			return match mem::replace(this.state, StopWhenState::Running) {
				StopWhenState::PrimaryDone(Outcome::Value(value)) => {
					Step::Ready(Outcome::Value(Some(value)))
				}
				StopWhenState::PrimaryDone(Outcome::Panicked(payload))
				| StopWhenState::TriggerPanicked(payload) => {
					Step::Ready(Outcome::Panicked(payload))
				}
				StopWhenState::Disarmed => Step::Ready(Outcome::Value(None)),
				StopWhenState::PrimaryDone(Outcome::Stopped) | StopWhenState::Running => {
					unreachable!("race completed without a first event")
				}
			};
		}
		Step::Pending
	}
}
