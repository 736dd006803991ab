//! Run several tasks concurrently and collect every value.

use core::pin::Pin;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, PanicPayload, Step, Task, Work};

use crate::arm::{Arm, ScopeCore};

/// Runs every task in the tuple concurrently; completes once all of them
/// have, with the tuple of their values.
///
/// The arms share an internal stop source. The first arm to finish with a
/// panic requests it and that panic is rethrown once the other arms have
/// unwound; an arm that is cancelled some other way marks the whole
/// combinator stopped. Cancellation from the caller is forwarded to the
/// internal source.
///
/// Implemented for tuples of two to five tasks.
#[must_use]
pub fn wait_all<L: WaitAllList>(tasks: L) -> L::Task {
	tasks.into_task()
}

/// Task tuples accepted by [`wait_all`].
pub trait WaitAllList {
	/// The combinator built from the tuple.
	type Task: ravel::Task;
	/// Bundles the tuple into the combinator task.
	fn into_task(self) -> Self::Task;
}

macro_rules! wait_all_arity {
	($Name:ident, $WorkName:ident, $AwaiterName:ident:
		$(($T:ident, $W:ident, $A:ident, $t:ident, $v:ident)),+
	) => {
		/// Task of [`wait_all`] at one tuple arity.
		pub struct $Name<$($T: Task),+> {
			$($t: $T,)+
		}

		/// Work of [`wait_all`] at one tuple arity.
		pub struct $WorkName<$($W: Work),+> {
			$($t: $W,)+
		}

		/// Awaiter of [`wait_all`] at one tuple arity.
		#[pin_project]
		pub struct $AwaiterName<$($A: Awaiter),+> {
			core: ScopeCore,
			panic: Option<PanicPayload>,
			stopped: bool,
			$(
				#[pin]
				$t: Arm<$A>,
				$v: Option<<$A as Awaiter>::Output>,
			)+
		}

		impl<$($T: Task),+> Task for $Name<$($T),+> {
			type Output = ($(<$T as Task>::Output,)+);
			type Work = $WorkName<$(<$T as Task>::Work),+>;

			fn into_work(self) -> Self::Work {
				$WorkName {
					$($t: self.$t.into_work(),)+
				}
			}
		}

		impl<$($W: Work),+> Work for $WorkName<$($W),+> {
			type Output = ($(<$W as Work>::Output,)+);
			type Awaiter = $AwaiterName<$(<$W as Work>::Awaiter),+>;

			fn into_awaiter(self) -> Self::Awaiter {
				$AwaiterName {
					core: ScopeCore::new(),
					panic: None,
					stopped: false,
					$(
						$t: Arm::new(self.$t.into_awaiter()),
						$v: None,
					)+
				}
			}
		}

		impl<$($A: Awaiter),+> Awaiter for $AwaiterName<$($A),+> {
			type Output = ($(<$A as Awaiter>::Output,)+);

			fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
				let mut this = self.project();
				this.core.start(cx);
				let token = this.core.token();
				let child_cx = cx.with_stop_token(&token);
				$(
					if let Some(outcome) = this.$t.as_mut().poll_arm(&child_cx) {
						match outcome {
							Outcome::Value(value) => *this.$v = Some(value),
							Outcome::Panicked(payload) => {
								if !cx.stop_token().stop_requested()
									&& this.panic.is_none()
									&& !*this.stopped
								{
									*this.panic = Some(payload);
									this.core.source().request_stop();
								}
							}
							Outcome::Stopped => {
								if !cx.stop_token().stop_requested()
									&& !this.core.source().stop_requested()
								{
									*this.stopped = true;
									this.core.source().request_stop();
								}
							}
						}
					}
				)+
				if $(this.$t.is_done())&&+ {
					this.core.finish();
					if cx.stop_token().stop_requested() || *this.stopped {
						return Step::Ready(Outcome::Stopped);
					}
					if let Some(payload) = this.panic.take() {
						return Step::Ready(Outcome::Panicked(payload));
					}
					return Step::Ready(Outcome::Value((
						$(this.$v.take().expect("arm completed without a value"),)+
					)));
				}
				Step::Pending
			}
		}

		impl<$($T: Task),+> WaitAllList for ($($T,)+) {
			type Task = $Name<$($T),+>;

			fn into_task(self) -> Self::Task {
				let ($($t,)+) = self;
				$Name { $($t,)+ }
			}
		}
	};
}

wait_all_arity!(WaitAll2, WaitAll2Work, WaitAll2Awaiter:
	(T0, W0, A0, t0, v0), (T1, W1, A1, t1, v1));
wait_all_arity!(WaitAll3, WaitAll3Work, WaitAll3Awaiter:
	(T0, W0, A0, t0, v0), (T1, W1, A1, t1, v1), (T2, W2, A2, t2, v2));
wait_all_arity!(WaitAll4, WaitAll4Work, WaitAll4Awaiter:
	(T0, W0, A0, t0, v0), (T1, W1, A1, t1, v1), (T2, W2, A2, t2, v2), (T3, W3, A3, t3, v3));
wait_all_arity!(WaitAll5, WaitAll5Work, WaitAll5Awaiter:
	(T0, W0, A0, t0, v0), (T1, W1, A1, t1, v1), (T2, W2, A2, t2, v2), (T3, W3, A3, t3, v3),
	(T4, W4, A4, t4, v4));
