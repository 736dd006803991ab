//! Race several tasks; the first value or panic wins.

use core::pin::Pin;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, Task, Work};

use crate::arm::{Arm, ScopeCore};

/// Races every task in the tuple; the first arm to deliver a value or a
/// panic fixes the result, the internal stop source is requested, and the
/// combinator completes once every other arm has unwound.
///
/// The winner's [`index`](`WaitAnyResult::index`) is its position in the
/// argument tuple. If every arm is cancelled before a winner exists the
/// combinator itself reports stopped. All arms must share one output type;
/// [`cast_result`](`crate::cast_result`) is the homogeniser. Cancellation
/// from the caller is forwarded to the internal source.
///
/// Implemented for tuples of two to five tasks.
#[must_use]
pub fn wait_any<L: WaitAnyList>(tasks: L) -> L::Task {
	tasks.into_task()
}

/// Task tuples accepted by [`wait_any`].
pub trait WaitAnyList {
	/// The combinator built from the tuple.
	type Task: ravel::Task;
	/// Bundles the tuple into the combinator task.
	fn into_task(self) -> Self::Task;
}

/// What [`wait_any`] delivers: the winning arm's value and its position in
/// the argument tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitAnyResult<T> {
	/// Position of the winning task in the argument tuple.
	pub index: usize,
	/// The winner's value.
	pub value: T,
}

macro_rules! wait_any_arity {
	($Name:ident, $WorkName:ident, $AwaiterName:ident:
		($T0:ident, $W0:ident, $A0:ident, $t0:ident, $i0:tt)
		$(, ($T:ident, $W:ident, $A:ident, $t:ident, $i:tt))+
	) => {
		/// Task of [`wait_any`] at one tuple arity.
		pub struct $Name<$T0: Task, $($T: Task<Output = <$T0 as Task>::Output>),+> {
			$t0: $T0,
			$($t: $T,)+
		}

		/// Work of [`wait_any`] at one tuple arity.
		pub struct $WorkName<$W0: Work, $($W: Work<Output = <$W0 as Work>::Output>),+> {
			$t0: $W0,
			$($t: $W,)+
		}

		/// Awaiter of [`wait_any`] at one tuple arity.
		#[pin_project]
		pub struct $AwaiterName<$A0: Awaiter, $($A: Awaiter<Output = <$A0 as Awaiter>::Output>),+> {
			core: ScopeCore,
			winner: Option<(usize, Outcome<<$A0 as Awaiter>::Output>)>,
			#[pin]
			$t0: Arm<$A0>,
			$(
				#[pin]
				$t: Arm<$A>,
			)+
		}

		impl<$T0: Task, $($T: Task<Output = <$T0 as Task>::Output>),+> Task
			for $Name<$T0, $($T),+>
		{
			type Output = WaitAnyResult<<$T0 as Task>::Output>;
			type Work = $WorkName<<$T0 as Task>::Work, $(<$T as Task>::Work),+>;

			fn into_work(self) -> Self::Work {
				$WorkName {
					$t0: self.$t0.into_work(),
					$($t: self.$t.into_work(),)+
				}
			}
		}

		impl<$W0: Work, $($W: Work<Output = <$W0 as Work>::Output>),+> Work
			for $WorkName<$W0, $($W),+>
		{
			type Output = WaitAnyResult<<$W0 as Work>::Output>;
			type Awaiter = $AwaiterName<<$W0 as Work>::Awaiter, $(<$W as Work>::Awaiter),+>;

			fn into_awaiter(self) -> Self::Awaiter {
				$AwaiterName {
					core: ScopeCore::new(),
					winner: None,
					$t0: Arm::new(self.$t0.into_awaiter()),
					$($t: Arm::new(self.$t.into_awaiter()),)+
				}
			}
		}

		impl<$A0: Awaiter, $($A: Awaiter<Output = <$A0 as Awaiter>::Output>),+> Awaiter
			for $AwaiterName<$A0, $($A),+>
		{
			type Output = WaitAnyResult<<$A0 as Awaiter>::Output>;

			fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output> {
				let mut this = self.project();
				this.core.start(cx);
				let token = this.core.token();
				let child_cx = cx.with_stop_token(&token);
				if let Some(outcome) = this.$t0.as_mut().poll_arm(&child_cx) {
					match outcome {
						Outcome::Stopped => {}
						outcome => {
							if this.winner.is_none() {
								*this.winner = Some(($i0, outcome));
								this.core.source().request_stop();
							}
						}
					}
				}
				$(
					if let Some(outcome) = this.$t.as_mut().poll_arm(&child_cx) {
						match outcome {
							Outcome::Stopped => {}
							outcome => {
								if this.winner.is_none() {
									*this.winner = Some(($i, outcome));
									this.core.source().request_stop();
								}
							}
						}
					}
				)+
				if this.$t0.is_done() $(&& this.$t.is_done())+ {
					this.core.finish();
					if cx.stop_token().stop_requested() {
						return Step::Ready(Outcome::Stopped);
					}
					return match this.winner.take() {
						Some((index, Outcome::Value(value))) => {
							Step::Ready(Outcome::Value(WaitAnyResult { index, value }))
						}
						Some((_, Outcome::Panicked(payload))) => {
							Step::Ready(Outcome::Panicked(payload))
						}
						Some((_, Outcome::Stopped)) | None => Step::Ready(Outcome::Stopped),
					};
				}
				Step::Pending
			}
		}

		impl<$T0: Task, $($T: Task<Output = <$T0 as Task>::Output>),+> WaitAnyList
			for ($T0, $($T,)+)
		{
			type Task = $Name<$T0, $($T),+>;

			fn into_task(self) -> Self::Task {
				let ($t0, $($t,)+) = self;
				$Name { $t0, $($t,)+ }
			}
		}
	};
}

wait_any_arity!(WaitAny2, WaitAny2Work, WaitAny2Awaiter:
	(T0, W0, A0, t0, 0), (T1, W1, A1, t1, 1));
wait_any_arity!(WaitAny3, WaitAny3Work, WaitAny3Awaiter:
	(T0, W0, A0, t0, 0), (T1, W1, A1, t1, 1), (T2, W2, A2, t2, 2));
wait_any_arity!(WaitAny4, WaitAny4Work, WaitAny4Awaiter:
	(T0, W0, A0, t0, 0), (T1, W1, A1, t1, 1), (T2, W2, A2, t2, 2), (T3, W3, A3, t3, 3));
wait_any_arity!(WaitAny5, WaitAny5Work, WaitAny5Awaiter:
	(T0, W0, A0, t0, 0), (T1, W1, A1, t1, 1), (T2, W2, A2, t2, 2), (T3, W3, A3, t3, 3),
	(T4, W4, A4, t4, 4));
