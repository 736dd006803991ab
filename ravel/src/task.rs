//! The task/work/awaiter contract and the completion taxonomy.
//!
//! Every asynchronous operation exposes three types tied to the three
//! lifetimes in play: a [`Task`] describes the operation (before binding to
//! a caller), a [`Work`] is the owned plan (after binding to a caller,
//! before running) and an [`Awaiter`] is the pinned in-flight state.

use core::fmt::{self, Debug, Formatter};
use core::pin::Pin;
use std::any::Any;

use crate::context::Context;

/// Payload of a captured panic, rethrown where the result is consumed.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Final result of a completed awaiter.
///
/// The taxonomy is closed: every operation either produces a value,
/// captures a panic, or observes cancellation and unwinds. Pending is not
/// an outcome; it lives in [`Step`].
#[must_use]
pub enum Outcome<T> {
	/// Completed normally.
	Value(T),
	/// A panic was captured while producing the result.
	Panicked(PanicPayload),
	/// Cancellation was observed; there is neither value nor panic.
	Stopped,
}

impl<T: Debug> Debug for Outcome<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Self::Panicked(_) => f.debug_tuple("Panicked").finish(),
			Self::Stopped => f.write_str("Stopped"),
		}
	}
}

/// One poll step of an [`Awaiter`].
#[must_use]
pub enum Step<T> {
	/// The awaiter completed with the given outcome. Polling it again is a
	/// contract violation.
	Ready(Outcome<T>),
	/// Still in flight; a wake-up of the chain has been arranged.
	Pending,
}

/// A described asynchronous operation.
///
/// Single use: [`Task::into_work`] consumes the descriptor. Task types are
/// neither [`Copy`] nor [`Clone`].
pub trait Task {
	/// What the operation delivers on the value channel.
	type Output;
	/// The owned plan this descriptor builds.
	type Work: Work<Output = Self::Output>;
	/// Consumes the descriptor into its plan.
	fn into_work(self) -> Self::Work;
}

/// The owned, movable plan of an operation.
///
/// Holds everything that must outlive the start of the operation: captured
/// values, child works, closures. Passing a work into a combinator
/// transfers ownership.
pub trait Work {
	/// What the operation delivers on the value channel.
	type Output;
	/// The in-flight state this plan builds.
	type Awaiter: Awaiter<Output = Self::Output>;
	/// Consumes the plan into its in-flight state.
	fn into_awaiter(self) -> Self::Awaiter;
}

/// The pinned in-flight state of a running operation.
///
/// # Logic
///
/// The first poll enters the awaiter; it either completes inline
/// ([`Step::Ready`]) or arranges a wake-up of its chain and returns
/// [`Step::Pending`]. Combinators **must** tolerate a child completing
/// inline during the poll that started it, and every awaiter **must**
/// tolerate spurious polls while pending. Exactly one [`Step::Ready`] is
/// ever returned.
///
/// Dropping a pending awaiter **must** release whatever it registered
/// (timer entries, wait-list entries, stop callbacks).
pub trait Awaiter {
	/// What the operation delivers on the value channel.
	type Output;
	/// Drives the operation one step.
	fn poll(self: Pin<&mut Self>, cx: &Context<'_>) -> Step<Self::Output>;
}
