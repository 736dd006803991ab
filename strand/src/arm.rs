//! Shared bookkeeping for combinators that run several child chains.

use core::pin::Pin;

use pin_project::pin_project;
use ravel::{Awaiter, Context, Outcome, Step, StopCallback, StopSource, StopToken};

/// One child chain of a concurrent combinator.
///
/// Remembers completion so the parent may keep polling its remaining arms
/// without re-entering finished ones.
#[pin_project]
pub(crate) struct Arm<A: Awaiter> {
	#[pin]
	awaiter: A,
	done: bool,
}

impl<A: Awaiter> Arm<A> {
	pub(crate) fn new(awaiter: A) -> Self {
		Self {
			awaiter,
			done: false,
		}
	}

	pub(crate) fn is_done(&self) -> bool {
		self.done
	}

	/// Polls the arm unless it already completed.
	///
	/// Returns the outcome exactly once, on the poll that completes the arm.
	pub(crate) fn poll_arm(self: Pin<&mut Self>, cx: &Context<'_>) -> Option<Outcome<A::Output>> {
		let this = self.project();
		if *this.done {
			return None;
		}
		match this.awaiter.poll(cx) {
			Step::Pending => None,
			Step::Ready(outcome) => {
				*this.done = true;
				Some(outcome)
			}
		}
	}
}

/// The cancellation scope a concurrent combinator puts its arms under: an
/// internal stop source plus the scoped link forwarding the parent token
/// into it.
pub(crate) struct ScopeCore {
	source: StopSource,
	parent_link: Option<StopCallback>,
}

impl ScopeCore {
	pub(crate) fn new() -> Self {
		Self {
			source: StopSource::new(),
			parent_link: None,
		}
	}

	/// Links the parent token into the internal source. First call only.
	pub(crate) fn start(&mut self, cx: &Context<'_>) {
		if self.parent_link.is_none() {
			self.parent_link = Some(self.source.chain_from(cx.stop_token()));
		}
	}

	/// Drops the parent link; called once when the combinator completes.
	pub(crate) fn finish(&mut self) {
		self.parent_link = None;
	}

	pub(crate) fn token(&self) -> StopToken {
		self.source.token()
	}

	pub(crate) fn source(&self) -> &StopSource {
		&self.source
	}
}
