//! Per-poll handles: [`ChainContext`] and [`Context`].

use std::time::Instant;

use crate::callback::Callback;
use crate::event_loop::EventLoop;
use crate::stop::StopToken;
use crate::timer_queue::TimerKey;

/// Scheduling identity of one chain root.
///
/// Carries the stop token in effect for the chain's subtree and the wake
/// callback that re-polls the chain. Created once per chain root (the
/// runner's root task); its lifetime strictly encloses every poll that
/// borrows it.
pub struct ChainContext {
	token: StopToken,
	wake: Callback,
}

impl ChainContext {
	/// Binds a chain to its token and wake-up.
	pub fn new(token: StopToken, wake: Callback) -> Self {
		Self { token, wake }
	}

	/// The stop token governing this chain.
	#[must_use]
	pub fn stop_token(&self) -> &StopToken {
		&self.token
	}

	/// The callback that re-polls this chain.
	#[must_use]
	pub fn wake_callback(&self) -> &Callback {
		&self.wake
	}
}

/// The borrowed handle every [`Awaiter::poll`](`crate::task::Awaiter::poll`)
/// call receives.
///
/// Bundles the event loop, the stop token in effect for the polled subtree
/// and the chain's wake callback. Read-only apart from the scheduling
/// operations.
#[derive(Clone, Copy)]
pub struct Context<'a> {
	event_loop: &'a EventLoop,
	token: &'a StopToken,
	wake: &'a Callback,
}

impl<'a> Context<'a> {
	/// The context of a chain root.
	#[must_use]
	pub fn new(event_loop: &'a EventLoop, chain: &'a ChainContext) -> Self {
		Self {
			event_loop,
			token: chain.stop_token(),
			wake: chain.wake_callback(),
		}
	}

	/// Derives the context for a subtree governed by a narrower token.
	///
	/// Combinators that own an internal stop source poll their children
	/// through a context derived this way.
	#[must_use]
	pub fn with_stop_token<'b>(&'b self, token: &'b StopToken) -> Context<'b> {
		Context {
			event_loop: self.event_loop,
			token,
			wake: self.wake,
		}
	}

	/// The stop token in effect for the polled subtree.
	#[must_use]
	pub fn stop_token(&self) -> &'a StopToken {
		self.token
	}

	/// The wake callback of the current chain.
	#[must_use]
	pub fn wake_callback(&self) -> &'a Callback {
		self.wake
	}

	/// The loop this chain runs on.
	#[must_use]
	pub fn event_loop(&self) -> &'a EventLoop {
		self.event_loop
	}

	/// Queues this chain's wake-up on the ready queue.
	pub fn schedule_wake(&self) {
		self.event_loop.schedule(self.wake.clone());
	}

	/// Queues an arbitrary callback on the ready queue.
	pub fn schedule(&self, callback: Callback) {
		self.event_loop.schedule(callback);
	}

	/// Queues `callback` to run once `deadline` has passed.
	pub fn insert_timer(&self, deadline: Instant, callback: Callback) -> TimerKey {
		self.event_loop.insert_timer(deadline, callback)
	}

	/// Removes a queued timer entry.
	pub fn cancel_timer(&self, key: TimerKey) -> bool {
		self.event_loop.cancel_timer(key)
	}
}
