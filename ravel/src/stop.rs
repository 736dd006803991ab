//! One-shot cancellation broadcast: [`StopSource`], [`StopToken`],
//! [`StopCallback`].
//!
//! A source fires once; all tokens observing it report "requested" from then
//! on, and every registered callback is invoked synchronously, in
//! registration order, during the [`StopSource::request_stop`] call.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::callback::Callback;

#[derive(Default)]
struct StopInner {
	requested: Cell<bool>,
	next_key: Cell<u64>,
	callbacks: RefCell<BTreeMap<u64, Callback>>,
}

impl StopInner {
	fn request(&self) -> bool {
		if self.requested.replace(true) {
			return false;
		}
		log::trace!("stop requested");
		loop {
			// Detach the front callback before invoking it, so it may
			// register elsewhere or drop its own guard.
			let front = self.callbacks.borrow_mut().pop_first();
			let Some((_, callback)) = front else { break };
			callback.invoke();
		}
		true
	}
}

/// Owner of one one-shot stop state.
///
/// The transition from *not requested* to *requested* is irreversible and
/// happens at most once.
#[derive(Default)]
pub struct StopSource {
	inner: Rc<StopInner>,
}

impl StopSource {
	/// Creates a source in the *not requested* state.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// A token observing this source.
	#[must_use]
	pub fn token(&self) -> StopToken {
		StopToken {
			inner: Rc::clone(&self.inner),
		}
	}

	/// Whether [`StopSource::request_stop`] already ran.
	#[must_use]
	pub fn stop_requested(&self) -> bool {
		self.inner.requested.get()
	}

	/// Fires the broadcast.
	///
	/// **Returns** `true` only on the call that performed the transition;
	/// later calls change nothing. Registered callbacks run inline, in
	/// registration order, each detached from the source before it runs.
	pub fn request_stop(&self) -> bool {
		self.inner.request()
	}

	/// Scope guard forwarding `outer`'s request to this source.
	///
	/// Combinators that own an internal source use this to extend an outer
	/// cancellation scope into the inner one.
	#[must_use]
	pub fn chain_from(&self, outer: &StopToken) -> StopCallback {
		let inner = Rc::clone(&self.inner);
		StopCallback::new(
			outer,
			Callback::new(move || {
				inner.request();
			}),
		)
	}
}

/// A cheap, clonable observer of one [`StopSource`].
#[derive(Clone)]
pub struct StopToken {
	inner: Rc<StopInner>,
}

impl StopToken {
	/// Whether the observed source was requested.
	#[must_use]
	pub fn stop_requested(&self) -> bool {
		self.inner.requested.get()
	}
}

/// Scoped registration of a [`Callback`] on a [`StopSource`].
///
/// Registering on an already-requested source invokes the callback inline
/// without linking it. Dropping the guard unregisters the callback if it has
/// not fired yet. Scoped lifetime is the only way to register and
/// unregister, which is what keeps every registration balanced.
pub struct StopCallback {
	inner: Rc<StopInner>,
	key: Option<u64>,
}

impl StopCallback {
	/// Registers `callback` to run when `token`'s source fires.
	pub fn new(token: &StopToken, callback: Callback) -> Self {
		let inner = Rc::clone(&token.inner);
		if inner.requested.get() {
			callback.invoke();
			return Self { inner, key: None };
		}
		let key = inner.next_key.get();
		inner.next_key.set(key + 1);
		inner.callbacks.borrow_mut().insert(key, callback);
		Self {
			inner,
			key: Some(key),
		}
	}
}

impl Drop for StopCallback {
	fn drop(&mut self) {
		if let Some(key) = self.key {
			// Gone already if the source fired.
			self.inner.callbacks.borrow_mut().remove(&key);
		}
	}
}
