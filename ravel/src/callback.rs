//! [`Callback`], the type-erased unit of scheduling.

use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// A cheaply clonable, type-erased "invoke me" value.
///
/// Everything the event loop dispatches (ready-queue entries, timer
/// expirations, stop notifications) is stored as a `Callback`. This is the
/// only dynamic dispatch in the runtime: every call site knows the concrete
/// callee, the erasure exists purely so callbacks can sit in homogeneous
/// scheduler structures.
///
/// # Logic
///
/// The structures storing a `Callback` arrange for it to be invoked at most
/// once per registration; the type itself does not enforce that.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
	/// Wraps `f` for later invocation.
	pub fn new(f: impl Fn() + 'static) -> Self {
		Self(Rc::new(f))
	}

	/// Invokes the wrapped closure.
	pub fn invoke(&self) {
		(self.0)();
	}
}

impl Debug for Callback {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Callback").finish()
	}
}
