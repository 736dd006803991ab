use ravel::{Callback, ChainContext, EventLoop, StopSource, StopToken};
use static_assertions::{assert_impl_all, assert_not_impl_any};

// The runtime is single-threaded by construction: none of its handles may
// cross a thread boundary.
assert_not_impl_any!(EventLoop: Send, Sync);
assert_not_impl_any!(StopSource: Send, Sync, Clone);
assert_not_impl_any!(StopToken: Send, Sync);
assert_not_impl_any!(Callback: Send, Sync);
assert_not_impl_any!(ChainContext: Send, Sync, Clone);

assert_impl_all!(StopToken: Clone);
assert_impl_all!(Callback: Clone);
assert_impl_all!(EventLoop: Clone);

#[test]
fn callbacks_invoke_their_closure() {
	let source = StopSource::new();
	let callback = {
		let token = source.token();
		Callback::new(move || assert!(!token.stop_requested()))
	};
	callback.invoke();
	callback.invoke();
}
