use std::cell::RefCell;
use std::rc::Rc;

use ravel::{Callback, StopCallback, StopSource};

fn recorder() -> (
	Rc<RefCell<Vec<&'static str>>>,
	impl Fn(&'static str) -> Callback,
) {
	let log = Rc::new(RefCell::new(Vec::new()));
	let make = {
		let log = Rc::clone(&log);
		move |label: &'static str| {
			let log = Rc::clone(&log);
			Callback::new(move || log.borrow_mut().push(label))
		}
	};
	(log, make)
}

#[test]
fn request_stop_transitions_once() {
	let source = StopSource::new();
	assert!(!source.stop_requested());
	assert!(source.request_stop());
	assert!(!source.request_stop());
	assert!(source.token().stop_requested());
}

#[test]
fn tokens_observe_the_source() {
	let source = StopSource::new();
	let token = source.token();
	let clone = token.clone();
	assert!(!clone.stop_requested());
	source.request_stop();
	assert!(token.stop_requested());
	assert!(clone.stop_requested());
}

#[test]
fn callbacks_fire_in_registration_order() {
	let (log, cb) = recorder();
	let source = StopSource::new();
	let token = source.token();
	let _a = StopCallback::new(&token, cb("a"));
	let _b = StopCallback::new(&token, cb("b"));
	source.request_stop();
	assert_eq!(*log.borrow(), ["a", "b"]);
}

#[test]
fn a_dropped_registration_does_not_fire() {
	let (log, cb) = recorder();
	let source = StopSource::new();
	let token = source.token();
	let a = StopCallback::new(&token, cb("a"));
	let _b = StopCallback::new(&token, cb("b"));
	drop(a);
	source.request_stop();
	assert_eq!(*log.borrow(), ["b"]);
}

#[test]
fn late_registration_fires_inline_without_linking() {
	let (log, cb) = recorder();
	let source = StopSource::new();
	source.request_stop();
	let _late = StopCallback::new(&source.token(), cb("late"));
	assert_eq!(*log.borrow(), ["late"]);
}

#[test]
fn each_callback_fires_at_most_once() {
	let (log, cb) = recorder();
	let source = StopSource::new();
	let token = source.token();
	let guard = StopCallback::new(&token, cb("once"));
	source.request_stop();
	drop(guard);
	source.request_stop();
	assert_eq!(*log.borrow(), ["once"]);
}

#[test]
fn a_firing_callback_may_register_on_another_source() {
	let log = Rc::new(RefCell::new(Vec::new()));
	let source = StopSource::new();
	let other = Rc::new(StopSource::new());
	let held: Rc<RefCell<Option<StopCallback>>> = Rc::new(RefCell::new(None));
	let _a = StopCallback::new(
		&source.token(),
		Callback::new({
			let log = Rc::clone(&log);
			let other = Rc::clone(&other);
			let held = Rc::clone(&held);
			move || {
				log.borrow_mut().push("outer");
				let inner = StopCallback::new(
					&other.token(),
					Callback::new({
						let log = Rc::clone(&log);
						move || log.borrow_mut().push("inner")
					}),
				);
				*held.borrow_mut() = Some(inner);
			}
		}),
	);
	source.request_stop();
	assert_eq!(*log.borrow(), ["outer"]);
	other.request_stop();
	assert_eq!(*log.borrow(), ["outer", "inner"]);
}

#[test]
fn chained_sources_propagate() {
	let outer = StopSource::new();
	let inner = StopSource::new();
	let _link = inner.chain_from(&outer.token());
	assert!(!inner.stop_requested());
	outer.request_stop();
	assert!(inner.stop_requested());
}

#[test]
fn a_dropped_chain_does_not_propagate() {
	let outer = StopSource::new();
	let inner = StopSource::new();
	drop(inner.chain_from(&outer.token()));
	outer.request_stop();
	assert!(!inner.stop_requested());
}

#[test]
fn chaining_from_a_requested_token_fires_immediately() {
	let outer = StopSource::new();
	outer.request_stop();
	let inner = StopSource::new();
	let _link = inner.chain_from(&outer.token());
	assert!(inner.stop_requested());
}
