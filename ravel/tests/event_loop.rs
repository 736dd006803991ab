use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ravel::{Callback, EventLoop};

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
fn ready_callbacks_run_in_push_order() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	event_loop.schedule(cb("first"));
	event_loop.schedule(cb("second"));
	event_loop.schedule(cb("third"));
	assert_eq!(event_loop.turn(), None);
	assert_eq!(*log.borrow(), ["first", "second", "third"]);
}

#[test]
fn work_pushed_during_a_drain_waits_for_the_next_turn() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	event_loop.schedule(Callback::new({
		let log = Rc::clone(&log);
		let event_loop = event_loop.clone();
		let second = cb("second");
		move || {
			log.borrow_mut().push("first");
			event_loop.schedule(second.clone());
		}
	}));
	event_loop.turn();
	assert_eq!(*log.borrow(), ["first"]);
	event_loop.turn();
	assert_eq!(*log.borrow(), ["first", "second"]);
}

#[test]
fn expired_timers_fire_in_insertion_order_on_equal_deadlines() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	let now = Instant::now();
	event_loop.insert_timer(now, cb("t1"));
	event_loop.insert_timer(now, cb("t2"));
	assert_eq!(event_loop.turn(), None);
	assert_eq!(*log.borrow(), ["t1", "t2"]);
}

#[test]
fn ready_work_preempts_further_timer_dispatch() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	let now = Instant::now();
	event_loop.insert_timer(now, {
		let log = Rc::clone(&log);
		let event_loop = event_loop.clone();
		let ready = cb("ready");
		Callback::new(move || {
			log.borrow_mut().push("t1");
			event_loop.schedule(ready.clone());
		})
	});
	event_loop.insert_timer(now, cb("t2"));
	// The first expired timer queues ready work, which holds back the
	// second timer until the following turn.
	assert_eq!(event_loop.turn(), None);
	assert_eq!(*log.borrow(), ["t1"]);
	assert_eq!(event_loop.turn(), None);
	assert_eq!(*log.borrow(), ["t1", "ready", "t2"]);
}

#[test]
fn a_cancelled_timer_never_fires() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	let key = event_loop.insert_timer(Instant::now(), cb("never"));
	assert!(event_loop.cancel_timer(key));
	assert!(!event_loop.cancel_timer(key));
	assert_eq!(event_loop.turn(), None);
	assert!(log.borrow().is_empty());
}

#[test]
fn the_turn_reports_the_next_deadline() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	event_loop.insert_timer(Instant::now() + Duration::from_millis(50), cb("later"));
	let sleep = event_loop.turn().expect("a deadline to sleep for");
	assert!(sleep > Duration::ZERO);
	assert!(sleep <= Duration::from_millis(50));
	assert!(log.borrow().is_empty());
}

#[test]
fn queued_ready_work_suppresses_the_sleep_report() {
	let (log, cb) = recorder();
	let event_loop = EventLoop::new();
	event_loop.insert_timer(Instant::now() + Duration::from_millis(50), cb("later"));
	event_loop.schedule(Callback::new({
		let event_loop = event_loop.clone();
		let again = cb("ready");
		move || event_loop.schedule(again.clone())
	}));
	// Ready work queued during the drain means "do not sleep yet".
	assert_eq!(event_loop.turn(), None);
	assert_eq!(*log.borrow(), Vec::<&str>::new());
}
