use std::time::Duration;

use strand::{and_then, run, sleep_for, suspend_forever, then, wait_all, wait_for, yield_now, Mutex};

use _validator::Validator;

#[test]
fn the_fast_path_acquires_an_unheld_lock() {
	let mutex = Mutex::new();
	assert!(!mutex.is_locked());
	let held = run(then(mutex.lock(), {
		let mutex = mutex.clone();
		move |guard| {
			assert!(mutex.is_locked());
			drop(guard);
		}
	}));
	assert_eq!(held, Some(()));
	assert!(!mutex.is_locked());
}

#[test]
fn waiters_acquire_in_fifo_order() {
	let v: Validator<usize> = Validator::new();
	let mutex = Mutex::new();
	let holder = and_then(mutex.lock(), {
		let v = v.clone();
		move |guard| {
			v.push(0);
			then(yield_now(), move |()| drop(guard))
		}
	});
	let first_waiter = then(mutex.lock(), {
		let v = v.clone();
		move |guard| {
			v.push(1);
			drop(guard);
		}
	});
	let second_waiter = then(mutex.lock(), {
		let v = v.clone();
		move |guard| {
			v.push(2);
			drop(guard);
		}
	});
	assert_eq!(
		run(wait_all((holder, first_waiter, second_waiter))),
		Some(((), (), ()))
	);
	assert!(!mutex.is_locked());
	v.expect([0, 1, 2]);
}

#[test]
fn a_timed_out_waiter_never_acquires() {
	let mutex = Mutex::new();
	let holder = and_then(mutex.lock(), |guard| {
		then(sleep_for(Duration::from_millis(5)), move |()| drop(guard))
	});
	let impatient = wait_for(
		then(mutex.lock(), |guard| drop(guard)),
		Duration::from_millis(1),
	);
	assert_eq!(run(wait_all((holder, impatient))), Some(((), None)));
	assert!(!mutex.is_locked());
}

#[test]
fn a_cancelled_holder_releases_through_its_guard() {
	let mutex = Mutex::new();
	// The holder never finishes on its own; the timeout unwinds it and the
	// guard captured by the unreached closure is dropped with the awaiter.
	let holder = and_then(mutex.lock(), |guard| {
		then(suspend_forever(), move |()| drop(guard))
	});
	assert_eq!(run(wait_for(holder, Duration::from_millis(1))), Some(None));
	assert!(!mutex.is_locked());
}
