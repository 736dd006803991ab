use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use strand::{just, just_panic, just_stopped, noop, run, sleep_for, yield_now};

#[test]
fn noop_completes_immediately() {
	assert_eq!(run(noop()), Some(()));
}

#[test]
fn just_delivers_its_value() {
	assert_eq!(run(just("hello")), Some("hello"));
}

#[test]
fn just_stopped_reports_none() {
	assert_eq!(run(just_stopped()), None);
}

#[test]
fn just_panic_resumes_at_the_caller() {
	let error = catch_unwind(AssertUnwindSafe(|| run(just_panic("kaboom")))).unwrap_err();
	assert_eq!(error.downcast_ref::<&str>(), Some(&"kaboom"));
}

#[test]
fn yield_completes_after_one_turn() {
	assert_eq!(run(yield_now()), Some(()));
}

#[test]
fn sleep_waits_out_its_duration() {
	let before = Instant::now();
	assert_eq!(run(sleep_for(Duration::from_millis(5))), Some(()));
	assert!(before.elapsed() >= Duration::from_millis(5));
}
