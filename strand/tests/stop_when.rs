use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use strand::{just, just_panic, just_stopped, noop, run, sleep_for, stop_when, suspend_forever, then, yield_now};

#[test]
fn a_primary_value_first_is_delivered() {
	assert_eq!(run(stop_when(just(9), suspend_forever())), Some(Some(9)));
}

#[test]
fn a_trigger_value_first_voids_the_race() {
	assert_eq!(run(stop_when(suspend_forever(), noop())), Some(None));
}

#[test]
fn a_trigger_panic_first_is_raised() {
	let error = catch_unwind(AssertUnwindSafe(|| {
		run(stop_when(suspend_forever(), just_panic("trip")))
	}))
	.unwrap_err();
	assert_eq!(error.downcast_ref::<&str>(), Some(&"trip"));
}

#[test]
fn a_primary_unwinding_on_its_own_voids_the_race() {
	assert_eq!(run(stop_when(just_stopped(), suspend_forever())), Some(None));
}

#[test]
fn a_slow_primary_still_wins_before_the_trigger() {
	assert_eq!(
		run(stop_when(
			then(yield_now(), |()| 3),
			sleep_for(Duration::from_secs(60))
		)),
		Some(Some(3))
	);
}

#[test]
fn a_primary_panic_first_is_raised() {
	let error = catch_unwind(AssertUnwindSafe(|| {
		run(stop_when(just_panic("primary"), suspend_forever()))
	}))
	.unwrap_err();
	assert_eq!(error.downcast_ref::<&str>(), Some(&"primary"));
}
