use std::panic::{catch_unwind, AssertUnwindSafe};

use strand::{just, just_panic, just_stopped, noop, run, suspend_forever, then, wait_all, yield_now};

use _validator::Validator;

#[test]
fn values_arrive_in_argument_order() {
	assert_eq!(
		run(wait_all((just("a"), just("b"), just("c")))),
		Some(("a", "b", "c"))
	);
}

#[test]
fn immediate_arms_complete_inline() {
	assert_eq!(
		run(wait_all((noop(), noop(), noop(), noop()))),
		Some(((), (), (), ()))
	);
}

#[test]
fn a_stopped_arm_stops_the_combinator() {
	assert_eq!(run(wait_all((just(1), just_stopped()))), None);
}

#[test]
fn the_first_panic_wins_and_cancels_the_rest() {
	let error = catch_unwind(AssertUnwindSafe(|| {
		run(wait_all((just_panic("first"), suspend_forever())))
	}))
	.unwrap_err();
	assert_eq!(error.downcast_ref::<&str>(), Some(&"first"));
}

#[test]
fn arms_progress_in_argument_order() {
	let v: Validator<&str> = Validator::new();
	let a = then(yield_now(), {
		let v = v.clone();
		move |()| v.push("a")
	});
	let b = then(yield_now(), {
		let v = v.clone();
		move |()| v.push("b")
	});
	assert_eq!(run(wait_all((a, b))), Some(((), ())));
	v.expect(["a", "b"]);
}

#[test]
fn mixed_output_types_are_preserved() {
	assert_eq!(
		run(wait_all((just(1_u8), just("two"), just(3.0_f64)))),
		Some((1, "two", 3.0))
	);
}
