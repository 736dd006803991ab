use std::panic::{catch_unwind, AssertUnwindSafe};

use strand::{and_then, cast_result, just, just_stopped, run, stopped_as_optional, then, yield_now};

use _validator::Validator;

#[test]
fn then_on_just_is_the_identity() {
	assert_eq!(run(then(just(7), |x| x)), Some(7));
}

#[test]
fn then_skips_the_closure_on_stopped() {
	let v: Validator<&str> = Validator::new();
	let task = then(just_stopped(), {
		let v = v.clone();
		move |()| v.push("mapped")
	});
	assert_eq!(run(task), None);
	v.expect(std::iter::empty());
}

#[test]
fn then_captures_a_closure_panic() {
	let error = catch_unwind(AssertUnwindSafe(|| {
		run(then(just(1), |_| {
			panic!("pow");
		}))
	}))
	.unwrap_err();
	assert_eq!(error.downcast_ref::<&str>(), Some(&"pow"));
}

#[test]
fn and_then_sequences_and_keeps_captures_alive() {
	let v: Validator<String> = Validator::new();
	let task = and_then(just(2), {
		let v = v.clone();
		move |n| {
			v.push(format!("built with {n}"));
			then(yield_now(), {
				let v = v.clone();
				move |()| {
					v.push("follow-up ran".to_string());
					n * 10
				}
			})
		}
	});
	assert_eq!(run(task), Some(20));
	v.expect(["built with 2".to_string(), "follow-up ran".to_string()]);
}

#[test]
fn and_then_propagates_a_stopped_first_stage() {
	assert_eq!(run(and_then(just_stopped(), |()| just(1))), None);
}

#[test]
fn and_then_captures_a_builder_panic() {
	let error = catch_unwind(AssertUnwindSafe(|| {
		run(and_then(just(1), |_| -> strand::Just<i32> {
			panic!("no follow-up");
		}))
	}))
	.unwrap_err();
	assert_eq!(error.downcast_ref::<&str>(), Some(&"no follow-up"));
}

#[test]
fn cast_result_converts_the_value() {
	assert_eq!(run(cast_result::<i64, _>(just(7_i32))), Some(7_i64));
}

#[test]
fn cast_result_on_a_convertible_just_matches_just() {
	assert_eq!(run(cast_result::<i64, _>(just(42_i16))), run(just(42_i64)));
}

#[test]
fn stopped_as_optional_reifies_cancellation() {
	assert_eq!(run(stopped_as_optional(just_stopped())), Some(None));
}

#[test]
fn stopped_as_optional_wraps_a_value() {
	assert_eq!(run(stopped_as_optional(just(3))), Some(Some(3)));
}
