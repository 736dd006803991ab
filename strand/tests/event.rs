use strand::{and_then, run, then, wait_all, yield_now, Event};

use _validator::Validator;

#[test]
fn notify_one_without_waiters_reports_false() {
	let event = Event::new();
	assert!(!event.notify_one());
	assert_eq!(event.notify_all(), 0);
}

#[test]
fn notify_all_wakes_every_waiter_in_fifo_order() {
	let v: Validator<&str> = Validator::new();
	let event = Event::new();
	let first = then(event.wait(), {
		let v = v.clone();
		move |()| v.push("first")
	});
	let second = then(event.wait(), {
		let v = v.clone();
		move |()| v.push("second")
	});
	let notifier = then(yield_now(), {
		let event = event.clone();
		let v = v.clone();
		move |()| {
			v.push("notify all");
			assert_eq!(event.notify_all(), 2);
		}
	});
	assert_eq!(run(wait_all((first, second, notifier))), Some(((), (), ())));
	v.expect(["notify all", "first", "second"]);
}

#[test]
fn notify_one_wakes_the_longest_waiter_first() {
	let v: Validator<&str> = Validator::new();
	let event = Event::new();
	let first = then(event.wait(), {
		let v = v.clone();
		move |()| v.push("first")
	});
	let second = then(event.wait(), {
		let v = v.clone();
		move |()| v.push("second")
	});
	let notifier = and_then(
		then(yield_now(), {
			let event = event.clone();
			let v = v.clone();
			move |()| {
				v.push("notify 1");
				assert!(event.notify_one());
			}
		}),
		{
			let event = event.clone();
			let v = v.clone();
			move |()| {
				then(yield_now(), move |()| {
					v.push("notify 2");
					assert!(event.notify_one());
				})
			}
		},
	);
	assert_eq!(run(wait_all((first, second, notifier))), Some(((), (), ())));
	v.expect(["notify 1", "first", "notify 2", "second"]);
}
