//! Drive a task tree to completion.

use core::pin::Pin;
use std::cell::RefCell;
use std::panic::resume_unwind;
use std::rc::Rc;
use std::thread;

use ravel::{Awaiter, Callback, ChainContext, Context, EventLoop, Outcome, Step, StopSource, Task, Work};

struct RootChain<A: Awaiter> {
	event_loop: EventLoop,
	chain: ChainContext,
	awaiter: RefCell<Pin<Box<A>>>,
	outcome: RefCell<Option<Outcome<A::Output>>>,
}

impl<A: Awaiter> RootChain<A> {
	fn poll_root(&self) {
		if self.outcome.borrow().is_some() {
			// A wake-up scheduled before completion may still arrive.
			return;
		}
		let mut awaiter = self.awaiter.borrow_mut();
		let cx = Context::new(&self.event_loop, &self.chain);
		if let Step::Ready(outcome) = awaiter.as_mut().poll(&cx) {
			*self.outcome.borrow_mut() = Some(outcome);
		}
	}
}

/// Runs `task` on a fresh event loop until it completes.
///
/// **Returns** `Some(value)` on the value channel and [`None`] when the
/// task was stopped; a captured panic is resumed here. The calling thread
/// sleeps between turns whenever the loop reports a timer deadline to wait
/// for.
pub fn run<T>(task: T) -> Option<T::Output>
where
	T: Task,
	T::Output: 'static,
	<T::Work as Work>::Awaiter: 'static,
{
	let event_loop = EventLoop::new();
	let root_source = StopSource::new();
	let awaiter = Box::pin(task.into_work().into_awaiter());
	let root = Rc::new_cyclic(|weak| {
		let weak = weak.clone();
		RootChain {
			event_loop: event_loop.clone(),
			chain: ChainContext::new(
				root_source.token(),
				Callback::new(move || {
					if let Some(root) = weak.upgrade() {
						RootChain::poll_root(&root);
					}
				}),
			),
			awaiter: RefCell::new(awaiter),
			outcome: RefCell::new(None),
		}
	});

	root.poll_root();
	while root.outcome.borrow().is_none() {
		if let Some(sleep) = event_loop.turn() {
			thread::sleep(sleep);
		}
	}

	let outcome = root
		.outcome
		.borrow_mut()
		.take()
		.expect("completed without an outcome");
	log::debug!("run: task finished: {:?}", outcome_kind(&outcome));
	match outcome {
		Outcome::Value(value) => Some(value),
		Outcome::Stopped => None,
		Outcome::Panicked(payload) => resume_unwind(payload),
	}
}

fn outcome_kind<T>(outcome: &Outcome<T>) -> &'static str {
	match outcome {
		Outcome::Value(_) => "value",
		Outcome::Panicked(_) => "panic",
		Outcome::Stopped => "stopped",
	}
}
