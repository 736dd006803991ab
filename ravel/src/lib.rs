#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]
//!
//! # Threading notes
//!
//! Please note that *nothing* in this crate is [`Send`] or [`Sync`]: one
//! thread owns the event loop, every callback and every awaiter, which is
//! what makes the runtime free of data races by construction.

pub mod callback;
pub mod context;
pub mod event_loop;
pub mod ready_queue;
pub mod stop;
pub mod task;
pub mod timer_queue;

pub use callback::Callback;
pub use context::{ChainContext, Context};
pub use event_loop::EventLoop;
pub use stop::{StopCallback, StopSource, StopToken};
pub use task::{Awaiter, Outcome, PanicPayload, Step, Task, Work};
pub use timer_queue::TimerKey;

#[doc = include_str!("../README.md")]
mod readme {}
