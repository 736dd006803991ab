#![warn(clippy::pedantic)]
#![doc = include_str!("../README.md")]

mod arm;
mod deadline;

pub mod and_then;
pub mod cast;
pub mod event;
pub mod just;
pub mod mutex;
pub mod noop;
pub mod run;
pub mod sleep;
pub mod stop_when;
pub mod stopped;
pub mod then;
pub mod wait_all;
pub mod wait_any;
pub mod wait_for;
pub mod yield_now;

pub use ravel::{
	Awaiter, Callback, ChainContext, Context, EventLoop, Outcome, PanicPayload, Step, StopCallback,
	StopSource, StopToken, Task, TimerKey, Work,
};

pub use and_then::{and_then, AndThen};
pub use cast::{cast_result, CastResult};
pub use event::{Event, EventWait};
pub use just::{just, just_panic, just_stopped, Just, JustPanic, JustStopped};
pub use mutex::{Lock, Mutex, MutexGuard};
pub use noop::{noop, Noop};
pub use run::run;
pub use sleep::{sleep_for, suspend_forever, Sleep, SuspendForever};
pub use stop_when::{stop_when, StopWhen};
pub use stopped::{stopped_as_optional, StoppedAsOptional};
pub use then::{then, Then};
pub use wait_all::{wait_all, WaitAllList};
pub use wait_any::{wait_any, WaitAnyList, WaitAnyResult};
pub use wait_for::{wait_for, WaitFor};
pub use yield_now::{yield_now, YieldNow};
