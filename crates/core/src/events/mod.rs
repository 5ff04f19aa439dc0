//! Change events module.
//!
//! Provides the change-event envelope emitted after successful mutations and
//! the dispatcher that forwards events, best-effort, to an external audit
//! sink. Dispatch failure never affects the mutation that produced the event.

mod change_event;
mod dispatcher;

pub use change_event::*;
pub use dispatcher::*;
