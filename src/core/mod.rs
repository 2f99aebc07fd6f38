//! Core runtime services
//!
//! Frame clock, deferred task queue, and the pool event queue.

mod events;
mod scheduler;
mod time;

pub use events::{EventQueue, PoolEvent};
pub use scheduler::DeferredQueue;
pub use time::Time;
