//! Worker tasks that back the runtime orchestration.
//!
//! The clock worker owns the match and is the only task that mutates it.

mod clock;

pub use clock::{ClockWorker, Command};
