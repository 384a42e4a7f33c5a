//! Topic-based event bus for runtime events.
//!
//! The clock worker publishes every [`fight_core::MatchEvent`] on the topic
//! it belongs to, and consumers subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
