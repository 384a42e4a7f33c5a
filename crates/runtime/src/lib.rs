//! Runtime orchestration for the fixed-rate match simulation.
//!
//! This crate wires together the action provider abstraction, the match
//! clock and its worker task into a cohesive runtime API. Consumers embed
//! [`Runtime`] to drive a match, subscribe to events, and feed inputs through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] ships CPU and scripted input sources
//! - [`replay`] verifies that an input log reproduces a match
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod replay;
pub mod runtime;
pub mod setup;

mod workers;

pub use api::{ActionProvider, IdleProvider, Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, Topic};
pub use providers::{CpuIntent, CpuProvider, ScriptedProvider};
pub use replay::verify_replay;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use setup::match_setup;
