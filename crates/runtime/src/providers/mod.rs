//! Action provider implementations for non-human players.

pub mod cpu;
pub mod scripted;

pub use cpu::{CpuIntent, CpuProvider};
pub use scripted::ScriptedProvider;
