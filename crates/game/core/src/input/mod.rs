//! Input pipeline: device sampling, per-player history and special-move
//! recognition.
//!
//! Raw device edges go through [`InputSampler`] and come out as canonical
//! [`Action`]s. The match clock records them in the
//! [`InputSequenceMatcher`], which owns one bounded [`InputHistory`] per player.
mod action;
mod history;
mod matcher;
mod sampler;

pub use action::{Action, ActionKind, Control, Controls};
pub use history::{InputError, InputHistory};
pub use matcher::{BufferClearPolicy, InputSequenceMatcher, MovePattern};
pub use sampler::{Bindings, DeviceInput, InputSampler, SampledActions, stick_direction};
