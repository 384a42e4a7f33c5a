//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content lookup and action
//! providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use fight_content::ContentError;
use fight_core::PlayerId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a match setup before building")]
    MissingSetup,

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("clock worker command channel closed")]
    CommandChannelClosed,

    #[error("clock worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("clock worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("{player} action provider failed: {reason}")]
    ProviderFailed { player: PlayerId, reason: String },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("replay diverged at tick {tick}: expected digest {expected}, got {actual}")]
    ReplayDiverged {
        tick: u64,
        expected: String,
        actual: String,
    },
}
