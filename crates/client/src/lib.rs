//! Top-level client that assembles content, runtime and CPU players.
//!
//! ```text
//! Client
//!   ├─→ Content (roster + rules, built-in or from a data directory)
//!   ├─→ Runtime (match clock worker and event bus)
//!   └─→ Announcer (logs round flow from the Match topic)
//! ```

mod builder;
pub mod config;
pub mod logging;

pub use builder::ClientBuilder;
pub use config::ClientConfig;

use std::time::Duration;

use anyhow::Result;
use fight_core::{MatchEvent, MatchMode, MatchResult, MatchState, PlayerId};
use runtime::{Runtime, RuntimeHandle, Topic, verify_replay};
use tokio::sync::broadcast::error::RecvError;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. [`Client::builder`] loads content and spawns the runtime worker
/// 2. [`Client::run`] starts the announcer and drives the match to its end
/// 3. The input log is replayed and checked against the final state
/// 4. Workers are shut down and a [`MatchSummary`] is returned
pub struct Client {
    runtime: Runtime,
    max_ticks: u64,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Run the match to completion and verify its replay.
    pub async fn run(self) -> Result<MatchSummary> {
        let handle = self.runtime.handle();
        let announcer = tokio::spawn(announce(handle.clone()));

        let mut runtime = self.runtime;
        runtime.run(self.max_ticks).await?;
        // Log and state from one worker turn, so the summary describes the
        // state the digest was taken from.
        let (log, state) = handle.record().await?;
        let digest = verify_replay(runtime.setup(), &log, &state)?;
        let inputs = log.len();

        drop(handle);
        runtime.shutdown().await?;
        // Outstanding handle clones keep the bus open.
        let mut announcer = announcer;
        if tokio::time::timeout(Duration::from_millis(250), &mut announcer)
            .await
            .is_err()
        {
            announcer.abort();
        }

        let summary = MatchSummary::new(&state, inputs, digest);
        tracing::info!(
            result = ?summary.result,
            ticks = summary.ticks,
            digest = %summary.digest,
            "Match finished"
        );
        Ok(summary)
    }
}

/// Outcome of one client run.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSummary {
    pub mode: MatchMode,
    pub ticks: u64,
    pub rounds: u8,
    pub round_wins: [u8; 2],
    pub health: [u32; 2],
    /// `None` when the tick limit hit first.
    pub result: Option<MatchResult>,
    pub inputs: usize,
    /// Hex-encoded digest of the final state.
    pub digest: String,
}

impl MatchSummary {
    fn new(state: &MatchState, inputs: usize, digest: [u8; 32]) -> Self {
        Self {
            mode: state.mode,
            ticks: state.tick.0,
            rounds: state.round,
            round_wins: state.round_wins,
            health: PlayerId::ALL.map(|player| state.combatant(player).health),
            result: state.result,
            inputs,
            digest: hex::encode(digest),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let result = match self.result {
            Some(MatchResult::Winner(PlayerId::One)) => "p1",
            Some(MatchResult::Winner(PlayerId::Two)) => "p2",
            Some(MatchResult::Draw) => "draw",
            None => "unfinished",
        };
        serde_json::json!({
            "mode": self.mode.as_ref(),
            "ticks": self.ticks,
            "rounds": self.rounds,
            "round_wins": self.round_wins,
            "health": self.health,
            "result": result,
            "inputs": self.inputs,
            "digest": self.digest,
        })
    }
}

/// Logs round flow until the event bus closes.
async fn announce(handle: RuntimeHandle) {
    let mut flow = handle.subscribe(Topic::Match);
    let mut combat = handle.subscribe(Topic::Combat);
    drop(handle);

    loop {
        let received = tokio::select! {
            event = flow.recv() => event,
            event = combat.recv() => event,
        };
        let event = match received {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Announcer lagged behind the event bus");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match event.event {
            MatchEvent::RoundStarted { round } => {
                tracing::info!(tick = event.tick.0, round, "Round start");
            }
            MatchEvent::RoundEnded { round, result } => {
                tracing::info!(tick = event.tick.0, round, ?result, "Round over");
            }
            MatchEvent::Hit(outcome) => {
                tracing::debug!(
                    tick = event.tick.0,
                    attacker = ?outcome.attacker,
                    move_name = %outcome.move_name,
                    damage = outcome.damage_dealt,
                    blocked = outcome.was_blocked,
                    "Hit"
                );
            }
            _ => {}
        }
    }
}
