//! Replay verification.
//!
//! A match is reproducible from its setup and input log alone. Verification
//! re-simulates the log offline and compares state digests.

use fight_core::{InputLog, MatchSetup, MatchState};

use crate::api::{Result, RuntimeError};

/// Re-runs `log` from `setup` up to `expected.tick` and checks that the
/// result hashes to the same digest as `expected`.
///
/// Returns the matching digest.
pub fn verify_replay(setup: &MatchSetup, log: &InputLog, expected: &MatchState) -> Result<[u8; 32]> {
    let ticks = expected.tick.0;
    let replayed = fight_core::replay(setup.clone(), log, ticks);

    let expected_digest = expected.digest();
    let actual_digest = replayed.digest();
    if expected_digest != actual_digest {
        tracing::warn!(
            target: "runtime::replay",
            ticks,
            inputs = log.len(),
            "Replay diverged"
        );
        return Err(RuntimeError::ReplayDiverged {
            tick: ticks,
            expected: hex::encode(expected_digest),
            actual: hex::encode(actual_digest),
        });
    }

    tracing::debug!(
        target: "runtime::replay",
        ticks,
        inputs = log.len(),
        digest = %hex::encode(actual_digest),
        "Replay verified"
    );
    Ok(actual_digest)
}
