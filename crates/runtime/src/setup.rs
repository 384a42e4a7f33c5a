//! Match assembly from loaded content.

use fight_content::Roster;
use fight_core::{GameConfig, MatchMode, MatchSetup};

use crate::api::Result;

/// Builds a [`MatchSetup`] for two roster characters.
pub fn match_setup(
    roster: &Roster,
    config: GameConfig,
    p1: &str,
    p2: &str,
    mode: MatchMode,
) -> Result<MatchSetup> {
    let p1 = roster.get(p1)?.clone();
    let p2 = roster.get(p2)?.clone();
    Ok(MatchSetup::new(config, p1, p2).with_mode(mode))
}
