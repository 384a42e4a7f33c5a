//! Kinematics for combatants: gravity, floor, stage walls and body push.

use super::CombatantState;
use crate::config::GameConfig;

/// Integrates one tick of motion for a single combatant.
pub fn integrate(combatant: &mut CombatantState, config: &GameConfig) {
    if !combatant.grounded {
        combatant.velocity.y += config.gravity;
    }
    combatant.position.x += combatant.velocity.x;
    combatant.position.y += combatant.velocity.y;

    if combatant.position.y >= config.ground_level {
        combatant.position.y = config.ground_level;
        combatant.velocity.y = 0.0;
        if !combatant.grounded {
            combatant.land();
        }
    }

    clamp_to_stage(combatant, config);
}

/// Pushes overlapping bodies apart, each by `push_factor` of the overlap.
///
/// Returns the distance each combatant was moved.
pub fn separate(a: &mut CombatantState, b: &mut CombatantState, config: &GameConfig) -> f32 {
    let overlap = a.hurtbox().horizontal_overlap(&b.hurtbox());
    if overlap <= 0.0 {
        return 0.0;
    }

    // Stacked exactly on top of each other: player one goes left.
    let direction = if b.position.x >= a.position.x { 1.0 } else { -1.0 };
    let push = overlap * config.push_factor;
    a.position.x -= push * direction;
    b.position.x += push * direction;

    clamp_to_stage(a, config);
    clamp_to_stage(b, config);
    push
}

pub fn clamp_to_stage(combatant: &mut CombatantState, config: &GameConfig) {
    combatant.position.x = combatant.position.x.clamp(0.0, config.stage_width);
}
