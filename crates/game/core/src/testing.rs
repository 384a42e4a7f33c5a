//! Shared fixtures for unit tests.

use crate::combat::{CharacterConfig, Lunge, MoveDefinition, NormalBinding, Rect};
use crate::input::ActionKind::{self, *};

fn normal(name: &str, damage: u32, frames: [u32; 3], hitbox: Rect, knockback: f32) -> MoveDefinition {
    MoveDefinition {
        name: name.to_owned(),
        damage,
        meter_cost: 0,
        startup_ticks: frames[0],
        active_ticks: frames[1],
        recovery_ticks: frames[2],
        hitbox,
        knockback,
        input: None,
        lunge: None,
    }
}

fn special(
    name: &str,
    damage: u32,
    meter_cost: u32,
    frames: [u32; 3],
    hitbox: Rect,
    knockback: f32,
    input: &[ActionKind],
) -> MoveDefinition {
    MoveDefinition {
        meter_cost,
        input: Some(input.to_vec()),
        ..normal(name, damage, frames, hitbox, knockback)
    }
}

fn bind(button: ActionKind, with: Option<ActionKind>, move_name: &str) -> NormalBinding {
    NormalBinding {
        button,
        with,
        move_name: move_name.to_owned(),
    }
}

/// Mia with the shared normal table.
pub(crate) fn fighter() -> CharacterConfig {
    let mut surfer_kick = special(
        "surfer_kick",
        18,
        35,
        [6, 4, 15],
        Rect::new(0.0, -60.0, 100.0, 120.0),
        15.0,
        &[Down, DownBack, Back, Kick],
    );
    surfer_kick.lunge = Some(Lunge {
        speed: 15.0,
        ticks: 24,
    });

    CharacterConfig {
        id: "mia".to_owned(),
        name: "Mia".to_owned(),
        max_health: 100,
        max_meter: 100,
        walk_speed: 6.0,
        jump_force: -16.0,
        hurtbox: Rect::new(-30.0, -60.0, 60.0, 120.0),
        normals: vec![
            normal("light_punch", 5, [3, 2, 5], Rect::new(10.0, -50.0, 60.0, 40.0), 5.0),
            normal("heavy_punch", 10, [5, 3, 8], Rect::new(10.0, -60.0, 80.0, 50.0), 8.0),
            normal("light_kick", 7, [4, 3, 6], Rect::new(5.0, -30.0, 70.0, 60.0), 6.0),
            normal("heavy_kick", 12, [6, 4, 10], Rect::new(5.0, -40.0, 90.0, 80.0), 10.0),
        ],
        specials: vec![
            special(
                "tide_wave",
                15,
                25,
                [8, 5, 12],
                Rect::new(0.0, -40.0, 120.0, 80.0),
                12.0,
                &[Down, DownForward, Forward, Punch],
            ),
            surfer_kick,
            special(
                "water_dance",
                30,
                50,
                [10, 8, 20],
                Rect::new(-100.0, -100.0, 200.0, 200.0),
                20.0,
                &[Down, Down, Up, Special],
            ),
        ],
        bindings: vec![
            bind(Punch, None, "light_punch"),
            bind(Punch, Some(Forward), "heavy_punch"),
            bind(Kick, None, "light_kick"),
            bind(Kick, Some(Forward), "heavy_kick"),
        ],
    }
}
