use crate::input::BufferClearPolicy;

/// Game configuration constants and tunable parameters.
///
/// Everything here is counted in simulation ticks or stage units. Nothing in
/// the core reads a wall clock.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Simulation ticks per second. Only used to convert durations for display.
    pub tick_rate: u32,

    /// Ticks after which a recorded input is too old to take part in a pattern.
    pub input_ttl_ticks: u64,
    /// What happens to the input history once a special move is recognized.
    pub clear_policy: BufferClearPolicy,

    /// Ticks a combatant stays in `Hurt` after being hit.
    pub hurt_stun_ticks: u32,
    /// Length of the post-hit invulnerability window.
    pub invulnerability_ticks: u32,
    /// Share of nominal damage that gets through a block, in percent.
    pub block_damage_percent: u32,
    /// Ticks without a landed hit after which the combo counter resets.
    pub combo_window_ticks: u32,
    /// Meter awarded to the attacker for a landed hit.
    pub meter_gain_on_hit: u32,
    /// Meter awarded to the defender for taking a hit.
    pub meter_gain_on_hurt: u32,

    /// Downward acceleration applied to airborne combatants each tick.
    pub gravity: f32,
    /// Y coordinate of the floor (screen space, y grows downwards).
    pub ground_level: f32,
    /// Width of the stage; combatants are clamped to `[0, stage_width]`.
    pub stage_width: f32,
    /// Share of the body overlap each combatant is pushed back by.
    pub push_factor: f32,
    /// Spawn x coordinates for player one and player two.
    pub spawn_x: [f32; 2],

    /// Length of a round in ticks (99 seconds at 60 ticks per second).
    pub round_ticks: u32,
    /// Round wins needed to take the match.
    pub rounds_to_win: u8,
    /// Pause between the end of a round and the reset for the next one.
    pub round_intermission_ticks: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Capacity of each player's input history.
    pub const HISTORY_CAPACITY: usize = 10;
    /// Number of combatants in a match.
    pub const MAX_COMBATANTS: usize = 2;
    /// Upper bound on the actions a single input event can expand into.
    pub const MAX_ACTIONS_PER_EVENT: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_RATE: u32 = 60;
    pub const DEFAULT_INPUT_TTL_TICKS: u64 = 10;
    pub const DEFAULT_HURT_STUN_TICKS: u32 = 20;
    pub const DEFAULT_INVULNERABILITY_TICKS: u32 = 60;
    pub const DEFAULT_BLOCK_DAMAGE_PERCENT: u32 = 20;
    pub const DEFAULT_COMBO_WINDOW_TICKS: u32 = 90;
    pub const DEFAULT_METER_GAIN_ON_HIT: u32 = 10;
    pub const DEFAULT_METER_GAIN_ON_HURT: u32 = 5;
    pub const DEFAULT_GRAVITY: f32 = 0.8;
    pub const DEFAULT_GROUND_LEVEL: f32 = 620.0;
    pub const DEFAULT_STAGE_WIDTH: f32 = 1280.0;
    pub const DEFAULT_PUSH_FACTOR: f32 = 0.5;
    pub const DEFAULT_ROUND_TICKS: u32 = 99 * Self::DEFAULT_TICK_RATE;
    pub const DEFAULT_ROUNDS_TO_WIN: u8 = 1;
    pub const DEFAULT_ROUND_INTERMISSION_TICKS: u32 = 120;

    pub fn new() -> Self {
        Self {
            tick_rate: Self::DEFAULT_TICK_RATE,
            input_ttl_ticks: Self::DEFAULT_INPUT_TTL_TICKS,
            clear_policy: BufferClearPolicy::default(),
            hurt_stun_ticks: Self::DEFAULT_HURT_STUN_TICKS,
            invulnerability_ticks: Self::DEFAULT_INVULNERABILITY_TICKS,
            block_damage_percent: Self::DEFAULT_BLOCK_DAMAGE_PERCENT,
            combo_window_ticks: Self::DEFAULT_COMBO_WINDOW_TICKS,
            meter_gain_on_hit: Self::DEFAULT_METER_GAIN_ON_HIT,
            meter_gain_on_hurt: Self::DEFAULT_METER_GAIN_ON_HURT,
            gravity: Self::DEFAULT_GRAVITY,
            ground_level: Self::DEFAULT_GROUND_LEVEL,
            stage_width: Self::DEFAULT_STAGE_WIDTH,
            push_factor: Self::DEFAULT_PUSH_FACTOR,
            spawn_x: [400.0, 880.0],
            round_ticks: Self::DEFAULT_ROUND_TICKS,
            rounds_to_win: Self::DEFAULT_ROUNDS_TO_WIN,
            round_intermission_ticks: Self::DEFAULT_ROUND_INTERMISSION_TICKS,
        }
    }

    pub fn with_round_ticks(mut self, round_ticks: u32) -> Self {
        self.round_ticks = round_ticks;
        self
    }

    pub fn with_rounds_to_win(mut self, rounds_to_win: u8) -> Self {
        self.rounds_to_win = rounds_to_win.max(1);
        self
    }

    pub fn with_clear_policy(mut self, clear_policy: BufferClearPolicy) -> Self {
        self.clear_policy = clear_policy;
        self
    }

    /// Highest number of rounds a match can last before it is decided on wins.
    pub fn max_rounds(&self) -> u8 {
        self.rounds_to_win.max(1).saturating_mul(2).saturating_sub(1)
    }

    /// Converts a tick count into whole seconds, rounding up (HUD timer).
    pub fn ticks_to_seconds(&self, ticks: u32) -> u32 {
        let rate = self.tick_rate.max(1);
        ticks.div_ceil(rate)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
