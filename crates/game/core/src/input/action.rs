use bitflags::bitflags;

use crate::state::{PlayerId, Tick};

/// Canonical input token recorded in a player's history.
///
/// Directions are relative to the player's facing except `Left`/`Right`, which
/// are absolute and only used by walking. Patterns are written in the relative
/// vocabulary (`Forward`, `DownBack`, ...).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActionKind {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Back,
    DownForward,
    DownBack,
    Punch,
    Kick,
    Special,
    Block,
}

impl ActionKind {
    /// Attack buttons that can start a move.
    #[inline]
    pub const fn is_attack_button(self) -> bool {
        matches!(self, Self::Punch | Self::Kick | Self::Special)
    }

    #[inline]
    pub const fn is_direction(self) -> bool {
        !matches!(self, Self::Punch | Self::Kick | Self::Special | Self::Block)
    }

    /// Whether the direction carries a component towards the opponent.
    #[inline]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward | Self::DownForward)
    }
}

/// A single recorded input. Immutable once recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub player: PlayerId,
    pub kind: ActionKind,
    pub timestamp: Tick,
}

impl Action {
    pub const fn new(player: PlayerId, kind: ActionKind, timestamp: Tick) -> Self {
        Self {
            player,
            kind,
            timestamp,
        }
    }
}

/// One physical control of a player's pad, independent of the device.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Punch,
    Kick,
    Special,
    Block,
}

impl Control {
    pub const fn flag(self) -> Controls {
        match self {
            Self::Up => Controls::UP,
            Self::Down => Controls::DOWN,
            Self::Left => Controls::LEFT,
            Self::Right => Controls::RIGHT,
            Self::Punch => Controls::PUNCH,
            Self::Kick => Controls::KICK,
            Self::Special => Controls::SPECIAL,
            Self::Block => Controls::BLOCK,
        }
    }

    /// Action emitted when this button is pressed; `None` for directions,
    /// which are resolved together into a stick direction.
    pub const fn button_action(self) -> Option<ActionKind> {
        match self {
            Self::Punch => Some(ActionKind::Punch),
            Self::Kick => Some(ActionKind::Kick),
            Self::Special => Some(ActionKind::Special),
            Self::Block => Some(ActionKind::Block),
            Self::Up | Self::Down | Self::Left | Self::Right => None,
        }
    }
}

bitflags! {
    /// Controls currently held by one player.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Controls: u8 {
        const UP      = 1 << 0;
        const DOWN    = 1 << 1;
        const LEFT    = 1 << 2;
        const RIGHT   = 1 << 3;
        const PUNCH   = 1 << 4;
        const KICK    = 1 << 5;
        const SPECIAL = 1 << 6;
        const BLOCK   = 1 << 7;

        const DIRECTIONS = Self::UP.bits() | Self::DOWN.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}
