//! Device sampling: raw key, button and axis edges into canonical actions.
//!
//! The sampler tracks which controls each player holds. Buttons produce an
//! action when pressed. Directions are folded into a single stick direction
//! relative to the player's facing, and an action is produced every time that
//! direction changes to something other than neutral.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::action::{Action, ActionKind, Control, Controls};
use crate::config::GameConfig;
use crate::state::{Facing, PlayerId, Tick};

/// Actions produced by a single device event.
pub type SampledActions = ArrayVec<Action, { GameConfig::MAX_ACTIONS_PER_EVENT }>;

/// A raw edge reported by an input device.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceInput {
    /// Keyboard key identified by its layout-independent code (`KeyW`, `ArrowUp`).
    Key { code: String, pressed: bool },
    /// Gamepad button edge. The pad index selects the player.
    PadButton { pad: usize, button: u8, pressed: bool },
    /// Gamepad axis position in `[-1, 1]`.
    PadAxis { pad: usize, axis: u8, value: f32 },
}

/// Device-to-control mapping for both players.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bindings {
    pub keys: BTreeMap<String, (PlayerId, Control)>,
    pub pad_buttons: BTreeMap<u8, Control>,
    pub horizontal_axis: u8,
    pub vertical_axis: u8,
    pub deadzone: f32,
}

impl Bindings {
    pub const DEFAULT_DEADZONE: f32 = 0.2;

    /// Bindings with no keys, the standard pad layout and the default dead-zone.
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
            pad_buttons: BTreeMap::new(),
            horizontal_axis: 0,
            vertical_axis: 1,
            deadzone: Self::DEFAULT_DEADZONE,
        }
    }

    pub fn bind_key(&mut self, code: impl Into<String>, player: PlayerId, control: Control) {
        self.keys.insert(code.into(), (player, control));
    }

    pub fn bind_pad_button(&mut self, button: u8, control: Control) {
        self.pad_buttons.insert(button, control);
    }

    pub fn key(&self, code: &str) -> Option<(PlayerId, Control)> {
        self.keys.get(code).copied()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        const P1: [(&str, Control); 8] = [
            ("KeyW", Control::Up),
            ("KeyS", Control::Down),
            ("KeyA", Control::Left),
            ("KeyD", Control::Right),
            ("KeyU", Control::Punch),
            ("KeyI", Control::Kick),
            ("KeyO", Control::Special),
            ("KeyP", Control::Block),
        ];
        const P2: [(&str, Control); 8] = [
            ("ArrowUp", Control::Up),
            ("ArrowDown", Control::Down),
            ("ArrowLeft", Control::Left),
            ("ArrowRight", Control::Right),
            ("Numpad1", Control::Punch),
            ("Numpad2", Control::Kick),
            ("Numpad3", Control::Special),
            ("Numpad4", Control::Block),
        ];

        let mut bindings = Self::empty();
        for (code, control) in P1 {
            bindings.bind_key(code, PlayerId::One, control);
        }
        for (code, control) in P2 {
            bindings.bind_key(code, PlayerId::Two, control);
        }
        bindings.bind_pad_button(0, Control::Punch);
        bindings.bind_pad_button(1, Control::Kick);
        bindings.bind_pad_button(2, Control::Special);
        bindings.bind_pad_button(3, Control::Block);
        bindings
    }
}

/// Per-player held controls plus the last resolved stick direction.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSampler {
    bindings: Bindings,
    held: [Controls; 2],
    stick: [Option<ActionKind>; 2],
}

impl InputSampler {
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            held: [Controls::empty(); 2],
            stick: [None; 2],
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Controls currently held by `player`.
    pub fn held(&self, player: PlayerId) -> Controls {
        self.held[player.index()]
    }

    /// Releases everything, e.g. between rounds.
    pub fn release_all(&mut self) {
        self.held = [Controls::empty(); 2];
        self.stick = [None; 2];
    }

    /// Applies one control edge for `player`.
    pub fn apply_control(
        &mut self,
        player: PlayerId,
        control: Control,
        pressed: bool,
        facing: Facing,
        tick: Tick,
    ) -> SampledActions {
        let mut out = SampledActions::new();
        let slot = player.index();
        let was_held = self.held[slot].contains(control.flag());
        self.held[slot].set(control.flag(), pressed);

        match control.button_action() {
            Some(kind) => {
                // Key repeat reports a press while already held.
                if pressed && !was_held {
                    out.push(Action::new(player, kind, tick));
                }
            }
            None => self.resample_stick(player, facing, tick, &mut out),
        }
        out
    }

    /// Maps a raw device edge through the bindings and applies it.
    ///
    /// `facings` holds the current facing of player one and player two.
    /// Unbound keys, buttons and axes produce nothing.
    pub fn apply_device(
        &mut self,
        input: &DeviceInput,
        facings: [Facing; 2],
        tick: Tick,
    ) -> SampledActions {
        match input {
            DeviceInput::Key { code, pressed } => match self.bindings.key(code) {
                Some((player, control)) => {
                    self.apply_control(player, control, *pressed, facings[player.index()], tick)
                }
                None => SampledActions::new(),
            },
            DeviceInput::PadButton {
                pad,
                button,
                pressed,
            } => {
                let player = PlayerId::from_index(*pad);
                let control = self.bindings.pad_buttons.get(button).copied();
                match (player, control) {
                    (Some(player), Some(control)) => {
                        self.apply_control(player, control, *pressed, facings[player.index()], tick)
                    }
                    _ => SampledActions::new(),
                }
            }
            DeviceInput::PadAxis { pad, axis, value } => {
                let Some(player) = PlayerId::from_index(*pad) else {
                    return SampledActions::new();
                };
                let (negative, positive) = if *axis == self.bindings.horizontal_axis {
                    (Control::Left, Control::Right)
                } else if *axis == self.bindings.vertical_axis {
                    (Control::Up, Control::Down)
                } else {
                    return SampledActions::new();
                };
                self.apply_axis(player, negative, positive, *value, facings[player.index()], tick)
            }
        }
    }

    fn apply_axis(
        &mut self,
        player: PlayerId,
        negative: Control,
        positive: Control,
        value: f32,
        facing: Facing,
        tick: Tick,
    ) -> SampledActions {
        let deadzone = self.bindings.deadzone;
        let held = &mut self.held[player.index()];
        held.set(negative.flag(), value < -deadzone);
        held.set(positive.flag(), value > deadzone);

        let mut out = SampledActions::new();
        self.resample_stick(player, facing, tick, &mut out);
        out
    }

    fn resample_stick(
        &mut self,
        player: PlayerId,
        facing: Facing,
        tick: Tick,
        out: &mut SampledActions,
    ) {
        let slot = player.index();
        let direction = stick_direction(self.held[slot], facing);
        if direction != self.stick[slot] {
            self.stick[slot] = direction;
            if let Some(kind) = direction {
                out.push(Action::new(player, kind, tick));
            }
        }
    }
}

/// Resolves held directional controls into one facing-relative direction.
///
/// Opposite directions cancel. Any upward component resolves to `Up`.
pub fn stick_direction(held: Controls, facing: Facing) -> Option<ActionKind> {
    let vertical = match (held.contains(Controls::UP), held.contains(Controls::DOWN)) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    };
    let absolute = match (held.contains(Controls::LEFT), held.contains(Controls::RIGHT)) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    };
    let relative = match facing {
        Facing::Right => absolute,
        Facing::Left => -absolute,
    };

    match (vertical, relative) {
        (-1, _) => Some(ActionKind::Up),
        (1, 1) => Some(ActionKind::DownForward),
        (1, -1) => Some(ActionKind::DownBack),
        (1, _) => Some(ActionKind::Down),
        (_, 1) => Some(ActionKind::Forward),
        (_, -1) => Some(ActionKind::Back),
        _ => None,
    }
}
