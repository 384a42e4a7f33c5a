//! Fixed-rate match clock.
//!
//! The [`MatchClock`] is the authoritative driver for a [`MatchState`]. It
//! owns the input pipeline, the hit resolver and the listeners, and advances
//! the simulation one tick at a time. Each tick runs the same ordered steps:
//!
//! 0. drain queued inputs, sample, record, match specials and apply commands
//! 1. count the round timer down
//! 2. advance combatant timers and integrate physics
//! 3. resolve hits for both ordered pairs
//! 4. check for a knockout or a timeout
//!
//! Nothing in here reads a wall clock; the caller decides when to tick.

mod command;
mod events;
mod replay;

pub use command::{Command, CommandError};
pub use events::{MatchEvent, MatchListener, TickReport};
pub use replay::{InputEvent, InputLog, LoggedInput, replay};

use std::collections::VecDeque;

use crate::combat::{CharacterConfig, HitResolver};
use crate::combatant::{CombatantState, MovementState, TransitionError, physics};
use crate::config::GameConfig;
use crate::input::{
    ActionKind, Bindings, Control, Controls, DeviceInput, InputSampler, InputSequenceMatcher,
    stick_direction,
};
use crate::state::{Facing, MatchMode, MatchPhase, MatchResult, MatchState, PlayerId, Tick, Vec2};

/// Everything needed to start (or replay) a match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSetup {
    pub config: GameConfig,
    pub characters: [CharacterConfig; GameConfig::MAX_COMBATANTS],
    pub mode: MatchMode,
    pub bindings: Bindings,
}

impl MatchSetup {
    pub fn new(config: GameConfig, p1: CharacterConfig, p2: CharacterConfig) -> Self {
        Self {
            config,
            characters: [p1, p2],
            mode: MatchMode::default(),
            bindings: Bindings::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }
}

/// An input waiting for its tick.
#[derive(Clone, Debug)]
struct QueuedInput {
    tick: Tick,
    event: InputEvent,
}

/// Continuous intents gathered while draining a player's inputs.
#[derive(Clone, Copy, Debug, Default)]
struct TickIntent {
    walk: Option<f32>,
    block: bool,
    direction: Option<ActionKind>,
}

/// Owns a match and advances it tick by tick.
pub struct MatchClock {
    setup: MatchSetup,
    state: MatchState,
    sampler: InputSampler,
    matcher: InputSequenceMatcher,
    resolver: HitResolver,
    pending: VecDeque<QueuedInput>,
    log: InputLog,
    listeners: Vec<Box<dyn MatchListener>>,
}

impl MatchClock {
    pub fn new(setup: MatchSetup) -> Self {
        let config = &setup.config;
        let combatants = PlayerId::ALL.map(|player| {
            CombatantState::new(
                player,
                &setup.characters[player.index()],
                spawn_point(config, player),
                spawn_facing(player),
            )
        });
        let round_ticks = match setup.mode {
            MatchMode::Versus => config.round_ticks,
            MatchMode::Training => 0,
        };

        let mut matcher = InputSequenceMatcher::from_config(config);
        for player in PlayerId::ALL {
            matcher.set_patterns(player, setup.characters[player.index()].patterns());
        }

        let mut clock = Self {
            state: MatchState::new(setup.mode, combatants, round_ticks),
            sampler: InputSampler::new(setup.bindings.clone()),
            matcher,
            resolver: HitResolver::new(),
            pending: VecDeque::new(),
            log: InputLog::new(),
            listeners: Vec::new(),
            setup,
        };
        clock.apply_mode_rules();
        clock
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> MatchState {
        self.state.clone()
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn config(&self) -> &GameConfig {
        &self.setup.config
    }

    pub fn matcher(&self) -> &InputSequenceMatcher {
        &self.matcher
    }

    pub fn held(&self, player: PlayerId) -> Controls {
        self.sampler.held(player)
    }

    pub fn input_log(&self) -> &InputLog {
        &self.log
    }

    pub fn take_input_log(&mut self) -> InputLog {
        std::mem::take(&mut self.log)
    }

    pub fn add_listener(&mut self, listener: Box<dyn MatchListener>) {
        self.listeners.push(listener);
    }

    // ========================================================================
    // Ingress
    // ========================================================================

    /// Queues an input for `tick`. Inputs for a tick that already passed are
    /// applied on the next processed tick.
    pub fn submit(&mut self, tick: Tick, event: InputEvent) {
        self.pending.push_back(QueuedInput { tick, event });
    }

    pub fn submit_action(&mut self, player: PlayerId, kind: ActionKind, tick: Tick) {
        self.submit(tick, InputEvent::Action { player, kind });
    }

    pub fn submit_control(&mut self, player: PlayerId, control: Control, pressed: bool, tick: Tick) {
        self.submit(
            tick,
            InputEvent::Control {
                player,
                control,
                pressed,
            },
        );
    }

    pub fn submit_raw(&mut self, input: DeviceInput, tick: Tick) {
        self.submit(tick, InputEvent::Device(input));
    }

    /// Starts the named move for `player` on the next processed tick.
    pub fn perform(&mut self, player: PlayerId, name: impl Into<String>) {
        let tick = self.state.tick;
        self.submit(
            tick,
            InputEvent::Perform {
                player,
                name: name.into(),
            },
        );
    }

    // ========================================================================
    // Pause
    // ========================================================================

    /// Suspends or resumes tick processing. Returns whether the flag changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.state.is_paused == paused {
            return false;
        }
        self.state.is_paused = paused;
        let event = if paused {
            MatchEvent::Paused
        } else {
            MatchEvent::Resumed
        };
        events::dispatch(&mut self.listeners, self.state.tick, &[event]);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.state.is_paused;
        self.set_paused(paused);
        paused
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Processes one tick and returns what happened.
    ///
    /// Does nothing while paused or after the match finished.
    pub fn tick(&mut self) -> TickReport {
        let now = self.state.tick;
        if self.state.is_paused || self.state.is_over() {
            return TickReport {
                tick: now,
                advanced: false,
                events: Vec::new(),
            };
        }

        let mut events = Vec::new();
        match self.state.phase {
            MatchPhase::Fighting => self.fight(now, &mut events),
            MatchPhase::RoundOver { resume_in } => self.intermission(now, resume_in, &mut events),
            MatchPhase::Finished => {}
        }
        self.state.tick = now.next();

        events::dispatch(&mut self.listeners, now, &events);
        TickReport {
            tick: now,
            advanced: true,
            events,
        }
    }

    fn fight(&mut self, now: Tick, events: &mut Vec<MatchEvent>) {
        // 0. inputs
        let intents = self.drain_inputs(now, events);
        self.apply_intents(&intents, events);
        self.flush_transitions(events);

        // 1. timer
        if self.state.mode == MatchMode::Versus {
            self.state.remaining_ticks = self.state.remaining_ticks.saturating_sub(1);
        }

        // 2. timers and physics
        self.advance_combatants();
        self.flush_transitions(events);

        // 3. hits
        let outcomes = self
            .resolver
            .resolve_exchange(&mut self.state.combatants, &self.setup.config);
        events.extend(outcomes.into_iter().map(MatchEvent::Hit));
        self.flush_transitions(events);

        // 4. knockout / timeout
        if self.state.mode == MatchMode::Versus {
            self.check_round_end(events);
            self.flush_transitions(events);
        }
    }

    fn drain_inputs(&mut self, now: Tick, events: &mut Vec<MatchEvent>) -> [TickIntent; 2] {
        let mut intents = [TickIntent::default(); 2];

        let (due, later): (VecDeque<_>, VecDeque<_>) =
            self.pending.drain(..).partition(|input| input.tick <= now);
        self.pending = later;

        for QueuedInput { event, .. } in due {
            self.log.push(now, event.clone());
            match event {
                InputEvent::Action { player, kind } => {
                    self.handle_action(player, kind, now, &mut intents, events)
                }
                InputEvent::Control {
                    player,
                    control,
                    pressed,
                } => {
                    let facing = self.state.combatant(player).facing;
                    let actions = self
                        .sampler
                        .apply_control(player, control, pressed, facing, now);
                    for action in actions {
                        self.handle_action(action.player, action.kind, now, &mut intents, events);
                    }
                }
                InputEvent::Device(input) => {
                    let facings = self.state.combatants.each_ref().map(|c| c.facing);
                    let actions = self.sampler.apply_device(&input, facings, now);
                    for action in actions {
                        self.handle_action(action.player, action.kind, now, &mut intents, events);
                    }
                }
                InputEvent::Perform { player, name } => {
                    self.run(player, Command::perform(name), events);
                }
            }
        }
        intents
    }

    fn handle_action(
        &mut self,
        player: PlayerId,
        kind: ActionKind,
        now: Tick,
        intents: &mut [TickIntent; 2],
        events: &mut Vec<MatchEvent>,
    ) {
        if let Err(error) = self.matcher.record(player, kind, now) {
            events.push(MatchEvent::InputRejected {
                player,
                action: kind,
                error,
            });
            return;
        }

        let facing = self.state.combatant(player).facing;
        let intent = &mut intents[player.index()];
        match kind {
            ActionKind::Up => {
                self.run(player, Command::Jump, events);
            }
            ActionKind::Left => intent.walk = Some(-1.0),
            ActionKind::Right => intent.walk = Some(1.0),
            ActionKind::Forward => {
                intent.walk = Some(facing.sign());
                intent.direction = Some(kind);
            }
            ActionKind::Back => {
                intent.walk = Some(-facing.sign());
                intent.direction = Some(kind);
            }
            ActionKind::Down | ActionKind::DownForward | ActionKind::DownBack => {
                intent.direction = Some(kind);
            }
            ActionKind::Block => intent.block = true,
            ActionKind::Punch | ActionKind::Kick | ActionKind::Special => {
                let held = intent
                    .direction
                    .or_else(|| stick_direction(self.sampler.held(player), facing));
                self.press_attack(player, kind, held, now, events);
            }
        }
    }

    /// An attack button: a recognized special wins over the bound normal.
    fn press_attack(
        &mut self,
        player: PlayerId,
        button: ActionKind,
        held: Option<ActionKind>,
        now: Tick,
        events: &mut Vec<MatchEvent>,
    ) {
        if let Some(name) = self.matcher.match_special(player, now) {
            events.push(MatchEvent::SpecialRecognized {
                player,
                name: name.clone(),
            });
            if self.run(player, Command::Special { name }, events) {
                self.matcher.confirm_executed(player);
            }
            return;
        }

        let normal = self.setup.characters[player.index()]
            .normal_for(button, held)
            .map(|definition| definition.name.clone());
        if let Some(name) = normal {
            self.run(player, Command::Attack { name }, events);
        }
    }

    /// Executes a command, reporting a rejection as an event.
    fn run(&mut self, player: PlayerId, command: Command, events: &mut Vec<MatchEvent>) -> bool {
        match self.execute(player, &command) {
            Ok(()) => true,
            Err(error) => {
                events.push(MatchEvent::CommandRejected {
                    player,
                    command,
                    error,
                });
                false
            }
        }
    }

    fn execute(&mut self, player: PlayerId, command: &Command) -> Result<(), CommandError> {
        let character = &self.setup.characters[player.index()];
        let combatant = &mut self.state.combatants[player.index()];
        let unknown = |name: &str| CommandError::UnknownMove {
            name: name.to_owned(),
        };

        match command {
            Command::Attack { name } => {
                let definition = character
                    .normals
                    .iter()
                    .find(|definition| &definition.name == name)
                    .ok_or_else(|| unknown(name))?;
                combatant.begin_attack(definition)?;
            }
            Command::Special { name } => {
                let definition = character.special(name).ok_or_else(|| unknown(name))?;
                combatant.begin_special(definition)?;
            }
            Command::Perform { name } => {
                let definition = character.find_move(name).ok_or_else(|| unknown(name))?;
                if definition.is_special() {
                    combatant.begin_special(definition)?;
                } else {
                    combatant.begin_attack(definition)?;
                }
            }
            Command::Walk { direction } => combatant.walk(*direction)?,
            Command::Stop => combatant.stop(),
            Command::Jump => combatant.jump()?,
            Command::Block { raise } => combatant.block(*raise)?,
        }
        Ok(())
    }

    /// Applies held and this-tick continuous intents: guard and walking.
    ///
    /// These are re-evaluated every tick, so a state that cannot guard or
    /// walk right now (attacking, hurt, airborne) is not a rejection. Any
    /// other error is reported like a discrete command.
    fn apply_intents(&mut self, intents: &[TickIntent; 2], events: &mut Vec<MatchEvent>) {
        for player in PlayerId::ALL {
            let held = self.sampler.held(player);
            let intent = intents[player.index()];

            let raise = intent.block || held.contains(Controls::BLOCK);
            self.hold(player, Command::Block { raise }, events);
            if self.state.combatant(player).movement == MovementState::Blocking {
                continue;
            }

            let walk = intent.walk.or_else(|| {
                match (held.contains(Controls::LEFT), held.contains(Controls::RIGHT)) {
                    (true, false) => Some(-1.0),
                    (false, true) => Some(1.0),
                    _ => None,
                }
            });
            let command = match walk {
                Some(direction) if !held.contains(Controls::DOWN) => Command::Walk { direction },
                _ => Command::Stop,
            };
            self.hold(player, command, events);
        }
    }

    /// Executes a continuous intent.
    fn hold(&mut self, player: PlayerId, command: Command, events: &mut Vec<MatchEvent>) {
        match self.execute(player, &command) {
            Ok(()) | Err(CommandError::Transition(TransitionError::InvalidTransition { .. })) => {}
            Err(error) => events.push(MatchEvent::CommandRejected {
                player,
                command,
                error,
            }),
        }
    }

    fn advance_combatants(&mut self) {
        let config = &self.setup.config;
        let training = self.state.mode == MatchMode::Training;

        for combatant in &mut self.state.combatants {
            let was_hurt = combatant.movement == MovementState::Hurt;
            combatant.advance(config);
            physics::integrate(combatant, config);
            if training {
                combatant.meter = combatant.max_meter;
                if was_hurt && combatant.movement != MovementState::Hurt {
                    combatant.health = combatant.max_health;
                }
            }
        }

        let [one, two] = &mut self.state.combatants;
        physics::separate(one, two, config);
        let (x1, x2) = (one.position.x, two.position.x);
        one.face_towards(x2);
        two.face_towards(x1);

        self.resolver.prune(&self.state.combatants);
    }

    fn check_round_end(&mut self, events: &mut Vec<MatchEvent>) {
        let knocked_out = self.state.combatants.each_mut().map(|c| c.check_defeat());
        let result = match knocked_out {
            [true, true] => MatchResult::Draw,
            [true, false] => MatchResult::Winner(PlayerId::Two),
            [false, true] => MatchResult::Winner(PlayerId::One),
            [false, false] if self.state.remaining_ticks == 0 => {
                let [one, two] = &self.state.combatants;
                match one.health.cmp(&two.health) {
                    std::cmp::Ordering::Greater => MatchResult::Winner(PlayerId::One),
                    std::cmp::Ordering::Less => MatchResult::Winner(PlayerId::Two),
                    std::cmp::Ordering::Equal => MatchResult::Draw,
                }
            }
            [false, false] => return,
        };
        self.end_round(result, events);
    }

    fn end_round(&mut self, result: MatchResult, events: &mut Vec<MatchEvent>) {
        let config = &self.setup.config;
        if let MatchResult::Winner(winner) = result {
            self.state.round_wins[winner.index()] += 1;
            self.state.combatant_mut(winner).declare_victory();
        }
        events.push(MatchEvent::RoundEnded {
            round: self.state.round,
            result,
        });

        let decided = self
            .state
            .round_wins
            .iter()
            .any(|wins| *wins >= config.rounds_to_win);
        if decided || self.state.round >= config.max_rounds() {
            let [p1, p2] = self.state.round_wins;
            let final_result = match p1.cmp(&p2) {
                std::cmp::Ordering::Greater => MatchResult::Winner(PlayerId::One),
                std::cmp::Ordering::Less => MatchResult::Winner(PlayerId::Two),
                std::cmp::Ordering::Equal => MatchResult::Draw,
            };
            self.state.phase = MatchPhase::Finished;
            self.state.result = Some(final_result);
            events.push(MatchEvent::MatchEnded {
                result: final_result,
            });
        } else {
            self.state.phase = MatchPhase::RoundOver {
                resume_in: config.round_intermission_ticks,
            };
        }
    }

    fn intermission(&mut self, now: Tick, resume_in: u32, events: &mut Vec<MatchEvent>) {
        // Inputs during the intermission are dropped.
        self.pending.retain(|input| input.tick > now);

        for combatant in &mut self.state.combatants {
            physics::integrate(combatant, &self.setup.config);
        }
        self.flush_transitions(events);

        let resume_in = resume_in.saturating_sub(1);
        if resume_in > 0 {
            self.state.phase = MatchPhase::RoundOver { resume_in };
            return;
        }

        let config = &self.setup.config;
        for player in PlayerId::ALL {
            let spawn = spawn_point(config, player);
            self.state
                .combatant_mut(player)
                .reset(spawn, spawn_facing(player));
        }
        self.state.round += 1;
        self.state.remaining_ticks = config.round_ticks;
        self.state.phase = MatchPhase::Fighting;
        self.matcher.clear();
        self.sampler.release_all();
        self.resolver.clear();
        self.apply_mode_rules();

        events.push(MatchEvent::RoundStarted {
            round: self.state.round,
        });
        self.flush_transitions(events);
    }

    fn apply_mode_rules(&mut self) {
        if self.state.mode == MatchMode::Training {
            for combatant in &mut self.state.combatants {
                combatant.meter = combatant.max_meter;
            }
        }
    }

    fn flush_transitions(&mut self, events: &mut Vec<MatchEvent>) {
        for combatant in &mut self.state.combatants {
            let player = combatant.id;
            events.extend(combatant.take_transitions().into_iter().map(|transition| {
                MatchEvent::StateChanged {
                    player,
                    from: transition.from,
                    to: transition.to,
                }
            }));
        }
    }
}

fn spawn_point(config: &GameConfig, player: PlayerId) -> Vec2 {
    Vec2::new(config.spawn_x[player.index()], config.ground_level)
}

fn spawn_facing(player: PlayerId) -> Facing {
    match player {
        PlayerId::One => Facing::Right,
        PlayerId::Two => Facing::Left,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::combat::HitOutcome;
    use crate::combatant::TransitionError;
    use crate::error::{ErrorSeverity, GameError};
    use crate::testing::fighter;

    fn close_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.spawn_x = [400.0, 480.0];
        config
    }

    fn clock_with(config: GameConfig) -> MatchClock {
        MatchClock::new(MatchSetup::new(config, fighter(), fighter()))
    }

    fn run(clock: &mut MatchClock, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| clock.tick()).collect()
    }

    fn key(code: &str, pressed: bool) -> DeviceInput {
        DeviceInput::Key {
            code: code.to_owned(),
            pressed,
        }
    }

    #[test]
    fn light_punch_connects_on_first_active_tick() {
        let mut clock = clock_with(close_config());
        clock.perform(PlayerId::One, "light_punch");

        let reports = run(&mut clock, 5);

        for report in &reports[..3] {
            assert_eq!(report.hits().count(), 0, "no hit during startup");
        }
        let hits: Vec<_> = reports[3].hits().collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].damage_dealt, 5);
        assert_eq!(reports[4].hits().count(), 0);

        let p2 = clock.state().combatant(PlayerId::Two);
        assert_eq!(p2.health, 95);
        assert_eq!(p2.movement, MovementState::Hurt);
        assert_eq!(clock.state().combatant(PlayerId::One).combo_count, 1);
    }

    #[test]
    fn special_without_meter_is_rejected_and_buffer_kept() {
        let mut clock = clock_with(close_config());
        for kind in [
            ActionKind::Down,
            ActionKind::DownForward,
            ActionKind::Forward,
            ActionKind::Punch,
        ] {
            clock.submit_action(PlayerId::One, kind, Tick(0));
        }

        let report = clock.tick();

        assert!(report.events.contains(&MatchEvent::SpecialRecognized {
            player: PlayerId::One,
            name: "tide_wave".to_owned(),
        }));
        let rejection = report.events.iter().find_map(|event| match event {
            MatchEvent::CommandRejected { error, .. } => Some(error.clone()),
            _ => None,
        });
        assert_eq!(
            rejection,
            Some(CommandError::Transition(TransitionError::InsufficientMeter {
                required: 25,
                available: 0
            }))
        );
        assert_eq!(clock.state().combatant(PlayerId::One).meter, 0);
        assert_eq!(clock.matcher().history(PlayerId::One).len(), 4);
    }

    #[test]
    fn keyboard_quarter_circle_fires_special_in_training() {
        let setup = MatchSetup::new(close_config(), fighter(), fighter()).with_mode(MatchMode::Training);
        let mut clock = MatchClock::new(setup);
        for input in [
            key("KeyS", true),
            key("KeyD", true),
            key("KeyS", false),
            key("KeyU", true),
        ] {
            clock.submit_raw(input, Tick(0));
        }

        let report = clock.tick();

        let p1 = clock.state().combatant(PlayerId::One);
        assert_eq!(p1.movement, MovementState::SpecialAttacking);
        assert_eq!(p1.current_move.as_ref().unwrap().name, "tide_wave");
        assert!(report.events.contains(&MatchEvent::StateChanged {
            player: PlayerId::One,
            from: MovementState::Idle,
            to: MovementState::SpecialAttacking,
        }));
        // Cleared once the special started.
        assert!(clock.matcher().history(PlayerId::One).is_empty());
    }

    #[test]
    fn forward_held_selects_heavy_normal() {
        let mut clock = clock_with(GameConfig::default());
        clock.submit_control(PlayerId::One, Control::Right, true, Tick(0));
        clock.submit_control(PlayerId::One, Control::Punch, true, Tick(0));

        clock.tick();

        let p1 = clock.state().combatant(PlayerId::One);
        assert_eq!(p1.current_move.as_ref().unwrap().name, "heavy_punch");
        assert!(clock.held(PlayerId::One).contains(Controls::RIGHT));
    }

    #[test]
    fn held_direction_walks_until_released() {
        let mut clock = clock_with(GameConfig::default());
        clock.submit_control(PlayerId::One, Control::Right, true, Tick(0));
        clock.submit_control(PlayerId::One, Control::Right, false, Tick(3));

        run(&mut clock, 3);
        let p1 = clock.state().combatant(PlayerId::One);
        assert_eq!(p1.movement, MovementState::Walking);
        assert_eq!(p1.position.x, 418.0);

        clock.tick();
        assert_eq!(clock.state().combatant(PlayerId::One).movement, MovementState::Idle);
    }

    #[test]
    fn unknown_move_is_a_validation_error() {
        let mut clock = clock_with(GameConfig::default());
        clock.perform(PlayerId::Two, "giga_punch");

        let report = clock.tick();

        let error = report
            .events
            .iter()
            .find_map(|event| match event {
                MatchEvent::CommandRejected { player, error, .. } => {
                    assert_eq!(*player, PlayerId::Two);
                    Some(error.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(error.error_code(), "UNKNOWN_MOVE");
        assert!(report.advanced);
    }

    #[test]
    fn future_inputs_wait_for_their_tick() {
        let mut clock = clock_with(GameConfig::default());
        clock.submit_action(PlayerId::One, ActionKind::Up, Tick(5));

        run(&mut clock, 5);
        assert!(clock.state().combatant(PlayerId::One).grounded);

        clock.tick();
        let p1 = clock.state().combatant(PlayerId::One);
        assert_eq!(p1.movement, MovementState::Jumping);
        assert_eq!(clock.input_log().entries()[0].tick, Tick(5));
    }

    #[test]
    fn timeout_goes_to_higher_health() {
        let mut clock = clock_with(GameConfig::default().with_round_ticks(10));
        clock.state.combatants[0].health = 60;
        clock.state.combatants[1].health = 40;

        let reports = run(&mut clock, 10);

        assert_eq!(clock.state().remaining_ticks, 0);
        assert!(clock.state().is_over());
        assert_eq!(clock.state().winner(), Some(PlayerId::One));
        assert_eq!(
            reports[9].match_result(),
            Some(MatchResult::Winner(PlayerId::One))
        );
        assert_eq!(
            clock.state().combatant(PlayerId::One).movement,
            MovementState::Victorious
        );

        let after = clock.tick();
        assert!(!after.advanced);
    }

    #[test]
    fn timeout_with_equal_health_is_a_draw() {
        let mut clock = clock_with(GameConfig::default().with_round_ticks(3));
        run(&mut clock, 3);

        assert!(clock.state().is_over());
        assert_eq!(clock.state().result, Some(MatchResult::Draw));
    }

    #[test]
    fn knockout_ends_the_match() {
        let mut clock = clock_with(close_config());
        clock.state.combatants[1].health = 5;
        clock.perform(PlayerId::One, "light_punch");

        let reports = run(&mut clock, 4);

        assert_eq!(
            reports[3].match_result(),
            Some(MatchResult::Winner(PlayerId::One))
        );
        assert!(reports[3].events.contains(&MatchEvent::RoundEnded {
            round: 1,
            result: MatchResult::Winner(PlayerId::One),
        }));
        let state = clock.state();
        assert_eq!(state.combatant(PlayerId::Two).health, 0);
        assert_eq!(state.combatant(PlayerId::Two).movement, MovementState::Defeated);
        assert_eq!(
            state.combatant(PlayerId::One).movement,
            MovementState::Victorious
        );
        assert_eq!(state.round_wins, [1, 0]);
    }

    #[test]
    fn double_knockout_is_a_draw() {
        let mut clock = clock_with(close_config());
        clock.state.combatants[0].health = 5;
        clock.state.combatants[1].health = 5;
        clock.perform(PlayerId::One, "light_punch");
        clock.perform(PlayerId::Two, "light_punch");

        run(&mut clock, 4);

        assert_eq!(clock.state().result, Some(MatchResult::Draw));
        assert!(clock.state().combatants.iter().all(|c| c.is_defeated()));
    }

    #[test]
    fn next_round_starts_after_intermission() {
        let mut config = close_config().with_rounds_to_win(2);
        config.round_intermission_ticks = 3;
        let mut clock = clock_with(config);
        clock.state.combatants[1].health = 5;
        clock.perform(PlayerId::One, "light_punch");

        run(&mut clock, 4);
        assert_eq!(
            clock.state().phase,
            MatchPhase::RoundOver { resume_in: 3 }
        );

        let reports = run(&mut clock, 3);
        assert!(reports[2]
            .events
            .contains(&MatchEvent::RoundStarted { round: 2 }));

        let state = clock.state();
        assert_eq!(state.phase, MatchPhase::Fighting);
        assert_eq!(state.round, 2);
        assert_eq!(state.round_wins, [1, 0]);
        assert_eq!(state.remaining_ticks, GameConfig::DEFAULT_ROUND_TICKS);
        for combatant in &state.combatants {
            assert_eq!(combatant.health, 100);
            assert_eq!(combatant.movement, MovementState::Idle);
        }
        assert_eq!(state.combatant(PlayerId::Two).position.x, 480.0);
    }

    #[test]
    fn pause_freezes_everything() {
        let mut clock = clock_with(GameConfig::default());
        clock.submit_control(PlayerId::One, Control::Right, true, Tick(0));
        run(&mut clock, 2);

        assert!(clock.set_paused(true));
        assert!(!clock.set_paused(true));
        let frozen = clock.snapshot();

        let reports = run(&mut clock, 5);
        assert!(reports.iter().all(|report| !report.advanced));
        assert_eq!(clock.snapshot(), frozen);

        assert!(!clock.toggle_pause());
        clock.tick();
        assert_eq!(clock.state().tick, Tick(3));
        assert!(clock.state().remaining_ticks < frozen.remaining_ticks);
    }

    #[test]
    fn training_refills_health_and_meter() {
        let setup = MatchSetup::new(close_config(), fighter(), fighter()).with_mode(MatchMode::Training);
        let mut clock = MatchClock::new(setup);
        clock.perform(PlayerId::One, "light_punch");

        run(&mut clock, 4);
        assert_eq!(clock.state().combatant(PlayerId::Two).health, 95);

        run(&mut clock, 30);
        let state = clock.state();
        assert_eq!(state.combatant(PlayerId::Two).health, 100);
        assert_eq!(state.combatant(PlayerId::One).meter, 100);
        assert!(!state.is_over());
    }

    #[test]
    fn replaying_the_input_log_reproduces_the_state() {
        let setup = MatchSetup::new(GameConfig::default(), fighter(), fighter());
        let mut clock = MatchClock::new(setup.clone());
        for tick in 0..40 {
            clock.submit_action(PlayerId::One, ActionKind::Right, Tick(tick));
            clock.submit_action(PlayerId::Two, ActionKind::Left, Tick(tick));
        }
        clock.submit_action(PlayerId::One, ActionKind::Punch, Tick(38));
        clock.submit_action(PlayerId::Two, ActionKind::Kick, Tick(41));
        clock.submit_raw(key("KeyW", true), Tick(50));

        run(&mut clock, 90);

        let replayed = replay(setup, clock.input_log(), clock.state().tick.0);
        assert_eq!(replayed, clock.snapshot());
        #[cfg(feature = "serde")]
        assert_eq!(replayed.digest(), clock.state().digest());
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl MatchListener for Recorder {
        fn on_hit(&mut self, outcome: &HitOutcome) {
            self.0
                .lock()
                .unwrap()
                .push(format!("hit {} {}", outcome.move_name, outcome.damage_dealt));
        }

        fn on_match_end(&mut self, result: MatchResult) {
            self.0.lock().unwrap().push(format!("end {result:?}"));
        }
    }

    #[test]
    fn listeners_hear_hits_and_match_end() {
        let recorder = Recorder::default();
        let mut clock = clock_with(close_config());
        clock.add_listener(Box::new(recorder.clone()));
        clock.state.combatants[1].health = 5;
        clock.perform(PlayerId::One, "light_punch");

        run(&mut clock, 4);

        let seen = recorder.0.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "hit light_punch 5".to_owned(),
                "end Winner(One)".to_owned()
            ]
        );
    }

    #[test]
    fn held_walk_waits_out_an_attack_without_rejections() {
        let mut clock = clock_with(GameConfig::default());
        clock.submit_control(PlayerId::One, Control::Right, true, Tick(0));
        clock.submit_control(PlayerId::One, Control::Punch, true, Tick(1));

        let reports = run(&mut clock, 25);

        assert_eq!(
            clock.state().combatant(PlayerId::One).movement,
            MovementState::Walking
        );
        assert!(reports[1].events.contains(&MatchEvent::StateChanged {
            player: PlayerId::One,
            from: MovementState::Walking,
            to: MovementState::Attacking,
        }));
        assert!(reports.iter().flat_map(|report| &report.events).all(|event| !matches!(
            event,
            MatchEvent::CommandRejected { .. } | MatchEvent::InputRejected { .. }
        )));
    }

    #[test]
    fn punch_out_of_a_held_guard() {
        let mut clock = clock_with(close_config());
        clock.submit_control(PlayerId::One, Control::Block, true, Tick(0));
        clock.submit_control(PlayerId::One, Control::Punch, true, Tick(1));

        let reports = run(&mut clock, 2);

        assert!(reports[0].events.contains(&MatchEvent::StateChanged {
            player: PlayerId::One,
            from: MovementState::Idle,
            to: MovementState::Blocking,
        }));
        let p1 = clock.state().combatant(PlayerId::One);
        assert_eq!(p1.movement, MovementState::Attacking);
        assert_eq!(p1.current_move.as_ref().unwrap().name, "light_punch");
    }
}
