//! Clock worker that owns the authoritative [`fight_core::MatchClock`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), ticks the
//! clock on a fixed cadence (or on request in headless mode) and publishes the
//! resulting events to the [`EventBus`].

use std::future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use fight_core::{
    GameError, InputEvent, InputLog, MatchClock, MatchEvent, MatchState, Tick, TickReport,
};

use crate::events::{Event, EventBus};

/// Commands that can be sent to the clock worker
pub enum Command {
    /// Queue an input. `None` applies it on the next processed tick.
    Submit {
        tick: Option<Tick>,
        event: InputEvent,
    },
    /// Suspend or resume ticking. Replies whether the flag changed.
    SetPaused {
        paused: bool,
        reply: oneshot::Sender<bool>,
    },
    /// Process `ticks` ticks right away and reply with their reports.
    Step {
        ticks: u64,
        reply: oneshot::Sender<Vec<TickReport>>,
    },
    /// Query the current match state (read-only).
    Snapshot { reply: oneshot::Sender<MatchState> },
    /// Copy of every input applied so far.
    InputLog { reply: oneshot::Sender<InputLog> },
    /// Input log and state taken between the same two ticks.
    Record {
        reply: oneshot::Sender<(InputLog, MatchState)>,
    },
    /// Stop the worker. Replies with the final tick once the loop has ended.
    Shutdown { reply: oneshot::Sender<Tick> },
}

/// Background task that drives the match.
pub struct ClockWorker {
    clock: MatchClock,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    period: Option<Duration>,
}

impl ClockWorker {
    /// Creates a clock worker. Without a `period` the clock only advances on
    /// [`Command::Step`].
    pub fn new(
        clock: MatchClock,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        period: Option<Duration>,
    ) -> Self {
        info!(
            target: "runtime::clock",
            mode = %clock.state().mode,
            p1 = %clock.setup().characters[0].id,
            p2 = %clock.setup().characters[1].id,
            realtime = period.is_some(),
            "ClockWorker initialized"
        );

        Self {
            clock,
            command_rx,
            event_bus,
            period,
        }
    }

    /// Main worker loop. Ends on [`Command::Shutdown`] or when every handle
    /// is dropped.
    pub async fn run(mut self) {
        let mut interval = self.period.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        let shutdown_reply = loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if let Some(reply) = self.handle_command(cmd) {
                            break Some(reply);
                        }
                    }
                    None => break None,
                },
                _ = next_tick(&mut interval) => {
                    self.advance();
                }
            }
        };

        let tick = self.clock.state().tick;
        info!(target: "runtime::clock", %tick, "ClockWorker stopped");
        if let Some(reply) = shutdown_reply {
            if reply.send(tick).is_err() {
                debug!("Shutdown reply channel closed (caller dropped)");
            }
        }
    }

    /// Handles one command. Returns the reply channel of a shutdown request.
    fn handle_command(&mut self, cmd: Command) -> Option<oneshot::Sender<Tick>> {
        match cmd {
            Command::Submit { tick, event } => {
                let tick = tick.unwrap_or(self.clock.state().tick);
                self.clock.submit(tick, event);
            }
            Command::SetPaused { paused, reply } => {
                let changed = self.clock.set_paused(paused);
                if changed {
                    let event = if paused {
                        MatchEvent::Paused
                    } else {
                        MatchEvent::Resumed
                    };
                    info!(target: "runtime::clock", tick = %self.clock.state().tick, paused, "Pause toggled");
                    self.event_bus
                        .publish(Event::new(self.clock.state().tick, event));
                }
                if reply.send(changed).is_err() {
                    debug!("SetPaused reply channel closed (caller dropped)");
                }
            }
            Command::Step { ticks, reply } => {
                let reports = (0..ticks).map(|_| self.advance()).collect();
                if reply.send(reports).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.clock.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::InputLog { reply } => {
                if reply.send(self.clock.input_log().clone()).is_err() {
                    debug!("InputLog reply channel closed (caller dropped)");
                }
            }
            Command::Record { reply } => {
                let record = (self.clock.input_log().clone(), self.clock.snapshot());
                if reply.send(record).is_err() {
                    debug!("Record reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => return Some(reply),
        }
        None
    }

    /// Processes one tick and publishes its events.
    fn advance(&mut self) -> TickReport {
        let report = self.clock.tick();
        if !report.advanced {
            return report;
        }

        for event in &report.events {
            log_event(report.tick, event);
            self.event_bus.publish(Event::new(report.tick, event.clone()));
        }
        report
    }
}

/// Resolves on the next interval tick, or never in headless mode.
async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

fn log_event(tick: Tick, event: &MatchEvent) {
    match event {
        MatchEvent::CommandRejected {
            player,
            command,
            error,
        } => debug!(
            target: "runtime::clock",
            %tick,
            %player,
            ?command,
            code = error.error_code(),
            severity = error.severity().as_str(),
            "Command rejected: {}",
            error
        ),
        MatchEvent::InputRejected {
            player,
            action,
            error,
        } => debug!(
            target: "runtime::clock",
            %tick,
            %player,
            %action,
            code = error.error_code(),
            severity = error.severity().as_str(),
            "Input dropped: {}",
            error
        ),
        MatchEvent::SpecialRecognized { player, name } => {
            debug!(target: "runtime::clock", %tick, %player, special = %name, "Special recognized")
        }
        MatchEvent::Hit(outcome) => debug!(
            target: "runtime::clock",
            %tick,
            attacker = %outcome.attacker,
            defender = %outcome.defender,
            move_name = %outcome.move_name,
            damage = outcome.damage_dealt,
            blocked = outcome.was_blocked,
            "Hit"
        ),
        MatchEvent::RoundStarted { round } => {
            info!(target: "runtime::clock", %tick, round, "Round started")
        }
        MatchEvent::RoundEnded { round, result } => {
            info!(target: "runtime::clock", %tick, round, ?result, "Round ended")
        }
        MatchEvent::MatchEnded { result } => {
            info!(target: "runtime::clock", %tick, ?result, "Match ended")
        }
        MatchEvent::StateChanged { .. } | MatchEvent::Paused | MatchEvent::Resumed => {}
    }
}
