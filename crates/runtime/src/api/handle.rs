//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! feeding inputs, stepping the clock or streaming events from specific
//! topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use fight_core::{
    ActionKind, Control, DeviceInput, InputEvent, InputLog, MatchState, PlayerId, Tick, TickReport,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(command(reply_tx)).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Queue an input event, applied on the next processed tick.
    pub async fn submit(&self, event: InputEvent) -> Result<()> {
        self.send(Command::Submit { tick: None, event }).await
    }

    /// Queue an input event for a specific tick.
    pub async fn submit_at(&self, tick: Tick, event: InputEvent) -> Result<()> {
        self.send(Command::Submit {
            tick: Some(tick),
            event,
        })
        .await
    }

    pub async fn submit_action(&self, player: PlayerId, kind: ActionKind) -> Result<()> {
        self.submit(InputEvent::Action { player, kind }).await
    }

    pub async fn submit_action_at(&self, player: PlayerId, kind: ActionKind, tick: Tick) -> Result<()> {
        self.submit_at(tick, InputEvent::Action { player, kind }).await
    }

    pub async fn submit_control(&self, player: PlayerId, control: Control, pressed: bool) -> Result<()> {
        self.submit(InputEvent::Control {
            player,
            control,
            pressed,
        })
        .await
    }

    /// Queue a raw device edge; the clock maps it through its bindings.
    pub async fn submit_raw(&self, input: DeviceInput) -> Result<()> {
        self.submit(InputEvent::Device(input)).await
    }

    /// Start a move by name on the next processed tick.
    pub async fn perform(&self, player: PlayerId, name: impl Into<String>) -> Result<()> {
        self.submit(InputEvent::Perform {
            player,
            name: name.into(),
        })
        .await
    }

    // ========================================================================
    // Clock control
    // ========================================================================

    /// Suspend tick processing. Returns false if already paused.
    pub async fn pause(&self) -> Result<bool> {
        self.request(|reply| Command::SetPaused {
            paused: true,
            reply,
        })
        .await
    }

    /// Resume tick processing. Returns false if not paused.
    pub async fn resume(&self) -> Result<bool> {
        self.request(|reply| Command::SetPaused {
            paused: false,
            reply,
        })
        .await
    }

    /// Process one tick immediately, whatever the cadence.
    pub async fn step(&self) -> Result<TickReport> {
        let mut reports = self.step_n(1).await?;
        Ok(reports.pop().unwrap_or_default())
    }

    /// Process `ticks` ticks immediately and return their reports.
    pub async fn step_n(&self, ticks: u64) -> Result<Vec<TickReport>> {
        self.request(|reply| Command::Step { ticks, reply }).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Query the current match state (read-only snapshot)
    pub async fn snapshot(&self) -> Result<MatchState> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Every input the clock applied so far, with the ticks it applied them on.
    pub async fn input_log(&self) -> Result<InputLog> {
        self.request(|reply| Command::InputLog { reply }).await
    }

    /// Input log and match state captured between the same two ticks.
    ///
    /// Use this instead of separate [`input_log`](Self::input_log) and
    /// [`snapshot`](Self::snapshot) calls when the pair must agree, e.g. for
    /// replay verification while the clock ticks in realtime.
    pub async fn record(&self) -> Result<(InputLog, MatchState)> {
        self.request(|reply| Command::Record { reply }).await
    }

    /// Stop the clock worker. Returns the tick it stopped on.
    ///
    /// Every handle fails with [`RuntimeError::CommandChannelClosed`]
    /// afterwards.
    pub(crate) async fn shutdown(&self) -> Result<Tick> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Landed hits
    /// - `Topic::Animation` - Movement state changes
    /// - `Topic::Match` - Rounds, match end, pause
    /// - `Topic::Input` - Recognized specials and rejected commands
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut hits = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = hits.recv().await {
    ///     // Play a hit spark
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
