//! High-level runtime orchestrator.
//!
//! The runtime owns the clock worker, wires up command/event channels, polls
//! the action providers and exposes a builder-based API for clients to drive
//! a match.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use fight_core::{
    GameConfig, MatchClock, MatchListener, MatchSetup, MatchState, PlayerId, TickReport,
};

use crate::api::{ActionProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{ClockWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Ticks per second in realtime mode.
    pub tick_rate: u32,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Tick on a wall-clock interval. When false the clock only advances on
    /// explicit steps.
    pub realtime: bool,
}

impl RuntimeConfig {
    /// Stepped configuration for tools and tests.
    pub fn headless() -> Self {
        Self {
            realtime: false,
            ..Self::default()
        }
    }

    /// Interval between two ticks, if ticking on a timer.
    pub fn tick_period(&self) -> Option<Duration> {
        (self.realtime && self.tick_rate > 0)
            .then(|| Duration::from_secs(1) / self.tick_rate)
    }

    fn validate(&self) -> Result<()> {
        if self.command_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig("command_buffer_size must be positive"));
        }
        if self.realtime && self.tick_rate == 0 {
            return Err(RuntimeError::InvalidConfig("realtime mode needs a positive tick_rate"));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: GameConfig::DEFAULT_TICK_RATE,
            event_buffer_size: 256,
            command_buffer_size: 64,
            realtime: true,
        }
    }
}

/// Main runtime that orchestrates a match
///
/// Design: Runtime owns the worker and the providers.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    config: RuntimeConfig,
    setup: MatchSetup,

    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Action providers (injected by user), indexed by player
    providers: [Option<Box<dyn ActionProvider>>; 2],

    // Background worker
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Set the provider for `player`
    pub fn set_provider(&mut self, player: PlayerId, provider: impl ActionProvider + 'static) {
        self.providers[player.index()] = Some(Box::new(provider));
    }

    /// Collect provider inputs for the upcoming tick and queue them.
    async fn poll_providers(&self) -> Result<MatchState> {
        let snapshot = self.handle.snapshot().await?;
        for player in PlayerId::ALL {
            let Some(provider) = &self.providers[player.index()] else {
                continue;
            };
            let inputs = provider
                .provide_inputs(player, &snapshot)
                .await
                .map_err(|err| match err {
                    err @ RuntimeError::ProviderFailed { .. } => err,
                    other => RuntimeError::ProviderFailed {
                        player,
                        reason: other.to_string(),
                    },
                })?;
            for input in inputs {
                self.handle.submit_at(snapshot.tick, input).await?;
            }
        }
        Ok(snapshot)
    }

    /// Poll the providers, then process exactly one tick.
    pub async fn step(&mut self) -> Result<TickReport> {
        self.poll_providers().await?;
        self.handle.step().await
    }

    /// Run until the match is over or `max_ticks` ticks were processed.
    ///
    /// Headless runtimes step as fast as possible; realtime runtimes poll the
    /// providers once per tick period and let the worker keep time.
    pub async fn run(&mut self, max_ticks: u64) -> Result<MatchState> {
        match self.config.tick_period() {
            None => loop {
                let state = self.handle.snapshot().await?;
                if state.is_over() || state.tick.0 >= max_ticks {
                    return Ok(state);
                }
                self.step().await?;
            },
            Some(period) => {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    let state = self.poll_providers().await?;
                    if state.is_over() || state.tick.0 >= max_ticks {
                        return Ok(state);
                    }
                }
            }
        }
    }

    /// Re-simulate this match from its input log and compare digests.
    pub async fn verify_replay(&self) -> Result<[u8; 32]> {
        let (log, state) = self.handle.record().await?;
        crate::replay::verify_replay(&self.setup, &log, &state)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops the worker even while clones of the handle are alive; their
    /// commands fail from then on.
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown().await {
            Ok(tick) => {
                tracing::debug!(target: "runtime::clock", %tick, "Shutdown acknowledged");
            }
            // The worker already stopped on its own.
            Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => {}
            Err(err) => return Err(err),
        }
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    setup: Option<MatchSetup>,
    providers: [Option<Box<dyn ActionProvider>>; 2],
    listeners: Vec<Box<dyn MatchListener>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            setup: None,
            providers: [None, None],
            listeners: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required match setup
    pub fn setup(mut self, setup: MatchSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Set the action provider for `player` (optional)
    pub fn provider(mut self, player: PlayerId, provider: impl ActionProvider + 'static) -> Self {
        self.providers[player.index()] = Some(Box::new(provider));
        self
    }

    /// Register a listener on the match clock.
    ///
    /// Listeners run synchronously inside the worker at the end of each tick.
    pub fn listener(mut self, listener: impl MatchListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;
        let setup = self.setup.ok_or(RuntimeError::MissingSetup)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let mut clock = MatchClock::new(setup.clone());
        for listener in self.listeners {
            clock.add_listener(listener);
        }

        let worker = ClockWorker::new(clock, command_rx, event_bus, self.config.tick_period());
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            config: self.config,
            setup,
            handle,
            providers: self.providers,
            worker_handle,
        })
    }
}
