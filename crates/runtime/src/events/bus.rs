//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use fight_core::{MatchEvent, Tick};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Landed hits
    Combat,
    /// Movement state changes, the cue for sprite playback
    Animation,
    /// Round and match flow, pause and resume
    Match,
    /// Recognized specials and rejected commands
    Input,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Combat, Topic::Animation, Topic::Match, Topic::Input];

    const fn index(self) -> usize {
        match self {
            Topic::Combat => 0,
            Topic::Animation => 1,
            Topic::Match => 2,
            Topic::Input => 3,
        }
    }

    /// Topic a match event is published on.
    pub fn of(event: &MatchEvent) -> Self {
        match event {
            MatchEvent::Hit(_) => Topic::Combat,
            MatchEvent::StateChanged { .. } => Topic::Animation,
            MatchEvent::SpecialRecognized { .. }
            | MatchEvent::CommandRejected { .. }
            | MatchEvent::InputRejected { .. } => Topic::Input,
            MatchEvent::RoundStarted { .. }
            | MatchEvent::RoundEnded { .. }
            | MatchEvent::MatchEnded { .. }
            | MatchEvent::Paused
            | MatchEvent::Resumed => Topic::Match,
        }
    }
}

/// A match event stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tick: Tick,
    pub event: MatchEvent,
}

impl Event {
    pub fn new(tick: Tick, event: MatchEvent) -> Self {
        Self { tick, event }
    }

    pub fn topic(&self) -> Topic {
        Topic::of(&self.event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers lag and
/// lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Topic::ALL.map(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::bus", "No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
