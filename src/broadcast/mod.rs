//! Outbound reports to the rendering client
//!
//! The tick pipeline only produces `ArenaEvent`s. Delivery happens through a
//! `Broadcaster` after the world lock is released, and a failed delivery is
//! logged and dropped so it can never stall or abort the tick loop.

use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::core::error::{ArenaError, Result};
use crate::core::types::AgentId;
use crate::entity::{Agent, Role};
use crate::world::Viewport;

/// Render state of one agent, in viewport coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub role: Role,
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub alive: bool,
}

impl AgentSnapshot {
    pub fn from_agent(agent: &Agent, viewport: &Viewport) -> Self {
        let (x, y) = viewport.to_local(agent.x, agent.y);
        Self {
            id: agent.id(),
            role: agent.role(),
            x,
            y,
            size: agent.size,
            alive: agent.is_alive(),
        }
    }
}

/// Something the client should hear about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArenaEvent {
    /// An agent's current render state
    AgentState(AgentSnapshot),
    /// Narrative notification: spawns, deaths, pauses
    News(String),
    /// The Player's current score
    Score(u32),
}

impl ArenaEvent {
    pub fn news(message: impl Into<String>) -> Self {
        ArenaEvent::News(message.into())
    }

    /// Externally tagged JSON line, e.g. `{"Score":4}`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Delivery seam to whatever transport pushes updates to clients
pub trait Broadcaster: Send + Sync {
    fn send(&self, event: &ArenaEvent) -> Result<()>;
}

/// Deliver a batch of events, logging and swallowing failures
///
/// Returns the number of events that were delivered.
pub fn dispatch(broadcaster: &dyn Broadcaster, events: &[ArenaEvent]) -> usize {
    let mut delivered = 0;
    for event in events {
        match broadcaster.send(event) {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!("Unable to deliver {:?}: {}", event, e),
        }
    }
    delivered
}

/// Fan-out over a tokio broadcast channel
///
/// Sending never blocks; slow receivers lag and lose old events instead of
/// holding up the sender.
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<ArenaEvent>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<ArenaEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.tx.subscribe()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn send(&self, event: &ArenaEvent) -> Result<()> {
        self.tx
            .send(event.clone())
            .map(|_| ())
            .map_err(|_| ArenaError::Broadcast("no connected receivers".into()))
    }
}

/// Records every event in memory
#[derive(Default)]
pub struct MemoryBroadcaster {
    events: Mutex<Vec<ArenaEvent>>,
}

impl MemoryBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every event recorded so far
    pub fn drain(&self) -> Vec<ArenaEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// News messages recorded so far, without draining
    pub fn news(&self) -> Vec<String> {
        let events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events
            .iter()
            .filter_map(|e| match e {
                ArenaEvent::News(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Broadcaster for MemoryBroadcaster {
    fn send(&self, event: &ArenaEvent) -> Result<()> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| ArenaError::Broadcast("event log poisoned".into()))?;
        events.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingBroadcaster;

    impl Broadcaster for FailingBroadcaster {
        fn send(&self, _event: &ArenaEvent) -> Result<()> {
            Err(ArenaError::Broadcast("client gone".into()))
        }
    }

    #[test]
    fn test_dispatch_swallows_failures() {
        let events = vec![ArenaEvent::news("reset"), ArenaEvent::Score(3)];
        assert_eq!(dispatch(&FailingBroadcaster, &events), 0);
    }

    #[test]
    fn test_memory_broadcaster_records_in_order() {
        let sink = MemoryBroadcaster::new();
        let events = vec![ArenaEvent::news("reset"), ArenaEvent::Score(3)];
        assert_eq!(dispatch(&sink, &events), 2);
        assert_eq!(sink.news(), vec!["reset".to_string()]);
        assert_eq!(sink.drain(), events);
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn test_channel_without_receivers_is_transient_failure() {
        let (channel, rx) = ChannelBroadcaster::new(8);
        drop(rx);
        let result = channel.send(&ArenaEvent::Score(1));
        assert!(matches!(result, Err(ArenaError::Broadcast(_))));
    }

    #[test]
    fn test_channel_delivers_to_subscribers() {
        let (channel, mut rx) = ChannelBroadcaster::new(8);
        channel.send(&ArenaEvent::news("Game paused")).unwrap();
        assert_eq!(rx.try_recv().unwrap(), ArenaEvent::news("Game paused"));
    }

    #[test]
    fn test_events_serialize_tagged() {
        assert_eq!(ArenaEvent::Score(4).to_json().unwrap(), r#"{"Score":4}"#);
        assert_eq!(ArenaEvent::news("reset").to_json().unwrap(), r#"{"News":"reset"}"#);
    }

    #[test]
    fn test_snapshot_json_carries_role_and_local_position() {
        let event = ArenaEvent::AgentState(AgentSnapshot {
            id: AgentId(3),
            role: Role::Enforcer,
            x: 12,
            y: 40,
            size: 10,
            alive: true,
        });
        assert_eq!(
            event.to_json().unwrap(),
            r#"{"AgentState":{"id":3,"role":"Enforcer","x":12,"y":40,"size":10,"alive":true}}"#
        );
    }
}
