//! Session events and input
//!
//! Sessions queue coarse events for the surrounding UI (counters, end-of-game
//! overlays) and accept input between ticks. Per-tick positions never leave
//! the simulation except through render frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::collection::CollectedItem;

/// Outward notification from a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    /// Remaining shots (slingshot)
    AmmoChanged(u32),
    PhaseChanged(GamePhase),
    /// An enemy was destroyed (index into the session's enemy list)
    EnemyDown(usize),
    /// A collectible earned by this session; the host publishes it
    ItemAwarded(CollectedItem),
}

/// Discrete keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Jump,
    Left,
    Right,
    Fire,
    Other,
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " | "Spacebar" => Key::Fire,
            "ArrowUp" => Key::Jump,
            _ => Key::Other,
        }
    }
}

/// Input relayed from the presentation layer, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    Key(Key),
}

/// Pending events, drained by the host once per frame
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::Left);
        assert_eq!(Key::from_dom(" "), Key::Fire);
        assert_eq!(Key::from_dom("q"), Key::Other);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::default();
        queue.push(GameEvent::ScoreChanged(10));
        assert_eq!(queue.drain(), vec![GameEvent::ScoreChanged(10)]);
        assert!(queue.is_empty());
    }
}
