//! Shared entity types for the real-time games
//!
//! Positions are canvas pixels with y growing downward, velocities are pixels
//! per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every target destroyed
    Won,
    /// Out of ammo with targets left, or the player was hit
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Lifecycle of a slingshot projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Resting on the anchor, ready to grab
    Idle,
    /// Held by the pointer
    Dragging,
    /// In the air, integrated every tick
    Flying,
    /// Flight over, waiting out the settle delay before reset
    Hit,
}

/// A launched projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: ProjectileState,
}

impl Projectile {
    /// A fresh projectile resting at `anchor`
    pub fn at_rest(anchor: Vec2, radius: f32) -> Self {
        Self {
            pos: anchor,
            vel: Vec2::ZERO,
            radius,
            state: ProjectileState::Idle,
        }
    }

    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }
}

/// A circular target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            alive: true,
        }
    }
}
