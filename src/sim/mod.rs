//! Deterministic simulation module
//!
//! All real-time gameplay logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod physics;
pub mod runner;
pub mod shooter;
pub mod slingshot;
pub mod state;

pub use collision::{Arena, Impact, Rect, circles_overlap, detect_impact};
pub use events::{EventQueue, GameEvent, InputEvent, Key};
pub use physics::{integrate, integrate_jump, launch_velocity, step_projectile};
pub use runner::RunnerGame;
pub use shooter::ShooterGame;
pub use slingshot::{SlingshotGame, victory_reward};
pub use state::{Enemy, GamePhase, Projectile, ProjectileState};

use crate::render::Frame;

/// A real-time game driven by a host frame loop.
///
/// Input arrives between ticks; `tick` advances exactly one fixed step.
pub trait Simulation {
    fn tick(&mut self);
    fn handle(&mut self, input: InputEvent);
    /// Draw commands for the current state
    fn frame(&self) -> Frame;
    fn drain_events(&mut self) -> Vec<GameEvent>;
    fn phase(&self) -> GamePhase;
    /// Back to the initial state of a new session
    fn reset(&mut self);
    /// Whether keyboard input means anything to this game
    fn handles_keys(&self) -> bool {
        true
    }
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn tick(&mut self) {
        (**self).tick();
    }

    fn handle(&mut self, input: InputEvent) {
        (**self).handle(input);
    }

    fn frame(&self) -> Frame {
        (**self).frame()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        (**self).drain_events()
    }

    fn phase(&self) -> GamePhase {
        (**self).phase()
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn handles_keys(&self) -> bool {
        (**self).handles_keys()
    }
}
