//! Hamim Arcade - mini-games for the growth path page
//!
//! Core modules:
//! - `checkers`: Board model, move rules and turn controller
//! - `sim`: Deterministic real-time games (slingshot, runner, shooter)
//! - `render`: Pure state -> draw command functions
//! - `host`: Fixed timestep frame driver with cancellation
//! - `bus`: Session-scoped publish/subscribe for collectible awards
//! - `collection` / `journey`: Inventory and growth-path progress
//! - `persistence`: Versioned save data over a key-value store
//! - `tuning`: Data-driven game balance

pub mod bus;
pub mod checkers;
pub mod collection;
pub mod error;
pub mod host;
pub mod journey;
pub mod persistence;
pub mod render;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use collection::{CollectedItem, Collection};
pub use error::{HostError, MoveError, StorageError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (matches the browser's ~60 Hz frame callback)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted before clamping (tab switches, debugger)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::TICKS_PER_SECOND + 500) / 1000
}
