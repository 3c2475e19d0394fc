//! Data-driven game balance
//!
//! Every constant the games use lives here so a level can be rebalanced from
//! JSON without a rebuild. Missing fields fall back to the defaults, which are
//! the values the arcade shipped with.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::sim::Rect;

/// A target placement for the slingshot level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Slingshot ("Sardar") game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlingshotTuning {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    /// Launch origin
    pub anchor: Vec2,
    /// Pointer-down must land this close to the anchor to grab
    pub grab_radius: f32,
    /// Drag is clamped to this distance from the anchor
    pub max_drag: f32,
    /// Drag-to-velocity scale
    pub launch_power: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    pub projectile_radius: f32,
    pub ammo: u32,
    pub enemy_reward: u32,
    /// Distance past either side before a shot counts as lost
    pub bounds_margin: f32,
    /// Delay before reset after hitting an enemy or leaving the field
    pub quick_settle_ms: u32,
    /// Delay before reset after hitting the ground or a building
    pub slow_settle_ms: u32,
    pub enemies: Vec<EnemySpawn>,
    pub buildings: Vec<Rect>,
}

impl Default for SlingshotTuning {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 350.0,
            ground_y: 300.0,
            anchor: Vec2::new(80.0, 220.0),
            grab_radius: 40.0,
            max_drag: 60.0,
            launch_power: 0.25,
            gravity: 0.25,
            projectile_radius: 8.0,
            ammo: 3,
            enemy_reward: 100,
            bounds_margin: 50.0,
            quick_settle_ms: 500,
            slow_settle_ms: 1000,
            enemies: vec![
                EnemySpawn { x: 350.0, y: 150.0, radius: 12.0 },
                EnemySpawn { x: 380.0, y: 150.0, radius: 12.0 },
                EnemySpawn { x: 365.0, y: 110.0, radius: 12.0 },
                EnemySpawn { x: 450.0, y: 200.0, radius: 12.0 },
            ],
            buildings: vec![
                Rect::new(330.0, 170.0, 80.0, 130.0),
                Rect::new(430.0, 220.0, 60.0, 80.0),
            ],
        }
    }
}

/// Side-scroller ("escape from sin") balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub player_x: f32,
    /// Drawn player square
    pub player_size: f32,
    /// Horizontal extent used for collisions (narrower than the sprite)
    pub hitbox_width: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub spawn_interval: u32,
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_min_height: f32,
    pub obstacle_height_jitter: f32,
    /// Obstacles are dropped once they scroll past this x
    pub despawn_x: f32,
    /// One point every this many ticks survived
    pub score_interval: u32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 200.0,
            ground_y: 180.0,
            player_x: 30.0,
            player_size: 30.0,
            hitbox_width: 20.0,
            gravity: 0.6,
            jump_velocity: -10.0,
            spawn_interval: 100,
            obstacle_speed: 4.0,
            obstacle_width: 20.0,
            obstacle_min_height: 30.0,
            obstacle_height_jitter: 20.0,
            despawn_x: -50.0,
            score_interval: 10,
        }
    }
}

/// Shoot-em-up ("resistance tank") balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    pub width: f32,
    pub height: f32,
    pub player_start_x: f32,
    pub player_min_x: f32,
    pub player_max_x: f32,
    pub player_y: f32,
    pub player_step: f32,
    pub muzzle_y: f32,
    pub bullet_speed: f32,
    pub enemy_speed: f32,
    pub spawn_interval: u32,
    pub spawn_min_x: f32,
    pub spawn_span: f32,
    pub spawn_y: f32,
    /// Bullet hits when both axis distances are under this
    pub hit_distance: f32,
    /// Enemy rams the tank when horizontally closer than this...
    pub ram_distance: f32,
    /// ...and lower than this line
    pub ram_line: f32,
    pub enemy_reward: u32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            player_start_x: 150.0,
            player_min_x: 10.0,
            player_max_x: 290.0,
            player_y: 260.0,
            player_step: 10.0,
            muzzle_y: 250.0,
            bullet_speed: 5.0,
            enemy_speed: 1.0,
            spawn_interval: 60,
            spawn_min_x: 10.0,
            spawn_span: 280.0,
            spawn_y: -20.0,
            hit_distance: 15.0,
            ram_distance: 20.0,
            ram_line: 240.0,
            enemy_reward: 10,
        }
    }
}

/// Balance for every arcade game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub slingshot: SlingshotTuning,
    pub runner: RunnerTuning,
    pub shooter: ShooterTuning,
}

impl Tuning {
    /// Storage key for overrides
    pub const STORAGE_KEY: &'static str = "hamim_tuning";

    /// Parse tuning JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load overrides from storage, falling back to defaults on any problem.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning: {e}");
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Tuning unavailable ({e}), using defaults");
                Self::default()
            }
        }
    }
}
