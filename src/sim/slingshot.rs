//! Slingshot session controller
//!
//! Drag back from the anchor, release to launch, knock every enemy off the
//! buildings before the ammo runs out.

use glam::Vec2;

use super::collision::{Arena, Impact, Rect, detect_impact};
use super::events::{EventQueue, GameEvent, InputEvent};
use super::physics::{clamp_to_radius, launch_velocity, step_projectile};
use super::state::{Enemy, GamePhase, Projectile, ProjectileState};
use super::Simulation;
use crate::collection::CollectedItem;
use crate::ms_to_ticks;
use crate::render::{self, Frame};
use crate::tuning::SlingshotTuning;

/// Awarded the first time a slingshot session is won
pub fn victory_reward() -> CollectedItem {
    CollectedItem::new(
        "item-sardar-badge",
        "نشان سردار",
        "medal",
        "پاداش پیروزی در نبرد سردار. همه دشمنان از پا درآمدند.",
    )
}

/// One slingshot session
#[derive(Debug, Clone)]
pub struct SlingshotGame {
    pub tuning: SlingshotTuning,
    pub projectile: Projectile,
    pub enemies: Vec<Enemy>,
    pub buildings: Vec<Rect>,
    pub score: u32,
    pub ammo: u32,
    pub phase: GamePhase,
    /// Ticks left before a spent projectile returns to the anchor
    pub settle_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Whether [`victory_reward`] went out already; survives restarts
    pub rewarded: bool,
    events: EventQueue,
}

impl Default for SlingshotGame {
    fn default() -> Self {
        Self::new(SlingshotTuning::default())
    }
}

impl SlingshotGame {
    pub fn new(tuning: SlingshotTuning) -> Self {
        let mut game = Self {
            projectile: Projectile::at_rest(tuning.anchor, tuning.projectile_radius),
            enemies: Vec::new(),
            buildings: Vec::new(),
            score: 0,
            ammo: 0,
            phase: GamePhase::Playing,
            settle_ticks: 0,
            time_ticks: 0,
            rewarded: false,
            events: EventQueue::default(),
            tuning,
        };
        game.restart();
        game
    }

    fn restart(&mut self) {
        let t = &self.tuning;
        self.projectile = Projectile::at_rest(t.anchor, t.projectile_radius);
        self.enemies = t
            .enemies
            .iter()
            .map(|s| Enemy::new(Vec2::new(s.x, s.y), s.radius))
            .collect();
        self.buildings = t.buildings.clone();
        self.score = 0;
        self.ammo = t.ammo;
        self.phase = GamePhase::Playing;
        self.settle_ticks = 0;
        self.time_ticks = 0;
        self.events.drain();
        log::info!(
            "Slingshot session started: {} enemies, {} shots",
            self.enemies.len(),
            self.ammo
        );
    }

    fn arena(&self) -> Arena {
        Arena {
            width: self.tuning.width,
            ground_y: self.tuning.ground_y,
            margin: self.tuning.bounds_margin,
        }
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Grab the projectile if the pointer lands near the anchor.
    pub fn pointer_down(&mut self, at: Vec2) -> bool {
        if self.phase.is_terminal() || self.projectile.state != ProjectileState::Idle {
            return false;
        }
        if at.distance(self.tuning.anchor) < self.tuning.grab_radius {
            self.projectile.state = ProjectileState::Dragging;
            return true;
        }
        false
    }

    /// Follow the pointer while dragging, clamped to the maximum pull.
    pub fn pointer_move(&mut self, at: Vec2) {
        if self.projectile.state != ProjectileState::Dragging {
            return;
        }
        self.projectile.pos = clamp_to_radius(self.tuning.anchor, at, self.tuning.max_drag);
    }

    /// Release: launch opposite the drag direction.
    pub fn pointer_up(&mut self) {
        if self.projectile.state != ProjectileState::Dragging {
            return;
        }
        self.projectile.vel = launch_velocity(
            self.tuning.anchor,
            self.projectile.pos,
            self.tuning.launch_power,
        );
        self.projectile.state = ProjectileState::Flying;
        log::debug!("Launched with velocity {:?}", self.projectile.vel);
    }

    /// Advance the session by one tick.
    pub fn step(&mut self) {
        self.time_ticks += 1;

        match self.projectile.state {
            ProjectileState::Flying => {
                step_projectile(&mut self.projectile, self.tuning.gravity);
                let impact = detect_impact(
                    &self.projectile,
                    &self.enemies,
                    &self.buildings,
                    &self.arena(),
                );
                if let Some(impact) = impact {
                    self.resolve(impact);
                }
            }
            ProjectileState::Hit => {
                self.settle_ticks = self.settle_ticks.saturating_sub(1);
                if self.settle_ticks == 0 {
                    self.finish_flight();
                }
            }
            ProjectileState::Idle | ProjectileState::Dragging => {}
        }

        if self.phase == GamePhase::Playing && self.enemies.iter().all(|e| !e.alive) {
            self.set_phase(GamePhase::Won);
        }
    }

    fn resolve(&mut self, impact: Impact) {
        self.projectile.state = ProjectileState::Hit;
        self.projectile.vel = Vec2::ZERO;

        let settle_ms = match impact {
            Impact::Enemy(index) => {
                self.enemies[index].alive = false;
                self.score += self.tuning.enemy_reward;
                self.events.push(GameEvent::EnemyDown(index));
                self.events.push(GameEvent::ScoreChanged(self.score));
                log::debug!("Enemy {index} down, score {}", self.score);
                self.tuning.quick_settle_ms
            }
            Impact::OutOfBounds => self.tuning.quick_settle_ms,
            Impact::Obstacle(_) | Impact::Ground => self.tuning.slow_settle_ms,
        };
        self.settle_ticks = ms_to_ticks(settle_ms).max(1);
    }

    /// A flight ended: spend one shot and put a new projectile on the anchor.
    fn finish_flight(&mut self) {
        self.projectile = Projectile::at_rest(self.tuning.anchor, self.tuning.projectile_radius);
        self.ammo = self.ammo.saturating_sub(1);
        self.events.push(GameEvent::AmmoChanged(self.ammo));

        if self.phase == GamePhase::Playing && self.ammo == 0 && self.enemies_alive() > 0 {
            self.set_phase(GamePhase::Lost);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.events.push(GameEvent::PhaseChanged(phase));
        log::info!("Slingshot session {:?} with score {}", phase, self.score);
        if phase == GamePhase::Won && !self.rewarded {
            self.rewarded = true;
            self.events.push(GameEvent::ItemAwarded(victory_reward()));
        }
    }
}

impl Simulation for SlingshotGame {
    fn tick(&mut self) {
        self.step();
    }

    fn handle(&mut self, input: InputEvent) {
        match input {
            InputEvent::PointerDown(at) => {
                self.pointer_down(at);
            }
            InputEvent::PointerMove(at) => self.pointer_move(at),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::Key(_) => {}
        }
    }

    fn frame(&self) -> Frame {
        render::slingshot_frame(self)
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn reset(&mut self) {
        self.restart();
    }

    fn handles_keys(&self) -> bool {
        false
    }
}
