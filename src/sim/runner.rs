//! Side-scroller: jump over the incoming obstacles
//!
//! The player stands still on the left; obstacles scroll in from the right at
//! a fixed speed. Survival earns points, the first touch ends the run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Simulation;
use super::collision::Rect;
use super::events::{EventQueue, GameEvent, InputEvent, Key};
use super::physics::integrate_jump;
use super::state::GamePhase;
use crate::render::{self, Frame};
use crate::tuning::RunnerTuning;

/// An obstacle rising from the ground line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub height: f32,
}

/// The jumping player. `y` is the offset above standing height (negative is up)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Jumper {
    pub y: f32,
    pub dy: f32,
    pub jumping: bool,
}

/// One runner session
#[derive(Debug, Clone)]
pub struct RunnerGame {
    pub tuning: RunnerTuning,
    pub player: Jumper,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub phase: GamePhase,
    pub frame: u64,
    seed: u64,
    rng: Pcg32,
    events: EventQueue,
}

impl RunnerGame {
    pub fn new(tuning: RunnerTuning, seed: u64) -> Self {
        Self {
            tuning,
            player: Jumper::default(),
            obstacles: Vec::new(),
            score: 0,
            phase: GamePhase::Playing,
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: EventQueue::default(),
        }
    }

    /// Start a jump if standing on the ground.
    pub fn jump(&mut self) -> bool {
        if self.player.jumping || self.phase.is_terminal() {
            return false;
        }
        self.player.jumping = true;
        self.player.dy = self.tuning.jump_velocity;
        true
    }

    /// Top edge of the player square on screen
    pub fn player_top(&self) -> f32 {
        self.tuning.ground_y - self.tuning.player_size + self.player.y
    }

    pub fn player_hitbox(&self) -> Rect {
        Rect::new(
            self.tuning.player_x,
            self.player_top(),
            self.tuning.hitbox_width,
            self.tuning.player_size,
        )
    }

    pub fn obstacle_rect(&self, obstacle: &Obstacle) -> Rect {
        Rect::new(
            obstacle.x,
            self.tuning.ground_y - obstacle.height,
            self.tuning.obstacle_width,
            obstacle.height,
        )
    }

    pub fn step(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.frame += 1;
        let t = &self.tuning;

        if self.player.jumping
            && integrate_jump(&mut self.player.y, &mut self.player.dy, t.gravity)
        {
            self.player = Jumper::default();
        }

        if t.spawn_interval > 0 && self.frame % t.spawn_interval as u64 == 0 {
            let height = t.obstacle_min_height + self.rng.random::<f32>() * t.obstacle_height_jitter;
            self.obstacles.push(Obstacle {
                x: t.width,
                height,
            });
        }

        let speed = t.obstacle_speed;
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }

        let player = self.player_hitbox();
        let crashed = self
            .obstacles
            .iter()
            .any(|o| player.intersects(&self.obstacle_rect(o)));

        let despawn_x = self.tuning.despawn_x;
        self.obstacles.retain(|o| o.x > despawn_x);

        if crashed {
            self.phase = GamePhase::Lost;
            self.events.push(GameEvent::PhaseChanged(GamePhase::Lost));
            log::info!("Runner over at frame {} with score {}", self.frame, self.score);
            return;
        }

        let interval = self.tuning.score_interval;
        if interval > 0 && self.frame % interval as u64 == 0 {
            self.score += 1;
            self.events.push(GameEvent::ScoreChanged(self.score));
        }
    }
}

impl Simulation for RunnerGame {
    fn tick(&mut self) {
        self.step();
    }

    fn handle(&mut self, input: InputEvent) {
        match input {
            InputEvent::PointerDown(_) | InputEvent::Key(Key::Jump | Key::Fire) => {
                self.jump();
            }
            InputEvent::Key(_) | InputEvent::PointerMove(_) | InputEvent::PointerUp => {}
        }
    }

    fn frame(&self) -> Frame {
        render::runner_frame(self)
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn reset(&mut self) {
        *self = Self::new(self.tuning.clone(), self.seed);
    }
}
