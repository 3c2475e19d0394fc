//! Shoot-em-up: a tank on the bottom edge against enemies falling from the top

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Simulation;
use super::events::{EventQueue, GameEvent, InputEvent, Key};
use super::state::GamePhase;
use crate::render::{self, Frame};
use crate::tuning::ShooterTuning;

/// One shooter session
#[derive(Debug, Clone)]
pub struct ShooterGame {
    pub tuning: ShooterTuning,
    /// Tank center x
    pub player_x: f32,
    pub bullets: Vec<Vec2>,
    /// Enemy positions: center x, top y
    pub enemies: Vec<Vec2>,
    pub score: u32,
    pub phase: GamePhase,
    pub frame: u64,
    seed: u64,
    rng: Pcg32,
    events: EventQueue,
}

impl ShooterGame {
    pub fn new(tuning: ShooterTuning, seed: u64) -> Self {
        Self {
            player_x: tuning.player_start_x,
            tuning,
            bullets: Vec::new(),
            enemies: Vec::new(),
            score: 0,
            phase: GamePhase::Playing,
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: EventQueue::default(),
        }
    }

    pub fn move_left(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.player_x = (self.player_x - self.tuning.player_step).max(self.tuning.player_min_x);
    }

    pub fn move_right(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.player_x = (self.player_x + self.tuning.player_step).min(self.tuning.player_max_x);
    }

    /// Spawn a bullet at the barrel tip.
    pub fn fire(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.bullets.push(Vec2::new(self.player_x, self.tuning.muzzle_y));
    }

    pub fn step(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.frame += 1;
        let t = &self.tuning;

        if t.spawn_interval > 0 && self.frame % t.spawn_interval as u64 == 0 {
            let x = t.spawn_min_x + self.rng.random::<f32>() * t.spawn_span;
            self.enemies.push(Vec2::new(x, t.spawn_y));
        }

        for bullet in &mut self.bullets {
            bullet.y -= t.bullet_speed;
        }

        let mut rammed = false;
        for enemy in &mut self.enemies {
            enemy.y += t.enemy_speed;
            if (enemy.x - self.player_x).abs() < t.ram_distance && enemy.y > t.ram_line {
                rammed = true;
            }
        }
        if rammed {
            self.phase = GamePhase::Lost;
            self.events.push(GameEvent::PhaseChanged(GamePhase::Lost));
            log::info!("Tank destroyed at frame {} with score {}", self.frame, self.score);
            return;
        }

        // Each bullet takes out at most one enemy, oldest bullets first
        let hit = t.hit_distance;
        let reward = t.enemy_reward;
        let mut survivors = Vec::with_capacity(self.bullets.len());
        for bullet in std::mem::take(&mut self.bullets) {
            let target = self
                .enemies
                .iter()
                .position(|e| (bullet.x - e.x).abs() < hit && (bullet.y - e.y).abs() < hit);
            match target {
                Some(index) => {
                    self.enemies.remove(index);
                    self.score += reward;
                    self.events.push(GameEvent::ScoreChanged(self.score));
                }
                None if bullet.y > 0.0 => survivors.push(bullet),
                None => {}
            }
        }
        self.bullets = survivors;

        let floor = self.tuning.height;
        self.enemies.retain(|e| e.y < floor);
    }
}

impl Simulation for ShooterGame {
    fn tick(&mut self) {
        self.step();
    }

    fn handle(&mut self, input: InputEvent) {
        match input {
            InputEvent::Key(Key::Left) => self.move_left(),
            InputEvent::Key(Key::Right) => self.move_right(),
            InputEvent::Key(Key::Fire) | InputEvent::PointerDown(_) => self.fire(),
            InputEvent::Key(_) | InputEvent::PointerMove(_) | InputEvent::PointerUp => {}
        }
    }

    fn frame(&self) -> Frame {
        render::shooter_frame(self)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> ShooterGame {
        ShooterGame::new(ShooterTuning::default(), 11)
    }

    #[test]
    fn test_movement_is_clamped() {
        let mut game = game();
        for _ in 0..30 {
            game.handle(InputEvent::Key(Key::Left));
        }
        assert_eq!(game.player_x, 10.0);
        for _ in 0..40 {
            game.handle(InputEvent::Key(Key::Right));
        }
        assert_eq!(game.player_x, 290.0);
    }

    #[test]
    fn test_bullets_fly_up_and_expire() {
        let mut game = game();
        game.handle(InputEvent::Key(Key::Fire));
        assert_eq!(game.bullets, vec![Vec2::new(150.0, 250.0)]);
        for _ in 0..49 {
            game.step();
        }
        assert_eq!(game.bullets, vec![Vec2::new(150.0, 5.0)]);
        game.step();
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn test_enemies_spawn_on_interval() {
        let mut game = game();
        for _ in 0..59 {
            game.step();
        }
        assert!(game.enemies.is_empty());
        game.step();
        assert_eq!(game.enemies.len(), 1);
        let e = game.enemies[0];
        assert_eq!(e.y, -19.0);
        assert!(e.x >= 10.0 && e.x < 290.0);
    }

    #[test]
    fn test_bullet_destroys_one_enemy() {
        let mut game = game();
        game.enemies = vec![Vec2::new(100.0, 100.0), Vec2::new(105.0, 102.0)];
        game.bullets = vec![Vec2::new(100.0, 120.0)];
        game.step();
        assert_eq!(game.score, 10);
        assert_eq!(game.enemies.len(), 1);
        assert!(game.bullets.is_empty());
        assert_eq!(game.drain_events(), vec![GameEvent::ScoreChanged(10)]);
    }

    #[test]
    fn test_enemy_reaching_tank_ends_game() {
        let mut game = game();
        game.enemies = vec![Vec2::new(160.0, 239.0)];
        game.step();
        assert_eq!(game.phase, GamePhase::Playing);
        game.step();
        assert_eq!(game.phase, GamePhase::Lost);
        assert_eq!(game.drain_events(), vec![GameEvent::PhaseChanged(GamePhase::Lost)]);

        game.fire();
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn test_enemies_past_the_floor_are_dropped() {
        let mut game = game();
        game.enemies = vec![Vec2::new(20.0, 298.0)];
        game.step();
        assert_eq!(game.enemies.len(), 1);
        game.step();
        assert!(game.enemies.is_empty());
        assert_eq!(game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = game();
        let mut b = game();
        for _ in 0..300 {
            a.step();
            b.step();
        }
        assert_eq!(a.enemies, b.enemies);
        Simulation::reset(&mut a);
        assert_eq!(a.frame, 0);
        assert_eq!(a.player_x, 150.0);
        assert!(a.enemies.is_empty());
    }
}
