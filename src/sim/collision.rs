//! Collision detection for the canvas games
//!
//! Detection only: a positive test ends a shot or a run, nothing bounces and
//! nothing is pushed back out of overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, Projectile};

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict interior test; points on the edge are outside
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Strict overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Circle-circle overlap: centers closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Static scene a projectile can run into
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    /// Horizontal extent of the playfield
    pub width: f32,
    /// y of the ground line
    pub ground_y: f32,
    /// How far past either side a projectile may drift before it is lost
    pub margin: f32,
}

/// What ended a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Index into the enemy list
    Enemy(usize),
    /// Index into the obstacle list
    Obstacle(usize),
    Ground,
    OutOfBounds,
}

/// Test a flying projectile against the scene.
///
/// Enemies are checked first in list order and only the first overlapping live
/// enemy is reported, so at most one enemy is credited per tick. Obstacles,
/// the ground line and the side bounds follow.
pub fn detect_impact(
    projectile: &Projectile,
    enemies: &[Enemy],
    obstacles: &[Rect],
    arena: &Arena,
) -> Option<Impact> {
    let pos = projectile.pos;

    if let Some(index) = enemies
        .iter()
        .position(|e| e.alive && circles_overlap(pos, projectile.radius, e.pos, e.radius))
    {
        return Some(Impact::Enemy(index));
    }

    if let Some(index) = obstacles.iter().position(|b| b.contains(pos)) {
        return Some(Impact::Obstacle(index));
    }

    if pos.y > arena.ground_y - projectile.radius {
        return Some(Impact::Ground);
    }

    if pos.x > arena.width + arena.margin || pos.x < -arena.margin {
        return Some(Impact::OutOfBounds);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ProjectileState;

    const ARENA: Arena = Arena {
        width: 500.0,
        ground_y: 300.0,
        margin: 50.0,
    };

    fn flying_at(x: f32, y: f32) -> Projectile {
        let mut p = Projectile::at_rest(Vec2::new(x, y), 8.0);
        p.state = ProjectileState::Flying;
        p
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 8.0, Vec2::new(19.0, 0.0), 12.0));
        assert!(!circles_overlap(Vec2::ZERO, 8.0, Vec2::new(20.0, 0.0), 12.0));
    }

    #[test]
    fn test_rect_contains_and_intersects() {
        let r = Rect::new(330.0, 170.0, 80.0, 130.0);
        assert!(r.contains(Vec2::new(350.0, 200.0)));
        assert!(!r.contains(Vec2::new(330.0, 200.0)));
        assert!(!r.contains(Vec2::new(420.0, 200.0)));

        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert_eq!(Rect::centered(Vec2::new(5.0, 5.0), Vec2::splat(10.0)), a);
    }

    #[test]
    fn test_first_enemy_in_order_is_credited() {
        let enemies = vec![
            Enemy::new(Vec2::new(100.0, 100.0), 12.0),
            Enemy::new(Vec2::new(105.0, 100.0), 12.0),
        ];
        let p = flying_at(102.0, 100.0);
        assert_eq!(detect_impact(&p, &enemies, &[], &ARENA), Some(Impact::Enemy(0)));
    }

    #[test]
    fn test_dead_enemies_are_skipped() {
        let mut enemies = vec![
            Enemy::new(Vec2::new(100.0, 100.0), 12.0),
            Enemy::new(Vec2::new(105.0, 100.0), 12.0),
        ];
        enemies[0].alive = false;
        let p = flying_at(102.0, 100.0);
        assert_eq!(detect_impact(&p, &enemies, &[], &ARENA), Some(Impact::Enemy(1)));
    }

    #[test]
    fn test_enemy_beats_obstacle_in_same_tick() {
        let enemies = vec![Enemy::new(Vec2::new(350.0, 180.0), 12.0)];
        let obstacles = [Rect::new(330.0, 170.0, 80.0, 130.0)];
        let p = flying_at(352.0, 178.0);
        assert_eq!(
            detect_impact(&p, &enemies, &obstacles, &ARENA),
            Some(Impact::Enemy(0))
        );
    }

    #[test]
    fn test_obstacle_ground_and_bounds() {
        let obstacles = [Rect::new(330.0, 170.0, 80.0, 130.0)];
        assert_eq!(
            detect_impact(&flying_at(340.0, 200.0), &[], &obstacles, &ARENA),
            Some(Impact::Obstacle(0))
        );
        assert_eq!(
            detect_impact(&flying_at(200.0, 295.0), &[], &obstacles, &ARENA),
            Some(Impact::Ground)
        );
        assert_eq!(
            detect_impact(&flying_at(551.0, 100.0), &[], &obstacles, &ARENA),
            Some(Impact::OutOfBounds)
        );
        assert_eq!(
            detect_impact(&flying_at(-51.0, 100.0), &[], &obstacles, &ARENA),
            Some(Impact::OutOfBounds)
        );
        assert_eq!(detect_impact(&flying_at(200.0, 100.0), &[], &obstacles, &ARENA), None);
    }
}
