//! Fixed-step kinematics
//!
//! Semi-implicit Euler with a constant per-tick gravity: velocity picks up
//! gravity first, then position moves by the new velocity. No randomness, so a
//! given start state always yields the same trajectory.

use glam::Vec2;

use super::state::Projectile;

/// Advance a point mass one tick under downward gravity.
#[inline]
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, gravity: f32) {
    vel.y += gravity;
    *pos += *vel;
}

/// One tick of a jump measured as an offset above the ground (negative is
/// up). Returns true on landing, with the offset and speed reset to zero.
pub fn integrate_jump(offset: &mut f32, dy: &mut f32, gravity: f32) -> bool {
    *dy += gravity;
    *offset += *dy;
    if *offset > 0.0 {
        *offset = 0.0;
        *dy = 0.0;
        return true;
    }
    false
}

/// Advance a projectile one tick. Only flying projectiles move; returns
/// whether it moved.
pub fn step_projectile(projectile: &mut Projectile, gravity: f32) -> bool {
    if !projectile.is_flying() {
        return false;
    }
    integrate(&mut projectile.pos, &mut projectile.vel, gravity);
    true
}

/// Launch velocity for a slingshot released at `release`: opposite the drag
/// vector, scaled by `power`.
#[inline]
pub fn launch_velocity(anchor: Vec2, release: Vec2, power: f32) -> Vec2 {
    (anchor - release) * power
}

/// Clamp `point` to lie within `max_radius` of `anchor`.
pub fn clamp_to_radius(anchor: Vec2, point: Vec2, max_radius: f32) -> Vec2 {
    let offset = point - anchor;
    if offset.length() > max_radius {
        anchor + offset.normalize_or_zero() * max_radius
    } else {
        point
    }
}
