//! Kinematic integration
//!
//! One call per fixed tick. Velocities are in logical units per tick, so the
//! integrator never sees `dt`.

use glam::DVec2;

use super::state::{Obstacle, Projectile};
use crate::tuning::Tuning;

/// Advance the projectile: move, apply drag on both axes, then gravity
pub fn integrate_projectile(projectile: &mut Projectile, tuning: &Tuning) {
    projectile.pos += projectile.vel;
    projectile.vel *= tuning.projectile_drag;
    projectile.vel.y += tuning.gravity;
    debug_assert_finite(projectile.pos, projectile.vel);
}

/// Advance flying obstacles. Resting obstacles never move.
pub fn integrate_obstacles(obstacles: &mut [Obstacle], tuning: &Tuning) {
    for obstacle in obstacles.iter_mut().filter(|o| o.is_flying()) {
        obstacle.pos += obstacle.vel;
        obstacle.vel.y += tuning.gravity;
        obstacle.vel.x *= tuning.obstacle_drag;
        debug_assert_finite(obstacle.pos, obstacle.vel);
    }
}

/// Integrate every body for one tick
pub fn step(projectile: &mut Projectile, obstacles: &mut [Obstacle], tuning: &Tuning) {
    integrate_projectile(projectile, tuning);
    integrate_obstacles(obstacles, tuning);
}

#[inline]
fn debug_assert_finite(pos: DVec2, vel: DVec2) {
    debug_assert!(
        pos.is_finite() && vel.is_finite(),
        "non-finite kinematic state: pos={pos:?} vel={vel:?}"
    );
}
