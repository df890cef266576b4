//! Aiming preview
//!
//! Forward-Euler path for a launch. Drag is ignored so the preview is a
//! slight overestimate of the real flight, matching what players are shown
//! in the reference game.

use glam::DVec2;

/// Predict `steps` positions starting at `start`.
///
/// Each step records the position, then advances by the velocity and adds
/// `gravity` to the vertical velocity. The first point is always `start`.
pub fn predict(start: DVec2, velocity: DVec2, steps: u32, gravity: f64) -> Vec<DVec2> {
    let mut points = Vec::with_capacity(steps as usize);
    let mut pos = start;
    let mut vel = velocity;
    for _ in 0..steps {
        points.push(pos);
        pos += vel;
        vel.y += gravity;
    }
    points
}
