//! Idle/demo mode aiming
//!
//! Brute-force search over pull-back offsets. Each candidate is flown with the
//! real integrator (not the drag-free preview) so the chosen shot lands where
//! the simulation will actually put it.

use glam::DVec2;

use super::aim::launch_velocity;
use super::physics::integrate_projectile;
use super::state::{GamePhase, GameState, Projectile};
use crate::distance;

/// Launch angles searched, in degrees (negative is up the screen)
const ANGLE_RANGE: (i32, i32) = (-80, 30);
const ANGLE_STEP: i32 = 2;
/// Pull-back lengths searched, as a fraction of max drag
const POWER_STEPS: u32 = 20;
/// Flight ticks simulated per candidate
const MAX_FLIGHT_TICKS: u32 = 400;

/// A planned shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    /// Where to drag the projectile to, in board coordinates
    pub drag_to: DVec2,
    /// Closest approach to any unhit target along the simulated flight
    pub closest_approach: f64,
    /// Tick at which the closest approach happens
    pub ticks: u32,
}

impl ShotPlan {
    /// Whether the simulated flight actually touches a target
    pub fn hits(&self, state: &GameState) -> bool {
        self.closest_approach < state.tuning.contact_distance
    }
}

/// Pick the drag that brings the projectile closest to an unhit target.
///
/// Returns `None` outside the aiming phase, with no shots left, or when the
/// level has nothing left to hit.
pub fn plan_shot(state: &GameState) -> Option<ShotPlan> {
    if state.phase != GamePhase::Aiming || state.shots_remaining == 0 {
        return None;
    }
    let targets: Vec<DVec2> = state
        .level
        .targets
        .iter()
        .filter(|t| !t.is_hit)
        .map(|t| t.pos)
        .collect();
    if targets.is_empty() {
        return None;
    }

    let tuning = &state.tuning;
    let mut best: Option<ShotPlan> = None;

    for angle_deg in (ANGLE_RANGE.0..=ANGLE_RANGE.1).step_by(ANGLE_STEP as usize) {
        let dir = DVec2::from_angle((angle_deg as f64).to_radians());
        for step in 1..=POWER_STEPS {
            let pull = tuning.max_drag * step as f64 / POWER_STEPS as f64;
            let offset = -dir * pull;
            let drag_to = tuning.anchor + offset;
            let (closest_approach, ticks) = fly(drag_to, launch_velocity(offset, tuning), &targets, state);

            let better = match best {
                None => true,
                Some(b) => {
                    closest_approach < b.closest_approach
                        || (closest_approach == b.closest_approach && ticks < b.ticks)
                }
            };
            if better {
                best = Some(ShotPlan {
                    drag_to,
                    closest_approach,
                    ticks,
                });
            }
        }
    }

    if let Some(plan) = &best {
        log::debug!(
            "Autoplay: drag to {:?}, closest approach {:.1} at tick {}",
            plan.drag_to,
            plan.closest_approach,
            plan.ticks
        );
    }
    best
}

/// Fly a candidate shot; returns the closest approach and when it happened
fn fly(start: DVec2, vel: DVec2, targets: &[DVec2], state: &GameState) -> (f64, u32) {
    let tuning = &state.tuning;
    let mut projectile = Projectile { pos: start, vel };
    let mut closest = f64::INFINITY;
    let mut closest_tick = 0;

    for tick in 1..=MAX_FLIGHT_TICKS {
        integrate_projectile(&mut projectile, tuning);
        for &target in targets {
            let d = distance(projectile.pos, target);
            if d < closest {
                closest = d;
                closest_tick = tick;
            }
        }
        if closest < tuning.contact_distance || tuning.is_out_of_bounds(projectile.pos) {
            break;
        }
    }
    (closest, closest_tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::aim::{on_aim_move, on_aim_release, on_aim_start};
    use crate::sim::tick::tick;

    #[test]
    fn test_plan_requires_aiming() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::InFlight;
        assert!(plan_shot(&state).is_none());
    }

    #[test]
    fn test_planned_shot_scores() {
        let mut state = GameState::new(3);
        let plan = plan_shot(&state).unwrap();
        assert!(plan.hits(&state));
        assert!(distance(plan.drag_to, state.tuning.anchor) <= state.tuning.max_drag + 1e-9);

        let anchor = state.tuning.anchor;
        assert!(on_aim_start(&mut state, anchor));
        on_aim_move(&mut state, plan.drag_to);
        assert!(on_aim_release(&mut state));
        for _ in 0..MAX_FLIGHT_TICKS {
            tick(&mut state, SIM_DT);
        }
        assert!(state.score >= 100);
    }
}
