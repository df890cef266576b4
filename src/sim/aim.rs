//! Drag-to-aim input handling
//!
//! All positions are logical board coordinates; mapping from device pixels
//! happens before anything reaches this module.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{AimState, GameEvent, GamePhase, GameState};
use super::trajectory::predict;
use crate::tuning::Tuning;
use crate::{clamp_length, distance};

/// Result of a drag update, for drawing the pulled-back projectile and its path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    pub projectile_pos: DVec2,
    pub trajectory: Vec<DVec2>,
}

/// Release velocity implied by pulling the projectile `offset` away from the anchor
#[inline]
pub fn launch_velocity(offset: DVec2, tuning: &Tuning) -> DVec2 {
    -offset * tuning.launch_power
}

/// Begin a drag. Accepted only while aiming with shots left and close to the anchor.
pub fn on_aim_start(state: &mut GameState, world_pos: DVec2) -> bool {
    if state.phase != GamePhase::Aiming || state.shots_remaining == 0 {
        log::debug!("Aim start rejected in {:?} with {} shots", state.phase, state.shots_remaining);
        return false;
    }
    if distance(world_pos, state.tuning.anchor) >= state.tuning.grab_radius {
        return false;
    }
    state.projectile.reset(state.tuning.anchor);
    state.aim = Some(AimState::default());
    true
}

/// Update a drag in progress. Returns `None` when no drag is active.
pub fn on_aim_move(state: &mut GameState, world_pos: DVec2) -> Option<PreviewState> {
    if state.phase != GamePhase::Aiming {
        return None;
    }
    let tuning = &state.tuning;
    let aim = state.aim.as_mut()?;

    let pos = tuning.clamp_to_board(world_pos);
    let offset = clamp_length(pos - tuning.anchor, tuning.max_drag);
    let projectile_pos = tuning.anchor + offset;
    let vel = launch_velocity(offset, tuning);

    aim.trajectory = predict(projectile_pos, vel, tuning.trajectory_steps, tuning.gravity);
    state.projectile.pos = projectile_pos;

    Some(PreviewState {
        projectile_pos,
        trajectory: aim.trajectory.clone(),
    })
}

/// Finish a drag and fire from the last previewed position
pub fn on_aim_release(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Aiming || state.aim.is_none() {
        log::debug!("Aim release rejected in {:?}", state.phase);
        return false;
    }
    let offset = state.projectile.pos - state.tuning.anchor;
    let vel = launch_velocity(offset, &state.tuning);
    release_shot(state, vel)
}

/// Abort a drag without spending a shot
pub fn cancel_aim(state: &mut GameState) -> bool {
    if state.aim.take().is_none() {
        return false;
    }
    state.projectile.reset(state.tuning.anchor);
    true
}

/// Commit a launch: spend a shot, set the projectile moving, enter `InFlight`
pub fn release_shot(state: &mut GameState, vel: DVec2) -> bool {
    if state.phase != GamePhase::Aiming || state.shots_remaining == 0 {
        log::debug!("Shot rejected in {:?} with {} shots", state.phase, state.shots_remaining);
        return false;
    }
    debug_assert!(vel.is_finite(), "non-finite launch velocity {vel:?}");

    state.shots_remaining -= 1;
    state.projectile.vel = vel;
    state.phase = GamePhase::InFlight;
    state.aim = None;
    state.push_event(GameEvent::ShotFired {
        shots_remaining: state.shots_remaining,
    });
    log::debug!(
        "Shot fired from {:?} at {:?}, {} left",
        state.projectile.pos,
        vel,
        state.shots_remaining
    );
    true
}
