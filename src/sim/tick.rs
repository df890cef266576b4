//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Physics
//! constants are per tick; `dt` only drives the level-advance timer.

use super::collision;
use super::physics;
use super::state::{GameEvent, GamePhase, GameState, ScheduledAdvance};

/// Timer slack so a delay that is a whole number of ticks fires on time
const TIMER_EPSILON: f64 = 1e-9;

/// How an in-flight shot stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Still flying, nothing decided
    Undecided,
    /// Every target is down
    Cleared,
    /// Projectile left the board with shots to spare
    Lost,
    /// Projectile left the board on the last shot
    Failed,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f64) {
    match state.phase {
        GamePhase::Aiming => {}
        GamePhase::LevelCleared => {
            state.time_ticks += 1;
            run_pending_advance(state, dt.max(0.0));
        }
        GamePhase::InFlight => {
            state.time_ticks += 1;

            physics::step(
                &mut state.projectile,
                &mut state.level.obstacles,
                &state.tuning,
            );

            let hits = collision::resolve(
                &state.projectile,
                &mut state.level,
                &state.tuning,
                &mut state.events,
            );
            state.score = state
                .score
                .saturating_add(hits.saturating_mul(state.tuning.score_per_hit));

            let outcome = evaluate_outcome(state);
            apply_outcome(state, outcome);
        }
    }
}

/// Decide the round outcome from the current state. Clearing wins over leaving the board.
pub fn evaluate_outcome(state: &GameState) -> RoundOutcome {
    if state.level.is_cleared() {
        RoundOutcome::Cleared
    } else if state.tuning.is_out_of_bounds(state.projectile.pos) {
        if state.shots_remaining == 0 {
            RoundOutcome::Failed
        } else {
            RoundOutcome::Lost
        }
    } else {
        RoundOutcome::Undecided
    }
}

fn apply_outcome(state: &mut GameState, outcome: RoundOutcome) {
    let index = state.level.index;
    match outcome {
        RoundOutcome::Undecided => {}
        RoundOutcome::Cleared => {
            log::info!("Level {} cleared (score {})", index, state.score);
            state.phase = GamePhase::LevelCleared;
            state.pending_advance = Some(ScheduledAdvance {
                remaining_secs: state.tuning.level_advance_delay,
                next_level: index + 1,
            });
            state.push_event(GameEvent::LevelCleared { level: index });
        }
        RoundOutcome::Lost => {
            log::debug!("Shot lost, {} left", state.shots_remaining);
            state.return_to_aiming();
            state.push_event(GameEvent::ProjectileLost);
        }
        RoundOutcome::Failed => {
            let targets = state.level.targets.len() as u32;
            let penalty = state.tuning.miss_penalty_per_target.saturating_mul(targets);
            let before = state.score;
            state.score = state.score.saturating_sub(penalty);
            log::info!(
                "Level {} failed: score {} -> {}",
                index,
                before,
                state.score
            );
            state.push_event(GameEvent::LevelFailed {
                level: index,
                penalty: before - state.score,
            });
            state.load_level(index);
        }
    }
}

/// Count down the scheduled advance and load the next level when it expires
fn run_pending_advance(state: &mut GameState, dt: f64) {
    let Some(advance) = state.pending_advance.as_mut() else {
        // Cleared with nothing scheduled (e.g. a hand-built state); move on now
        let next = state.level.index + 1;
        log::warn!(
            "Level {} cleared with no advance scheduled, loading {}",
            state.level.index,
            next
        );
        state.load_level(next);
        return;
    };
    advance.remaining_secs -= dt;
    if advance.remaining_secs > TIMER_EPSILON {
        return;
    }
    let next = advance.next_level;
    state.pending_advance = None;
    state.load_level(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::aim::release_shot;
    use crate::sim::state::{Level, Target};
    use glam::DVec2;

    fn single_target_state(target: DVec2) -> GameState {
        let mut state = GameState::new(12345);
        state.level = Level {
            index: 0,
            targets: vec![Target::new(0, target)],
            obstacles: Vec::new(),
        };
        state
    }

    #[test]
    fn test_tick_aiming_is_noop() {
        let mut state = GameState::new(12345);
        let before = state.projectile;
        tick(&mut state, SIM_DT);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.projectile, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_direct_hit_clears_and_advances() {
        // Target sits right on the first step of the flight
        let mut state = single_target_state(DVec2::new(210.0, 400.0));
        assert!(release_shot(&mut state, DVec2::new(10.0, 0.0)));

        tick(&mut state, SIM_DT);
        assert_eq!(state.score, 100);
        assert!(state.level.targets[0].is_hit);
        assert_eq!(state.phase, GamePhase::LevelCleared);
        let frozen = state.projectile;

        // Ticks during the delay run no physics
        for _ in 0..60 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::LevelCleared);
        assert_eq!(state.projectile, frozen);

        for _ in 0..12 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.level.index, 1);
        assert_eq!(state.level.targets.len(), 4);
        assert_eq!(state.shots_remaining, 3);
        assert_eq!(state.projectile.pos, state.tuning.anchor);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_lost_shot_returns_to_aiming() {
        let mut state = GameState::new(12345);
        let layout = state.level.clone();
        assert!(release_shot(&mut state, DVec2::new(-30.0, 0.0)));

        let mut ticks = 0;
        while state.phase == GamePhase::InFlight {
            tick(&mut state, SIM_DT);
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.shots_remaining, 2);
        assert_eq!(state.level, layout);
        assert_eq!(state.projectile.pos, state.tuning.anchor);
        assert_eq!(state.projectile.vel, DVec2::ZERO);
    }

    #[test]
    fn test_failed_level_penalizes_and_regenerates() {
        let mut state = GameState::new(12345);
        state.load_level(5);
        state.score = 1000;
        state.shots_remaining = 1;
        let old_targets = state.level.targets.clone();
        let count = old_targets.len() as u32;

        assert!(release_shot(&mut state, DVec2::new(-30.0, 0.0)));
        while state.phase == GamePhase::InFlight {
            tick(&mut state, SIM_DT);
        }

        assert_eq!(state.score, 1000 - 50 * count);
        assert_eq!(state.level.index, 5);
        assert_ne!(state.level.targets, old_targets);
        assert_eq!(state.shots_remaining, 3);
        assert!(state
            .drain_events()
            .contains(&GameEvent::LevelFailed {
                level: 5,
                penalty: 50 * count
            }));
    }

    #[test]
    fn test_failure_penalty_clamps_at_zero() {
        let mut state = GameState::new(12345);
        state.score = 40;
        state.shots_remaining = 1;
        assert!(release_shot(&mut state, DVec2::new(-30.0, 0.0)));
        while state.phase == GamePhase::InFlight {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_restart_cancels_scheduled_advance() {
        let mut state = single_target_state(DVec2::new(210.0, 400.0));
        assert!(release_shot(&mut state, DVec2::new(10.0, 0.0)));
        tick(&mut state, SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelCleared);

        state.restart_level();
        for _ in 0..200 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.level.index, 0);
        assert_eq!(state.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_cleared_without_schedule_still_advances() {
        let mut state = GameState::new(12345);
        state.phase = GamePhase::LevelCleared;
        state.pending_advance = None;

        tick(&mut state, SIM_DT);

        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.level.index, 1);
        assert_eq!(state.shots_remaining, 3);
    }

    #[test]
    fn test_zero_velocity_shot_resolves() {
        let mut state = GameState::new(12345);
        assert!(release_shot(&mut state, DVec2::ZERO));

        let mut ticks = 0;
        while state.phase == GamePhase::InFlight {
            tick(&mut state, SIM_DT);
            ticks += 1;
            assert!(
                ticks < 1000,
                "shot stuck in flight at {:?}",
                state.projectile.pos
            );
        }
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.shots_remaining, 2);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        for state in [&mut state1, &mut state2] {
            state.load_level(4);
            release_shot(state, DVec2::new(14.0, -12.0));
            for _ in 0..300 {
                tick(state, SIM_DT);
            }
        }
        assert_eq!(state1.level, state2.level);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.projectile, state2.projectile);
        assert_eq!(state1.time_ticks, state2.time_ticks);
    }
}
