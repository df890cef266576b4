//! Contact detection and response
//!
//! Every body is treated as a circle and two bodies touch when their centres
//! are closer than `Tuning::contact_distance`. A tick resolves contacts in
//! three ordered passes:
//!
//! 1. projectile vs resting obstacles (activation impulse)
//! 2. flying obstacles vs unhit targets
//! 3. projectile vs unhit targets
//!
//! Each pass reads target state as left by the previous pass, so a target is
//! scored at most once per tick no matter how many bodies reach it.

use glam::DVec2;

use super::state::{GameEvent, Level, Obstacle, Projectile, Target};
use crate::distance;
use crate::tuning::Tuning;

/// Whether two centres are within contact range
#[inline]
pub fn circles_touch(a: DVec2, b: DVec2, contact_distance: f64) -> bool {
    distance(a, b) < contact_distance
}

/// Launch velocity for an obstacle struck by the projectile.
///
/// Pushes along the projectile→obstacle direction, scaled by material, with
/// an extra upward kick. Coincident centres give a pure kick.
pub fn obstacle_impulse(projectile_pos: DVec2, obstacle: &Obstacle, tuning: &Tuning) -> DVec2 {
    let dir = (obstacle.pos - projectile_pos).normalize_or_zero();
    let speed = tuning.obstacle_impulse * obstacle.kind.force(tuning);
    DVec2::new(dir.x * speed, dir.y * speed - tuning.obstacle_kick)
}

/// Pass 1: activate resting obstacles the projectile touches
pub fn activate_obstacles(
    projectile: &Projectile,
    obstacles: &mut [Obstacle],
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    for obstacle in obstacles.iter_mut().filter(|o| !o.is_flying()) {
        if !circles_touch(projectile.pos, obstacle.pos, tuning.contact_distance) {
            continue;
        }
        let vel = obstacle_impulse(projectile.pos, obstacle, tuning);
        if obstacle.activate(vel) {
            log::debug!("Obstacle {} ({:?}) launched at {:?}", obstacle.id, obstacle.kind, vel);
            events.push(GameEvent::ObstacleActivated {
                obstacle_id: obstacle.id,
            });
        }
    }
}

/// Pass 2: flying obstacles knock out targets. Returns targets hit.
pub fn obstacle_target_hits(
    obstacles: &[Obstacle],
    targets: &mut [Target],
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut hits = 0;
    for obstacle in obstacles.iter().filter(|o| o.is_flying()) {
        for target in targets.iter_mut().filter(|t| !t.is_hit) {
            if circles_touch(obstacle.pos, target.pos, tuning.contact_distance) && target.mark_hit() {
                log::debug!("Target {} hit by obstacle {}", target.id, obstacle.id);
                events.push(GameEvent::TargetHit {
                    target_id: target.id,
                    by_obstacle: Some(obstacle.id),
                });
                hits += 1;
            }
        }
    }
    hits
}

/// Pass 3: direct projectile hits. Returns targets hit.
pub fn projectile_target_hits(
    projectile: &Projectile,
    targets: &mut [Target],
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut hits = 0;
    for target in targets.iter_mut().filter(|t| !t.is_hit) {
        if circles_touch(projectile.pos, target.pos, tuning.contact_distance) && target.mark_hit() {
            log::debug!("Target {} hit directly", target.id);
            events.push(GameEvent::TargetHit {
                target_id: target.id,
                by_obstacle: None,
            });
            hits += 1;
        }
    }
    hits
}

/// Run all three passes in order. Returns the number of targets newly hit.
pub fn resolve(
    projectile: &Projectile,
    level: &mut Level,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> u32 {
    activate_obstacles(projectile, &mut level.obstacles, tuning, events);
    let by_obstacles = obstacle_target_hits(&level.obstacles, &mut level.targets, tuning, events);
    let direct = projectile_target_hits(projectile, &mut level.targets, tuning, events);
    by_obstacles + direct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ObstacleKind, ObstacleState};

    fn projectile_at(x: f64, y: f64) -> Projectile {
        Projectile {
            pos: DVec2::new(x, y),
            vel: DVec2::new(5.0, 0.0),
        }
    }

    #[test]
    fn test_contact_is_strict() {
        assert!(circles_touch(DVec2::ZERO, DVec2::new(39.9, 0.0), 40.0));
        assert!(!circles_touch(DVec2::ZERO, DVec2::new(40.0, 0.0), 40.0));
        assert!(!circles_touch(DVec2::ZERO, DVec2::new(30.0, 30.0), 40.0));
    }

    #[test]
    fn test_impulse_by_material() {
        let tuning = Tuning::default();
        let wood = Obstacle::new(0, DVec2::new(630.0, 400.0), ObstacleKind::Wood);
        let glass = Obstacle::new(1, DVec2::new(630.0, 400.0), ObstacleKind::Glass);
        let from = DVec2::new(600.0, 400.0);

        assert_eq!(obstacle_impulse(from, &wood, &tuning), DVec2::new(10.0, -5.0));
        assert_eq!(obstacle_impulse(from, &glass, &tuning), DVec2::new(20.0, -5.0));
    }

    #[test]
    fn test_impulse_coincident_centres() {
        let tuning = Tuning::default();
        let wood = Obstacle::new(0, DVec2::new(600.0, 400.0), ObstacleKind::Wood);
        let vel = obstacle_impulse(DVec2::new(600.0, 400.0), &wood, &tuning);
        assert_eq!(vel, DVec2::new(0.0, -5.0));
        assert!(vel.is_finite());
    }

    #[test]
    fn test_activation_leaves_projectile_alone() {
        let tuning = Tuning::default();
        let projectile = projectile_at(620.0, 400.0);
        let mut obstacles = vec![
            Obstacle::new(0, DVec2::new(650.0, 400.0), ObstacleKind::Wood),
            Obstacle::new(1, DVec2::new(650.0, 200.0), ObstacleKind::Glass),
        ];
        let mut events = Vec::new();

        activate_obstacles(&projectile, &mut obstacles, &tuning, &mut events);

        assert_eq!(obstacles[0].state, ObstacleState::Flying);
        assert_eq!(obstacles[1].state, ObstacleState::Resting);
        assert_eq!(projectile.vel, DVec2::new(5.0, 0.0));
        assert_eq!(events, vec![GameEvent::ObstacleActivated { obstacle_id: 0 }]);

        // A second contact does not re-launch it
        let before = obstacles[0].vel;
        activate_obstacles(&projectile, &mut obstacles, &tuning, &mut events);
        assert_eq!(obstacles[0].vel, before);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_target_scored_once_per_tick() {
        let tuning = Tuning::default();
        // Projectile and a flying obstacle both touch target 0
        let projectile = projectile_at(700.0, 410.0);
        let mut level = Level {
            index: 0,
            targets: vec![
                Target::new(0, DVec2::new(700.0, 400.0)),
                Target::new(1, DVec2::new(900.0, 100.0)),
            ],
            obstacles: vec![Obstacle::new(0, DVec2::new(690.0, 400.0), ObstacleKind::Wood)],
        };
        level.obstacles[0].activate(DVec2::new(1.0, 0.0));
        let mut events = Vec::new();

        let hits = resolve(&projectile, &mut level, &tuning, &mut events);

        assert_eq!(hits, 1);
        assert!(level.targets[0].is_hit);
        assert!(!level.targets[1].is_hit);
        assert_eq!(
            events,
            vec![GameEvent::TargetHit {
                target_id: 0,
                by_obstacle: Some(0)
            }]
        );
    }

    #[test]
    fn test_resting_obstacle_does_not_score() {
        let tuning = Tuning::default();
        let mut targets = vec![Target::new(0, DVec2::new(650.0, 410.0))];
        let obstacles = vec![Obstacle::new(0, DVec2::new(650.0, 400.0), ObstacleKind::Glass)];
        let mut events = Vec::new();

        assert_eq!(obstacle_target_hits(&obstacles, &mut targets, &tuning, &mut events), 0);
        assert!(!targets[0].is_hit);
    }
}
