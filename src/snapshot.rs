//! Read-only view of a session for renderers and UI
//!
//! Taken between ticks; holds no references into the live state so it can be
//! handed to another thread or serialized for a JS host.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, Obstacle, Projectile, Target};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub score: u32,
    pub shots_remaining: u8,
    pub phase: GamePhase,
    pub projectile: Projectile,
    pub targets: Vec<Target>,
    pub obstacles: Vec<Obstacle>,
    /// A drag is in progress
    pub aiming: bool,
    /// Preview path while dragging, empty otherwise
    pub trajectory: Vec<DVec2>,
    /// Seconds until the next level loads, while a clear is pending
    pub next_level_in: Option<f64>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            level: state.level.index,
            score: state.score,
            shots_remaining: state.shots_remaining,
            phase: state.phase,
            projectile: state.projectile,
            targets: state.level.targets.clone(),
            obstacles: state.level.obstacles.clone(),
            aiming: state.aim.is_some(),
            trajectory: state
                .aim
                .as_ref()
                .map(|a| a.trajectory.clone())
                .unwrap_or_default(),
            next_level_in: state.pending_advance.map(|a| a.remaining_secs.max(0.0)),
        }
    }

    /// Every target is down
    pub fn level_complete(&self) -> bool {
        self.targets.iter().all(|t| t.is_hit)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
