//! Slingshot - A projectile-launch puzzle simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level flow)
//! - `session`: Fixed-timestep driver and read-only snapshots for renderers
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use session::GameSession;
pub use snapshot::Snapshot;
pub use tuning::{Tuning, TuningError};

use glam::DVec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the cadence the reference constants assume)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the accumulator
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Logical board dimensions
    pub const BOARD_WIDTH: f64 = 1200.0;
    pub const BOARD_HEIGHT: f64 = 700.0;

    /// Launch origin
    pub const ANCHOR_X: f64 = 200.0;
    pub const ANCHOR_Y: f64 = 400.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f64 = 0.5;
    /// Per-tick velocity retention for the projectile (both axes)
    pub const PROJECTILE_DRAG: f64 = 0.99;
    /// Per-tick horizontal velocity retention for flying obstacles
    pub const OBSTACLE_DRAG: f64 = 0.99;

    /// Centre distance below which two entities touch
    pub const CONTACT_DISTANCE: f64 = 40.0;
    /// Impulse speed handed to a struck obstacle
    pub const OBSTACLE_IMPULSE: f64 = 10.0;
    /// Extra upward velocity added to a struck obstacle
    pub const OBSTACLE_KICK: f64 = 5.0;
    pub const GLASS_FORCE: f64 = 2.0;
    pub const WOOD_FORCE: f64 = 1.0;

    /// Launches granted per level attempt
    pub const SHOTS_PER_LEVEL: u8 = 3;
    pub const SCORE_PER_HIT: u32 = 100;
    /// Penalty per target when a level is failed
    pub const MISS_PENALTY_PER_TARGET: u32 = 50;

    /// Drag must start this close to the anchor
    pub const GRAB_RADIUS: f64 = 80.0;
    /// Maximum pull-back distance
    pub const MAX_DRAG: f64 = 200.0;
    /// Release velocity per unit of pull-back
    pub const LAUNCH_POWER: f64 = 0.2;
    /// Points in an aiming preview
    pub const TRAJECTORY_STEPS: u32 = 30;

    /// Seconds between clearing a level and loading the next one
    pub const LEVEL_ADVANCE_DELAY: f64 = 1.2;

    /// Out-of-bounds margins beyond the board
    pub const OUT_OF_BOUNDS_BOTTOM: f64 = 100.0;
    pub const OUT_OF_BOUNDS_SIDE: f64 = 200.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}

/// Clamp `offset` so its length never exceeds `max_len`
#[inline]
pub fn clamp_length(offset: DVec2, max_len: f64) -> DVec2 {
    let len = offset.length();
    if len > max_len {
        offset * (max_len / len)
    } else {
        offset
    }
}
