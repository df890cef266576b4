//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (targets and obstacles keep their layout order)
//! - No rendering or platform dependencies

pub mod aim;
pub mod autoplay;
pub mod collision;
pub mod level;
pub mod physics;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use aim::{PreviewState, cancel_aim, on_aim_move, on_aim_release, on_aim_start, release_shot};
pub use autoplay::{ShotPlan, plan_shot};
pub use collision::{circles_touch, resolve};
pub use level::generate_level;
pub use state::{
    AimState, GameEvent, GamePhase, GameState, Level, Obstacle, ObstacleKind, ObstacleState,
    Projectile, ScheduledAdvance, Target,
};
pub use tick::{RoundOutcome, evaluate_outcome, tick};
pub use trajectory::predict;
