//! Gameplay tuning
//!
//! Every constant the simulation reads lives here so balance can be changed
//! from a JSON file without recompiling. `Tuning::default()` is the reference
//! game.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Upper bound on preview length; each aim update allocates this many points
pub const MAX_TRAJECTORY_STEPS: u32 = 1000;

/// Errors that can occur while loading tuning data
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "IO error: {}", e),
            TuningError::Parse(e) => write!(f, "Parse error: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "Invalid tuning value `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Board ===
    pub board_width: f64,
    pub board_height: f64,
    /// Launch origin; the projectile returns here between shots
    pub anchor: DVec2,

    // === Physics (per tick) ===
    pub gravity: f64,
    pub projectile_drag: f64,
    pub obstacle_drag: f64,

    // === Collision ===
    pub contact_distance: f64,
    pub obstacle_impulse: f64,
    pub obstacle_kick: f64,
    pub glass_force: f64,
    pub wood_force: f64,

    // === Rules ===
    pub shots_per_level: u8,
    pub score_per_hit: u32,
    pub miss_penalty_per_target: u32,
    /// Seconds between clearing a level and loading the next
    pub level_advance_delay: f64,
    pub out_of_bounds_bottom: f64,
    pub out_of_bounds_side: f64,

    // === Aiming ===
    pub grab_radius: f64,
    pub max_drag: f64,
    pub launch_power: f64,
    pub trajectory_steps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            anchor: DVec2::new(ANCHOR_X, ANCHOR_Y),

            gravity: GRAVITY,
            projectile_drag: PROJECTILE_DRAG,
            obstacle_drag: OBSTACLE_DRAG,

            contact_distance: CONTACT_DISTANCE,
            obstacle_impulse: OBSTACLE_IMPULSE,
            obstacle_kick: OBSTACLE_KICK,
            glass_force: GLASS_FORCE,
            wood_force: WOOD_FORCE,

            shots_per_level: SHOTS_PER_LEVEL,
            score_per_hit: SCORE_PER_HIT,
            miss_penalty_per_target: MISS_PENALTY_PER_TARGET,
            level_advance_delay: LEVEL_ADVANCE_DELAY,
            out_of_bounds_bottom: OUT_OF_BOUNDS_BOTTOM,
            out_of_bounds_side: OUT_OF_BOUNDS_SIDE,

            grab_radius: GRAB_RADIUS,
            max_drag: MAX_DRAG,
            launch_power: LAUNCH_POWER,
            trajectory_steps: TRAJECTORY_STEPS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation's finite-number guarantees
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("anchor.x", self.anchor.x),
            ("anchor.y", self.anchor.y),
            ("gravity", self.gravity),
            ("projectile_drag", self.projectile_drag),
            ("obstacle_drag", self.obstacle_drag),
            ("contact_distance", self.contact_distance),
            ("obstacle_impulse", self.obstacle_impulse),
            ("obstacle_kick", self.obstacle_kick),
            ("glass_force", self.glass_force),
            ("wood_force", self.wood_force),
            ("level_advance_delay", self.level_advance_delay),
            ("out_of_bounds_bottom", self.out_of_bounds_bottom),
            ("out_of_bounds_side", self.out_of_bounds_side),
            ("grab_radius", self.grab_radius),
            ("max_drag", self.max_drag),
            ("launch_power", self.launch_power),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        let positive = [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("contact_distance", self.contact_distance),
            ("grab_radius", self.grab_radius),
            ("max_drag", self.max_drag),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        // Without downward pull or with drag that amplifies speed, a shot may never leave the board
        if self.gravity <= 0.0 {
            return Err(TuningError::Invalid {
                field: "gravity",
                reason: "must be positive",
            });
        }
        let drags = [
            ("projectile_drag", self.projectile_drag),
            ("obstacle_drag", self.obstacle_drag),
        ];
        for (field, value) in drags {
            if value <= 0.0 || value > 1.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be in (0, 1]",
                });
            }
        }
        if self.trajectory_steps > MAX_TRAJECTORY_STEPS {
            return Err(TuningError::Invalid {
                field: "trajectory_steps",
                reason: "must not exceed 1000",
            });
        }

        if self.shots_per_level == 0 {
            return Err(TuningError::Invalid {
                field: "shots_per_level",
                reason: "must allow at least one shot",
            });
        }
        if self.level_advance_delay < 0.0 {
            return Err(TuningError::Invalid {
                field: "level_advance_delay",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Whether `pos` has left the playable area
    pub fn is_out_of_bounds(&self, pos: DVec2) -> bool {
        pos.y > self.board_height + self.out_of_bounds_bottom
            || pos.x > self.board_width + self.out_of_bounds_side
            || pos.x < -self.out_of_bounds_side
    }

    /// Clamp a logical position onto the board rectangle
    pub fn clamp_to_board(&self, pos: DVec2) -> DVec2 {
        pos.clamp(
            DVec2::ZERO,
            DVec2::new(self.board_width, self.board_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference() {
        let t = Tuning::default();
        assert_eq!(t.anchor, DVec2::new(200.0, 400.0));
        assert_eq!(t.shots_per_level, 3);
        assert_eq!(t.trajectory_steps, 30);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "gravity": 0.25, "shots_per_level": 5 }"#).unwrap();
        assert_eq!(t.gravity, 0.25);
        assert_eq!(t.shots_per_level, 5);
        assert_eq!(t.max_drag, MAX_DRAG);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "shots_per_level": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "shots_per_level",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "contact_distance": -1.0 }"#).unwrap_err();
        assert!(err.to_string().contains("contact_distance"));

        for (json, field) in [
            (r#"{ "gravity": 0.0 }"#, "gravity"),
            (r#"{ "gravity": -3.0 }"#, "gravity"),
            (r#"{ "projectile_drag": 5.0 }"#, "projectile_drag"),
            (r#"{ "projectile_drag": 0.0 }"#, "projectile_drag"),
            (r#"{ "obstacle_drag": 1.01 }"#, "obstacle_drag"),
            (r#"{ "obstacle_drag": -0.5 }"#, "obstacle_drag"),
            (r#"{ "trajectory_steps": 4294967295 }"#, "trajectory_steps"),
        ] {
            match Tuning::from_json(json) {
                Err(TuningError::Invalid { field: got, .. }) => assert_eq!(got, field, "{}", json),
                other => panic!("{} should be rejected, got {:?}", json, other),
            }
        }

        // Boundary values stay valid
        let t = Tuning::from_json(
            r#"{ "projectile_drag": 1.0, "obstacle_drag": 1.0, "trajectory_steps": 1000 }"#,
        )
        .unwrap();
        assert_eq!(t.trajectory_steps, MAX_TRAJECTORY_STEPS);

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let t = Tuning::load_or_default("/definitely/not/here/tuning.json");
        assert_eq!(t, Tuning::default());
    }

    #[test]
    fn test_out_of_bounds() {
        let t = Tuning::default();
        assert!(!t.is_out_of_bounds(DVec2::new(200.0, 400.0)));
        assert!(!t.is_out_of_bounds(DVec2::new(-199.0, 800.0)));
        assert!(t.is_out_of_bounds(DVec2::new(-201.0, 400.0)));
        assert!(t.is_out_of_bounds(DVec2::new(1401.0, 400.0)));
        assert!(t.is_out_of_bounds(DVec2::new(600.0, 801.0)));
        // Flying above the board is still in play
        assert!(!t.is_out_of_bounds(DVec2::new(600.0, -5000.0)));
    }
}
