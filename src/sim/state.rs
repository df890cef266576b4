//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything that changes during play:
//! the level layout, the projectile, shot and score bookkeeping, and the
//! pending level-advance timer.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::generate_level;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Projectile resting at the anchor, drag input accepted
    Aiming,
    /// Shot released, physics running until the outcome is decided
    InFlight,
    /// Every target hit; waiting for the next level to load
    LevelCleared,
}

/// The launched projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Projectile {
    /// A projectile at rest on the anchor
    pub fn at_rest(anchor: DVec2) -> Self {
        Self {
            pos: anchor,
            vel: DVec2::ZERO,
        }
    }

    /// Return to the anchor with zero velocity
    pub fn reset(&mut self, anchor: DVec2) {
        *self = Self::at_rest(anchor);
    }
}

/// Obstacle materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wood,
    Glass,
}

impl ObstacleKind {
    /// Impulse multiplier applied when the projectile strikes this material
    pub fn force(&self, tuning: &Tuning) -> f64 {
        match self {
            ObstacleKind::Wood => tuning.wood_force,
            ObstacleKind::Glass => tuning.glass_force,
        }
    }
}

/// Obstacle activation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    /// Untouched, ignored by integration
    Resting,
    /// Struck once; now a free body under gravity
    Flying,
}

/// A destructible obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub kind: ObstacleKind,
    pub state: ObstacleState,
}

impl Obstacle {
    pub fn new(id: u32, pos: DVec2, kind: ObstacleKind) -> Self {
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            kind,
            state: ObstacleState::Resting,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.state == ObstacleState::Flying
    }

    /// Switch to `Flying` with the given launch velocity.
    ///
    /// Returns false (and changes nothing) if the obstacle was already flying.
    pub fn activate(&mut self, vel: DVec2) -> bool {
        if self.is_flying() {
            return false;
        }
        self.state = ObstacleState::Flying;
        self.vel = vel;
        true
    }
}

/// Something the player must hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: DVec2,
    pub is_hit: bool,
}

impl Target {
    pub fn new(id: u32, pos: DVec2) -> Self {
        Self {
            id,
            pos,
            is_hit: false,
        }
    }

    /// Mark as hit. Returns true only on the first call.
    pub fn mark_hit(&mut self) -> bool {
        if self.is_hit {
            return false;
        }
        self.is_hit = true;
        true
    }
}

/// A level layout. Replaced wholesale, never reshuffled in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub index: u32,
    pub targets: Vec<Target>,
    pub obstacles: Vec<Obstacle>,
}

impl Level {
    /// All targets hit
    pub fn is_cleared(&self) -> bool {
        self.targets.iter().all(|t| t.is_hit)
    }

    pub fn remaining_targets(&self) -> usize {
        self.targets.iter().filter(|t| !t.is_hit).count()
    }
}

/// An in-progress drag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AimState {
    /// Preview path for the velocity the current drag would release
    pub trajectory: Vec<DVec2>,
}

/// One-shot "load the next level" event scheduled after a clear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAdvance {
    pub remaining_secs: f64,
    pub next_level: u32,
}

/// Notable things that happened during a tick or input call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { level: u32 },
    ShotFired { shots_remaining: u8 },
    ObstacleActivated { obstacle_id: u32 },
    TargetHit { target_id: u32, by_obstacle: Option<u32> },
    /// Projectile left the board with shots to spare
    ProjectileLost,
    LevelCleared { level: u32 },
    LevelFailed { level: u32, penalty: u32 },
}

/// RNG seed record for reproducibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the layout RNG started from
    pub rng_state: RngState,
    /// Layout RNG (advances with each procedural level)
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub level: Level,
    /// Process-wide score, carried across levels
    pub score: u32,
    pub shots_remaining: u8,
    pub phase: GamePhase,
    pub projectile: Projectile,
    /// Present while the player is dragging
    pub aim: Option<AimState>,
    pub pending_advance: Option<ScheduledAdvance>,
    /// Ticks processed outside the aiming phase
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game at level 0 with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game from an OS-entropy seed
    pub fn unseeded() -> Self {
        Self::new(rand::random())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let level = generate_level(0, &mut rng);
        let anchor = tuning.anchor;
        let shots = tuning.shots_per_level;

        log::info!("New game (seed {}), level 0 with {} targets", seed, level.targets.len());

        Self {
            rng_state,
            rng,
            tuning,
            events: vec![GameEvent::LevelLoaded { level: level.index }],
            level,
            score: 0,
            shots_remaining: shots,
            phase: GamePhase::Aiming,
            projectile: Projectile::at_rest(anchor),
            aim: None,
            pending_advance: None,
            time_ticks: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    /// Replace the layout with a freshly generated `index` and start a new attempt.
    ///
    /// Drops any drag in progress and any scheduled advance.
    pub fn load_level(&mut self, index: u32) {
        self.level = generate_level(index, &mut self.rng);
        self.shots_remaining = self.tuning.shots_per_level;
        self.projectile.reset(self.tuning.anchor);
        self.phase = GamePhase::Aiming;
        self.aim = None;
        self.pending_advance = None;
        self.events.push(GameEvent::LevelLoaded { level: index });
        log::info!(
            "Level {} loaded: {} targets, {} obstacles",
            index,
            self.level.targets.len(),
            self.level.obstacles.len()
        );
    }

    /// Regenerate the current level, cancelling a pending advance
    pub fn restart_level(&mut self) {
        if self.pending_advance.is_some() {
            log::debug!("Cancelled pending advance from level {}", self.level.index);
        }
        self.load_level(self.level.index);
    }

    /// Send the projectile back to the anchor for the next shot
    pub fn return_to_aiming(&mut self) {
        self.projectile.reset(self.tuning.anchor);
        self.phase = GamePhase::Aiming;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
