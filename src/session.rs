//! Game session
//!
//! Owns one `GameState` for its whole lifetime and drives it at a fixed rate
//! independent of how often the host presents frames. Dropping the session
//! discards the state, including any scheduled level advance.

use glam::DVec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{self, GameEvent, GameState, PreviewState};
use crate::snapshot::Snapshot;
use crate::tuning::Tuning;

/// A running game
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    accumulator: f64,
}

impl GameSession {
    /// Start a new game with a fixed layout seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Start a new game seeded from OS entropy
    pub fn unseeded() -> Self {
        Self::from_state(GameState::unseeded())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::from_state(GameState::with_tuning(seed, tuning))
    }

    fn from_state(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
        }
    }

    /// Read access to the live state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Begin a drag at `world_pos`; false if the drag is not accepted
    pub fn on_aim_start(&mut self, world_pos: DVec2) -> bool {
        sim::on_aim_start(&mut self.state, world_pos)
    }

    /// Move the drag; `None` when no drag is active
    pub fn on_aim_move(&mut self, world_pos: DVec2) -> Option<PreviewState> {
        sim::on_aim_move(&mut self.state, world_pos)
    }

    /// Release the drag and fire
    pub fn on_aim_release(&mut self) -> bool {
        sim::on_aim_release(&mut self.state)
    }

    pub fn cancel_aim(&mut self) -> bool {
        sim::cancel_aim(&mut self.state)
    }

    /// Advance exactly one fixed step
    pub fn tick(&mut self, dt: f64) {
        sim::tick(&mut self.state, dt);
    }

    /// Feed elapsed frame time; runs as many `SIM_DT` steps as have accrued.
    ///
    /// Returns the number of steps run. Long stalls are capped at
    /// `MAX_SUBSTEPS` to prevent spiral of death.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sim::tick(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Immutable view for rendering, taken between ticks
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Regenerate the current level and cancel any pending advance. Score is kept.
    pub fn restart_level(&mut self) {
        self.state.restart_level();
        self.accumulator = 0.0;
    }

    /// Throw the session state away and start from level 0
    pub fn new_game(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::with_tuning(seed, tuning);
        self.accumulator = 0.0;
    }

    /// Replace the session state wholesale (e.g. a prepared layout)
    pub fn load_state(&mut self, state: GameState) {
        self.state = state;
        self.accumulator = 0.0;
    }

    /// Events recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
