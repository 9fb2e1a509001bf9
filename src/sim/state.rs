//! Game state and core simulation types
//!
//! `GameSession` is the only mutable aggregate in the simulation. Everything
//! the render layer may see is copied out through [`Snapshot`].

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first jump
    #[default]
    NotStarted,
    /// Active gameplay, ticks are applied
    Running,
    /// Run ended, only a reset leaves this phase
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not-started",
            GamePhase::Running => "running",
            GamePhase::GameOver => "game-over",
        }
    }
}

/// Vertical state of the player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Top edge of the avatar (y grows downward)
    pub position: f32,
    /// Units per tick, negative is upward
    pub velocity: f32,
}

impl Avatar {
    pub fn new(start_y: f32) -> Self {
        Self {
            position: start_y,
            velocity: 0.0,
        }
    }
}

/// A pair of pipes with a passable gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Height of the upper pipe, i.e. y of the gap's top edge
    pub gap_top: f32,
    /// Height of the lower pipe. Advisory only, collision reads `gap_top + gap`
    pub gap_bottom: f32,
    /// Set once the obstacle has been scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            gap_top,
            gap_bottom: tuning.play_height - gap_top - tuning.pipe_gap,
            passed: false,
        }
    }

    /// Right edge
    pub fn right(&self, tuning: &Tuning) -> f32 {
        self.x + tuning.pipe_width
    }

    /// y of the gap's bottom edge
    pub fn gap_floor(&self, tuning: &Tuning) -> f32 {
        self.gap_top + tuning.pipe_gap
    }
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Seed the current run's gap heights are drawn from
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub avatar: Avatar,
    /// Obstacles in spawn order (strictly increasing x at creation)
    pub obstacles: Vec<Obstacle>,
    /// Simulation clock in milliseconds, advanced once per tick
    pub clock_ms: f64,
    /// Simulation time of the last spawn (or of session start)
    pub last_spawn_ms: f64,
    /// Ticks applied since the session started
    pub time_ticks: u64,
    rng: Pcg32,
}

impl GameSession {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            avatar: Avatar::new(tuning.avatar_start_y),
            obstacles: Vec::new(),
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Return to the initial values, drawing the next run's seed from this one
    pub fn reset(&mut self, tuning: &Tuning) {
        let next_seed = self.rng.next_u64();
        *self = Self::new(next_seed, tuning);
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Copy out everything the render layer is allowed to see
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            avatar: self.avatar,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    horizontal_position: o.x,
                    gap_top_height: o.gap_top,
                    gap_bottom_height: o.gap_bottom,
                })
                .collect(),
        }
    }
}

/// Obstacle as exposed to the render layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub horizontal_position: f32,
    pub gap_top_height: f32,
    pub gap_bottom_height: f32,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub avatar: Avatar,
    pub obstacles: Vec<ObstacleView>,
}
