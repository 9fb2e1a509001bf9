//! Flappy - a gated-obstacle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, session state)
//! - `game`: Session lifecycle, jump/reset signals and collaborator side effects
//! - `scheduler`: Tick drivers with explicit start/stop
//! - `audio`, `voice`, `input`: Collaborators at the edges of the core
//! - `renderer`: Terminal presentation of read-only snapshots
//! - `tuning`, `settings`: Data-driven constants and player preferences

pub mod audio;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod voice;

pub use game::{Game, SessionId};
pub use scheduler::{FixedRateScheduler, FrameScheduler, ManualScheduler, SchedulerError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (simulation units, y grows downward)
    pub const PLAY_AREA_WIDTH: f32 = 800.0;
    pub const PLAY_AREA_HEIGHT: f32 = 600.0;
    /// Strip at the bottom of the play area the avatar may not enter
    pub const GROUND_HEIGHT: f32 = 24.0;

    /// Avatar defaults - horizontal position never changes
    pub const AVATAR_X: f32 = 100.0;
    pub const AVATAR_WIDTH: f32 = 68.0;
    pub const AVATAR_HEIGHT: f32 = 38.0;
    pub const AVATAR_START_Y: f32 = 250.0;

    /// Downward acceleration added to velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Velocity assigned by a jump (negative is up)
    pub const JUMP_FORCE: f32 = -8.0;

    /// Obstacle defaults
    pub const PIPE_WIDTH: f32 = 52.0;
    pub const PIPE_GAP: f32 = 150.0;
    /// Horizontal distance travelled per tick
    pub const PIPE_SPEED: f32 = 2.0;
    /// Simulation milliseconds between spawns
    pub const PIPE_SPAWN_RATE: f32 = 1500.0;
    /// Range the gap's top edge is drawn from
    pub const PIPE_MIN_TOP: f32 = 50.0;
    pub const PIPE_MAX_TOP: f32 = 300.0;
    /// Obstacles at or left of this x are discarded
    pub const PIPE_PRUNE_X: f32 = -60.0;

    /// Default tick period (one display frame at 60 Hz)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum ticks run for a single frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
