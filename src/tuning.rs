//! Data-driven game balance
//!
//! Every gameplay constant lives here so tests and config files can override
//! them without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay constants consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub play_width: f32,
    pub play_height: f32,
    pub ground_height: f32,

    pub avatar_x: f32,
    pub avatar_width: f32,
    pub avatar_height: f32,
    pub avatar_start_y: f32,

    pub gravity: f32,
    pub jump_force: f32,

    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_speed: f32,
    /// Milliseconds of simulation time between spawns
    pub pipe_spawn_rate: f32,
    pub pipe_min_top: f32,
    pub pipe_max_top: f32,
    pub pipe_prune_x: f32,

    /// Simulation milliseconds covered by one tick
    pub tick_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_width: PLAY_AREA_WIDTH,
            play_height: PLAY_AREA_HEIGHT,
            ground_height: GROUND_HEIGHT,

            avatar_x: AVATAR_X,
            avatar_width: AVATAR_WIDTH,
            avatar_height: AVATAR_HEIGHT,
            avatar_start_y: AVATAR_START_Y,

            gravity: GRAVITY,
            jump_force: JUMP_FORCE,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_speed: PIPE_SPEED,
            pipe_spawn_rate: PIPE_SPAWN_RATE,
            pipe_min_top: PIPE_MIN_TOP,
            pipe_max_top: PIPE_MAX_TOP,
            pipe_prune_x: PIPE_PRUNE_X,

            tick_ms: TICK_MS,
        }
    }
}

impl Tuning {
    /// Lowest position the avatar may occupy before hitting the ground
    pub fn floor_y(&self) -> f32 {
        self.play_height - self.ground_height
    }

    /// Number of ticks a freshly spawned obstacle survives before pruning
    pub fn obstacle_lifetime_ticks(&self) -> u32 {
        ((self.play_width - self.pipe_prune_x) / self.pipe_speed).ceil() as u32
    }
}
