//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick integration only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Rect, avatar_box, collides, out_of_bounds};
pub use physics::{apply_impulse, integrate};
pub use state::{Avatar, GamePhase, GameSession, Obstacle, ObstacleView, Snapshot};
pub use tick::{DeathCause, GameEvent, TickOutcome, tick};
