//! Obstacle stream: spawn, advance, prune and score
//!
//! Obstacles are kept in spawn order, which is also increasing `x` order since
//! every obstacle enters at the same edge and moves at the same speed.

use rand::Rng;

use super::state::{GameSession, Obstacle};
use crate::tuning::Tuning;

/// Spawn a new obstacle if the spawn interval has elapsed on the session clock
///
/// Returns true if an obstacle was appended.
pub fn spawn_if_due(session: &mut GameSession, tuning: &Tuning) -> bool {
    if session.clock_ms - session.last_spawn_ms < f64::from(tuning.pipe_spawn_rate) {
        return false;
    }

    let gap_top = random_gap_top(session, tuning);
    let obstacle = Obstacle::new(tuning.play_width, gap_top, tuning);
    debug_assert!(
        session
            .obstacles
            .last()
            .is_none_or(|prev| prev.x < obstacle.x),
        "obstacles must be spawned in increasing x order"
    );
    session.obstacles.push(obstacle);
    session.last_spawn_ms = session.clock_ms;
    log::debug!("Spawned obstacle (gap top {:.1})", gap_top);
    true
}

/// Draw a gap top edge uniformly from the tuning range
fn random_gap_top(session: &mut GameSession, tuning: &Tuning) -> f32 {
    if tuning.pipe_max_top > tuning.pipe_min_top {
        session
            .rng_mut()
            .random_range(tuning.pipe_min_top..=tuning.pipe_max_top)
    } else {
        tuning.pipe_min_top
    }
}

/// Move every obstacle left by the per-tick speed
pub fn advance(obstacles: &mut [Obstacle], tuning: &Tuning) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= tuning.pipe_speed;
    }
}

/// Drop obstacles that have scrolled fully off the left edge
///
/// Returns the number of obstacles removed.
pub fn prune(obstacles: &mut Vec<Obstacle>, tuning: &Tuning) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.x > tuning.pipe_prune_x);
    before - obstacles.len()
}

/// Mark obstacles whose right edge is behind the avatar as passed
///
/// Returns how many obstacles were newly passed; each obstacle counts once.
pub fn score_passed(obstacles: &mut [Obstacle], tuning: &Tuning) -> u32 {
    let mut newly_passed = 0;
    for obstacle in obstacles.iter_mut() {
        if !obstacle.passed && obstacle.right(tuning) < tuning.avatar_x {
            obstacle.passed = true;
            newly_passed += 1;
        }
    }
    newly_passed
}
