//! Fixed timestep simulation tick
//!
//! Advances a running session by one step: physics, obstacle stream, then
//! collision. Any hit ends the run within the same tick.

use super::collision::{avatar_box, collides, out_of_bounds};
use super::obstacles;
use super::physics;
use super::state::{GamePhase, GameSession};
use crate::tuning::Tuning;

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Avatar left the gap of an overlapping obstacle
    Obstacle,
    /// Avatar left the vertical playfield bounds
    OutOfBounds,
}

/// Notable things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ObstacleSpawned,
    /// An obstacle was passed; carries the score after the increment
    Scored { score: u32 },
    Died { cause: DeathCause },
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    /// The death cause, if this tick ended the run
    pub fn death(&self) -> Option<DeathCause> {
        self.events.iter().find_map(|e| match e {
            GameEvent::Died { cause } => Some(*cause),
            _ => None,
        })
    }
}

/// Advance the session by one tick
///
/// Does nothing unless the session is `Running`.
pub fn tick(session: &mut GameSession, tuning: &Tuning) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if session.phase != GamePhase::Running {
        return outcome;
    }

    session.time_ticks += 1;
    session.clock_ms += f64::from(tuning.tick_ms);

    session.avatar = physics::integrate(session.avatar, tuning.gravity);

    if obstacles::spawn_if_due(session, tuning) {
        outcome.events.push(GameEvent::ObstacleSpawned);
    }
    obstacles::advance(&mut session.obstacles, tuning);
    obstacles::prune(&mut session.obstacles, tuning);

    let previous_score = session.score;
    for _ in 0..obstacles::score_passed(&mut session.obstacles, tuning) {
        session.score += 1;
        outcome.events.push(GameEvent::Scored {
            score: session.score,
        });
        log::debug!("Scored: {}", session.score);
    }
    debug_assert!(session.score >= previous_score);

    let avatar = avatar_box(&session.avatar, tuning);
    let cause = if session
        .obstacles
        .iter()
        .any(|o| collides(&avatar, o, tuning))
    {
        Some(DeathCause::Obstacle)
    } else if out_of_bounds(&session.avatar, tuning) {
        Some(DeathCause::OutOfBounds)
    } else {
        None
    };

    if let Some(cause) = cause {
        session.phase = GamePhase::GameOver;
        outcome.events.push(GameEvent::Died { cause });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;

    fn running_session() -> (GameSession, Tuning) {
        let tuning = Tuning::default();
        let mut session = GameSession::new(12345, &tuning);
        session.phase = GamePhase::Running;
        (session, tuning)
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let tuning = Tuning::default();
        let mut session = GameSession::new(1, &tuning);
        let outcome = tick(&mut session, &tuning);
        assert!(outcome.events.is_empty());
        assert_eq!(session.time_ticks, 0);
        assert_eq!(session.avatar.position, 250.0);

        session.phase = GamePhase::GameOver;
        tick(&mut session, &tuning);
        assert_eq!(session.time_ticks, 0);
    }

    #[test]
    fn test_tick_applies_gravity() {
        let (mut session, tuning) = running_session();
        session.avatar.velocity = -3.0;
        tick(&mut session, &tuning);
        assert_eq!(session.avatar.velocity, -2.5);
        assert_eq!(session.avatar.position, 247.5);
    }

    #[test]
    fn test_free_fall_hits_floor() {
        let (mut session, tuning) = running_session();
        let mut died = None;
        for _ in 0..1000 {
            let outcome = tick(&mut session, &tuning);
            if let Some(cause) = outcome.death() {
                died = Some(cause);
                break;
            }
        }
        assert_eq!(died, Some(DeathCause::OutOfBounds));
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.score, 0);
        assert!(session.avatar.position > tuning.floor_y());
    }

    #[test]
    fn test_bounds_end_run_without_obstacles() {
        let (mut session, tuning) = running_session();
        session.avatar.position = 2.0;
        session.avatar.velocity = -10.0;
        let outcome = tick(&mut session, &tuning);
        assert!(session.obstacles.is_empty());
        assert_eq!(outcome.death(), Some(DeathCause::OutOfBounds));
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let (mut session, mut tuning) = running_session();
        tuning.tick_ms = 10.0;
        let ticks_to_spawn = 150;
        // Keep the avatar hovering so it survives
        for i in 1..=ticks_to_spawn {
            session.avatar.velocity = -tuning.gravity;
            let outcome = tick(&mut session, &tuning);
            let spawned = outcome.events.contains(&GameEvent::ObstacleSpawned);
            assert_eq!(spawned, i == ticks_to_spawn, "tick {i}");
        }
        assert_eq!(session.obstacles.len(), 1);
        // Spawned and advanced in the same tick
        assert_eq!(session.obstacles[0].x, 798.0);
    }

    #[test]
    fn test_obstacle_pruned_after_lifetime() {
        let (mut session, mut tuning) = running_session();
        // Never spawn a second obstacle, and keep it clear of the avatar's path
        tuning.pipe_spawn_rate = f32::MAX;
        tuning.avatar_height = 10.0;
        session.obstacles.push(Obstacle::new(800.0, 200.0, &tuning));
        session.avatar.position = 260.0;

        let lifetime = tuning.obstacle_lifetime_ticks();
        for _ in 0..lifetime - 1 {
            session.avatar.velocity = -tuning.gravity;
            tick(&mut session, &tuning);
        }
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.obstacles[0].x, -58.0);

        session.avatar.velocity = -tuning.gravity;
        tick(&mut session, &tuning);
        assert!(session.obstacles.is_empty());
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_passing_obstacle_scores_once() {
        let (mut session, tuning) = running_session();
        // Right edge at 101; one tick later it is at 99, behind the avatar
        session.obstacles.push(Obstacle::new(49.0, 200.0, &tuning));
        session.avatar.position = 230.0;
        session.avatar.velocity = -tuning.gravity;

        let outcome = tick(&mut session, &tuning);
        assert_eq!(outcome.events, vec![GameEvent::Scored { score: 1 }]);
        assert!(session.obstacles[0].passed);

        session.avatar.velocity = -tuning.gravity;
        let outcome = tick(&mut session, &tuning);
        assert!(outcome.events.is_empty());
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_obstacle_collision_ends_run() {
        let (mut session, tuning) = running_session();
        session.obstacles.push(Obstacle::new(120.0, 300.0, &tuning));
        session.avatar.velocity = -tuning.gravity;
        let outcome = tick(&mut session, &tuning);
        assert_eq!(outcome.death(), Some(DeathCause::Obstacle));
        assert_eq!(session.phase, GamePhase::GameOver);

        // Further ticks are no-ops
        let position = session.avatar.position;
        assert!(tick(&mut session, &tuning).events.is_empty());
        assert_eq!(session.avatar.position, position);
    }

    #[test]
    fn test_determinism() {
        let (mut a, tuning) = running_session();
        let (mut b, _) = running_session();
        for i in 0..400u32 {
            let velocity = if i % 20 == 0 { tuning.jump_force } else { a.avatar.velocity };
            a.avatar.velocity = velocity;
            b.avatar.velocity = velocity;
            assert_eq!(tick(&mut a, &tuning), tick(&mut b, &tuning));
        }
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.avatar, b.avatar);
        assert_eq!(a.phase, b.phase);
    }

    proptest! {
        #[test]
        fn score_never_decreases(seed in any::<u64>(), jumps in proptest::collection::vec(any::<bool>(), 1..600)) {
            let tuning = Tuning::default();
            let mut session = GameSession::new(seed, &tuning);
            session.phase = GamePhase::Running;
            let mut last_score = 0;
            for jump in jumps {
                if jump {
                    session.avatar = physics::apply_impulse(session.avatar, tuning.jump_force);
                }
                let outcome = tick(&mut session, &tuning);
                let scored = outcome.events.iter().filter(|e| matches!(e, GameEvent::Scored { .. })).count() as u32;
                prop_assert!(session.score >= last_score);
                prop_assert_eq!(session.score, last_score + scored);
                // Every point is backed by exactly one passed obstacle
                let passed_after = session.obstacles.iter().filter(|o| o.passed).count();
                prop_assert!(session.score as usize >= passed_after);
                last_score = session.score;
                if session.phase == GamePhase::GameOver {
                    break;
                }
            }
        }
    }
}
