//! Session lifecycle
//!
//! `Game` owns the session and drives it through
//! `NotStarted -> Running -> GameOver -> NotStarted`. Signals and ticks are
//! plain `&mut self` calls, so a signal always lands between two ticks, never
//! inside one.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::audio::AudioCues;
use crate::input::Signal;
use crate::scheduler::FrameScheduler;
use crate::sim::{GamePhase, GameSession, Snapshot, TickOutcome, apply_impulse, tick};
use crate::tuning::Tuning;
use crate::voice::Detection;

/// Identity of a play session, bumped on every reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Game state machine with its tick driver and audio collaborator
pub struct Game<S: FrameScheduler, A: AudioCues> {
    session: GameSession,
    tuning: Tuning,
    scheduler: S,
    audio: A,
    id: SessionId,
}

impl<S: FrameScheduler, A: AudioCues> Game<S, A> {
    pub fn new(seed: u64, tuning: Tuning, scheduler: S, audio: A) -> Self {
        Self {
            session: GameSession::new(seed, &tuning),
            tuning,
            scheduler,
            audio,
            id: SessionId::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.id
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Read-only view for the render layer
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Apply a normalised input signal
    pub fn signal(&mut self, signal: Signal) {
        match signal {
            Signal::Jump => {
                self.jump();
            }
            Signal::Reset => self.reset(),
        }
    }

    /// Flap. Starts the run if it has not started; ignored after game over.
    ///
    /// Returns true if the jump was applied.
    pub fn jump(&mut self) -> bool {
        match self.session.phase {
            GamePhase::GameOver => {
                log::debug!("Jump ignored after game over");
                return false;
            }
            GamePhase::NotStarted => {
                self.session.phase = GamePhase::Running;
                if let Err(e) = self.scheduler.start() {
                    log::warn!("Tick driver not restarted: {}", e);
                }
                log::info!("Run started (session {})", self.id.get());
            }
            GamePhase::Running => {}
        }

        self.session.avatar = apply_impulse(self.session.avatar, self.tuning.jump_force);
        self.audio.on_jump();
        true
    }

    /// Stop ticking and return to a fresh, not-started session
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.session.reset(&self.tuning);
        self.id = self.id.next();
        log::info!("Session reset (session {})", self.id.get());
    }

    /// Run every tick the scheduler reports as due
    ///
    /// Returns the combined outcome of the ticks that ran.
    pub fn pump(&mut self, now: Instant) -> TickOutcome {
        let due = self.scheduler.poll(now);
        let mut outcome = TickOutcome::default();
        for _ in 0..due {
            if self.session.phase != GamePhase::Running {
                break;
            }
            outcome.events.extend(self.step().events);
        }
        outcome
    }

    /// Run a single tick immediately
    pub fn step(&mut self) -> TickOutcome {
        let outcome = tick(&mut self.session, &self.tuning);
        if let Some(cause) = outcome.death() {
            self.scheduler.stop();
            self.audio.on_game_over();
            log::info!(
                "Game over ({:?}) with score {} after {} ticks",
                cause,
                self.session.score,
                self.session.time_ticks
            );
        }
        outcome
    }

    /// Apply a voice detection if it belongs to the current session
    ///
    /// Returns true if it produced a jump.
    pub fn apply_detection(&mut self, detection: Detection) -> bool {
        if detection.session != self.id {
            log::debug!(
                "Discarding voice result from session {} (current {})",
                detection.session.get(),
                self.id.get()
            );
            return false;
        }
        detection.detected && self.jump()
    }

    /// Stop the tick driver for good. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }
}

impl<S: FrameScheduler, A: AudioCues> Drop for Game<S, A> {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::scheduler::ManualScheduler;
    use crate::sim::{DeathCause, GameEvent, Obstacle};

    #[derive(Debug, Default)]
    struct RecordingAudio {
        jumps: u32,
        deaths: u32,
    }

    impl AudioCues for RecordingAudio {
        fn on_jump(&mut self) {
            self.jumps += 1;
        }

        fn on_game_over(&mut self) {
            self.deaths += 1;
        }
    }

    type TestGame = Game<ManualScheduler, RecordingAudio>;

    fn new_game() -> TestGame {
        Game::new(
            12345,
            Tuning::default(),
            ManualScheduler::new(),
            RecordingAudio::default(),
        )
    }

    fn run_ticks(game: &mut TestGame, ticks: u32) -> TickOutcome {
        game.scheduler_mut().queue(ticks);
        game.pump(Instant::now())
    }

    fn fall_to_death(game: &mut TestGame) {
        game.jump();
        run_ticks(game, 1000);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_first_jump_starts_run_with_impulse() {
        let mut game = new_game();
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert!(!game.scheduler().is_running());

        assert!(game.jump());
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.scheduler().is_running());
        assert_eq!(game.session().avatar.velocity, -8.0);
        assert_eq!(game.audio().jumps, 1);
    }

    #[test]
    fn test_no_ticks_before_start() {
        let mut game = new_game();
        run_ticks(&mut game, 10);
        assert_eq!(game.session().time_ticks, 0);
        assert_eq!(game.session().avatar.position, 250.0);
    }

    #[test]
    fn test_jump_overrides_velocity_while_running() {
        let mut game = new_game();
        game.jump();
        run_ticks(&mut game, 20);
        assert!(game.session().avatar.velocity > 0.0);

        let position = game.session().avatar.position;
        assert!(game.jump());
        assert_eq!(game.session().avatar.velocity, -8.0);
        assert_eq!(game.session().avatar.position, position);
        assert_eq!(game.audio().jumps, 2);
    }

    #[test]
    fn test_free_fall_ends_run_with_zero_score() {
        let mut game = new_game();
        game.jump();
        let outcome = run_ticks(&mut game, 1000);

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.score(), 0);
        assert_eq!(outcome.death(), Some(DeathCause::OutOfBounds));
        assert!(!game.scheduler().is_running());
        assert_eq!(game.audio().deaths, 1);
        // Ticks stop at the death tick even though more were queued
        assert!(game.session().time_ticks < 100);
    }

    #[test]
    fn test_jump_every_tick_exits_through_ceiling() {
        let mut game = new_game();
        let mut last_position = game.session().avatar.position;
        while game.phase() != GamePhase::GameOver {
            assert!(game.jump());
            assert_eq!(game.session().avatar.velocity, -8.0);
            run_ticks(&mut game, 1);
            assert!(game.session().avatar.position < last_position);
            last_position = game.session().avatar.position;
        }
        assert!(game.session().avatar.position < 0.0);
        assert_eq!(game.audio().deaths, 1);
    }

    #[test]
    fn test_game_over_ignores_jumps() {
        let mut game = new_game();
        fall_to_death(&mut game);
        let avatar = game.session().avatar;
        let jumps = game.audio().jumps;

        assert!(!game.jump());
        game.signal(Signal::Jump);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.session().avatar, avatar);
        assert_eq!(game.audio().jumps, jumps);
        assert!(!game.scheduler().is_running());
    }

    #[test]
    fn test_reset_restores_initial_session() {
        let mut game = new_game();
        fall_to_death(&mut game);
        let id = game.session_id();

        game.signal(Signal::Reset);

        let session = game.session();
        assert_eq!(session.phase, GamePhase::NotStarted);
        assert_eq!(session.avatar.position, 250.0);
        assert_eq!(session.avatar.velocity, 0.0);
        assert_eq!(session.score, 0);
        assert!(session.obstacles.is_empty());
        assert_eq!(session.last_spawn_ms, 0.0);
        assert!(game.session_id() > id);
        assert!(!game.scheduler().is_running());

        // Next jump starts a new run
        assert!(game.jump());
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.scheduler().starts(), 2);
    }

    #[test]
    fn test_reset_while_running_cancels_ticks() {
        let mut game = new_game();
        game.jump();
        game.scheduler_mut().queue(5);
        game.reset();
        assert_eq!(game.pump(Instant::now()), TickOutcome::default());
        assert_eq!(game.session().time_ticks, 0);
        assert_eq!(game.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_death_cue_once_per_run() {
        let mut game = new_game();
        let tuning = game.tuning().clone();
        game.jump();
        // Two overlapping obstacles, both hit in the same tick
        game.session.obstacles.push(Obstacle::new(110.0, 400.0, &tuning));
        game.session.obstacles.push(Obstacle::new(130.0, 400.0, &tuning));
        let outcome = run_ticks(&mut game, 3);

        assert_eq!(
            outcome.events,
            vec![GameEvent::Died {
                cause: DeathCause::Obstacle
            }]
        );
        assert_eq!(game.audio().deaths, 1);
        run_ticks(&mut game, 3);
        assert_eq!(game.audio().deaths, 1);
    }

    #[test]
    fn test_scoring_through_a_run() {
        let mut game = new_game();
        let tuning = game.tuning().clone();
        game.jump();
        game.session.obstacles.push(Obstacle::new(160.0, 200.0, &tuning));
        game.session.avatar.position = 230.0;

        let mut scored = Vec::new();
        for _ in 0..80 {
            // Hover inside the gap
            game.session.avatar.velocity = -tuning.gravity;
            scored.extend(run_ticks(&mut game, 1).events);
        }
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 1);
        assert_eq!(scored, vec![GameEvent::Scored { score: 1 }]);
    }

    #[test]
    fn test_stale_voice_result_discarded() {
        let mut game = new_game();
        let stale = game.session_id();
        game.reset();

        let applied = game.apply_detection(Detection {
            session: stale,
            detected: true,
        });
        assert!(!applied);
        assert_eq!(game.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_voice_result_acts_as_jump() {
        let mut game = new_game();
        let current = game.session_id();

        assert!(!game.apply_detection(Detection {
            session: current,
            detected: false,
        }));
        assert_eq!(game.phase(), GamePhase::NotStarted);

        assert!(game.apply_detection(Detection {
            session: current,
            detected: true,
        }));
        assert_eq!(game.phase(), GamePhase::Running);

        fall_to_death(&mut game);
        assert!(!game.apply_detection(Detection {
            session: current,
            detected: true,
        }));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut game = new_game();
        game.jump();
        game.shutdown();
        game.shutdown();
        assert!(!game.scheduler().is_running());
        game.scheduler_mut().queue(3);
        assert_eq!(game.pump(Instant::now()), TickOutcome::default());
    }

    #[test]
    fn test_headless_run_without_audio() {
        let mut game = Game::new(7, Tuning::default(), ManualScheduler::new(), NullAudio);
        game.signal(Signal::Jump);
        game.scheduler_mut().queue(1000);
        let outcome = game.pump(Instant::now());

        assert_eq!(outcome.death(), Some(DeathCause::OutOfBounds));
        assert_eq!(game.phase(), GamePhase::GameOver);
        game.signal(Signal::Reset);
        assert_eq!(game.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_snapshot_tracks_session() {
        let mut game = new_game();
        game.jump();
        run_ticks(&mut game, 1);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Running);
        assert_eq!(snapshot.avatar, game.session().avatar);
        assert_eq!(snapshot.score, 0);
    }
}
