//! Tick drivers
//!
//! A scheduler decides when simulation ticks are due. The game asks it how many
//! ticks to run each frame and starts/stops it on phase changes. Once stopped,
//! a scheduler reports no ticks until it is started again.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::consts::{MAX_SUBSTEPS, TICK_MS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,
}

/// Source of ticks with explicit start/stop
pub trait FrameScheduler {
    /// Begin producing ticks. Fails if already running.
    fn start(&mut self) -> Result<(), SchedulerError>;

    /// Cancel any pending ticks. Stopping a stopped scheduler is a no-op.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Number of ticks due at `now`. Always 0 while stopped.
    fn poll(&mut self, now: Instant) -> u32;
}

/// Fixed timestep driver with an accumulator
///
/// Frame time is accumulated and converted into whole ticks, at most
/// `max_substeps` per poll. Long stalls are clamped so a paused process does
/// not fast-forward the game.
#[derive(Debug, Clone)]
pub struct FixedRateScheduler {
    step: Duration,
    max_substeps: u32,
    max_frame_delta: Duration,
    accumulator: Duration,
    last_poll: Option<Instant>,
    running: bool,
}

impl FixedRateScheduler {
    pub fn new(step: Duration) -> Self {
        let step = step.max(Duration::from_millis(1));
        Self {
            step,
            max_substeps: MAX_SUBSTEPS,
            max_frame_delta: Duration::from_millis(100),
            accumulator: Duration::ZERO,
            last_poll: None,
            running: false,
        }
    }

    /// Scheduler ticking every `tick_ms` milliseconds
    ///
    /// Periods that do not fit a `Duration` fall back to the default tick.
    pub fn from_millis(tick_ms: f32) -> Self {
        let step = Duration::try_from_secs_f32(tick_ms.max(1.0) / 1000.0).unwrap_or_else(|e| {
            log::warn!("Tick period {} ms rejected ({}), using {} ms", tick_ms, e, TICK_MS);
            Duration::from_secs_f32(TICK_MS / 1000.0)
        });
        Self::new(step)
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn start(&mut self) -> Result<(), SchedulerError> {
        if self.running {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.running = true;
        self.accumulator = Duration::ZERO;
        self.last_poll = None;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
        self.last_poll = None;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self, now: Instant) -> u32 {
        if !self.running {
            return 0;
        }

        // First poll after start establishes the time base and runs one tick
        let Some(last) = self.last_poll.replace(now) else {
            return 1;
        };

        let delta = now.saturating_duration_since(last).min(self.max_frame_delta);
        self.accumulator += delta;

        let mut due = 0;
        while self.accumulator >= self.step && due < self.max_substeps {
            self.accumulator -= self.step;
            due += 1;
        }
        // Drop backlog the substep cap could not absorb
        if due == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        due
    }
}

/// Scheduler driven by hand, for tests and headless stepping
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    running: bool,
    pending: u32,
    starts: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue ticks to be reported by the next poll (ignored while stopped)
    pub fn queue(&mut self, ticks: u32) {
        if self.running {
            self.pending += ticks;
        }
    }

    /// How many times the scheduler has been started
    pub fn starts(&self) -> u32 {
        self.starts
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self) -> Result<(), SchedulerError> {
        if self.running {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.running = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
        self.pending = 0;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self, _now: Instant) -> u32 {
        if !self.running {
            return 0;
        }
        std::mem::take(&mut self.pending)
    }
}
