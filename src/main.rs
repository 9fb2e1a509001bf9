//! Flappy entry point
//!
//! Terminal frontend: reads keys and clicks, drives the game with a fixed-rate
//! scheduler and draws snapshots with half-block pixels.

use std::io::{self, Stdout, Write, stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, terminal,
};
use thiserror::Error;

use flappy_core::audio::AudioManager;
use flappy_core::input::{Command, map_event};
use flappy_core::renderer::{self, PixelBuf};
use flappy_core::settings::SETTINGS_FILE;
use flappy_core::sim::GamePhase;
use flappy_core::{FixedRateScheduler, Game, Settings};

/// Target render cadence (~30 fps); ticks run at the tuning rate regardless
const FRAME_DURATION: Duration = Duration::from_millis(33);

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

type TerminalGame = Game<FixedRateScheduler, AudioManager<Stdout>>;

fn main() -> Result<(), AppError> {
    env_logger::init();
    log::info!("Flappy starting...");

    let settings = match Settings::load_from(SETTINGS_FILE) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring {}: {}", SETTINGS_FILE, e);
            Settings::default()
        }
    };

    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("Game initialized with seed: {}", seed);

    let mut audio = AudioManager::new(stdout());
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);
    audio.set_jump_bell(settings.jump_sound);

    let scheduler = FixedRateScheduler::from_millis(settings.tuning.tick_ms);
    let mut game = Game::new(seed, settings.tuning.clone(), scheduler, audio);

    let mut out = stdout();
    enter_terminal(&mut out)?;
    let result = run(&mut out, &mut game);
    game.shutdown();
    // Restore the terminal even if the loop failed
    let restored = leave_terminal(&mut out);

    result?;
    restored?;
    log::info!("Flappy exited");
    Ok(())
}

fn run(out: &mut Stdout, game: &mut TerminalGame) -> Result<(), AppError> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2, renderer::SKY_TOP);
    let mut best = 0;

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(c, r) = ev {
                buf.resize(c as usize, r as usize * 2, renderer::SKY_TOP);
                continue;
            }
            match map_event(&ev, game.phase()) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Signal(signal)) => game.signal(signal),
                None => {}
            }
        }

        // Update
        game.pump(Instant::now());
        if game.phase() == GamePhase::GameOver {
            best = best.max(game.score());
        }

        // Render
        renderer::draw(&mut buf, &game.snapshot(), game.tuning(), best);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }
}

fn enter_terminal(out: &mut Stdout) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )
}

fn leave_terminal(out: &mut Stdout) -> io::Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::EnableLineWrap,
        cursor::Show,
        terminal::LeaveAlternateScreen,
    )?;
    out.flush()?;
    terminal::disable_raw_mode()
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
