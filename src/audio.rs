//! Audio cues
//!
//! The game only announces *that* a cue should play. Playback is entirely the
//! collaborator's problem and its failures never reach the simulation.

use std::io::Write;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Avatar flapped
    Jump,
    /// Run ended
    Death,
}

/// Fire-and-forget notifications emitted by the game
pub trait AudioCues {
    fn on_jump(&mut self);
    fn on_game_over(&mut self);
}

/// Audio collaborator that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioCues for NullAudio {
    fn on_jump(&mut self) {}
    fn on_game_over(&mut self) {}
}

/// Terminal audio: sound effects are rendered as the terminal bell
pub struct AudioManager<W: Write> {
    out: W,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    jump_bell: bool,
}

impl<W: Write> AudioManager<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            jump_bell: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Ring on every jump, not just on death
    pub fn set_jump_bell(&mut self, enabled: bool) {
        self.jump_bell = enabled;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.effective_volume() <= 0.0 {
            return;
        }
        if effect == SoundEffect::Jump && !self.jump_bell {
            return;
        }

        let result = self
            .out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            log::warn!("{:?} sound playback failed: {}", effect, e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioCues for AudioManager<W> {
    fn on_jump(&mut self) {
        self.play(SoundEffect::Jump);
    }

    fn on_game_over(&mut self) {
        self.play(SoundEffect::Death);
    }
}
