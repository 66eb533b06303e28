//! Audio cues
//!
//! The simulation only emits `GameEvent`s; `AudioManager` turns them into
//! calls on an `AudioBackend`. Playback itself (decoding, mixing, output)
//! belongs to the backend.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Player took damage
    Hit,
    /// Obstacle passed
    Score,
    /// Scroll speed went up
    SpeedUp,
    /// Health reached zero
    GameOver,
}

impl SoundEffect {
    /// Asset name for sample-based backends
    pub fn asset(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Hit => "hit",
            SoundEffect::Score => "score",
            SoundEffect::SpeedUp => "speed_up",
            SoundEffect::GameOver => "game_over",
        }
    }
}

/// Playback collaborator
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn start_music(&mut self, volume: f32);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn fade_out_music(&mut self, secs: f32);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn start_music(&mut self, _volume: f32) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
    fn fade_out_music(&mut self, _secs: f32) {}
}

/// Writes every cue to the log (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {} @ {:.2}", effect.asset(), volume);
    }

    fn start_music(&mut self, volume: f32) {
        log::debug!("music start @ {:.2}", volume);
    }

    fn pause_music(&mut self) {
        log::debug!("music pause");
    }

    fn resume_music(&mut self) {
        log::debug!("music resume");
    }

    fn fade_out_music(&mut self, secs: f32) {
        log::debug!("music fade out over {}s", secs);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    pub fn from_settings(backend: Box<dyn AudioBackend>, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    /// Map one frame's simulation events to cues
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Jumped => self.play(SoundEffect::Jump),
                GameEvent::Hit { .. } => self.play(SoundEffect::Hit),
                GameEvent::Scored { .. } => self.play(SoundEffect::Score),
                GameEvent::SpeedUp { .. } => self.play(SoundEffect::SpeedUp),
                GameEvent::Died { .. } => self.play(SoundEffect::GameOver),
                GameEvent::MusicStart => {
                    let vol = self.effective_music_volume();
                    self.backend.start_music(vol);
                }
                GameEvent::MusicPause => self.backend.pause_music(),
                GameEvent::MusicResume => self.backend.resume_music(),
                GameEvent::MusicFadeOut { secs } => self.backend.fade_out_music(secs),
                GameEvent::Spawned { .. }
                | GameEvent::PhaseChanged { .. }
                | GameEvent::Restarted { .. } => {}
            }
        }
    }
}
