//! Audio cues
//!
//! The simulation only names sounds; playing them is the job of whatever
//! implements `AudioSink`. Cues are fire-and-forget.

use crate::settings::Settings;

/// Named sound triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player bullet hits an enemy
    Hit,
    /// Critical hit on an enemy
    HitCritical,
    /// Player loses health
    PlayerDamaged,
    /// Wave cleared, shop opens
    WaveComplete,
    /// Final wave cleared
    GameWin,
    /// Player died
    GameOver,
    /// Shop purchase
    Upgrade,
}

impl SoundCue {
    /// Asset-style name used by audio backends
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::HitCritical => "hit_critical",
            SoundCue::PlayerDamaged => "player_damaged",
            SoundCue::WaveComplete => "wave_complete",
            SoundCue::GameWin => "game_win",
            SoundCue::GameOver => "game_over",
            SoundCue::Upgrade => "upgrade",
        }
    }
}

/// Something that can play a cue at a given volume
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Writes cues to the log, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::trace!("sound {} @ {:.2}", cue.as_str(), volume);
    }
}

/// Volume and mute gate in front of a sink
pub struct AudioManager<A: AudioSink> {
    sink: A,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<A: AudioSink> AudioManager<A> {
    pub fn new(sink: A) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(!settings.sound_enabled);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = clamp_volume(vol);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = clamp_volume(vol);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Forward a cue unless silenced
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol);
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}
