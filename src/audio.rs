//! Sound cues and the sinks that receive them
//!
//! The simulation only says *which* cue happened; playback is the sink's
//! business.

use std::collections::HashSet;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// An enemy was destroyed by the laser
    EnemyDestroyed,
    /// Fire control went from idle to firing
    LaserFired,
    /// A coin was banked
    CoinCollected,
    /// A shockwave orb was picked up
    ShockwaveCollected,
    /// Repair bought
    PlayerRepaired,
    /// The ship blew up
    PlayerExploded,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::EnemyDestroyed,
        SoundCue::LaserFired,
        SoundCue::CoinCollected,
        SoundCue::ShockwaveCollected,
        SoundCue::PlayerRepaired,
        SoundCue::PlayerExploded,
    ];

    /// Cue for a gameplay event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::EnemyDestroyed { .. } => Some(SoundCue::EnemyDestroyed),
            GameEvent::LaserStarted => Some(SoundCue::LaserFired),
            GameEvent::CoinCollected => Some(SoundCue::CoinCollected),
            GameEvent::OrbCollected => Some(SoundCue::ShockwaveCollected),
            GameEvent::Repaired => Some(SoundCue::PlayerRepaired),
            GameEvent::PlayerExploded => Some(SoundCue::PlayerExploded),
            GameEvent::PhaseChanged { .. }
            | GameEvent::PlayerHit { .. }
            | GameEvent::ShockwaveActivated { .. }
            | GameEvent::ExitRequested => None,
        }
    }
}

/// Anything that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Keeps every cue it is handed, in order
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    pub cues: Vec<SoundCue>,
}

impl CueRecorder {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

/// Volume-aware sink for runs without an audio device; reports what it
/// would have played
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Cues whose sound failed to load
    silenced: HashSet<SoundCue>,
    played: usize,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            silenced: HashSet::new(),
            played: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Never play `cue` (its sound is unavailable)
    pub fn silence(&mut self, cue: SoundCue) {
        self.silenced.insert(cue);
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues actually played (silent ones don't count)
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 || self.silenced.contains(&cue) {
            return;
        }
        self.played += 1;
        log::debug!("Cue {cue:?} at volume {vol:.2}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_every_audible_event_maps_to_one_cue() {
        assert_eq!(
            SoundCue::for_event(&GameEvent::OrbCollected),
            Some(SoundCue::ShockwaveCollected)
        );
        assert_eq!(
            SoundCue::for_event(&GameEvent::EnemyDestroyed { pos: Vec2::ZERO }),
            Some(SoundCue::EnemyDestroyed)
        );
        assert_eq!(SoundCue::for_event(&GameEvent::ExitRequested), None);
    }

    #[test]
    fn test_muted_manager_plays_nothing() {
        let mut audio = AudioManager::new();
        audio.play(SoundCue::LaserFired);
        assert_eq!(audio.played(), 1);
        audio.set_muted(true);
        audio.play(SoundCue::LaserFired);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_silenced_cue_is_skipped() {
        let mut audio = AudioManager::new();
        audio.silence(SoundCue::CoinCollected);
        audio.play(SoundCue::CoinCollected);
        audio.play(SoundCue::EnemyDestroyed);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_zero_volume_settings_are_silent() {
        let settings = Settings {
            master_volume: 0.0,
            ..Settings::default()
        };
        let mut audio = AudioManager::from_settings(&settings);
        audio.play(SoundCue::CoinCollected);
        assert_eq!(audio.played(), 0);
    }
}
