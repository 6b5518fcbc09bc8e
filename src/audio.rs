//! Audio cue routing
//!
//! The simulation only emits `AudioCue`s. Playback belongs to an external
//! `AudioSink`; this module applies volume/mute and hands each cue a
//! procedural tone description the sink may synthesize from.

use crate::sim::{AudioCue, GameEvent};

/// Oscillator waveform for a procedural cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Procedural sound description: a pitch sweep with a decaying envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start frequency (Hz)
    pub freq: f32,
    /// Frequency at the end of the sweep (Hz)
    pub end_freq: f32,
    /// Length in seconds
    pub duration: f32,
    /// Relative loudness before volume scaling
    pub gain: f32,
}

impl AudioCue {
    /// Procedural tone for this cue
    pub fn tone(self) -> Tone {
        let (waveform, freq, end_freq, duration, gain) = match self {
            AudioCue::Shoot => (Waveform::Square, 880.0, 440.0, 0.06, 0.15),
            AudioCue::Hit => (Waveform::Triangle, 300.0, 200.0, 0.08, 0.3),
            AudioCue::Explosion => (Waveform::Sawtooth, 120.0, 30.0, 0.4, 0.5),
            AudioCue::Collect => (Waveform::Sine, 600.0, 1200.0, 0.12, 0.4),
            AudioCue::PowerUp => (Waveform::Sine, 400.0, 1600.0, 0.25, 0.4),
            AudioCue::ShieldBreak => (Waveform::Square, 500.0, 100.0, 0.3, 0.4),
            AudioCue::GameOver => (Waveform::Sawtooth, 300.0, 50.0, 1.2, 0.5),
            AudioCue::Victory => (Waveform::Triangle, 523.0, 1047.0, 1.0, 0.5),
        };
        Tone {
            waveform,
            freq,
            end_freq,
            duration,
            gain,
        }
    }
}

/// External playback surface
pub trait AudioSink {
    /// Play one cue at the given effective volume (0.0 - 1.0)
    fn play(&mut self, cue: AudioCue, tone: Tone, volume: f32);
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
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

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a single cue
    pub fn play(&mut self, cue: AudioCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, cue.tone(), vol);
    }

    /// Forward every audio cue from a frame's events
    pub fn route(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::Audio(cue) = event {
                self.play(*cue);
            }
        }
    }
}
