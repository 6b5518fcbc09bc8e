//! Events emitted by the simulation for external collaborators

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::FRAMES_PER_SECOND;

/// Discrete audio cues (playback is done by an external sink)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Shoot,
    Hit,
    Explosion,
    Collect,
    PowerUp,
    ShieldBreak,
    GameOver,
    Victory,
}

/// Terminal encounter summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterResult {
    pub survived: bool,
    pub final_score: u64,
    /// Frames simulated (excluding paused frames)
    pub elapsed_frames: u64,
}

impl EncounterResult {
    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_frames as f32 / FRAMES_PER_SECOND as f32
    }
}

/// Something the core wants the outside world to know about this frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Audio(AudioCue),
    /// Explosion effect at a position (size in pixels)
    Explosion { pos: Vec2, size: f32 },
    EliteSpawned { name: &'static str },
    BossSpawned { name: &'static str },
    UltimateTriggered { name: &'static str },
    ShieldBroken,
    /// Fired exactly once per encounter
    EncounterEnded(EncounterResult),
}
