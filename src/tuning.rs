//! Data-driven game balance
//!
//! Every numeric balance knob lives here so encounters can be rebalanced from a
//! JSON file without touching simulation code. Missing fields fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::archetypes::{boss_by_name, elite_by_name};

/// Balance constants for one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Frames between standard enemy spawns
    pub enemy_spawn_interval: u32,
    /// Score gained since the last elite before another may spawn
    pub elite_score_interval: u64,
    /// Score at which the boss arrives
    pub boss_score_threshold: u64,

    // === Player ===
    /// Player movement speed (pixels per frame)
    pub player_speed: f32,
    /// Shot cooldown at fire-rate level 1 (frames)
    pub base_fire_cooldown: u32,
    /// Cooldown reduction per fire-rate level above 1
    pub fire_cooldown_step: u32,
    /// Post-hit invincibility window (frames)
    pub invincibility_frames: u32,

    // === Damage ===
    /// HP removed from an elite/boss per bullet hit
    pub bullet_damage: u32,
    /// HP removed from an elite/boss per frame of laser contact
    pub laser_damage: u32,

    // === Scoring ===
    pub elite_kill_score: u64,
    pub boss_kill_score: u64,
    pub emp_score_per_enemy: u64,

    // === Drops ===
    /// Chance a destroyed standard enemy drops a pickup
    pub powerup_drop_chance: f64,
    /// Chance an asteroid fragments on destruction
    pub fragment_chance: f64,
    /// Frames a pickup stays on the field
    pub pickup_lifetime: u32,

    // === Buff durations (frames) ===
    pub shield_duration: u32,
    pub triple_shot_duration: u32,
    pub laser_duration: u32,
    pub ghost_duration: u32,
    pub sidekick_duration: u32,
    pub slowmo_duration: u32,
    /// Multiplier applied to enemy-bullet motion during slow-mo
    pub slowmo_factor: f32,

    // === Bosses ===
    /// Homing projectile turn rate (radians per frame)
    pub homing_turn_rate: f32,
    /// Length of the scripted boss defeat sequence (frames)
    pub boss_defeat_frames: u32,
    /// Always spawn this boss archetype (by name) instead of rolling one
    pub boss: Option<String>,
    /// Always spawn this elite archetype (by name) instead of rolling one
    pub elite: Option<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_spawn_interval: 40,
            elite_score_interval: 3000,
            boss_score_threshold: 10_000,

            player_speed: 5.0,
            base_fire_cooldown: 18,
            fire_cooldown_step: 3,
            invincibility_frames: 120,

            bullet_damage: 5,
            laser_damage: 1,

            elite_kill_score: 1000,
            boss_kill_score: 10_000,
            emp_score_per_enemy: 50,

            powerup_drop_chance: 0.1,
            fragment_chance: 0.3,
            pickup_lifetime: 600,

            shield_duration: 600,
            triple_shot_duration: 600,
            laser_duration: 300,
            ghost_duration: 300,
            sidekick_duration: 900,
            slowmo_duration: 450,
            slowmo_factor: 0.5,

            homing_turn_rate: 0.05,
            boss_defeat_frames: 180,
            boss: None,
            elite: None,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the active balance)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<()> {
        if self.enemy_spawn_interval == 0 {
            return Err(invalid("enemy_spawn_interval", 0.0, "must be at least 1 frame"));
        }
        if self.base_fire_cooldown == 0 {
            return Err(invalid("base_fire_cooldown", 0.0, "must be at least 1 frame"));
        }
        if self.bullet_damage == 0 {
            return Err(invalid("bullet_damage", 0.0, "must be positive"));
        }
        for (field, chance) in [
            ("powerup_drop_chance", self.powerup_drop_chance),
            ("fragment_chance", self.fragment_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(field, chance, "must be within [0, 1]"));
            }
        }
        if !(0.0..=1.0).contains(&self.slowmo_factor) || self.slowmo_factor == 0.0 {
            return Err(invalid(
                "slowmo_factor",
                self.slowmo_factor as f64,
                "must be within (0, 1]",
            ));
        }
        if self.homing_turn_rate <= 0.0 || self.homing_turn_rate > std::f32::consts::PI {
            return Err(invalid(
                "homing_turn_rate",
                self.homing_turn_rate as f64,
                "must be within (0, π]",
            ));
        }
        if let Some(name) = self.boss.as_deref().filter(|n| boss_by_name(n).is_none()) {
            return Err(Error::UnknownArchetype {
                kind: "boss",
                name: name.to_string(),
            });
        }
        if let Some(name) = self.elite.as_deref().filter(|n| elite_by_name(n).is_none()) {
            return Err(Error::UnknownArchetype {
                kind: "elite",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Shot cooldown for a fire-rate level (1..=5)
    pub fn fire_cooldown(&self, level: u8) -> u32 {
        let steps = level.saturating_sub(1) as u32 * self.fire_cooldown_step;
        self.base_fire_cooldown.saturating_sub(steps).max(1)
    }
}

fn invalid(field: &'static str, value: f64, reason: &'static str) -> Error {
    Error::InvalidTuning {
        field,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bullet_damage": 7 }"#).unwrap();
        assert_eq!(tuning.bullet_damage, 7);
        assert_eq!(tuning.enemy_spawn_interval, 40);
    }

    #[test]
    fn test_rejects_out_of_range_chance() {
        let err = Tuning::from_json(r#"{ "fragment_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTuning {
                field: "fragment_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_archetype_names_are_checked() {
        let tuning = Tuning::from_json(r#"{ "boss": "chronos", "elite": "Phantom" }"#).unwrap();
        assert_eq!(tuning.boss.as_deref(), Some("chronos"));

        let err = Tuning::from_json(r#"{ "boss": "Godzilla" }"#).unwrap_err();
        assert!(matches!(err, Error::UnknownArchetype { kind: "boss", .. }));
        assert!(err.to_string().contains("Godzilla"));
    }

    #[test]
    fn test_fire_cooldown_shrinks_with_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.fire_cooldown(1), 18);
        assert_eq!(tuning.fire_cooldown(5), 6);
        assert!(tuning.fire_cooldown(5) < tuning.fire_cooldown(4));
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}
