//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, timers counted in frames
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod archetypes;
pub mod behavior;
pub mod collision;
pub mod damage;
pub mod events;
pub mod kinematics;
pub mod powerup;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use archetypes::{BOSS_ROSTER, BossPattern, ELITE_ROSTER, ElitePattern};
pub use collision::Aabb;
pub use damage::HitOutcome;
pub use events::{AudioCue, EncounterResult, GameEvent};
pub use schedule::{EventQueue, ScheduledAction};
pub use state::{
    Boss, CombatPhase, Elite, Enemy, EnemyKind, Fragment, GamePhase, GameState, Player, PowerUp,
    PowerUpKind, Projectile, Side,
};
pub use tick::{TickInput, tick};
