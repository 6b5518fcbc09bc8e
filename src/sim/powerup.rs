//! Power-ups and the 3-slot inventory
//!
//! `rateOfFire` and `heart` resolve the moment they are collected. Everything
//! else goes into the inventory and only takes effect when its slot is used.

use glam::Vec2;

use super::events::{AudioCue, GameEvent};
use super::state::{GameState, PowerUpKind, Projectile, Sidekick};
use crate::consts::*;

/// Resolve a collected pickup
pub fn collect(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::RateOfFire => {
            let player = &mut state.player;
            player.fire_rate_level = (player.fire_rate_level + 1).min(MAX_FIRE_RATE_LEVEL);
            log::debug!("Fire rate level {}", player.fire_rate_level);
            state.emit(GameEvent::Audio(AudioCue::PowerUp));
        }
        PowerUpKind::Heart => {
            let player = &mut state.player;
            player.hearts = (player.hearts + 1).min(MAX_HEARTS);
            state.emit(GameEvent::Audio(AudioCue::PowerUp));
        }
        _ => {
            if let Some(evicted) = state.player.inventory.push(kind) {
                log::debug!("Inventory full: {:?} evicted for {:?}", evicted, kind);
            }
            state.emit(GameEvent::Audio(AudioCue::Collect));
        }
    }
}

/// Activate the item in 1-based `slot`. Returns false for an empty slot.
pub fn use_slot(state: &mut GameState, slot: usize) -> bool {
    let Some(kind) = state.player.inventory.take(slot) else {
        log::warn!("Inventory slot {} is empty", slot);
        return false;
    };
    activate(state, kind);
    true
}

/// Start a deferred power-up's effect
pub fn activate(state: &mut GameState, kind: PowerUpKind) {
    log::debug!("Activating {:?}", kind);
    let tuning = &state.tuning;
    let buffs = &mut state.player.buffs;
    match kind {
        PowerUpKind::Shield => {
            state.player.shield_active = true;
            state.player.shield_ticks = tuning.shield_duration;
        }
        PowerUpKind::TripleShot => buffs.triple_shot = tuning.triple_shot_duration,
        PowerUpKind::Laser => buffs.laser = tuning.laser_duration,
        PowerUpKind::Ghost => buffs.ghost = tuning.ghost_duration,
        PowerUpKind::Slowmo => buffs.slowmo = tuning.slowmo_duration,
        PowerUpKind::Sidekick => {
            buffs.sidekick = tuning.sidekick_duration;
            if state.sidekicks.is_empty() {
                for offset in [-SIDEKICK_OFFSET, SIDEKICK_OFFSET] {
                    let id = state.next_entity_id();
                    state.sidekicks.push(Sidekick {
                        id,
                        offset,
                        pos: state.player.pos + Vec2::new(offset, 10.0),
                        fire_timer: SIDEKICK_FIRE_INTERVAL,
                    });
                }
            }
        }
        PowerUpKind::Emp => detonate_emp(state),
        // Instant kinds never reach the inventory, but resolve them anyway
        PowerUpKind::RateOfFire | PowerUpKind::Heart => {
            collect(state, kind);
            return;
        }
    }
    state.emit(GameEvent::Audio(AudioCue::PowerUp));
}

/// Clear every standard enemy and enemy bullet, scoring per enemy
fn detonate_emp(state: &mut GameState) {
    let cleared = state.enemies.len() as u64;
    let blasts: Vec<(Vec2, f32)> = state.enemies.iter().map(|e| (e.pos, e.size)).collect();
    for (pos, size) in blasts {
        state.emit(GameEvent::Explosion { pos, size });
    }
    state.enemies.clear();
    state.enemy_bullets.clear();
    state.score += cleared * state.tuning.emp_score_per_enemy;
    state.shake(0.6);
    log::debug!("EMP cleared {} enemies", cleared);
}

/// Tick down timed buffs; drones leave with the sidekick buff
pub fn update_buffs(state: &mut GameState) {
    let buffs = &mut state.player.buffs;
    for timer in [
        &mut buffs.triple_shot,
        &mut buffs.laser,
        &mut buffs.ghost,
        &mut buffs.sidekick,
        &mut buffs.slowmo,
    ] {
        *timer = timer.saturating_sub(1);
    }
    if state.player.buffs.sidekick == 0 {
        state.sidekicks.clear();
    }
}

/// Drones follow the player and fire on their own timer
pub fn update_sidekicks(state: &mut GameState) {
    let mut shots = Vec::new();
    for drone in &mut state.sidekicks {
        drone.pos = state.player.pos + Vec2::new(drone.offset, 10.0);
        drone.fire_timer = drone.fire_timer.saturating_sub(1);
        if drone.fire_timer == 0 {
            drone.fire_timer = SIDEKICK_FIRE_INTERVAL;
            shots.push(Projectile::player(
                drone.pos,
                Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            ));
        }
    }
    for shot in shots {
        state.add_projectile(shot);
    }
}
