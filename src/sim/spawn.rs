//! Spawner: standard enemies on a cooldown, elites on score deltas, one boss
//! on a score threshold.
//!
//! At most one of {elite, boss} is alive at any time. Requests that would break
//! that are dropped without error.

use glam::Vec2;
use rand::Rng;

use super::archetypes::{
    BOSS_ROSTER, BossPattern, ELITE_ROSTER, ElitePattern, boss_by_name, elite_by_name,
};
use super::events::GameEvent;
use super::state::{Boss, CombatPhase, Elite, Enemy, EnemyKind, GameState, RewardThresholds};
use crate::consts::*;

/// Run all spawn gates for this frame
pub fn update_spawner(state: &mut GameState) {
    // The boss suppresses both the enemy and elite spawners
    if state.boss.is_some() {
        return;
    }

    state.spawn.enemy_timer = state.spawn.enemy_timer.saturating_sub(1);
    if state.spawn.enemy_timer == 0 {
        let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
        spawn_enemy(state, kind);
        state.spawn.enemy_timer = state.tuning.enemy_spawn_interval;
    }

    // Boss first: when both gates open on the same frame the boss wins
    if !state.spawn.boss_spawned && state.score >= state.tuning.boss_score_threshold {
        let pattern = match state.tuning.boss.as_deref().and_then(boss_by_name) {
            Some(pattern) => pattern,
            None => BOSS_ROSTER[state.rng.random_range(0..BOSS_ROSTER.len())],
        };
        if spawn_boss(state, pattern) {
            return;
        }
    }

    if state.score.saturating_sub(state.spawn.score_at_last_elite)
        >= state.tuning.elite_score_interval
    {
        let pattern = match state.tuning.elite.as_deref().and_then(elite_by_name) {
            Some(pattern) => pattern,
            None => ELITE_ROSTER[state.rng.random_range(0..ELITE_ROSTER.len())],
        };
        spawn_elite(state, pattern);
    }
}

/// Spawn a standard enemy just above the canvas
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind) {
    let size = kind.size();
    let (min_speed, max_speed) = kind.speed_range();
    let speed = state.rng.random_range(min_speed..=max_speed);
    let x = state.rng.random_range(size..CANVAS_WIDTH - size);
    let vx = match kind {
        EnemyKind::Interceptor => {
            if state.rng.random_bool(0.5) {
                1.5
            } else {
                -1.5
            }
        }
        EnemyKind::Asteroid => state.rng.random_range(-0.8..0.8),
        _ => 0.0,
    };
    let shoot_timer = match kind.shoot_cooldown() {
        Some(cooldown) => state.rng.random_range(cooldown / 2..=cooldown),
        None => 0,
    };
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        kind,
        pos: Vec2::new(x, -size / 2.0),
        vel: Vec2::new(vx, speed),
        size,
        shoot_timer,
        age: 0,
    });
}

/// Spawn an elite if neither an elite nor a boss is alive. Returns whether it spawned.
pub fn spawn_elite(state: &mut GameState, pattern: &'static dyn ElitePattern) -> bool {
    if state.elite.is_some() || state.boss.is_some() {
        return false;
    }
    let profile = pattern.profile();
    let anchor_x = state.rng.random_range(100.0..CANVAS_WIDTH - 100.0);
    let id = state.next_entity_id();
    state.elite = Some(Elite {
        id,
        pattern,
        hp: profile.max_hp,
        max_hp: profile.max_hp,
        size: profile.size,
        pos: Vec2::new(anchor_x, -profile.size),
        anchor: Vec2::new(anchor_x, ELITE_ANCHOR_Y),
        phase: CombatPhase::Enter,
        fire_timer: profile.fire_interval,
        sub_phase: 0,
        rewards: RewardThresholds::default(),
    });
    state.spawn.score_at_last_elite = state.score;
    log::info!("Elite {} incoming (score {})", profile.name, state.score);
    state.emit(GameEvent::EliteSpawned { name: profile.name });
    true
}

/// Spawn the boss if neither an elite nor a boss is alive. Returns whether it spawned.
pub fn spawn_boss(state: &mut GameState, pattern: &'static dyn BossPattern) -> bool {
    if state.boss.is_some() || state.elite.is_some() {
        return false;
    }
    let profile = pattern.profile();
    let id = state.next_entity_id();
    state.boss = Some(Boss {
        id,
        pattern,
        hp: profile.max_hp,
        max_hp: profile.max_hp,
        size: profile.size,
        pos: Vec2::new(CANVAS_WIDTH / 2.0, -profile.size),
        phase: CombatPhase::Enter,
        fire_timer: profile.fire_interval,
        sub_phase: 0,
        ultimate_used: false,
        ultimate_active: false,
        ultimate_timer: 0,
        rewards: RewardThresholds::default(),
    });
    state.spawn.boss_spawned = true;
    log::info!("⚠️ Boss {} approaching (score {})", profile.name, state.score);
    state.emit(GameEvent::BossSpawned { name: profile.name });
    true
}
