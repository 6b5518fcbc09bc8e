//! Hostile behavior: standard enemy movement/fire and the elite/boss state machine
//!
//! Elite: Enter -> Attack, removed the moment its HP hits zero.
//! Boss:  Enter -> Attack (+ one HP-triggered ultimate) -> Defeat sequence -> removed.
//! Attack geometry comes from the archetype's pattern object, never from a
//! type switch in here.

use glam::Vec2;
use rand::Rng;

use super::archetypes::{AttackContext, Barrage};
use super::damage::end_encounter;
use super::events::{AudioCue, GameEvent};
use super::schedule::ScheduledAction;
use super::state::{CombatPhase, Distortion, EnemyKind, GameState, Projectile};
use crate::consts::*;
use crate::{angle_of, from_angle};

/// Frames between blasts during the boss defeat sequence
const DEFEAT_BLAST_INTERVAL: u32 = 15;
/// Guaranteed drops when a boss goes down
const BOSS_DEFEAT_DROPS: u32 = 5;
/// Guaranteed drops when an elite goes down
const ELITE_DEFEAT_DROPS: u32 = 3;

/// Move standard enemies and let the armed ones shoot
pub fn update_enemies(state: &mut GameState) {
    let target = state.player.pos;
    let mut shots = Vec::new();

    for enemy in &mut state.enemies {
        enemy.age += 1;
        match enemy.kind {
            EnemyKind::Kamikaze => {
                let dx = target.x - enemy.pos.x;
                enemy.vel.x = dx.signum() * (dx.abs() * 0.05).min(2.0);
            }
            EnemyKind::Interceptor => {
                if enemy.age % 60 == 0 {
                    enemy.vel.x = -enemy.vel.x;
                }
            }
            _ => {}
        }
        enemy.pos += enemy.vel;
        enemy.pos.x = enemy.pos.x.clamp(enemy.size / 2.0, CANVAS_WIDTH - enemy.size / 2.0);

        let Some(cooldown) = enemy.kind.shoot_cooldown() else {
            continue;
        };
        enemy.shoot_timer = enemy.shoot_timer.saturating_sub(1);
        // Hold fire until on screen
        if enemy.shoot_timer == 0 && enemy.pos.y > 0.0 {
            enemy.shoot_timer = cooldown;
            let muzzle = enemy.pos + Vec2::new(0.0, enemy.size / 2.0);
            let dir = if enemy.kind == EnemyKind::Gunship {
                from_angle(angle_of(target - muzzle))
            } else {
                Vec2::Y
            };
            shots.push(Projectile::enemy(muzzle, dir * ENEMY_BULLET_SPEED));
        }
    }

    for shot in shots {
        state.add_projectile(shot);
    }
}

/// Step `pos` toward `anchor`; true once arrived
fn approach(pos: &mut Vec2, anchor: Vec2, speed: f32) -> bool {
    let offset = anchor - *pos;
    if offset.length() <= speed {
        *pos = anchor;
        true
    } else {
        *pos += offset.normalize() * speed;
        false
    }
}

/// Elite state machine
pub fn update_elite(state: &mut GameState) {
    let target = state.player.pos;
    let turn_rate = state.tuning.homing_turn_rate;
    let frame = state.frame;

    let barrage = {
        let Some(elite) = state.elite.as_mut() else {
            return;
        };
        match elite.phase {
            CombatPhase::Enter => {
                if approach(&mut elite.pos, elite.anchor, BOSS_ENTER_SPEED) {
                    elite.phase = CombatPhase::Attack;
                }
                None
            }
            CombatPhase::Attack => {
                let sway = (frame as f32 * 0.02).sin() * 80.0;
                let half = elite.size / 2.0;
                elite.pos.x = (elite.anchor.x + sway).clamp(half, CANVAS_WIDTH - half);

                elite.fire_timer = elite.fire_timer.saturating_sub(1);
                if elite.fire_timer == 0 {
                    elite.fire_timer = elite.pattern.profile().fire_interval;
                    let ctx = AttackContext {
                        origin: elite.pos,
                        target,
                        sub_phase: elite.sub_phase,
                        homing_turn_rate: turn_rate,
                    };
                    elite.sub_phase += 1;
                    Some((elite.id, elite.pattern.attack(&ctx, &mut state.rng)))
                } else {
                    None
                }
            }
            // Elites are removed on defeat
            CombatPhase::Defeat { .. } => None,
        }
    };

    if let Some((owner, barrage)) = barrage {
        apply_barrage(state, owner, barrage);
    }
}

/// Boss state machine
pub fn update_boss(state: &mut GameState) {
    let target = state.player.pos;
    let turn_rate = state.tuning.homing_turn_rate;
    let frame = state.frame;

    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    if let CombatPhase::Defeat { frames_left } = boss.phase {
        let frames_left = frames_left.saturating_sub(1);
        boss.phase = CombatPhase::Defeat { frames_left };
        let (pos, size) = (boss.pos, boss.size);
        if frames_left == 0 {
            finish_boss(state);
        } else if frames_left % DEFEAT_BLAST_INTERVAL == 0 {
            let offset = Vec2::new(
                state.rng.random_range(-size / 2.0..size / 2.0),
                state.rng.random_range(-size / 2.0..size / 2.0),
            );
            state.emit(GameEvent::Explosion {
                pos: pos + offset,
                size: size * 0.5,
            });
            state.emit(GameEvent::Audio(AudioCue::Explosion));
            state.shake(0.3);
        }
        return;
    }

    // Ultimate clock runs in any live phase
    if boss.ultimate_active {
        boss.ultimate_timer = boss.ultimate_timer.saturating_sub(1);
        if let Some(d) = state.distortion.as_mut() {
            d.elapsed += 1;
        }
        if boss.ultimate_timer == 0 {
            boss.ultimate_active = false;
            state.distortion = None;
            log::info!("{} ultimate ended", boss.pattern.profile().name);
        }
    }

    let anchor = Vec2::new(CANVAS_WIDTH / 2.0, BOSS_ANCHOR_Y);
    let barrage = match boss.phase {
        CombatPhase::Enter => {
            if approach(&mut boss.pos, anchor, BOSS_ENTER_SPEED) {
                boss.phase = CombatPhase::Attack;
            }
            None
        }
        CombatPhase::Attack => {
            let half = boss.size / 2.0;
            let sway = (frame as f32 * 0.01).sin() * 150.0;
            boss.pos.x = (anchor.x + sway).clamp(half, CANVAS_WIDTH - half);

            // Regular attacks pause while the ultimate runs
            if boss.ultimate_active {
                None
            } else {
                boss.fire_timer = boss.fire_timer.saturating_sub(1);
                if boss.fire_timer == 0 {
                    boss.fire_timer = boss.pattern.profile().fire_interval;
                    let ctx = AttackContext {
                        origin: boss.pos,
                        target,
                        sub_phase: boss.sub_phase,
                        homing_turn_rate: turn_rate,
                    };
                    boss.sub_phase += 1;
                    Some((boss.id, boss.pattern.attack(&ctx, &mut state.rng)))
                } else {
                    None
                }
            }
        }
        CombatPhase::Defeat { .. } => None,
    };

    if let Some((owner, barrage)) = barrage {
        apply_barrage(state, owner, barrage);
    }
}

/// Spawn a barrage now and queue its staggered parts under `owner`
pub fn apply_barrage(state: &mut GameState, owner: u32, barrage: Barrage) {
    let now = state.frame;
    for shot in barrage.shots {
        state.add_projectile(shot);
    }
    for (delay, shots) in barrage.staggered {
        if delay == 0 {
            for shot in shots {
                state.add_projectile(shot);
            }
        } else {
            state
                .schedule
                .schedule(now, delay, ScheduledAction::EnemyShots { owner, shots });
        }
    }
    for (delay, hazards) in barrage.hazards {
        if delay == 0 {
            for hazard in hazards {
                state.add_fragment(hazard);
            }
        } else {
            state
                .schedule
                .schedule(now, delay, ScheduledAction::Hazards { owner, hazards });
        }
    }
}

/// Two pickups mirrored either side of `pos`
fn drop_symmetric(state: &mut GameState, pos: Vec2, spread: f32) {
    state.drop_random_powerup(pos + Vec2::new(-spread, 0.0));
    state.drop_random_powerup(pos + Vec2::new(spread, 0.0));
}

/// Apply damage to the elite; removes it at zero HP
pub fn damage_elite(state: &mut GameState, amount: u32) {
    let Some(elite) = state.elite.as_mut() else {
        return;
    };
    elite.hp = elite.hp.saturating_sub(amount);
    let crossed = elite.rewards.claim(elite.hp, elite.max_hp);
    let (pos, size, hp) = (elite.pos, elite.size, elite.hp);

    state.emit(GameEvent::Audio(AudioCue::Hit));
    for _ in 0..crossed {
        drop_symmetric(state, pos, size / 2.0 + 20.0);
    }
    if hp == 0 {
        defeat_elite(state);
    }
}

fn defeat_elite(state: &mut GameState) {
    let Some(elite) = state.elite.take() else {
        return;
    };
    let name = elite.pattern.profile().name;
    log::info!("Elite {} destroyed", name);
    state.schedule.cancel_owner(elite.id);
    state.score += state.tuning.elite_kill_score;
    state.emit(GameEvent::Explosion {
        pos: elite.pos,
        size: elite.size * 1.5,
    });
    state.emit(GameEvent::Audio(AudioCue::Explosion));
    state.shake(0.5);

    // Sequenced reward drops
    let now = state.frame;
    for i in 0..ELITE_DEFEAT_DROPS {
        let pos = elite.pos + Vec2::new((i as f32 - 1.0) * 30.0, 0.0);
        state
            .schedule
            .schedule(now, i * 10, ScheduledAction::RewardDrop { pos });
    }
}

/// Apply damage to the boss: reward thresholds, ultimate trigger, defeat
pub fn damage_boss(state: &mut GameState, amount: u32) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if boss.is_defeated() {
        return;
    }
    boss.hp = boss.hp.saturating_sub(amount);
    let crossed = boss.rewards.claim(boss.hp, boss.max_hp);

    let trigger_ultimate =
        !boss.ultimate_used && boss.hp > 0 && boss.hp_fraction() <= ULTIMATE_HP_FRACTION;
    if trigger_ultimate {
        boss.ultimate_used = true;
    }
    let defeated = boss.hp == 0;
    let (pos, size) = (boss.pos, boss.size);

    state.emit(GameEvent::Audio(AudioCue::Hit));
    for _ in 0..crossed {
        drop_symmetric(state, pos, size / 2.0 + 20.0);
    }
    if trigger_ultimate {
        start_ultimate(state);
    }
    if defeated {
        begin_boss_defeat(state);
    }
}

fn start_ultimate(state: &mut GameState) {
    let target = state.player.pos;
    let turn_rate = state.tuning.homing_turn_rate;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let ctx = AttackContext {
        origin: boss.pos,
        target,
        sub_phase: boss.sub_phase,
        homing_turn_rate: turn_rate,
    };
    let ultimate = boss.pattern.ultimate(&ctx, &mut state.rng);
    let profile = boss.pattern.profile();
    let owner = boss.id;
    boss.ultimate_active = true;
    boss.ultimate_timer = ultimate.duration;

    log::info!("🔥 {} unleashes {}", profile.name, profile.ultimate_name);
    if ultimate.distortion {
        state.distortion = Some(Distortion {
            elapsed: 0,
            duration: ultimate.duration,
        });
        for bullet in &mut state.enemy_bullets {
            if bullet.behavior.distortion_base.is_none() {
                bullet.behavior.distortion_base = Some(bullet.vel);
            }
        }
    }
    apply_barrage(state, owner, ultimate.barrage);
    state.shake(0.5);
    state.emit(GameEvent::UltimateTriggered { name: profile.name });
}

fn begin_boss_defeat(state: &mut GameState) {
    let frames = state.tuning.boss_defeat_frames.max(1);
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.phase = CombatPhase::Defeat {
        frames_left: frames,
    };
    boss.ultimate_active = false;
    let (id, pos, size) = (boss.id, boss.pos, boss.size);
    state.schedule.cancel_owner(id);
    log::info!("💥 {} is going down", boss.pattern.profile().name);
    state.distortion = None;
    state.emit(GameEvent::Explosion { pos, size });
    state.emit(GameEvent::Audio(AudioCue::Explosion));
    state.shake(0.8);
}

/// End of the defeat sequence: award, drops, removal, victory
fn finish_boss(state: &mut GameState) {
    let Some(boss) = state.boss.take() else {
        return;
    };
    state.score += state.tuning.boss_kill_score;
    for i in 0..BOSS_DEFEAT_DROPS {
        let x = (i as f32 - (BOSS_DEFEAT_DROPS - 1) as f32 / 2.0) * 40.0;
        state.drop_random_powerup(boss.pos + Vec2::new(x, 0.0));
    }
    state.emit(GameEvent::Explosion {
        pos: boss.pos,
        size: boss.size * 2.0,
    });
    state.shake(1.0);
    log::info!("{} defeated", boss.pattern.profile().name);
    end_encounter(state, true);
}
