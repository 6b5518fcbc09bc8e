//! Collision detection and response
//!
//! Every hitbox is an axis-aligned box centered on the entity's position.
//! Resolution order per frame: player bullets (enemy, pickup, elite, boss;
//! first match wins), laser beam, enemy bullets, enemy bodies, fragments.

use glam::Vec2;
use rand::Rng;

use super::behavior::{damage_boss, damage_elite};
use super::damage::{HitOutcome, hit_player};
use super::events::{AudioCue, GameEvent};
use super::powerup::collect;
use super::state::{Enemy, EnemyKind, Fragment, GameState, Projectile};
use crate::consts::*;
use crate::from_angle;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Square box of edge `size`
    pub fn square(center: Vec2, size: f32) -> Self {
        Self::centered(center, Vec2::splat(size))
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Vertical beam from the player up to the top of the canvas
pub fn laser_beam(player_pos: Vec2) -> Aabb {
    Aabb {
        min: Vec2::new(player_pos.x - LASER_HALF_WIDTH, 0.0),
        max: Vec2::new(player_pos.x + LASER_HALF_WIDTH, player_pos.y),
    }
}

/// Run every collision pairing for this frame
pub fn resolve_collisions(state: &mut GameState) {
    // Fragments born this frame start colliding next frame
    let settled_fragments = state.fragments.len();
    resolve_player_bullets(state);
    resolve_laser(state);
    resolve_player_contacts(state, settled_fragments);
}

fn resolve_player_bullets(state: &mut GameState) {
    let bullets = std::mem::take(&mut state.player_bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        if !consume_player_bullet(state, &bullet) {
            survivors.push(bullet);
        }
    }

    // Keep anything spawned while resolving (none today, but order stays by id)
    survivors.append(&mut state.player_bullets);
    state.player_bullets = survivors;
}

/// Returns true if the bullet hit something and is used up
fn consume_player_bullet(state: &mut GameState, bullet: &Projectile) -> bool {
    let hitbox = Aabb::square(bullet.pos, bullet.size);

    if let Some(idx) = state
        .enemies
        .iter()
        .position(|e| hitbox.overlaps(&Aabb::square(e.pos, e.size)))
    {
        let enemy = state.enemies.remove(idx);
        destroy_enemy(state, &enemy, true);
        return true;
    }

    // Pickups are collected by shooting them
    if let Some(idx) = state
        .powerups
        .iter()
        .position(|p| hitbox.overlaps(&Aabb::square(p.pos, POWERUP_SIZE)))
    {
        let pickup = state.powerups.remove(idx);
        log::debug!("Collected {:?}", pickup.kind);
        collect(state, pickup.kind);
        return true;
    }

    let damage = state.tuning.bullet_damage;

    let elite_hit = state
        .elite
        .as_ref()
        .is_some_and(|e| hitbox.overlaps(&Aabb::square(e.pos, e.size)));
    if elite_hit {
        damage_elite(state, damage);
        return true;
    }

    // A boss in its defeat sequence no longer stops bullets
    let boss_hit = state
        .boss
        .as_ref()
        .is_some_and(|b| !b.is_defeated() && hitbox.overlaps(&Aabb::square(b.pos, b.size)));
    if boss_hit {
        damage_boss(state, damage);
        return true;
    }

    false
}

/// Continuous laser damage (per frame, not per hit)
fn resolve_laser(state: &mut GameState) {
    if !state.laser_firing {
        return;
    }
    let beam = laser_beam(state.player.pos);

    let (burned, kept): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| beam.overlaps(&Aabb::square(e.pos, e.size)));
    state.enemies = kept;
    for enemy in &burned {
        destroy_enemy(state, enemy, true);
    }

    let damage = state.tuning.laser_damage;
    if state
        .elite
        .as_ref()
        .is_some_and(|e| beam.overlaps(&Aabb::square(e.pos, e.size)))
    {
        damage_elite(state, damage);
    }
    if state
        .boss
        .as_ref()
        .is_some_and(|b| !b.is_defeated() && beam.overlaps(&Aabb::square(b.pos, b.size)))
    {
        damage_boss(state, damage);
    }
}

/// Enemy bullets, enemy bodies and fragments against the player
fn resolve_player_contacts(state: &mut GameState, mut settled_fragments: usize) {
    let player_box = Aabb::square(state.player.pos, state.player.size);

    // Contacts absorbed by ghost/invincibility pass straight through
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        let b = &state.enemy_bullets[i];
        if player_box.overlaps(&Aabb::square(b.pos, b.size)) && hit_player(state) != HitOutcome::Ignored
        {
            state.enemy_bullets.remove(i);
        } else {
            i += 1;
        }
    }

    let mut i = 0;
    while i < state.enemies.len() {
        let e = &state.enemies[i];
        if player_box.overlaps(&Aabb::square(e.pos, e.size)) && hit_player(state) != HitOutcome::Ignored
        {
            let enemy = state.enemies.remove(i);
            destroy_enemy(state, &enemy, false);
        } else {
            i += 1;
        }
    }

    let mut i = 0;
    while i < settled_fragments {
        let f = &state.fragments[i];
        if player_box.overlaps(&Aabb::square(f.pos, f.size)) && hit_player(state) != HitOutcome::Ignored
        {
            state.fragments.remove(i);
            settled_fragments -= 1;
        } else {
            i += 1;
        }
    }
}

/// Explosion and fragment roll for a destroyed standard enemy; `award` adds score and the drop roll
pub fn destroy_enemy(state: &mut GameState, enemy: &Enemy, award: bool) {
    state.emit(GameEvent::Explosion {
        pos: enemy.pos,
        size: enemy.size,
    });
    state.emit(GameEvent::Audio(AudioCue::Explosion));
    state.shake(0.05);

    if award {
        state.score += enemy.kind.score();
        if state.rng.random_bool(state.tuning.powerup_drop_chance) {
            state.drop_random_powerup(enemy.pos);
        }
    }

    // Asteroids may break up however they die
    if enemy.kind == EnemyKind::Asteroid && state.rng.random_bool(state.tuning.fragment_chance) {
        let count = state.rng.random_range(3..=6);
        for _ in 0..count {
            let heading = state.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = state.rng.random_range(2.0..3.5);
            state.add_fragment(Fragment::new(
                enemy.pos,
                from_angle(heading) * speed,
                FRAGMENT_SIZE,
                FRAGMENT_LIFETIME,
            ));
        }
    }
}
