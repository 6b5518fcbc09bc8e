//! Render data module
//!
//! Drawing itself is done by an external `RenderTarget`. Each frame the driver
//! flattens the simulation state into a back-to-front `DrawList`.

use glam::Vec2;

use crate::consts::*;
use crate::sim::collision::laser_beam;
use crate::sim::{EnemyKind, GamePhase, GameState, PowerUpKind, Projectile};

/// Visual archetype of a draw request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    Player { shielded: bool },
    Sidekick,
    PlayerBullet,
    /// Full-height beam; `size` is the beam extent
    Laser,
    EnemyBullet { special: bool },
    Enemy(EnemyKind),
    Elite { name: &'static str },
    Boss { name: &'static str, ultimate: bool },
    Fragment,
    PowerUp(PowerUpKind),
}

/// HP-bar data for elite and boss
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpBar {
    pub hp: u32,
    pub max_hp: u32,
}

impl HpBar {
    pub fn fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

/// One entity to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub visual: Visual,
    pub pos: Vec2,
    pub size: Vec2,
    /// RGBA, 0-1
    pub color: [f32; 4],
    pub hp_bar: Option<HpBar>,
}

/// Per-frame values not tied to one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub hearts: u8,
    pub fire_rate_level: u8,
    pub inventory: Vec<PowerUpKind>,
    /// 0-1, the target offsets the camera by it
    pub screen_shake: f32,
    pub paused: bool,
    pub distortion_active: bool,
}

/// Everything a render target needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub hud: Hud,
    /// Back to front
    pub requests: Vec<DrawRequest>,
}

/// External drawing surface
pub trait RenderTarget {
    fn draw(&mut self, list: &DrawList);
}

/// 0xRRGGBB to RGBA
pub fn hex_color(rgb: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

fn enemy_color(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Scout => 0x55ff55,
        EnemyKind::Fighter => 0xff5555,
        EnemyKind::Bomber => 0xffaa00,
        EnemyKind::Interceptor => 0x55aaff,
        EnemyKind::Gunship => 0xaa55ff,
        EnemyKind::Kamikaze => 0xff2277,
        EnemyKind::Asteroid => 0x998877,
    }
}

fn powerup_color(kind: PowerUpKind) -> u32 {
    match kind {
        PowerUpKind::Shield => 0x00bfff,
        PowerUpKind::RateOfFire => 0xffd700,
        PowerUpKind::TripleShot => 0xff8c00,
        PowerUpKind::Emp => 0x7fffd4,
        PowerUpKind::Laser => 0xff0040,
        PowerUpKind::Ghost => 0xdddddd,
        PowerUpKind::Sidekick => 0x32cd32,
        PowerUpKind::Slowmo => 0x9370db,
        PowerUpKind::Heart => 0xff69b4,
    }
}

fn bullet_is_special(b: &Projectile) -> bool {
    let tags = &b.behavior;
    tags.homing.is_some()
        || tags.gravity.is_some()
        || tags.singularity.is_some()
        || tags.teleport.is_some()
        || tags.glitch.is_some()
        || tags.echo.is_some()
}

/// Flatten the state into draw requests
pub fn build_draw_list(state: &GameState) -> DrawList {
    let mut requests = Vec::with_capacity(
        state.fragments.len()
            + state.powerups.len()
            + state.enemies.len()
            + state.enemy_bullets.len()
            + state.player_bullets.len()
            + 8,
    );
    let mut push = |visual, pos, size, color| {
        requests.push(DrawRequest {
            visual,
            pos,
            size,
            color,
            hp_bar: None,
        })
    };

    for f in &state.fragments {
        // Fade out over the last second of life
        let alpha = (f.life as f32 / FRAMES_PER_SECOND as f32).min(1.0);
        push(Visual::Fragment, f.pos, Vec2::splat(f.size), hex_color(0x998877, alpha));
    }
    for p in &state.powerups {
        push(
            Visual::PowerUp(p.kind),
            p.pos,
            Vec2::splat(POWERUP_SIZE),
            hex_color(powerup_color(p.kind), 1.0),
        );
    }
    for e in &state.enemies {
        push(
            Visual::Enemy(e.kind),
            e.pos,
            Vec2::splat(e.size),
            hex_color(enemy_color(e.kind), 1.0),
        );
    }
    for b in &state.enemy_bullets {
        let special = bullet_is_special(b);
        let color = if special { 0xff00ff } else { 0xff4444 };
        push(
            Visual::EnemyBullet { special },
            b.pos,
            Vec2::splat(b.size),
            hex_color(color, 1.0),
        );
    }
    for b in &state.player_bullets {
        push(Visual::PlayerBullet, b.pos, Vec2::splat(b.size), hex_color(0xffff66, 1.0));
    }
    if state.laser_firing {
        let beam = laser_beam(state.player.pos);
        push(
            Visual::Laser,
            (beam.min + beam.max) / 2.0,
            beam.max - beam.min,
            hex_color(0xff0040, 0.8),
        );
    }
    for s in &state.sidekicks {
        push(Visual::Sidekick, s.pos, Vec2::splat(PLAYER_SIZE * 0.6), hex_color(0x32cd32, 1.0));
    }

    let player = &state.player;
    // Ghost and invincibility blink
    let alpha = if player.buffs.ghost > 0 {
        0.4
    } else if player.is_invincible() && (player.invincible_ticks / 6) % 2 == 0 {
        0.3
    } else {
        1.0
    };
    push(
        Visual::Player {
            shielded: player.shield_active,
        },
        player.pos,
        Vec2::splat(player.size),
        hex_color(0x00ccff, alpha),
    );

    if let Some(elite) = &state.elite {
        let profile = elite.pattern.profile();
        requests.push(DrawRequest {
            visual: Visual::Elite { name: profile.name },
            pos: elite.pos,
            size: Vec2::splat(elite.size),
            color: hex_color(profile.color, 1.0),
            hp_bar: Some(HpBar {
                hp: elite.hp,
                max_hp: elite.max_hp,
            }),
        });
    }
    if let Some(boss) = &state.boss {
        let profile = boss.pattern.profile();
        let alpha = if boss.is_defeated() { 0.6 } else { 1.0 };
        requests.push(DrawRequest {
            visual: Visual::Boss {
                name: profile.name,
                ultimate: boss.ultimate_active,
            },
            pos: boss.pos,
            size: Vec2::splat(boss.size),
            color: hex_color(profile.color, alpha),
            hp_bar: Some(HpBar {
                hp: boss.hp,
                max_hp: boss.max_hp,
            }),
        });
    }

    DrawList {
        hud: Hud {
            score: state.score,
            hearts: player.hearts,
            fire_rate_level: player.fire_rate_level,
            inventory: player.inventory.iter().collect(),
            screen_shake: state.screen_shake,
            paused: state.phase == GamePhase::Paused,
            distortion_active: state.distortion.is_some(),
        },
        requests,
    }
}
