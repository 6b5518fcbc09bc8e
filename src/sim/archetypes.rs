//! Boss and elite archetypes
//!
//! Each archetype is a strategy object: the behavior engine only ever talks to
//! `BossPattern` / `ElitePattern`, so adding an archetype means adding a type
//! here and listing it in its roster.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Fragment, Projectile};
use crate::consts::*;
use crate::{angle_of, from_angle};

/// Inputs available to a pattern generator
#[derive(Debug, Clone, Copy)]
pub struct AttackContext {
    /// Where shots originate (the attacker's center)
    pub origin: Vec2,
    /// Player position this frame
    pub target: Vec2,
    /// Attack-cycle counter used to vary geometry
    pub sub_phase: u32,
    /// Turn rate for homing shots
    pub homing_turn_rate: f32,
}

impl AttackContext {
    /// Heading from origin to target
    fn aim(&self) -> f32 {
        angle_of(self.target - self.origin)
    }
}

/// Projectiles produced by one attack cycle
#[derive(Debug, Clone, Default)]
pub struct Barrage {
    /// Spawned this frame
    pub shots: Vec<Projectile>,
    /// Spawned later, keyed by frame offset
    pub staggered: Vec<(u32, Vec<Projectile>)>,
    /// Environmental hazards, keyed by frame offset
    pub hazards: Vec<(u32, Vec<Fragment>)>,
}

impl Barrage {
    fn now(shots: Vec<Projectile>) -> Self {
        Self {
            shots,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty() && self.staggered.is_empty() && self.hazards.is_empty()
    }
}

/// A boss's one-time special
#[derive(Debug, Clone, Default)]
pub struct Ultimate {
    /// Frames the ultimate stays active
    pub duration: u32,
    pub barrage: Barrage,
    /// Distort the speed of every enemy bullet while active
    pub distortion: bool,
}

/// Static description of a boss archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossProfile {
    pub name: &'static str,
    pub ultimate_name: &'static str,
    /// RGB color identity
    pub color: u32,
    pub max_hp: u32,
    pub size: f32,
    /// Frames between attack cycles
    pub fire_interval: u32,
}

/// Static description of an elite archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EliteProfile {
    pub name: &'static str,
    pub color: u32,
    pub max_hp: u32,
    pub size: f32,
    pub fire_interval: u32,
}

/// Boss archetype capability
pub trait BossPattern: fmt::Debug + Sync {
    fn profile(&self) -> BossProfile;
    /// One attack cycle
    fn attack(&self, ctx: &AttackContext, rng: &mut Pcg32) -> Barrage;
    /// The HP-triggered special
    fn ultimate(&self, ctx: &AttackContext, rng: &mut Pcg32) -> Ultimate;
}

/// Elite archetype capability
pub trait ElitePattern: fmt::Debug + Sync {
    fn profile(&self) -> EliteProfile;
    fn attack(&self, ctx: &AttackContext, rng: &mut Pcg32) -> Barrage;
}

// === Geometry helpers ===

/// `count` bullets spread evenly over `spread` radians around `center`
fn fan(origin: Vec2, center: f32, count: u32, spread: f32, speed: f32) -> Vec<Projectile> {
    if count <= 1 {
        return vec![Projectile::enemy(origin, from_angle(center) * speed)];
    }
    let step = spread / (count - 1) as f32;
    let start = center - spread / 2.0;
    (0..count)
        .map(|i| Projectile::enemy(origin, from_angle(start + step * i as f32) * speed))
        .collect()
}

/// Full circle of `count` bullets starting at `offset`
fn ring(origin: Vec2, count: u32, offset: f32, speed: f32) -> Vec<Projectile> {
    (0..count)
        .map(|i| {
            let a = offset + TAU * i as f32 / count as f32;
            Projectile::enemy(origin, from_angle(a) * speed)
        })
        .collect()
}

fn homing_shot(ctx: &AttackContext, pos: Vec2, heading: f32, speed: f32, max: f32) -> Projectile {
    Projectile::enemy(pos, from_angle(heading) * speed).homing(ctx.homing_turn_rate, max)
}

// === Bosses ===

/// Aimed fans; ultimate is a staggered ring barrage
#[derive(Debug)]
pub struct Dreadnought;

impl BossPattern for Dreadnought {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Dreadnought",
            ultimate_name: "Barrage",
            color: 0xcc3333,
            max_hp: 1500,
            size: 120.0,
            fire_interval: 50,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let count = 3 + (ctx.sub_phase % 3) * 2;
        Barrage::now(fan(ctx.origin, ctx.aim(), count, 0.6, ENEMY_BULLET_SPEED))
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let staggered = (0..5)
            .map(|wave| (wave * 20, ring(ctx.origin, 16, wave as f32 * 0.2, 3.5)))
            .collect();
        Ultimate {
            duration: 150,
            barrage: Barrage {
                staggered,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Rotating spiral; ultimate drops a singularity that drags the bullet field
#[derive(Debug)]
pub struct VoidMaw;

impl BossPattern for VoidMaw {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Void Maw",
            ultimate_name: "Singularity",
            color: 0x5522aa,
            max_hp: 1650,
            size: 110.0,
            fire_interval: 30,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        Barrage::now(ring(ctx.origin, 6, ctx.sub_phase as f32 * 0.3, 3.0))
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let core = Projectile::enemy(ctx.origin, Vec2::new(0.0, 0.6))
            .sized(28.0)
            .singularity(180.0, 0.35, 300);
        let mut shots = vec![core];
        shots.extend(ring(ctx.origin, 24, 0.0, 2.0));
        Ultimate {
            duration: 300,
            barrage: Barrage::now(shots),
            distortion: false,
        }
    }
}

/// Sine-wave volleys; ultimate distorts time for every bullet on the field
#[derive(Debug)]
pub struct Chronos;

impl BossPattern for Chronos {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Chronos",
            ultimate_name: "Time Distortion",
            color: 0xd4af37,
            max_hp: 1800,
            size: 115.0,
            fire_interval: 55,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let phase = ctx.sub_phase as f32 * 0.7;
        let shots = (0..5)
            .map(|i| {
                let pos = ctx.origin + Vec2::new((i as f32 - 2.0) * 24.0, 0.0);
                Projectile::enemy(pos, Vec2::new(0.0, 3.0)).wave(30.0, 0.1, phase + i as f32)
            })
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        Ultimate {
            duration: 360,
            barrage: Barrage::now(ring(ctx.origin, 20, 0.0, 3.0)),
            distortion: true,
        }
    }
}

/// Aimed pairs; ultimate fires rings that double back
#[derive(Debug)]
pub struct EchoWarden;

impl BossPattern for EchoWarden {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Echo Warden",
            ultimate_name: "Echo Storm",
            color: 0x33ccaa,
            max_hp: 1600,
            size: 110.0,
            fire_interval: 45,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let dir = from_angle(ctx.aim());
        let side = Vec2::new(-dir.y, dir.x) * 20.0;
        Barrage::now(vec![
            Projectile::enemy(ctx.origin + side, dir * 4.5),
            Projectile::enemy(ctx.origin - side, dir * 4.5),
        ])
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let staggered = (0..3u32)
            .map(|wave| {
                let shots = ring(ctx.origin, 12, wave as f32 * 0.25, 4.0)
                    .into_iter()
                    .map(|p| p.echo(60))
                    .collect();
                (wave * 30, shots)
            })
            .collect();
        Ultimate {
            duration: 180,
            barrage: Barrage {
                staggered,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Homing missiles; ultimate floods the flanks with debris
#[derive(Debug)]
pub struct HiveQueen;

impl BossPattern for HiveQueen {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Hive Queen",
            ultimate_name: "Swarm Tide",
            color: 0x88aa22,
            max_hp: 1700,
            size: 125.0,
            fire_interval: 70,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let count = 2 + ctx.sub_phase % 2;
        let shots = (0..count)
            .map(|i| {
                let heading = FRAC_PI_2 + (i as f32 - (count - 1) as f32 / 2.0) * 0.8;
                homing_shot(ctx, ctx.origin, heading, 3.0, 4.0)
            })
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, _ctx: &AttackContext, rng: &mut Pcg32) -> Ultimate {
        let hazards = (0..6u32)
            .map(|wave| {
                let y_left = rng.random_range(CANVAS_HEIGHT * 0.4..CANVAS_HEIGHT - 20.0);
                let y_right = rng.random_range(CANVAS_HEIGHT * 0.4..CANVAS_HEIGHT - 20.0);
                let pair = vec![
                    Fragment::new(Vec2::new(0.0, y_left), Vec2::new(3.5, 0.0), 20.0, 240),
                    Fragment::new(
                        Vec2::new(CANVAS_WIDTH, y_right),
                        Vec2::new(-3.5, 0.0),
                        20.0,
                        240,
                    ),
                ];
                (wave * 25, pair)
            })
            .collect();
        Ultimate {
            duration: 200,
            barrage: Barrage {
                hazards,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Bullets that curve toward where the player was; ultimate collapses a ring
#[derive(Debug)]
pub struct Graviton;

impl BossPattern for Graviton {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Graviton",
            ultimate_name: "Gravity Collapse",
            color: 0x2255dd,
            max_hp: 2000,
            size: 130.0,
            fire_interval: 65,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let shots = fan(ctx.origin, FRAC_PI_2, 5, 1.6, 3.0)
            .into_iter()
            .map(|p| p.gravity(ctx.target, 0.08, 30))
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let first = ring(ctx.origin, 24, 0.0, 3.0)
            .into_iter()
            .map(|p| p.gravity(ctx.target, 0.1, 30))
            .collect();
        let second = ring(ctx.origin, 24, PI / 24.0, 3.0)
            .into_iter()
            .map(|p| p.gravity(ctx.target, 0.1, 30))
            .collect();
        Ultimate {
            duration: 200,
            barrage: Barrage {
                shots: first,
                staggered: vec![(60, second)],
                hazards: Vec::new(),
            },
            distortion: false,
        }
    }
}

/// Jittering scatter; ultimate unleashes teleporting glitch bullets
#[derive(Debug)]
pub struct CorruptedCore;

impl BossPattern for CorruptedCore {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Corrupted Core",
            ultimate_name: "Corruption",
            color: 0x00ff66,
            max_hp: 1550,
            size: 105.0,
            fire_interval: 40,
        }
    }

    fn attack(&self, ctx: &AttackContext, rng: &mut Pcg32) -> Barrage {
        let shots = (0..4)
            .map(|_| {
                let heading = FRAC_PI_2 + rng.random_range(-0.6..0.6);
                Projectile::enemy(ctx.origin, from_angle(heading) * 3.5).glitch(0.05, 25.0)
            })
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let shots = ring(ctx.origin, 10, 0.0, 2.5)
            .into_iter()
            .map(|p| p.teleport(45).glitch(0.08, 30.0))
            .collect();
        Ultimate {
            duration: 240,
            barrage: Barrage::now(shots),
            distortion: false,
        }
    }
}

/// Blinking shots; ultimate fires from random points along the top edge
#[derive(Debug)]
pub struct PhaseStalker;

impl BossPattern for PhaseStalker {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Phase Stalker",
            ultimate_name: "Blink Barrage",
            color: 0x9933ff,
            max_hp: 1750,
            size: 110.0,
            fire_interval: 60,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let interval = 60 + (ctx.sub_phase % 3) * 10;
        let shots = fan(ctx.origin, ctx.aim(), 3, 0.4, 3.5)
            .into_iter()
            .map(|p| p.teleport(interval))
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, ctx: &AttackContext, rng: &mut Pcg32) -> Ultimate {
        let staggered = (0..6u32)
            .map(|burst| {
                let from = Vec2::new(rng.random_range(40.0..CANVAS_WIDTH - 40.0), 10.0);
                let aim = angle_of(ctx.target - from);
                (burst * 20, fan(from, aim, 5, 0.5, 4.0))
            })
            .collect();
        Ultimate {
            duration: 160,
            barrage: Barrage {
                staggered,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Full-width wave curtain with a moving gap; ultimate strikes lightning columns
#[derive(Debug)]
pub struct Tempest;

impl BossPattern for Tempest {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Tempest",
            ultimate_name: "Lightning Field",
            color: 0x66bbff,
            max_hp: 1900,
            size: 120.0,
            fire_interval: 80,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let gap = ctx.sub_phase % 8;
        let spacing = CANVAS_WIDTH / 8.0;
        let shots = (0..8)
            .filter(|&i| i != gap)
            .map(|i| {
                let pos = Vec2::new(spacing * (i as f32 + 0.5), ctx.origin.y);
                Projectile::enemy(pos, Vec2::new(0.0, 3.0)).wave(20.0, 0.08, i as f32)
            })
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, _ctx: &AttackContext, rng: &mut Pcg32) -> Ultimate {
        let staggered = (0..5u32)
            .map(|strike| {
                let x = rng.random_range(30.0..CANVAS_WIDTH - 30.0);
                let column = (0..6)
                    .map(|k| {
                        Projectile::enemy(Vec2::new(x, -(k as f32) * 10.0), Vec2::new(0.0, 8.0))
                    })
                    .collect();
                (strike * 15, column)
            })
            .collect();
        Ultimate {
            duration: 120,
            barrage: Barrage {
                staggered,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Fast random scatter; ultimate rains meteors from the top corners
#[derive(Debug)]
pub struct Inferno;

impl BossPattern for Inferno {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Inferno",
            ultimate_name: "Meteor Storm",
            color: 0xff5500,
            max_hp: 2100,
            size: 125.0,
            fire_interval: 35,
        }
    }

    fn attack(&self, ctx: &AttackContext, rng: &mut Pcg32) -> Barrage {
        let shots = (0..3)
            .map(|_| {
                let heading = FRAC_PI_2 + rng.random_range(-0.9..0.9);
                let speed = rng.random_range(5.0..7.0);
                Projectile::enemy(ctx.origin, from_angle(heading) * speed)
            })
            .collect();
        Barrage::now(shots)
    }

    fn ultimate(&self, _ctx: &AttackContext, rng: &mut Pcg32) -> Ultimate {
        let hazards = (0..8u32)
            .map(|wave| {
                let drift = rng.random_range(1.5..3.0);
                let pair = vec![
                    Fragment::new(Vec2::new(0.0, 0.0), Vec2::new(drift, 4.0), 26.0, 240),
                    Fragment::new(
                        Vec2::new(CANVAS_WIDTH, 0.0),
                        Vec2::new(-drift, 4.0),
                        26.0,
                        240,
                    ),
                ];
                (wave * 15, pair)
            })
            .collect();
        Ultimate {
            duration: 180,
            barrage: Barrage {
                hazards,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Rotating cross; ultimate sends alternating tidal rings
#[derive(Debug)]
pub struct Leviathan;

impl BossPattern for Leviathan {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Leviathan",
            ultimate_name: "Tidal Rings",
            color: 0x117788,
            max_hp: 2250,
            size: 140.0,
            fire_interval: 60,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let base = ctx.sub_phase as f32 * 0.25;
        let mut shots = ring(ctx.origin, 4, base, 3.5);
        if ctx.sub_phase % 2 == 0 {
            shots.extend(ring(ctx.origin, 4, base + FRAC_PI_4, 2.5));
        }
        Barrage::now(shots)
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let staggered = (0..3u32)
            .map(|wave| {
                let offset = if wave % 2 == 0 { 0.0 } else { PI / 32.0 };
                (wave * 40, ring(ctx.origin, 32, offset, 3.0))
            })
            .collect();
        Ultimate {
            duration: 160,
            barrage: Barrage {
                staggered,
                ..Default::default()
            },
            distortion: false,
        }
    }
}

/// Alternates fans and seekers; ultimate locks on from every corner
#[derive(Debug)]
pub struct Overmind;

impl BossPattern for Overmind {
    fn profile(&self) -> BossProfile {
        BossProfile {
            name: "Overmind",
            ultimate_name: "Psychic Lock",
            color: 0xff33aa,
            max_hp: 2000,
            size: 120.0,
            fire_interval: 55,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        if ctx.sub_phase % 2 == 0 {
            Barrage::now(fan(ctx.origin, ctx.aim(), 5, 0.8, 4.0))
        } else {
            Barrage::now(vec![
                homing_shot(ctx, ctx.origin, FRAC_PI_2 - 0.5, 3.0, 4.5),
                homing_shot(ctx, ctx.origin, FRAC_PI_2 + 0.5, 3.0, 4.5),
            ])
        }
    }

    fn ultimate(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Ultimate {
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(CANVAS_WIDTH, 0.0),
            Vec2::new(0.0, CANVAS_HEIGHT),
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        ];
        let volley = |ctx: &AttackContext| -> Vec<Projectile> {
            corners
                .iter()
                .flat_map(|&c| {
                    let aim = angle_of(ctx.target - c);
                    [
                        homing_shot(ctx, c, aim - 0.3, 2.5, 4.0),
                        homing_shot(ctx, c, aim + 0.3, 2.5, 4.0),
                    ]
                })
                .collect()
        };
        Ultimate {
            duration: 200,
            barrage: Barrage {
                shots: volley(ctx),
                staggered: vec![(90, volley(ctx))],
                hazards: Vec::new(),
            },
            distortion: false,
        }
    }
}

// === Elites ===

/// Aimed triple shot
#[derive(Debug)]
pub struct Vanguard;

impl ElitePattern for Vanguard {
    fn profile(&self) -> EliteProfile {
        EliteProfile {
            name: "Vanguard",
            color: 0xff4444,
            max_hp: 300,
            size: 60.0,
            fire_interval: 60,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        Barrage::now(fan(ctx.origin, ctx.aim(), 3, 0.35, 4.0))
    }
}

/// Rotating ring
#[derive(Debug)]
pub struct Warden;

impl ElitePattern for Warden {
    fn profile(&self) -> EliteProfile {
        EliteProfile {
            name: "Warden",
            color: 0x44ffff,
            max_hp: 400,
            size: 64.0,
            fire_interval: 80,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        Barrage::now(ring(ctx.origin, 8, ctx.sub_phase as f32 * 0.2, 3.0))
    }
}

/// Paired seekers
#[derive(Debug)]
pub struct Striker;

impl ElitePattern for Striker {
    fn profile(&self) -> EliteProfile {
        EliteProfile {
            name: "Striker",
            color: 0xff9933,
            max_hp: 250,
            size: 56.0,
            fire_interval: 70,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        Barrage::now(vec![
            homing_shot(ctx, ctx.origin, FRAC_PI_2 - 0.4, 3.0, 4.0),
            homing_shot(ctx, ctx.origin, FRAC_PI_2 + 0.4, 3.0, 4.0),
        ])
    }
}

/// Weaving triple volley, staggered
#[derive(Debug)]
pub struct Phantom;

impl ElitePattern for Phantom {
    fn profile(&self) -> EliteProfile {
        EliteProfile {
            name: "Phantom",
            color: 0xaa55ff,
            max_hp: 350,
            size: 58.0,
            fire_interval: 50,
        }
    }

    fn attack(&self, ctx: &AttackContext, _rng: &mut Pcg32) -> Barrage {
        let shot = |i: u32| {
            vec![Projectile::enemy(ctx.origin, Vec2::new(0.0, 3.5)).wave(25.0, 0.12, i as f32)]
        };
        Barrage {
            shots: shot(0),
            staggered: vec![(8, shot(1)), (16, shot(2))],
            hazards: Vec::new(),
        }
    }
}

/// Every boss archetype, picked uniformly by the spawner
pub static BOSS_ROSTER: [&dyn BossPattern; 12] = [
    &Dreadnought,
    &VoidMaw,
    &Chronos,
    &EchoWarden,
    &HiveQueen,
    &Graviton,
    &CorruptedCore,
    &PhaseStalker,
    &Tempest,
    &Inferno,
    &Leviathan,
    &Overmind,
];

/// Every elite archetype, picked uniformly by the spawner
pub static ELITE_ROSTER: [&dyn ElitePattern; 4] = [&Vanguard, &Warden, &Striker, &Phantom];

/// Look up a boss archetype by name
pub fn boss_by_name(name: &str) -> Option<&'static dyn BossPattern> {
    BOSS_ROSTER
        .iter()
        .copied()
        .find(|b| b.profile().name.eq_ignore_ascii_case(name))
}

/// Look up an elite archetype by name
pub fn elite_by_name(name: &str) -> Option<&'static dyn ElitePattern> {
    ELITE_ROSTER
        .iter()
        .copied()
        .find(|e| e.profile().name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx() -> AttackContext {
        AttackContext {
            origin: Vec2::new(400.0, 130.0),
            target: Vec2::new(400.0, 540.0),
            sub_phase: 0,
            homing_turn_rate: 0.05,
        }
    }

    #[test]
    fn test_boss_profiles_in_range_and_unique() {
        let mut names: Vec<&str> = BOSS_ROSTER.iter().map(|b| b.profile().name).collect();
        for boss in BOSS_ROSTER.iter() {
            let p = boss.profile();
            assert!((1500..=2250).contains(&p.max_hp), "{} hp", p.name);
            assert!(p.fire_interval > 0);
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_every_pattern_produces_something() {
        let mut rng = Pcg32::seed_from_u64(3);
        for boss in BOSS_ROSTER.iter() {
            for sub_phase in 0..4 {
                let c = AttackContext { sub_phase, ..ctx() };
                assert!(!boss.attack(&c, &mut rng).is_empty());
            }
            let ult = boss.ultimate(&ctx(), &mut rng);
            assert!(ult.duration > 0);
            assert!(!ult.barrage.is_empty() || ult.distortion);
        }
        for elite in ELITE_ROSTER.iter() {
            assert!(!elite.attack(&ctx(), &mut rng).is_empty());
        }
    }

    #[test]
    fn test_sub_phase_varies_dreadnought_fan() {
        let mut rng = Pcg32::seed_from_u64(1);
        let a = Dreadnought.attack(&ctx(), &mut rng).shots.len();
        let b = Dreadnought
            .attack(&AttackContext { sub_phase: 1, ..ctx() }, &mut rng)
            .shots
            .len();
        assert_eq!(a, 3);
        assert_eq!(b, 5);
    }

    #[test]
    fn test_lookup_by_name() {
        assert!(boss_by_name("chronos").is_some());
        assert!(elite_by_name("Warden").is_some());
        assert!(boss_by_name("nobody").is_none());
    }

    #[test]
    fn test_fan_is_centered_on_aim() {
        let shots = fan(Vec2::ZERO, FRAC_PI_2, 3, 0.6, 4.0);
        assert!(shots[1].vel.x.abs() < 1e-4);
        assert!((shots[1].vel.length() - 4.0).abs() < 1e-4);
    }
}
