//! Game state and core simulation types
//!
//! The Entity Store: every live simulation object is owned by `GameState`,
//! which in turn is owned by exactly one frame driver for an encounter.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetypes::{BossPattern, ElitePattern};
use super::events::{EncounterResult, GameEvent};
use super::schedule::EventQueue;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frame counter frozen
    Paused,
    /// Hearts ran out
    GameOver,
    /// Boss defeated
    Victory,
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

// === Projectile behavior tags ===

/// Turn-rate-limited pursuit of the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homing {
    /// Max heading change per frame (radians)
    pub turn_rate: f32,
}

/// Attraction toward a fixed point after a grace period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub attractor: Vec2,
    pub strength: f32,
    /// Frames before the pull kicks in
    pub grace: u32,
}

/// Heavy bullet pulling other enemy bullets toward itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Singularity {
    pub radius: f32,
    pub strength: f32,
    pub life: u32,
    pub max_life: u32,
}

impl Singularity {
    /// Pull strength decays linearly with remaining life
    pub fn current_strength(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.strength * self.life as f32 / self.max_life as f32
    }
}

/// Sinusoidal lateral offset around a travelling center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub amplitude: f32,
    /// Phase advance per frame (radians)
    pub frequency: f32,
    pub phase: f32,
    pub center: Vec2,
}

/// Periodic relocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub interval: u32,
    pub countdown: u32,
}

/// Random positional jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glitch {
    /// Per-frame chance of a jump
    pub chance: f64,
    pub magnitude: f32,
}

/// Bullet that flies out and then doubles back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Echo {
    /// Age at which the velocity flips
    pub reverse_at: u32,
}

/// Optional special-behavior tags of a projectile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Behavior {
    pub homing: Option<Homing>,
    pub gravity: Option<Gravity>,
    pub singularity: Option<Singularity>,
    pub wave: Option<Wave>,
    pub glitch: Option<Glitch>,
    pub teleport: Option<Teleport>,
    pub echo: Option<Echo>,
    /// Undistorted velocity, present while a time-distortion ultimate owns this bullet
    pub distortion_base: Option<Vec2>,
}

/// A bullet (player- or enemy-owned)
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Square hitbox edge length
    pub size: f32,
    /// Speed cap applied after any steering
    pub max_speed: f32,
    pub age: u32,
    pub behavior: Behavior,
}

impl Projectile {
    /// Unregistered enemy bullet (id assigned when added to the state)
    pub fn enemy(pos: Vec2, vel: Vec2) -> Self {
        Self {
            id: 0,
            side: Side::Enemy,
            pos,
            vel,
            size: ENEMY_BULLET_SIZE,
            max_speed: ENEMY_BULLET_MAX_SPEED,
            age: 0,
            behavior: Behavior::default(),
        }
    }

    /// Unregistered player bullet
    pub fn player(pos: Vec2, vel: Vec2) -> Self {
        Self {
            side: Side::Player,
            size: PLAYER_BULLET_SIZE,
            max_speed: PLAYER_BULLET_SPEED * 1.5,
            ..Self::enemy(pos, vel)
        }
    }

    pub fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn homing(mut self, turn_rate: f32, max_speed: f32) -> Self {
        self.behavior.homing = Some(Homing { turn_rate });
        self.max_speed = max_speed;
        self
    }

    pub fn gravity(mut self, attractor: Vec2, strength: f32, grace: u32) -> Self {
        self.behavior.gravity = Some(Gravity {
            attractor,
            strength,
            grace,
        });
        self
    }

    pub fn singularity(mut self, radius: f32, strength: f32, life: u32) -> Self {
        self.behavior.singularity = Some(Singularity {
            radius,
            strength,
            life,
            max_life: life,
        });
        self
    }

    pub fn wave(mut self, amplitude: f32, frequency: f32, phase: f32) -> Self {
        self.behavior.wave = Some(Wave {
            amplitude,
            frequency,
            phase,
            center: self.pos,
        });
        self
    }

    pub fn glitch(mut self, chance: f64, magnitude: f32) -> Self {
        self.behavior.glitch = Some(Glitch { chance, magnitude });
        self
    }

    pub fn teleport(mut self, interval: u32) -> Self {
        self.behavior.teleport = Some(Teleport {
            interval,
            countdown: interval,
        });
        self
    }

    pub fn echo(mut self, reverse_at: u32) -> Self {
        self.behavior.echo = Some(Echo { reverse_at });
        self
    }

    /// Singularity bullets expire on their own clock rather than by leaving the canvas
    pub fn expired(&self) -> bool {
        matches!(self.behavior.singularity, Some(s) if s.life == 0)
    }
}

/// Standard enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Fighter,
    Bomber,
    Interceptor,
    Gunship,
    Kamikaze,
    Asteroid,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Scout,
        EnemyKind::Fighter,
        EnemyKind::Bomber,
        EnemyKind::Interceptor,
        EnemyKind::Gunship,
        EnemyKind::Kamikaze,
        EnemyKind::Asteroid,
    ];

    /// Hitbox edge length
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Scout => 24.0,
            EnemyKind::Fighter => 30.0,
            EnemyKind::Bomber => 40.0,
            EnemyKind::Interceptor => 28.0,
            EnemyKind::Gunship => 46.0,
            EnemyKind::Kamikaze => 22.0,
            EnemyKind::Asteroid => 36.0,
        }
    }

    /// Downward speed range (pixels per frame)
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            EnemyKind::Scout => (2.5, 3.5),
            EnemyKind::Fighter => (2.0, 3.0),
            EnemyKind::Bomber => (1.0, 1.8),
            EnemyKind::Interceptor => (3.5, 4.5),
            EnemyKind::Gunship => (0.8, 1.2),
            EnemyKind::Kamikaze => (4.0, 5.0),
            EnemyKind::Asteroid => (1.5, 2.5),
        }
    }

    /// Frames between shots (None = never shoots)
    pub fn shoot_cooldown(self) -> Option<u32> {
        match self {
            EnemyKind::Scout => Some(120),
            EnemyKind::Fighter => Some(90),
            EnemyKind::Bomber => Some(70),
            EnemyKind::Interceptor => Some(150),
            EnemyKind::Gunship => Some(60),
            EnemyKind::Kamikaze | EnemyKind::Asteroid => None,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            EnemyKind::Scout => 100,
            EnemyKind::Fighter => 150,
            EnemyKind::Bomber => 200,
            EnemyKind::Interceptor => 150,
            EnemyKind::Gunship => 300,
            EnemyKind::Kamikaze => 120,
            EnemyKind::Asteroid => 100,
        }
    }
}

/// A standard enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Frames until next shot
    pub shoot_timer: u32,
    pub age: u32,
}

/// Debris that still hurts the player
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Frames remaining
    pub life: u32,
}

impl Fragment {
    /// Unregistered fragment (id assigned when added to the state)
    pub fn new(pos: Vec2, vel: Vec2, size: f32, life: u32) -> Self {
        Self {
            id: 0,
            pos,
            vel,
            size,
            life,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    RateOfFire,
    TripleShot,
    Emp,
    Laser,
    Ghost,
    Sidekick,
    Slowmo,
    Heart,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 9] = [
        PowerUpKind::Shield,
        PowerUpKind::RateOfFire,
        PowerUpKind::TripleShot,
        PowerUpKind::Emp,
        PowerUpKind::Laser,
        PowerUpKind::Ghost,
        PowerUpKind::Sidekick,
        PowerUpKind::Slowmo,
        PowerUpKind::Heart,
    ];

    /// Instant power-ups resolve on pickup and never occupy a slot
    pub fn is_instant(self) -> bool {
        matches!(self, PowerUpKind::RateOfFire | PowerUpKind::Heart)
    }

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A pickup entity (collected by shooting it)
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub ttl: u32,
}

/// A drone flanking the player while the sidekick buff runs
#[derive(Debug, Clone, PartialEq)]
pub struct Sidekick {
    pub id: u32,
    /// Horizontal offset from the player
    pub offset: f32,
    pub pos: Vec2,
    pub fire_timer: u32,
}

/// One-shot HP reward thresholds (75/50/25%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardThresholds {
    pub hp75: bool,
    pub hp50: bool,
    pub hp25: bool,
}

impl RewardThresholds {
    /// Mark and count thresholds newly crossed at this HP
    pub fn claim(&mut self, hp: u32, max_hp: u32) -> u32 {
        let mut crossed = 0;
        for (flag, pct) in [
            (&mut self.hp75, 75u64),
            (&mut self.hp50, 50),
            (&mut self.hp25, 25),
        ] {
            if !*flag && (hp as u64) * 100 <= (max_hp as u64) * pct {
                *flag = true;
                crossed += 1;
            }
        }
        crossed
    }
}

/// Elite/boss behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPhase {
    /// Moving to the on-screen anchor
    Enter,
    /// Running the attack pattern
    Attack,
    /// Scripted defeat sequence (boss only)
    Defeat { frames_left: u32 },
}

/// Mid-tier miniboss
#[derive(Debug, Clone)]
pub struct Elite {
    pub id: u32,
    pub pattern: &'static dyn ElitePattern,
    pub hp: u32,
    pub max_hp: u32,
    pub size: f32,
    pub pos: Vec2,
    pub anchor: Vec2,
    pub phase: CombatPhase,
    pub fire_timer: u32,
    pub sub_phase: u32,
    pub rewards: RewardThresholds,
}

/// Boss encounter
#[derive(Debug, Clone)]
pub struct Boss {
    pub id: u32,
    pub pattern: &'static dyn BossPattern,
    pub hp: u32,
    pub max_hp: u32,
    pub size: f32,
    pub pos: Vec2,
    pub phase: CombatPhase,
    pub fire_timer: u32,
    /// Monotonic attack-cycle counter
    pub sub_phase: u32,
    pub ultimate_used: bool,
    pub ultimate_active: bool,
    pub ultimate_timer: u32,
    pub rewards: RewardThresholds,
}

impl Boss {
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    pub fn is_defeated(&self) -> bool {
        matches!(self.phase, CombatPhase::Defeat { .. })
    }
}

/// Timed buffs (frames remaining, 0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffs {
    pub triple_shot: u32,
    pub laser: u32,
    pub ghost: u32,
    pub sidekick: u32,
    pub slowmo: u32,
}

/// 3-slot FIFO inventory of deferred power-ups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    slots: VecDeque<PowerUpKind>,
}

impl Inventory {
    /// Store an item, evicting and returning the oldest if full
    pub fn push(&mut self, kind: PowerUpKind) -> Option<PowerUpKind> {
        let evicted = if self.slots.len() >= INVENTORY_CAPACITY {
            self.slots.pop_front()
        } else {
            None
        };
        self.slots.push_back(kind);
        evicted
    }

    /// Remove the item in 1-based `slot`
    pub fn take(&mut self, slot: usize) -> Option<PowerUpKind> {
        if slot == 0 {
            return None;
        }
        self.slots.remove(slot - 1)
    }

    pub fn get(&self, slot: usize) -> Option<PowerUpKind> {
        slot.checked_sub(1).and_then(|i| self.slots.get(i).copied())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        self.slots.iter().copied()
    }
}

/// The player ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    /// 0..=5
    pub hearts: u8,
    pub shield_active: bool,
    pub shield_ticks: u32,
    pub invincible_ticks: u32,
    pub buffs: Buffs,
    /// 1..=5
    pub fire_rate_level: u8,
    pub fire_cooldown: u32,
    pub inventory: Inventory,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(CANVAS_WIDTH / 2.0, PLAYER_START_Y),
            size: PLAYER_SIZE,
            hearts: MAX_HEARTS,
            shield_active: false,
            shield_ticks: 0,
            invincible_ticks: 0,
            buffs: Buffs::default(),
            fire_rate_level: 1,
            fire_cooldown: 0,
            inventory: Inventory::default(),
        }
    }
}

impl Player {
    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Ghost or post-hit invincibility
    pub fn is_immune(&self) -> bool {
        self.buffs.ghost > 0 || self.is_invincible()
    }
}

/// Spawner bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnState {
    /// Frames until the next standard enemy
    pub enemy_timer: u32,
    pub score_at_last_elite: u64,
    /// The boss appears at most once per encounter
    pub boss_spawned: bool,
}

/// Active full-field time distortion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distortion {
    pub elapsed: u32,
    pub duration: u32,
}

/// Complete encounter state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation frame counter (frozen while paused)
    pub frame: u64,
    pub score: u64,
    pub player: Player,
    /// Player-owned projectiles (sorted by id)
    pub player_bullets: Vec<Projectile>,
    /// Enemy-owned projectiles (sorted by id)
    pub enemy_bullets: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub elite: Option<Elite>,
    pub boss: Option<Boss>,
    pub fragments: Vec<Fragment>,
    pub powerups: Vec<PowerUp>,
    pub sidekicks: Vec<Sidekick>,
    pub schedule: EventQueue,
    pub spawn: SpawnState,
    pub distortion: Option<Distortion>,
    /// Laser beam drawn this frame
    pub laser_firing: bool,
    /// Screen shake intensity (0-1, visual only)
    pub screen_shake: f32,
    /// Events emitted during the last tick
    pub events: Vec<GameEvent>,
    /// Set once when the encounter ends
    pub result: Option<EncounterResult>,
    next_id: u32,
}

impl GameState {
    /// Create a new encounter with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let spawn = SpawnState {
            enemy_timer: tuning.enemy_spawn_interval,
            ..Default::default()
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Playing,
            frame: 0,
            score: 0,
            player: Player::default(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            elite: None,
            boss: None,
            fragments: Vec::new(),
            powerups: Vec::new(),
            sidekicks: Vec::new(),
            schedule: EventQueue::new(),
            spawn,
            distortion: None,
            laser_firing: false,
            screen_shake: 0.0,
            events: Vec::new(),
            result: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a projectile with the side it was built for
    pub fn add_projectile(&mut self, mut projectile: Projectile) -> u32 {
        projectile.id = self.next_entity_id();
        let id = projectile.id;
        // Bullets fired during a time-distortion ultimate join the distortion
        if projectile.side == Side::Enemy && self.distortion.is_some() {
            projectile.behavior.distortion_base = Some(projectile.vel);
        }
        match projectile.side {
            Side::Player => self.player_bullets.push(projectile),
            Side::Enemy => self.enemy_bullets.push(projectile),
        }
        id
    }

    pub fn add_fragment(&mut self, mut fragment: Fragment) {
        fragment.id = self.next_entity_id();
        self.fragments.push(fragment);
    }

    /// Drop a pickup at `pos`
    pub fn add_powerup(&mut self, kind: PowerUpKind, pos: Vec2) {
        let id = self.next_entity_id();
        self.powerups.push(PowerUp {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, POWERUP_FALL_SPEED),
            ttl: self.tuning.pickup_lifetime,
        });
    }

    /// Drop a random pickup at `pos`
    pub fn drop_random_powerup(&mut self, pos: Vec2) {
        let kind = PowerUpKind::random(&mut self.rng);
        self.add_powerup(kind, pos);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Bump screen shake (clamped to 1.0)
    pub fn shake(&mut self, amount: f32) {
        self.screen_shake = (self.screen_shake + amount).min(1.0);
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.player_bullets.sort_by_key(|p| p.id);
        self.enemy_bullets.sort_by_key(|p| p.id);
        self.enemies.sort_by_key(|e| e.id);
        self.fragments.sort_by_key(|f| f.id);
        self.powerups.sort_by_key(|p| p.id);
        self.sidekicks.sort_by_key(|s| s.id);
    }
}

/// Whether a point is inside the canvas grown by `margin`
pub fn in_bounds(pos: Vec2, margin: f32) -> bool {
    pos.x >= -margin
        && pos.x <= CANVAS_WIDTH + margin
        && pos.y >= -margin
        && pos.y <= CANVAS_HEIGHT + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.player.hearts, MAX_HEARTS);
        assert_eq!(state.player.fire_rate_level, 1);
        assert!(state.player.inventory.is_empty());
        assert!(state.elite.is_none() && state.boss.is_none());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_inventory_evicts_oldest() {
        let mut inv = Inventory::default();
        assert_eq!(inv.push(PowerUpKind::Shield), None);
        assert_eq!(inv.push(PowerUpKind::Laser), None);
        assert_eq!(inv.push(PowerUpKind::Ghost), None);
        assert_eq!(inv.push(PowerUpKind::Emp), Some(PowerUpKind::Shield));
        assert_eq!(
            inv.iter().collect::<Vec<_>>(),
            vec![PowerUpKind::Laser, PowerUpKind::Ghost, PowerUpKind::Emp]
        );
    }

    #[test]
    fn test_inventory_take_is_one_based() {
        let mut inv = Inventory::default();
        inv.push(PowerUpKind::Shield);
        inv.push(PowerUpKind::Slowmo);
        assert_eq!(inv.take(0), None);
        assert_eq!(inv.take(2), Some(PowerUpKind::Slowmo));
        assert_eq!(inv.take(2), None);
        assert_eq!(inv.get(1), Some(PowerUpKind::Shield));
    }

    #[test]
    fn test_reward_thresholds_fire_once() {
        let mut rewards = RewardThresholds::default();
        assert_eq!(rewards.claim(80, 100), 0);
        assert_eq!(rewards.claim(75, 100), 1);
        assert_eq!(rewards.claim(75, 100), 0);
        // A big hit can cross two thresholds at once
        assert_eq!(rewards.claim(20, 100), 2);
        assert_eq!(rewards.claim(0, 100), 0);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut state = GameState::new(1);
        let a = state.add_projectile(Projectile::enemy(Vec2::ZERO, Vec2::Y));
        let b = state.add_projectile(Projectile::player(Vec2::ZERO, -Vec2::Y));
        assert!(b > a);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.player_bullets.len(), 1);
    }

    #[test]
    fn test_singularity_strength_decays() {
        let p = Projectile::enemy(Vec2::ZERO, Vec2::ZERO).singularity(150.0, 0.4, 100);
        let mut s = p.behavior.singularity.unwrap();
        assert!((s.current_strength() - 0.4).abs() < 1e-6);
        s.life = 50;
        assert!((s.current_strength() - 0.2).abs() < 1e-6);
    }
}
