//! Space Defender - an arcade combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, bosses, power-ups)
//! - `renderer`: Per-frame draw request list for an external render target
//! - `audio`: Audio cue routing to an external sink
//! - `platform`: Frame driver, scheduling and input registration
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Display refresh rate the simulation is stepped at (one tick per frame)
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Canvas dimensions (y grows downward)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Entities further than this outside the canvas are pruned
    pub const OFFSCREEN_MARGIN: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_START_Y: f32 = CANVAS_HEIGHT - 60.0;
    pub const MAX_HEARTS: u8 = 5;
    pub const MAX_FIRE_RATE_LEVEL: u8 = 5;
    pub const INVENTORY_CAPACITY: usize = 3;

    /// Player bullet defaults
    pub const PLAYER_BULLET_SPEED: f32 = 10.0;
    pub const PLAYER_BULLET_SIZE: f32 = 6.0;
    /// Horizontal half-width of the laser beam
    pub const LASER_HALF_WIDTH: f32 = 10.0;

    /// Sidekick drones
    pub const SIDEKICK_OFFSET: f32 = 40.0;
    pub const SIDEKICK_FIRE_INTERVAL: u32 = 30;

    /// Enemy bullet defaults
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;
    pub const ENEMY_BULLET_SIZE: f32 = 8.0;
    /// Hard speed cap for steered enemy projectiles
    pub const ENEMY_BULLET_MAX_SPEED: f32 = 9.0;

    /// Power-up pickups
    pub const POWERUP_SIZE: f32 = 24.0;
    pub const POWERUP_FALL_SPEED: f32 = 1.5;

    /// Fragments
    pub const FRAGMENT_LIFETIME: u32 = 90;
    pub const FRAGMENT_SIZE: f32 = 12.0;

    /// Elite / boss anchors
    pub const ELITE_ANCHOR_Y: f32 = 110.0;
    pub const BOSS_ANCHOR_Y: f32 = 130.0;
    pub const BOSS_ENTER_SPEED: f32 = 2.0;
    /// HP fraction at which a boss fires its ultimate
    pub const ULTIMATE_HP_FRACTION: f32 = 0.3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle`
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading of a vector in radians (0 = +x, π/2 = +y / downward on screen)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
