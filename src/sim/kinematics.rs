//! Per-frame motion for projectiles and free-flying debris
//!
//! Behavior tags are applied before integration. Steering (homing, gravity,
//! singularity pull) always ends with a clamp to the projectile's max speed.

use glam::Vec2;
use rand::Rng;

use super::state::{Distortion, GameState, Projectile};
use crate::consts::*;
use crate::{angle_of, from_angle, normalize_angle};

/// Rotate `vel` toward the bearing from `from` to `to` by at most `turn_rate`
/// radians, keeping (and capping) its speed
pub fn steer_toward(vel: Vec2, from: Vec2, to: Vec2, turn_rate: f32, max_speed: f32) -> Vec2 {
    let speed = vel.length().min(max_speed);
    let current = angle_of(vel);
    let desired = angle_of(to - from);
    let delta = normalize_angle(desired - current).clamp(-turn_rate, turn_rate);
    from_angle(current + delta) * speed
}

/// Speed multiplier for the slow -> reverse -> accelerate time distortion
pub fn distortion_multiplier(distortion: &Distortion) -> f32 {
    let duration = distortion.duration.max(1) as f32;
    let t = distortion.elapsed as f32 / duration;
    if t < 1.0 / 3.0 {
        0.3
    } else if t < 2.0 / 3.0 {
        -0.6
    } else {
        2.5
    }
}

/// A singularity's pull source for this frame
#[derive(Debug, Clone, Copy)]
struct Attractor {
    id: u32,
    pos: Vec2,
    radius: f32,
    strength: f32,
}

/// Advance all projectiles by one frame
pub fn update_projectiles(state: &mut GameState) {
    let target = state.player.pos;
    let slowmo = if state.player.buffs.slowmo > 0 {
        state.tuning.slowmo_factor
    } else {
        1.0
    };
    let distortion = state.distortion;

    let attractors: Vec<Attractor> = state
        .enemy_bullets
        .iter()
        .filter_map(|p| {
            p.behavior.singularity.map(|s| Attractor {
                id: p.id,
                pos: p.pos,
                radius: s.radius,
                strength: s.current_strength(),
            })
        })
        .collect();

    for bullet in &mut state.enemy_bullets {
        bullet.age += 1;

        // Steering works on the undistorted velocity
        let mut vel = bullet.behavior.distortion_base.unwrap_or(bullet.vel);
        let mut steered = false;

        if let Some(echo) = bullet.behavior.echo {
            if bullet.age == echo.reverse_at {
                vel = -vel;
            }
        }

        if let Some(homing) = bullet.behavior.homing {
            vel = steer_toward(vel, bullet.pos, target, homing.turn_rate, bullet.max_speed);
            steered = true;
        }

        // Singularity pull overrides gravity
        let mut pulled = false;
        if bullet.behavior.singularity.is_none() {
            for a in attractors.iter().filter(|a| a.id != bullet.id) {
                let offset = a.pos - bullet.pos;
                let dist = offset.length();
                if dist > 1.0 && dist < a.radius {
                    vel += offset / dist * a.strength * (1.0 - dist / a.radius);
                    pulled = true;
                }
            }
        }
        if !pulled {
            if let Some(gravity) = bullet.behavior.gravity {
                if bullet.age >= gravity.grace {
                    vel += (gravity.attractor - bullet.pos).normalize_or_zero() * gravity.strength;
                    steered = true;
                }
            }
        }
        if steered || pulled {
            vel = vel.clamp_length_max(bullet.max_speed);
        }

        bullet.vel = match (bullet.behavior.distortion_base.is_some(), distortion) {
            (true, Some(d)) => {
                bullet.behavior.distortion_base = Some(vel);
                vel * distortion_multiplier(&d)
            }
            (true, None) => {
                // Ultimate ended: back to base speed
                bullet.behavior.distortion_base = None;
                vel
            }
            (false, _) => vel,
        };

        integrate(bullet, slowmo);

        if let Some(teleport) = bullet.behavior.teleport.as_mut() {
            teleport.countdown = teleport.countdown.saturating_sub(1);
            if teleport.countdown == 0 {
                teleport.countdown = teleport.interval.max(1);
                bullet.pos = Vec2::new(
                    state.rng.random_range(20.0..CANVAS_WIDTH - 20.0),
                    state.rng.random_range(20.0..CANVAS_HEIGHT * 0.6),
                );
                if let Some(wave) = bullet.behavior.wave.as_mut() {
                    wave.center = bullet.pos;
                }
            }
        }

        if let Some(glitch) = bullet.behavior.glitch {
            if state.rng.random_bool(glitch.chance) {
                let m = glitch.magnitude;
                bullet.pos += Vec2::new(
                    state.rng.random_range(-m..m),
                    state.rng.random_range(-m..m),
                );
            }
        }

        if let Some(s) = bullet.behavior.singularity.as_mut() {
            s.life = s.life.saturating_sub(1);
        }
    }

    for bullet in &mut state.player_bullets {
        bullet.age += 1;
        integrate(bullet, 1.0);
    }
}

/// Move a projectile along its velocity (wave bullets oscillate around a moving center)
fn integrate(bullet: &mut Projectile, scale: f32) {
    let step = bullet.vel * scale;
    match bullet.behavior.wave.as_mut() {
        Some(wave) => {
            wave.center += step;
            wave.phase += wave.frequency * scale;
            let dir = bullet.vel.normalize_or_zero();
            let lateral = Vec2::new(-dir.y, dir.x);
            bullet.pos = wave.center + lateral * wave.amplitude * wave.phase.sin();
        }
        None => bullet.pos += step,
    }
}

/// Advance fragments and pickups; tick down their lifetimes
pub fn update_debris(state: &mut GameState) {
    for fragment in &mut state.fragments {
        fragment.pos += fragment.vel;
        fragment.life = fragment.life.saturating_sub(1);
    }
    for powerup in &mut state.powerups {
        powerup.pos += powerup.vel;
        powerup.ttl = powerup.ttl.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Projectile;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_steer_is_rate_limited() {
        // Moving right, target straight below: can only turn by turn_rate
        let vel = steer_toward(Vec2::new(4.0, 0.0), Vec2::ZERO, Vec2::new(0.0, 100.0), 0.05, 10.0);
        assert!((angle_of(vel) - 0.05).abs() < 1e-4);
        assert!((vel.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_steer_caps_speed() {
        let vel = steer_toward(Vec2::new(20.0, 0.0), Vec2::ZERO, Vec2::new(100.0, 0.0), 0.05, 6.0);
        assert!(vel.length() <= 6.0 + 1e-4);
    }

    #[test]
    fn test_plain_bullet_moves_at_constant_velocity() {
        let mut state = GameState::new(1);
        state.add_projectile(Projectile::enemy(Vec2::new(100.0, 100.0), Vec2::new(0.0, 4.0)));
        update_projectiles(&mut state);
        update_projectiles(&mut state);
        assert_eq!(state.enemy_bullets[0].pos, Vec2::new(100.0, 108.0));
    }

    #[test]
    fn test_slowmo_halves_enemy_bullets_only() {
        let mut state = GameState::new(1);
        state.player.buffs.slowmo = 100;
        state.add_projectile(Projectile::enemy(Vec2::new(100.0, 100.0), Vec2::new(0.0, 4.0)));
        state.add_projectile(Projectile::player(Vec2::new(100.0, 300.0), Vec2::new(0.0, -10.0)));
        update_projectiles(&mut state);
        assert_eq!(state.enemy_bullets[0].pos.y, 102.0);
        assert_eq!(state.player_bullets[0].pos.y, 290.0);
    }

    #[test]
    fn test_gravity_waits_for_grace_period() {
        let mut state = GameState::new(1);
        let attractor = Vec2::new(500.0, 100.0);
        state.add_projectile(
            Projectile::enemy(Vec2::new(100.0, 100.0), Vec2::new(0.0, 1.0)).gravity(attractor, 0.5, 30),
        );
        for _ in 0..29 {
            update_projectiles(&mut state);
        }
        assert_eq!(state.enemy_bullets[0].vel, Vec2::new(0.0, 1.0));
        update_projectiles(&mut state);
        assert!(state.enemy_bullets[0].vel.x > 0.0);
    }

    #[test]
    fn test_singularity_pulls_others_and_expires() {
        let mut state = GameState::new(1);
        state.add_projectile(
            Projectile::enemy(Vec2::new(300.0, 300.0), Vec2::ZERO).singularity(150.0, 0.5, 3),
        );
        state.add_projectile(Projectile::enemy(Vec2::new(200.0, 300.0), Vec2::ZERO));
        update_projectiles(&mut state);
        assert!(state.enemy_bullets[1].vel.x > 0.0);
        update_projectiles(&mut state);
        update_projectiles(&mut state);
        assert!(state.enemy_bullets[0].expired());
    }

    #[test]
    fn test_wave_oscillates_laterally() {
        let mut state = GameState::new(1);
        state.add_projectile(
            Projectile::enemy(Vec2::new(400.0, 100.0), Vec2::new(0.0, 2.0)).wave(30.0, FRAC_PI_2, 0.0),
        );
        update_projectiles(&mut state);
        let p = &state.enemy_bullets[0];
        // Moving down, lateral axis is -x; sin(π/2) = 1
        assert!((p.pos.x - 370.0).abs() < 1e-3);
        assert!((p.pos.y - 102.0).abs() < 1e-3);
    }

    #[test]
    fn test_echo_reverses() {
        let mut state = GameState::new(1);
        state.add_projectile(Projectile::enemy(Vec2::new(400.0, 300.0), Vec2::new(0.0, 3.0)).echo(2));
        update_projectiles(&mut state);
        assert_eq!(state.enemy_bullets[0].vel.y, 3.0);
        update_projectiles(&mut state);
        assert_eq!(state.enemy_bullets[0].vel.y, -3.0);
    }

    #[test]
    fn test_teleport_relocates_on_countdown() {
        let mut state = GameState::new(5);
        state.add_projectile(Projectile::enemy(Vec2::new(-500.0, -500.0), Vec2::ZERO).teleport(2));
        update_projectiles(&mut state);
        assert_eq!(state.enemy_bullets[0].pos, Vec2::new(-500.0, -500.0));
        update_projectiles(&mut state);
        let pos = state.enemy_bullets[0].pos;
        assert!(pos.x >= 20.0 && pos.y >= 20.0);
        assert_eq!(state.enemy_bullets[0].behavior.teleport.unwrap().countdown, 2);
    }

    #[test]
    fn test_glitch_jitters_within_magnitude() {
        let mut state = GameState::new(9);
        state.add_projectile(
            Projectile::enemy(Vec2::new(400.0, 300.0), Vec2::new(0.0, 2.0)).glitch(1.0, 5.0),
        );
        let mut jumped = false;
        for _ in 0..20 {
            let expected = state.enemy_bullets[0].pos + Vec2::new(0.0, 2.0);
            update_projectiles(&mut state);
            let off = state.enemy_bullets[0].pos - expected;
            assert!(off.abs().max_element() <= 5.0 + 1e-3, "jump {:?}", off);
            jumped |= off.x != 0.0;
        }
        assert!(jumped);
    }

    #[test]
    fn test_glitch_with_zero_chance_stays_on_path() {
        let mut state = GameState::new(9);
        state.add_projectile(
            Projectile::enemy(Vec2::new(400.0, 300.0), Vec2::new(0.0, 2.0)).glitch(0.0, 5.0),
        );
        for _ in 0..20 {
            update_projectiles(&mut state);
        }
        assert_eq!(state.enemy_bullets[0].pos, Vec2::new(400.0, 340.0));
    }

    #[test]
    fn test_distortion_phases_and_revert() {
        let mut state = GameState::new(1);
        state.distortion = Some(Distortion {
            elapsed: 0,
            duration: 90,
        });
        state.add_projectile(Projectile::enemy(Vec2::new(400.0, 300.0), Vec2::new(0.0, 4.0)));
        update_projectiles(&mut state);
        assert!((state.enemy_bullets[0].vel.y - 1.2).abs() < 1e-4);

        state.distortion = Some(Distortion {
            elapsed: 40,
            duration: 90,
        });
        update_projectiles(&mut state);
        assert!((state.enemy_bullets[0].vel.y + 2.4).abs() < 1e-4);

        state.distortion = Some(Distortion {
            elapsed: 80,
            duration: 90,
        });
        update_projectiles(&mut state);
        assert!((state.enemy_bullets[0].vel.y - 10.0).abs() < 1e-4);

        state.distortion = None;
        update_projectiles(&mut state);
        assert_eq!(state.enemy_bullets[0].vel, Vec2::new(0.0, 4.0));
        assert!(state.enemy_bullets[0].behavior.distortion_base.is_none());
    }
}
