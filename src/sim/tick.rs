//! Per-frame simulation tick
//!
//! Core game loop that advances the encounter deterministically, one display
//! frame at a time. Input is consumed at the start of the frame only.

use glam::Vec2;

use super::behavior::{update_boss, update_elite, update_enemies};
use super::collision::resolve_collisions;
use super::damage::update_protection;
use super::events::{AudioCue, GameEvent};
use super::kinematics::{update_debris, update_projectiles};
use super::powerup::{update_buffs, update_sidekicks, use_slot};
use super::schedule::ScheduledAction;
use super::spawn::update_spawner;
use super::state::{GamePhase, GameState, Projectile, in_bounds};
use crate::consts::*;
use crate::from_angle;

/// Spread of the two outer triple-shot bullets (radians)
const TRIPLE_SHOT_SPREAD: f32 = 0.2;

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement direction (each axis -1..1)
    pub move_dir: Vec2,
    /// Trigger pulled this frame; the fire cooldown decides whether a shot leaves
    pub fire: bool,
    /// Fire key held down; keeps the laser beam on
    pub fire_held: bool,
    /// Use inventory slot 1..=3
    pub use_slot: Option<usize>,
    /// Pause toggle
    pub pause: bool,
    /// Rebuild the encounter from scratch
    pub restart: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if input.restart {
        log::info!("Restarting encounter (seed {})", state.seed);
        *state = GameState::with_tuning(state.seed, state.tuning.clone());
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Frame counter (and everything keyed to it) stays frozen
    if state.phase != GamePhase::Playing {
        return;
    }
    state.frame += 1;

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    run_scheduled(state);

    // Player
    let half = state.player.size / 2.0;
    let step = input.move_dir.clamp_length_max(1.0) * state.tuning.player_speed;
    let player = &mut state.player;
    player.pos = (player.pos + step).clamp(
        Vec2::new(half, half),
        Vec2::new(CANVAS_WIDTH - half, CANVAS_HEIGHT - half),
    );
    update_protection(state);
    update_buffs(state);
    update_sidekicks(state);
    if let Some(slot) = input.use_slot {
        use_slot(state, slot);
    }
    fire(state, input.fire, input.fire_held);

    update_spawner(state);
    update_projectiles(state);
    update_debris(state);
    update_enemies(state);
    update_elite(state);
    update_boss(state);
    resolve_collisions(state);

    prune(state);

    // Decay screen shake
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    state.normalize_order();
}

/// Apply every scheduled action due this frame
fn run_scheduled(state: &mut GameState) {
    for action in state.schedule.drain_due(state.frame) {
        match action {
            ScheduledAction::EnemyShots { shots, .. } => {
                for shot in shots {
                    state.add_projectile(shot);
                }
            }
            ScheduledAction::Hazards { hazards, .. } => {
                for hazard in hazards {
                    state.add_fragment(hazard);
                }
            }
            ScheduledAction::RewardDrop { pos } => state.drop_random_powerup(pos),
        }
    }
}

/// Player weapon: laser beam while the buff runs, bullets otherwise.
/// A trigger pull during cooldown is dropped, not queued.
fn fire(state: &mut GameState, pulled: bool, held: bool) {
    let player = &mut state.player;
    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);
    state.laser_firing = (pulled || held) && player.buffs.laser > 0;
    if !pulled || state.laser_firing || player.fire_cooldown > 0 {
        return;
    }

    player.fire_cooldown = state.tuning.fire_cooldown(player.fire_rate_level);
    let muzzle = player.pos - Vec2::new(0.0, player.size / 2.0);
    let up = -std::f32::consts::FRAC_PI_2;
    let headings = if player.buffs.triple_shot > 0 {
        vec![up - TRIPLE_SHOT_SPREAD, up, up + TRIPLE_SHOT_SPREAD]
    } else {
        vec![up]
    };
    for heading in headings {
        state.add_projectile(Projectile::player(
            muzzle,
            from_angle(heading) * PLAYER_BULLET_SPEED,
        ));
    }
    state.emit(GameEvent::Audio(AudioCue::Shoot));
}

/// Remove off-screen and expired entities
fn prune(state: &mut GameState) {
    state
        .player_bullets
        .retain(|b| in_bounds(b.pos, OFFSCREEN_MARGIN));
    state
        .enemy_bullets
        .retain(|b| !b.expired() && in_bounds(b.pos, OFFSCREEN_MARGIN));
    state
        .enemies
        .retain(|e| in_bounds(e.pos, OFFSCREEN_MARGIN.max(e.size)));
    state
        .fragments
        .retain(|f| f.life > 0 && in_bounds(f.pos, OFFSCREEN_MARGIN));
    state
        .powerups
        .retain(|p| p.ttl > 0 && p.pos.y <= CANVAS_HEIGHT + OFFSCREEN_MARGIN);
}

/// Demo mode: dodge close bullets, line up under the nearest target, keep firing
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    input.fire = true;

    // Threat directly above and close: sidestep away from it
    let incoming = state.enemy_bullets.iter().find(|b| {
        let d = b.pos - player.pos;
        d.y < 0.0 && d.y > -90.0 && d.x.abs() < player.size
    });
    if let Some(bullet) = incoming {
        let away = if bullet.pos.x > player.pos.x { -1.0 } else { 1.0 };
        input.move_dir = Vec2::new(away, 0.0);
    } else {
        let target_x = state
            .boss
            .as_ref()
            .map(|b| b.pos.x)
            .or_else(|| state.elite.as_ref().map(|e| e.pos.x))
            .or_else(|| {
                state
                    .enemies
                    .iter()
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|e| e.pos.x)
            })
            .or_else(|| state.powerups.first().map(|p| p.pos.x));

        if let Some(x) = target_x {
            let dx = x - player.pos.x;
            if dx.abs() > state.tuning.player_speed {
                input.move_dir = Vec2::new(dx.signum(), 0.0);
            }
        }
    }

    // Spend items early rather than lose them to eviction
    let buffs = &player.buffs;
    let idle = buffs.triple_shot == 0 && buffs.laser == 0 && buffs.ghost == 0;
    if input.use_slot.is_none()
        && !player.inventory.is_empty()
        && (idle || player.inventory.len() == INVENTORY_CAPACITY)
    {
        input.use_slot = Some(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetypes::Vanguard;
    use crate::sim::spawn::spawn_elite;
    use crate::sim::state::PowerUpKind;

    fn held_fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 1);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.frame, 1);

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, 2);
    }

    #[test]
    fn test_pause_freezes_scheduled_drops() {
        let mut state = GameState::new(4);
        spawn_elite(&mut state, &Vanguard);
        crate::sim::behavior::damage_elite(&mut state, 300);
        assert_eq!(state.schedule.len(), 3);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.schedule.len(), 3);

        tick(&mut state, &pause);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.schedule.is_empty());
    }

    #[test]
    fn test_fire_cooldown_by_level() {
        let mut state = GameState::new(1);
        for _ in 0..18 {
            tick(&mut state, &held_fire());
        }
        assert_eq!(state.player_bullets.len(), 1);
        tick(&mut state, &held_fire());
        assert_eq!(state.player_bullets.len(), 2);

        let mut fast = GameState::new(1);
        fast.player.fire_rate_level = MAX_FIRE_RATE_LEVEL;
        for _ in 0..18 {
            tick(&mut fast, &held_fire());
        }
        assert_eq!(fast.player_bullets.len(), 3);
    }

    #[test]
    fn test_triple_shot_and_laser() {
        let mut state = GameState::new(1);
        state.player.buffs.triple_shot = 100;
        tick(&mut state, &held_fire());
        assert_eq!(state.player_bullets.len(), 3);

        let mut state = GameState::new(1);
        state.player.buffs.laser = 100;
        tick(&mut state, &held_fire());
        assert!(state.laser_firing);
        assert!(state.player_bullets.is_empty());
    }

    #[test]
    fn test_holding_fire_alone_only_drives_the_laser() {
        let held = TickInput {
            fire_held: true,
            ..Default::default()
        };
        let mut state = GameState::new(1);
        for _ in 0..60 {
            tick(&mut state, &held);
        }
        assert!(state.player_bullets.is_empty());

        state.player.buffs.laser = 100;
        tick(&mut state, &held);
        assert!(state.laser_firing);
    }

    #[test]
    fn test_trigger_pull_during_cooldown_is_dropped() {
        let mut state = GameState::new(1);
        tick(&mut state, &held_fire());
        assert_eq!(state.player_bullets.len(), 1);
        tick(&mut state, &held_fire());
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player_bullets.len(), 1);
    }

    #[test]
    fn test_use_slot_input() {
        let mut state = GameState::new(1);
        state.player.inventory.push(PowerUpKind::Ghost);
        let input = TickInput {
            use_slot: Some(1),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(state.player.inventory.is_empty());
        assert_eq!(state.player.buffs.ghost, 300);
    }

    #[test]
    fn test_player_stays_on_canvas() {
        let mut state = GameState::new(1);
        let input = TickInput {
            move_dir: Vec2::new(-1.0, 1.0),
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input);
        }
        let half = state.player.size / 2.0;
        assert_eq!(state.player.pos, Vec2::new(half, CANVAS_HEIGHT - half));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(77);
        state.score = 5000;
        state.player.hearts = 1;
        state.phase = GamePhase::GameOver;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);
        assert_eq!(state.player.hearts, MAX_HEARTS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.seed, 77);
    }

    #[test]
    fn test_terminal_phase_stops_simulation() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        tick(&mut state, &held_fire());
        assert_eq!(state.frame, 0);
        assert!(state.player_bullets.is_empty());
    }

    #[test]
    fn test_offscreen_bullets_pruned() {
        let mut state = GameState::new(1);
        state.add_projectile(Projectile::enemy(
            Vec2::new(100.0, CANVAS_HEIGHT + OFFSCREEN_MARGIN - 1.0),
            Vec2::new(0.0, 4.0),
        ));
        tick(&mut state, &TickInput::default());
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.enemy_bullets.len(), state2.enemy_bullets.len());
    }
}
