//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use space_defender::consts::*;
use space_defender::sim::archetypes::BOSS_ROSTER;
use space_defender::sim::behavior::damage_boss;
use space_defender::sim::kinematics::{steer_toward, update_projectiles};
use space_defender::sim::powerup::collect;
use space_defender::sim::spawn::spawn_boss;
use space_defender::sim::{GameEvent, GamePhase, GameState, PowerUpKind, Projectile, TickInput, tick};

/// One frame of player input plus an optional score jump to open spawn gates
#[derive(Debug, Clone)]
struct Step {
    input: TickInput,
    score_bump: u64,
}

fn step() -> impl Strategy<Value = Step> {
    (
        -1i8..=1,
        -1i8..=1,
        any::<bool>(),
        prop::option::weighted(0.05, 1usize..=3),
        prop::bool::weighted(0.01),
        prop::option::weighted(0.02, 100u64..4_000),
    )
        .prop_map(|(dx, dy, fire, use_slot, pause, bump)| Step {
            input: TickInput {
                move_dir: Vec2::new(dx as f32, dy as f32),
                fire,
                use_slot,
                pause,
                ..Default::default()
            },
            score_bump: bump.unwrap_or(0),
        })
}

fn deferred_kind() -> impl Strategy<Value = PowerUpKind> {
    prop::sample::select(vec![
        PowerUpKind::Shield,
        PowerUpKind::TripleShot,
        PowerUpKind::Emp,
        PowerUpKind::Laser,
        PowerUpKind::Ghost,
        PowerUpKind::Sidekick,
        PowerUpKind::Slowmo,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn encounter_invariants_hold(seed in any::<u64>(), steps in prop::collection::vec(step(), 1..400)) {
        let mut state = GameState::new(seed);
        let mut losses = 0;
        let mut hearts_before = state.player.hearts;

        for s in &steps {
            state.score += s.score_bump;
            tick(&mut state, &s.input);

            prop_assert!(state.player.hearts <= MAX_HEARTS);
            prop_assert!(state.player.inventory.len() <= INVENTORY_CAPACITY);
            prop_assert!(!(state.elite.is_some() && state.boss.is_some()));
            prop_assert!((1..=MAX_FIRE_RATE_LEVEL).contains(&state.player.fire_rate_level));

            for event in &state.events {
                if let GameEvent::EncounterEnded(result) = event {
                    if !result.survived {
                        losses += 1;
                        prop_assert_eq!(state.player.hearts, 0);
                        prop_assert!(hearts_before > 0);
                    }
                }
            }
            hearts_before = state.player.hearts;
        }

        prop_assert!(losses <= 1);
        if state.phase == GamePhase::GameOver {
            prop_assert_eq!(losses, 1);
        }
    }

    #[test]
    fn inventory_is_fifo_with_three_slots(kinds in prop::collection::vec(deferred_kind(), 0..12)) {
        let mut state = GameState::new(0);
        for &kind in &kinds {
            collect(&mut state, kind);
        }
        let held: Vec<_> = state.player.inventory.iter().collect();
        let expected: Vec<_> = kinds.iter().rev().take(INVENTORY_CAPACITY).rev().copied().collect();
        prop_assert_eq!(held, expected);
    }

    #[test]
    fn steering_never_exceeds_max_speed(
        vx in -15.0f32..15.0,
        vy in -15.0f32..15.0,
        tx in 0.0f32..CANVAS_WIDTH,
        ty in 0.0f32..CANVAS_HEIGHT,
        turn in 0.01f32..0.5,
        max in 1.0f32..10.0,
    ) {
        let vel = steer_toward(Vec2::new(vx, vy), Vec2::new(400.0, 100.0), Vec2::new(tx, ty), turn, max);
        prop_assert!(vel.length() <= max + 1e-3);
    }

    #[test]
    fn homing_bullets_respect_their_cap(
        seed in any::<u64>(),
        x in 0.0f32..CANVAS_WIDTH,
        speed in 1.0f32..12.0,
        max in 2.0f32..8.0,
        frames in 1usize..120,
    ) {
        let mut state = GameState::new(seed);
        let id = state.add_projectile(
            Projectile::enemy(Vec2::new(x, 50.0), Vec2::new(speed, 0.0)).homing(0.05, max),
        );
        for _ in 0..frames {
            update_projectiles(&mut state);
        }
        let bullet = state.enemy_bullets.iter().find(|b| b.id == id).unwrap();
        prop_assert!(bullet.vel.length() <= max + 1e-3);
    }

    #[test]
    fn boss_thresholds_and_ultimate_fire_at_most_once(
        boss in 0usize..BOSS_ROSTER.len(),
        hits in prop::collection::vec(1u32..400, 1..60),
    ) {
        let mut state = GameState::new(boss as u64);
        prop_assert!(spawn_boss(&mut state, BOSS_ROSTER[boss]));
        let mut ultimates = 0;
        for &amount in &hits {
            state.events.clear();
            damage_boss(&mut state, amount);
            ultimates += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::UltimateTriggered { .. }))
                .count();
        }
        prop_assert!(ultimates <= 1);
        // Two drops per threshold, three thresholds
        prop_assert!(state.powerups.len() <= 6);

        let b = state.boss.as_ref().unwrap();
        let fraction = b.hp_fraction();
        prop_assert_eq!(b.rewards.hp75, fraction <= 0.75);
        prop_assert_eq!(b.rewards.hp50, fraction <= 0.5);
        prop_assert_eq!(b.rewards.hp25, fraction <= 0.25);
        if b.hp > 0 {
            prop_assert_eq!(b.ultimate_used, fraction <= ULTIMATE_HP_FRACTION);
        }
    }
}
