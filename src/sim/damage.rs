//! Damage/health resolution for the player
//!
//! Order of protection: ghost / invincibility window, then shield, then hearts.

use super::events::{AudioCue, EncounterResult, GameEvent};
use super::state::{GamePhase, GameState};

/// What a damaging contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Ghost or invincibility window absorbed it
    Ignored,
    /// Shield consumed
    ShieldBroken,
    /// One heart lost, invincibility window started
    HeartLost,
    /// Last heart lost: encounter over
    Killed,
}

/// Apply one damaging contact to the player
pub fn hit_player(state: &mut GameState) -> HitOutcome {
    if !matches!(state.phase, GamePhase::Playing) {
        return HitOutcome::Ignored;
    }
    if state.player.is_immune() {
        return HitOutcome::Ignored;
    }

    // Shield absorbs exactly one hit, whatever time it had left
    if state.player.shield_active {
        state.player.shield_active = false;
        state.player.shield_ticks = 0;
        log::debug!("Shield broken");
        state.emit(GameEvent::ShieldBroken);
        state.emit(GameEvent::Audio(AudioCue::ShieldBreak));
        return HitOutcome::ShieldBroken;
    }

    state.player.hearts = state.player.hearts.saturating_sub(1);
    state.emit(GameEvent::Audio(AudioCue::Hit));
    state.shake(0.4);

    if state.player.hearts == 0 {
        end_encounter(state, false);
        return HitOutcome::Killed;
    }

    state.player.invincible_ticks = state.tuning.invincibility_frames;
    HitOutcome::HeartLost
}

/// Terminal transition; only the first call has any effect
pub fn end_encounter(state: &mut GameState, survived: bool) {
    if state.result.is_some() {
        return;
    }
    let result = EncounterResult {
        survived,
        final_score: state.score,
        elapsed_frames: state.frame,
    };
    state.phase = if survived {
        GamePhase::Victory
    } else {
        GamePhase::GameOver
    };
    state.schedule.clear();
    state.result = Some(result);
    log::info!(
        "Encounter ended: survived={} score={} time={:.1}s",
        survived,
        result.final_score,
        result.elapsed_secs()
    );
    state.emit(GameEvent::Audio(if survived {
        AudioCue::Victory
    } else {
        AudioCue::GameOver
    }));
    state.emit(GameEvent::EncounterEnded(result));
}

/// Count down the invincibility window and shield timer
pub fn update_protection(state: &mut GameState) {
    let player = &mut state.player;
    player.invincible_ticks = player.invincible_ticks.saturating_sub(1);
    if player.shield_active {
        player.shield_ticks = player.shield_ticks.saturating_sub(1);
        if player.shield_ticks == 0 {
            player.shield_active = false;
        }
    }
}
