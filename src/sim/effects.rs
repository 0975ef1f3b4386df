//! Timed status effects
//!
//! Both slots are singletons. A new power-up replaces the active one
//! outright; a debuff blocks further debuffs until it expires. Durations
//! count down once per frame.

use super::state::{Debuff, DebuffKind, GameState, PowerUp, PowerUpKind, RunEvent};
use crate::consts::*;

/// Activate `kind` with its standard duration, replacing any active buff.
/// This is the gauge-cap path and the only one that notifies the host.
pub fn activate_power_up(state: &mut GameState, kind: PowerUpKind, events: &mut Vec<RunEvent>) {
    state.power_up = Some(PowerUp {
        kind,
        frames_left: kind.duration(),
    });
    events.push(RunEvent::PowerUpActivated { kind });
    log::debug!("power-up {:?} activated", kind);
}

/// Grant a shield outside the gauge path (revive and continue grace).
pub fn grant_shield(state: &mut GameState, frames: u32) {
    state.power_up = Some(PowerUp {
        kind: PowerUpKind::Shield,
        frames_left: frames,
    });
}

/// Apply a hazard debuff, snapshotting current physics for restoration.
/// Callers must have checked the singleton invariant first.
pub fn apply_debuff(state: &mut GameState, kind: DebuffKind, duration: u32, magnitude: f32) {
    state.debuff = Some(Debuff {
        kind,
        frames_left: duration,
        magnitude,
        saved_gravity: state.actor.gravity,
        saved_flap: state.actor.flap,
    });
    log::debug!("debuff {:?} applied for {} frames", kind, duration);
}

/// Count both slots down one frame, expiring as needed.
pub fn step_effects(state: &mut GameState) {
    if let Some(p) = state.power_up.as_mut() {
        p.frames_left = p.frames_left.saturating_sub(1);
    }
    if state.power_up.is_some_and(|p| p.frames_left == 0) {
        state.power_up = None;
    }

    if let Some(d) = state.debuff.as_mut() {
        d.frames_left = d.frames_left.saturating_sub(1);
    }
    if let Some(d) = state.debuff {
        if d.frames_left == 0 {
            // Restore the snapshot rather than recomputing from defaults,
            // so trait changes made while the debuff ran are respected.
            state.actor.gravity = d.saved_gravity;
            state.actor.flap = d.saved_flap;
            state.debuff = None;
        }
    }

    if state.grace_frames > 0 {
        state.grace_frames -= 1;
    }
}

/// Recompute the actor's effective gravity and flap for this frame: from
/// the debuff snapshot while one is active, from the character constants
/// otherwise. Runs unconditionally so character changes apply immediately.
pub fn resolve_modifiers(state: &mut GameState) {
    match state.debuff {
        Some(d) => match d.kind {
            DebuffKind::Leaden => {
                state.actor.gravity = d.saved_gravity * d.magnitude;
                state.actor.flap = d.saved_flap;
            }
            DebuffKind::Sapped => {
                state.actor.gravity = d.saved_gravity;
                state.actor.flap = d.saved_flap * d.magnitude;
            }
        },
        None => {
            state.actor.gravity = BASE_GRAVITY * state.character.gravity;
            state.actor.flap = BASE_FLAP * state.character.flap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CharacterId;
    use crate::sim::state::RunConfig;

    fn new_state() -> GameState {
        GameState::new(&RunConfig {
            character: CharacterId::Robin,
            starting_power_up: None,
            continue_allowance: 0,
            seed: 3,
        })
    }

    #[test]
    fn test_power_up_replaces_previous() {
        let mut state = new_state();
        let mut events = Vec::new();
        activate_power_up(&mut state, PowerUpKind::Slow, &mut events);
        activate_power_up(&mut state, PowerUpKind::Magnet, &mut events);
        // No stacking: only the latest survives, with its own full duration
        assert!(state.power_active(PowerUpKind::Magnet));
        assert!(!state.power_active(PowerUpKind::Slow));
        assert_eq!(
            state.power_up.map(|p| p.frames_left),
            Some(PowerUpKind::Magnet.duration())
        );
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_power_up_expires() {
        let mut state = new_state();
        grant_shield(&mut state, 2);
        step_effects(&mut state);
        assert!(state.power_active(PowerUpKind::Shield));
        step_effects(&mut state);
        assert!(state.power_up.is_none());
    }

    #[test]
    fn test_debuff_expiry_restores_snapshot() {
        let mut state = new_state();
        resolve_modifiers(&mut state);
        let (g0, f0) = (state.actor.gravity, state.actor.flap);

        apply_debuff(&mut state, DebuffKind::Leaden, 3, 2.0);
        resolve_modifiers(&mut state);
        assert!(state.actor.gravity > g0);

        for _ in 0..3 {
            step_effects(&mut state);
        }
        assert!(state.debuff.is_none());
        assert_eq!(state.actor.gravity, g0);
        assert_eq!(state.actor.flap, f0);
    }

    #[test]
    fn test_sapped_weakens_flap_only() {
        let mut state = new_state();
        resolve_modifiers(&mut state);
        let (g0, f0) = (state.actor.gravity, state.actor.flap);

        apply_debuff(&mut state, DebuffKind::Sapped, 100, 0.5);
        resolve_modifiers(&mut state);
        assert_eq!(state.actor.gravity, g0);
        // Flap is negative; halving the magnitude brings it toward zero
        assert!(state.actor.flap > f0);
    }

    #[test]
    fn test_grace_counts_down() {
        let mut state = new_state();
        state.grace_frames = 2;
        assert!(state.invulnerable());
        step_effects(&mut state);
        step_effects(&mut state);
        assert!(!state.invulnerable());
    }
}
