//! Immutable character roster
//!
//! Each character is a set of multipliers over the base physics constants,
//! a signature power-up granted when the gauge fills, and at most one
//! special ability checked explicitly by the hit pipeline.

use serde::{Deserialize, Serialize};

use crate::sim::PowerUpKind;

/// Selectable characters, shared across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CharacterId {
    #[default]
    Robin,
    Colibri,
    Owl,
    Phoenix,
    Moth,
}

/// Special abilities, one per character at most
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialTrait {
    /// Shrugs off the first hazard debuff of the run
    NegateDebuff,
    /// Chance to slip through a pipe wall; each attempt starts a cooldown
    PhaseChance { chance: f32, cooldown: u32 },
    /// One free mid-air revive per run
    Revive,
}

/// Per-character constants. Read-only; the sim never mutates these.
#[derive(Debug, Clone, Copy)]
pub struct CharacterConfig {
    pub id: CharacterId,
    pub name: &'static str,
    /// Collision radius multiplier
    pub size: f32,
    /// Scroll pace multiplier; also scales vertical integration
    pub speed: f32,
    /// Flap impulse multiplier
    pub flap: f32,
    /// Gravity multiplier
    pub gravity: f32,
    /// Power gauge fill-rate multiplier
    pub gauge: f32,
    /// Power-up granted when the gauge reaches its cap
    pub signature: PowerUpKind,
    pub special: Option<SpecialTrait>,
}

pub static ROSTER: [CharacterConfig; 5] = [
    CharacterConfig {
        id: CharacterId::Robin,
        name: "Robin",
        size: 1.0,
        speed: 1.0,
        flap: 1.0,
        gravity: 1.0,
        gauge: 1.0,
        signature: PowerUpKind::Shield,
        special: None,
    },
    CharacterConfig {
        id: CharacterId::Colibri,
        name: "Colibri",
        size: 0.85,
        speed: 1.18,
        flap: 1.05,
        gravity: 0.95,
        gauge: 1.1,
        signature: PowerUpKind::Speed,
        special: None,
    },
    CharacterConfig {
        id: CharacterId::Owl,
        name: "Owl",
        size: 1.1,
        speed: 0.92,
        flap: 0.95,
        gravity: 1.05,
        gauge: 1.0,
        signature: PowerUpKind::Slow,
        special: Some(SpecialTrait::NegateDebuff),
    },
    CharacterConfig {
        id: CharacterId::Phoenix,
        name: "Phoenix",
        size: 1.0,
        speed: 1.0,
        flap: 1.0,
        gravity: 1.0,
        gauge: 0.9,
        signature: PowerUpKind::Magnet,
        special: Some(SpecialTrait::Revive),
    },
    CharacterConfig {
        id: CharacterId::Moth,
        name: "Moth",
        size: 0.9,
        speed: 1.05,
        flap: 1.0,
        gravity: 0.98,
        gauge: 1.05,
        signature: PowerUpKind::Shrink,
        special: Some(SpecialTrait::PhaseChance {
            chance: 0.35,
            cooldown: 360,
        }),
    },
];

impl CharacterId {
    /// Look up the immutable config for this character.
    pub fn config(self) -> &'static CharacterConfig {
        ROSTER.iter().find(|c| c.id == self).unwrap_or(&ROSTER[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_lookup_matches_id() {
        for entry in &ROSTER {
            assert_eq!(entry.id.config().id, entry.id);
        }
    }

    #[test]
    fn test_multipliers_are_sane() {
        for entry in &ROSTER {
            assert!(entry.size > 0.5 && entry.size < 1.5);
            assert!(entry.speed > 0.5 && entry.speed < 1.5);
            assert!(entry.gauge > 0.5 && entry.gauge < 1.5);
        }
    }

    #[test]
    fn test_phase_trait_carries_cooldown() {
        let moth = CharacterId::Moth.config();
        match moth.special {
            Some(SpecialTrait::PhaseChance { chance, cooldown }) => {
                assert!(chance > 0.0 && chance < 1.0);
                assert!(cooldown > 0);
            }
            other => panic!("expected phase trait, got {:?}", other),
        }
    }
}
