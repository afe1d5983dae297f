//! Per-pattern firing profiles.
//!
//! Consolidates the timing and accuracy parameters of the four attack
//! patterns. Burst bookkeeping is handled by the executor; the profile
//! only carries its cadence numbers.

use skirmish_core::constants::*;
use skirmish_core::enums::{AttackPattern, ShotKind};

/// Firing profile for an attack pattern.
pub struct PatternProfile {
    /// Multiplier on the agent's base fire interval.
    pub interval_factor: f32,
    /// Accuracy class of shots fired under this pattern.
    pub shot_kind: ShotKind,
    /// Chance to trigger a reposition after firing (0 = never).
    pub reposition_chance: f32,
}

/// Get the firing profile for a pattern.
pub fn get_profile(pattern: AttackPattern) -> PatternProfile {
    match pattern {
        AttackPattern::Precise => PatternProfile {
            interval_factor: PRECISE_INTERVAL_FACTOR,
            shot_kind: ShotKind::Precise,
            reposition_chance: 0.0,
        },
        AttackPattern::Burst => PatternProfile {
            interval_factor: BURST_INTERVAL_FACTOR,
            shot_kind: ShotKind::Loose,
            reposition_chance: 0.0,
        },
        AttackPattern::Suppressive => PatternProfile {
            interval_factor: SUPPRESSIVE_INTERVAL_FACTOR,
            shot_kind: ShotKind::Loose,
            reposition_chance: SUPPRESSIVE_REPOSITION_CHANCE,
        },
        AttackPattern::Tactical => PatternProfile {
            interval_factor: TACTICAL_INTERVAL_FACTOR,
            shot_kind: ShotKind::Precise,
            reposition_chance: TACTICAL_REPOSITION_CHANCE,
        },
    }
}
