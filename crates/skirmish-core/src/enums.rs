//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Behavioral state of a combat agent. Exactly one state is active at
/// a time; transitions are decided by the decision system (and forced
/// by the damage response).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Stand still, no active behavior.
    Idle,
    /// Wander between random reachable points.
    #[default]
    Patrolling,
    /// Move toward the last known target position.
    Investigating,
    /// Hold position and execute the current attack pattern.
    Attacking,
    /// Move to a cover position; occasionally peek and shoot.
    TakingCover,
    /// Swing around the target's flank, then attack.
    Flanking,
    /// Fall back away from the target to recover.
    Retreating,
}

/// Firing-cadence policy executed while Attacking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Single accurate shots at half the base rate.
    #[default]
    Precise,
    /// Up to `MAX_BURST` quick shots, then a pause.
    Burst,
    /// Continuous inaccurate fire with occasional repositioning.
    Suppressive,
    /// Deliberate accurate shots, frequently followed by movement.
    Tactical,
}

impl AttackPattern {
    /// All patterns, indexable for random selection.
    pub const ALL: [AttackPattern; 4] = [
        AttackPattern::Precise,
        AttackPattern::Burst,
        AttackPattern::Suppressive,
        AttackPattern::Tactical,
    ];
}

/// Timed action sequence kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Step out of cover, fire a few shots, step back.
    PeekAndShoot,
    /// Shift to a random nearby point, then resume attacking.
    Reposition,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Running,
    Paused,
}

/// Kind of shot produced by the attack pattern executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    /// High-accuracy shot (1.5x accuracy factor, capped at 1.0).
    Precise,
    /// Base-accuracy shot.
    Loose,
}
