//! Behavioral state selection for a single agent.
//!
//! The transition rules are evaluated in strict priority order: the
//! retreat rule overrides everything, then visibility splits by range,
//! then memory of a last known position, then the patrol default.

use rand::Rng;

use skirmish_core::constants::*;

/// Input to the decision evaluation for one agent.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext {
    pub health: f32,
    /// How eagerly this agent pursues and forgoes cover, in [0, 1].
    pub aggressiveness: f32,
    /// Range within which the agent stands and fights.
    pub attack_range: f32,
    pub target_visible: bool,
    /// Distance to the target (meaningful only while visible).
    pub distance_to_target: f32,
    pub has_last_known_position: bool,
    /// Current simulation time (seconds).
    pub now_secs: f32,
    /// When the agent is next scheduled to fire (seconds).
    pub next_fire_time: f32,
}

/// Outcome of one decision evaluation.
///
/// `EngageTarget` defers the cover search to the caller: whether a
/// cover position actually exists decides between taking cover and
/// attacking in the open, and a failed search must fall back to
/// attacking rather than stalling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Retreating,
    EngageTarget { seek_cover: bool },
    Investigating,
    Patrolling,
}

/// Evaluate the transition rules for one agent.
pub fn evaluate(ctx: &DecisionContext, rng: &mut impl Rng) -> Choice {
    // Rule 1: wounded agents break off, probabilistically.
    if ctx.health <= LOW_HEALTH_THRESHOLD && rng.gen::<f32>() < RETREAT_CHANCE {
        return Choice::Retreating;
    }

    // Rule 2: the target is in sight.
    if ctx.target_visible {
        if ctx.distance_to_target <= ctx.attack_range {
            return Choice::EngageTarget {
                seek_cover: needs_cover(ctx, rng),
            };
        }
        // Out of attack range: timid agents let the target go.
        if ctx.aggressiveness > PURSUE_AGGRESSIVENESS {
            return Choice::Investigating;
        }
        return Choice::Patrolling;
    }

    // Rule 3: chase the memory of the target.
    if ctx.has_last_known_position {
        return Choice::Investigating;
    }

    // Rule 4: nothing to do but wander.
    Choice::Patrolling
}

/// Probabilistic gate deciding whether the agent wants cover right now.
///
/// True if the agent is hurt and not aggressive enough to stay in the
/// open, or (with a smaller chance) if it has gone quiet — no shot
/// fired for a while past its own schedule.
pub fn needs_cover(ctx: &DecisionContext, rng: &mut impl Rng) -> bool {
    (ctx.health < COVER_HEALTH_THRESHOLD && rng.gen::<f32>() > ctx.aggressiveness)
        || (rng.gen::<f32>() < COVER_IDLE_CHANCE
            && ctx.now_secs > ctx.next_fire_time + COVER_STALE_FIRE_SECS)
}
