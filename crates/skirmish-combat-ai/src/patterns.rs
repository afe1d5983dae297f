//! Attack pattern executor.
//!
//! Advances one agent's firing timers by a single tick and reports
//! whether a shot fires and whether the agent should shift position.
//! Only the Attacking state (and the peek-and-shoot sequence, at its
//! own cadence) drives this.

use rand::Rng;

use skirmish_core::components::CombatTimers;
use skirmish_core::constants::*;
use skirmish_core::enums::{AttackPattern, ShotKind};

use crate::profiles::get_profile;

/// Result of one executor step.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStep {
    /// A shot to fire this tick, if the gate opened.
    pub shot: Option<ShotKind>,
    /// Whether the pattern asks for a reposition after this shot.
    pub reposition: bool,
}

/// Advance the current pattern by one tick.
pub fn step(
    timers: &mut CombatTimers,
    now: f32,
    fire_rate: f32,
    rng: &mut impl Rng,
) -> PatternStep {
    if timers.pattern == AttackPattern::Burst {
        return step_burst(timers, now, fire_rate);
    }

    if now < timers.next_fire_time {
        return PatternStep::default();
    }

    let profile = get_profile(timers.pattern);
    timers.next_fire_time = now + fire_rate * profile.interval_factor;

    let reposition =
        profile.reposition_chance > 0.0 && rng.gen::<f32>() < profile.reposition_chance;

    PatternStep {
        shot: Some(profile.shot_kind),
        reposition,
    }
}

/// Burst fire: up to MAX_BURST quick shots, then hold until the pause
/// since the cycle completed has elapsed, then reset the counter.
fn step_burst(timers: &mut CombatTimers, now: f32, fire_rate: f32) -> PatternStep {
    if now < timers.next_fire_time {
        return PatternStep::default();
    }

    if timers.burst_count < MAX_BURST {
        timers.burst_count += 1;
        timers.next_fire_time = now + fire_rate * BURST_INTERVAL_FACTOR;
        if timers.burst_count == MAX_BURST {
            // Cycle complete; the pause is measured from here.
            timers.last_burst_time = now;
        }
        return PatternStep {
            shot: Some(ShotKind::Loose),
            reposition: false,
        };
    }

    if now >= timers.last_burst_time + BURST_PAUSE_SECS {
        timers.burst_count = 0;
    }
    PatternStep::default()
}

/// Switch to a random pattern if the switch interval has elapsed.
/// Returns true if a switch happened.
pub fn maybe_switch(timers: &mut CombatTimers, now: f32, rng: &mut impl Rng) -> bool {
    if now - timers.last_pattern_switch_time < PATTERN_SWITCH_SECS {
        return false;
    }
    switch(timers, now, rng);
    true
}

/// Pick a new pattern at random (possibly the same one) and reset the
/// burst bookkeeping. Switching always zeroes `burst_count` and
/// `last_burst_time`, whatever the prior pattern was.
pub fn switch(timers: &mut CombatTimers, now: f32, rng: &mut impl Rng) {
    let idx = rng.gen_range(0..AttackPattern::ALL.len());
    timers.pattern = AttackPattern::ALL[idx];
    timers.burst_count = 0;
    timers.last_burst_time = 0.0;
    timers.last_pattern_switch_time = now;
}
