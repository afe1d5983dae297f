//! Cover locator.
//!
//! Candidates are generated behind each cover-tagged obstacle within
//! the agent's search radius, offset away from the target. A candidate
//! qualifies when it sits on navigable floor and the chest-height line
//! from it to the target is interrupted (a clear sightline means the
//! spot is not actually cover). One qualifying candidate is picked at
//! random rather than the nearest, so squads spread across the
//! available cover instead of piling behind one crate.

use glam::Vec3;
use rand::Rng;

use skirmish_core::config::AgentConfig;
use skirmish_core::constants::{COVER_CHECK_HEIGHT, COVER_OFFSET, COVER_SAMPLE_TOLERANCE};
use skirmish_core::types::flatten;

use crate::arena::Arena;

/// Find a cover position against the target, or `None` when no
/// qualifying spot exists. The caller decides the fallback.
pub fn find_cover(
    arena: &Arena,
    agent_pos: Vec3,
    target_pos: Vec3,
    config: &AgentConfig,
    rng: &mut impl Rng,
) -> Option<Vec3> {
    let mut candidates = Vec::new();

    for obstacle in arena.cover_obstacles_within(agent_pos, config.cover_search_radius) {
        let away = flatten(obstacle.position - target_pos);
        let len = away.length();
        if len <= f32::EPSILON {
            continue;
        }
        let candidate = obstacle.position + (away / len) * COVER_OFFSET;

        let Some(point) = arena.sample_reachable_point(candidate, COVER_SAMPLE_TOLERANCE) else {
            continue;
        };

        let from = point + Vec3::Y * COVER_CHECK_HEIGHT;
        let to = target_pos + Vec3::Y * COVER_CHECK_HEIGHT;
        if !arena.line_blocked(from, to, false) {
            continue;
        }
        candidates.push(point);
    }

    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}
