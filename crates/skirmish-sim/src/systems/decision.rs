//! State selection. Runs on the decision cadence.
//!
//! Each living agent's situation is packed into a [`DecisionContext`]
//! and evaluated by the pure transition rules; the one world-dependent
//! choice — whether cover actually exists — is resolved here. An engage
//! choice that asked for cover but found none falls back to attacking
//! in the open.

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skirmish_combat_ai::fsm::{evaluate, Choice, DecisionContext};
use skirmish_core::components::{Agent, AgentId, Brain, CombatTimers, Health, Perception, Position};
use skirmish_core::config::AgentConfig;
use skirmish_core::enums::AiState;
use skirmish_core::events::CombatEvent;

use crate::arena::Arena;
use crate::systems::cover::find_cover;
use crate::systems::target_position;

pub fn run(
    world: &mut World,
    arena: &Arena,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    now: f32,
    events: &mut Vec<CombatEvent>,
) {
    let target_pos = target_position(world);

    let mut evaluated: Vec<(Entity, u32, Choice, Vec3)> = Vec::new();
    for (entity, (_, id, pos, health, perception, timers)) in world
        .query::<(
            &Agent,
            &AgentId,
            &Position,
            &Health,
            &Perception,
            &CombatTimers,
        )>()
        .iter()
    {
        if health.is_dead() {
            continue;
        }
        let ctx = DecisionContext {
            health: health.current,
            aggressiveness: config.aggressiveness,
            attack_range: config.attack_range,
            target_visible: perception.target_visible,
            distance_to_target: target_pos
                .map_or(f32::MAX, |t| (t - pos.0).length()),
            has_last_known_position: perception.last_known_target_pos.is_some(),
            now_secs: now,
            next_fire_time: timers.next_fire_time,
        };
        evaluated.push((entity, id.0, evaluate(&ctx, rng), pos.0));
    }

    for (entity, agent_id, choice, pos) in evaluated {
        let mut cover = None;
        let next = match choice {
            Choice::Retreating => AiState::Retreating,
            Choice::Investigating => AiState::Investigating,
            Choice::Patrolling => AiState::Patrolling,
            Choice::EngageTarget { seek_cover } => {
                if seek_cover {
                    cover = target_pos
                        .and_then(|t| find_cover(arena, pos, t, config, rng));
                }
                if cover.is_some() {
                    AiState::TakingCover
                } else {
                    AiState::Attacking
                }
            }
        };

        let Ok(brain) = world.query_one_mut::<&mut Brain>(entity) else {
            continue;
        };
        let from = brain.state;
        if brain.transition(next) {
            events.push(CombatEvent::StateChanged {
                agent_id,
                from,
                to: next,
            });
        }
        if next == AiState::TakingCover {
            brain.cover_target = cover;
        }
    }
}
