//! Damage application and the hit-response protocol.
//!
//! All damage funnels through [`apply`], whatever the source: bullets,
//! grenade blasts, or external damage commands. Agents run the full
//! hit-response protocol (memory update, spot roll, retreat roll, cover
//! roll, death); the target proxy has armor instead; props just lose
//! health and are swept by cleanup.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_combat_ai::fsm::{needs_cover, DecisionContext};
use skirmish_core::components::{
    Agent, AgentId, Armor, Brain, CombatTimers, Corpse, Health, NavAgent, Perception, Prop,
    TargetProxy,
};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::*;
use skirmish_core::enums::AiState;
use skirmish_core::events::CombatEvent;
use skirmish_core::types::{secs_to_ticks, SimTime};

use crate::systems::target_position;

/// Apply damage to any damageable entity.
pub fn apply(
    world: &mut World,
    entity: Entity,
    amount: f32,
    time: SimTime,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) {
    if world.satisfies::<&Agent>(entity).unwrap_or(false) {
        apply_to_agent(world, entity, amount, time, config, rng, events);
    } else if world.satisfies::<&TargetProxy>(entity).unwrap_or(false) {
        apply_to_target(world, entity, amount, events);
    } else if world.satisfies::<&Prop>(entity).unwrap_or(false) {
        if let Ok(health) = world.query_one_mut::<&mut Health>(entity) {
            health.current -= amount;
        }
    }
}

/// The agent hit-response protocol. Death is idempotent: a corpse
/// absorbs further damage without re-running any of this.
fn apply_to_agent(
    world: &mut World,
    entity: Entity,
    amount: f32,
    time: SimTime,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) {
    if world.satisfies::<&Corpse>(entity).unwrap_or(false) {
        return;
    }
    let target_pos = target_position(world);
    let now = time.now();

    let mut died = false;
    {
        let Ok((id, health, perception, brain, timers, nav)) = world.query_one_mut::<(
            &AgentId,
            &mut Health,
            &mut Perception,
            &mut Brain,
            &CombatTimers,
            &mut NavAgent,
        )>(entity) else {
            return;
        };
        if health.is_dead() {
            return;
        }
        health.current -= amount;

        // Getting shot reveals where the shooter is, even unseen; the
        // memory update happens whether or not the spot roll succeeds.
        if !perception.target_visible {
            if let Some(target_pos) = target_pos {
                perception.last_known_target_pos = Some(target_pos);
                if rng.gen::<f32>() < SPOT_ON_HIT_CHANCE {
                    perception.target_visible = true;
                    let from = brain.state;
                    if brain.transition(AiState::Attacking) {
                        events.push(CombatEvent::StateChanged {
                            agent_id: id.0,
                            from,
                            to: AiState::Attacking,
                        });
                    }
                    events.push(CombatEvent::TargetSpotted { agent_id: id.0 });
                }
            }
        }

        if health.is_dead() {
            health.current = 0.0;
            nav.stopped = true;
            nav.destination = None;
            died = true;
            let toss = Vec3::new(
                rng.gen::<f32>() * 2.0 - 1.0,
                rng.gen::<f32>(),
                rng.gen::<f32>() * 2.0 - 1.0,
            )
            .normalize_or_zero();
            let toss = if toss == Vec3::ZERO { Vec3::Y } else { toss };
            events.push(CombatEvent::AgentDied {
                agent_id: id.0,
                weapon_impulse: toss * WEAPON_DROP_IMPULSE,
            });
        } else if health.current < LOW_HEALTH_THRESHOLD && rng.gen::<f32>() < RETREAT_CHANCE {
            let from = brain.state;
            if brain.transition(AiState::Retreating) {
                events.push(CombatEvent::StateChanged {
                    agent_id: id.0,
                    from,
                    to: AiState::Retreating,
                });
            }
        } else {
            let ctx = DecisionContext {
                health: health.current,
                aggressiveness: config.aggressiveness,
                attack_range: config.attack_range,
                target_visible: perception.target_visible,
                distance_to_target: f32::MAX,
                has_last_known_position: perception.last_known_target_pos.is_some(),
                now_secs: now,
                next_fire_time: timers.next_fire_time,
            };
            if needs_cover(&ctx, rng) && rng.gen::<f32>() < HIT_COVER_CHANCE {
                let from = brain.state;
                // No cover spot yet; the behavior system searches next
                // tick and falls back if the arena offers none.
                if brain.transition(AiState::TakingCover) {
                    events.push(CombatEvent::StateChanged {
                        agent_id: id.0,
                        from,
                        to: AiState::TakingCover,
                    });
                }
            }
        }
    }

    if died {
        let _ = world.insert_one(
            entity,
            Corpse {
                despawn_tick: time.tick + secs_to_ticks(CORPSE_DESPAWN_SECS),
            },
        );
    }
}

/// Target proxy damage: armor soaks a fixed share while it lasts.
fn apply_to_target(world: &mut World, entity: Entity, amount: f32, events: &mut Vec<CombatEvent>) {
    let Ok((health, armor)) = world.query_one_mut::<(&mut Health, Option<&mut Armor>)>(entity)
    else {
        return;
    };
    if health.is_dead() {
        return;
    }

    let mut remaining = amount;
    if let Some(armor) = armor {
        let absorbed = (amount * ARMOR_ABSORPTION).min(armor.current);
        armor.current -= absorbed;
        remaining -= absorbed;
    }
    health.current -= remaining;

    if health.is_dead() {
        health.current = 0.0;
        events.push(CombatEvent::TargetDown);
    }
}
