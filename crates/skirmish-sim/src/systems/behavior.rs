//! Per-tick state behavior: movement intents, firing, and sequence
//! triggers for each living agent.
//!
//! Decisions pick the state on the slow cadence; this system makes the
//! state do something every tick. Shots and sequence starts are
//! buffered during the query and applied after it ends.

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_combat_ai::fsm::{needs_cover, DecisionContext};
use skirmish_combat_ai::patterns;
use skirmish_core::components::{
    Agent, AgentId, Brain, CombatTimers, Facing, Health, NavAgent, Perception, Position,
    TargetProxy,
};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::*;
use skirmish_core::enums::{AiState, SequenceKind};
use skirmish_core::events::CombatEvent;
use skirmish_core::types::{flatten, horizontal_distance, rotate_yaw, SimTime};

use crate::arena::Arena;
use crate::systems::combat::{self, ShotRequest};
use crate::systems::cover::find_cover;
use crate::systems::sequences::{self, ActiveSequence, SequenceStart};

pub fn run(
    world: &mut World,
    arena: &Arena,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    time: SimTime,
    events: &mut Vec<CombatEvent>,
) {
    let now = time.now();
    let target: Option<(Vec3, Vec3)> = world
        .query::<(&TargetProxy, &Position, &Facing)>()
        .iter()
        .next()
        .map(|(_, (_, pos, facing))| (pos.0, facing.0));
    let target_pos = target.map(|(pos, _)| pos);

    let mut shots: Vec<ShotRequest> = Vec::new();
    let mut starts: Vec<SequenceStart> = Vec::new();

    for (entity, (_, id, pos, facing, health, perception, brain, timers, nav, seq)) in world
        .query_mut::<(
            &Agent,
            &AgentId,
            &Position,
            &mut Facing,
            &mut Health,
            &mut Perception,
            &mut Brain,
            &mut CombatTimers,
            &mut NavAgent,
            Option<&ActiveSequence>,
        )>()
    {
        if health.is_dead() {
            continue;
        }

        patterns::maybe_switch(timers, now, rng);

        match brain.state {
            AiState::Idle => {}

            AiState::Patrolling => {
                nav.stopped = false;
                if !nav.path_active() || nav.remaining_distance(pos.0) < ARRIVAL_THRESHOLD {
                    let dir = rotate_yaw(Vec3::Z, rng.gen::<f32>() * std::f32::consts::TAU);
                    let candidate = pos.0 + dir * (rng.gen::<f32>() * PATROL_RADIUS);
                    if let Some(point) = arena.sample_reachable_point(candidate, PATROL_RADIUS) {
                        nav.destination = Some(point);
                    }
                }
            }

            AiState::Investigating => match perception.last_known_target_pos {
                Some(last_known) => {
                    nav.stopped = false;
                    nav.destination = Some(last_known);
                    if horizontal_distance(pos.0, last_known) < ARRIVAL_THRESHOLD {
                        // Reached the memory without reacquiring.
                        perception.last_known_target_pos = None;
                        let from = brain.state;
                        if brain.transition(AiState::Patrolling) {
                            events.push(CombatEvent::StateChanged {
                                agent_id: id.0,
                                from,
                                to: AiState::Patrolling,
                            });
                        }
                    }
                }
                None => {
                    let from = brain.state;
                    if brain.transition(AiState::Patrolling) {
                        events.push(CombatEvent::StateChanged {
                            agent_id: id.0,
                            from,
                            to: AiState::Patrolling,
                        });
                    }
                }
            },

            AiState::Attacking => {
                // Stand and fight unless a reposition shift owns the nav.
                if brain.is_repositioning || seq.is_some() {
                    nav.stopped = false;
                } else {
                    nav.stopped = true;
                    nav.destination = None;
                }
                let Some((target_pos, _)) = target else {
                    continue;
                };
                turn_toward(facing, pos.0, target_pos);

                let step = patterns::step(timers, now, config.fire_rate, rng);
                if let Some(kind) = step.shot {
                    shots.push(ShotRequest {
                        shooter: entity,
                        agent_id: id.0,
                        origin: pos.0,
                        kind,
                        pattern: timers.pattern,
                    });
                }

                let wants_shift =
                    step.reposition || rng.gen::<f32>() < ATTACK_REPOSITION_CHANCE;
                if wants_shift && !brain.is_repositioning && seq.is_none() {
                    starts.push(SequenceStart {
                        entity,
                        kind: SequenceKind::Reposition,
                    });
                }
            }

            AiState::TakingCover => match brain.cover_target {
                Some(cover) => {
                    if seq.is_none() {
                        nav.stopped = false;
                        nav.destination = Some(cover);
                        if horizontal_distance(pos.0, cover) < ARRIVAL_THRESHOLD
                            && perception.target_visible
                            && rng.gen::<f32>() < PEEK_CHANCE
                        {
                            starts.push(SequenceStart {
                                entity,
                                kind: SequenceKind::PeekAndShoot,
                            });
                        }
                    }
                }
                None => {
                    // Forced into cover (damage response) without a
                    // spot; search now and fall back if there is none.
                    let found = target_pos
                        .and_then(|t| find_cover(arena, pos.0, t, config, rng));
                    match found {
                        Some(point) => brain.cover_target = Some(point),
                        None => {
                            let next = if perception.target_visible {
                                AiState::Attacking
                            } else {
                                AiState::Patrolling
                            };
                            let from = brain.state;
                            if brain.transition(next) {
                                events.push(CombatEvent::StateChanged {
                                    agent_id: id.0,
                                    from,
                                    to: next,
                                });
                            }
                        }
                    }
                }
            },

            AiState::Flanking => {
                if !brain.is_repositioning {
                    if let Some((target_pos, target_facing)) = target {
                        let base = flatten(target_facing).normalize_or_zero();
                        let base = if base == Vec3::ZERO { Vec3::Z } else { base };
                        let angle = rng
                            .gen_range(FLANK_ANGLE_MIN_DEG..FLANK_ANGLE_MAX_DEG)
                            .to_radians();
                        let side = if rng.gen::<bool>() { 1.0 } else { -1.0 };
                        let offset = rotate_yaw(base, angle * side)
                            * rng.gen_range(FLANK_DISTANCE_MIN..FLANK_DISTANCE_MAX);
                        if let Some(point) =
                            arena.sample_reachable_point(target_pos + offset, COVER_SAMPLE_TOLERANCE)
                        {
                            nav.destination = Some(point);
                            nav.stopped = false;
                            brain.is_repositioning = true;
                        }
                    }
                }
                if brain.is_repositioning && nav.remaining_distance(pos.0) < ARRIVAL_THRESHOLD {
                    brain.is_repositioning = false;
                    let from = brain.state;
                    if brain.transition(AiState::Attacking) {
                        events.push(CombatEvent::StateChanged {
                            agent_id: id.0,
                            from,
                            to: AiState::Attacking,
                        });
                    }
                }
            }

            AiState::Retreating => {
                if !brain.is_repositioning {
                    let away = match target_pos {
                        Some(t) => flatten(pos.0 - t).normalize_or_zero(),
                        None => Vec3::ZERO,
                    };
                    let away = if away == Vec3::ZERO {
                        rotate_yaw(Vec3::Z, rng.gen::<f32>() * std::f32::consts::TAU)
                    } else {
                        away
                    };
                    let candidate = pos.0 + away * RETREAT_DISTANCE;
                    if let Some(point) = arena.sample_reachable_point(candidate, RETREAT_DISTANCE)
                    {
                        nav.destination = Some(point);
                        nav.stopped = false;
                    }
                    // With nowhere to run the arrival check below fires
                    // immediately and the agent recovers in place.
                    brain.is_repositioning = true;
                }
                if brain.is_repositioning && nav.remaining_distance(pos.0) < ARRIVAL_THRESHOLD {
                    brain.is_repositioning = false;
                    health.current = (health.current + RETREAT_HEALTH_BONUS).min(health.max);

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
                    let next = if needs_cover(&ctx, rng) {
                        AiState::TakingCover
                    } else {
                        AiState::Patrolling
                    };
                    let from = brain.state;
                    if brain.transition(next) {
                        events.push(CombatEvent::StateChanged {
                            agent_id: id.0,
                            from,
                            to: next,
                        });
                    }
                }
            }
        }
    }

    if let Some(target_pos) = target_pos {
        for shot in &shots {
            combat::fire(world, shot, config, target_pos, time.tick, rng, events);
        }
    }
    sequences::begin(world, arena, rng, time.tick, &starts);
}

/// Turn the facing a fraction of the way toward a point each tick.
fn turn_toward(facing: &mut Facing, from: Vec3, to: Vec3) {
    let dir = flatten(to - from).normalize_or_zero();
    if dir == Vec3::ZERO {
        return;
    }
    let blended = facing.0.lerp(dir, FACE_TURN_FACTOR).normalize_or_zero();
    facing.0 = if blended == Vec3::ZERO { dir } else { blended };
}
