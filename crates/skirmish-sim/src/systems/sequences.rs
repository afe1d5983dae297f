//! Timed multi-phase actions: reposition shifts and peek-and-shoot.
//!
//! A sequence is a small resumable task attached to its agent as a
//! component. It captures the brain generation at start; if a decision
//! or damage response changes state before the sequence finishes, the
//! generation no longer matches and the sequence abandons itself
//! without touching the agent.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{AgentId, Brain, CombatTimers, Facing, NavAgent, Position};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::*;
use skirmish_core::enums::{SequenceKind, ShotKind};
use skirmish_core::events::CombatEvent;
use skirmish_core::types::{flatten, rotate_yaw, secs_to_ticks, SimTime};

use crate::arena::Arena;
use crate::systems::combat::{self, ShotRequest};
use crate::systems::target_position;

/// A sequence in progress, attached to the acting agent.
#[derive(Debug, Clone, Copy)]
pub struct ActiveSequence {
    pub kind: SequenceKind,
    pub phase: SequencePhase,
    /// Tick at which the current phase acts next.
    pub wake_tick: u64,
    /// Brain generation captured at start; a mismatch abandons the
    /// sequence as a no-op.
    pub generation: u64,
    /// Where to walk back to when the sequence ends (peek only).
    pub return_to: Vec3,
    /// Volley shots left (peek only).
    pub shots_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    /// Walking to the sequence's vantage point (or waiting out the
    /// reposition timer).
    Approach,
    /// Firing the peek volley.
    Volley,
}

/// A request to start a sequence, queued by the behavior system.
#[derive(Debug, Clone, Copy)]
pub struct SequenceStart {
    pub entity: Entity,
    pub kind: SequenceKind,
}

/// Start queued sequences. A start is dropped when its movement target
/// cannot be placed on navigable floor.
pub fn begin(
    world: &mut World,
    arena: &Arena,
    rng: &mut ChaCha8Rng,
    tick: u64,
    starts: &[SequenceStart],
) {
    let target_pos = target_position(world);

    for start in starts {
        let mut sequence = None;
        {
            let Ok((pos, brain, nav)) =
                world.query_one_mut::<(&Position, &mut Brain, &mut NavAgent)>(start.entity)
            else {
                continue;
            };
            match start.kind {
                SequenceKind::Reposition => {
                    if brain.is_repositioning {
                        continue;
                    }
                    let dir = rotate_yaw(Vec3::Z, rng.gen::<f32>() * std::f32::consts::TAU);
                    let candidate = pos.0 + dir * REPOSITION_DISTANCE;
                    if let Some(point) =
                        arena.sample_reachable_point(candidate, REPOSITION_DISTANCE)
                    {
                        brain.is_repositioning = true;
                        nav.destination = Some(point);
                        nav.stopped = false;
                        sequence = Some(ActiveSequence {
                            kind: start.kind,
                            phase: SequencePhase::Approach,
                            wake_tick: tick + secs_to_ticks(REPOSITION_WAIT_SECS),
                            generation: brain.generation,
                            return_to: pos.0,
                            shots_remaining: 0,
                        });
                    }
                }
                SequenceKind::PeekAndShoot => {
                    let Some(target_pos) = target_pos else {
                        continue;
                    };
                    let out = flatten(target_pos - pos.0).normalize_or_zero();
                    if out == Vec3::ZERO {
                        continue;
                    }
                    let candidate = pos.0 + out * PEEK_DISTANCE;
                    if let Some(point) =
                        arena.sample_reachable_point(candidate, COVER_SAMPLE_TOLERANCE)
                    {
                        nav.destination = Some(point);
                        nav.stopped = false;
                        sequence = Some(ActiveSequence {
                            kind: start.kind,
                            phase: SequencePhase::Approach,
                            wake_tick: tick + secs_to_ticks(PEEK_APPROACH_SECS),
                            generation: brain.generation,
                            return_to: pos.0,
                            shots_remaining: rng.gen_range(PEEK_SHOTS_MIN..=PEEK_SHOTS_MAX),
                        });
                    }
                }
            }
        }
        if let Some(sequence) = sequence {
            let _ = world.insert_one(start.entity, sequence);
        }
    }
}

/// Advance all running sequences by one tick.
pub fn run(
    world: &mut World,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    time: SimTime,
    events: &mut Vec<CombatEvent>,
) {
    let tick = time.tick;
    let target_pos = target_position(world);

    let active: Vec<(Entity, ActiveSequence)> = world
        .query::<&ActiveSequence>()
        .iter()
        .map(|(entity, seq)| (entity, *seq))
        .collect();

    let mut shots: Vec<ShotRequest> = Vec::new();
    let mut finished: Vec<Entity> = Vec::new();

    for (entity, mut seq) in active {
        {
            let Ok((id, pos, facing, brain, nav, timers)) = world.query_one_mut::<(
                &AgentId,
                &Position,
                &mut Facing,
                &mut Brain,
                &mut NavAgent,
                &CombatTimers,
            )>(entity) else {
                finished.push(entity);
                continue;
            };

            if seq.generation != brain.generation {
                // The brain moved on; unwind without acting.
                if seq.kind == SequenceKind::Reposition {
                    brain.is_repositioning = false;
                }
                finished.push(entity);
                continue;
            }

            match seq.kind {
                SequenceKind::Reposition => {
                    if nav.remaining_distance(pos.0) < ARRIVAL_THRESHOLD || tick >= seq.wake_tick {
                        brain.is_repositioning = false;
                        finished.push(entity);
                    }
                }
                SequenceKind::PeekAndShoot => match seq.phase {
                    SequencePhase::Approach => {
                        if tick >= seq.wake_tick {
                            seq.phase = SequencePhase::Volley;
                        }
                    }
                    SequencePhase::Volley => {
                        if let Some(target_pos) = target_pos {
                            let dir = flatten(target_pos - pos.0).normalize_or_zero();
                            if dir != Vec3::ZERO {
                                facing.0 = dir;
                            }
                        }
                        if tick >= seq.wake_tick {
                            if seq.shots_remaining > 0 {
                                shots.push(ShotRequest {
                                    shooter: entity,
                                    agent_id: id.0,
                                    origin: pos.0,
                                    kind: ShotKind::Loose,
                                    pattern: timers.pattern,
                                });
                                seq.shots_remaining -= 1;
                                seq.wake_tick = tick + secs_to_ticks(config.fire_rate);
                            } else {
                                // Volley spent: duck back behind cover.
                                nav.destination = Some(seq.return_to);
                                nav.stopped = false;
                                finished.push(entity);
                            }
                        }
                    }
                },
            }
        }
        if let Ok(slot) = world.query_one_mut::<&mut ActiveSequence>(entity) {
            *slot = seq;
        }
    }

    for entity in finished {
        let _ = world.remove_one::<ActiveSequence>(entity);
    }
    if let Some(target_pos) = target_pos {
        for shot in &shots {
            combat::fire(world, shot, config, target_pos, tick, rng, events);
        }
    }
}
