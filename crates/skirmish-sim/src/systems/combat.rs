//! Shot and grenade spawning.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{
    Agent, AgentId, CombatTimers, Grenade, Health, Perception, Position, Projectile,
};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::*;
use skirmish_core::enums::{AttackPattern, ShotKind};
use skirmish_core::events::CombatEvent;
use skirmish_core::types::{flatten, secs_to_ticks, SimTime};

use crate::systems::target_position;

/// A shot queued by the behavior or sequence systems, spawned after
/// their query borrows end.
#[derive(Debug, Clone, Copy)]
pub struct ShotRequest {
    pub shooter: Entity,
    pub agent_id: u32,
    pub origin: Vec3,
    pub kind: ShotKind,
    pub pattern: AttackPattern,
}

/// Spawn a projectile aimed at the target with accuracy-scaled spread.
/// Precise shots tighten the cone; with high base accuracy they can
/// eliminate it entirely.
pub fn fire(
    world: &mut World,
    req: &ShotRequest,
    config: &AgentConfig,
    target_pos: Vec3,
    tick: u64,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) {
    let accuracy = match req.kind {
        ShotKind::Precise => (config.accuracy * PRECISE_ACCURACY_FACTOR).min(1.0),
        ShotKind::Loose => config.accuracy,
    };
    let spread = (1.0 - accuracy) * SPREAD_SCALE;

    let muzzle = req.origin + Vec3::Y * EYE_HEIGHT;
    let aim = target_pos + Vec3::Y * BODY_CENTER_HEIGHT;
    let mut direction = (aim - muzzle).normalize_or_zero();
    if direction == Vec3::ZERO {
        return;
    }
    if spread > 0.0 {
        direction += Vec3::new(
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
        );
        direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
    }

    world.spawn((
        Position(muzzle),
        Projectile {
            velocity: direction * config.bullet_speed,
            damage: config.bullet_damage,
            shooter: req.shooter,
            spawn_tick: tick,
        },
    ));
    events.push(CombatEvent::ShotFired {
        agent_id: req.agent_id,
        origin: muzzle,
        direction,
        kind: req.kind,
        pattern: req.pattern,
    });
}

/// Grenade gate: an agent off cooldown with the target in sight rolls
/// a small per-tick chance to throw.
pub fn throw_grenades(
    world: &mut World,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    time: SimTime,
    events: &mut Vec<CombatEvent>,
) {
    let Some(target_pos) = target_position(world) else {
        return;
    };
    let now = time.now();

    let mut throws: Vec<(Entity, u32, Vec3)> = Vec::new();
    for (entity, (_, id, pos, health, perception, timers)) in world.query_mut::<(
        &Agent,
        &AgentId,
        &Position,
        &Health,
        &Perception,
        &mut CombatTimers,
    )>() {
        if health.is_dead() || !perception.target_visible {
            continue;
        }
        if now < timers.next_grenade_time {
            continue;
        }
        if rng.gen::<f32>() >= GRENADE_THROW_CHANCE {
            continue;
        }
        timers.next_grenade_time = now + config.grenade_cooldown;
        throws.push((entity, id.0, pos.0));
    }

    for (thrower, agent_id, pos) in throws {
        let origin = pos + Vec3::Y * EYE_HEIGHT;
        let distance = flatten(target_pos - pos).length();
        let mut velocity = (target_pos - origin).normalize_or_zero() * config.grenade_throw_force;
        velocity.y += distance * GRENADE_ARC_PER_METER * config.grenade_throw_force;

        world.spawn((
            Position(origin),
            Grenade {
                velocity,
                damage: config.bullet_damage * GRENADE_DAMAGE_FACTOR,
                radius: config.grenade_radius,
                detonation_tick: time.tick + secs_to_ticks(GRENADE_FUSE_SECS),
                thrower,
            },
        ));
        events.push(CombatEvent::GrenadeThrown { agent_id, origin });
    }
}
