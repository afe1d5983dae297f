//! Projectile flight and hit resolution.
//!
//! Each projectile sweeps the segment it covers this tick against
//! obstacles (cover blocks bullets), the floor, and every living body
//! except its own shooter; the nearest hit wins. Impacts are buffered
//! and damage is applied after the sweep so the borrow of the world is
//! released first.

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{Health, Position, Projectile};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::{BODY_CENTER_HEIGHT, BODY_RADIUS, DT};
use skirmish_core::events::CombatEvent;
use skirmish_core::types::SimTime;

use crate::arena::{segment_sphere_hit, Arena};
use crate::systems::damage;

struct Impact {
    projectile: Entity,
    victim: Option<Entity>,
    position: Vec3,
    damage: f32,
}

pub fn run(
    world: &mut World,
    arena: &Arena,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    time: SimTime,
    events: &mut Vec<CombatEvent>,
) {
    let bodies: Vec<(Entity, Vec3)> = world
        .query::<(&Position, &Health)>()
        .without::<&Projectile>()
        .iter()
        .filter(|(_, (_, health))| !health.is_dead())
        .map(|(entity, (pos, _))| (entity, pos.0))
        .collect();

    let mut impacts: Vec<Impact> = Vec::new();
    for (entity, (pos, projectile)) in world.query_mut::<(&mut Position, &Projectile)>() {
        let from = pos.0;
        let to = from + projectile.velocity * DT;

        let mut best: Option<(f32, Option<Entity>)> = arena
            .segment_obstacle_hit(from, to, false)
            .map(|t| (t, None));

        // Floor hit.
        if from.y > 0.0 && to.y <= 0.0 {
            let t = from.y / (from.y - to.y);
            if best.map_or(true, |(bt, _)| t < bt) {
                best = Some((t, None));
            }
        }

        for (body, body_pos) in &bodies {
            if *body == projectile.shooter {
                continue;
            }
            let center = *body_pos + Vec3::Y * BODY_CENTER_HEIGHT;
            if let Some(t) = segment_sphere_hit(from, to, center, BODY_RADIUS) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, Some(*body)));
                }
            }
        }

        match best {
            Some((t, victim)) => impacts.push(Impact {
                projectile: entity,
                victim,
                position: from + (to - from) * t,
                damage: projectile.damage,
            }),
            None => pos.0 = to,
        }
    }

    for impact in impacts {
        let _ = world.despawn(impact.projectile);
        events.push(CombatEvent::ProjectileImpact {
            position: impact.position,
        });
        if let Some(victim) = impact.victim {
            damage::apply(world, victim, impact.damage, time, config, rng, events);
        }
    }
}
