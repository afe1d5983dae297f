//! Grenade ballistics and detonation.
//!
//! Grenades fly under gravity, come to rest on the floor, and explode
//! when their fuse tick arrives. Blast damage falls off linearly with
//! distance and skips the thrower.

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{Grenade, Health, Position};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::{BODY_CENTER_HEIGHT, DT, GRAVITY};
use skirmish_core::events::CombatEvent;
use skirmish_core::types::SimTime;

use crate::systems::damage;

pub fn run(
    world: &mut World,
    config: &AgentConfig,
    rng: &mut ChaCha8Rng,
    time: SimTime,
    events: &mut Vec<CombatEvent>,
) {
    // Ballistics.
    for (_entity, (pos, grenade)) in world.query_mut::<(&mut Position, &mut Grenade)>() {
        if grenade.velocity == Vec3::ZERO && pos.0.y <= 0.0 {
            continue; // at rest
        }
        grenade.velocity.y -= GRAVITY * DT;
        pos.0 += grenade.velocity * DT;
        if pos.0.y <= 0.0 {
            pos.0.y = 0.0;
            grenade.velocity = Vec3::ZERO;
        }
    }

    // Fuses.
    let exploding: Vec<(Entity, Vec3, Grenade)> = world
        .query::<(&Position, &Grenade)>()
        .iter()
        .filter(|(_, (_, grenade))| time.tick >= grenade.detonation_tick)
        .map(|(entity, (pos, grenade))| (entity, pos.0, *grenade))
        .collect();

    for (entity, center, grenade) in exploding {
        let _ = world.despawn(entity);
        events.push(CombatEvent::GrenadeExploded {
            position: center,
            radius: grenade.radius,
        });

        let mut victims: Vec<(Entity, f32)> = Vec::new();
        for (body, (pos, health)) in world.query::<(&Position, &Health)>().iter() {
            if body == grenade.thrower || health.is_dead() {
                continue;
            }
            let dist = (pos.0 + Vec3::Y * BODY_CENTER_HEIGHT - center).length();
            if dist <= grenade.radius {
                victims.push((body, grenade.damage * (1.0 - dist / grenade.radius)));
            }
        }
        for (victim, amount) in victims {
            damage::apply(world, victim, amount, time, config, rng, events);
        }
    }
}
