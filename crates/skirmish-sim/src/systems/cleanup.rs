//! End-of-tick sweeping: expired corpses, destroyed props, and
//! projectiles that outlived their lifetime or left the arena.

use glam::Vec3Swizzles;
use hecs::{Entity, World};

use skirmish_core::components::{Corpse, Health, Position, Projectile, Prop};
use skirmish_core::constants::PROJECTILE_LIFETIME_SECS;
use skirmish_core::types::secs_to_ticks;

use crate::arena::Arena;

pub fn run(world: &mut World, arena: &Arena, tick: u64, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, corpse) in world.query::<&Corpse>().iter() {
        if tick >= corpse.despawn_tick {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (_, health)) in world.query::<(&Prop, &Health)>().iter() {
        if health.is_dead() {
            despawn_buffer.push(entity);
        }
    }

    let lifetime = secs_to_ticks(PROJECTILE_LIFETIME_SECS);
    for (entity, (pos, projectile)) in world.query::<(&Position, &Projectile)>().iter() {
        if tick.saturating_sub(projectile.spawn_tick) >= lifetime
            || pos.0.xz().length() > arena.radius * 2.0
        {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
