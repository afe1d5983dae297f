//! Per-tick simulation systems.
//!
//! Systems are free functions over the hecs world, run in a fixed order
//! each tick by the engine. Perception and decision run on the slower
//! decision cadence; everything else runs every tick. Systems that both
//! iterate and mutate the world collect into buffers first and apply
//! after the query borrow ends.

pub mod behavior;
pub mod cleanup;
pub mod combat;
pub mod cover;
pub mod damage;
pub mod decision;
pub mod grenade_fuse;
pub mod movement;
pub mod perception;
pub mod projectile;
pub mod sequences;
pub mod snapshot;

use glam::Vec3;
use hecs::{Entity, World};

use skirmish_core::components::{Position, TargetProxy};

/// The target proxy's entity and position, if one has been spawned.
pub(crate) fn find_target(world: &World) -> Option<(Entity, Vec3)> {
    world
        .query::<(&TargetProxy, &Position)>()
        .iter()
        .next()
        .map(|(entity, (_, pos))| (entity, pos.0))
}

/// The target proxy's position, if one has been spawned.
pub(crate) fn target_position(world: &World) -> Option<Vec3> {
    find_target(world).map(|(_, pos)| pos)
}
