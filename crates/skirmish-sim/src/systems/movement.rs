//! Straight-line navigation toward the active destination.

use hecs::World;

use skirmish_core::components::{Facing, NavAgent, Position};
use skirmish_core::constants::DT;
use skirmish_core::types::flatten;

pub fn run(world: &mut World) {
    for (_entity, (pos, facing, nav)) in
        world.query_mut::<(&mut Position, &mut Facing, &mut NavAgent)>()
    {
        if nav.stopped {
            continue;
        }
        let Some(dest) = nav.destination else {
            continue;
        };

        let delta = flatten(dest - pos.0);
        let dist = delta.length();
        let step = nav.speed * DT;
        if dist <= step {
            pos.0.x = dest.x;
            pos.0.z = dest.z;
            nav.destination = None;
        } else {
            let dir = delta / dist;
            pos.0 += dir * step;
            facing.0 = dir;
        }
    }
}
