//! Target visibility checks. Runs on the decision cadence.
//!
//! An agent sees the target when it is within sight range, inside the
//! field-of-view cone around the facing, and an eye-to-center ray is
//! not interrupted before reaching the target body. Cover-tagged
//! obstacles are transparent to this ray: crouching behind a crate
//! hides an agent's body from bullets, not the target from its eyes.

use glam::Vec3;
use hecs::World;

use skirmish_core::components::{Agent, Facing, Health, Perception, Position};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::{BODY_CENTER_HEIGHT, BODY_RADIUS, EYE_HEIGHT};
use skirmish_core::types::angle_between;

use crate::arena::{ray_sphere_hit, Arena};
use crate::systems::target_position;

pub fn run(world: &mut World, arena: &Arena, config: &AgentConfig) {
    let target_pos = target_position(world);

    for (_entity, (_, pos, facing, health, perception)) in world
        .query_mut::<(&Agent, &Position, &Facing, &Health, &mut Perception)>()
    {
        if health.is_dead() {
            continue;
        }
        perception.target_visible = false;

        let Some(target_pos) = target_pos else {
            continue;
        };

        let to_target = target_pos - pos.0;
        let distance = to_target.length();
        if distance > config.sight_range {
            continue;
        }
        if angle_between(facing.0, to_target) > config.field_of_view_deg.to_radians() / 2.0 {
            continue;
        }

        let eye = pos.0 + Vec3::Y * EYE_HEIGHT;
        let body_center = target_pos + Vec3::Y * BODY_CENTER_HEIGHT;
        let ray = body_center - eye;
        let ray_len = ray.length();
        if ray_len <= f32::EPSILON {
            continue;
        }
        let dir = ray / ray_len;

        let Some(body_hit) = ray_sphere_hit(eye, dir, body_center, BODY_RADIUS) else {
            continue;
        };
        let occluded = arena
            .ray_obstacle_hit(eye, dir, config.sight_range, true)
            .map_or(false, |t| t < body_hit);
        if occluded {
            continue;
        }

        perception.target_visible = true;
        perception.last_known_target_pos = Some(target_pos);
    }
}
