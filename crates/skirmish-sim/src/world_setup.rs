//! Entity spawn factories.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{
    Agent, AgentId, Armor, Brain, CombatTimers, Facing, Health, NavAgent, Perception, Position,
    Prop, TargetProxy,
};
use skirmish_core::config::AgentConfig;
use skirmish_core::constants::GRENADE_FIRST_THROW_MIN_SECS;

/// Spawn a combat agent with a full component set. The first grenade
/// throw is randomized so freshly spawned squads don't all throw at
/// once.
pub fn spawn_agent(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    config: &AgentConfig,
    agent_id: u32,
    position: Vec3,
    now: f32,
) -> Entity {
    let first_throw = if config.grenade_cooldown > GRENADE_FIRST_THROW_MIN_SECS {
        rng.gen_range(GRENADE_FIRST_THROW_MIN_SECS..config.grenade_cooldown)
    } else {
        config.grenade_cooldown
    };
    world.spawn((
        Agent,
        AgentId(agent_id),
        Position(position),
        Facing::default(),
        Health::full(config.max_health),
        Perception::default(),
        Brain::default(),
        CombatTimers {
            next_grenade_time: now + first_throw,
            last_pattern_switch_time: now,
            ..CombatTimers::default()
        },
        NavAgent::new(config.move_speed),
    ))
}

/// Spawn the target proxy the agents perceive and fight.
pub fn spawn_target(world: &mut World, position: Vec3, health: f32, armor: f32) -> Entity {
    world.spawn((
        TargetProxy,
        Position(position),
        Facing::default(),
        Health::full(health),
        Armor { current: armor },
    ))
}

/// Spawn a destructible scenery prop.
pub fn spawn_prop(world: &mut World, position: Vec3, health: f32) -> Entity {
    world.spawn((Prop, Position(position), Health::full(health)))
}
