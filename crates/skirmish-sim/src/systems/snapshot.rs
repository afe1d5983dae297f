//! Snapshot assembly: the per-tick view handed to the embedding
//! application.

use hecs::World;

use skirmish_core::components::{
    AgentId, Armor, Brain, CombatTimers, Facing, Grenade, Health, Perception, Position, Projectile,
    TargetProxy,
};
use skirmish_core::constants::DT;
use skirmish_core::enums::SimPhase;
use skirmish_core::events::CombatEvent;
use skirmish_core::state::{AgentView, GrenadeView, ProjectileView, TargetView, WorldSnapshot};
use skirmish_core::types::SimTime;

pub fn build(
    world: &World,
    time: SimTime,
    phase: SimPhase,
    events: Vec<CombatEvent>,
) -> WorldSnapshot {
    let mut agents: Vec<AgentView> = world
        .query::<(
            &AgentId,
            &Position,
            &Facing,
            &Health,
            &Brain,
            &Perception,
            &CombatTimers,
        )>()
        .iter()
        .map(|(_, (id, pos, facing, health, brain, perception, timers))| AgentView {
            agent_id: id.0,
            position: pos.0,
            facing: facing.0,
            health: health.current,
            state: brain.state,
            pattern: timers.pattern,
            target_visible: perception.target_visible,
            cover_target: brain.cover_target,
            is_repositioning: brain.is_repositioning,
            dead: health.is_dead(),
        })
        .collect();
    agents.sort_by_key(|view| view.agent_id);

    let target = world
        .query::<(&TargetProxy, &Position, &Health, &Armor)>()
        .iter()
        .next()
        .map(|(_, (_, pos, health, armor))| TargetView {
            position: pos.0,
            health: health.current,
            armor: armor.current,
        });

    let projectiles = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(_, (pos, projectile))| ProjectileView {
            position: pos.0,
            velocity: projectile.velocity,
        })
        .collect();

    let grenades = world
        .query::<(&Position, &Grenade)>()
        .iter()
        .map(|(_, (pos, grenade))| GrenadeView {
            position: pos.0,
            fuse_remaining_secs: grenade.detonation_tick.saturating_sub(time.tick) as f32 * DT,
        })
        .collect();

    WorldSnapshot {
        time,
        phase,
        agents,
        target,
        projectiles,
        grenades,
        events,
    }
}
