//! The simulation engine: owns the world, the clock, and the seeded
//! random source, and drives the systems in a fixed order each tick.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::commands::SimCommand;
use skirmish_core::components::{AgentId, Facing, Position, TargetProxy};
use skirmish_core::config::{AgentConfig, ConfigError};
use skirmish_core::constants::{DECISION_INTERVAL_TICKS, TARGET_ARMOR, TARGET_HEALTH};
use skirmish_core::enums::SimPhase;
use skirmish_core::events::CombatEvent;
use skirmish_core::state::WorldSnapshot;
use skirmish_core::types::{flatten, SimTime};

use crate::arena::Arena;
use crate::systems::{self, damage, find_target, snapshot};
use crate::world_setup;

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Seed for the deterministic random source. Identical seeds and
    /// command streams produce identical runs.
    pub seed: u64,
    pub arena: Arena,
    pub agent: AgentConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: Arena::training_ground(),
            agent: AgentConfig::default(),
        }
    }
}

/// The headless combat simulation.
///
/// External input arrives as queued [`SimCommand`]s, processed at the
/// next tick boundary. Each [`tick`](Self::tick) returns a complete
/// [`WorldSnapshot`] including the tick's combat events.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: SimPhase,
    rng: ChaCha8Rng,
    arena: Arena,
    agent_config: AgentConfig,
    next_agent_id: u32,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<CombatEvent>,
}

// Manual impl because `hecs::World` does not implement `Debug`.
impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("time", &self.time)
            .field("phase", &self.phase)
            .field("arena", &self.arena)
            .field("agent_config", &self.agent_config)
            .field("next_agent_id", &self.next_agent_id)
            .field("command_queue", &self.command_queue)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl SimulationEngine {
    /// Build an engine with a validated config. The target proxy is
    /// spawned at the arena center; commands move it from there.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.agent.validate()?;
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SimPhase::Running,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            arena: config.arena,
            agent_config: config.agent,
            next_agent_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        };
        world_setup::spawn_target(&mut engine.world, Vec3::ZERO, TARGET_HEALTH, TARGET_ARMOR);
        Ok(engine)
    }

    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one tick. Commands are processed even while paused;
    /// systems and the clock only run while the simulation is live.
    pub fn tick(&mut self) -> WorldSnapshot {
        self.process_commands();
        if self.phase == SimPhase::Running {
            self.run_systems();
            self.time.advance();
        }
        let events = std::mem::take(&mut self.events);
        snapshot::build(&self.world, self.time, self.phase, events)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            match command {
                SimCommand::Pause => self.phase = SimPhase::Paused,
                SimCommand::Resume => self.phase = SimPhase::Running,
                SimCommand::SpawnAgent { position } => {
                    self.spawn_agent(position);
                }
                SimCommand::SpawnProp { position, health } => {
                    world_setup::spawn_prop(&mut self.world, position, health);
                }
                SimCommand::MoveTarget { position } => self.move_target(position),
                SimCommand::DamageAgent { agent_id, amount } => {
                    if let Some(entity) = self.agent_entity(agent_id) {
                        damage::apply(
                            &mut self.world,
                            entity,
                            amount,
                            self.time,
                            &self.agent_config,
                            &mut self.rng,
                            &mut self.events,
                        );
                    }
                }
                SimCommand::DamageTarget { amount } => {
                    if let Some((entity, _)) = find_target(&self.world) {
                        damage::apply(
                            &mut self.world,
                            entity,
                            amount,
                            self.time,
                            &self.agent_config,
                            &mut self.rng,
                            &mut self.events,
                        );
                    }
                }
            }
        }
    }

    fn run_systems(&mut self) {
        if self.time.tick % DECISION_INTERVAL_TICKS == 0 {
            systems::perception::run(&mut self.world, &self.arena, &self.agent_config);
            systems::decision::run(
                &mut self.world,
                &self.arena,
                &self.agent_config,
                &mut self.rng,
                self.time.now(),
                &mut self.events,
            );
        }
        systems::behavior::run(
            &mut self.world,
            &self.arena,
            &self.agent_config,
            &mut self.rng,
            self.time,
            &mut self.events,
        );
        systems::sequences::run(
            &mut self.world,
            &self.agent_config,
            &mut self.rng,
            self.time,
            &mut self.events,
        );
        systems::combat::throw_grenades(
            &mut self.world,
            &self.agent_config,
            &mut self.rng,
            self.time,
            &mut self.events,
        );
        systems::projectile::run(
            &mut self.world,
            &self.arena,
            &self.agent_config,
            &mut self.rng,
            self.time,
            &mut self.events,
        );
        systems::grenade_fuse::run(
            &mut self.world,
            &self.agent_config,
            &mut self.rng,
            self.time,
            &mut self.events,
        );
        systems::movement::run(&mut self.world);
        systems::cleanup::run(
            &mut self.world,
            &self.arena,
            self.time.tick,
            &mut self.despawn_buffer,
        );
    }

    /// Spawn a combat agent, assigning the next stable agent id.
    pub fn spawn_agent(&mut self, position: Vec3) -> Entity {
        let agent_id = self.next_agent_id;
        self.next_agent_id += 1;
        world_setup::spawn_agent(
            &mut self.world,
            &mut self.rng,
            &self.agent_config,
            agent_id,
            position,
            self.time.now(),
        )
    }

    fn move_target(&mut self, position: Vec3) {
        for (_entity, (_, pos, facing)) in
            self.world
                .query_mut::<(&TargetProxy, &mut Position, &mut Facing)>()
        {
            let delta = flatten(position - pos.0);
            if delta.length() > f32::EPSILON {
                facing.0 = delta.normalize();
            }
            pos.0 = position;
        }
    }

    /// Look up an agent entity by its stable id.
    pub fn agent_entity(&self, agent_id: u32) -> Option<Entity> {
        self.world
            .query::<&AgentId>()
            .iter()
            .find(|(_, id)| id.0 == agent_id)
            .map(|(entity, _)| entity)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }
}
