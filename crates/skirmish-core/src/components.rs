//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior beyond small
//! accessors. Game logic lives in systems, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AiState, AttackPattern};

/// Stable external identifier assigned to each agent at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// World position (meters, y-up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Horizontal facing direction (unit vector, y = 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facing(pub Vec3);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec3::Z)
    }
}

/// Hit points. Clamped at zero on death; never negative thereafter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Target-awareness state owned by the perception system.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Perception {
    /// Whether the target passed the visibility check this cadence.
    pub target_visible: bool,
    /// Where the target was last seen (or heard from, via damage).
    /// Set only while or after the target was visible; cleared when an
    /// investigation completes without reacquiring.
    pub last_known_target_pos: Option<Vec3>,
}

/// Firing and pattern timing state owned by the attack pattern executor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CombatTimers {
    /// Earliest time the next shot may fire (seconds).
    pub next_fire_time: f32,
    /// Earliest time the next grenade may be thrown (seconds).
    pub next_grenade_time: f32,
    /// Shots fired in the current burst cycle.
    pub burst_count: u32,
    /// Time the last burst cycle completed (seconds).
    pub last_burst_time: f32,
    /// Active firing pattern.
    pub pattern: AttackPattern,
    /// Time of the last random pattern switch (seconds).
    pub last_pattern_switch_time: f32,
}

/// Behavioral state owned by the decision system.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Brain {
    /// Current behavioral state. Exactly one at a time.
    pub state: AiState,
    /// Incremented on every state change. Timed sequences capture the
    /// generation at start and become no-ops once it moves on.
    pub generation: u64,
    /// Guards against overlapping movement sequences.
    pub is_repositioning: bool,
    /// Cover destination set by the cover locator; cleared on state exit.
    pub cover_target: Option<Vec3>,
}

impl Brain {
    /// Switch state, bumping the generation and clearing state-scoped
    /// fields. No-op if the state is unchanged.
    pub fn transition(&mut self, next: AiState) -> bool {
        if self.state == next {
            return false;
        }
        self.state = next;
        self.generation += 1;
        if next != AiState::TakingCover {
            self.cover_target = None;
        }
        true
    }
}

/// Navigation handle: the narrow movement contract consumed by the
/// behavior systems. Pathing is a straight walk on the arena surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NavAgent {
    /// Active movement target, if any.
    pub destination: Option<Vec3>,
    /// Walk speed (m/s).
    pub speed: f32,
    /// Halted (destination retained but not pursued).
    pub stopped: bool,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            speed,
            stopped: false,
        }
    }

    pub fn path_active(&self) -> bool {
        self.destination.is_some()
    }

    /// Remaining straight-line distance to the destination, or zero
    /// when no path is active.
    pub fn remaining_distance(&self, from: Vec3) -> f32 {
        match self.destination {
            Some(dest) => crate::types::horizontal_distance(from, dest),
            None => 0.0,
        }
    }
}

/// Marks an entity as a combat agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Agent;

/// Marks the entity the agents perceive and fight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetProxy;

/// Armor pool on the target proxy. Absorbs a fixed share of incoming
/// damage while it lasts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Armor {
    pub current: f32,
}

/// Marks destructible scenery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Prop;

/// An in-flight bullet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub velocity: Vec3,
    pub damage: f32,
    /// The projectile never damages its own shooter.
    #[serde(skip, default = "dangling_entity")]
    pub shooter: hecs::Entity,
    /// Tick at which the projectile was spawned (for lifetime expiry).
    pub spawn_tick: u64,
}

/// An armed grenade in flight or at rest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Grenade {
    pub velocity: Vec3,
    pub damage: f32,
    pub radius: f32,
    /// Tick at which the fuse runs out.
    pub detonation_tick: u64,
    /// The thrower is excluded from explosion damage.
    #[serde(skip, default = "dangling_entity")]
    pub thrower: hecs::Entity,
}

fn dangling_entity() -> hecs::Entity {
    hecs::Entity::DANGLING
}

/// A dead agent awaiting removal (death effects play out meanwhile).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Corpse {
    /// Tick at which the entity is despawned.
    pub despawn_tick: u64,
}
