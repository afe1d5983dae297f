//! Events emitted by the simulation for effects, audio, and debugging.
//!
//! These are fire-and-forget: consumers may drop them freely and
//! combat logic never depends on their delivery.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AiState, AttackPattern, ShotKind};

/// One tick's worth of observable combat activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A shot was fired (muzzle flash + fire sound trigger).
    ShotFired {
        agent_id: u32,
        origin: Vec3,
        direction: Vec3,
        kind: ShotKind,
        pattern: AttackPattern,
    },
    /// A projectile hit something.
    ProjectileImpact { position: Vec3 },
    /// A grenade left an agent's hand.
    GrenadeThrown { agent_id: u32, origin: Vec3 },
    /// A grenade detonated (explosion effect + sound + physics impulse).
    GrenadeExploded { position: Vec3, radius: f32 },
    /// An agent changed behavioral state.
    StateChanged {
        agent_id: u32,
        from: AiState,
        to: AiState,
    },
    /// An agent spotted the target (by sight or by being hit).
    TargetSpotted { agent_id: u32 },
    /// An agent died; the dropped weapon gets this impulse.
    AgentDied { agent_id: u32, weapon_impulse: Vec3 },
    /// The target proxy ran out of health.
    TargetDown,
}
