//! World snapshot — the complete visible state produced each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AiState, AttackPattern, SimPhase};
use crate::events::CombatEvent;
use crate::types::SimTime;

/// Complete simulation state handed to the embedding application after
/// each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub agents: Vec<AgentView>,
    pub target: Option<TargetView>,
    pub projectiles: Vec<ProjectileView>,
    pub grenades: Vec<GrenadeView>,
    pub events: Vec<CombatEvent>,
}

/// One agent as seen from outside the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub agent_id: u32,
    pub position: Vec3,
    pub facing: Vec3,
    pub health: f32,
    pub state: AiState,
    pub pattern: AttackPattern,
    pub target_visible: bool,
    pub cover_target: Option<Vec3>,
    pub is_repositioning: bool,
    pub dead: bool,
}

/// The target proxy's externally visible state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetView {
    pub position: Vec3,
    pub health: f32,
    pub armor: f32,
}

/// An in-flight bullet for tracer rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// An armed grenade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrenadeView {
    pub position: Vec3,
    /// Seconds until detonation.
    pub fuse_remaining_secs: f32,
}
