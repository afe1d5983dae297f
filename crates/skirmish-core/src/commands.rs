//! Commands sent from the embedding application to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// All external actions the simulation accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Simulation control ---
    /// Pause the simulation (agents stop updating; time holds).
    Pause,
    /// Resume a paused simulation.
    Resume,

    // --- World population ---
    /// Spawn a combat agent at a position.
    SpawnAgent { position: Vec3 },
    /// Spawn a destructible scenery prop.
    SpawnProp { position: Vec3, health: f32 },

    // --- Target puppeteering ---
    /// Move the target proxy; its facing follows the movement.
    MoveTarget { position: Vec3 },

    // --- External damage entry points ---
    /// Apply damage to an agent (e.g. the target shot it).
    DamageAgent { agent_id: u32, amount: f32 },
    /// Apply damage to the target proxy.
    DamageTarget { amount: f32 },
}
