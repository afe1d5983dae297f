//! Simulation engine for SKIRMISH.
//!
//! Owns the hecs ECS world, runs the perception/decision/action systems
//! at a fixed tick rate, and produces WorldSnapshots for the embedding
//! application.

pub mod arena;
pub mod engine;
pub mod systems;
pub mod world_setup;

pub use arena::{Arena, Obstacle};
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
