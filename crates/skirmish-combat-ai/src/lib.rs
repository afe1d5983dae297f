//! Agent behavior decision logic.
//!
//! Pure functions that compute behavioral state choices and firing
//! actions from an agent's situation. No ECS dependency — operates on
//! plain data, with all probabilistic branches drawing from an injected
//! random source so tests can force either outcome.

pub mod fsm;
pub mod patterns;
pub mod profiles;
