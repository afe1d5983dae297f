//! Agent configuration, validated at engine construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error raised when an [`AgentConfig`] is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },
    #[error("field of view must lie in (0, 360] degrees, got {0}")]
    InvalidFieldOfView(f32),
}

/// Tuning parameters for a combat agent. One config is shared by all
/// agents spawned by an engine; per-agent variation goes through
/// dedicated spawn arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum (and starting) health.
    pub max_health: f32,
    /// Maximum distance at which the target can be seen (meters).
    pub sight_range: f32,
    /// Distance within which the agent will stand and fight (meters).
    pub attack_range: f32,
    /// Field of view (degrees, full cone).
    pub field_of_view_deg: f32,
    /// Base seconds between shots.
    pub fire_rate: f32,
    /// Damage per bullet.
    pub bullet_damage: f32,
    /// Bullet speed (m/s).
    pub bullet_speed: f32,
    /// Grenade throw force (m/s).
    pub grenade_throw_force: f32,
    /// Seconds between grenade throws.
    pub grenade_cooldown: f32,
    /// Grenade explosion radius (meters).
    pub grenade_radius: f32,
    /// How eagerly the agent closes in and forgoes cover, in [0, 1].
    pub aggressiveness: f32,
    /// Base shot accuracy, in [0, 1].
    pub accuracy: f32,
    /// Radius searched for cover obstacles (meters).
    pub cover_search_radius: f32,
    /// Movement speed (m/s).
    pub move_speed: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            sight_range: 20.0,
            attack_range: 15.0,
            field_of_view_deg: 90.0,
            fire_rate: 0.2,
            bullet_damage: 10.0,
            bullet_speed: 40.0,
            grenade_throw_force: 15.0,
            grenade_cooldown: 10.0,
            grenade_radius: 5.0,
            aggressiveness: 0.7,
            accuracy: 0.85,
            cover_search_radius: 10.0,
            move_speed: 3.5,
        }
    }
}

impl AgentConfig {
    /// Reject zero/negative ranges and out-of-range ratios. Called once
    /// at engine construction; the tick loop assumes a valid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_health", self.max_health),
            ("sight_range", self.sight_range),
            ("attack_range", self.attack_range),
            ("fire_rate", self.fire_rate),
            ("bullet_damage", self.bullet_damage),
            ("bullet_speed", self.bullet_speed),
            ("grenade_throw_force", self.grenade_throw_force),
            ("grenade_cooldown", self.grenade_cooldown),
            ("grenade_radius", self.grenade_radius),
            ("cover_search_radius", self.cover_search_radius),
            ("move_speed", self.move_speed),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let unit = [
            ("aggressiveness", self.aggressiveness),
            ("accuracy", self.accuracy),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }

        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg <= 360.0) {
            return Err(ConfigError::InvalidFieldOfView(self.field_of_view_deg));
        }

        Ok(())
    }
}
