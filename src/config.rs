//! Simulation tunables
//!
//! Loaded from JSON; any missing field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`SimConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Capacity ===
    /// Side length of the square tile map
    pub map_size: i32,
    /// Maximum live entities
    pub entity_capacity: usize,
    /// Maximum live particles
    pub particle_capacity: usize,

    // === Physics ===
    /// Exponential velocity drag per second
    pub damping: f32,
    /// Acceleration along a steering direction
    pub steer_accel: f32,

    // === AI ===
    /// Reach beyond a worker's radius at which its order completes
    pub order_completion_radius: f32,
    /// Reach beyond both radii at which a guard kills its target
    pub kill_radius: f32,

    // === World generation ===
    pub initial_workers: u32,
    pub initial_guards: u32,
    /// Random cells tried for pest spawns (walls are skipped)
    pub pest_attempts: u32,
    /// Half-extent of the square around the map center where colonists spawn
    pub spawn_spread: f32,

    // === Camera ===
    pub camera_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0xdead_beef,

            map_size: MAP_SIZE,
            entity_capacity: ENTITY_MAX,
            particle_capacity: PARTICLE_MAX,

            damping: DAMPING,
            steer_accel: STEER_ACCEL,

            order_completion_radius: ORDER_COMPLETION_RADIUS,
            kill_radius: KILL_RADIUS,

            initial_workers: 3,
            initial_guards: 2,
            pest_attempts: 1024,
            spawn_spread: 3.0,

            camera_speed: CAMERA_SPEED,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject sizes the map cannot hold and negative or NaN tunables
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_MAP_SIZE).contains(&self.map_size) {
            return Err(ConfigError::Invalid(format!(
                "map_size must be in 1..={}, got {}",
                MAX_MAP_SIZE, self.map_size
            )));
        }
        if self.entity_capacity == 0 || self.particle_capacity == 0 {
            return Err(ConfigError::Invalid(
                "entity and particle capacities must be non-zero".to_string(),
            ));
        }
        let tunables = [
            ("damping", self.damping),
            ("steer_accel", self.steer_accel),
            ("order_completion_radius", self.order_completion_radius),
            ("kill_radius", self.kill_radius),
            ("spawn_spread", self.spawn_spread),
            ("camera_speed", self.camera_speed),
        ];
        for (name, value) in tunables {
            // NaN fails every comparison
            if !(value >= 0.0) || value.is_infinite() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
