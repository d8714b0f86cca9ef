//! Colony Sim - a grid colony simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map, entities, AI, pathfinding, collisions)
//! - `config`: Data-driven tunables loaded from JSON
//!
//! Windowing, input polling and rendering live outside this crate; they feed a
//! [`sim::TickInput`] in and read the entity/tile/particle tables back out.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Default side length of the square tile map
    pub const MAP_SIZE: i32 = 256;
    /// Largest map side accepted from configuration
    pub const MAX_MAP_SIZE: i32 = MAP_SIZE * 16;
    /// Fixed entity table capacity
    pub const ENTITY_MAX: usize = 2 * 1024;
    /// Fixed particle table capacity
    pub const PARTICLE_MAX: usize = 8 * 1024;

    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Velocity drag coefficient (exponential, per second)
    pub const DAMPING: f32 = 4.0;
    /// Acceleration applied along a steering direction
    pub const STEER_ACCEL: f32 = 6.0;
    /// Extra reach beyond a worker's radius for completing an order
    pub const ORDER_COMPLETION_RADIUS: f32 = 0.6;
    /// Extra reach beyond both radii for a guard kill
    pub const KILL_RADIUS: f32 = 0.05;
    /// Camera pan/zoom speed (world units per second)
    pub const CAMERA_SPEED: f32 = 8.0;
}

/// Uniformly distributed unit vector
#[inline]
pub fn random_unit_vec2<R: rand::Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}
