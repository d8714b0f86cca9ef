//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, passed in explicitly
//! - Stable iteration order (entity array order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod entity;
pub mod map;
pub mod particle;
pub mod path;
pub mod physics;
pub mod pool;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionResult, circle_aabb, circle_circle};
pub use entity::{AiState, Entity, EntityKind, Target};
pub use map::{Map, OrderKind, Tile, TileCoord, TileKind};
pub use particle::{Particle, ParticleDesc};
pub use path::{Flow, Pathfinder};
pub use pool::{CapacityError, Pool};
pub use state::{Camera, GameState, NO_ENTITY};
pub use tick::{Simulation, TickInput, apply_input, tick};
