//! Agents: kinds, static properties and AI state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::TileCoord;

/// Agent kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Worker,
    Guard,
    /// Hostile vermin hunted by guards
    Pest,
}

/// Static per-kind entity properties
#[derive(Debug, Clone, Copy)]
pub struct EntityInfo {
    pub radius: f32,
    pub color: u32,
    pub max_life: f32,
    /// Random acceleration applied while idle
    pub wander_accel: f32,
}

const WORKER_INFO: EntityInfo = EntityInfo {
    radius: 0.18,
    color: 0xff22_bb22,
    max_life: 1.0,
    wander_accel: 4.0,
};

const GUARD_INFO: EntityInfo = EntityInfo {
    radius: 0.2,
    color: 0xffbb_4422,
    max_life: 2.0,
    wander_accel: 6.0,
};

const PEST_INFO: EntityInfo = EntityInfo {
    radius: 0.15,
    color: 0xff99_7711,
    max_life: 0.5,
    wander_accel: 2.0,
};

impl EntityKind {
    pub fn info(self) -> &'static EntityInfo {
        match self {
            EntityKind::Worker => &WORKER_INFO,
            EntityKind::Guard => &GUARD_INFO,
            EntityKind::Pest => &PEST_INFO,
        }
    }

    /// Guards hunt entities for which this is true
    #[inline]
    pub fn is_hostile(self) -> bool {
        self == EntityKind::Pest
    }
}

/// AI state. Each busy state carries exactly the target it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    /// Worker walking to / working on an order tile
    ExecuteOrder { tile: TileCoord },
    /// Guard chasing a hostile entity by id
    Pursuing { target: u32 },
}

/// What an entity is currently heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    None,
    Tile(TileCoord),
    Entity(u32),
}

impl AiState {
    pub fn target(self) -> Target {
        match self {
            AiState::Idle => Target::None,
            AiState::ExecuteOrder { tile } => Target::Tile(tile),
            AiState::Pursuing { target } => Target::Entity(target),
        }
    }
}

/// A live agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// At or below zero the entity is removed at the end of the tick
    pub life: f32,
    pub ai: AiState,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            life: kind.info().max_life,
            ai: AiState::Idle,
        }
    }

    #[inline]
    pub fn info(&self) -> &'static EntityInfo {
        self.kind.info()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.info().radius
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.ai.target()
    }

    #[inline]
    pub fn tile(&self) -> TileCoord {
        TileCoord::from_world(self.pos)
    }
}
