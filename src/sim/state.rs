//! Game state and world generation
//!
//! The map and the entity table are the only state that survives between
//! ticks. Entities are addressed by id; array slots move whenever an entity
//! is removed, so never hold an index across a removal.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::Serialize;

use super::entity::{Entity, EntityKind};
use super::map::{Map, OrderKind, TileCoord, TileKind};
use super::particle::{self, Particle, ParticleDesc};
use super::pool::Pool;
use crate::config::SimConfig;

/// Id sentinel meaning "no entity"
pub const NO_ENTITY: u32 = 0;

/// View position for the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub pos: Vec3,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub map: Map,
    pub camera: Camera,
    /// Order issued by the player's left mouse button
    pub order_tool: OrderKind,
    /// Simulation tick counter
    pub time_ticks: u64,
    entities: Pool<Entity>,
    #[serde(skip)]
    particles: Pool<Particle>,
    /// Last id handed out; ids are never reused
    next_id: u32,
}

impl GameState {
    /// Empty state over a `map_size`×`map_size` map of rock
    pub fn new(map_size: i32, entity_capacity: usize, particle_capacity: usize) -> Self {
        let center = map_size as f32 * 0.5;
        Self {
            map: Map::new(map_size, TileKind::Rock),
            camera: Camera {
                pos: Vec3::new(center, center, 8.0),
            },
            order_tool: OrderKind::DestroyTile,
            time_ticks: 0,
            entities: Pool::with_capacity(entity_capacity),
            particles: Pool::with_capacity(particle_capacity),
            next_id: NO_ENTITY,
        }
    }

    /// Empty state sized by `config`
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.map_size,
            config.entity_capacity,
            config.particle_capacity,
        )
    }

    /// Generate a fresh world: rock with scattered copper and dirt, a dirt
    /// clearing in the middle, colonists near the center and pests scattered
    /// over open ground.
    pub fn generate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let mut state = Self::from_config(config);
        let size = state.map.size();
        let center = Vec2::splat(size as f32 * 0.5);

        for y in 0..size {
            for x in 0..size {
                let in_clearing =
                    TileCoord::new(x, y).center().distance_squared(center) < 3.0 * 3.0;
                let mut kind = TileKind::Rock;
                if rng.random_range(0..100) < 10 || in_clearing {
                    kind = TileKind::Copper;
                }
                if rng.random_range(0..100) < 15 || in_clearing {
                    kind = TileKind::Dirt;
                }
                state.map.set_kind(x, y, kind);
            }
        }

        let spread = config.spawn_spread;
        let colonists = std::iter::repeat_n(EntityKind::Worker, config.initial_workers as usize)
            .chain(std::iter::repeat_n(EntityKind::Guard, config.initial_guards as usize));
        for kind in colonists {
            let pos = center + Vec2::new(jitter(rng, spread), jitter(rng, spread));
            state.spawn_entity(kind, pos, Vec2::ZERO);
        }

        // random_range panics on an empty map
        let attempts = if size > 0 { config.pest_attempts } else { 0 };
        let mut pests = 0;
        for _ in 0..attempts {
            let cell = TileCoord::new(rng.random_range(0..size), rng.random_range(0..size));
            if state.map.is_traversable(cell.x, cell.y)
                && state
                    .spawn_entity(EntityKind::Pest, cell.center(), Vec2::ZERO)
                    .is_some()
            {
                pests += 1;
            }
        }

        log::info!(
            "Generated {}x{} world: {} entities ({} pests)",
            size,
            size,
            state.entities.len(),
            pests
        );
        state
    }

    /// Append a new entity. Returns its id, or `None` once the table is full.
    pub fn spawn_entity(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2) -> Option<u32> {
        if self.entities.is_full() {
            log::trace!("entity table full, {:?} not spawned", kind);
            return None;
        }
        let id = self.next_id + 1;
        let entity = Entity::new(id, kind, pos, vel);
        match self.entities.push(entity) {
            Ok(_) => {
                self.next_id = id;
                Some(id)
            }
            Err(_) => None,
        }
    }

    /// Live entities in array order
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        self.entities.as_slice()
    }

    #[inline]
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        self.entities.as_mut_slice()
    }

    #[inline]
    pub fn entity_capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Current slot of entity `id` (linear scan)
    pub fn entity_index(&self, id: u32) -> Option<usize> {
        if id == NO_ENTITY {
            return None;
        }
        self.entities.iter().position(|e| e.id == id)
    }

    /// Look up an entity by id (linear scan)
    pub fn find_entity(&self, id: u32) -> Option<&Entity> {
        self.entity_index(id).and_then(|i| self.entities.get(i))
    }

    pub fn find_entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        let index = self.entity_index(id)?;
        self.entities.get_mut(index)
    }

    #[inline]
    pub fn map(&self) -> &Map {
        &self.map
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Live particles for rendering
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut Pool<Particle> {
        &mut self.particles
    }

    /// Swap-remove every entity with `life <= 0`, leaving a splatter behind.
    /// Array order changes; the entity moved into a freed slot is checked too.
    pub fn remove_dead<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.entities.len() {
            let Some(&entity) = self.entities.get(i) else {
                break;
            };
            if entity.is_alive() {
                i += 1;
                continue;
            }
            let at = entity.pos.extend(0.0);
            particle::emit(
                &mut self.particles,
                &ParticleDesc::splatter(at, entity.info().color),
                rng,
            );
            log::debug!("{:?} {} died", entity.kind, entity.id);
            self.entities.swap_remove(i);
            removed += 1;
        }
        removed
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..amount)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut state = GameState::new(8, 8, 8);
        let a = state.spawn_entity(EntityKind::Worker, Vec2::ONE, Vec2::ZERO).unwrap();
        let b = state.spawn_entity(EntityKind::Guard, Vec2::ONE, Vec2::ZERO).unwrap();
        assert_ne!(a, NO_ENTITY);
        assert!(b > a);
    }

    #[test]
    fn test_spawn_past_capacity_fails() {
        let capacity = crate::consts::ENTITY_MAX;
        let mut state = GameState::new(8, capacity, 8);
        for _ in 0..capacity {
            assert!(state.spawn_entity(EntityKind::Pest, Vec2::ONE, Vec2::ZERO).is_some());
        }
        assert!(state.spawn_entity(EntityKind::Pest, Vec2::ONE, Vec2::ZERO).is_none());
        assert_eq!(state.entities().len(), capacity);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = GameState::new(8, 2, 64);
        let a = state.spawn_entity(EntityKind::Worker, Vec2::ONE, Vec2::ZERO).unwrap();
        state.find_entity_mut(a).unwrap().life = 0.0;
        state.remove_dead(&mut rng);
        let b = state.spawn_entity(EntityKind::Worker, Vec2::ONE, Vec2::ZERO).unwrap();
        assert!(b > a);
        assert!(state.find_entity(a).is_none());
    }

    #[test]
    fn test_remove_dead_reorders_array() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = GameState::new(8, 8, 256);
        let ids: Vec<u32> = (0..4)
            .map(|i| {
                state
                    .spawn_entity(EntityKind::Pest, Vec2::splat(i as f32), Vec2::ZERO)
                    .unwrap()
            })
            .collect();

        // kill slot 1 and the last slot: the last must not be swapped back in alive
        state.find_entity_mut(ids[1]).unwrap().life = 0.0;
        state.find_entity_mut(ids[3]).unwrap().life = -1.0;
        assert_eq!(state.remove_dead(&mut rng), 2);

        let remaining: Vec<u32> = state.entities().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
        assert_eq!(state.entity_index(ids[2]), Some(1));
        assert!(!state.particles().is_empty());
    }

    #[test]
    fn test_find_entity_sentinel() {
        let mut state = GameState::new(4, 4, 4);
        state.spawn_entity(EntityKind::Worker, Vec2::ONE, Vec2::ZERO);
        assert!(state.find_entity(NO_ENTITY).is_none());
        assert!(state.find_entity(999).is_none());
    }

    #[test]
    fn test_generate_world() {
        let config = SimConfig {
            map_size: 32,
            pest_attempts: 50,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let state = GameState::generate(&config, &mut rng);

        // clearing around the center is open
        assert!(state.map.is_traversable(16, 16));
        let colonists = state
            .entities()
            .iter()
            .filter(|e| e.kind != EntityKind::Pest)
            .count();
        assert_eq!(colonists, 5);
        for pest in state.entities().iter().filter(|e| e.kind == EntityKind::Pest) {
            let cell = pest.tile();
            assert!(state.map.is_traversable(cell.x, cell.y));
        }
    }

    #[test]
    fn test_generate_empty_map() {
        let config = SimConfig {
            map_size: 0,
            ..Default::default()
        };
        let state = GameState::generate(&config, &mut Pcg32::seed_from_u64(1));
        assert!(state.map.tiles().is_empty());
        assert!(state.entities().iter().all(|e| e.kind != EntityKind::Pest));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = SimConfig {
            map_size: 24,
            ..Default::default()
        };
        let a = GameState::generate(&config, &mut Pcg32::seed_from_u64(9));
        let b = GameState::generate(&config, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a.map.tiles(), b.map.tiles());
        assert_eq!(a.entities(), b.entities());
    }
}
