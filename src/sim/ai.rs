//! Entity AI: order assignment for workers, pest hunting for guards
//!
//! Workers look for orders by flooding outward from their own tile, so the
//! "nearest" order is the first one discovered in BFS order (grid distance).
//! Contested orders are then settled by straight-line distance to the tile
//! center. The two notions of distance are intentionally kept separate.

use glam::Vec2;
use rand::Rng;

use super::entity::{AiState, Entity, EntityKind, Target};
use super::map::TileCoord;
use super::particle::{self, ParticleDesc};
use super::path::{Flow, Pathfinder};
use super::state::{GameState, NO_ENTITY};
use crate::config::SimConfig;
use crate::random_unit_vec2;

/// How a worker may take over an order tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    /// Unassigned, or the assignee is gone
    Free,
    /// Held by a live worker that is farther away
    Steal { from: u32 },
}

/// Run one AI tick for every live entity, in array order.
///
/// Decisions read the state left by the previous tick's physics and
/// collision passes. Each entity leaves with its velocity nudged toward its
/// target, or randomly when idle.
pub fn update<R: Rng + ?Sized>(
    state: &mut GameState,
    pathfinder: &mut Pathfinder,
    config: &SimConfig,
    rng: &mut R,
    dt: f32,
) {
    for i in 0..state.entities().len() {
        let Some(&entity) = state.entities().get(i) else {
            break;
        };
        if !entity.is_alive() {
            continue;
        }

        let mut entity = match entity.kind {
            EntityKind::Worker => update_worker(state, pathfinder, config, rng, entity),
            EntityKind::Guard => update_guard(state, pathfinder, config, entity),
            EntityKind::Pest => entity,
        };

        let accel = match entity.target() {
            Target::None => entity.info().wander_accel * random_unit_vec2(rng),
            Target::Tile(tile) => {
                config.steer_accel * pathfinder.direction_towards(&state.map, entity.pos, tile)
            }
            Target::Entity(id) => match state.find_entity(id) {
                Some(target) => {
                    config.steer_accel * chase_direction(state, pathfinder, &entity, target)
                }
                None => Vec2::ZERO,
            },
        };
        entity.vel += accel * dt;

        if let Some(slot) = state.entities_mut().get_mut(i) {
            *slot = entity;
        }
    }
}

fn update_worker<R: Rng + ?Sized>(
    state: &mut GameState,
    pathfinder: &mut Pathfinder,
    config: &SimConfig,
    rng: &mut R,
    mut worker: Entity,
) -> Entity {
    match worker.ai {
        AiState::Idle => find_work(state, pathfinder, &mut worker),
        AiState::ExecuteOrder { tile } => execute_order(state, config, rng, &mut worker, tile),
        AiState::Pursuing { .. } => worker.ai = AiState::Idle,
    }
    worker
}

/// Whether `holder` is actively working on `tile`
fn holds(holder: &Entity, tile: TileCoord) -> bool {
    holder.is_alive() && holder.ai == AiState::ExecuteOrder { tile }
}

/// Flood outward from the worker and take the first order it can claim
fn find_work(state: &mut GameState, pathfinder: &mut Pathfinder, worker: &mut Entity) {
    let map = &state.map;
    let entities = state.entities();
    let me = *worker;
    let mut claim = None;

    pathfinder.flood(map, me.tile(), |_, next| {
        let Some(tile) = map.tile_at(next) else {
            return Flow::Continue;
        };
        if tile.order.is_none() {
            return Flow::Continue;
        }

        let holder = (tile.assigned_worker_id != NO_ENTITY)
            .then(|| entities.iter().find(|e| e.id == tile.assigned_worker_id))
            .flatten()
            .filter(|e| e.id != me.id && holds(e, next));

        match holder {
            None => {
                claim = Some((next, Claim::Free));
                Flow::Stop
            }
            Some(holder) => {
                let center = next.center();
                if me.pos.distance(center) < holder.pos.distance(center) {
                    claim = Some((next, Claim::Steal { from: holder.id }));
                    Flow::Stop
                } else {
                    Flow::Continue
                }
            }
        }
    });

    let Some((coord, claim)) = claim else {
        return;
    };

    if let Claim::Steal { from } = claim {
        if let Some(previous) = state.find_entity_mut(from) {
            previous.ai = AiState::Idle;
        }
        log::debug!(
            "worker {} took order at ({}, {}) from worker {}",
            worker.id,
            coord.x,
            coord.y,
            from
        );
    } else {
        log::debug!("worker {} claimed order at ({}, {})", worker.id, coord.x, coord.y);
    }

    if let Some(tile) = state.map.tile_mut(coord.x, coord.y) {
        tile.assigned_worker_id = worker.id;
        worker.ai = AiState::ExecuteOrder { tile: coord };
    }
}

/// Finish the order once in reach; give it up if it was cancelled or taken
fn execute_order<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &SimConfig,
    rng: &mut R,
    worker: &mut Entity,
    coord: TileCoord,
) {
    let Some(tile) = state.map.tile_at(coord) else {
        worker.ai = AiState::Idle;
        return;
    };

    if tile.order.is_none() || tile.assigned_worker_id != worker.id {
        if tile.assigned_worker_id == worker.id {
            state.map.clear_order(coord.x, coord.y);
        }
        log::debug!("worker {} dropped order at ({}, {})", worker.id, coord.x, coord.y);
        worker.ai = AiState::Idle;
        return;
    }

    let reach = config.order_completion_radius + worker.radius();
    if worker.pos.distance(coord.center()) > reach {
        return;
    }

    if let Some(order) = state.map.apply_order(coord.x, coord.y) {
        let color = state
            .map
            .tile_at(coord)
            .map_or(tile.info().color, |t| t.info().color);
        particle::emit(
            state.particles_mut(),
            &ParticleDesc::dust(coord.center().extend(0.0), color),
            rng,
        );
        log::debug!(
            "worker {} completed {} at ({}, {})",
            worker.id,
            order.info().name,
            coord.x,
            coord.y
        );
    }
    worker.ai = AiState::Idle;
}

fn update_guard(
    state: &mut GameState,
    pathfinder: &mut Pathfinder,
    config: &SimConfig,
    mut guard: Entity,
) -> Entity {
    match guard.ai {
        AiState::Idle => {
            if let Some(target) = find_hostile(state, pathfinder, &guard) {
                log::debug!("guard {} hunting {}", guard.id, target);
                guard.ai = AiState::Pursuing { target };
            }
        }
        AiState::Pursuing { target } => {
            let Some(prey) = state.find_entity(target).filter(|e| e.is_alive()) else {
                guard.ai = AiState::Idle;
                return guard;
            };
            let reach = config.kill_radius + guard.radius() + prey.radius();
            if guard.pos.distance(prey.pos) < reach {
                if let Some(prey) = state.find_entity_mut(target) {
                    prey.life = 0.0;
                }
                log::debug!("guard {} killed {}", guard.id, target);
            }
        }
        AiState::ExecuteOrder { .. } => guard.ai = AiState::Idle,
    }
    guard
}

/// Closest live hostile connected to the guard through open tiles.
///
/// Straight-line closest, not first in array order, so a guard does not chase
/// a far pest past a near one.
fn find_hostile(state: &GameState, pathfinder: &mut Pathfinder, guard: &Entity) -> Option<u32> {
    let map = &state.map;
    let start = guard.tile();
    if !map.is_traversable(start.x, start.y) {
        return None;
    }
    pathfinder.flood_region(map, start);

    state
        .entities()
        .iter()
        .filter(|e| e.kind.is_hostile() && e.is_alive())
        .filter(|e| {
            let cell = e.tile();
            map.is_traversable(cell.x, cell.y) && pathfinder.is_visited(cell)
        })
        .min_by(|a, b| {
            a.pos
                .distance_squared(guard.pos)
                .partial_cmp(&b.pos.distance_squared(guard.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.id)
}

/// Steering for a chase: straight at the prey when sharing a tile, otherwise
/// along the flood-fill route to the prey's tile
fn chase_direction(
    state: &GameState,
    pathfinder: &mut Pathfinder,
    hunter: &Entity,
    prey: &Entity,
) -> Vec2 {
    let goal = prey.tile();
    if goal == hunter.tile() {
        (prey.pos - hunter.pos).normalize_or_zero()
    } else {
        pathfinder.direction_towards(&state.map, hunter.pos, goal)
    }
}
