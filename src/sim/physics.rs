//! Euler integration and contact resolution
//!
//! There is no broad phase: every entity is tested against every other entity
//! each tick, O(n²). Each contact found is corrected on the spot rather than
//! accumulated into a solver, so crowded entities may receive several partial
//! corrections per tick and resting piles can jitter.

use glam::Vec2;

use super::collision::{Aabb, circle_aabb, circle_circle};
use super::entity::Entity;
use super::map::Map;
use super::state::GameState;

/// `pos += vel * dt`, then exponential drag on velocity
pub fn integrate(entities: &mut [Entity], damping: f32, dt: f32) {
    for e in entities {
        e.pos += e.vel * dt;
        e.vel -= e.vel * damping * dt;
    }
}

/// Push every entity out of the entities and blocking tiles it overlaps.
///
/// Entities are processed in array order. An entity's contact circle is taken
/// from where it stood when its turn began; entities earlier in the array have
/// already been moved by the time later ones test against them.
pub fn resolve_collisions(state: &mut GameState, dt: f32) {
    let count = state.entities().len();
    for i in 0..count {
        let Some(&a) = state.entities().get(i) else {
            break;
        };
        let circle = a.pos;
        let radius = a.radius();
        let mut pos = a.pos;
        let mut vel = a.vel;

        for (j, b) in state.entities().iter().enumerate() {
            if i == j {
                continue;
            }
            let m = circle_circle(circle, radius, b.pos, b.radius());
            if m.hit {
                pos -= m.normal * m.penetration;
                vel -= m.normal * m.penetration * dt;
            }
        }

        resolve_tiles(&state.map, circle, radius, &mut pos, &mut vel, dt);

        if let Some(slot) = state.entities_mut().get_mut(i) {
            slot.pos = pos;
            slot.vel = vel;
        }
    }
}

/// Contacts against every non-traversable cell (off-map included) under the
/// entity's bounding box
fn resolve_tiles(
    map: &Map,
    circle: Vec2,
    radius: f32,
    pos: &mut Vec2,
    vel: &mut Vec2,
    dt: f32,
) {
    let min_x = (pos.x - radius).floor() as i32;
    let min_y = (pos.y - radius).floor() as i32;
    let max_x = (pos.x + radius).floor() as i32;
    let max_y = (pos.y + radius).floor() as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if map.is_traversable(x, y) {
                continue;
            }
            let m = circle_aabb(circle, radius, &Aabb::tile(x, y));
            if m.hit {
                *pos -= m.normal * m.penetration;
                *vel -= m.normal * m.penetration * dt;
            }
        }
    }
}
