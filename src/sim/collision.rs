//! Narrow-phase contact tests
//!
//! Circle/circle and circle/box manifolds. The normal always points from the
//! circle being resolved toward the other shape, so the circle is pushed out
//! with `pos -= normal * penetration`.

use glam::Vec2;

/// Result of a contact test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Contact point on the other shape (if hit)
    pub point: Vec2,
    /// Unit contact normal, from the circle toward the other shape
    pub normal: Vec2,
    /// Overlap depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Unit box covering tile (x, y)
    pub fn tile(x: i32, y: i32) -> Self {
        let min = Vec2::new(x as f32, y as f32);
        Self {
            min,
            max: min + Vec2::ONE,
        }
    }
}

/// Overlap between circle `a` and circle `b`
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let d = b_pos - a_pos;
    let radii = a_radius + b_radius;
    let dist_sq = d.length_squared();
    if dist_sq >= radii * radii {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // coincident centers: pick a fixed axis
    let normal = if dist != 0.0 { d / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        point: b_pos - normal * b_radius,
        normal,
        penetration: radii - dist,
    }
}

/// Overlap between a circle and a box
pub fn circle_aabb(pos: Vec2, radius: f32, aabb: &Aabb) -> CollisionResult {
    let closest = pos.clamp(aabb.min, aabb.max);
    let to_closest = closest - pos;
    let dist_sq = to_closest.length_squared();
    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq != 0.0 {
        let dist = dist_sq.sqrt();
        let normal = to_closest / dist;
        return CollisionResult {
            hit: true,
            point: closest,
            normal,
            penetration: radius - dist,
        };
    }

    // Center inside the box: push out along the axis of least overlap
    let mid = (aabb.min + aabb.max) * 0.5;
    let half = (aabb.max - aabb.min) * 0.5;
    let d = pos - mid;
    let overlap = half - d.abs();
    let (depth, normal) = if overlap.x < overlap.y {
        (overlap.x, Vec2::new(if d.x < 0.0 { 1.0 } else { -1.0 }, 0.0))
    } else {
        (overlap.y, Vec2::new(0.0, if d.y < 0.0 { 1.0 } else { -1.0 }))
    };
    CollisionResult {
        hit: true,
        point: pos - normal * depth,
        normal,
        penetration: radius + depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_overlap() {
        let result = circle_circle(Vec2::new(1.0, 1.0), 0.2, Vec2::new(1.1, 1.0), 0.2);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-5);
        assert!((result.penetration - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_circle_circle_touching_is_miss() {
        let result = circle_circle(Vec2::ZERO, 0.5, Vec2::new(1.0, 0.0), 0.5);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_circle_coincident() {
        let result = circle_circle(Vec2::ONE, 0.2, Vec2::ONE, 0.2);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_circle_aabb_edge_contact() {
        // circle left of the tile, overlapping its left face
        let tile = Aabb::tile(1, 0);
        let result = circle_aabb(Vec2::new(0.9, 0.5), 0.2, &tile);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-5);
        assert!((result.penetration - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_circle_aabb_miss() {
        let tile = Aabb::tile(1, 1);
        assert!(!circle_aabb(Vec2::new(0.5, 0.5), 0.2, &tile).hit);
    }

    #[test]
    fn test_circle_aabb_center_inside() {
        let tile = Aabb::tile(0, 0);
        // just inside the top edge: shortest way out is -y
        let result = circle_aabb(Vec2::new(0.5, 0.1), 0.2, &tile);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, 1.0));
        assert!((result.penetration - 0.3).abs() < 1e-5);
        let pushed = Vec2::new(0.5, 0.1) - result.normal * result.penetration;
        assert!(pushed.y < -0.19);
    }
}
