//! 2D shape primitives
//!
//! Obstacles and balls are plain-old-data shapes: a circle or an
//! axis-aligned box, tagged with a collision layer and an active flag.
//! All pairwise math dispatches on the tag with free functions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Below this squared distance a circle center counts as inside a box
const DEGENERATE_DIST_SQ: f32 = 1e-6;

/// Collision layer, selects bounce behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Layer {
    Wall = 0,
    Brick = 1,
    Paddle = 2,
    Ball = 3,
}

/// Shape geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle { center: Vec2, radius: f32 },
    Box { min: Vec2, max: Vec2 },
}

/// A tagged shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub layer: Layer,
    /// Inactive shapes are skipped by every query
    pub active: bool,
}

/// Contact between two overlapping shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub point: Vec2,
    /// Unit normal pointing away from the second shape
    pub normal: Vec2,
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32, layer: Layer) -> Self {
        debug_assert!(radius > 0.0, "circle radius must be positive: {radius}");
        Self {
            kind: ShapeKind::Circle { center, radius },
            layer,
            active: true,
        }
    }

    pub fn aabb(min: Vec2, max: Vec2, layer: Layer) -> Self {
        debug_assert!(
            min.cmple(max).all(),
            "box min {min} must not exceed max {max}"
        );
        Self {
            kind: ShapeKind::Box { min, max },
            layer,
            active: true,
        }
    }

    /// Box from center and full size
    pub fn aabb_centered(center: Vec2, size: Vec2, layer: Layer) -> Self {
        let half = size * 0.5;
        Self::aabb(center - half, center + half, layer)
    }

    pub fn center(&self) -> Vec2 {
        match self.kind {
            ShapeKind::Circle { center, .. } => center,
            ShapeKind::Box { min, max } => (min + max) * 0.5,
        }
    }

    /// Half extents along x and y
    pub fn half_extents(&self) -> Vec2 {
        match self.kind {
            ShapeKind::Circle { radius, .. } => Vec2::splat(radius),
            ShapeKind::Box { min, max } => (max - min) * 0.5,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.kind {
            ShapeKind::Circle { center, .. } => *center += delta,
            ShapeKind::Box { min, max } => {
                *min += delta;
                *max += delta;
            }
        }
    }
}

/// Closest point of the box to `p`
#[inline]
fn closest_point_on_box(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    p.clamp(min, max)
}

pub fn circle_circle_intersect(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

pub fn circle_box_intersect(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> bool {
    let closest = closest_point_on_box(center, min, max);
    center.distance_squared(closest) <= radius * radius
}

pub fn box_box_intersect(min_a: Vec2, max_a: Vec2, min_b: Vec2, max_b: Vec2) -> bool {
    !(max_a.x < min_b.x || min_a.x > max_b.x || max_a.y < min_b.y || min_a.y > max_b.y)
}

/// Whether two shapes overlap. Exact tangency counts as overlap.
pub fn intersects(a: &Shape, b: &Shape) -> bool {
    use ShapeKind::*;
    match (a.kind, b.kind) {
        (Circle { center: ca, radius: ra }, Circle { center: cb, radius: rb }) => {
            circle_circle_intersect(ca, ra, cb, rb)
        }
        (Circle { center, radius }, Box { min, max })
        | (Box { min, max }, Circle { center, radius }) => {
            circle_box_intersect(center, radius, min, max)
        }
        (Box { min: min_a, max: max_a }, Box { min: min_b, max: max_b }) => {
            box_box_intersect(min_a, max_a, min_b, max_b)
        }
    }
}

/// Contact point and normal of `a` against `b`.
///
/// The normal always points from `b` toward `a`, so a ball passed as `a`
/// gets a normal pointing away from the obstacle it touches. Callers are
/// expected to have checked [`intersects`] first; the result for separated
/// shapes is still well defined but describes the nearest features.
pub fn contact_info(a: &Shape, b: &Shape) -> Option<Contact> {
    use ShapeKind::*;
    match (a.kind, b.kind) {
        (Box { min: min_a, max: max_a }, Box { min: min_b, max: max_b }) => {
            Some(box_box_contact(min_a, max_a, min_b, max_b))
        }
        (Circle { center, .. }, Box { min, max }) => Some(circle_box_contact(center, min, max)),
        (Box { min, max }, Circle { center, .. }) => {
            let contact = circle_box_contact(center, min, max);
            Some(Contact {
                point: contact.point,
                normal: -contact.normal,
            })
        }
        (Circle { center: ca, .. }, Circle { center: cb, radius: rb }) => {
            let normal = (ca - cb).normalize_or_zero();
            if normal == Vec2::ZERO {
                return None;
            }
            Some(Contact {
                point: cb + normal * rb,
                normal,
            })
        }
    }
}

fn box_box_contact(min_a: Vec2, max_a: Vec2, min_b: Vec2, max_b: Vec2) -> Contact {
    let overlap = max_a.min(max_b) - min_a.max(min_b);
    let center_a = (min_a + max_a) * 0.5;
    let center_b = (min_b + max_b) * 0.5;

    // Minimum penetration axis, x wins ties
    if overlap.x <= overlap.y {
        let a_left = center_a.x < center_b.x;
        let normal = if a_left { Vec2::NEG_X } else { Vec2::X };
        let x = if a_left { max_a.x } else { min_a.x };
        let y = (min_a.y.max(min_b.y) + max_a.y.min(max_b.y)) * 0.5;
        Contact {
            point: Vec2::new(x, y),
            normal,
        }
    } else {
        let a_below = center_a.y < center_b.y;
        let normal = if a_below { Vec2::NEG_Y } else { Vec2::Y };
        let y = if a_below { max_a.y } else { min_a.y };
        let x = (min_a.x.max(min_b.x) + max_a.x.min(max_b.x)) * 0.5;
        Contact {
            point: Vec2::new(x, y),
            normal,
        }
    }
}

fn circle_box_contact(center: Vec2, min: Vec2, max: Vec2) -> Contact {
    let closest = closest_point_on_box(center, min, max);
    let delta = center - closest;
    if delta.length_squared() > DEGENERATE_DIST_SQ {
        return Contact {
            point: closest,
            normal: delta.normalize(),
        };
    }

    // Center on or inside the box: push out through the nearest face
    let left = (center.x - min.x).abs();
    let right = (center.x - max.x).abs();
    let bottom = (center.y - min.y).abs();
    let top = (center.y - max.y).abs();
    let nearest = left.min(right).min(bottom.min(top));

    if nearest == left {
        Contact {
            point: Vec2::new(min.x, center.y),
            normal: Vec2::NEG_X,
        }
    } else if nearest == right {
        Contact {
            point: Vec2::new(max.x, center.y),
            normal: Vec2::X,
        }
    } else if nearest == bottom {
        Contact {
            point: Vec2::new(center.x, min.y),
            normal: Vec2::NEG_Y,
        }
    } else {
        Contact {
            point: Vec2::new(center.x, max.y),
            normal: Vec2::Y,
        }
    }
}
