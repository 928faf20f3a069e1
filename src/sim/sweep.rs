//! Swept (time-of-impact) collision queries
//!
//! Each query answers: moving a circle of radius `radius` from `origin`
//! along unit `dir`, how far can it travel before it first touches the
//! target? Distances are exact center travel to tangency, which the tick
//! engine turns into collision-free coast time.

use glam::Vec2;

use super::shape::{
    Layer, Shape, ShapeKind, circle_box_intersect, circle_circle_intersect, contact_info,
};

/// Substitute for a zero direction component in the slab test
const ZERO_DIR_SUBSTITUTE: f32 = 1e-5;
/// Tolerance when classifying which expanded face was hit
const FACE_EPSILON: f32 = 1e-4;

/// First contact along a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Center travel distance to first contact
    pub distance: f32,
    /// Circle center at first contact
    pub point: Vec2,
    /// Unit surface normal, pointing away from the target
    pub normal: Vec2,
}

/// Sweep a circle against a static axis-aligned box.
///
/// The box is inflated by `radius` on every side and the circle center is
/// traced through it as a ray (slab test). Fails when the entry time is
/// negative, the ray misses, or the entry lies beyond `max_distance`.
pub fn sweep_circle_box(
    origin: Vec2,
    radius: f32,
    dir: Vec2,
    max_distance: f32,
    min: Vec2,
    max: Vec2,
) -> Option<SweepHit> {
    let expanded_min = min - Vec2::splat(radius);
    let expanded_max = max + Vec2::splat(radius);

    let safe = |d: f32| if d != 0.0 { d } else { ZERO_DIR_SUBSTITUTE };
    let inv_dir = Vec2::new(1.0 / safe(dir.x), 1.0 / safe(dir.y));

    let t1 = (expanded_min - origin) * inv_dir;
    let t2 = (expanded_max - origin) * inv_dir;
    let t_min = t1.min(t2);
    let t_max = t1.max(t2);

    let t_enter = t_min.max_element();
    let t_exit = t_max.min_element();

    if t_enter < 0.0 || t_enter > t_exit || t_enter > max_distance {
        return None;
    }

    let point = origin + dir * t_enter;
    let normal = if (point.x - expanded_min.x).abs() < FACE_EPSILON {
        Vec2::NEG_X
    } else if (point.x - expanded_max.x).abs() < FACE_EPSILON {
        Vec2::X
    } else if (point.y - expanded_min.y).abs() < FACE_EPSILON {
        Vec2::NEG_Y
    } else if (point.y - expanded_max.y).abs() < FACE_EPSILON {
        Vec2::Y
    } else if t_min.x >= t_min.y {
        // Rounding pushed the point off every face; trust the entry slab
        if dir.x > 0.0 { Vec2::NEG_X } else { Vec2::X }
    } else if dir.y > 0.0 {
        Vec2::NEG_Y
    } else {
        Vec2::Y
    };

    Some(SweepHit {
        distance: t_enter,
        point,
        normal,
    })
}

/// Sweep a circle against a static circle (ray vs circle of combined radius)
pub fn sweep_circle_circle(
    origin: Vec2,
    radius: f32,
    dir: Vec2,
    max_distance: f32,
    center: Vec2,
    target_radius: f32,
) -> Option<SweepHit> {
    let rel = center - origin;
    let r = radius + target_radius;

    let proj = rel.dot(dir);
    let perp = rel - proj * dir;
    let closest_sq = perp.length_squared();
    if closest_sq > r * r {
        return None;
    }

    let thc = (r * r - closest_sq).sqrt();
    let t0 = proj - thc;
    if t0 < 0.0 || t0 > max_distance {
        return None;
    }

    let point = origin + dir * t0;
    Some(SweepHit {
        distance: t0,
        point,
        normal: (point - center).normalize_or_zero(),
    })
}

/// Sweep a circle against any shape
pub fn sweep_shape(
    origin: Vec2,
    radius: f32,
    dir: Vec2,
    max_distance: f32,
    target: &Shape,
) -> Option<SweepHit> {
    match target.kind {
        ShapeKind::Circle {
            center,
            radius: target_radius,
        } => sweep_circle_circle(origin, radius, dir, max_distance, center, target_radius),
        ShapeKind::Box { min, max } => {
            sweep_circle_box(origin, radius, dir, max_distance, min, max)
        }
    }
}

/// Whether a circle already overlaps `target` while heading into it.
///
/// The analytic sweeps reject negative entry times, so a circle that has
/// stepped past tangency would otherwise see straight through the shape.
fn overlapping_and_approaching(origin: Vec2, radius: f32, dir: Vec2, target: &Shape) -> bool {
    let overlapping = match target.kind {
        ShapeKind::Circle {
            center,
            radius: target_radius,
        } => circle_circle_intersect(origin, radius, center, target_radius),
        ShapeKind::Box { min, max } => circle_box_intersect(origin, radius, min, max),
    };
    if !overlapping {
        return false;
    }
    let probe = Shape::circle(origin, radius, Layer::Ball);
    contact_info(&probe, target).is_some_and(|c| c.normal.dot(dir) < 0.0)
}

/// Find the earliest active obstacle hit along `dir` within `max_distance`.
///
/// Returns the obstacle index and the hit. An obstacle the circle already
/// overlaps and is moving into reports distance zero.
pub fn earliest_hit(
    origin: Vec2,
    radius: f32,
    dir: Vec2,
    max_distance: f32,
    obstacles: &[Shape],
) -> Option<(usize, SweepHit)> {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }

    let mut best: Option<(usize, SweepHit)> = None;
    for (i, shape) in obstacles.iter().enumerate() {
        if !shape.active {
            continue;
        }

        let hit = if overlapping_and_approaching(origin, radius, dir, shape) {
            Some(SweepHit {
                distance: 0.0,
                point: origin,
                normal: -dir,
            })
        } else {
            sweep_shape(origin, radius, dir, max_distance, shape)
        };

        if let Some(hit) = hit {
            let closer = best.is_none_or(|(_, b)| hit.distance < b.distance);
            if closer {
                best = Some((i, hit));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::intersects;
    use proptest::prelude::*;

    #[test]
    fn test_box_sweep_head_on() {
        let hit = sweep_circle_box(
            Vec2::ZERO,
            0.5,
            Vec2::X,
            100.0,
            Vec2::new(5.0, -1.0),
            Vec2::new(6.0, 1.0),
        )
        .unwrap();
        assert!((hit.distance - 4.5).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::NEG_X);
        assert!((hit.point - Vec2::new(4.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_box_sweep_each_face_normal() {
        let (min, max) = (Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let cases = [
            (Vec2::new(-5.0, 0.0), Vec2::X, Vec2::NEG_X),
            (Vec2::new(5.0, 0.0), Vec2::NEG_X, Vec2::X),
            (Vec2::new(0.0, -5.0), Vec2::Y, Vec2::NEG_Y),
            (Vec2::new(0.0, 5.0), Vec2::NEG_Y, Vec2::Y),
        ];
        for (origin, dir, normal) in cases {
            let hit = sweep_circle_box(origin, 0.25, dir, 10.0, min, max).unwrap();
            assert_eq!(hit.normal, normal, "from {origin}");
            assert!((hit.distance - 3.75).abs() < 1e-5);
        }
    }

    #[test]
    fn test_box_sweep_rejects_behind_beyond_and_miss() {
        let (min, max) = (Vec2::new(5.0, -1.0), Vec2::new(6.0, 1.0));
        // Moving away
        assert!(sweep_circle_box(Vec2::ZERO, 0.5, Vec2::NEG_X, 100.0, min, max).is_none());
        // Out of range
        assert!(sweep_circle_box(Vec2::ZERO, 0.5, Vec2::X, 4.0, min, max).is_none());
        // Passes above
        assert!(sweep_circle_box(Vec2::new(0.0, 3.0), 0.5, Vec2::X, 100.0, min, max).is_none());
        // Starting inside the expanded box is a negative entry
        assert!(sweep_circle_box(Vec2::new(4.8, 0.0), 0.5, Vec2::X, 100.0, min, max).is_none());
    }

    #[test]
    fn test_box_sweep_axis_aligned_direction_uses_substitute() {
        // dir.y == 0 must not divide by zero or produce NaN
        let hit = sweep_circle_box(
            Vec2::new(0.0, 0.5),
            0.1,
            Vec2::X,
            10.0,
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 1.0),
        )
        .unwrap();
        assert!(hit.distance.is_finite());
        assert!((hit.distance - 1.9).abs() < 1e-5);
    }

    #[test]
    fn test_circle_sweep_time_of_impact_and_tangency() {
        let (ball_r, target_r, d) = (0.5, 1.0, 10.0);
        let target = Vec2::new(d, 0.0);
        let hit = sweep_circle_circle(Vec2::ZERO, ball_r, Vec2::X, 100.0, target, target_r).unwrap();
        assert!((hit.distance - (d - target_r - ball_r)).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::NEG_X);

        let obstacle = Shape::circle(target, target_r, Layer::Wall);
        let touching = Shape::circle(Vec2::X * hit.distance, ball_r, Layer::Ball);
        let short = Shape::circle(Vec2::X * (hit.distance - 1e-3), ball_r, Layer::Ball);
        assert!(intersects(&touching, &obstacle));
        assert!(!intersects(&short, &obstacle));
    }

    #[test]
    fn test_circle_sweep_grazing_and_miss() {
        let target = Vec2::new(5.0, 1.5);
        // Cross-track 1.5 == combined radius: grazes
        let graze = sweep_circle_circle(Vec2::ZERO, 0.5, Vec2::X, 100.0, target, 1.0).unwrap();
        assert!((graze.distance - 5.0).abs() < 1e-4);
        // Cross-track beyond combined radius
        assert!(sweep_circle_circle(Vec2::ZERO, 0.4, Vec2::X, 100.0, target, 1.0).is_none());
        // Behind
        assert!(sweep_circle_circle(Vec2::ZERO, 0.5, Vec2::NEG_X, 100.0, target, 1.0).is_none());
    }

    #[test]
    fn test_earliest_hit_picks_nearest_active() {
        let mut obstacles = vec![
            Shape::aabb(Vec2::new(8.0, -1.0), Vec2::new(9.0, 1.0), Layer::Wall),
            Shape::aabb(Vec2::new(3.0, -1.0), Vec2::new(4.0, 1.0), Layer::Brick),
            Shape::circle(Vec2::new(0.0, 6.0), 1.0, Layer::Wall),
        ];
        let (index, hit) = earliest_hit(Vec2::ZERO, 0.1, Vec2::X, 15.0, &obstacles).unwrap();
        assert_eq!(index, 1);
        assert!((hit.distance - 2.9).abs() < 1e-5);

        obstacles[1].active = false;
        let (index, _) = earliest_hit(Vec2::ZERO, 0.1, Vec2::X, 15.0, &obstacles).unwrap();
        assert_eq!(index, 0);

        assert!(earliest_hit(Vec2::ZERO, 0.1, Vec2::X, 5.0, &obstacles).is_none());
        assert!(earliest_hit(Vec2::ZERO, 0.1, Vec2::ZERO, 15.0, &obstacles).is_none());
    }

    #[test]
    fn test_earliest_hit_reports_overlap_only_when_approaching() {
        let obstacles = [Shape::aabb(Vec2::new(1.0, -1.0), Vec2::new(2.0, 1.0), Layer::Wall)];
        let origin = Vec2::new(0.95, 0.0);
        let (index, hit) = earliest_hit(origin, 0.1, Vec2::X, 15.0, &obstacles).unwrap();
        assert_eq!(index, 0);
        assert_eq!(hit.distance, 0.0);

        // Same overlap, moving away: nothing ahead
        assert!(earliest_hit(origin, 0.1, Vec2::NEG_X, 15.0, &obstacles).is_none());
    }

    proptest! {
        #[test]
        fn prop_circle_toi_matches_distance(d in 3.0f32..50.0, r in 0.05f32..1.0, big_r in 0.1f32..2.0) {
            let hit = sweep_circle_circle(Vec2::ZERO, r, Vec2::X, 100.0, Vec2::new(d, 0.0), big_r).unwrap();
            prop_assert!((hit.distance - (d - big_r - r)).abs() < 1e-3);
        }

        #[test]
        fn prop_box_toi_lands_on_expanded_face(angle in -1.2f32..1.2, gap in 0.5f32..10.0) {
            let dir = Vec2::new(angle.cos(), angle.sin());
            let min = Vec2::new(gap + 0.2, -50.0);
            let max = Vec2::new(gap + 1.0, 50.0);
            let hit = sweep_circle_box(Vec2::ZERO, 0.2, dir, 1000.0, min, max).unwrap();
            prop_assert!((hit.point.x - gap).abs() < 1e-3);
            prop_assert_eq!(hit.normal, Vec2::NEG_X);
        }
    }
}
