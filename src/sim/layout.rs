//! Static arena layout
//!
//! Builds the obstacle arena once at startup: four walls framing the
//! viewport, a pyramid of bricks, and the paddle. Walls always occupy
//! indices 0..=3 (left, right, bottom, top).

use glam::Vec2;

use super::shape::{Layer, Shape};
use crate::settings::LayoutConfig;

/// Bricks fill this fraction of their cell, leaving a gap
const BRICK_FILL: f32 = 0.9;

/// Built obstacle arena
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub obstacles: Vec<Shape>,
    /// Index of the paddle, if one was placed
    pub paddle: Option<usize>,
    /// Range the paddle center may move through
    pub paddle_travel: (f32, f32),
}

/// Left, right, bottom and top walls of the given thickness, inset from the viewport edge
pub fn walls(half_width: f32, half_height: f32, thickness: f32) -> [Shape; 4] {
    [
        Shape::aabb(
            Vec2::new(-half_width, -half_height),
            Vec2::new(-half_width + thickness, half_height),
            Layer::Wall,
        ),
        Shape::aabb(
            Vec2::new(half_width - thickness, -half_height),
            Vec2::new(half_width, half_height),
            Layer::Wall,
        ),
        Shape::aabb(
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height + thickness),
            Layer::Wall,
        ),
        Shape::aabb(
            Vec2::new(-half_width, half_height - thickness),
            Vec2::new(half_width, half_height),
            Layer::Wall,
        ),
    ]
}

/// Rows of the largest full pyramid with at most `bricks` bricks
pub fn pyramid_rows(bricks: u32) -> u32 {
    ((((1 + 8 * bricks as u64) as f64).sqrt() - 1.0) / 2.0).floor() as u32
}

/// Pyramid of bricks: row `r` holds `r + 1` bricks, centered on x = 0
pub fn pyramid(config: &LayoutConfig, inner_width: f32) -> Vec<Shape> {
    let rows = pyramid_rows(config.brick_count);
    if rows == 0 {
        return Vec::new();
    }
    let rows_f = rows as f32;

    let cell_w = inner_width / rows_f * BRICK_FILL;
    let base = config.brick_band_height / rows_f;
    let cell_h = (base - base / rows_f) / 2.0;
    let size = Vec2::new(cell_w, cell_h) * BRICK_FILL;

    let mut bricks = Vec::with_capacity((rows * (rows + 1) / 2) as usize);
    for row in 0..rows {
        for col in 0..=row {
            let x = -(cell_w * row as f32 / 2.0) + col as f32 * cell_w;
            let y = config.brick_band_bottom + row as f32 * cell_h + cell_h / 2.0;
            bricks.push(Shape::aabb_centered(Vec2::new(x, y), size, Layer::Brick));
        }
    }
    bricks
}

/// Build the full arena
pub fn build(config: &LayoutConfig) -> Layout {
    let half_width = config.half_width();
    let half_height = config.half_height;
    let thickness = config.wall_thickness();
    let inner_half_width = half_width - thickness;

    let mut obstacles: Vec<Shape> = walls(half_width, half_height, thickness).to_vec();
    obstacles.extend(pyramid(config, inner_half_width * 2.0));

    let mut paddle = None;
    let mut paddle_travel = (0.0, 0.0);
    if config.paddle {
        let size = Vec2::new(config.paddle_width, config.paddle_height);
        paddle = Some(obstacles.len());
        obstacles.push(Shape::aabb_centered(
            Vec2::new(0.0, config.paddle_y),
            size,
            Layer::Paddle,
        ));
        let reach = (inner_half_width - size.x / 2.0).max(0.0);
        paddle_travel = (-reach, reach);
    }

    log::info!(
        "Layout: {:.2}x{:.2} arena, {} bricks, paddle={}",
        half_width * 2.0,
        half_height * 2.0,
        obstacles.len() - 4 - paddle.map_or(0, |_| 1),
        paddle.is_some()
    );

    Layout {
        obstacles,
        paddle,
        paddle_travel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::intersects;

    #[test]
    fn test_pyramid_rows() {
        assert_eq!(pyramid_rows(0), 0);
        assert_eq!(pyramid_rows(1), 1);
        assert_eq!(pyramid_rows(3), 2);
        assert_eq!(pyramid_rows(5), 2);
        assert_eq!(pyramid_rows(10), 4);
        assert_eq!(pyramid_rows(55), 10);
    }

    #[test]
    fn test_walls_frame_viewport() {
        let [left, right, bottom, top] = walls(8.0, 4.5, 0.2);
        assert!((left.center().x + 7.9).abs() < 1e-5);
        assert!((right.center().x - 7.9).abs() < 1e-5);
        assert!((bottom.center().y + 4.4).abs() < 1e-5);
        assert!((top.center().y - 4.4).abs() < 1e-5);
        assert!([left, right, bottom, top].iter().all(|w| w.layer == Layer::Wall));
    }

    #[test]
    fn test_default_layout() {
        let layout = build(&LayoutConfig::default());
        // 4 walls + 10 bricks + paddle
        assert_eq!(layout.obstacles.len(), 15);
        assert_eq!(layout.paddle, Some(14));
        assert_eq!(layout.obstacles[14].layer, Layer::Paddle);
        let bricks: Vec<_> = layout
            .obstacles
            .iter()
            .filter(|s| s.layer == Layer::Brick)
            .collect();
        assert_eq!(bricks.len(), 10);

        // Bricks never overlap each other or the walls
        for (i, a) in bricks.iter().enumerate() {
            for b in &bricks[i + 1..] {
                assert!(!intersects(a, b));
            }
            for wall in &layout.obstacles[..4] {
                assert!(!intersects(a, wall));
            }
        }
    }

    #[test]
    fn test_paddle_travel_stays_inside_walls() {
        let config = LayoutConfig::default();
        let layout = build(&config);
        let inner = config.half_width() - config.wall_thickness();
        let (lo, hi) = layout.paddle_travel;
        assert!((hi - (inner - config.paddle_width / 2.0)).abs() < 1e-5);
        assert_eq!(lo, -hi);
    }

    #[test]
    fn test_walls_only_layout() {
        let config = LayoutConfig {
            brick_count: 0,
            paddle: false,
            ..Default::default()
        };
        let layout = build(&config);
        assert_eq!(layout.obstacles.len(), 4);
        assert_eq!(layout.paddle, None);
    }
}
