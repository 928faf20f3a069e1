//! Contact results and bounce response
//!
//! Balls bounce by pure reflection at constant speed. The paddle adds a
//! lateral "english" term so the player can steer the rebound.

use glam::Vec2;

use super::shape::{Layer, Shape, contact_info, intersects};
use super::state::Ball;
use crate::settings::SimConfig;

/// Result of a contact check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Whether a contact occurred. The other fields are meaningless otherwise.
    pub valid: bool,
    /// Surface normal, pointing away from the obstacle toward the ball
    pub normal: Vec2,
    /// Contact point on the obstacle surface
    pub point: Vec2,
    /// Layer of the obstacle hit
    pub layer: Layer,
    /// Index of the obstacle hit
    pub obstacle: usize,
}

impl CollisionInfo {
    pub fn new(normal: Vec2, point: Vec2, layer: Layer, obstacle: usize) -> Self {
        Self {
            valid: true,
            normal,
            point,
            layer,
            obstacle,
        }
    }

    pub fn none() -> Self {
        Self {
            valid: false,
            normal: Vec2::ZERO,
            point: Vec2::ZERO,
            layer: Layer::Wall,
            obstacle: usize::MAX,
        }
    }
}

impl Default for CollisionInfo {
    fn default() -> Self {
        Self::none()
    }
}

/// Check the ball against a single obstacle.
///
/// Only counts contacts the ball is moving into; a ball already heading
/// away from the surface is left alone.
pub fn check_contact(ball: &Shape, velocity: Vec2, index: usize, obstacle: &Shape) -> CollisionInfo {
    if !obstacle.active || !intersects(ball, obstacle) {
        return CollisionInfo::none();
    }
    match contact_info(ball, obstacle) {
        Some(contact) if contact.normal.dot(velocity) < 0.0 => {
            CollisionInfo::new(contact.normal, contact.point, obstacle.layer, index)
        }
        _ => CollisionInfo::none(),
    }
}

/// First obstacle the ball overlaps and is moving into
pub fn check_contacts(ball: &Shape, velocity: Vec2, obstacles: &[Shape]) -> CollisionInfo {
    obstacles
        .iter()
        .enumerate()
        .map(|(i, obstacle)| check_contact(ball, velocity, i, obstacle))
        .find(|info| info.valid)
        .unwrap_or_default()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect and rescale to the constant ball speed
fn reflect_at_speed(velocity: Vec2, normal: Vec2, speed: f32) -> Vec2 {
    reflect_velocity(velocity.normalize_or_zero(), normal) * speed
}

/// Wall bounce: reflect and sit the ball tangent to the surface
pub fn wall_bounce(ball: &mut Ball, info: &CollisionInfo, config: &SimConfig) {
    ball.vel = reflect_at_speed(ball.vel, info.normal, config.ball_speed);
    ball.pos = info.point + info.normal * ball.radius;
}

/// Brick bounce; the caller retires the brick afterwards
pub fn brick_bounce(ball: &mut Ball, info: &CollisionInfo, config: &SimConfig) {
    ball.vel = reflect_at_speed(ball.vel, info.normal, config.ball_speed);
    ball.pos = info.point + info.normal * ball.radius;
}

/// Lateral velocity term from where the paddle was struck.
///
/// Zero at the paddle center, `influence` (signed) at either edge.
pub fn paddle_english(contact_x: f32, paddle: &Shape, influence: f32) -> f32 {
    let half_width = paddle.half_extents().x;
    if half_width <= 0.0 {
        return 0.0;
    }
    let offset = ((contact_x - paddle.center().x) / half_width).clamp(-1.0, 1.0);
    offset * influence
}

/// Paddle bounce: reflection plus english, renormalized to constant speed
pub fn paddle_bounce(ball: &mut Ball, info: &CollisionInfo, paddle: &Shape, config: &SimConfig) {
    let mut reflected = reflect_velocity(ball.vel.normalize_or_zero(), info.normal);
    reflected.x += paddle_english(info.point.x, paddle, config.paddle_influence);

    let dir = reflected.normalize_or_zero();
    let dir = if dir == Vec2::ZERO { info.normal } else { dir };
    ball.vel = dir * config.ball_speed;
    ball.pos = info.point + info.normal * ball.radius;
}

/// Apply the bounce for whatever layer was hit
pub fn bounce(ball: &mut Ball, info: &CollisionInfo, obstacle: &Shape, config: &SimConfig) {
    if !info.valid {
        return;
    }
    match info.layer {
        Layer::Wall => wall_bounce(ball, info, config),
        Layer::Brick => brick_bounce(ball, info, config),
        Layer::Paddle => paddle_bounce(ball, info, obstacle, config),
        Layer::Ball => {}
    }
}
