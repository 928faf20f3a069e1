//! Fixed timestep simulation tick
//!
//! Advances the paddle and every visible ball deterministically. Balls
//! alternate between an expensive look-ahead sweep and cheap coasting:
//! - Seeking: sweep all active obstacles once, then coast until just short of the hit
//! - Coasting: move along the heading with no collision queries at all
//! - Scheduled: coast used up, check the predicted obstacle alone each step
//!
//! A confirmed contact bounces the ball and drops it back to seeking.

use glam::Vec2;

use super::collision::{CollisionInfo, bounce, check_contact, check_contacts};
use super::shape::{Layer, Shape};
use super::state::{Ball, SimEvent, TickStats, World};
use super::sweep::earliest_hit;
use crate::settings::SimConfig;

/// Upper bound on bounces resolved for one ball in one tick (corner hits)
pub const MAX_CONTACTS_PER_TICK: usize = 4;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle steering in [-1, 1]; out of range values are clamped
    pub paddle_axis: f32,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if dt <= 0.0 || dt.is_nan() {
        return;
    }
    world.time_ticks += 1;
    world.stats = TickStats::default();

    let World {
        config,
        balls,
        active_balls,
        obstacles,
        paddle,
        paddle_travel,
        stats,
        events,
        ..
    } = world;
    let balls = &mut balls[..*active_balls];

    if let Some(paddle) = *paddle {
        let delta = paddle_delta(input.paddle_axis, config.paddle_speed, dt);
        let moved = move_paddle(&mut obstacles[paddle], *paddle_travel, delta);
        if moved != 0.0 {
            reschedule_for_moved_obstacle(balls, obstacles, paddle, config, stats);
        }
    }

    for ball in balls.iter_mut() {
        step_ball(ball, obstacles, config, dt, stats, events);
    }

    log::trace!(
        "Tick {}: {} balls, {} coasting, {} sweeps, {} bounces, {} misses",
        world.time_ticks,
        world.active_balls,
        world.stats.coasting,
        world.stats.look_ahead_queries,
        world.stats.bounces,
        world.stats.misses
    );
}

impl World {
    /// Advance by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }
}

/// Requested paddle displacement for this tick
fn paddle_delta(axis: f32, speed: f32, dt: f32) -> f32 {
    if !axis.is_finite() {
        return 0.0;
    }
    axis.clamp(-1.0, 1.0) * speed * dt
}

/// Slide the paddle horizontally, staying inside `travel`.
///
/// Returns the distance actually moved.
fn move_paddle(paddle: &mut Shape, travel: (f32, f32), delta: f32) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }
    let x = paddle.center().x;
    let target = (x + delta).clamp(travel.0, travel.1);
    let moved = target - x;
    if moved != 0.0 {
        paddle.translate(Vec2::new(moved, 0.0));
    }
    moved
}

/// Re-check coasting balls against an obstacle that just moved.
///
/// A coast is only valid for the obstacles that existed when it was
/// scheduled; a paddle sliding into the path would otherwise be skipped.
fn reschedule_for_moved_obstacle(
    balls: &mut [Ball],
    obstacles: &[Shape],
    index: usize,
    config: &SimConfig,
    stats: &mut TickStats,
) {
    let target = std::slice::from_ref(&obstacles[index]);
    let speed = config.ball_speed;
    for ball in balls.iter_mut().filter(|b| b.time_to_skip > 0.0) {
        let reach = ball.time_to_skip * speed + ball.radius;
        stats.reschedule_queries += 1;
        if let Some((_, hit)) = earliest_hit(ball.pos, ball.radius, ball.vel, reach, target) {
            ball.time_to_skip = ((hit.distance - ball.radius) / speed).max(0.0);
            ball.pending_target = Some(index);
        }
    }
}

/// Advance one ball by one step
fn step_ball(
    ball: &mut Ball,
    obstacles: &mut [Shape],
    config: &SimConfig,
    dt: f32,
    stats: &mut TickStats,
    events: &mut Vec<SimEvent>,
) {
    let heading = ball.heading();
    if heading == Vec2::ZERO {
        return;
    }
    let speed = config.ball_speed;
    let step = config.step_distance(dt);

    // Coast: known collision-free, no queries
    if ball.time_to_skip > 0.0 {
        ball.time_to_skip -= dt;
        let remaining = (ball.time_to_skip * speed).max(0.0);
        ball.pos += heading * step.min(remaining);
        stats.coasting += 1;
        return;
    }

    ball.pos += heading * step;

    if ball.pending_target.is_none() {
        stats.look_ahead_queries += 1;
        match earliest_hit(ball.pos, ball.radius, heading, config.look_ahead, obstacles) {
            None => {
                ball.time_to_skip = (config.look_ahead - ball.radius) / speed;
                return;
            }
            Some((index, hit)) if hit.distance > ball.radius => {
                ball.time_to_skip = (hit.distance - ball.radius) / speed;
                ball.pending_target = Some(index);
                return;
            }
            // Within one radius: resolve now
            Some(_) => {}
        }
    }

    resolve_contacts(ball, obstacles, config, stats, events);
}

/// Confirm and apply contacts for a ball that has reached its predicted hit
fn resolve_contacts(
    ball: &mut Ball,
    obstacles: &mut [Shape],
    config: &SimConfig,
    stats: &mut TickStats,
    events: &mut Vec<SimEvent>,
) {
    let predicted = ball.pending_target.take();
    ball.time_to_skip = 0.0;

    stats.contact_checks += 1;
    let info = match predicted {
        Some(index) => match obstacles.get(index) {
            Some(target) => check_contact(&ball.shape(), ball.vel, index, target),
            None => CollisionInfo::none(),
        },
        None => check_contacts(&ball.shape(), ball.vel, obstacles),
    };
    if !info.valid {
        if predicted.is_some() {
            stats.misses += 1;
        }
        return;
    }

    apply_contact(ball, &info, obstacles, config, stats, events);

    // A bounce can leave the ball pressed into a second surface (corners)
    for _ in 1..MAX_CONTACTS_PER_TICK {
        stats.contact_checks += 1;
        let info = check_contacts(&ball.shape(), ball.vel, obstacles);
        if !info.valid {
            break;
        }
        apply_contact(ball, &info, obstacles, config, stats, events);
    }
}

/// Bounce off a confirmed contact and retire the obstacle if it is a brick
fn apply_contact(
    ball: &mut Ball,
    info: &CollisionInfo,
    obstacles: &mut [Shape],
    config: &SimConfig,
    stats: &mut TickStats,
    events: &mut Vec<SimEvent>,
) {
    bounce(ball, info, &obstacles[info.obstacle], config);
    stats.bounces += 1;
    events.push(SimEvent::Bounce {
        ball: ball.id,
        layer: info.layer,
        point: info.point,
        normal: info.normal,
    });

    if info.layer == Layer::Brick {
        obstacles[info.obstacle].active = false;
        stats.bricks_destroyed += 1;
        events.push(SimEvent::BrickDestroyed {
            obstacle: info.obstacle,
        });
        log::debug!("Brick {} destroyed by ball {}", info.obstacle, ball.id);
    }
}
