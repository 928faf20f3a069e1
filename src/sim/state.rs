//! Simulation state: balls, obstacles and the world that owns them
//!
//! Balls live in a pool. The first `ball_count()` entries are visible;
//! reset hides the rest instead of freeing them, and spawning reuses
//! hidden balls before allocating. Obstacles are a fixed arena built once
//! by the layout builder and referred to by index.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::shape::{Layer, Shape};
use crate::consts::{COLOR_CEILING, PRIMARY_HEADING};
use crate::polar_to_cartesian;
use crate::settings::SimConfig;

/// A ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds of travel already known to be collision-free
    pub time_to_skip: f32,
    /// Obstacle index this ball is predicted to hit next
    pub pending_target: Option<usize>,
    /// RGBA display color
    pub color: [f32; 4],
    /// Hidden balls are pooled, not simulated or drawn
    pub visible: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, radius: f32, color: [f32; 4]) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive: {radius}");
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            time_to_skip: 0.0,
            pending_target: None,
            color,
            visible: true,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// The ball as a collision shape
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::circle(self.pos, self.radius, Layer::Ball)
    }

    /// Unit heading, zero when stationary
    #[inline]
    pub fn heading(&self) -> Vec2 {
        self.vel.normalize_or_zero()
    }

    /// Forget any scheduled coast or predicted target
    pub fn clear_schedule(&mut self) {
        self.time_to_skip = 0.0;
        self.pending_target = None;
    }

    /// Current scheduling state, for diagnostics
    pub fn phase(&self) -> BallPhase {
        if self.time_to_skip > 0.0 {
            BallPhase::Coasting
        } else if self.pending_target.is_some() {
            BallPhase::Scheduled
        } else {
            BallPhase::Seeking
        }
    }
}

/// Where a ball is in its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallPhase {
    /// No prediction; the next tick runs a look-ahead sweep
    Seeking,
    /// Moving without collision queries
    Coasting,
    /// Coast used up, waiting to confirm the predicted contact
    Scheduled,
}

/// Something the host may want to react to (sound, score, effects)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// `normal` points away from the struck obstacle
    Bounce {
        ball: u32,
        layer: Layer,
        point: Vec2,
        normal: Vec2,
    },
    BrickDestroyed { obstacle: usize },
}

/// Per-tick counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Balls that coasted without any query
    pub coasting: u32,
    /// Look-ahead sweeps issued (one per ball, each scanning all obstacles)
    pub look_ahead_queries: u32,
    /// Single-obstacle sweeps for moved obstacles
    pub reschedule_queries: u32,
    /// Overlap checks in contact resolution
    pub contact_checks: u32,
    pub bounces: u32,
    /// Predicted contacts that did not materialize
    pub misses: u32,
    pub bricks_destroyed: u32,
}

/// The simulated world
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    pub(crate) balls: Vec<Ball>,
    /// Number of visible balls; they occupy `balls[..active_balls]`
    pub(crate) active_balls: usize,
    pub(crate) obstacles: Vec<Shape>,
    pub(crate) paddle: Option<usize>,
    /// Paddle center x range
    pub(crate) paddle_travel: (f32, f32),
    rng: Pcg32,
    next_id: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Counters for the most recent tick
    pub stats: TickStats,
    /// Events since the host last drained them
    pub events: Vec<SimEvent>,
}

impl World {
    /// Create a world over the given layout with one primary ball at the origin
    pub fn new(config: SimConfig, layout: Layout) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        let mut world = Self {
            config,
            balls: Vec::new(),
            active_balls: 0,
            obstacles: layout.obstacles,
            paddle: layout.paddle,
            paddle_travel: layout.paddle_travel,
            rng,
            next_id: 0,
            time_ticks: 0,
            stats: TickStats::default(),
            events: Vec::new(),
        };

        let color = world.random_color();
        let id = world.next_entity_id();
        world.balls.push(Ball::new(id, Vec2::ZERO, world.config.ball_radius, color));
        world.active_balls = 1;
        world.send_in_direction(0, Vec2::from(PRIMARY_HEADING));

        log::info!(
            "World created: {} obstacles, paddle={}",
            world.obstacles.len(),
            world.paddle.is_some()
        );
        world
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn random_color(&mut self) -> [f32; 4] {
        [
            self.rng.random::<f32>() * COLOR_CEILING,
            self.rng.random::<f32>() * COLOR_CEILING,
            self.rng.random::<f32>() * COLOR_CEILING,
            1.0,
        ]
    }

    /// Uniform random heading inside the configured spawn cone
    fn random_heading(&mut self) -> Vec2 {
        let (lo, hi) = self.config.spawn_cone();
        let theta = self.rng.random_range(lo..=hi);
        polar_to_cartesian(1.0, theta)
    }

    /// Point ball `index` along `dir` at the constant speed
    pub fn send_in_direction(&mut self, index: usize, dir: Vec2) {
        let speed = self.config.ball_speed;
        if let Some(ball) = self.balls.get_mut(index) {
            ball.vel = dir.normalize_or_zero() * speed;
            ball.clear_schedule();
        }
    }

    pub fn send_in_random_direction(&mut self, index: usize) {
        let dir = self.random_heading();
        self.send_in_direction(index, dir);
    }

    /// Add `count` balls at the primary ball's position.
    ///
    /// Hidden pooled balls are reused before new ones are allocated.
    pub fn spawn_balls(&mut self, count: usize) {
        let origin = self.balls[0].pos;
        let mut reused = 0;
        for _ in 0..count {
            let index = self.active_balls;
            if index < self.balls.len() {
                let ball = &mut self.balls[index];
                ball.pos = origin;
                ball.visible = true;
                reused += 1;
            } else {
                let color = self.random_color();
                let id = self.next_entity_id();
                self.balls
                    .push(Ball::new(id, origin, self.config.ball_radius, color));
            }
            self.active_balls += 1;
            self.send_in_random_direction(index);
        }
        log::debug!(
            "Spawned {} balls ({} reused), {} active",
            count,
            reused,
            self.active_balls
        );
    }

    /// Hide every ball except the primary, which restarts from the origin
    pub fn reset_balls(&mut self) {
        for ball in &mut self.balls[1..] {
            ball.visible = false;
            ball.clear_schedule();
        }
        self.active_balls = 1;
        self.balls[0].pos = Vec2::ZERO;
        self.send_in_random_direction(0);
        log::info!("Balls reset ({} pooled)", self.balls.len() - 1);
    }

    /// Number of visible balls
    pub fn ball_count(&self) -> usize {
        self.active_balls
    }

    /// Visible balls, primary first
    pub fn balls(&self) -> &[Ball] {
        &self.balls[..self.active_balls]
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls[..self.active_balls]
    }

    pub fn ball(&self, index: usize) -> Option<&Ball> {
        self.balls().get(index)
    }

    pub fn ball_mut(&mut self, index: usize) -> Option<&mut Ball> {
        self.balls_mut().get_mut(index)
    }

    /// Pool size, visible or not
    pub fn pool_size(&self) -> usize {
        self.balls.len()
    }

    pub fn obstacles(&self) -> &[Shape] {
        &self.obstacles
    }

    pub fn paddle(&self) -> Option<&Shape> {
        self.paddle.map(|i| &self.obstacles[i])
    }

    pub fn paddle_index(&self) -> Option<usize> {
        self.paddle
    }

    /// Bricks not yet destroyed
    pub fn bricks_remaining(&self) -> usize {
        self.obstacles
            .iter()
            .filter(|s| s.layer == Layer::Brick && s.active)
            .count()
    }

    /// Take all events since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LayoutConfig;
    use crate::sim::layout;

    fn world() -> World {
        let config = SimConfig::default();
        let layout = layout::build(&LayoutConfig::default());
        World::new(config, layout)
    }

    #[test]
    fn test_new_world_has_primary_ball() {
        let world = world();
        assert_eq!(world.ball_count(), 1);
        let ball = &world.balls()[0];
        assert_eq!(ball.pos, Vec2::ZERO);
        assert!((ball.vel.length() - world.config.ball_speed).abs() < 1e-5);
        let expected = Vec2::from(PRIMARY_HEADING).normalize();
        assert!((ball.heading() - expected).length() < 1e-6);
        assert_eq!(ball.phase(), BallPhase::Seeking);
    }

    #[test]
    fn test_spawn_uses_primary_position_and_cone() {
        let mut world = world();
        world.ball_mut(0).unwrap().pos = Vec2::new(1.0, -2.0);
        world.spawn_balls(20);
        assert_eq!(world.ball_count(), 21);

        let (lo, hi) = world.config.spawn_cone();
        for ball in &world.balls()[1..] {
            assert_eq!(ball.pos, Vec2::new(1.0, -2.0));
            assert!((ball.vel.length() - world.config.ball_speed).abs() < 1e-4);
            let theta = ball.vel.y.atan2(ball.vel.x);
            assert!(theta >= lo - 1e-5 && theta <= hi + 1e-5, "theta {theta}");
            assert!(ball.color[..3].iter().all(|c| (0.0..COLOR_CEILING).contains(c)));
            assert_eq!(ball.color[3], 1.0);
        }
    }

    #[test]
    fn test_reset_then_spawn_reuses_pool() {
        let mut world = world();
        world.spawn_balls(5);
        let ids: Vec<u32> = world.balls().iter().map(|b| b.id).collect();
        world.ball_mut(3).unwrap().time_to_skip = 1.0;

        world.reset_balls();
        assert_eq!(world.ball_count(), 1);
        assert_eq!(world.pool_size(), 6);
        assert_eq!(world.balls()[0].pos, Vec2::ZERO);

        world.spawn_balls(7);
        assert_eq!(world.ball_count(), 8);
        assert_eq!(world.pool_size(), 8);
        let reused: Vec<u32> = world.balls()[..6].iter().map(|b| b.id).collect();
        assert_eq!(reused, ids);
        assert!(world.balls().iter().all(|b| b.visible));
        assert_eq!(world.balls()[3].time_to_skip, 0.0);
    }

    #[test]
    fn test_spawn_is_deterministic_for_a_seed() {
        let mut a = world();
        let mut b = world();
        a.spawn_balls(10);
        b.spawn_balls(10);
        for (x, y) in a.balls().iter().zip(b.balls()) {
            assert_eq!(x.vel, y.vel);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn test_zero_direction_is_stationary_not_nan() {
        let mut world = world();
        world.send_in_direction(0, Vec2::ZERO);
        let ball = &world.balls()[0];
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.heading(), Vec2::ZERO);
    }

    #[test]
    fn test_phase_reflects_schedule() {
        let mut ball = Ball::new(0, Vec2::ZERO, 0.1, [1.0; 4]);
        ball.pending_target = Some(2);
        assert_eq!(ball.phase(), BallPhase::Scheduled);
        ball.time_to_skip = 0.5;
        assert_eq!(ball.phase(), BallPhase::Coasting);
        ball.clear_schedule();
        assert_eq!(ball.phase(), BallPhase::Seeking);
    }
}
