//! Brick Sweep - a Breakout simulation core built around swept collisions
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (shapes, sweeps, skip scheduling, bounces)
//! - `renderer`: Instance data extraction for an external instanced renderer
//! - `settings`: Data-driven simulation, layout and stress-test tuning
//! - `stress`: Adaptive spawn-rate stress tester

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stress;

pub use settings::{LayoutConfig, Settings, SimConfig, StressConfig};
pub use stress::StressTester;

use glam::Vec2;

/// Simulation configuration defaults
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 0.02;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.09;
    pub const BALL_SPEED: f32 = 5.0;
    /// Initial heading of the primary ball (normalized on use)
    pub const PRIMARY_HEADING: [f32; 2] = [1.0, 0.05];

    /// How far ahead a seeking ball sweeps for obstacles
    pub const LOOK_AHEAD_DISTANCE: f32 = 15.0;

    /// Random spawn heading range (radians)
    pub const SPAWN_CONE_MIN: f32 = 0.0;
    pub const SPAWN_CONE_MAX: f32 = 0.8 * PI;

    /// Lateral velocity added at the paddle edge (before renormalizing)
    pub const PADDLE_INFLUENCE: f32 = 0.5;
    /// Paddle travel speed (units/s at full input)
    pub const PADDLE_SPEED: f32 = 5.0;

    /// Orthographic half height of the viewport
    pub const VIEW_HALF_HEIGHT: f32 = 5.0;
    pub const VIEW_ASPECT: f32 = 16.0 / 9.0;
    /// Wall thickness as a fraction of viewport width
    pub const WALL_THICKNESS_RATIO: f32 = 1.0 / 80.0;

    pub const BRICK_COUNT: u32 = 10;

    /// Ball color channels are drawn from [0, COLOR_CEILING)
    pub const COLOR_CEILING: f32 = 0.95;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
