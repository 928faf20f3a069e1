//! Simulation settings
//!
//! Everything that shapes gameplay feel or stress-test behavior is loaded
//! from a JSON file. Missing fields fall back to the defaults in
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Ball motion and collision tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Radius shared by every ball
    pub ball_radius: f32,
    /// Constant ball speed (units/s); every bounce renormalizes to this
    pub ball_speed: f32,
    /// Fixed timestep the host should tick with
    pub sim_dt: f32,
    /// Maximum sweep distance when looking for the next obstacle
    pub look_ahead: f32,
    /// Spawn heading range (radians)
    pub spawn_cone_min: f32,
    pub spawn_cone_max: f32,
    /// Lateral term added at the paddle edge
    pub paddle_influence: f32,
    /// Paddle speed at full input
    pub paddle_speed: f32,
    /// Seed for spawn headings and colors
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            sim_dt: SIM_DT,
            look_ahead: LOOK_AHEAD_DISTANCE,
            spawn_cone_min: SPAWN_CONE_MIN,
            spawn_cone_max: SPAWN_CONE_MAX,
            paddle_influence: PADDLE_INFLUENCE,
            paddle_speed: PADDLE_SPEED,
            seed: 0x5eed,
        }
    }
}

impl SimConfig {
    /// Distance a ball covers in one fixed step
    #[inline]
    pub fn step_distance(&self, dt: f32) -> f32 {
        self.ball_speed * dt
    }

    /// Spawn cone bounds, ordered low to high
    pub fn spawn_cone(&self) -> (f32, f32) {
        if self.spawn_cone_min <= self.spawn_cone_max {
            (self.spawn_cone_min, self.spawn_cone_max)
        } else {
            (self.spawn_cone_max, self.spawn_cone_min)
        }
    }
}

/// Arena layout parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Orthographic half height of the view
    pub half_height: f32,
    /// Width / height
    pub aspect: f32,
    /// Number of bricks requested (rounded down to a full pyramid)
    pub brick_count: u32,
    /// Bottom of the brick band
    pub brick_band_bottom: f32,
    /// Height of the brick band
    pub brick_band_height: f32,
    /// Whether to place a paddle
    pub paddle: bool,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Vertical center of the paddle
    pub paddle_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            half_height: VIEW_HALF_HEIGHT,
            aspect: VIEW_ASPECT,
            brick_count: BRICK_COUNT,
            brick_band_bottom: 1.0,
            brick_band_height: 3.5,
            paddle: true,
            paddle_width: 1.6,
            paddle_height: 0.2,
            paddle_y: -4.2,
        }
    }
}

impl LayoutConfig {
    pub fn half_width(&self) -> f32 {
        self.half_height * self.aspect
    }

    pub fn wall_thickness(&self) -> f32 {
        self.half_width() * 2.0 * WALL_THICKNESS_RATIO
    }
}

/// Stress tester parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StressConfig {
    /// Sliding window for the average FPS (seconds)
    pub time_window: f32,
    /// Upper bound on balls spawned per second (at 60 FPS or better)
    pub balls_to_add: u32,
    /// A run ends when the average drops below this
    pub min_fps: f32,
    /// Pause after a run ends (seconds)
    pub cooldown: f32,
    /// Runs to average before finishing
    pub total_runs: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            time_window: 5.0,
            balls_to_add: 50,
            min_fps: 30.0,
            cooldown: 5.0,
            total_runs: 3,
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub sim: SimConfig,
    pub layout: LayoutConfig,
    pub stress: StressConfig,
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "sim": { "ball_speed": 8.0 } }"#).unwrap();
        assert_eq!(settings.sim.ball_speed, 8.0);
        assert_eq!(settings.sim.ball_radius, BALL_RADIUS);
        assert_eq!(settings.layout, LayoutConfig::default());
        assert_eq!(settings.stress, StressConfig::default());
    }

    #[test]
    fn test_json_roundtrip_preserves_tuning() {
        let mut settings = Settings::default();
        settings.layout.brick_count = 21;
        settings.sim.spawn_cone_max = 1.0;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_spawn_cone_is_ordered() {
        let config = SimConfig {
            spawn_cone_min: 2.0,
            spawn_cone_max: 1.0,
            ..Default::default()
        };
        assert_eq!(config.spawn_cone(), (1.0, 2.0));
    }

    #[test]
    fn test_wall_thickness_from_viewport() {
        let layout = LayoutConfig {
            half_height: 4.5,
            aspect: 16.0 / 9.0,
            ..Default::default()
        };
        assert!((layout.half_width() - 8.0).abs() < 1e-5);
        assert!((layout.wall_thickness() - 0.2).abs() < 1e-5);
    }
}
