//! Adaptive stress tester
//!
//! Keeps adding balls until the frame rate collapses, records how many
//! balls that took, resets and repeats. The host feeds it measured frame
//! times; it never reads a clock itself, so it runs the same under test.

use std::collections::VecDeque;

use crate::lerp;
use crate::settings::StressConfig;
use crate::sim::World;

/// Frames the window must hold before a collapse is trusted
const MIN_WINDOW_FRAMES: usize = 50;
/// Frame rate at which spawning runs at full `balls_to_add`
const TARGET_FPS: f32 = 60.0;

/// What the tester is doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StressPhase {
    /// Measuring and spawning
    Running,
    /// Waiting after a collapse before the next run
    Cooldown { remaining: f32 },
    /// All runs recorded
    Finished,
}

#[derive(Debug, Clone)]
pub struct StressTester {
    config: StressConfig,
    frame_times: VecDeque<f32>,
    /// Sum of `frame_times`
    total_time: f32,
    average_fps: f32,
    last_now: f32,
    results: Vec<usize>,
    phase: StressPhase,
}

impl StressTester {
    pub fn new(config: StressConfig) -> Self {
        let phase = if config.balls_to_add == 0 || config.total_runs == 0 {
            StressPhase::Finished
        } else {
            StressPhase::Running
        };
        Self {
            config,
            frame_times: VecDeque::new(),
            total_time: 0.0,
            average_fps: 0.0,
            last_now: 0.0,
            results: Vec::new(),
            phase,
        }
    }

    /// Feed one frame: `frame_dt` is the real frame time, `now` the time since start
    pub fn update(&mut self, world: &mut World, frame_dt: f32, now: f32) {
        let last_now = std::mem::replace(&mut self.last_now, now);

        match self.phase {
            StressPhase::Finished => return,
            StressPhase::Cooldown { remaining } => {
                let remaining = remaining - frame_dt;
                self.phase = if remaining > 0.0 {
                    StressPhase::Cooldown { remaining }
                } else {
                    log::info!("Stress run {} starting", self.results.len() + 1);
                    StressPhase::Running
                };
                return;
            }
            StressPhase::Running => {}
        }

        self.record_frame(frame_dt);

        let window = self.config.time_window;
        if now >= window
            && crossed(last_now, now, window)
            && self.frame_times.len() > MIN_WINDOW_FRAMES
            && self.average_fps < self.config.min_fps
        {
            self.end_run(world);
            return;
        }

        if crossed(last_now, now, 1.0) {
            let count = self.spawn_count();
            world.spawn_balls(count);
        }
    }

    fn record_frame(&mut self, frame_dt: f32) {
        self.frame_times.push_back(frame_dt);
        self.total_time += frame_dt;
        while self.total_time > self.config.time_window {
            let Some(oldest) = self.frame_times.pop_front() else {
                break;
            };
            self.total_time -= oldest;
        }
        if !self.frame_times.is_empty() && self.total_time > 0.0 {
            self.average_fps = self.frame_times.len() as f32 / self.total_time;
        }
    }

    /// Balls to add this second: more when the frame rate has headroom
    pub fn spawn_count(&self) -> usize {
        let t = (self.average_fps / TARGET_FPS).clamp(0.0, 1.0);
        lerp(1.0, self.config.balls_to_add as f32, t).round() as usize
    }

    fn end_run(&mut self, world: &mut World) {
        let balls = world.ball_count();
        log::warn!(
            "Average FPS {:.1} is low with {} balls",
            self.average_fps,
            balls
        );
        self.results.push(balls);
        world.reset_balls();

        if self.results.len() >= self.config.total_runs {
            self.phase = StressPhase::Finished;
            if let Some(average) = self.average_result() {
                log::info!(
                    "Stress test finished: {} balls on average over {} runs",
                    average,
                    self.results.len()
                );
            }
        } else {
            self.phase = StressPhase::Cooldown {
                remaining: self.config.cooldown,
            };
        }
    }

    pub fn average_fps(&self) -> f32 {
        self.average_fps
    }

    pub fn phase(&self) -> StressPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == StressPhase::Finished
    }

    /// Ball counts at which each run collapsed
    pub fn results(&self) -> &[usize] {
        &self.results
    }

    /// Rounded mean of the recorded runs
    pub fn average_result(&self) -> Option<usize> {
        if self.results.is_empty() {
            return None;
        }
        let sum: usize = self.results.iter().sum();
        Some((sum as f32 / self.results.len() as f32).round() as usize)
    }
}

/// Whether a multiple of `period` lies in (from, to]
fn crossed(from: f32, to: f32, period: f32) -> bool {
    (to / period).floor() > (from / period).floor()
}
