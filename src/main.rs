//! Brick Sweep entry point
//!
//! Headless native driver: loads settings, builds the arena and runs the
//! fixed-step loop. With `--stress` it measures real tick cost and lets
//! the stress tester push the ball count until the frame rate collapses.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use brick_sweep::consts::MAX_SUBSTEPS;
use brick_sweep::sim::{TickInput, World, layout};
use brick_sweep::{Settings, StressTester};

/// Simulated seconds to run without `--stress`
const DEFAULT_SECONDS: f32 = 10.0;

/// Brick Sweep - headless swept-collision Breakout simulation
#[derive(Debug, Parser)]
#[command(name = "brick-sweep", version)]
#[command(about = "Headless Breakout simulation with swept collisions", long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used when absent or invalid
    config: Option<PathBuf>,

    /// Run the adaptive stress test instead of a fixed-length run
    #[arg(long)]
    stress: bool,

    /// Simulated seconds for a fixed run, or a wall-clock limit with --stress
    #[arg(long)]
    seconds: Option<f32>,
}

/// Fixed-step run: one ball added per simulated second
fn run_fixed(world: &mut World, seconds: f32) {
    let dt = world.config.sim_dt;
    let ticks = (seconds / dt).round() as u64;
    let ticks_per_second = (1.0 / dt).round().max(1.0) as u64;
    let input = TickInput::default();
    let started = Instant::now();

    for i in 1..=ticks {
        world.tick(&input, dt);
        world.drain_events();
        if i % ticks_per_second == 0 {
            world.spawn_balls(1);
            log::info!(
                "t={:.0}s: {} balls, {} bricks remaining",
                i as f32 * dt,
                world.ball_count(),
                world.bricks_remaining()
            );
        }
    }

    log::info!(
        "Ran {} ticks in {:.2?}: {} balls, {} bricks remaining",
        ticks,
        started.elapsed(),
        world.ball_count(),
        world.bricks_remaining()
    );
}

/// Stress run: each frame ticks once and reports its wall-clock cost
fn run_stress(world: &mut World, tester: &mut StressTester, limit: Option<f32>) {
    let dt = world.config.sim_dt;
    let input = TickInput::default();
    let started = Instant::now();
    let mut accumulator = 0.0;
    let mut last = Instant::now();

    while !tester.is_finished() {
        let frame_start = Instant::now();
        let frame_dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;
        accumulator += frame_dt.max(dt);

        let mut substeps = 0;
        while accumulator >= dt && substeps < MAX_SUBSTEPS {
            world.tick(&input, dt);
            accumulator -= dt;
            substeps += 1;
        }
        // Drop backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            accumulator = 0.0;
        }
        world.drain_events();

        let now = started.elapsed().as_secs_f32();
        if frame_dt > 0.0 {
            tester.update(world, frame_dt, now);
        }

        if limit.is_some_and(|limit| now >= limit) {
            log::warn!(
                "Stress test stopped after {:.0}s with {} balls ({:.1} FPS)",
                now,
                world.ball_count(),
                tester.average_fps()
            );
            break;
        }
    }

    if let Some(average) = tester.average_result() {
        println!("Average balls at collapse: {average} ({:?})", tester.results());
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    log::info!("Brick Sweep (native) starting...");
    let settings = Settings::load(args.config.as_deref());
    let layout = layout::build(&settings.layout);
    let mut world = World::new(settings.sim.clone(), layout);

    if args.stress {
        let mut tester = StressTester::new(settings.stress.clone());
        run_stress(&mut world, &mut tester, args.seconds);
    } else {
        run_fixed(&mut world, args.seconds.unwrap_or(DEFAULT_SECONDS));
    }
}
