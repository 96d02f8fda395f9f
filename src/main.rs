//! Cookout entry point
//!
//! Runs a headless session driven by the built-in autopilot and logs what
//! happens. Set `RUST_LOG=debug` (or `trace`) for per-brick and per-collision
//! detail.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use cookout::consts::TICK_RATE;
use cookout::sim::{GameEvent, GamePhase, GameState, autopilot, tick};
use cookout::{Error, Settings, StageSet};

/// Ten minutes of play
const DEFAULT_TICKS: u64 = 10 * 60 * TICK_RATE as u64;

#[derive(Debug, Default)]
struct Options {
    stages: Option<PathBuf>,
    settings: Option<PathBuf>,
    seed: Option<u64>,
    ticks: Option<u64>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Options::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| format!("{flag} requires a value"))
            };
            match arg.as_str() {
                "--stages" => options.stages = Some(value("--stages")?.into()),
                "--settings" => options.settings = Some(value("--settings")?.into()),
                "--seed" => {
                    let raw = value("--seed")?;
                    options.seed = Some(raw.parse().map_err(|_| format!("invalid seed `{raw}`"))?);
                }
                "--ticks" => {
                    let raw = value("--ticks")?;
                    options.ticks = Some(raw.parse().map_err(|_| format!("invalid tick count `{raw}`"))?);
                }
                other => return Err(format!("unknown argument `{other}`")),
            }
        }
        Ok(options)
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--stages PATH] [--settings PATH] [--seed N] [--ticks N]");
    eprintln!();
    eprintln!("  --stages PATH    stage file (JSON); defaults to the built-in stages");
    eprintln!("  --settings PATH  physics settings (JSON); missing fields use defaults");
    eprintln!("  --seed N         RNG seed (default: derived from the clock)");
    eprintln!("  --ticks N        ticks to simulate (default: {DEFAULT_TICKS})");
}

fn load(options: &Options) -> Result<(StageSet, Settings), Error> {
    let stages = match &options.stages {
        Some(path) => StageSet::load(path)?,
        None => StageSet::builtin()?,
    };
    let settings = match &options.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok((stages, settings))
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cookout");
    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        return ExitCode::SUCCESS;
    }

    let options = match Options::parse(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {message}");
            print_usage(program);
            return ExitCode::from(2);
        }
    };

    let (stages, settings) = match load(&options) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let seed = options.seed.unwrap_or_else(clock_seed);
    let ticks = options.ticks.unwrap_or(DEFAULT_TICKS);
    log::info!(
        "Cookout starting: {} stages, seed {}, {} ticks",
        stages.len(),
        seed,
        ticks
    );

    let mut state = GameState::new(seed, stages, settings);
    for _ in 0..ticks {
        let input = autopilot(&state);
        tick(&mut state, &input);

        for event in &state.events {
            match event {
                GameEvent::StageStarted { stage } => log::info!("Stage {} started", stage),
                GameEvent::BallSpawned { id } => log::debug!("Extra ball {} in play", id),
                GameEvent::RewardCollected { points, powerup } => {
                    log::debug!("Caught reward: +{} {:?}", points, powerup)
                }
                _ => log::trace!("{:?}", event),
            }
        }

        if matches!(state.phase, GamePhase::GameOver | GamePhase::Win) {
            break;
        }
    }

    let stats = &state.stats;
    log::info!(
        "Finished after {} ticks in {:?} on stage {}: score {}, lives {}, bricks {}, rewards {}/{}",
        state.time_ticks,
        state.phase,
        state.stage_number(),
        stats.score,
        stats.lives,
        stats.bricks_destroyed,
        stats.rewards_caught,
        stats.rewards_caught + stats.rewards_missed
    );
    println!(
        "{:?} stage={} score={} lives={} ticks={}",
        state.phase,
        state.stage_number(),
        stats.score,
        stats.lives,
        state.time_ticks
    );

    ExitCode::SUCCESS
}
