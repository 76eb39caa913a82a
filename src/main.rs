//! Flapsim native entry point
//!
//! Headless runner: plays autopilot rounds (or replays a command script)
//! through the same tick loop a windowed frontend would drive, logging results
//! and the session leaderboard.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;

use flapsim::sim::{Command, GamePhase, GameState, TickInput, tick};
use flapsim::{GameConfig, Leaderboard, RoundResult};

type RunResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "flapsim", about = "Run headless rounds of the flap simulation")]
struct Args {
    /// RNG seed for pipe gaps
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON config file (missing fields use the defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command script, one tick per line (e.g. `start`, `jump`, `restart`,
    /// `quit`; blank = idle). Replaces the autopilot.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Rounds to play before quitting
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Give up on a round after this many ticks
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,

    /// Sleep between ticks to run at the configured tick rate
    #[arg(long)]
    realtime: bool,

    /// Print the full state as JSON after every tick
    #[arg(long)]
    trace: bool,
}

fn main() -> RunResult {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    log::info!("Flapsim (native) starting, seed {}", args.seed);

    let mut state = GameState::new(config, args.seed);
    let mut board = Leaderboard::new();
    match &args.script {
        Some(path) => run_script(&mut state, &mut board, path, &args)?,
        None => run_autopilot(&mut state, &mut board, &args)?,
    }

    match board.best() {
        Some(best) => println!("best score: {} (round {})", best.score, best.round),
        None => println!("no rounds scored"),
    }
    for (i, result) in board.results().iter().enumerate() {
        println!(
            "{:>2}. {:>4} (round {}, {} ticks)",
            i + 1,
            result.score,
            result.round,
            result.ticks
        );
    }

    Ok(())
}

/// Autopilot rounds with restart until `--rounds` are done
fn run_autopilot(state: &mut GameState, board: &mut Leaderboard, args: &Args) -> RunResult {
    let tick_duration = Duration::from_secs_f64(state.config.tick_seconds());
    let mut input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    input.record(Command::Start);

    loop {
        let started = Instant::now();
        let phase = tick(state, &input);
        input.clear_commands();
        trace(state, args)?;

        match phase {
            GamePhase::Terminated => break,
            GamePhase::Lost => {
                report_round(state, board);
                let next = if state.round >= args.rounds {
                    Command::Quit
                } else {
                    Command::Restart
                };
                input.record(next);
            }
            GamePhase::Playing if state.ticks >= args.max_ticks => {
                log::warn!("Round {} hit the tick limit, stopping", state.round);
                report_round(state, board);
                input.record(Command::Quit);
            }
            _ => {}
        }

        pace(started, tick_duration, args.realtime);
    }
    Ok(())
}

/// Feed a command script through the tick loop, one line per tick
fn run_script(state: &mut GameState, board: &mut Leaderboard, path: &Path, args: &Args) -> RunResult {
    let script = std::fs::read_to_string(path)?;
    let tick_duration = Duration::from_secs_f64(state.config.tick_seconds());
    let mut reported_round = 0;

    for line in script.lines() {
        let started = Instant::now();
        let phase = tick(state, &TickInput::from_line(line));
        trace(state, args)?;

        match phase {
            GamePhase::Terminated => break,
            // Lost holds until restart; report each round once
            GamePhase::Lost if state.round != reported_round => {
                reported_round = state.round;
                report_round(state, board);
            }
            _ => {}
        }

        pace(started, tick_duration, args.realtime);
    }
    log::info!("Script {} finished in {:?}", path.display(), state.phase);
    Ok(())
}

fn report_round(state: &GameState, board: &mut Leaderboard) {
    let result = RoundResult::from_state(state);
    let rank = board.record(result);
    println!(
        "round {}: score {} after {} ticks ({:?}){}",
        result.round,
        result.score,
        result.ticks,
        result.cause,
        rank.map(|r| format!(", rank {r}")).unwrap_or_default()
    );
}

fn trace(state: &GameState, args: &Args) -> RunResult {
    if args.trace {
        println!("{}", serde_json::to_string(state)?);
    }
    Ok(())
}

fn pace(started: Instant, tick_duration: Duration, realtime: bool) {
    if realtime {
        if let Some(rest) = tick_duration.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
