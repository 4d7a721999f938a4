//! go-playout: run Go playouts from the command line.
//!
//! ## Usage
//!
//! - `go-playout` - Show the ko demo
//! - `go-playout playout --count 10000` - Run playouts and print statistics
//! - `go-playout demo` - Play a ko sequence and print the board

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use go_playout::batch;
use go_playout::config::EngineConfig;
use go_playout::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI};
use go_playout::position::LibertyMode;
use go_playout::simulation::Simulation;

/// go-playout: a Go position engine and playout driver
#[derive(Parser)]
#[command(name = "go-playout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run playouts from the empty board and print win statistics
    Playout {
        /// Board size
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        /// Komi for White
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f64,
        /// Number of playouts
        #[arg(long, default_value_t = 1000)]
        count: usize,
        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Track pseudo-liberties instead of exact liberties
        #[arg(long)]
        pseudo: bool,
        /// Disable the mercy rule
        #[arg(long)]
        no_mercy: bool,
        /// Sample moves uniformly instead of from the probability map
        #[arg(long)]
        uniform: bool,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Play a short ko sequence and print the board
    Demo,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Playout {
            size,
            komi,
            count,
            seed,
            pseudo,
            no_mercy,
            uniform,
            threads,
        }) => {
            let mut config = EngineConfig::default();
            config.set("boardsize", &size.to_string())?;
            config.komi = komi;
            config.seed = seed;
            config.liberty_mode = if pseudo { LibertyMode::Pseudo } else { LibertyMode::Exact };
            config.mercy = !no_mercy;
            config.weighted = !uniform;
            run_playouts(config, count, threads)
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_playouts(config: EngineConfig, count: usize, threads: Option<usize>) -> Result<()> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build().context("failed to build the playout thread pool")?;

    go_playout::patterns::init_patterns();
    let template = Simulation::with_default_heuristics(config);
    info!(
        "running {count} playouts on {}x{} with {} threads",
        template.config().board_size,
        template.config().board_size,
        pool.current_num_threads()
    );

    let start = Instant::now();
    let stats = pool.install(|| batch::run_parallel(&template, count));
    let elapsed = start.elapsed();

    println!("playouts:    {}", stats.playouts);
    println!("black wins:  {} ({:.1}%)", stats.black_wins, stats.black_win_rate() * 100.0);
    println!("white wins:  {}", stats.white_wins);
    println!("mean score:  {:+.2}", stats.mean_score());
    println!(
        "endings:     {} double pass, {} mercy, {} length cap",
        stats.double_pass, stats.mercy, stats.length_cap
    );
    println!(
        "speed:       {:.0} playouts/s",
        stats.playouts as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("go-playout: ko demo\n");

    let mut sim = Simulation::new(EngineConfig::default());
    for mv in ["D5", "D4", "F5", "F4", "E6", "E3", "A1", "E5", "E4"] {
        let xy = sim
            .position()
            .geometry()
            .parse_coord(mv)
            .with_context(|| format!("bad coordinate {mv}"))?;
        sim.play(xy).with_context(|| format!("playing {mv}"))?;
    }
    println!("{}", sim.position());

    let ko = sim.position().ko_point;
    let geo = *sim.position().geometry();
    println!("ko point: {}", geo.str_coord(ko));
    match sim.position().check_move(ko) {
        Ok(()) => println!("white may retake at {}", geo.str_coord(ko)),
        Err(e) => println!("white retaking at {}: {e}", geo.str_coord(ko)),
    }

    let result = sim.playout();
    println!("\nafter a playout ({:?}, {} moves):", result.state, result.moves);
    println!("{}", sim.position());
    println!("score {:+.1}, winner {:?}", result.score, result.winner);
    Ok(())
}
