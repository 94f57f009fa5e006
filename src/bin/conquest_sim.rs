//! Headless game driver
//! Plays a full game with uniformly random legal moves and prints a JSON summary

use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;

use hex_conquest::core::types::{Color, FactionId};
use hex_conquest::terrain::Layout;
use hex_conquest::turn::{start_game, EventLog, SchedulerEvent, Wait};
use hex_conquest::{GameConfig, Result};

/// Conquest sim - random factions fight over a hex island
#[derive(Parser, Debug)]
#[command(name = "conquest_sim")]
#[command(about = "Run a headless conquest game with random movers")]
struct Args {
    /// Game seed (terrain, strongholds and combat)
    #[arg(long, default_value_t = 42)]
    seed: u32,

    /// Seed for the random move picker; defaults to the game seed
    #[arg(long)]
    driver_seed: Option<u64>,

    /// Number of factions (clamped to 2..=6)
    #[arg(long)]
    players: Option<u32>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text layout file; a generated island is used when absent
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Radius of the generated island
    #[arg(long, default_value_t = 5)]
    radius: u32,

    /// Rounds before the game is called a stalemate
    #[arg(long, default_value_t = 200)]
    max_rounds: u32,

    /// Chance that a mover passes instead of moving
    #[arg(long, default_value_t = 0.0)]
    pass_chance: f64,

    /// Log every move
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Print the layout in the text map format and exit
    #[arg(long, default_value_t = false)]
    print_layout: bool,
}

#[derive(Serialize)]
struct FactionSummary {
    id: FactionId,
    nickname: String,
    color: Color,
    alive: bool,
    strength: u32,
    strongholds: usize,
}

#[derive(Serialize)]
struct Summary {
    seed: u32,
    rounds: u32,
    finished: bool,
    winner: Option<FactionId>,
    moves: usize,
    skipped_turns: usize,
    eliminated: Vec<FactionId>,
    factions: Vec<FactionSummary>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "hex_conquest=debug"
    } else {
        "hex_conquest=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(players) = args.players {
        config.player_count = players;
    }

    let layout = match &args.layout {
        Some(path) => Layout::parse(&std::fs::read_to_string(path)?),
        None => Layout::island(args.radius),
    };

    if args.print_layout {
        print!("{}", layout.to_text());
        return Ok(());
    }

    tracing::info!(
        "Starting game: seed {}, {} cells, {} players requested",
        args.seed,
        layout.len(),
        config.player_count
    );

    let mut driver = ChaCha8Rng::seed_from_u64(args.driver_seed.unwrap_or(args.seed as u64));
    let mut game = start_game(config, &layout, args.seed, EventLog::new())?;

    for error in &game.generation_report().errors {
        tracing::warn!("Layout problem: {}", error);
    }

    while !game.is_over() && game.round() < args.max_rounds {
        let Some(wait) = game.pending_wait() else {
            break;
        };
        tracing::trace!("round {}: waiting on {}", game.round(), wait.faction());
        let event = match wait {
            Wait::Camera { .. } | Wait::Settle { .. } => SchedulerEvent::TimerElapsed,
            Wait::Input { legal, .. } => {
                if args.pass_chance > 0.0 && driver.gen_bool(args.pass_chance.min(1.0)) {
                    SchedulerEvent::InputReceived(None)
                } else {
                    SchedulerEvent::InputReceived(legal.choose(&mut driver).copied())
                }
            }
        };
        game.handle(event)?;
    }

    if !game.is_over() {
        tracing::warn!("No winner after {} rounds", game.round());
    }

    let factions = game
        .board()
        .factions()
        .iter()
        .map(|f| FactionSummary {
            id: f.id,
            nickname: f.nickname.clone(),
            color: f.color,
            alive: f.alive,
            strength: game.board().total_strength(f.id),
            strongholds: game.board().owned_count(f.id),
        })
        .collect();

    let log = game.observer();
    let summary = Summary {
        seed: game.seed(),
        rounds: game.round(),
        finished: game.is_over(),
        winner: game.winner(),
        moves: log.moves().count(),
        skipped_turns: log.skips(),
        eliminated: log.eliminations(),
        factions,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
