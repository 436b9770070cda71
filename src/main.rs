//! Hot-seat Azul at the console
//!
//! Usage: cargo run -- [--players 3] [--seed 42] [--config game.toml] [--json]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use azul_rules::display::{format_move, ConsoleReporter, BOLD, RESET};
use azul_rules::{Game, GameConfig, GameEvent, Move};

/// Play Azul with 2-4 players sharing one terminal
#[derive(Parser, Debug)]
#[command(name = "azul-rules")]
#[command(about = "Hot-seat Azul at the console", long_about = None)]
struct Args {
    /// Number of players (2-4)
    #[arg(long)]
    players: Option<u8>,

    /// Random seed for the tile bag
    #[arg(long)]
    seed: Option<u64>,

    /// Player who acts first in round 1
    #[arg(long)]
    first_player: Option<u8>,

    /// TOML game configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON line per event with a snapshot of the game
    #[arg(long)]
    json: bool,
}

/// Ask the current player for a move. None means quit.
fn prompt_move(game: &Game) -> io::Result<Option<Move>> {
    let moves = game.legal_moves();
    let player = game.current_player();

    println!("{BOLD}Player {player}, your legal moves:{RESET}");
    for (i, mv) in moves.iter().enumerate() {
        println!("  {}: {}", i, format_move(mv));
    }

    loop {
        print!("\n{BOLD}Enter move number:{RESET} ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }

        let input = input.trim();
        if input == "q" || input == "quit" {
            return Ok(None);
        }

        match input.parse::<usize>() {
            Ok(idx) if idx < moves.len() => return Ok(Some(moves[idx])),
            Ok(_) => println!("Invalid move number. Enter 0-{}", moves.len() - 1),
            Err(_) => println!("Please enter a number (or 'q' to quit)"),
        }
    }
}

fn emit(
    events: &[GameEvent],
    game: &Game,
    reporter: &mut ConsoleReporter,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        for event in events {
            let line = serde_json::json!({ "event": event, "game": game.view() });
            println!("{}", serde_json::to_string(&line)?);
        }
    } else {
        print!("{}", reporter.report(events, game));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(first) = args.first_player {
        config.first_player = first;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    info!(players = config.players, seed = ?config.seed, "starting game");
    let mut rng = Game::rng(&config);
    let (mut game, events) = Game::start(config, &mut rng)?;
    let mut reporter = ConsoleReporter::new();

    if !args.json {
        println!("\n{BOLD}Welcome to Azul!{RESET}");
        println!("Type 'q' to quit at any time.");
    }
    emit(&events, &game, &mut reporter, args.json)?;

    while !game.is_finished() {
        let Some(mv) = prompt_move(&game)? else {
            println!("Goodbye!");
            return Ok(());
        };

        let player = game.current_player();
        match game.apply(player, mv, &mut rng) {
            Ok(events) => emit(&events, &game, &mut reporter, args.json)?,
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}
