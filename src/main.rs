//! Heuristic self-play CLI for Tessera
//!
//! Plays batches of games with every seat run by the move heuristic and reports
//! how each strategy fared.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tessera::report::{format_board, format_standings, format_summary};
use tessera::selfplay::{play_to_end, run_selfplay, SelfPlayConfig};
use tessera::Strategy;

/// Heuristic self-play for Tessera
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Play heuristic AI games and compare strategies", long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Players per game
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=4))]
    players: u8,

    /// Base seed; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Strategy for the local seat (greedy, defensive, wall-focused)
    #[arg(long, default_value = "greedy")]
    local_strategy: Strategy,

    /// Safety cap on turns per game
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print the final board and standings of the first game
    #[arg(long, default_value_t = false)]
    show_first: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = SelfPlayConfig {
        num_games: args.games,
        num_players: args.players as usize,
        seed: args.seed,
        local_strategy: args.local_strategy,
        max_turns: args.max_turns,
    };
    info!(?config, "starting self-play");

    if args.show_first {
        let (state, turns) = play_to_end(&config, 0)?;
        println!("{}", format_board(&state));
        println!("Final standings after {turns} turns:");
        println!("{}", format_standings(&state));
    }

    let summary = run_selfplay(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }

    Ok(())
}
