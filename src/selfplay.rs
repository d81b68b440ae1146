//! Heuristic self-play
//!
//! Plays whole games with every seat driven by the move heuristic. The local
//! (human) seat has no strategy of its own, so it plays `local_strategy`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use tessera_ai::{commit_move, Agent, HeuristicAgent};
use tessera_engine::{
    check_tile_conservation, GameSession, GameState, PlayerIdx, RuleError, Strategy,
    TurnOutcome, ALL_STRATEGIES,
};

use crate::report::format_move;

pub const LOCAL_PLAYER_ID: &str = "local";

/// Configuration for a self-play run.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Number of games to play
    pub num_games: usize,

    /// Seats per game (2-4; other values use the 4-player factory table)
    pub num_players: usize,

    /// Base seed; game `i` is seeded with `seed + i`
    pub seed: u64,

    /// Strategy played for the local seat
    pub local_strategy: Strategy,

    /// Safety cap on turns per game
    pub max_turns: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            num_games: 100,
            num_players: 4,
            seed: 42,
            local_strategy: Strategy::Greedy,
            max_turns: 1000,
        }
    }
}

/// Outcome of a single game.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameRecord {
    pub final_scores: Vec<i16>,
    /// Strategy each seat was played with
    pub strategies: Vec<Strategy>,
    pub winners: Vec<PlayerIdx>,
    pub rounds: u16,
    pub turns: usize,
    /// Stopped at `max_turns` before the game ended
    pub truncated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrategyStats {
    pub strategy: Strategy,
    /// Seats played with this strategy, across all games
    pub seats: usize,
    /// Games won or shared
    pub wins: usize,
    pub mean_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelfPlaySummary {
    pub games: usize,
    pub truncated: usize,
    pub mean_rounds: f64,
    pub strategies: Vec<StrategyStats>,
    pub records: Vec<GameRecord>,
}

/// Play game number `game_index` to completion (or `max_turns`) and return the final
/// state with the number of turns taken.
pub fn play_to_end(
    config: &SelfPlayConfig,
    game_index: u64,
) -> Result<(GameState, usize), RuleError> {
    let rng = StdRng::seed_from_u64(config.seed.wrapping_add(game_index));
    let mut session = GameSession::new(LOCAL_PLAYER_ID, config.num_players, rng);
    let mut seats = HeuristicAgent::seat_strategy();
    let mut local = HeuristicAgent::with_strategy(config.local_strategy);

    let mut turns = 0;
    while !session.is_game_over() && turns < config.max_turns {
        let (state, rng) = session.parts_mut()?;
        let mv = if state.current_player().is_ai {
            seats.select_move(state, rng)
        } else {
            local.select_move(state, rng)
        };
        if let Some(mv) = &mv {
            trace!(seat = state.current_player, mv = %format_move(mv), "move");
        }
        let outcome = commit_move(state, mv, rng)?;
        turns += 1;

        if outcome == TurnOutcome::RoundEnded {
            check_tile_conservation(state)?;
            debug!(round = state.round, turns, "round finished");
        }
    }

    Ok((session.into_state(), turns))
}

/// Play game number `game_index` of a run and record its outcome.
#[instrument(skip(config), fields(players = config.num_players))]
pub fn play_game(config: &SelfPlayConfig, game_index: u64) -> Result<GameRecord, RuleError> {
    let (state, turns) = play_to_end(config, game_index)?;

    let record = GameRecord {
        final_scores: state.players.iter().map(|p| p.score).collect(),
        strategies: state
            .players
            .iter()
            .map(|p| p.strategy.unwrap_or(config.local_strategy))
            .collect(),
        winners: state.winners(),
        rounds: state.round,
        turns,
        truncated: !state.game_over,
    };
    debug!(scores = ?record.final_scores, winners = ?record.winners, "game recorded");
    Ok(record)
}

/// Play `config.num_games` games in parallel and aggregate the results.
#[instrument(skip_all, fields(games = config.num_games, players = config.num_players))]
pub fn run_selfplay(config: &SelfPlayConfig) -> Result<SelfPlaySummary, RuleError> {
    let records = (0..config.num_games as u64)
        .into_par_iter()
        .map(|i| play_game(config, i))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = summarize(records);
    info!(
        games = summary.games,
        truncated = summary.truncated,
        "self-play finished"
    );
    Ok(summary)
}

/// Aggregate per-strategy wins and mean scores over finished records.
pub fn summarize(records: Vec<GameRecord>) -> SelfPlaySummary {
    let strategies = ALL_STRATEGIES
        .iter()
        .map(|&strategy| {
            let mut seats = 0;
            let mut wins = 0;
            let mut total = 0i64;
            for record in &records {
                for (seat, (&s, &score)) in
                    record.strategies.iter().zip(&record.final_scores).enumerate()
                {
                    if s != strategy {
                        continue;
                    }
                    seats += 1;
                    total += score as i64;
                    if record.winners.contains(&(seat as PlayerIdx)) {
                        wins += 1;
                    }
                }
            }
            StrategyStats {
                strategy,
                seats,
                wins,
                mean_score: if seats > 0 {
                    total as f64 / seats as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    let games = records.len();
    let mean_rounds = if games > 0 {
        records.iter().map(|r| r.rounds as f64).sum::<f64>() / games as f64
    } else {
        0.0
    };

    SelfPlaySummary {
        games,
        truncated: records.iter().filter(|r| r.truncated).count(),
        mean_rounds,
        strategies,
        records,
    }
}
