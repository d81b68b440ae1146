//! Agent API for move selection, and the atomic AI turn.

use rand::Rng;
use tracing::{debug, warn};

use tessera_engine::{next_turn, place_tiles_on_board, GameState, RuleError, Strategy, TurnOutcome};

use crate::chooser::{choose_best_move_as, perform_draft};
use crate::moves::{enumerate_moves, Move};

/// Anything that can pick a move for the player whose turn it is.
pub trait Agent {
    /// Choose a legal move for `state.current_player`.
    ///
    /// Returns `None` only when no legal move exists. May use `rng` for tie-breaks
    /// or exploration.
    fn select_move(&mut self, state: &GameState, rng: &mut impl Rng) -> Option<Move>;
}

/// Plays the heuristic scorer.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeuristicAgent {
    /// `None` uses whatever strategy the acting seat carries.
    strategy: Option<Strategy>,
}

impl HeuristicAgent {
    /// Score with each seat's own strategy.
    pub fn seat_strategy() -> Self {
        Self { strategy: None }
    }

    /// Score every seat with `strategy`, including seats that have none.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy: Some(strategy),
        }
    }
}

impl Agent for HeuristicAgent {
    fn select_move(&mut self, state: &GameState, rng: &mut impl Rng) -> Option<Move> {
        let player = state.current_player();
        let strategy = self.strategy.or(player.strategy);
        choose_best_move_as(strategy, player, state, rng)
    }
}

/// Uniformly samples from the legal moves
#[derive(Clone, Debug, Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, state: &GameState, rng: &mut impl Rng) -> Option<Move> {
        let moves = enumerate_moves(state.current_player(), state);
        if moves.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..moves.len());
        Some(moves[idx])
    }
}

/// One complete turn for the current player: select, draft, place, advance.
pub fn play_turn(
    agent: &mut impl Agent,
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<TurnOutcome, RuleError> {
    if state.game_over {
        return Err(RuleError::GameOver);
    }
    let mv = agent.select_move(state, rng);
    commit_move(state, mv, rng)
}

/// Draft and place an already selected move, then advance the turn.
///
/// `None` means no legal move existed: the round is already exhausted, so the turn
/// goes straight to `next_turn`.
pub fn commit_move(
    state: &mut GameState,
    mv: Option<Move>,
    rng: &mut impl Rng,
) -> Result<TurnOutcome, RuleError> {
    if state.game_over {
        return Err(RuleError::GameOver);
    }

    match mv {
        Some(mv) => {
            let placement = perform_draft(state, &mv)?;
            debug!(
                player = state.current_player,
                source = ?mv.source,
                color = ?placement.color,
                count = placement.count,
                target = ?placement.target,
                "ai move"
            );
            place_tiles_on_board(state, placement.color, placement.count, placement.target);
        }
        None => {
            warn!(player = state.current_player, "no legal move, advancing turn");
        }
    }

    Ok(next_turn(state, rng))
}

/// The AI turn for the acting seat, scored with that seat's own strategy.
pub fn play_ai_turn(state: &mut GameState, rng: &mut impl Rng) -> Result<TurnOutcome, RuleError> {
    play_turn(&mut HeuristicAgent::seat_strategy(), state, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tessera_engine::{
        check_tile_conservation, create_initial_game_state, placement_is_legal, Color, Destination,
        PlayerState, Token,
    };

    #[test]
    fn test_random_agent_selects_legal_move() {
        let mut rng = StdRng::seed_from_u64(42);
        let state = create_initial_game_state("local", 3, &mut rng);
        let legal = enumerate_moves(state.current_player(), &state);

        let mut agent = RandomAgent::new();
        for _ in 0..100 {
            let mv = agent.select_move(&state, &mut rng).unwrap();
            assert!(legal.contains(&mv));
            assert!(placement_is_legal(state.current_player(), mv.color, mv.target));
        }
    }

    #[test]
    fn test_explicit_strategy_overrides_seat() {
        let state = GameState {
            players: vec![PlayerState::new("local", "Player (You)", None)],
            factories: vec![vec![Color::Black; 3]],
            center: vec![Token::FirstPlayerMarker],
            ..GameState::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        // Greedy wants the exact fit on line 2
        let mut greedy = HeuristicAgent::with_strategy(Strategy::Greedy);
        for _ in 0..20 {
            let mv = greedy.select_move(&state, &mut rng).unwrap();
            assert_eq!(mv.target, Destination::PatternLine(2));
        }
    }

    #[test]
    fn test_no_move_advances_turn() {
        let mut state = GameState {
            players: vec![
                PlayerState::new("local", "Player (You)", None),
                PlayerState::new("AI-1", "Ada", Some(Strategy::Defensive)),
            ],
            factories: vec![Vec::new(); 5],
            center: vec![Token::FirstPlayerMarker],
            current_player: 1,
            ..GameState::default()
        };
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(HeuristicAgent::seat_strategy().select_move(&state, &mut rng), None);
        assert_eq!(
            play_ai_turn(&mut state, &mut rng).unwrap(),
            TurnOutcome::RoundEnded
        );
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_ai_plays_full_game() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut state = create_initial_game_state("local", 4, &mut rng);
        let mut agent = HeuristicAgent::with_strategy(Strategy::Greedy);

        let mut turns = 0;
        while !state.game_over {
            let outcome = if state.current_player().is_ai {
                play_ai_turn(&mut state, &mut rng).unwrap()
            } else {
                play_turn(&mut agent, &mut state, &mut rng).unwrap()
            };
            assert!(check_tile_conservation(&state).is_ok());
            if outcome == TurnOutcome::GameOver {
                assert!(state.game_over);
            }
            turns += 1;
            assert!(turns < 2000, "game did not finish");
        }

        assert!(state.players.iter().any(|p| p.has_complete_row()));
        assert!(matches!(
            play_ai_turn(&mut state, &mut rng),
            Err(RuleError::GameOver)
        ));
    }
}
