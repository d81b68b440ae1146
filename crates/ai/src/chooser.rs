//! Best-move selection with a random tie-break, and the draft half of a chosen move.

use rand::Rng;

use tessera_engine::{apply_draft, Color, Destination, GameState, PlayerState, RuleError, Strategy};

use crate::moves::{enumerate_moves, Move};
use crate::scoring::score_move_as;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Every legal move with its score under `strategy`, in enumeration order.
pub fn rank_moves(
    strategy: Option<Strategy>,
    player: &PlayerState,
    state: &GameState,
) -> Vec<ScoredMove> {
    enumerate_moves(player, state)
        .into_iter()
        .map(|mv| ScoredMove {
            mv,
            score: score_move_as(strategy, player, state, &mv),
        })
        .collect()
}

/// Highest-scoring move for `player` under its own strategy. `None` when no move exists.
pub fn choose_best_move(
    player: &PlayerState,
    state: &GameState,
    rng: &mut impl Rng,
) -> Option<Move> {
    choose_best_move_as(player.strategy, player, state, rng)
}

/// Highest-scoring move under `strategy`; ties are broken uniformly at random.
pub fn choose_best_move_as(
    strategy: Option<Strategy>,
    player: &PlayerState,
    state: &GameState,
    rng: &mut impl Rng,
) -> Option<Move> {
    let ranked = rank_moves(strategy, player, state);
    let best = ranked.iter().map(|m| m.score).max()?;
    let tied: Vec<Move> = ranked
        .into_iter()
        .filter(|m| m.score == best)
        .map(|m| m.mv)
        .collect();

    let idx = rng.random_range(0..tied.len());
    Some(tied[idx])
}

/// What the caller needs to finish a move with `place_tiles_on_board`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Placement {
    pub color: Color,
    pub count: u8,
    pub target: Destination,
}

/// Apply the draft half of `mv` for the current player.
///
/// `count` is what was actually taken, which can differ from `mv.count` if the
/// state changed since the move was generated.
pub fn perform_draft(state: &mut GameState, mv: &Move) -> Result<Placement, RuleError> {
    let draft = apply_draft(state, mv.source, mv.color)?;
    Ok(Placement {
        color: draft.color,
        count: draft.count,
        target: mv.target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tessera_engine::{DraftSource, Token};

    fn two_factory_state() -> GameState {
        GameState {
            players: vec![
                PlayerState::new("local", "Player (You)", None),
                PlayerState::new("AI-1", "Ada", Some(Strategy::Greedy)),
            ],
            factories: vec![vec![Color::Red, Color::Red], vec![Color::Blue, Color::Blue]],
            center: vec![Token::FirstPlayerMarker],
            current_player: 1,
            ..GameState::default()
        }
    }

    #[test]
    fn test_best_move_has_top_score() {
        let state = two_factory_state();
        let player = &state.players[1];
        let ranked = rank_moves(player.strategy, player, &state);
        let top = ranked.iter().map(|m| m.score).max().unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let mv = choose_best_move(player, &state, &mut rng).unwrap();
        assert_eq!(crate::scoring::score_move(player, &state, &mv), top);
        // Two tiles exactly filling line 1: 2 * 2 + 5
        assert_eq!(top, 9);
        assert_eq!(mv.target, Destination::PatternLine(1));
    }

    #[test]
    fn test_tie_break_reaches_every_tied_move() {
        let state = two_factory_state();
        let player = &state.players[1];
        let mut rng = StdRng::seed_from_u64(1234);

        let mut red = 0;
        let mut blue = 0;
        for _ in 0..400 {
            match choose_best_move(player, &state, &mut rng).map(|m| m.color) {
                Some(Color::Red) => red += 1,
                Some(Color::Blue) => blue += 1,
                other => panic!("unexpected choice {other:?}"),
            }
        }
        assert!(red > 100, "red chosen {red} times");
        assert!(blue > 100, "blue chosen {blue} times");
    }

    #[test]
    fn test_no_moves_yields_none() {
        let mut state = two_factory_state();
        state.factories = vec![Vec::new(); 2];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(choose_best_move(&state.players[1], &state, &mut rng), None);
    }

    #[test]
    fn test_perform_draft_reports_actual_count() {
        let mut state = two_factory_state();
        state.factories[0] = vec![Color::Red, Color::Red, Color::Red, Color::Teal];
        let mv = Move {
            source: DraftSource::Factory(0),
            color: Color::Red,
            count: 2,
            target: Destination::PatternLine(2),
        };

        let placement = perform_draft(&mut state, &mv).unwrap();
        assert_eq!(
            placement,
            Placement {
                color: Color::Red,
                count: 3,
                target: Destination::PatternLine(2)
            }
        );
        assert!(state.factories[0].is_empty());
        assert!(state.center.contains(&Token::Tile(Color::Teal)));
    }

    #[test]
    fn test_perform_draft_rejects_missing_color() {
        let mut state = two_factory_state();
        let before = state.clone();
        let mv = Move {
            source: DraftSource::Center,
            color: Color::Black,
            count: 1,
            target: Destination::Floor,
        };
        assert!(matches!(
            perform_draft(&mut state, &mv),
            Err(RuleError::ColorNotAtSource { .. })
        ));
        assert_eq!(state, before);
    }
}
