//! Draft-then-place turn protocol for a single game.
//!
//! A human turn is split in two: `draft` takes tiles from a source, `place` puts them
//! on a pattern line or the floor. Between the two the draft can be cancelled, which
//! restores the pieces of state a draft touches from a `DraftSnapshot`. Once placed,
//! the move is final: the seat cannot draft again until `advance_turn` closes the turn.

use rand::Rng;
use tracing::debug;

use crate::error::RuleError;
use crate::rules::{
    apply_draft, check_round_end, create_initial_game_state, next_turn, place_tiles_on_board, placement_is_legal,
    Draft, TurnOutcome,
};
use crate::types::{Color, Destination, DraftSource, GameState, PlayerIdx, Token, BOARD_SIZE};

/// Everything `apply_draft` can change, captured before it runs.
#[derive(Clone, Debug, PartialEq)]
pub struct DraftSnapshot {
    factories: Vec<Vec<Color>>,
    center: Vec<Token>,
    player: PlayerIdx,
    floor: Vec<Token>,
    first_player_token_holder: Option<PlayerIdx>,
}

impl DraftSnapshot {
    pub fn capture(state: &GameState) -> Self {
        DraftSnapshot {
            factories: state.factories.clone(),
            center: state.center.clone(),
            player: state.current_player,
            floor: state.current_player().floor.clone(),
            first_player_token_holder: state.first_player_token_holder,
        }
    }

    pub fn restore(self, state: &mut GameState) {
        state.factories = self.factories;
        state.center = self.center;
        state.players[self.player as usize].floor = self.floor;
        state.first_player_token_holder = self.first_player_token_holder;
    }
}

#[derive(Clone, Debug)]
struct PendingDraft {
    draft: Draft,
    snapshot: DraftSnapshot,
}

/// One game and its random source, driven through draft / place / advance commands.
pub struct GameSession<R: Rng> {
    state: GameState,
    rng: R,
    pending: Option<PendingDraft>,
    /// The current seat has placed its move for this turn.
    placed: bool,
}

impl<R: Rng> GameSession<R> {
    pub fn new(local_player_id: &str, num_players: usize, mut rng: R) -> Self {
        let state = create_initial_game_state(local_player_id, num_players, &mut rng);
        Self::from_state(state, rng)
    }

    /// Resume a game from a stored snapshot.
    pub fn from_state(state: GameState, rng: R) -> Self {
        GameSession {
            state,
            rng,
            pending: None,
            placed: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    /// The draft waiting for a destination, if any.
    pub fn pending_draft(&self) -> Option<Draft> {
        self.pending.as_ref().map(|p| p.draft)
    }

    /// Whether the current seat has already placed its move this turn.
    pub fn turn_placed(&self) -> bool {
        self.placed
    }

    /// Lend out the state and RNG for an atomic turn. Refused while a draft is pending
    /// or after this turn's move was placed.
    pub fn parts_mut(&mut self) -> Result<(&mut GameState, &mut R), RuleError> {
        self.ensure_ready()?;
        if self.placed {
            return Err(RuleError::TurnComplete);
        }
        Ok((&mut self.state, &mut self.rng))
    }

    fn ensure_ready(&self) -> Result<(), RuleError> {
        if self.state.game_over {
            return Err(RuleError::GameOver);
        }
        if self.pending.is_some() {
            return Err(RuleError::PlacementPending);
        }
        Ok(())
    }

    /// First half of a turn: take all `color` tiles from `source`.
    pub fn draft(&mut self, source: DraftSource, color: Color) -> Result<Draft, RuleError> {
        self.ensure_ready()?;
        if self.placed {
            return Err(RuleError::TurnComplete);
        }

        let snapshot = DraftSnapshot::capture(&self.state);
        let draft = apply_draft(&mut self.state, source, color)?;
        debug!(
            player = self.state.current_player,
            ?source,
            ?color,
            count = draft.count,
            "tiles drafted"
        );

        self.pending = Some(PendingDraft { draft, snapshot });
        Ok(draft)
    }

    /// Destinations the pending draft may go to. Empty when nothing is pending.
    pub fn legal_destinations(&self) -> Vec<Destination> {
        let Some(pending) = &self.pending else {
            return Vec::new();
        };
        let player = self.state.current_player();
        (0..BOARD_SIZE as u8)
            .map(Destination::PatternLine)
            .chain([Destination::Floor])
            .filter(|&dest| placement_is_legal(player, pending.draft.color, dest))
            .collect()
    }

    /// Second half of a turn: put the pending tiles on `dest`.
    pub fn place(&mut self, dest: Destination) -> Result<(), RuleError> {
        let Some(pending) = &self.pending else {
            return Err(RuleError::NoPendingDraft);
        };
        let Draft { color, count, .. } = pending.draft;
        if !placement_is_legal(self.state.current_player(), color, dest) {
            return Err(RuleError::IllegalPlacement { color, dest });
        }

        place_tiles_on_board(&mut self.state, color, count, dest);
        self.pending = None;
        self.placed = true;
        Ok(())
    }

    /// Undo the pending draft.
    pub fn cancel_draft(&mut self) -> Result<(), RuleError> {
        let pending = self.pending.take().ok_or(RuleError::NoPendingDraft)?;
        pending.snapshot.restore(&mut self.state);
        Ok(())
    }

    /// Close the turn: pass to the next seat, or score the round when it is exhausted.
    ///
    /// The seat must have placed a move first, unless no colored tiles are left to draft.
    pub fn advance_turn(&mut self) -> Result<TurnOutcome, RuleError> {
        self.ensure_ready()?;
        if !self.placed && !check_round_end(&self.state) {
            return Err(RuleError::MoveRequired);
        }

        let outcome = next_turn(&mut self.state, &mut self.rng);
        self.placed = false;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{check_tile_conservation, setup_new_round};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> GameSession<StdRng> {
        GameSession::new("local", 2, StdRng::seed_from_u64(42))
    }

    fn first_factory_color(session: &GameSession<StdRng>) -> Color {
        session.state().factories[0][0]
    }

    /// Seat 1 recorded as holder, so the round opens with the marker in the center.
    /// Factory 0 holds two colors.
    fn marker_session() -> GameSession<StdRng> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = create_initial_game_state("local", 2, &mut rng);
        for factory in state.factories.iter_mut() {
            state.bag.append(factory);
        }
        state.first_player_token_holder = Some(1);
        setup_new_round(&mut state, &mut rng);
        state.factories[0] = vec![Color::Red, Color::Red, Color::Blue, Color::Teal];
        GameSession::from_state(state, rng)
    }

    #[test]
    fn test_draft_place_advance() {
        let mut s = session();
        let color = first_factory_color(&s);
        let seat = s.state().current_player;

        let draft = s.draft(DraftSource::Factory(0), color).unwrap();
        assert!(draft.count >= 1);
        assert_eq!(s.pending_draft(), Some(draft));
        assert_eq!(s.legal_destinations().len(), BOARD_SIZE + 1);

        s.place(Destination::PatternLine(4)).unwrap();
        assert_eq!(s.pending_draft(), None);
        assert_eq!(s.state().players[seat as usize].pattern_lines[4].count, draft.count);

        assert_eq!(s.advance_turn().unwrap(), TurnOutcome::Continue);
        assert_ne!(s.state().current_player, seat);
        check_tile_conservation(s.state()).unwrap();
    }

    #[test]
    fn test_cancel_restores_pre_draft_state() {
        let mut s = marker_session();
        assert_eq!(s.state().current_player, 1);
        assert_eq!(s.state().center, vec![Token::FirstPlayerMarker]);

        s.draft(DraftSource::Factory(0), Color::Red).unwrap();
        s.place(Destination::Floor).unwrap();
        s.advance_turn().unwrap();

        // Center now holds the factory remainder plus the marker
        let before = s.state().clone();
        assert_eq!(before.current_player, 0);
        assert!(before.center_has_marker());
        assert!(before.center.contains(&Token::Tile(Color::Blue)));

        let draft = s.draft(DraftSource::Center, Color::Blue).unwrap();
        assert!(draft.took_marker);
        assert_eq!(s.state().first_player_token_holder, Some(0));

        s.cancel_draft().unwrap();
        assert_eq!(s.state(), &before);
        assert_eq!(s.pending_draft(), None);
    }

    #[test]
    fn test_illegal_placement_rejected() {
        let mut s = session();
        let color = first_factory_color(&s);
        let seat = s.state().current_player as usize;
        {
            let (state, _) = s.parts_mut().unwrap();
            state.players[seat].wall[0] = [true; BOARD_SIZE];
        }

        s.draft(DraftSource::Factory(0), color).unwrap();
        assert_eq!(
            s.place(Destination::PatternLine(0)),
            Err(RuleError::IllegalPlacement {
                color,
                dest: Destination::PatternLine(0)
            })
        );
        assert!(s.pending_draft().is_some());
        assert!(!s.legal_destinations().contains(&Destination::PatternLine(0)));
    }

    #[test]
    fn test_protocol_ordering_errors() {
        let mut s = session();
        assert_eq!(s.place(Destination::Floor), Err(RuleError::NoPendingDraft));
        assert_eq!(s.cancel_draft(), Err(RuleError::NoPendingDraft));

        let color = first_factory_color(&s);
        s.draft(DraftSource::Factory(0), color).unwrap();
        assert_eq!(
            s.draft(DraftSource::Factory(1), color),
            Err(RuleError::PlacementPending)
        );
        assert_eq!(s.advance_turn(), Err(RuleError::PlacementPending));
        assert!(s.parts_mut().is_err());
    }

    #[test]
    fn test_one_move_per_turn() {
        let mut s = session();
        let seat = s.state().current_player;
        assert_eq!(s.advance_turn(), Err(RuleError::MoveRequired));

        let color = first_factory_color(&s);
        s.draft(DraftSource::Factory(0), color).unwrap();
        s.place(Destination::Floor).unwrap();
        assert!(s.turn_placed());

        let next_color = s.state().factories[1][0];
        assert_eq!(
            s.draft(DraftSource::Factory(1), next_color),
            Err(RuleError::TurnComplete)
        );
        assert_eq!(s.parts_mut().err(), Some(RuleError::TurnComplete));
        assert_eq!(s.state().current_player, seat);

        assert_eq!(s.advance_turn().unwrap(), TurnOutcome::Continue);
        assert!(!s.turn_placed());
        assert_ne!(s.state().current_player, seat);
        assert_eq!(s.advance_turn(), Err(RuleError::MoveRequired));
        assert!(s.draft(DraftSource::Factory(1), next_color).is_ok());
    }

    #[test]
    fn test_exhausted_round_advances_without_move() {
        let mut state = session().into_state();
        for factory in state.factories.iter_mut() {
            state.discard.append(factory);
        }
        let mut s = GameSession::from_state(state, StdRng::seed_from_u64(3));

        assert_eq!(s.advance_turn().unwrap(), TurnOutcome::RoundEnded);
        assert_eq!(s.state().round, 2);
        check_tile_conservation(s.state()).unwrap();
    }

    #[test]
    fn test_failed_draft_leaves_nothing_pending() {
        let mut s = session();
        let missing = crate::types::ALL_COLORS
            .into_iter()
            .find(|c| !s.state().factories[0].contains(c))
            .unwrap();
        assert!(s.draft(DraftSource::Factory(0), missing).is_err());
        assert_eq!(s.pending_draft(), None);
    }

    #[test]
    fn test_terminal_state_rejects_commands() {
        let mut state = session().into_state();
        state.game_over = true;
        let mut s = GameSession::from_state(state, StdRng::seed_from_u64(1));
        let color = s.state().factories[0][0];

        assert!(s.is_game_over());
        assert_eq!(
            s.draft(DraftSource::Factory(0), color),
            Err(RuleError::GameOver)
        );
        assert_eq!(s.advance_turn(), Err(RuleError::GameOver));
    }
}
