//! Legal move enumeration

use serde::{Deserialize, Serialize};

use tessera_engine::{
    placement_is_legal, Color, Destination, DraftSource, GameState, PlayerState, ALL_COLORS,
    BOARD_SIZE,
};

/// A full drafting move: which tiles to take and where they go.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub source: DraftSource,
    pub color: Color,
    /// Tiles of `color` at the source when the move was generated
    pub count: u8,
    pub target: Destination,
}

/// Every (source, color, count) that can be drafted right now.
///
/// Factories come first in index order, then the center; colors follow the fixed
/// color order. The first-player marker is never a draftable color.
pub fn draft_options(state: &GameState) -> Vec<(DraftSource, Color, u8)> {
    let mut options = Vec::new();

    for (f, factory) in state.factories.iter().enumerate() {
        for color in ALL_COLORS {
            let count = factory.iter().filter(|&&c| c == color).count();
            if count > 0 {
                options.push((DraftSource::Factory(f as u8), color, count as u8));
            }
        }
    }

    for color in ALL_COLORS {
        let count = state
            .center
            .iter()
            .filter(|t| t.color() == Some(color))
            .count();
        if count > 0 {
            options.push((DraftSource::Center, color, count as u8));
        }
    }

    options
}

/// All legal moves for `player`: each draft option paired with every pattern line
/// that can take its color, plus the floor.
///
/// Empty only when no factory or center tile is left, i.e. the round is over.
pub fn enumerate_moves(player: &PlayerState, state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();

    for (source, color, count) in draft_options(state) {
        let targets = (0..BOARD_SIZE as u8)
            .map(Destination::PatternLine)
            .chain([Destination::Floor])
            .filter(|&dest| placement_is_legal(player, color, dest));
        for target in targets {
            moves.push(Move {
                source,
                color,
                count,
                target,
            });
        }
    }

    moves
}
