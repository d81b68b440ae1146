//! Error types for rule application, the session protocol and snapshot encoding.

use crate::types::{Color, Destination, DraftSource};

/// Strategy identifier outside {"greedy", "defensive", "wall-focused"}
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown AI strategy '{0}'")]
pub struct UnknownStrategy(pub String);

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("no {color:?} tiles at {from:?}")]
    ColorNotAtSource { from: DraftSource, color: Color },

    #[error("factory {0} does not exist")]
    NoSuchFactory(u8),

    #[error("cannot place {color:?} on {dest:?}")]
    IllegalPlacement { color: Color, dest: Destination },

    #[error("game is over")]
    GameOver,

    #[error("drafted tiles have not been placed yet")]
    PlacementPending,

    #[error("no drafted tiles to place")]
    NoPendingDraft,

    #[error("this turn's move has already been placed")]
    TurnComplete,

    #[error("the current player has not moved yet")]
    MoveRequired,

    #[error("tile count for {color:?} is {found}, expected {expected}")]
    TileConservation {
        color: Color,
        found: u32,
        expected: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("player {player} has {found} pattern lines, expected {expected}")]
    PatternLines {
        player: usize,
        found: usize,
        expected: usize,
    },
}
