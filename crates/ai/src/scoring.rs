//! Move scoring for the three AI strategies.
//!
//! Scoring never mutates state: `project_placement` works out where the drafted
//! tiles would land, and each strategy weighs that projection its own way.

use serde::Serialize;

use tessera_engine::{
    floor_penalty_at, wall_column, Destination, DraftSource, GameState, PatternLine, PlayerState,
    Strategy, Token, BOARD_SIZE,
};

use crate::moves::Move;

/// Applied by every strategy when a move grabs the first-player marker early.
pub const MARKER_GRAB_PENALTY: i32 = -2;

/// Defensive: drafting leaves a factory holding a single color.
pub const SINGLE_COLOR_REMAINDER_PENALTY: i32 = -2;

/// Greedy: the move exactly completes its pattern line.
pub const LINE_COMPLETION_BONUS: i32 = 5;

/// Where a move's tiles would land, and what the floor would cost.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlacementProjection {
    pub to_line: u8,
    pub to_floor: u8,
    pub takes_marker: bool,
    pub completes_line: bool,
    /// Sum of the (negative) penalties at the floor positions the new tokens occupy
    pub floor_penalty: i32,
}

pub fn project_placement(player: &PlayerState, state: &GameState, mv: &Move) -> PlacementProjection {
    let (to_line, completes_line) = match mv.target {
        Destination::Floor => (0, false),
        Destination::PatternLine(row) => {
            let r = row as usize;
            let line = player.pattern_lines[r];
            let space = PatternLine::capacity(r).saturating_sub(line.count);
            let to_line = mv.count.min(space);
            (to_line, line.count + to_line == PatternLine::capacity(r))
        }
    };
    let to_floor = mv.count - to_line;

    let takes_marker = mv.source == DraftSource::Center && state.center_has_marker();
    let new_tokens = to_floor as usize + usize::from(takes_marker);
    let start = player.floor.len();
    let floor_penalty = (start..start + new_tokens)
        .map(|i| floor_penalty_at(i) as i32)
        .sum();

    PlacementProjection {
        to_line,
        to_floor,
        takes_marker,
        completes_line,
        floor_penalty,
    }
}

/// Score `mv` with the acting player's own strategy.
pub fn score_move(player: &PlayerState, state: &GameState, mv: &Move) -> i32 {
    score_move_as(player.strategy, player, state, mv)
}

/// Score `mv` as `strategy` would. Without a strategy only the marker penalty counts.
pub fn score_move_as(
    strategy: Option<Strategy>,
    player: &PlayerState,
    state: &GameState,
    mv: &Move,
) -> i32 {
    let projection = project_placement(player, state, mv);

    let mut score = match strategy {
        Some(Strategy::Greedy) => greedy(&projection),
        Some(Strategy::Defensive) => defensive(state, mv, &projection),
        Some(Strategy::WallFocused) => wall_focused(player, mv, &projection),
        None => 0,
    };

    if projection.takes_marker && marker_grab_is_early(state, mv) {
        score += MARKER_GRAB_PENALTY;
    }
    score
}

/// Factories still hold tiles, or the center keeps colored tiles besides the drafted color.
fn marker_grab_is_early(state: &GameState, mv: &Move) -> bool {
    state.factories_have_tiles()
        || state
            .center
            .iter()
            .any(|t| matches!(t, Token::Tile(c) if *c != mv.color))
}

fn greedy(p: &PlacementProjection) -> i32 {
    let mut score = p.to_line as i32 * 2;
    if p.completes_line {
        score += LINE_COMPLETION_BONUS;
    }
    score + p.floor_penalty
}

fn defensive(state: &GameState, mv: &Move, p: &PlacementProjection) -> i32 {
    let mut score = p.to_line as i32 + p.floor_penalty * 2;

    if let DraftSource::Factory(f) = mv.source {
        let mut remaining = state.factories[f as usize]
            .iter()
            .filter(|&&c| c != mv.color);
        if let Some(&first) = remaining.next() {
            if remaining.all(|&c| c == first) {
                score += SINGLE_COLOR_REMAINDER_PENALTY;
            }
        }
    }
    score
}

fn wall_focused(player: &PlayerState, mv: &Move, p: &PlacementProjection) -> i32 {
    let mut score = p.to_line as i32;

    if let Destination::PatternLine(row) = mv.target {
        let col = wall_column(row as usize, mv.color);
        let filled_in_column = (0..BOARD_SIZE).filter(|&r| player.wall[r][col]).count() as i32;
        score += filled_in_column * 2;
        score += 4 - player.color_on_wall(mv.color) as i32;
    }
    score + p.floor_penalty
}
