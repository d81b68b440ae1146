//! State transitions and rules as pure functions over `&mut GameState`.
//!
//! Every function that shuffles or picks at random takes the random source as an
//! argument, so a seeded RNG replays a game exactly.

use std::iter;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::RuleError;
use crate::roster::{draw_ai_players, LOCAL_PLAYER_NAME};
use crate::types::{
    factories_for_players, floor_penalty_at, wall_column, Color, Destination, DraftSource,
    GameState, PatternLine, PlayerIdx, PlayerState, Token, Wall, ALL_COLORS, BOARD_SIZE,
    FACTORY_CAPACITY, FLOOR_CAPACITY, TILES_PER_COLOR, TILE_COLORS,
};

/// Tiles removed from a source by `apply_draft`
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    pub color: Color,
    pub count: u8,
    /// The first-player marker came along with this draft
    pub took_marker: bool,
}

/// What `next_turn` did
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TurnOutcome {
    Continue,
    RoundEnded,
    GameOver,
}

// =============================================================================
// Game and round setup
// =============================================================================

/// Create a game with one human seat (`local_player_id`) and `num_players - 1` AI seats,
/// then deal the first round.
pub fn create_initial_game_state(
    local_player_id: &str,
    num_players: usize,
    rng: &mut impl Rng,
) -> GameState {
    let mut bag: Vec<Color> = ALL_COLORS
        .iter()
        .flat_map(|&c| iter::repeat(c).take(TILES_PER_COLOR as usize))
        .collect();
    bag.shuffle(rng);

    let mut players = vec![PlayerState::new(local_player_id, LOCAL_PLAYER_NAME, None)];
    players.extend(draw_ai_players(num_players.saturating_sub(1), rng));

    let mut state = GameState {
        bag,
        players,
        ..GameState::default()
    };
    setup_new_round(&mut state, rng);
    state
}

/// Draw a single tile from the bag, refilling it from the discard pile when empty.
/// Returns None if both are empty.
fn draw_tile(bag: &mut Vec<Color>, discard: &mut Vec<Color>, rng: &mut impl Rng) -> Option<Color> {
    if bag.is_empty() {
        if discard.is_empty() {
            return None;
        }
        bag.append(discard);
        bag.shuffle(rng);
        debug!(tiles = bag.len(), "bag refilled from discard pile");
    }
    bag.pop()
}

/// Deal the factories and reset the center for a new round.
///
/// With a recorded token holder, that seat starts and the first-player marker is
/// seeded into the center; otherwise the starting seat is random and the center
/// starts empty. A factory that cannot be filled because bag and discard are both
/// exhausted stays under-filled for the round.
pub fn setup_new_round(state: &mut GameState, rng: &mut impl Rng) {
    let num_factories = factories_for_players(state.num_players());
    state.factories = vec![Vec::with_capacity(FACTORY_CAPACITY); num_factories];

    for factory in state.factories.iter_mut() {
        for _ in 0..FACTORY_CAPACITY {
            match draw_tile(&mut state.bag, &mut state.discard, rng) {
                Some(color) => factory.push(color),
                None => break,
            }
        }
    }

    state.center.clear();
    state.round_over = false;

    state.current_player = match state.first_player_token_holder {
        Some(holder) if (holder as usize) < state.num_players() => {
            state.center.push(Token::FirstPlayerMarker);
            holder
        }
        _ => rng.random_range(0..state.num_players().max(1)) as PlayerIdx,
    };

    debug!(
        round = state.round,
        starting_player = state.current_player,
        factories = num_factories,
        "round dealt"
    );
}

// =============================================================================
// Drafting and placement
// =============================================================================

/// Take every tile of `color` from `source` for the current player.
///
/// From a factory, the other tiles move to the center and the factory empties.
/// From the center, the first-player marker (if still there) goes to the acting
/// player's floor and records them as the token holder. The state is untouched
/// when the color is absent.
pub fn apply_draft(
    state: &mut GameState,
    source: DraftSource,
    color: Color,
) -> Result<Draft, RuleError> {
    let p = state.current_player;

    match source {
        DraftSource::Factory(f) => {
            let factory = state
                .factories
                .get_mut(f as usize)
                .ok_or(RuleError::NoSuchFactory(f))?;
            if !factory.contains(&color) {
                return Err(RuleError::ColorNotAtSource { from: source, color });
            }

            let (taken, rest): (Vec<Color>, Vec<Color>) =
                std::mem::take(factory).into_iter().partition(|&c| c == color);
            state.center.extend(rest.into_iter().map(Token::Tile));

            Ok(Draft {
                color,
                count: taken.len() as u8,
                took_marker: false,
            })
        }
        DraftSource::Center => {
            let count = state
                .center
                .iter()
                .filter(|&&t| t == Token::Tile(color))
                .count();
            if count == 0 {
                return Err(RuleError::ColorNotAtSource { from: source, color });
            }

            let took_marker = state.center_has_marker();
            state
                .center
                .retain(|&t| t != Token::Tile(color) && t != Token::FirstPlayerMarker);

            if took_marker {
                state.players[p as usize].floor.push(Token::FirstPlayerMarker);
                state.first_player_token_holder = Some(p);
            }

            Ok(Draft {
                color,
                count: count as u8,
                took_marker,
            })
        }
    }
}

/// Whether `color` may be placed on `dest` by `player`.
///
/// The floor always accepts tiles. A pattern line must be empty or already hold
/// `color`, have room left, and the wall cell for `color` in that row must be open.
pub fn placement_is_legal(player: &PlayerState, color: Color, dest: Destination) -> bool {
    match dest {
        Destination::Floor => true,
        Destination::PatternLine(row) => {
            let r = row as usize;
            let Some(line) = player.pattern_lines.get(r) else {
                return false;
            };

            if player.wall[r][wall_column(r, color)] {
                return false;
            }
            if line.color.is_some_and(|existing| existing != color) {
                return false;
            }
            line.count < PatternLine::capacity(r)
        }
    }
}

/// Add a tile to the floor, or to the discard pile once the floor holds seven tokens.
fn push_to_floor(floor: &mut Vec<Token>, discard: &mut Vec<Color>, color: Color) {
    if floor.len() < FLOOR_CAPACITY {
        floor.push(Token::Tile(color));
    } else {
        discard.push(color);
    }
}

/// Put `count` drafted tiles of `color` for the current player.
///
/// Destination legality is the caller's job (see `placement_is_legal`). Tiles that
/// do not fit on the pattern line overflow to the floor.
pub fn place_tiles_on_board(state: &mut GameState, color: Color, count: u8, dest: Destination) {
    let p = state.current_player as usize;
    let player = &mut state.players[p];

    let overflow = match dest {
        Destination::Floor => count,
        Destination::PatternLine(row) => match player.pattern_lines.get_mut(row as usize) {
            Some(line) => {
                let space = PatternLine::capacity(row as usize).saturating_sub(line.count);
                let placed = count.min(space);
                if placed > 0 {
                    line.color = Some(color);
                    line.count += placed;
                }
                count - placed
            }
            None => {
                warn!(row, "pattern line out of range, tiles go to the floor");
                count
            }
        },
    };

    for _ in 0..overflow {
        push_to_floor(&mut player.floor, &mut state.discard, color);
    }
}

// =============================================================================
// Scoring and round/game end
// =============================================================================

/// True once every factory is empty and the center holds no colored tile.
pub fn check_round_end(state: &GameState) -> bool {
    !state.factories_have_tiles() && state.tiles_in_center() == 0
}

/// Score a tile just placed at (row, col) from its horizontal and vertical runs.
pub fn calculate_tile_score(wall: &Wall, row: usize, col: usize) -> i16 {
    // Count horizontal adjacency (including placed tile)
    let mut horiz = 1;
    let mut c = col;
    while c > 0 && wall[row][c - 1] {
        c -= 1;
        horiz += 1;
    }
    c = col;
    while c < BOARD_SIZE - 1 && wall[row][c + 1] {
        c += 1;
        horiz += 1;
    }

    // Count vertical adjacency (including placed tile)
    let mut vert = 1;
    let mut r = row;
    while r > 0 && wall[r - 1][col] {
        r -= 1;
        vert += 1;
    }
    r = row;
    while r < BOARD_SIZE - 1 && wall[r + 1][col] {
        r += 1;
        vert += 1;
    }

    if horiz == 1 && vert == 1 {
        // Isolated tile
        1
    } else {
        let h_score = if horiz > 1 { horiz } else { 0 };
        let v_score = if vert > 1 { vert } else { 0 };
        h_score + v_score
    }
}

/// Wall tiling, floor penalties and cleanup, then either the next round or game end.
pub fn end_round(state: &mut GameState, rng: &mut impl Rng) {
    state.round_over = true;

    for player in state.players.iter_mut() {
        let score_before = player.score;

        for row in 0..BOARD_SIZE {
            let line = player.pattern_lines[row];
            if line.count < PatternLine::capacity(row) {
                continue;
            }
            let Some(color) = line.color else {
                continue;
            };

            let col = wall_column(row, color);
            if player.wall[row][col] {
                state
                    .discard
                    .extend(iter::repeat(color).take(line.count as usize));
            } else {
                player.wall[row][col] = true;
                player.score += calculate_tile_score(&player.wall, row, col);
                // One tile moved to the wall, the rest are surplus
                state
                    .discard
                    .extend(iter::repeat(color).take(line.count as usize - 1));
            }
            player.pattern_lines[row] = PatternLine::default();
        }

        // The marker takes a floor position but is not charged itself
        let penalty: i16 = player
            .floor
            .iter()
            .enumerate()
            .filter(|(_, token)| token.color().is_some())
            .map(|(i, _)| floor_penalty_at(i))
            .sum();
        player.score = (player.score + penalty).max(0);
        state
            .discard
            .extend(player.floor.drain(..).filter_map(Token::color));

        debug!(
            player = %player.id,
            gained = player.score - score_before,
            penalty,
            score = player.score,
            "round scored"
        );
    }

    if state.players.iter().any(PlayerState::has_complete_row) {
        end_game(state);
    } else {
        state.round += 1;
        setup_new_round(state, rng);
    }
}

/// Add end-of-game bonuses and mark the game over.
///
/// +2 per complete row, +7 per complete column, +10 per color with all five cells filled.
pub fn end_game(state: &mut GameState) {
    for player in state.players.iter_mut() {
        let mut bonus = 0;

        for row in 0..BOARD_SIZE {
            if (0..BOARD_SIZE).all(|col| player.wall[row][col]) {
                bonus += 2;
            }
        }

        for col in 0..BOARD_SIZE {
            if (0..BOARD_SIZE).all(|row| player.wall[row][col]) {
                bonus += 7;
            }
        }

        for color in ALL_COLORS {
            if player.color_on_wall(color) == BOARD_SIZE {
                bonus += 10;
            }
        }

        player.score += bonus;
    }
    state.game_over = true;

    info!(
        round = state.round,
        scores = ?state.players.iter().map(|p| p.score).collect::<Vec<_>>(),
        "game over"
    );
}

/// Finish the current player's turn: score the round if it is exhausted, otherwise
/// pass to the next seat.
pub fn next_turn(state: &mut GameState, rng: &mut impl Rng) -> TurnOutcome {
    if check_round_end(state) {
        end_round(state, rng);
        if state.game_over {
            TurnOutcome::GameOver
        } else {
            TurnOutcome::RoundEnded
        }
    } else {
        let n = state.num_players().max(1);
        state.current_player = ((state.current_player as usize + 1) % n) as PlayerIdx;
        TurnOutcome::Continue
    }
}

// =============================================================================
// Tile conservation
// =============================================================================

/// Count every tile of each color wherever it currently sits.
pub fn tile_census(state: &GameState) -> [u32; TILE_COLORS] {
    let mut counts = [0u32; TILE_COLORS];

    let loose = state
        .bag
        .iter()
        .chain(state.discard.iter())
        .chain(state.factories.iter().flatten())
        .copied()
        .chain(state.center.iter().filter_map(|t| t.color()));
    for color in loose {
        counts[color as usize] += 1;
    }

    for player in &state.players {
        for line in &player.pattern_lines {
            if let Some(color) = line.color {
                counts[color as usize] += line.count as u32;
            }
        }
        for color in player.floor.iter().filter_map(|t| t.color()) {
            counts[color as usize] += 1;
        }
        for color in ALL_COLORS {
            counts[color as usize] += player.color_on_wall(color) as u32;
        }
    }

    counts
}

/// Every color must be accounted for exactly TILES_PER_COLOR times.
pub fn check_tile_conservation(state: &GameState) -> Result<(), RuleError> {
    let counts = tile_census(state);
    for color in ALL_COLORS {
        let found = counts[color as usize];
        if found != TILES_PER_COLOR {
            return Err(RuleError::TileConservation {
                color,
                found,
                expected: TILES_PER_COLOR,
            });
        }
    }
    Ok(())
}
