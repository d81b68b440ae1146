//! Basic types, constant tables and the plain-data game state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownStrategy;

// =============================================================================
// Basic types and constants
// =============================================================================

/// Index into the players vector: 0..players.len()-1
pub type PlayerIdx = u8;

/// Row index (0..=4)
pub type Row = u8;

pub const BOARD_SIZE: usize = 5;
pub const FACTORY_CAPACITY: usize = 4;
pub const FLOOR_CAPACITY: usize = 7;
pub const TILE_COLORS: usize = 5;
pub const TILES_PER_COLOR: u32 = 20;

/// Factory table used when the player count has no entry of its own.
pub const FALLBACK_FACTORIES: usize = 9;

/// Tile colors (order fixed for serialization and wall lookup)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue = 0,
    Yellow = 1,
    Red = 2,
    Black = 3,
    Teal = 4,
}

pub const ALL_COLORS: [Color; TILE_COLORS] = [
    Color::Blue,
    Color::Yellow,
    Color::Red,
    Color::Black,
    Color::Teal,
];

/// Floor penalties by floor position. Positions past the end reuse the last entry.
pub const FLOOR_PENALTY: [i16; FLOOR_CAPACITY] = [-1, -1, -2, -2, -2, -3, -3];

/// Penalty charged for a token sitting at floor position `index`.
pub fn floor_penalty_at(index: usize) -> i16 {
    FLOOR_PENALTY[index.min(FLOOR_CAPACITY - 1)]
}

/// Number of factory displays for a player count (5/7/9, else the 4-player table).
pub fn factories_for_players(num_players: usize) -> usize {
    match num_players {
        2 => 5,
        3 => 7,
        4 => 9,
        _ => FALLBACK_FACTORIES,
    }
}

// =============================================================================
// Wall layout
// =============================================================================

/// Wall pattern: WALL_PATTERN[row][col] = Color at that position.
/// Row i is the color order rotated right by i.
pub const WALL_PATTERN: [[Color; BOARD_SIZE]; BOARD_SIZE] = [
    [Color::Blue, Color::Yellow, Color::Red, Color::Black, Color::Teal],
    [Color::Teal, Color::Blue, Color::Yellow, Color::Red, Color::Black],
    [Color::Black, Color::Teal, Color::Blue, Color::Yellow, Color::Red],
    [Color::Red, Color::Black, Color::Teal, Color::Blue, Color::Yellow],
    [Color::Yellow, Color::Red, Color::Black, Color::Teal, Color::Blue],
];

/// Destination column lookup: WALL_DEST_COL[row][color as usize] => col
pub const WALL_DEST_COL: [[u8; TILE_COLORS]; BOARD_SIZE] = [
    [0, 1, 2, 3, 4],
    [1, 2, 3, 4, 0],
    [2, 3, 4, 0, 1],
    [3, 4, 0, 1, 2],
    [4, 0, 1, 2, 3],
];

#[inline]
pub fn wall_column(row: usize, color: Color) -> usize {
    WALL_DEST_COL[row][color as usize] as usize
}

// =============================================================================
// AI strategies
// =============================================================================

/// Named move-scoring strategy carried by computer-controlled players.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "greedy")]
    Greedy,
    #[serde(rename = "defensive")]
    Defensive,
    #[serde(rename = "wall-focused")]
    WallFocused,
}

pub const ALL_STRATEGIES: [Strategy; 3] =
    [Strategy::Greedy, Strategy::Defensive, Strategy::WallFocused];

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::Defensive => "defensive",
            Strategy::WallFocused => "wall-focused",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Strategy::Greedy),
            "defensive" => Ok(Strategy::Defensive),
            "wall-focused" => Ok(Strategy::WallFocused),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

// =============================================================================
// Tiles, lines and boards
// =============================================================================

/// Token in the center pool or a floor line
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Tile(Color),
    FirstPlayerMarker,
}

impl Token {
    pub fn color(self) -> Option<Color> {
        match self {
            Token::Tile(c) => Some(c),
            Token::FirstPlayerMarker => None,
        }
    }
}

/// A single pattern line (one of 5 rows, capacities 1-5)
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PatternLine {
    pub color: Option<Color>, // None => empty; Some(c) => all tiles are c
    pub count: u8,            // 0..=capacity(row_index)
}

impl PatternLine {
    #[inline]
    pub fn capacity(row: usize) -> u8 {
        (row + 1) as u8
    }
}

/// Wall occupancy; the color of a cell is WALL_PATTERN[row][col].
pub type Wall = [[bool; BOARD_SIZE]; BOARD_SIZE];

/// Source of tiles for drafting
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DraftSource {
    Factory(u8),
    Center,
}

/// Where drafted tiles are placed
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Destination {
    PatternLine(Row),
    Floor,
}

impl Destination {
    /// Boundary encoding: -1 is the floor, 0..=4 a pattern line.
    pub fn from_line_index(index: i8) -> Option<Destination> {
        match index {
            -1 => Some(Destination::Floor),
            0..=4 => Some(Destination::PatternLine(index as u8)),
            _ => None,
        }
    }

    pub fn line_index(self) -> i8 {
        match self {
            Destination::PatternLine(row) => row as i8,
            Destination::Floor => -1,
        }
    }
}

/// Complete state for one player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub score: i16,
    pub is_ai: bool,
    pub strategy: Option<Strategy>, // None for human players
    pub pattern_lines: [PatternLine; BOARD_SIZE],
    pub wall: Wall,
    pub floor: Vec<Token>,
}

impl PlayerState {
    pub fn new(id: impl Into<String>, name: impl Into<String>, strategy: Option<Strategy>) -> Self {
        PlayerState {
            id: id.into(),
            name: name.into(),
            score: 0,
            is_ai: strategy.is_some(),
            strategy,
            pattern_lines: [PatternLine::default(); BOARD_SIZE],
            wall: [[false; BOARD_SIZE]; BOARD_SIZE],
            floor: Vec::new(),
        }
    }

    pub fn has_complete_row(&self) -> bool {
        self.wall.iter().any(|row| row.iter().all(|&filled| filled))
    }

    /// Number of wall cells of `color` already filled.
    pub fn color_on_wall(&self, color: Color) -> usize {
        (0..BOARD_SIZE)
            .filter(|&row| self.wall[row][wall_column(row, color)])
            .count()
    }
}

// =============================================================================
// Top-level GameState
// =============================================================================

/// Complete game state. Mutated in place by the rule functions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub bag: Vec<Color>,
    pub discard: Vec<Color>,
    pub players: Vec<PlayerState>,
    pub factories: Vec<Vec<Color>>,
    pub center: Vec<Token>,

    /// 1-based round counter
    pub round: u16,

    /// Whose turn it is
    pub current_player: PlayerIdx,

    /// Seat that took the first-player marker (starts the next round)
    pub first_player_token_holder: Option<PlayerIdx>,

    pub round_over: bool,
    pub game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            bag: Vec::new(),
            discard: Vec::new(),
            players: Vec::new(),
            factories: Vec::new(),
            center: Vec::new(),
            round: 1,
            current_player: 0,
            first_player_token_holder: None,
            round_over: false,
            game_over: false,
        }
    }
}

impl GameState {
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn current_player(&self) -> &PlayerState {
        &self.players[self.current_player as usize]
    }

    pub fn center_has_marker(&self) -> bool {
        self.center.contains(&Token::FirstPlayerMarker)
    }

    /// Colored tiles in the center, ignoring the marker.
    pub fn tiles_in_center(&self) -> usize {
        self.center.iter().filter(|t| t.color().is_some()).count()
    }

    pub fn factories_have_tiles(&self) -> bool {
        self.factories.iter().any(|f| !f.is_empty())
    }

    /// Players ordered by score, highest first (ties keep seat order).
    pub fn standings(&self) -> Vec<&PlayerState> {
        let mut ranked: Vec<&PlayerState> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Seats sharing the top score.
    pub fn winners(&self) -> Vec<PlayerIdx> {
        let Some(best) = self.players.iter().map(|p| p.score).max() else {
            return Vec::new();
        };
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.score == best)
            .map(|(i, _)| i as PlayerIdx)
            .collect()
    }
}
