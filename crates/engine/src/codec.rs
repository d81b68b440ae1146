//! Snapshot encoding for the sync layer.
//!
//! `to_json` / `from_json` round-trip the nested `GameState`. Document stores that
//! cannot hold nested arrays get a `FlatGameState`, where `factories` and every
//! player's `wall` are stored as JSON-encoded strings.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::{
    Color, GameState, PatternLine, PlayerIdx, PlayerState, Strategy, Token, BOARD_SIZE,
};

pub fn to_json(state: &GameState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(state)?)
}

pub fn from_json(json: &str) -> Result<GameState, CodecError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatPlayerState {
    pub id: String,
    pub name: String,
    pub score: i16,
    pub is_ai: bool,
    pub strategy: Option<Strategy>,
    pub pattern_lines: Vec<PatternLine>,
    /// JSON-encoded `[[bool; 5]; 5]`
    pub wall: String,
    pub floor: Vec<Token>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatGameState {
    pub bag: Vec<Color>,
    pub discard: Vec<Color>,
    pub players: Vec<FlatPlayerState>,
    /// JSON-encoded `Vec<Vec<Color>>`
    pub factories: String,
    pub center: Vec<Token>,
    pub round: u16,
    pub current_player: PlayerIdx,
    pub first_player_token_holder: Option<PlayerIdx>,
    pub round_over: bool,
    pub game_over: bool,
}

pub fn encode_flat(state: &GameState) -> Result<FlatGameState, CodecError> {
    let players = state
        .players
        .iter()
        .map(|p| -> Result<FlatPlayerState, CodecError> {
            Ok(FlatPlayerState {
                id: p.id.clone(),
                name: p.name.clone(),
                score: p.score,
                is_ai: p.is_ai,
                strategy: p.strategy,
                pattern_lines: p.pattern_lines.to_vec(),
                wall: serde_json::to_string(&p.wall)?,
                floor: p.floor.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FlatGameState {
        bag: state.bag.clone(),
        discard: state.discard.clone(),
        players,
        factories: serde_json::to_string(&state.factories)?,
        center: state.center.clone(),
        round: state.round,
        current_player: state.current_player,
        first_player_token_holder: state.first_player_token_holder,
        round_over: state.round_over,
        game_over: state.game_over,
    })
}

pub fn decode_flat(flat: FlatGameState) -> Result<GameState, CodecError> {
    let players = flat
        .players
        .into_iter()
        .enumerate()
        .map(|(player, p)| -> Result<PlayerState, CodecError> {
            let pattern_lines: [PatternLine; BOARD_SIZE] = p
                .pattern_lines
                .try_into()
                .map_err(|lines: Vec<PatternLine>| CodecError::PatternLines {
                    player,
                    found: lines.len(),
                    expected: BOARD_SIZE,
                })?;
            Ok(PlayerState {
                id: p.id,
                name: p.name,
                score: p.score,
                is_ai: p.is_ai,
                strategy: p.strategy,
                pattern_lines,
                wall: serde_json::from_str(&p.wall)?,
                floor: p.floor,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GameState {
        bag: flat.bag,
        discard: flat.discard,
        players,
        factories: serde_json::from_str(&flat.factories)?,
        center: flat.center,
        round: flat.round,
        current_player: flat.current_player,
        first_player_token_holder: flat.first_player_token_holder,
        round_over: flat.round_over,
        game_over: flat.game_over,
    })
}
