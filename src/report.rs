//! Plain-text rendering of moves, boards and self-play results.

use std::fmt::Write;

use tessera_ai::Move;
use tessera_engine::{Color, Destination, DraftSource, GameState, Token, BOARD_SIZE, WALL_PATTERN};

use crate::selfplay::SelfPlaySummary;

pub fn color_char(color: Color) -> char {
    match color {
        Color::Blue => 'B',
        Color::Yellow => 'Y',
        Color::Red => 'R',
        Color::Black => 'K',
        Color::Teal => 'T',
    }
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::Blue => "Blue",
        Color::Yellow => "Yellow",
        Color::Red => "Red",
        Color::Black => "Black",
        Color::Teal => "Teal",
    }
}

fn token_char(token: Token) -> char {
    match token {
        Token::Tile(c) => color_char(c),
        Token::FirstPlayerMarker => '1',
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

pub fn format_source(source: DraftSource) -> String {
    match source {
        DraftSource::Factory(f) => format!("F{}", f + 1),
        DraftSource::Center => "Center".to_string(),
    }
}

pub fn format_destination(dest: Destination) -> String {
    match dest {
        Destination::PatternLine(r) => format!("Line {}", r + 1),
        Destination::Floor => "Floor".to_string(),
    }
}

/// e.g. `F3 2x Red -> Line 2`
pub fn format_move(mv: &Move) -> String {
    format!(
        "{} {}x {} -> {}",
        format_source(mv.source),
        mv.count,
        color_name(mv.color),
        format_destination(mv.target)
    )
}

/// Factories, center and every player's lines, wall and floor.
///
/// Empty wall cells show the expected color in lowercase.
pub fn format_board(state: &GameState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Round {}   |   Current player: {}",
        state.round,
        state.current_player().name
    );

    for (f, factory) in state.factories.iter().enumerate() {
        let tiles: String = factory.iter().map(|&c| color_char(c)).collect();
        let _ = writeln!(out, "  F{}: {}", f + 1, or_dash(&tiles));
    }
    let center: String = state.center.iter().map(|&t| token_char(t)).collect();
    let _ = writeln!(out, "  Center: {}", or_dash(&center));

    for player in &state.players {
        let _ = writeln!(out, "\n{} ({})", player.name, player.score);
        for row in 0..BOARD_SIZE {
            let line = player.pattern_lines[row];
            let filled = line.color.map(color_char).unwrap_or('.');
            let mut slots = String::new();
            for _ in 0..(BOARD_SIZE - row - 1) {
                slots.push(' ');
            }
            for i in 0..=row {
                slots.push(if (i as u8) < line.count { filled } else { '.' });
            }

            let wall: String = (0..BOARD_SIZE)
                .map(|col| {
                    let c = color_char(WALL_PATTERN[row][col]);
                    if player.wall[row][col] {
                        c
                    } else {
                        c.to_ascii_lowercase()
                    }
                })
                .collect();
            let _ = writeln!(out, "  {slots} | {wall}");
        }
        let floor: String = player.floor.iter().map(|&t| token_char(t)).collect();
        let _ = writeln!(out, "  Floor: {}", or_dash(&floor));
    }
    out
}

/// Players by score, highest first.
pub fn format_standings(state: &GameState) -> String {
    let mut out = String::new();
    for (rank, player) in state.standings().into_iter().enumerate() {
        let strategy = player.strategy.map(|s| s.as_str()).unwrap_or("human");
        let _ = writeln!(
            out,
            "{:>2}. {:<24} {:>4}  ({strategy})",
            rank + 1,
            player.name,
            player.score
        );
    }
    out
}

pub fn format_summary(summary: &SelfPlaySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Games: {}   Truncated: {}   Mean rounds: {:.1}",
        summary.games, summary.truncated, summary.mean_rounds
    );
    let _ = writeln!(
        out,
        "{:<14} {:>6} {:>6} {:>8} {:>10}",
        "strategy", "seats", "wins", "win %", "mean score"
    );
    for stats in &summary.strategies {
        let win_rate = if stats.seats > 0 {
            100.0 * stats.wins as f64 / stats.seats as f64
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "{:<14} {:>6} {:>6} {:>7.1}% {:>10.1}",
            stats.strategy.as_str(),
            stats.seats,
            stats.wins,
            win_rate,
            stats.mean_score
        );
    }
    out
}
