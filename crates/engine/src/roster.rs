//! Display identities for computer-controlled seats.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{PlayerState, Strategy, ALL_STRATEGIES};

pub const LOCAL_PLAYER_NAME: &str = "Player (You)";

pub const AI_NAMES: [&str; 40] = [
    "James", "Robert", "John", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Paul", "Andrew", "Kevin", "Brian",
    "George", "Edward", "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan",
    "Jessica", "Sarah", "Karen", "Lisa", "Nancy", "Helen", "Sandra", "Laura", "Amy", "Emma",
    "Olivia", "Rachel", "Maria",
];

pub const AI_EMOJIS: [&str; 20] = [
    "🎨🎭", "🌟⚡", "🎯🔥", "🌈🦄", "🚀🌙", "🎵🎹", "🌸🦋", "🎲🎰", "🌊🐚", "🍀🌿",
    "🌺🦜", "🎯🏹", "🌟💫", "🔮✨", "🌙⭐", "🎵🎶", "🦄🌸", "🔥⚡", "🎲🃏", "🐚🌺",
];

/// Builds `count` AI seats with shuffled names, emojis and strategies.
///
/// Seat `i` (1-based) gets id `AI-i`, the `i-1`th shuffled name and emoji, and the
/// `(i-1) mod 3`th shuffled strategy.
pub fn draw_ai_players(count: usize, rng: &mut impl Rng) -> Vec<PlayerState> {
    let mut names = AI_NAMES.to_vec();
    let mut emojis = AI_EMOJIS.to_vec();
    let mut strategies: Vec<Strategy> = ALL_STRATEGIES.to_vec();
    names.shuffle(rng);
    emojis.shuffle(rng);
    strategies.shuffle(rng);

    (1..=count)
        .map(|i| {
            let name = names[(i - 1) % names.len()];
            let emoji = emojis[(i - 1) % emojis.len()];
            let strategy = strategies[(i - 1) % strategies.len()];
            PlayerState::new(format!("AI-{i}"), format!("{name} {emoji}"), Some(strategy))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_three_ai_seats_cover_every_strategy() {
        let mut rng = StdRng::seed_from_u64(7);
        let seats = draw_ai_players(3, &mut rng);

        assert_eq!(seats.len(), 3);
        for strategy in ALL_STRATEGIES {
            assert!(seats.iter().any(|p| p.strategy == Some(strategy)));
        }
        assert_eq!(seats[0].id, "AI-1");
        assert_eq!(seats[2].id, "AI-3");
        assert!(seats.iter().all(|p| p.is_ai));
    }

    #[test]
    fn test_names_are_distinct_per_game() {
        let mut rng = StdRng::seed_from_u64(99);
        let seats = draw_ai_players(3, &mut rng);
        assert_ne!(seats[0].name, seats[1].name);
        assert_ne!(seats[1].name, seats[2].name);
    }

    #[test]
    fn test_strategies_cycle_past_three_seats() {
        let mut rng = StdRng::seed_from_u64(3);
        let seats = draw_ai_players(5, &mut rng);
        assert_eq!(seats[0].strategy, seats[3].strategy);
        assert_eq!(seats[1].strategy, seats[4].strategy);
    }
}
