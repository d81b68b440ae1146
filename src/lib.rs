//! Tessera: an Azul-style tile-drafting game
//!
//! Re-exports the rules engine and the heuristic AI, and adds a self-play driver
//! and text reports on top of them.

pub use tessera_ai as ai;
pub use tessera_engine::*;

pub mod report;
pub mod selfplay;
