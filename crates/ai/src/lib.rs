//! Tessera AI
//!
//! Heuristic move selection for computer-controlled seats: enumerate the legal
//! moves, score each under the seat's strategy, and pick among the best at random.

mod agent;
mod chooser;
mod moves;
mod scoring;

pub use agent::*;
pub use chooser::*;
pub use moves::*;
pub use scoring::*;
