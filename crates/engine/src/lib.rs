//! Tessera Game Engine
//!
//! Rules for an Azul-style tile-drafting game. The core object is a single
//! `GameState` (plain data); pure functions in `rules` operate on it, and
//! `GameSession` wraps them in the draft / place / advance protocol a UI drives.

mod codec;
mod error;
mod roster;
mod rules;
mod session;
mod types;

pub use codec::*;
pub use error::*;
pub use roster::*;
pub use rules::*;
pub use session::*;
pub use types::*;
