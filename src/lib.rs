#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Basilisk, a board-state engine for a 24x24 fairy chess variant.
//!
//! The crate owns the mutable position: the square array, the per-type
//! piece location lists, the packed game-state word with its undo stack,
//! the incremental Zobrist hash, and the repetition history. Callers
//! (move generation, search, UI) drive it through
//! [`board::Board::make_move`] / [`board::Board::unmake_move`] and the
//! position notation codec in [`fen`]. Legality is never judged here.

#[macro_use]
mod macros;

pub mod board;
pub mod chessmove;
pub mod cli;
pub mod errors;
pub mod fen;
pub mod gamestate;
pub mod lookups;
pub mod makemove;
pub mod piece;
pub mod piecelist;
mod rng;
pub mod types;

/// The name of the engine.
pub static NAME: &str = "Basilisk";
/// The version of the engine.
pub static VERSION: &str = env!("CARGO_PKG_VERSION");
