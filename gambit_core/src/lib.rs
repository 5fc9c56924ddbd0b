//! A chess rules engine.
//!
//! Holds the authoritative state of a game, generates and validates moves
//! under the full rule set, detects check, checkmate, stalemate and the
//! fifty-move rule, and converts positions and games to and from FEN, SAN and
//! PGN.

pub mod board;
pub mod error;
pub mod game;
pub mod move_gen;
pub mod perft;

#[cfg(test)]
mod test_utils;

pub use error::ChessError;
