use thiserror::Error;

use crate::board::Square;

/// Every recoverable failure the engine reports.
///
/// A rejected operation never leaves a half-applied change behind: the
/// position it was called on is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("No piece on {0}")]
    PieceNotFound(Square),
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    #[error("Invalid square {0:?}")]
    InvalidSquare(String),
    #[error("Malformed FEN: {0}")]
    MalformedFen(String),
    #[error("Ambiguous move {0:?}")]
    AmbiguousNotation(String),
    #[error("Invalid move notation {0:?}")]
    InvalidNotation(String),
    #[error("Malformed PGN: {0}")]
    MalformedPgn(String),
    #[error("The game is already over")]
    GameOver,
}

impl ChessError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalMove(reason.into())
    }
}
