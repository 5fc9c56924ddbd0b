use tracing::debug;

use crate::board::{Board, CastleSide, Color, Move, Outcome, Piece, Ply, San, Square};
use crate::error::ChessError;

/// A game in progress: the current board plus everything that only exists
/// because moves were played on it.
///
/// Every mutating method validates first and commits after, so a rejected
/// move leaves the position exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    outcome: Outcome,
    captured: Vec<Piece>,
    history: Vec<Board>,
    plies: Vec<San>,
}

impl Position {
    pub fn new(board: Board) -> Self {
        Self {
            outcome: board.outcome(),
            captured: Vec::new(),
            history: vec![board.clone()],
            plies: Vec::new(),
            board,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Pieces taken out of play, in the order they were captured.
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// Every board of the game, from the starting one up to and including
    /// the current one.
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// The plies played so far, as SAN.
    pub fn plies(&self) -> &[San] {
        &self.plies
    }

    pub fn fen(&self) -> String {
        self.board.fen()
    }

    /// Legal destinations of the piece on `square`. A finished game has none.
    pub fn legal_moves(&self, square: Square) -> Result<Vec<Square>, ChessError> {
        if self.board.piece_at(square).is_none() {
            return Err(ChessError::PieceNotFound(square));
        }
        if self.outcome.is_over() {
            return Ok(Vec::new());
        }
        Ok(self.board.legal_moves(square))
    }

    pub fn make_move(&mut self, mv: Move) -> Result<San, ChessError> {
        self.play(Ply::Move(mv))
    }

    pub fn castle(&mut self, color: Color, side: CastleSide) -> Result<San, ChessError> {
        if self.outcome.is_over() {
            return Err(ChessError::GameOver);
        }
        self.board.validate_castle(color, side)?;
        self.play(Ply::Castle(side))
    }

    /// Plays `ply` for the side to move and returns it as SAN.
    pub fn play(&mut self, ply: Ply) -> Result<San, ChessError> {
        if self.outcome.is_over() {
            return Err(ChessError::GameOver);
        }

        let san = self.board.san(ply)?;

        match ply {
            Ply::Move(mv) => {
                if let Some(piece) = self.board.make_move_unchecked(mv) {
                    self.captured.push(piece);
                }
            }
            Ply::Castle(side) => self.board.castle_unchecked(side),
        }

        self.outcome = self.board.outcome();
        self.history.push(self.board.clone());
        self.plies.push(san);

        debug!(
            %san,
            fen = %self.board.fen(),
            outcome = ?self.outcome,
            "committed ply"
        );

        Ok(san)
    }

    /// Resolves a SAN token against the current board and plays it.
    pub fn play_san(&mut self, text: &str) -> Result<San, ChessError> {
        if self.outcome.is_over() {
            return Err(ChessError::GameOver);
        }
        let ply = self.board.parse_san(text)?;
        self.play(ply)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(Board::starting_position())
    }
}
