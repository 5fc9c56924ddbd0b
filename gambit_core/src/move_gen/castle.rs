use tracing::trace;

use crate::board::{Board, CastleSide, Castling, Color, PieceType, Square};
use crate::error::ChessError;

impl Board {
    /// Checks whether `color` may castle towards `side` right now.
    pub fn validate_castle(&self, color: Color, side: CastleSide) -> Result<(), ChessError> {
        if color != self.to_move {
            return Err(ChessError::illegal(format!(
                "{color} cannot castle, it is {}'s turn",
                self.to_move
            )));
        }
        self.can_castle(side)
    }

    /// Checks whether the side to move may castle towards `side`.
    pub fn can_castle(&self, side: CastleSide) -> Result<(), ChessError> {
        let color = self.to_move;
        let king_home = CastleSide::king_home(color);
        let rook_home = side.rook_home(color);

        if self.is_in_check(color) {
            return Err(ChessError::illegal(format!("{color} cannot castle out of check")));
        }

        if !self.castling.contains(Castling::right(color, side)) {
            return Err(ChessError::illegal(format!(
                "{color} has lost the right to castle {side}"
            )));
        }

        if self.piece_at(king_home) != Some(PieceType::King.with_color(color))
            || self.piece_at(rook_home) != Some(PieceType::Rook.with_color(color))
        {
            return Err(ChessError::illegal(format!(
                "{color} king or rook is not on its home square"
            )));
        }

        if squares_between(king_home, rook_home).any(|square| self.piece_at(square).is_some()) {
            return Err(ChessError::illegal(format!(
                "pieces stand between the {color} king and rook"
            )));
        }

        // Walk the king one square at a time and test check after each step.
        let mut simulated = self.clone();
        let mut king = king_home;
        for _ in 0..2 {
            let Some(next) = king.offset(side.direction(), 0) else {
                break;
            };
            if let Some(piece) = simulated.board.remove(king) {
                simulated.board.put(piece, next);
            }
            king = next;

            if simulated.is_in_check(color) {
                trace!(%king, fen = %self.fen(), "rejected castle: king passes an attacked square");
                return Err(ChessError::illegal(format!(
                    "the {color} king would pass through or land on attacked {king}"
                )));
            }
        }

        Ok(())
    }

    /// Castles the side to move towards `side` without checking that it is
    /// legal.
    pub fn castle_unchecked(&mut self, side: CastleSide) {
        let color = self.to_move;

        if let Some(king) = self.board.remove(CastleSide::king_home(color)) {
            self.board.put(king, side.king_destination(color));
        }
        if let Some(rook) = self.board.remove(side.rook_home(color)) {
            self.board.put(rook, side.rook_destination(color));
        }

        self.castling.remove(Castling::of_color(color));
        self.en_passant = None;
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        if color == Color::Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }
        self.to_move = color.flip();
    }
}

/// The squares strictly between two squares on the same rank.
fn squares_between(a: Square, b: Square) -> impl Iterator<Item = Square> {
    let (low, high) = if a.file() < b.file() { (a, b) } else { (b, a) };
    (low.file() + 1..high.file()).map(move |file| Square::new_unchecked(low.rank(), file))
}
