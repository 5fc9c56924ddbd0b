//! Move generation, legality checking and move execution.
//!
//! Generation happens in two layers. [`Board::pseudo_moves`] follows each
//! piece's raw movement pattern and knows nothing about check. The legal
//! layer ([`Board::is_legal`], [`Board::legal_moves`]) plays a candidate on a
//! cloned board and rejects it if the mover's own king is attacked
//! afterwards, which covers pins and discovered checks without any local
//! reasoning about them.

use arrayvec::ArrayVec;
use tracing::trace;

use crate::board::{Board, CastleSide, Color, Move, PieceType, Ply, Square};
use crate::error::ChessError;

mod castle;
mod execute;
mod pseudo_legal;

/// Maximum number of moves that could occur in a legal position, used for
/// stack-allocating a vector to hold moves.
///
/// The actual number appears to be 218 in this position:
///
/// R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1
///
/// But 256 is a nice number and a good buffer in case there could be more.
pub const MAX_MOVES: usize = 256;

pub type MoveVec = ArrayVec<Ply, MAX_MOVES>;

impl Board {
    /// Destinations of the piece on `square` under its raw movement pattern,
    /// ignoring whether its own king would be exposed. Empty if the square
    /// is empty.
    pub fn pseudo_moves(&self, square: Square) -> Vec<Square> {
        self.piece_at(square)
            .map(|piece| self.pseudo_destinations(piece, square).squares().collect())
            .unwrap_or_default()
    }

    /// Whether any piece of the other color could move onto `color`'s king.
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some(king) = self.repr().king_square(color) else {
            debug_assert!(false, "{color} has no king");
            return false;
        };

        self.destinations_of(color.flip()).get(king)
    }

    /// Checks everything about `mv` except the promotion piece: the start
    /// holds a piece of the side to move, the end is one of its pseudo-moves,
    /// and the mover's king is safe once the move is played.
    fn check_move(&self, mv: Move) -> Result<(), ChessError> {
        let piece = self
            .piece_at(mv.from)
            .ok_or(ChessError::PieceNotFound(mv.from))?;

        if mv.from == mv.to {
            return Err(ChessError::illegal(format!("{mv} does not move")));
        }

        if piece.color() != self.to_move {
            return Err(ChessError::illegal(format!(
                "{piece} on {} cannot move, it is {}'s turn",
                mv.from, self.to_move
            )));
        }

        if !self.pseudo_destinations(piece, mv.from).get(mv.to) {
            return Err(ChessError::illegal(format!(
                "{piece} on {} cannot reach {}",
                mv.from, mv.to
            )));
        }

        let mut simulated = self.clone();
        simulated.make_move_unchecked(mv);
        if simulated.is_in_check(piece.color()) {
            trace!(%mv, fen = %self.fen(), "rejected: leaves the king in check");
            return Err(ChessError::illegal(format!(
                "{mv} leaves the {} king in check",
                piece.color()
            )));
        }

        Ok(())
    }

    /// Whether `mv` may be played by the side to move. The promotion piece is
    /// not considered.
    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Like [`Board::is_legal`], but reports why a move is rejected, and also
    /// requires a pawn reaching the last rank to name a knight, bishop, rook
    /// or queen and every other move to name nothing.
    pub fn validate_move(&self, mv: Move) -> Result<(), ChessError> {
        self.check_move(mv)?;

        let is_promotion = self
            .piece_at(mv.from)
            .is_some_and(|piece| piece.is(PieceType::Pawn))
            && mv.to.rank() == self.to_move.promotion_rank();

        match (is_promotion, mv.promotion) {
            (true, Some(piece_type)) if piece_type.is_promotion_target() => Ok(()),
            (true, Some(piece_type)) => Err(ChessError::illegal(format!(
                "a pawn cannot promote to {piece_type:?}"
            ))),
            (true, None) => Err(ChessError::illegal(format!(
                "{mv} must name a promotion piece"
            ))),
            (false, Some(_)) => Err(ChessError::illegal(format!("{mv} is not a promotion"))),
            (false, None) => Ok(()),
        }
    }

    /// Every legal destination of the piece on `square`. Empty if the square
    /// is empty or holds a piece of the side not to move.
    pub fn legal_moves(&self, square: Square) -> Vec<Square> {
        let Some(piece) = self.piece_at(square) else {
            return Vec::new();
        };

        self.pseudo_destinations(piece, square)
            .squares()
            .filter(|&to| self.is_legal(Move::new(square, to)))
            .collect()
    }

    /// Every legal ply of the side to move, with promotions expanded to each
    /// possible piece and legal castles included.
    pub fn legal_plies(&self) -> MoveVec {
        let mut plies = MoveVec::new();

        for (piece, from) in self.repr().pieces_colored(self.to_move) {
            let promotes_from = piece.is(PieceType::Pawn)
                && from.rank() == self.to_move.flip().pawn_rank();

            for to in self.legal_moves(from) {
                if promotes_from {
                    for promotion in PieceType::PROMOTIONS {
                        plies.push(Move::promoting(from, to, promotion).into());
                    }
                } else {
                    plies.push(Move::new(from, to).into());
                }
            }
        }

        for side in CastleSide::ALL {
            if self.can_castle(side).is_ok() {
                plies.push(Ply::Castle(side));
            }
        }

        plies
    }

    /// Whether the side to move has at least one legal move. Castling never
    /// needs to be considered: whenever a castle is legal, so is the king's
    /// first step.
    pub fn has_legal_move(&self) -> bool {
        self.repr()
            .pieces_colored(self.to_move)
            .any(|(_, from)| !self.legal_moves(from).is_empty())
    }

    /// Checks and plays a ply of the side to move.
    pub fn play(&mut self, ply: Ply) -> Result<(), ChessError> {
        match ply {
            Ply::Move(mv) => {
                self.validate_move(mv)?;
                self.make_move_unchecked(mv);
            }
            Ply::Castle(side) => {
                self.can_castle(side)?;
                self.castle_unchecked(side);
            }
        }
        Ok(())
    }
}
