//! Position state and its text forms: squares, pieces, bitboards, castling
//! rights, FEN and SAN.

mod bitboard;
mod board_repr;
mod castling;
mod fen;
mod move_repr;
mod outcome;
mod piece;
mod san;
mod square;

use std::fmt::{Display, Write};

pub use bitboard::{Bitboard, Squares};
pub use board_repr::BoardRepr;
pub use castling::{CastleSide, Castling};
pub use move_repr::{Move, Ply};
pub use outcome::Outcome;
pub use piece::{Color, Piece, PieceType};
pub use san::San;
pub use square::Square;

use crate::error::ChessError;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A snapshot of a chess position: what stands where, whose turn it is, the
/// remaining castling rights, the en passant target and both clocks.
///
/// This is the value the legality filter clones to simulate a move. Cloning is
/// a plain copy of a few bitboards, and two boards never share state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) board: BoardRepr,
    pub(crate) to_move: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmoves: u32,
}

impl Board {
    pub fn new(
        board: &[Option<Piece>],
        to_move: Color,
        castling: Castling,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmoves: u32,
    ) -> Self {
        let board = BoardRepr::new(board);

        // Rights whose king or rook is missing from its home square can never
        // be used, and would not survive a FEN round trip through a position
        // reached by play.
        let mut castling = castling;
        for color in Color::BOTH {
            let king_home = board.piece_at(CastleSide::king_home(color))
                == Some(PieceType::King.with_color(color));
            for side in CastleSide::ALL {
                let rook_home = board.piece_at(side.rook_home(color))
                    == Some(PieceType::Rook.with_color(color));
                if !king_home || !rook_home {
                    castling.remove(Castling::right(color, side));
                }
            }
        }

        Self {
            board,
            to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmoves,
        }
    }

    pub fn starting_position() -> Self {
        Self::from_fen(STARTING_POSITION_FEN).expect("starting position FEN is valid")
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        fen::parse_fen(fen)
    }

    pub fn fen(&self) -> String {
        fen::board_to_fen(self)
    }

    pub fn repr(&self) -> &BoardRepr {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Every piece on the board with its square.
    pub fn pieces(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.board.pieces()
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn castling(&self) -> Castling {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

/// Draws the board as eight lines of FEN letters, rank 8 first, with `.` for
/// empty squares.
impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let square = Square::new_unchecked(rank, file);
                f.write_char(self.piece_at(square).map_or('.', Piece::as_fen_char))?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
