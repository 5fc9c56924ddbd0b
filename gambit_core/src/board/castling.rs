use std::fmt::Display;

use bitflags::bitflags;

use super::{Color, Square};
use crate::error::ChessError;

bitflags! {
    /// Castling rights still held by each side.
    ///
    /// A right survives only while neither the king nor the rook on that
    /// side has left its home square. Moving the king drops both of its
    /// side's rights, moving or losing a rook drops only the one it belongs
    /// to. Whether a held right can be exercised right now (empty squares in
    /// between, no attacked squares on the king's path) is decided at move
    /// time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Castling: u8 {
        const WHITE_KINGSIDE  = 1;
        const WHITE_QUEENSIDE = 1 << 1;
        const BLACK_KINGSIDE  = 1 << 2;
        const BLACK_QUEENSIDE = 1 << 3;

        const WHITE = Self::WHITE_KINGSIDE.bits() | Self::WHITE_QUEENSIDE.bits();
        const BLACK = Self::BLACK_KINGSIDE.bits() | Self::BLACK_QUEENSIDE.bits();
    }
}

impl Default for Castling {
    fn default() -> Self {
        Self::all()
    }
}

impl Castling {
    /// The single right for `color` castling towards `side`.
    pub const fn right(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Both rights of `color`.
    pub const fn of_color(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE,
            Color::Black => Self::BLACK,
        }
    }

    /// The right lost when the rook on `square` moves or is captured, if
    /// `square` is one of the four rook corners.
    pub fn lost_by_rook_on(square: Square) -> Self {
        Color::BOTH
            .into_iter()
            .flat_map(|color| CastleSide::ALL.map(|side| (color, side)))
            .find(|&(color, side)| side.rook_home(color) == square)
            .map_or(Self::empty(), |(color, side)| Self::right(color, side))
    }

    const FEN_LETTERS: [(Self, char); 4] = [
        (Self::WHITE_KINGSIDE, 'K'),
        (Self::WHITE_QUEENSIDE, 'Q'),
        (Self::BLACK_KINGSIDE, 'k'),
        (Self::BLACK_QUEENSIDE, 'q'),
    ];

    /// The FEN castling field: `-` when no rights are left, otherwise the
    /// held rights as `KQkq` in that order.
    pub fn as_fen_str(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        Self::FEN_LETTERS
            .iter()
            .filter(|(right, _)| self.contains(*right))
            .map(|&(_, letter)| letter)
            .collect()
    }

    /// Parses the castling field of a FEN string.
    pub fn from_fen_str(field: &str) -> Result<Self, ChessError> {
        if field == "-" {
            return Ok(Self::empty());
        }

        if field.is_empty() {
            return Err(ChessError::MalformedFen("empty castling field".to_string()));
        }

        field.chars().try_fold(Self::empty(), |rights, c| {
            Self::FEN_LETTERS
                .iter()
                .find(|&&(_, letter)| letter == c)
                .map(|&(right, _)| rights | right)
                .ok_or_else(|| {
                    ChessError::MalformedFen(format!("unexpected castling character {c:?}"))
                })
        })
    }
}

/// The side of the board a castle goes towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Where `color`'s king must stand to castle.
    pub const fn king_home(color: Color) -> Square {
        Square::new_unchecked(color.back_rank(), 4)
    }

    /// Where `color`'s rook for this side must stand to castle.
    pub const fn rook_home(self, color: Color) -> Square {
        let file = match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        };
        Square::new_unchecked(color.back_rank(), file)
    }

    pub const fn king_destination(self, color: Color) -> Square {
        let file = match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        };
        Square::new_unchecked(color.back_rank(), file)
    }

    pub const fn rook_destination(self, color: Color) -> Square {
        let file = match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        };
        Square::new_unchecked(color.back_rank(), file)
    }

    /// The file step the king takes each square, +1 towards the h-file.
    pub const fn direction(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    pub const fn as_san_str(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}

impl Display for CastleSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_san_str())
    }
}
