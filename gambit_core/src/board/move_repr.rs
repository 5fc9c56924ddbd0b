use std::{
    fmt::{Display, Write},
    str::FromStr,
};

use super::{CastleSide, PieceType, Square};
use crate::error::ChessError;

/// A move of one piece from a start square to an end square, with the piece a
/// pawn promotes to when it reaches the last rank.
///
/// Castling is not a [`Move`]: the rook travels too, so castles are expressed
/// with [`Ply::Castle`] instead.
///
/// Moves print and parse in coordinate notation, the start square followed by
/// the end square and an optional lowercase promotion letter:
///
/// ```
/// # use gambit_core::board::{Move, PieceType, Square};
/// assert_eq!(
///     "e7e8q".parse(),
///     Ok(Move::promoting(Square::E7, Square::E8, PieceType::Queen))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn promoting(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// If this move is an en passant capture, returns the square of the pawn
    /// it takes: same rank as the start, same file as the end.
    pub const fn en_passant_victim(self) -> Square {
        Square::new_unchecked(self.from.rank(), self.to.file())
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.from.fmt(f)?;
        self.to.fmt(f)?;
        if let Some(promotion) = self.promotion {
            f.write_char(promotion.as_lowercase_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || (s.len() != 4 && s.len() != 5) {
            return Err(ChessError::InvalidNotation(s.to_string()));
        }

        let from = s[0..2].parse()?;
        let to = s[2..4].parse()?;

        let promotion = match s[4..].chars().next() {
            Some(c) => Some(
                PieceType::try_from_char(c)
                    .filter(|piece_type| piece_type.is_promotion_target())
                    .ok_or_else(|| ChessError::InvalidNotation(s.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

/// One half-move as played in a game: an ordinary [`Move`] or a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ply {
    Move(Move),
    Castle(CastleSide),
}

impl From<Move> for Ply {
    fn from(value: Move) -> Self {
        Ply::Move(value)
    }
}

impl Display for Ply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ply::Move(m) => m.fmt(f),
            Ply::Castle(side) => side.fmt(f),
        }
    }
}
