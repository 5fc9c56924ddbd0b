use std::fmt::{self, Debug, Display};
use std::num::NonZeroU8;

use num_derive::ToPrimitive;
use num_traits::ToPrimitive;

/// The kind of a piece, without its colour.
///
/// Discriminants run from 1 to 6 so that a [`Piece`] can pack one into its
/// low three bits and never be zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ToPrimitive)]
pub enum PieceType {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// What a pawn may become on its last rank, strongest first.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub const fn with_color(self, color: Color) -> Piece {
        Piece::new(color, self)
    }

    /// Letter used by SAN and by FEN for White.
    pub const fn as_uppercase_char(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    pub const fn as_lowercase_char(self) -> char {
        self.as_uppercase_char().to_ascii_lowercase()
    }

    /// Reads a piece letter, ignoring case.
    pub fn try_from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|piece_type| piece_type.as_uppercase_char() == upper)
    }

    pub const fn is_promotion_target(self) -> bool {
        !matches!(self, PieceType::Pawn | PieceType::King)
    }
}

/// One of the two sides.
///
/// White is 0 and Black is 8 so that or-ing a colour with a [`PieceType`]
/// gives the packed form of a [`Piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    White = 0,
    Black = 8,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    /// The opponent.
    pub const fn flip(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank delta of a single pawn push.
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Zero-based rank this side's pawns start on.
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Zero-based rank of this side's king and rooks in the initial setup.
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub const fn promotion_rank(self) -> u8 {
        self.flip().back_rank()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::White => "White",
            Color::Black => "Black",
        };
        f.write_str(name)
    }
}

/// A coloured piece, packed as `color | piece_type` into a non-zero byte so
/// that `Option<Piece>` is a single byte too.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece(NonZeroU8);

impl Piece {
    pub const WHITE_PAWN: Piece = PieceType::Pawn.with_color(Color::White);
    pub const WHITE_KNIGHT: Piece = PieceType::Knight.with_color(Color::White);
    pub const WHITE_BISHOP: Piece = PieceType::Bishop.with_color(Color::White);
    pub const WHITE_ROOK: Piece = PieceType::Rook.with_color(Color::White);
    pub const WHITE_QUEEN: Piece = PieceType::Queen.with_color(Color::White);
    pub const WHITE_KING: Piece = PieceType::King.with_color(Color::White);
    pub const BLACK_PAWN: Piece = PieceType::Pawn.with_color(Color::Black);
    pub const BLACK_KNIGHT: Piece = PieceType::Knight.with_color(Color::Black);
    pub const BLACK_BISHOP: Piece = PieceType::Bishop.with_color(Color::Black);
    pub const BLACK_ROOK: Piece = PieceType::Rook.with_color(Color::Black);
    pub const BLACK_QUEEN: Piece = PieceType::Queen.with_color(Color::Black);
    pub const BLACK_KING: Piece = PieceType::King.with_color(Color::Black);

    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        match NonZeroU8::new(color as u8 | piece_type as u8) {
            Some(packed) => Self(packed),
            None => unreachable!(),
        }
    }

    pub const fn color(self) -> Color {
        match self.0.get() & Color::Black as u8 {
            0 => Color::White,
            _ => Color::Black,
        }
    }

    pub const fn piece_type(self) -> PieceType {
        match self.0.get() & 0b111 {
            1 => PieceType::Pawn,
            2 => PieceType::Knight,
            3 => PieceType::Bishop,
            4 => PieceType::Rook,
            5 => PieceType::Queen,
            6 => PieceType::King,
            _ => panic!("corrupt piece packing"),
        }
    }

    pub fn is(self, piece_type: PieceType) -> bool {
        piece_type.to_u8() == Some(self.0.get() & 0b111)
    }

    /// The packed `color | piece_type` byte.
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    pub fn as_fen_char(self) -> char {
        match self.color() {
            Color::White => self.piece_type().as_uppercase_char(),
            Color::Black => self.piece_type().as_lowercase_char(),
        }
    }

    /// Reads a FEN piece letter: uppercase is White, lowercase is Black.
    pub fn try_from_fen_char(c: char) -> Option<Self> {
        let color = match c.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        PieceType::try_from_char(c).map(|piece_type| piece_type.with_color(color))
    }
}

impl Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({} {:?})", self.color(), self.piece_type())
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_fen_char())
    }
}
