use std::fmt::{self, Display};
use std::str::FromStr;

use seq_macro::seq;

use crate::error::ChessError;

/// A square on the board.
///
/// Stored as `8 * rank + file` with both coordinates zero-based, so a1 is 0,
/// h1 is 7 and h8 is 63. [`Square::from_file_rank`] accepts the one-based
/// coordinates players use; [`FromStr`] and [`Display`] convert to and from
/// algebraic text such as `e4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

seq!(N in 1..=8 {
    impl Square {
        pub const A~N: Self = Self::new_unchecked(N - 1, 0);
        pub const B~N: Self = Self::new_unchecked(N - 1, 1);
        pub const C~N: Self = Self::new_unchecked(N - 1, 2);
        pub const D~N: Self = Self::new_unchecked(N - 1, 3);
        pub const E~N: Self = Self::new_unchecked(N - 1, 4);
        pub const F~N: Self = Self::new_unchecked(N - 1, 5);
        pub const G~N: Self = Self::new_unchecked(N - 1, 6);
        pub const H~N: Self = Self::new_unchecked(N - 1, 7);
    }
});

impl Square {
    /// Zero-based coordinates. Out of range values wrap around the board.
    pub const fn new_unchecked(rank: u8, file: u8) -> Self {
        Self((rank % 8) * 8 + file % 8)
    }

    pub const fn from_index_unchecked(index: usize) -> Self {
        Self((index & 63) as u8)
    }

    /// Constructs a square from one-based coordinates, e.g. `(5, 4)` is e4.
    pub fn from_file_rank(file: u8, rank: u8) -> Result<Self, ChessError> {
        match (file.checked_sub(1), rank.checked_sub(1)) {
            (Some(f @ 0..=7), Some(r @ 0..=7)) => Ok(Self::new_unchecked(r, f)),
            _ => Err(ChessError::InvalidSquare(format!("({file}, {rank})"))),
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based rank, 0 for the first rank.
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Zero-based file, 0 for the a-file.
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    /// The one-based `(file, rank)` pair of this square.
    pub const fn file_rank(self) -> (u8, u8) {
        (self.file() + 1, self.rank() + 1)
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if that is
    /// still on the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = u8::try_from(self.file() as i8 + file_delta).ok()?;
        let rank = u8::try_from(self.rank() as i8 + rank_delta).ok()?;
        (file < 8 && rank < 8).then(|| Self::new_unchecked(rank, file))
    }

    /// All 64 squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).map(Self)
    }

    pub const fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    pub const fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Ok(Self::new_unchecked(rank - b'1', file - b'a'))
            }
            _ => Err(ChessError::InvalidSquare(s.to_string())),
        }
    }
}
