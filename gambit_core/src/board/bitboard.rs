use std::fmt::{self, Debug};
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use super::Square;

/// A set of squares packed into a [`u64`], bit `n` standing for the square
/// with index `n` (a1 = 0, h8 = 63).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Bitboard(pub u64);

// Squares a one-file shift may wrap onto.
const NOT_A_FILE: u64 = !0x0101_0101_0101_0101;
const NOT_H_FILE: u64 = !0x8080_8080_8080_8080;

impl Bitboard {
    pub const EMPTY: Self = Self(0);

    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.get())
    }

    pub const fn has_piece(self) -> bool {
        self.0 != 0
    }

    pub const fn pop_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Set difference.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn get(self, square: Square) -> bool {
        self.0 >> square.get() & 1 == 1
    }

    pub fn set(&mut self, square: Square) {
        *self |= Self::from_square(square);
    }

    pub fn reset(&mut self, square: Square) {
        *self = self.without(Self::from_square(square));
    }

    /// The lowest square in the set.
    pub const fn to_square(self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Some(Square::from_index_unchecked(bits.trailing_zeros() as usize)),
        }
    }

    /// Iterates over the set squares from a1 towards h8.
    pub fn squares(self) -> Squares {
        Squares(self.0)
    }

    pub const fn step_north(self) -> Self {
        Self(self.0 << 8)
    }

    pub const fn step_south(self) -> Self {
        Self(self.0 >> 8)
    }

    pub const fn step_east(self) -> Self {
        Self(self.0 << 1 & NOT_A_FILE)
    }

    pub const fn step_west(self) -> Self {
        Self(self.0 >> 1 & NOT_H_FILE)
    }

    pub const fn step_north_east(self) -> Self {
        self.step_north().step_east()
    }

    pub const fn step_north_west(self) -> Self {
        self.step_north().step_west()
    }

    pub const fn step_south_east(self) -> Self {
        self.step_south().step_east()
    }

    pub const fn step_south_west(self) -> Self {
        self.step_south().step_west()
    }
}

impl Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard(")?;
        for rank in (0..8).rev() {
            let row = (0..8)
                .map(|file| match self.get(Square::new_unchecked(rank, file)) {
                    true => 'x',
                    false => '.',
                })
                .collect::<String>();
            writeln!(f, "    {row}")?;
        }
        write!(f, ")")
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |acc, square| acc | Self::from_square(square))
    }
}

macro_rules! bitwise_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $tok:tt) => {
        impl $op for Bitboard {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self(self.0 $tok rhs.0)
            }
        }

        impl $assign for Bitboard {
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $tok rhs;
            }
        }
    };
}

bitwise_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitwise_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bitwise_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Iterator returned by [`Bitboard::squares`].
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let square = Bitboard(self.0).to_square()?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Squares {}
