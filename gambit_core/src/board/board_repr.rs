use std::ops::Index;

use super::{Bitboard, Color, Piece, PieceType, Square};

/// Piece placement only, one [`Bitboard`] per coloured piece plus one
/// occupancy board per colour.
///
/// Slots are addressed by the packed byte of a [`Piece`] and by the value of
/// a [`Color`]: White's occupancy sits at 0 with its pieces at 1..=6, Black's
/// occupancy at 8 with its pieces at 9..=14. Slot 7 is never written.
///
/// ```
/// # use gambit_core::board::{BoardRepr, Color, Piece};
/// fn show(repr: &BoardRepr) {
///     println!("White king: {:?}", repr[Piece::WHITE_KING]);
///     println!("All black pieces: {:?}", repr[Color::Black]);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoardRepr {
    boards: [Bitboard; 15],
}

impl BoardRepr {
    /// Builds the placement from 64 optional pieces indexed a1, b1, ..., h8.
    /// Anything past the 64th entry is ignored.
    pub fn new(squares: &[Option<Piece>]) -> Self {
        let mut repr = Self::default();
        for (square, piece) in Square::all().zip(squares) {
            if let Some(piece) = *piece {
                repr.put(piece, square);
            }
        }
        repr
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let color = Color::BOTH
            .into_iter()
            .find(|&color| self[color].get(square))?;
        PieceType::ALL
            .into_iter()
            .map(|piece_type| piece_type.with_color(color))
            .find(|&piece| self[piece].get(square))
    }

    /// How many of `piece_type` each side has, White first.
    pub fn piece_count(&self, piece_type: PieceType) -> (u32, u32) {
        let [white, black] =
            Color::BOTH.map(|color| self[piece_type.with_color(color)].pop_count());
        (white, black)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self[PieceType::King.with_color(color)].to_square()
    }

    pub fn occupied(&self) -> Bitboard {
        self[Color::White] | self[Color::Black]
    }

    pub fn empty(&self) -> Bitboard {
        !self.occupied()
    }

    /// Pieces of one side with their squares, grouped by piece type.
    pub fn pieces_colored(&self, color: Color) -> impl Iterator<Item = (Piece, Square)> + '_ {
        PieceType::ALL.into_iter().flat_map(move |piece_type| {
            let piece = piece_type.with_color(color);
            self[piece].squares().map(move |square| (piece, square))
        })
    }

    /// Every piece on the board, White's first.
    pub fn pieces(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        Color::BOTH
            .into_iter()
            .flat_map(move |color| self.pieces_colored(color))
    }

    /// Places `piece` on an empty `square`.
    pub(crate) fn put(&mut self, piece: Piece, square: Square) {
        debug_assert!(self.piece_at(square).is_none(), "{square} is occupied");
        for slot in [piece.get(), piece.color() as u8] {
            self.boards[slot as usize].set(square);
        }
    }

    /// Clears `square`, returning what stood there.
    pub(crate) fn remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square)?;
        for slot in [piece.get(), piece.color() as u8] {
            self.boards[slot as usize].reset(square);
        }
        Some(piece)
    }
}

impl Index<Piece> for BoardRepr {
    type Output = Bitboard;

    fn index(&self, piece: Piece) -> &Bitboard {
        &self.boards[piece.get() as usize]
    }
}

impl Index<Color> for BoardRepr {
    type Output = Bitboard;

    fn index(&self, color: Color) -> &Bitboard {
        &self.boards[color as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{Board, STARTING_POSITION_FEN};
    use pretty_assertions::assert_eq;

    fn repr_of(fen: &str) -> BoardRepr {
        *Board::from_fen(fen).unwrap().repr()
    }

    #[test]
    fn short_input_leaves_the_rest_empty() {
        let repr = BoardRepr::new(&[
            Some(Piece::WHITE_ROOK),
            Some(Piece::BLACK_KING),
            None,
            Some(Piece::BLACK_BISHOP),
        ]);

        let mut pieces = repr.pieces().collect::<Vec<_>>();
        pieces.sort_by_key(|&(_, square)| square);
        assert_eq!(
            pieces,
            vec![
                (Piece::WHITE_ROOK, Square::A1),
                (Piece::BLACK_KING, Square::B1),
                (Piece::BLACK_BISHOP, Square::D1),
            ]
        );
    }

    #[test]
    fn reads_pieces_of_the_initial_setup() {
        let repr = repr_of(STARTING_POSITION_FEN);

        assert_eq!(repr.piece_at(Square::D1), Some(Piece::WHITE_QUEEN));
        assert_eq!(repr.piece_at(Square::H1), Some(Piece::WHITE_ROOK));
        assert_eq!(repr.piece_at(Square::B8), Some(Piece::BLACK_KNIGHT));
        assert_eq!(repr.piece_at(Square::H7), Some(Piece::BLACK_PAWN));
        assert_eq!(repr.piece_at(Square::E4), None);
        assert_eq!(repr.piece_at(Square::C6), None);

        assert_eq!(repr.pieces_colored(Color::White).count(), 16);
        assert!(repr
            .pieces_colored(Color::Black)
            .all(|(piece, square)| piece.color() == Color::Black && square.rank() >= 6));
    }

    #[test]
    fn counts_pieces_and_finds_kings() {
        let repr = repr_of("5B2/6P1/1p6/8/1N4q1/kP6/2K5/8 w - - 0 1");

        assert_eq!(repr.piece_count(PieceType::Pawn), (2, 1));
        assert_eq!(repr.piece_count(PieceType::Knight), (1, 0));
        assert_eq!(repr.piece_count(PieceType::Queen), (0, 1));
        assert_eq!(repr.piece_count(PieceType::King), (1, 1));
        assert_eq!(repr.king_square(Color::White), Some(Square::C2));
        assert_eq!(repr.king_square(Color::Black), Some(Square::A3));
    }

    #[test]
    fn put_and_remove_keep_occupancy_in_step() {
        let mut repr = repr_of(STARTING_POSITION_FEN);

        assert_eq!(repr.remove(Square::E2), Some(Piece::WHITE_PAWN));
        assert_eq!(repr.remove(Square::E2), None);
        repr.put(Piece::WHITE_PAWN, Square::E4);

        assert_eq!(repr.piece_at(Square::E4), Some(Piece::WHITE_PAWN));
        assert!(repr[Color::White].get(Square::E4));
        assert!(!repr[Color::White].get(Square::E2));
        assert_eq!(repr.occupied().pop_count(), 32);
        assert_eq!(repr.empty().pop_count(), 32);
    }
}
