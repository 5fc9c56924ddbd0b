use crate::board::{Board, Castling, Color, Move, Piece, PieceType};

impl Board {
    /// Plays `mv` without checking that it is legal and returns the captured
    /// piece, if any.
    ///
    /// A pawn reaching the last rank with no promotion piece named becomes a
    /// queen. Does nothing if `mv.from` is empty.
    pub fn make_move_unchecked(&mut self, mv: Move) -> Option<Piece> {
        let Some(piece) = self.board.remove(mv.from) else {
            debug_assert!(false, "no piece on {}", mv.from);
            return None;
        };
        let color = piece.color();
        let is_pawn = piece.is(PieceType::Pawn);

        let mut captured = self.board.remove(mv.to);
        if captured.is_some() || is_pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if is_pawn && Some(mv.to) == self.en_passant {
            captured = self.board.remove(mv.en_passant_victim());
        }

        let placed = if is_pawn && mv.to.rank() == color.promotion_rank() {
            mv.promotion.unwrap_or(PieceType::Queen).with_color(color)
        } else {
            piece
        };
        self.board.put(placed, mv.to);

        self.en_passant = None;
        if is_pawn && mv.from.rank().abs_diff(mv.to.rank()) == 2 {
            self.en_passant = mv.from.offset(0, color.pawn_direction());
        }

        if piece.is(PieceType::King) {
            self.castling.remove(Castling::of_color(color));
        }
        self.castling
            .remove(Castling::lost_by_rook_on(mv.from) | Castling::lost_by_rook_on(mv.to));

        if color == Color::Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }
        self.to_move = color.flip();

        captured
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::Square;
    use pretty_assertions::assert_eq;

    fn play(fen: &str, moves: &[&str]) -> Board {
        let mut board = Board::from_fen(fen).unwrap();
        for mv in moves {
            board.play(mv.parse::<Move>().unwrap().into()).unwrap();
        }
        board
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let board = play(crate::board::STARTING_POSITION_FEN, &["e2e4"]);
        assert_eq!(board.en_passant(), Some(Square::E3));
        assert_eq!(
            board.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );

        let board = play(crate::board::STARTING_POSITION_FEN, &["e2e4", "g8f6"]);
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmoves(), 2);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let captured = board.make_move_unchecked(Move::new(Square::E5, Square::F6));
        assert_eq!(captured, Some(Piece::BLACK_PAWN));
        assert_eq!(board.piece_at(Square::F5), None);
        assert_eq!(board.piece_at(Square::F6), Some(Piece::WHITE_PAWN));
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn captures_reset_the_clock() {
        let mut board = Board::from_fen("4k3/8/8/3p4/8/8/8/3QK3 w - - 7 20").unwrap();
        let captured = board.make_move_unchecked(Move::new(Square::D1, Square::D5));
        assert_eq!(captured, Some(Piece::BLACK_PAWN));
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmoves(), 20);
        assert_eq!(board.to_move(), Color::Black);
    }

    #[test]
    fn promotion_places_the_named_piece() {
        let mut board = Board::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        board.make_move_unchecked(Move::promoting(Square::E7, Square::E8, PieceType::Rook));
        assert_eq!(board.piece_at(Square::E8), Some(Piece::WHITE_ROOK));
        assert_eq!(board.piece_at(Square::E7), None);

        let mut board = Board::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        board.make_move_unchecked(Move::new(Square::A2, Square::A1));
        assert_eq!(board.piece_at(Square::A1), Some(Piece::BLACK_QUEEN));
    }

    #[test]
    fn king_and_rook_moves_clear_rights() {
        let board = play(
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            &["h1h2", "a8b8"],
        );
        assert_eq!(
            board.castling(),
            Castling::WHITE_QUEENSIDE | Castling::BLACK_KINGSIDE
        );

        let board = play("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["e1e2"]);
        assert_eq!(board.castling(), Castling::BLACK);
    }

    #[test]
    fn capturing_a_rook_on_its_corner_clears_its_right() {
        let board = play("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["a1a8"]);
        assert_eq!(board.castling(), Castling::WHITE_KINGSIDE | Castling::BLACK_KINGSIDE);
    }

    #[test]
    fn clocks_stop_at_their_maximum() {
        let board = play(
            "4k3/8/8/8/8/8/8/R3K3 b - - 4294967295 4294967295",
            &["e8d8", "a1a2"],
        );
        assert_eq!(board.halfmove_clock(), u32::MAX);
        assert_eq!(board.fullmoves(), u32::MAX);
    }
}
