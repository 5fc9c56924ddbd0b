use super::{Board, Castling, Color, Piece, PieceType, Square};
use crate::error::ChessError;

pub fn board_to_fen(board: &Board) -> String {
    let mut result = String::new();

    for rank in (0..8).rev() {
        let mut empty_squares = 0;
        for file in 0..8 {
            let square = Square::new_unchecked(rank, file);
            match board.piece_at(square) {
                None => empty_squares += 1,
                Some(piece) => {
                    if empty_squares > 0 {
                        result.push((empty_squares + b'0') as _);
                    }
                    result.push(piece.as_fen_char());
                    empty_squares = 0;
                }
            }
        }
        if empty_squares > 0 {
            result.push((empty_squares + b'0') as _);
        }
        if rank > 0 {
            result.push('/');
        }
    }

    result.push(' ');
    result.push(if board.to_move().is_white() { 'w' } else { 'b' });
    result.push(' ');
    result.push_str(&board.castling().as_fen_str());
    result.push(' ');
    match board.en_passant() {
        Some(square) => result.push_str(&square.to_string()),
        None => result.push('-'),
    };

    result.push(' ');
    result.push_str(&board.halfmove_clock().to_string());
    result.push(' ');
    result.push_str(&board.fullmoves().to_string());

    result
}

fn malformed(reason: impl Into<String>) -> ChessError {
    ChessError::MalformedFen(reason.into())
}

pub fn parse_fen(fen: &str) -> Result<Board, ChessError> {
    let fields: Vec<_> = fen.split_whitespace().collect();
    // The two clocks are often left off when a position is copied by hand.
    let (halfmove_clock, fullmoves) = match fields.len() {
        6 => (fields[4], fields[5]),
        4 => ("0", "1"),
        n => return Err(malformed(format!("expected 6 fields, found {n}"))),
    };

    let board = parse_placement(fields[0])?;

    let to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(malformed(format!("unknown side to move {other:?}"))),
    };

    let castling = Castling::from_fen_str(fields[2])?;

    let en_passant = match fields[3] {
        "-" => None,
        square => {
            let square: Square = square
                .parse()
                .map_err(|_| malformed(format!("bad en passant square {square:?}")))?;
            // The target is the square the pawn skipped, which lies on the
            // mover's opponent's third rank.
            let expected_rank = match to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if square.rank() != expected_rank {
                return Err(malformed(format!(
                    "en passant square {square} is impossible with {to_move} to move"
                )));
            }
            Some(square)
        }
    };
    if let Some(target) = en_passant {
        check_double_step(&board, target, to_move.flip())?;
    }

    let halfmove_clock = halfmove_clock
        .parse()
        .map_err(|_| malformed(format!("bad halfmove clock {halfmove_clock:?}")))?;
    let fullmoves = fullmoves
        .parse()
        .ok()
        .filter(|&n: &u32| n >= 1)
        .ok_or_else(|| malformed(format!("bad fullmove number {fullmoves:?}")))?;

    for color in Color::BOTH {
        let kings = board
            .iter()
            .filter(|&&piece| piece == Some(PieceType::King.with_color(color)))
            .count();
        if kings != 1 {
            return Err(malformed(format!("{color} has {kings} kings")));
        }
    }

    let board = Board::new(
        &board,
        to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmoves,
    );

    // The side that just moved can never have left its king attacked.
    if board.is_in_check(to_move.flip()) {
        return Err(malformed(format!(
            "{} is in check with {to_move} to move",
            to_move.flip()
        )));
    }

    Ok(board)
}

/// The target must be the square a pawn of `mover` just skipped: empty,
/// with that pawn one step beyond it and its start square vacated.
fn check_double_step(
    board: &[Option<Piece>; 64],
    target: Square,
    mover: Color,
) -> Result<(), ChessError> {
    let direction = mover.pawn_direction();
    let at = |square: Option<Square>| square.and_then(|square| board[square.index()]);

    let consistent = board[target.index()].is_none()
        && at(target.offset(0, direction)) == Some(PieceType::Pawn.with_color(mover))
        && target
            .offset(0, -direction)
            .is_some_and(|start| board[start.index()].is_none());

    if consistent {
        Ok(())
    } else {
        Err(malformed(format!(
            "en passant square {target} does not follow a {mover} pawn double step"
        )))
    }
}

fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64], ChessError> {
    let ranks: Vec<_> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(format!("expected 8 ranks, found {}", ranks.len())));
    }

    let mut board = [None; 64];
    for (rank_index, rank_pieces) in ranks.into_iter().enumerate() {
        let rank = 7 - rank_index as u8;
        let mut file = 0u8;
        for c in rank_pieces.chars() {
            if file >= 8 {
                return Err(malformed(format!("rank {} is too long", rank + 1)));
            }

            if let Some(digit) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += digit as u8;
            } else {
                let piece = Piece::try_from_fen_char(c)
                    .ok_or_else(|| malformed(format!("unknown piece {c:?}")))?;
                board[Square::new_unchecked(rank, file).index()] = Some(piece);
                file += 1;
            }
        }

        if file != 8 {
            return Err(malformed(format!(
                "rank {} covers {file} files instead of 8",
                rank + 1
            )));
        }
    }

    Ok(board)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::STARTING_POSITION_FEN;
    use pretty_assertions::assert_eq;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn starting_position_round_trips() {
        let board = parse_fen(STARTING_POSITION_FEN).unwrap();
        assert_eq!(board_to_fen(&board), STARTING_POSITION_FEN);
        assert_eq!(board.to_move(), Color::White);
        assert_eq!(board.castling(), Castling::all());
        assert_eq!(board.piece_at(Square::E1), Some(Piece::WHITE_KING));
        assert_eq!(board.piece_at(Square::D8), Some(Piece::BLACK_QUEEN));
    }

    #[test]
    fn all_fields_round_trip() {
        for fen in [
            KIWIPETE,
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 12 40",
            "r3k3/8/8/8/8/8/8/4K2R b Kq - 99 120",
        ] {
            let board = parse_fen(fen).unwrap();
            assert_eq!(board_to_fen(&board), fen);
            assert_eq!(parse_fen(&board_to_fen(&board)), Ok(board));
        }
    }

    #[test]
    fn clocks_default_when_omitted() {
        let board = parse_fen("4k3/8/8/8/8/8/8/4K3 b -").err();
        assert!(board.is_some());

        let board = parse_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmoves(), 1);
    }

    #[test]
    fn en_passant_target_is_read() {
        let board =
            parse_fen("rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 2").unwrap();
        assert_eq!(board.en_passant(), Some(Square::E6));
    }

    #[test]
    fn rejects_malformed_placement() {
        for fen in [
            // 7 files on the first rank
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1",
            // 9 files
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN2 w KQkq - 0 1",
            // unknown symbol
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBXKBNR w KQkq - 0 1",
            // 7 ranks
            "rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            // digit 0 and 9
            "rnbqkbnr/pppppppp/8/8/8/08/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        ] {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::MalformedFen(_))),
                "{fen} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_fields() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
        ] {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::MalformedFen(_))),
                "{fen} should be rejected"
            );
        }
    }

    #[test]
    fn en_passant_target_must_follow_a_double_step() {
        for fen in [
            // a king stands where the pawn should be
            "8/8/8/3kP3/8/8/8/4K3 w - d6 0 1",
            // the mover's own knight stands there
            "4k3/8/8/3NP3/8/8/8/4K3 w - d6 0 1",
            // nothing stands there
            "4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1",
            // the target square is occupied
            "4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1",
            // the pawn's start square is occupied
            "4k3/3r4/8/3pP3/8/8/8/4K3 w - d6 0 1",
            // a white pawn cannot have just moved with White to move
            "4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1",
            // same checks from Black's side
            "4k3/8/8/8/3Bp3/8/8/4K3 b - d3 0 1",
            "4k3/8/8/8/3Pp3/8/3N4/4K3 b - d3 0 1",
        ] {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::MalformedFen(_))),
                "{fen} should be rejected"
            );
        }

        let board = parse_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        assert_eq!(board.en_passant(), Some(Square::D3));
    }

    #[test]
    fn rejects_side_not_to_move_in_check() {
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1"),
            Err(ChessError::MalformedFen(_))
        ));
        assert!(parse_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").is_ok());
    }

    #[test]
    fn rejects_missing_or_extra_kings() {
        assert!(parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(parse_fen("k7/8/8/8/8/8/8/4KK2 w - - 0 1").is_err());
        assert_eq!(
            parse_fen("k7/8/8/8/8/8/8/4K3 w - - 0 1")
                .unwrap()
                .repr()
                .piece_count(PieceType::King),
            (1, 1)
        );
    }
}
