use gambit_core::{board::Board, perft::perft};
use pretty_assertions::assert_eq;

fn check_perft(fen: &str, expected: &[u64]) {
    let board = Board::from_fen(fen).unwrap();
    let received = (1..=expected.len())
        .map(|depth| perft(&board, depth))
        .collect::<Vec<_>>();
    assert_eq!(received, expected, "node counts for {fen}");
}

#[test]
fn starting_position() {
    check_perft(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[20, 400, 8902],
    );
}

#[test]
fn kiwipete() {
    check_perft(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2039],
    );
}

#[test]
fn en_passant_and_rook_endgame() {
    check_perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]);
}

#[test]
fn promotions_and_checks() {
    check_perft(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9467],
    );
}

#[test]
fn discovered_checks() {
    check_perft(
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1486],
    );
}
