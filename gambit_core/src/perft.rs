//! Counting the leaves of the legal move tree, used to check move generation
//! against published node counts.

use crate::board::{Board, Ply};

pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let plies = board.legal_plies();
    if depth == 1 {
        return plies.len() as u64;
    }

    plies
        .into_iter()
        .map(|ply| perft(&after(board, ply), depth - 1))
        .sum()
}

/// Node counts below each legal ply at the root, in generation order.
pub fn divide(board: &Board, depth: usize) -> Vec<(Ply, u64)> {
    board
        .legal_plies()
        .into_iter()
        .map(|ply| (ply, perft(&after(board, ply), depth.saturating_sub(1))))
        .collect()
}

fn after(board: &Board, ply: Ply) -> Board {
    let mut next = board.clone();
    match ply {
        Ply::Move(mv) => {
            next.make_move_unchecked(mv);
        }
        Ply::Castle(side) => next.castle_unchecked(side),
    }
    next
}
