use crate::board::{Bitboard, Board, Color, Square};

/// Steps every set square one rank towards `color`'s promotion rank.
pub(crate) fn pawn_forward(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => pawns.step_north(),
        Color::Black => pawns.step_south(),
    }
}

/// The two squares a pawn of `color` standing on `pawns` attacks.
pub(crate) fn pawn_attacks(pawns: Bitboard, color: Color) -> Bitboard {
    let forward = pawn_forward(pawns, color);
    forward.step_east() | forward.step_west()
}

impl Board {
    /// Pushes, the double step from the home rank, and diagonal captures onto
    /// an enemy piece or the en passant target.
    pub(super) fn pseudo_legal_pawn_destinations(&self, from: Square, color: Color) -> Bitboard {
        let pawn = Bitboard::from_square(from);
        let empty = self.repr().empty();

        let single_push = pawn_forward(pawn, color) & empty;
        let double_push = if from.rank() == color.pawn_rank() {
            pawn_forward(single_push, color) & empty
        } else {
            Bitboard::EMPTY
        };

        let mut capturable = self.repr()[color.flip()];
        if let Some(target) = self.en_passant_target_for(color) {
            capturable.set(target);
        }
        let captures = pawn_attacks(pawn, color) & capturable;

        single_push | double_push | captures
    }

    /// The en passant target, if a pawn of `color` could take onto it.
    ///
    /// The target always lies on the third rank of the side that just made
    /// the double step, so a pawn of that same side can never use it.
    pub(crate) fn en_passant_target_for(&self, color: Color) -> Option<Square> {
        let capture_rank = match color {
            Color::White => 5,
            Color::Black => 2,
        };
        self.en_passant()
            .filter(|target| target.rank() == capture_rank)
    }
}
