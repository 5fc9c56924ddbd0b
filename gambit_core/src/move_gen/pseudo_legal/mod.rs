use crate::board::{Bitboard, Board, Color, Piece, PieceType, Square};

mod pawn_moves;

type Step = fn(Bitboard) -> Bitboard;

const ROOK_STEPS: [Step; 4] = [
    Bitboard::step_north,
    Bitboard::step_south,
    Bitboard::step_east,
    Bitboard::step_west,
];

const BISHOP_STEPS: [Step; 4] = [
    Bitboard::step_north_east,
    Bitboard::step_north_west,
    Bitboard::step_south_east,
    Bitboard::step_south_west,
];

/// Casts a ray from `from` in each direction, one square at a time. A ray
/// includes the first occupied square it meets and stops there.
fn slide(from: Square, occupied: Bitboard, steps: &[Step]) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    for step in steps {
        let mut ray = step(Bitboard::from_square(from));
        while ray.has_piece() {
            result |= ray;
            if (ray & occupied).has_piece() {
                break;
            }
            ray = step(ray);
        }
    }
    result
}

pub(crate) fn rook_attacks(from: Square, occupied: Bitboard) -> Bitboard {
    slide(from, occupied, &ROOK_STEPS)
}

pub(crate) fn bishop_attacks(from: Square, occupied: Bitboard) -> Bitboard {
    slide(from, occupied, &BISHOP_STEPS)
}

pub(crate) fn queen_attacks(from: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(from, occupied) | bishop_attacks(from, occupied)
}

pub(crate) fn knight_attacks(from: Square) -> Bitboard {
    let b = Bitboard::from_square(from);
    let north = b.step_north().step_north();
    let south = b.step_south().step_south();
    let east = b.step_east().step_east();
    let west = b.step_west().step_west();

    north.step_east()
        | north.step_west()
        | south.step_east()
        | south.step_west()
        | east.step_north()
        | east.step_south()
        | west.step_north()
        | west.step_south()
}

pub(crate) fn king_attacks(from: Square) -> Bitboard {
    let b = Bitboard::from_square(from);
    let row = b | b.step_east() | b.step_west();
    (row | row.step_north() | row.step_south()).without(b)
}

impl Board {
    /// Destinations of `piece` standing on `from` under its raw movement
    /// pattern, without regard for its own king. Squares holding a piece of
    /// the same color are never included.
    pub(crate) fn pseudo_destinations(&self, piece: Piece, from: Square) -> Bitboard {
        let occupied = self.repr().occupied();
        let color = piece.color();

        let pattern = match piece.piece_type() {
            PieceType::Pawn => self.pseudo_legal_pawn_destinations(from, color),
            PieceType::Knight => knight_attacks(from),
            PieceType::Bishop => bishop_attacks(from, occupied),
            PieceType::Rook => rook_attacks(from, occupied),
            PieceType::Queen => queen_attacks(from, occupied),
            PieceType::King => king_attacks(from),
        };

        pattern.without(self.repr()[color])
    }

    /// Every square attacked by any piece of `color`, by pseudo-move pattern.
    pub(crate) fn destinations_of(&self, color: Color) -> Bitboard {
        self.repr()
            .pieces_colored(color)
            .fold(Bitboard::EMPTY, |acc, (piece, square)| {
                acc | self.pseudo_destinations(piece, square)
            })
    }
}
