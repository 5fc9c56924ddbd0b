use std::fmt::{Display, Write};

use super::{Board, CastleSide, Move, PieceType, Ply, Square};
use crate::error::ChessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disambiguator {
    File(u8),
    Rank(u8),
    Square(Square),
}

impl Display for Disambiguator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disambiguator::File(file) => f.write_char((file + b'a') as char),
            Disambiguator::Rank(rank) => f.write_char((rank + b'1') as char),
            Disambiguator::Square(square) => write!(f, "{square}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegularSanRepr {
    piece_type: PieceType,
    disambiguator: Option<Disambiguator>,
    is_capture: bool,
    to_square: Square,
    promotion: Option<PieceType>,
    is_en_passant: bool,
}

impl Display for RegularSanRepr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.piece_type != PieceType::Pawn {
            f.write_char(self.piece_type.as_uppercase_char())?;
        }

        if let Some(disambiguator) = self.disambiguator {
            write!(f, "{disambiguator}")?;
        }

        if self.is_capture {
            f.write_char('x')?;
        }

        write!(f, "{}", self.to_square)?;

        if let Some(promotion) = self.promotion {
            f.write_char('=')?;
            f.write_char(promotion.as_uppercase_char())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SanRepr {
    Regular(RegularSanRepr),
    Castle(CastleSide),
}

impl Display for SanRepr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SanRepr::Regular(r) => write!(f, "{r}"),
            SanRepr::Castle(side) => f.write_str(side.as_san_str()),
        }
    }
}

/// A ply in Standard Algebraic Notation, as rendered for the position it is
/// played from.
///
/// The [`Display`] form marks en passant captures with a trailing `e.p.`
/// (`exd6e.p.`); [`San::to_pgn_string`] leaves the marker out, as PGN move
/// text requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct San {
    ply: Ply,
    repr: SanRepr,
    is_check: bool,
    is_checkmate: bool,
}

impl San {
    /// The ply this notation describes.
    pub fn ply(&self) -> Ply {
        self.ply
    }

    pub fn is_check(&self) -> bool {
        self.is_check
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_checkmate
    }

    pub fn is_en_passant(&self) -> bool {
        matches!(self.repr, SanRepr::Regular(r) if r.is_en_passant)
    }

    pub fn to_pgn_string(&self) -> String {
        let mut text = self.repr.to_string();
        text.push_str(self.suffix());
        text
    }

    fn suffix(&self) -> &'static str {
        if self.is_checkmate {
            "#"
        } else if self.is_check {
            "+"
        } else {
            ""
        }
    }
}

impl Display for San {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repr)?;

        if self.is_en_passant() {
            f.write_str("e.p.")?;
        }

        f.write_str(self.suffix())
    }
}

impl Board {
    /// Renders `ply` in SAN for this position.
    ///
    /// The ply must be legal; the check and checkmate suffixes are found by
    /// playing it on a copy of the board.
    pub fn san(&self, ply: Ply) -> Result<San, ChessError> {
        let mut after = self.clone();
        after.play(ply)?;

        let repr = match ply {
            Ply::Castle(side) => SanRepr::Castle(side),
            Ply::Move(mv) => SanRepr::Regular(self.regular_san_repr(mv)?),
        };

        let is_checkmate = after.outcome().winner() == Some(self.to_move);
        let is_check = !is_checkmate && after.is_in_check(after.to_move());

        Ok(San {
            ply,
            repr,
            is_check,
            is_checkmate,
        })
    }

    fn regular_san_repr(&self, mv: Move) -> Result<RegularSanRepr, ChessError> {
        let piece = self
            .piece_at(mv.from)
            .ok_or(ChessError::PieceNotFound(mv.from))?;
        let piece_type = piece.piece_type();

        let is_en_passant = piece_type == PieceType::Pawn && self.en_passant == Some(mv.to);
        let is_capture = self.piece_at(mv.to).is_some() || is_en_passant;

        let disambiguator = if piece_type == PieceType::Pawn {
            // Pawn captures always name the file they leave from.
            is_capture.then_some(Disambiguator::File(mv.from.file()))
        } else {
            self.san_disambiguator(mv)
        };

        Ok(RegularSanRepr {
            piece_type,
            disambiguator,
            is_capture,
            to_square: mv.to,
            promotion: mv.promotion,
            is_en_passant,
        })
    }

    fn san_disambiguator(&self, mv: Move) -> Option<Disambiguator> {
        let piece = self.piece_at(mv.from)?;
        let rivals = self
            .repr()
            .pieces_colored(piece.color())
            .filter(|&(other, from)| {
                other == piece && from != mv.from && self.is_legal(Move::new(from, mv.to))
            })
            .map(|(_, from)| from)
            .collect::<Vec<_>>();

        if rivals.is_empty() {
            None
        } else if rivals.iter().all(|rival| rival.file() != mv.from.file()) {
            Some(Disambiguator::File(mv.from.file()))
        } else if rivals.iter().all(|rival| rival.rank() != mv.from.rank()) {
            Some(Disambiguator::Rank(mv.from.rank()))
        } else {
            Some(Disambiguator::Square(mv.from))
        }
    }

    /// Resolves a SAN token against this position.
    ///
    /// Trailing annotations (`!`, `?`), check and mate marks and an `e.p.`
    /// marker are accepted and ignored. Castling may be written with letter O
    /// or digit zero. The returned ply has been checked to be legal.
    pub fn parse_san(&self, text: &str) -> Result<Ply, ChessError> {
        let invalid = || ChessError::InvalidNotation(text.to_string());

        if !text.is_ascii() {
            return Err(invalid());
        }

        let san = text
            .trim()
            .trim_end_matches(['!', '?'])
            .trim_end_matches(['+', '#']);
        let san = san.strip_suffix("e.p.").unwrap_or(san).trim_end();

        let castle = match san {
            "O-O" | "0-0" => Some(CastleSide::Kingside),
            "O-O-O" | "0-0-0" => Some(CastleSide::Queenside),
            _ => None,
        };
        if let Some(side) = castle {
            self.can_castle(side)?;
            return Ok(Ply::Castle(side));
        }

        let (san, promotion) = split_promotion(san).ok_or_else(invalid)?;

        if san.len() < 2 {
            return Err(invalid());
        }
        let (rest, destination) = san.split_at(san.len() - 2);
        let to: Square = destination.parse().map_err(|_| invalid())?;
        let rest = rest.strip_suffix('x').unwrap_or(rest);

        let (piece_type, rest) = match rest.chars().next().and_then(PieceType::try_from_char) {
            Some(piece_type) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => {
                (piece_type, &rest[1..])
            }
            _ => (PieceType::Pawn, rest),
        };
        let mut file = None;
        let mut rank = None;
        for c in rest.bytes() {
            match c {
                b'a'..=b'h' if file.is_none() => file = Some(c - b'a'),
                b'1'..=b'8' if rank.is_none() => rank = Some(c - b'1'),
                _ => return Err(invalid()),
            }
        }

        // A pawn named without a file pushes straight ahead.
        if piece_type == PieceType::Pawn && file.is_none() {
            file = Some(to.file());
        }

        let piece = piece_type.with_color(self.to_move);
        let candidates = self
            .repr()
            .pieces_colored(self.to_move)
            .filter(|&(other, from)| {
                other == piece
                    && file.map_or(true, |file| from.file() == file)
                    && rank.map_or(true, |rank| from.rank() == rank)
                    && self.is_legal(Move::new(from, to))
            })
            .map(|(_, from)| from)
            .collect::<Vec<_>>();

        let from = match candidates.as_slice() {
            [] => return Err(invalid()),
            [from] => *from,
            _ => return Err(ChessError::AmbiguousNotation(text.to_string())),
        };

        let mv = Move {
            from,
            to,
            promotion,
        };
        self.validate_move(mv)?;
        Ok(mv.into())
    }
}

/// Splits a promotion suffix off a SAN token, written either as `=Q` or as a
/// bare piece letter after the destination rank (`e8Q`). Returns `None` if
/// the suffix names something a pawn cannot become.
fn split_promotion(san: &str) -> Option<(&str, Option<PieceType>)> {
    let promotion_from = |c: char| {
        PieceType::try_from_char(c)
            .filter(|piece_type| c.is_ascii_uppercase() && piece_type.is_promotion_target())
    };

    if let Some((head, piece)) = san.split_once('=') {
        let mut chars = piece.chars();
        let piece_type = chars.next().and_then(promotion_from)?;
        if chars.next().is_some() {
            return None;
        }
        return Some((head, Some(piece_type)));
    }

    let bytes = san.as_bytes();
    if let [.., digit, last] = bytes {
        if digit.is_ascii_digit() && last.is_ascii_uppercase() {
            let piece_type = promotion_from(*last as char)?;
            return Some((&san[..san.len() - 1], Some(piece_type)));
        }
    }

    Some((san, None))
}
