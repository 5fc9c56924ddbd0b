use std::fmt::Display;

use super::{Board, Color};

/// The state of a game: still being played, or finished with a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[default]
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

impl Outcome {
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => Outcome::WhiteWins,
            Color::Black => Outcome::BlackWins,
        }
    }

    pub const fn is_over(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::WhiteWins => Some(Color::White),
            Outcome::BlackWins => Some(Color::Black),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }

    /// The PGN result token.
    pub const fn as_pgn_str(self) -> &'static str {
        match self {
            Outcome::InProgress => "*",
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }

    pub fn from_pgn_str(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Outcome::InProgress),
            "1-0" => Some(Outcome::WhiteWins),
            "0-1" => Some(Outcome::BlackWins),
            "1/2-1/2" => Some(Outcome::Draw),
            _ => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_pgn_str())
    }
}

impl Board {
    /// Decides whether the game is over in this position.
    ///
    /// The fifty-move rule is tested first, so a position with a halfmove
    /// clock of 100 or more is drawn even if it is also checkmate. Otherwise
    /// the side to move without a legal move is checkmated if in check and
    /// stalemated if not.
    pub fn outcome(&self) -> Outcome {
        if self.halfmove_clock >= 100 {
            return Outcome::Draw;
        }

        if self.has_legal_move() {
            Outcome::InProgress
        } else if self.is_in_check(self.to_move) {
            Outcome::win_for(self.to_move.flip())
        } else {
            Outcome::Draw
        }
    }
}
