//! A game record on top of the board: move history, captured pieces, result,
//! and PGN import and export.

mod pgn;
mod position;

pub use pgn::PgnTags;
pub use position::Position;

use tracing::warn;

use crate::board::{Board, CastleSide, Color, Move, Outcome, Piece, PieceType, San, Square};
use crate::error::ChessError;

/// The entry point for callers: one game from its starting position to its
/// current state, with the tags it is exported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    tags: PgnTags,
}

impl Game {
    /// Starts a game from `start_fen`, or from the `FEN` tag, or from the
    /// standard setup if neither is given.
    pub fn new_game(mut tags: PgnTags, start_fen: Option<&str>) -> Result<Self, ChessError> {
        let board = match start_fen.or(tags.fen.as_deref()) {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::starting_position(),
        };
        tags.fen = start_fen.map(str::to_string).or(tags.fen);

        Ok(Self {
            position: Position::new(board),
            tags,
        })
    }

    /// Reads a PGN game and replays its moves.
    pub fn load_pgn(text: &str) -> Result<Self, ChessError> {
        let parsed = pgn::parse_pgn(text)?;
        let mut game = Self::new_game(parsed.tags, None)?;

        for (i, token) in parsed.moves.iter().enumerate() {
            if let Err(err) = game.position.play_san(token) {
                warn!(ply = i + 1, %token, %err, "PGN replay stopped");
                return Err(err);
            }
        }

        if let Some(result) = parsed.result {
            if !game.position.outcome().is_over() {
                game.tags.result = result.as_pgn_str().to_string();
            }
        }

        Ok(game)
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn tags(&self) -> &PgnTags {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut PgnTags {
        &mut self.tags
    }

    pub fn outcome(&self) -> Outcome {
        self.position.outcome()
    }

    pub fn captured(&self) -> &[Piece] {
        self.position.captured()
    }

    pub fn legal_moves(&self, square: Square) -> Result<Vec<Square>, ChessError> {
        self.position.legal_moves(square)
    }

    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<San, ChessError> {
        self.position.make_move(Move {
            from,
            to,
            promotion,
        })
    }

    pub fn castle(&mut self, color: Color, side: CastleSide) -> Result<San, ChessError> {
        self.position.castle(color, side)
    }

    pub fn play_san(&mut self, text: &str) -> Result<San, ChessError> {
        self.position.play_san(text)
    }

    pub fn export_fen(&self) -> String {
        self.position.fen()
    }

    pub fn export_pgn(&self) -> String {
        pgn::write_pgn(&self.tags, &self.position)
    }

    pub fn san_history(&self) -> Vec<String> {
        self.position
            .plies()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn fen_history(&self) -> Vec<String> {
        self.position.history().iter().map(Board::fen).collect()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            position: Position::default(),
            tags: PgnTags::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const OPERA_GAME: &str = r#"[Event "Paris"]
[Site "Paris FRA"]
[Date "1858.??.??"]
[Round "?"]
[White "Paul Morphy"]
[Black "Duke Karl / Count Isouard"]
[Result "1-0"]
[ECO "C41"]

1. e4 e5 2. Nf3 d6 3. d4 Bg4 {This is a weak move already.} 4. dxe5 Bxf3 5. Qxf3
dxe5 6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 12.
O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8# 1-0
"#;

    #[test]
    fn new_game_starts_from_the_standard_setup() {
        let game = Game::new_game(PgnTags::default(), None).unwrap();
        assert_eq!(game.export_fen(), crate::board::STARTING_POSITION_FEN);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game, Game::default());

        let total: usize = game
            .board()
            .repr()
            .pieces_colored(Color::White)
            .map(|(_, square)| game.legal_moves(square).unwrap().len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn new_game_from_fen() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 b - - 0 30";
        let game = Game::new_game(PgnTags::default(), Some(fen)).unwrap();
        assert_eq!(game.export_fen(), fen);
        assert_eq!(game.tags().fen.as_deref(), Some(fen));

        assert!(matches!(
            Game::new_game(PgnTags::default(), Some("8/8/8 w - - 0 1")),
            Err(ChessError::MalformedFen(_))
        ));
    }

    #[test]
    fn loads_the_opera_game() {
        let game = Game::load_pgn(OPERA_GAME).unwrap();
        assert_eq!(game.outcome(), Outcome::WhiteWins);
        assert_eq!(game.san_history().len(), 33);
        assert_eq!(game.san_history().last().map(String::as_str), Some("Rd8#"));
        assert_eq!(game.fen_history().len(), 34);
        assert_eq!(game.tags().white, "Paul Morphy");
        assert_eq!(
            game.tags().extra,
            vec![("ECO".to_string(), "C41".to_string())]
        );
        assert_eq!(
            game.export_fen(),
            "1n1Rkb1r/p4ppp/4q3/4p1B1/4P3/8/PPP2PPP/2K5 b k - 1 17"
        );
    }

    #[test]
    fn export_then_load_reproduces_the_game() {
        let game = Game::load_pgn(OPERA_GAME).unwrap();
        let exported = game.export_pgn();

        assert!(exported.starts_with("[Event \"Paris\"]\n[Site \"Paris FRA\"]\n"));
        assert!(exported.contains("[Result \"1-0\"]\n[ECO \"C41\"]\n\n1. e4 e5 2. Nf3"));
        assert!(exported.trim_end().ends_with("17. Rd8# 1-0"));
        assert!(exported.lines().all(|line| line.len() <= 80));

        let reloaded = Game::load_pgn(&exported).unwrap();
        assert_eq!(reloaded.san_history(), game.san_history());
        assert_eq!(reloaded.export_pgn(), exported);
    }

    #[test]
    fn export_marks_a_black_first_start() {
        let mut game = Game::new_game(
            PgnTags::default(),
            Some("4k3/8/8/8/8/8/4P3/4K3 b - - 0 30"),
        )
        .unwrap();
        game.play_san("Kd7").unwrap();
        game.make_move(Square::E2, Square::E4, None).unwrap();

        let exported = game.export_pgn();
        assert!(exported.contains("[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 30\"]\n"));
        assert!(exported.ends_with("\n30... Kd7 31. e4 *\n"));

        let reloaded = Game::load_pgn(&exported).unwrap();
        assert_eq!(reloaded.export_fen(), game.export_fen());
    }

    #[test]
    fn castling_through_the_facade() {
        let mut game = Game::new_game(
            PgnTags::default(),
            Some("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"),
        )
        .unwrap();
        assert!(game.castle(Color::Black, CastleSide::Queenside).is_err());
        game.castle(Color::White, CastleSide::Queenside).unwrap();
        game.castle(Color::Black, CastleSide::Kingside).unwrap();
        assert_eq!(game.san_history(), ["O-O-O", "O-O"]);
        assert_eq!(game.export_fen(), "r4rk1/8/8/8/8/8/8/2KR3R w - - 2 2");
    }

    #[test]
    fn promotion_requires_a_piece() {
        let mut game =
            Game::new_game(PgnTags::default(), Some("7k/4P3/8/8/8/8/8/4K3 w - - 0 1")).unwrap();
        assert!(matches!(
            game.make_move(Square::E7, Square::E8, None),
            Err(ChessError::IllegalMove(_))
        ));
        let san = game
            .make_move(Square::E7, Square::E8, Some(PieceType::Queen))
            .unwrap();
        assert_eq!(san.to_string(), "e8=Q+");
        assert_eq!(game.board().piece_at(Square::E8), Some(Piece::WHITE_QUEEN));
    }

    #[test]
    fn fifty_move_rule_ends_the_game() {
        let mut game =
            Game::new_game(PgnTags::default(), Some("4k3/8/8/8/8/8/8/R3K3 w - - 99 80")).unwrap();
        game.play_san("Ra2").unwrap();
        assert_eq!(game.outcome(), Outcome::Draw);
        assert_eq!(game.play_san("Kd7"), Err(ChessError::GameOver));
        assert!(game.export_pgn().trim_end().ends_with("80. Ra2 1/2-1/2"));
    }

    #[test]
    fn replay_failures_are_reported() {
        assert!(matches!(
            Game::load_pgn("1. e4 e5 2. Ke3"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            Game::load_pgn("1. e4 {unterminated"),
            Err(ChessError::MalformedPgn(_))
        ));
    }

    #[test]
    fn resignation_result_is_taken_from_the_move_text() {
        let game = Game::load_pgn("1. e4 e5 0-1").unwrap();
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.tags().result, "0-1");
        assert!(game.export_pgn().contains("[Result \"0-1\"]"));
    }

    #[test]
    fn huge_move_numbers_are_accepted() {
        let fen = "4k3/8/8/8/8/8/8/4K3 b - - 0 4294967295";
        let mut game = Game::new_game(PgnTags::default(), Some(fen)).unwrap();
        game.play_san("Kd7").unwrap();
        assert_eq!(game.board().fullmoves(), u32::MAX);
    }
}
