use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use gambit_core::{
    board::{Board, CastleSide, Move, Ply, Square},
    game::{Game, PgnTags},
    perft::{divide, perft},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line front end for the gambit chess rules engine.
///
/// Sets up positions from FEN, plays moves on them, lists legal moves, runs
/// perft and reads and writes PGN. Set `RUST_LOG=debug` to see every move the
/// engine commits.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board and its FEN after playing the given moves.
    Fen {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// List the legal moves in the position, in SAN.
    Moves {
        #[command(flatten)]
        position: PositionArgs,

        /// Only list moves of the piece on this square.
        #[arg(short, long)]
        square: Option<Square>,
    },

    /// Count the leaves of the legal move tree to a given depth.
    Perft {
        #[command(flatten)]
        position: PositionArgs,

        /// Exact depth to search to.
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..), default_value_t = 4)]
        depth: u8,

        /// Run in divide mode.
        ///
        /// When provided, will run perft down to the provided depth and list
        /// each possible move in the current position along with the number of
        /// nodes found under that move. This is useful for debugging errors by
        /// identifying the exact sequence of moves under which they occur.
        #[arg(long)]
        divide: bool,
    },

    /// Write a game as PGN.
    ///
    /// With `--file`, reads a PGN game, replays it and writes it back out.
    /// Otherwise builds the game from `--position` and `--moves` under the
    /// given tags.
    Pgn {
        #[command(flatten)]
        position: PositionArgs,

        #[command(flatten)]
        tags: TagArgs,

        /// PGN file to read.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct PositionArgs {
    /// Starting position of the board.
    ///
    /// Expects either the string "startpos" or a valid position in
    /// Forsyth-Edwards Notation (FEN).
    #[arg(short, long, default_value = "startpos")]
    position: String,

    /// Moves to play on top of the starting position.
    ///
    /// Each move is either SAN (`Nf3`, `exd5`, `O-O`, `e8=Q`) or coordinate
    /// notation: the starting square followed by the ending square, plus an
    /// optional promotion target as a lowercase FEN char, e.g. `d2d4`,
    /// `e2e1q`.
    #[arg(short, long, num_args(0..))]
    moves: Vec<String>,
}

#[derive(Args, Debug)]
struct TagArgs {
    #[arg(long, default_value = "Casual Game")]
    event: String,
    #[arg(long, default_value = "?")]
    site: String,
    #[arg(long, default_value = "????.??.??")]
    date: String,
    #[arg(long, default_value = "?")]
    round: String,
    #[arg(long, default_value = "White")]
    white: String,
    #[arg(long, default_value = "Black")]
    black: String,
}

impl From<TagArgs> for PgnTags {
    fn from(args: TagArgs) -> Self {
        Self {
            event: args.event,
            site: args.site,
            date: args.date,
            round: args.round,
            white: args.white,
            black: args.black,
            ..Default::default()
        }
    }
}

impl PositionArgs {
    fn into_game(self, tags: PgnTags) -> anyhow::Result<Game> {
        let start_fen = (self.position != "startpos").then_some(self.position.as_str());
        let mut game = Game::new_game(tags, start_fen).with_context(|| {
            format!("Expected `startpos` or a valid FEN string, got {:?}", self.position)
        })?;

        for text in &self.moves {
            let played = match text.parse::<Move>() {
                Ok(mv) => game.make_move(mv.from, mv.to, mv.promotion),
                Err(_) => game.play_san(text),
            };
            played.with_context(|| {
                format!(
                    "Move `{text}` is invalid to play in this position ({})",
                    game.export_fen()
                )
            })?;
        }

        Ok(game)
    }
}

fn print_board(game: &Game) {
    print!("{}", game.board());
    println!();
    println!("FEN: {}", game.export_fen());
    println!("Result: {}", game.outcome());
    let history = game.san_history();
    if !history.is_empty() {
        println!("Moves: {}", history.join(" "));
    }
}

fn print_moves(board: &Board, square: Option<Square>) -> anyhow::Result<()> {
    if let Some(square) = square {
        if board.piece_at(square).is_none() {
            bail!("There is no piece on {square}");
        }
    }

    let mut listed = Vec::new();
    for ply in board.legal_plies() {
        if let Some(square) = square {
            let from_square = match ply {
                Ply::Move(mv) => mv.from,
                Ply::Castle(_) => CastleSide::king_home(board.to_move()),
            };
            if from_square != square {
                continue;
            }
        }
        listed.push(board.san(ply)?.to_string());
    }

    println!("{} legal moves", listed.len());
    for san in listed {
        println!("{san}");
    }

    Ok(())
}

fn generic_perft(board: &Board, max_depth: usize) {
    let mut total_time = Duration::ZERO;
    let mut last_depth_time = Duration::ZERO;
    let mut total_nodes = 0;

    for depth in 1..=max_depth {
        let start_time = Instant::now();

        let nodes = perft(board, depth);

        let time_taken = start_time.elapsed();

        println!(
            "Depth: {depth}\tNodes: {nodes}\tTime taken: {:.3}s",
            time_taken.as_secs_f64()
        );

        total_time += time_taken;
        last_depth_time = time_taken;
        total_nodes += nodes;
    }

    println!();

    let nodes_per_second = total_nodes as f64 / last_depth_time.as_secs_f64();

    println!(
        "Total nodes: {total_nodes}\tTotal time: {:.3}s\tNodes per second: {:.3}",
        total_time.as_secs_f64(),
        nodes_per_second
    );
}

fn specific_perft(board: &Board, depth: usize) {
    let mut total_nodes = 0;
    for (ply, nodes) in divide(board, depth) {
        total_nodes += nodes;
        println!("{ply}: {nodes}");
    }

    println!();
    println!("Nodes searched: {total_nodes}");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Fen { position } => {
            let game = position.into_game(PgnTags::default())?;
            print_board(&game);
        }

        Command::Moves { position, square } => {
            let game = position.into_game(PgnTags::default())?;
            print_moves(game.board(), square)?;
        }

        Command::Perft {
            position,
            depth,
            divide,
        } => {
            let game = position.into_game(PgnTags::default())?;
            info!(fen = %game.export_fen(), depth, divide, "running perft");
            if divide {
                specific_perft(game.board(), depth as _);
            } else {
                generic_perft(game.board(), depth as _);
            }
        }

        Command::Pgn {
            position,
            tags,
            file,
        } => {
            let game = match file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Could not read {}", path.display()))?;
                    Game::load_pgn(&text)
                        .with_context(|| format!("Could not replay {}", path.display()))?
                }
                None => position.into_game(tags.into())?,
            };
            print!("{}", game.export_pgn());
        }
    }

    Ok(())
}
