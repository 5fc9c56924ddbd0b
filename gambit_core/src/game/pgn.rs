use crate::board::{Color, Outcome, STARTING_POSITION_FEN};
use crate::error::ChessError;

use super::Position;

const LINE_WIDTH: usize = 80;

/// The header tags of a PGN game.
///
/// The seven roster tags are always written, in roster order. `fen` holds the
/// starting position of a game that does not begin from the standard setup,
/// and `extra` keeps any other tags in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnTags {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
    pub fen: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl Default for PgnTags {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "?".to_string(),
            white: "White".to_string(),
            black: "Black".to_string(),
            result: Outcome::InProgress.as_pgn_str().to_string(),
            fen: None,
            extra: Vec::new(),
        }
    }
}

impl PgnTags {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "Event" => self.event = value,
            "Site" => self.site = value,
            "Date" => self.date = value,
            "Round" => self.round = value,
            "White" => self.white = value,
            "Black" => self.black = value,
            "Result" => self.result = value,
            "FEN" => self.fen = Some(value),
            // Regenerated from `fen` on export.
            "SetUp" => {}
            _ => self.extra.push((name.to_string(), value)),
        }
    }
}

/// A PGN game split into its header tags and the move text tokens that name
/// moves, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedPgn {
    pub tags: PgnTags,
    pub moves: Vec<String>,
    pub result: Option<Outcome>,
}

fn malformed(reason: impl Into<String>) -> ChessError {
    ChessError::MalformedPgn(reason.into())
}

pub(crate) fn parse_pgn(text: &str) -> Result<ParsedPgn, ChessError> {
    let mut tags = PgnTags::default();
    let mut lines = text.lines().peekable();

    while let Some(&line) = lines.peek() {
        let line = line.trim();
        if line.is_empty() {
            lines.next();
        } else if line.starts_with('[') {
            let (name, value) = parse_tag(line)?;
            tags.set(&name, value);
            lines.next();
        } else {
            break;
        }
    }

    let movetext = lines.collect::<Vec<_>>().join("\n");
    let (moves, result) = parse_movetext(&movetext)?;

    Ok(ParsedPgn {
        tags,
        moves,
        result,
    })
}

/// Parses a `[Name "Value"]` header line.
fn parse_tag(line: &str) -> Result<(String, String), ChessError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| malformed(format!("unterminated tag {line:?}")))?
        .trim();

    let name_end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(inner.len());
    let (name, rest) = inner.split_at(name_end);
    if name.is_empty() {
        return Err(malformed(format!("tag without a name {line:?}")));
    }

    let mut chars = rest
        .trim_start()
        .strip_prefix('"')
        .ok_or_else(|| malformed(format!("tag {name} has no quoted value")))?
        .chars();

    let mut value = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            Some('"') => {
                if !chars.as_str().trim().is_empty() {
                    return Err(malformed(format!("text after the value of tag {name}")));
                }
                return Ok((name.to_string(), value));
            }
            Some(c) => value.push(c),
            None => break,
        }
    }

    Err(malformed(format!("unterminated value for tag {name}")))
}

/// Splits move text into move tokens, dropping comments, variations, NAGs and
/// move numbers. Stops at the first result token.
fn parse_movetext(movetext: &str) -> Result<(Vec<String>, Option<Outcome>), ChessError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = movetext.chars();

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                flush(&mut current, &mut tokens);
                skip_comment(&mut chars)?;
            }
            ';' => {
                flush(&mut current, &mut tokens);
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' => {
                flush(&mut current, &mut tokens);
                skip_variation(&mut chars)?;
            }
            ')' => return Err(malformed("unmatched ')' in move text")),
            '}' => return Err(malformed("unmatched '}' in move text")),
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);

    let mut moves = Vec::new();
    for token in tokens {
        if let Some(outcome) = Outcome::from_pgn_str(&token) {
            return Ok((moves, Some(outcome)));
        }
        if token.starts_with('$') || token == "e.p." {
            continue;
        }

        let san = strip_move_number(&token);
        if !san.is_empty() {
            moves.push(san.to_string());
        }
    }

    Ok((moves, None))
}

fn skip_comment(chars: &mut std::str::Chars<'_>) -> Result<(), ChessError> {
    if chars.any(|c| c == '}') {
        Ok(())
    } else {
        Err(malformed("unterminated comment"))
    }
}

fn skip_variation(chars: &mut std::str::Chars<'_>) -> Result<(), ChessError> {
    let mut depth = 1;
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            '{' => skip_comment(chars)?,
            _ => {}
        }
    }
    Err(malformed("unterminated variation"))
}

/// `12.`, `12...` and `12.e4` all name move 12; the last also carries a move.
/// A token of digits not followed by a dot, like `0-0`, is left alone.
fn strip_move_number(token: &str) -> &str {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits_end > 0 && token[digits_end..].starts_with('.') {
        token[digits_end..].trim_start_matches('.')
    } else if digits_end == token.len() {
        ""
    } else {
        token
    }
}

fn write_tag(out: &mut String, name: &str, value: &str) {
    let value = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{name} \"{value}\"]\n"));
}

/// Writes a finished or unfinished game as PGN.
pub(crate) fn write_pgn(tags: &PgnTags, position: &Position) -> String {
    let result = if position.outcome().is_over() {
        position.outcome().as_pgn_str()
    } else {
        tags.result.as_str()
    };

    let mut out = String::new();
    let roster = [
        ("Event", tags.event.as_str()),
        ("Site", tags.site.as_str()),
        ("Date", tags.date.as_str()),
        ("Round", tags.round.as_str()),
        ("White", tags.white.as_str()),
        ("Black", tags.black.as_str()),
        ("Result", result),
    ];
    for (name, value) in roster {
        write_tag(&mut out, name, value);
    }

    let start = &position.history()[0];
    let start_fen = start.fen();
    if start_fen != STARTING_POSITION_FEN {
        write_tag(&mut out, "SetUp", "1");
        write_tag(&mut out, "FEN", &start_fen);
    }
    for (name, value) in &tags.extra {
        write_tag(&mut out, name, value);
    }
    out.push('\n');

    let mut tokens = Vec::new();
    for (i, (before, san)) in position.history().iter().zip(position.plies()).enumerate() {
        match before.to_move() {
            Color::White => tokens.push(format!("{}.", before.fullmoves())),
            Color::Black if i == 0 => tokens.push(format!("{}...", before.fullmoves())),
            Color::Black => {}
        }
        tokens.push(san.to_pgn_string());
    }
    tokens.push(result.to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > LINE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');

    out
}
