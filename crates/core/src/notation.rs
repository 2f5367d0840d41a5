//! Move notation and submission memos
//!
//! A move is written `<column letter><row number><direction>`: column 0 is
//! `a`, rows count from 1, and the direction is one of `r`, `l`, `s`, `n`
//! (right, left, south, north). Swapping (2,1) with (2,2) is `b3r`.
//!
//! A finished session is submitted as a memo `score|seed|move|move|...`.
//! Memos read back from history may carry a `[digits] ` prefix before the
//! score, which is ignored.

use std::fmt;
use std::str::FromStr;

use crate::types::{Pos, SwapDir};

/// Errors from parsing a single move token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Token is shorter than three characters.
    TooShort(String),
    /// First character is not a lowercase column letter.
    BadColumn(char),
    /// Row part is missing, not a number, or zero.
    BadRow(String),
    /// Last character is not `r`, `l`, `s` or `n`.
    BadDirection(char),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::TooShort(token) => write!(f, "move '{token}' is too short"),
            NotationError::BadColumn(c) => write!(f, "invalid column letter '{c}'"),
            NotationError::BadRow(row) => write!(f, "invalid row number '{row}'"),
            NotationError::BadDirection(c) => write!(f, "invalid direction '{c}'"),
        }
    }
}

impl std::error::Error for NotationError {}

/// One logged swap: the first selected cell and the direction of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveEntry {
    pub from: Pos,
    pub dir: SwapDir,
}

impl MoveEntry {
    pub fn new(from: Pos, dir: SwapDir) -> Self {
        Self { from, dir }
    }

    /// Entry for a swap between two adjacent cells.
    pub fn between(from: Pos, to: Pos) -> Option<Self> {
        SwapDir::between(from, to).map(|dir| Self { from, dir })
    }

    /// The other cell of the swap, if it has non-negative coordinates.
    pub fn target(&self) -> Option<Pos> {
        self.dir.step(self.from)
    }
}

impl fmt::Display for MoveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = (b'a' + self.from.col) as char;
        write!(f, "{}{}{}", column, self.from.row as u32 + 1, self.dir.as_char())
    }
}

impl FromStr for MoveEntry {
    type Err = NotationError;

    /// ```
    /// use card_crush_core::MoveEntry;
    /// use card_crush_core::types::{Pos, SwapDir};
    ///
    /// let entry: MoveEntry = "b3r".parse().unwrap();
    /// assert_eq!(entry.from, Pos::new(2, 1));
    /// assert_eq!(entry.dir, SwapDir::Right);
    /// assert_eq!(entry.to_string(), "b3r");
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut chars = token.chars();
        let (Some(column), Some(dir)) = (chars.next(), chars.next_back()) else {
            return Err(NotationError::TooShort(token.to_string()));
        };
        let row_part = chars.as_str();
        if row_part.is_empty() {
            return Err(NotationError::TooShort(token.to_string()));
        }

        if !column.is_ascii_lowercase() {
            return Err(NotationError::BadColumn(column));
        }
        let col = column as u8 - b'a';

        let row: u8 = row_part
            .parse()
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| NotationError::BadRow(row_part.to_string()))?;

        let dir = SwapDir::from_char(dir).ok_or(NotationError::BadDirection(dir))?;

        Ok(Self {
            from: Pos::new(row - 1, col),
            dir,
        })
    }
}

/// Final score, seed and move log of a session, ready to be handed off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub score: u32,
    pub seed: String,
    pub moves: Vec<MoveEntry>,
}

impl Submission {
    /// Memo text `score|seed|m1|m2|...`.
    pub fn memo(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Submission {
    /// The move list is always joined after a separator, so a session with no
    /// moves renders as `score|seed|`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|", self.score, self.seed)?;
        for (i, entry) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Errors from reading a memo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Text has no `|` separator, so it is not a game memo.
    NotGameMemo,
    /// Score field does not start with a number.
    InvalidScore(String),
    /// Seed field is empty.
    MissingSeed,
}

impl fmt::Display for MemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoError::NotGameMemo => write!(f, "not a game memo"),
            MemoError::InvalidScore(s) => write!(f, "invalid score '{s}'"),
            MemoError::MissingSeed => write!(f, "memo has no seed"),
        }
    }
}

impl std::error::Error for MemoError {}

/// A memo read back from history. Moves are kept as raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMemo {
    pub score: u32,
    pub seed: String,
    pub moves: Vec<String>,
}

impl ParsedMemo {
    /// Moves that parse as notation; unreadable tokens are skipped.
    pub fn entries(&self) -> Vec<MoveEntry> {
        self.moves.iter().filter_map(|m| m.parse().ok()).collect()
    }
}

/// Parse `score|seed|m1|...`, with an optional `[digits] ` prefix.
///
/// Like the history reader it mirrors, the score takes the leading digits of
/// its field and ignores anything after them.
///
/// ```
/// use card_crush_core::parse_memo;
///
/// let memo = parse_memo("[42] 17|abc|b3r|a1s").unwrap();
/// assert_eq!(memo.score, 17);
/// assert_eq!(memo.seed, "abc");
/// assert_eq!(memo.moves, vec!["b3r", "a1s"]);
/// ```
pub fn parse_memo(text: &str) -> Result<ParsedMemo, MemoError> {
    let text = text.trim();
    if !text.contains('|') {
        return Err(MemoError::NotGameMemo);
    }
    let mut parts = text.split('|');
    let score_part = strip_code_prefix(parts.next().unwrap_or_default());
    let score = leading_number(score_part)
        .ok_or_else(|| MemoError::InvalidScore(score_part.to_string()))?;

    let seed = parts.next().unwrap_or_default().trim();
    if seed.is_empty() {
        return Err(MemoError::MissingSeed);
    }

    let moves = parts
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ParsedMemo {
        score,
        seed: seed.to_string(),
        moves,
    })
}

/// Drop a leading `[digits]` code and the whitespace after it.
fn strip_code_prefix(field: &str) -> &str {
    let field = field.trim_start();
    let Some(rest) = field.strip_prefix('[') else {
        return field;
    };
    let Some(close) = rest.find(']') else {
        return field;
    };
    let code = &rest[..close];
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return field;
    }
    rest[close + 1..].trim_start()
}

fn leading_number(field: &str) -> Option<u32> {
    let field = field.trim_start();
    let digits = field.bytes().take_while(u8::is_ascii_digit).count();
    field[..digits].parse().ok()
}

/// A submitted game found in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    /// Identifier of the submission (transaction signature or similar).
    pub signature: String,
    /// Seconds since the epoch, 0 when unknown.
    pub block_time: u64,
    pub score: u32,
    pub seed: String,
    pub moves: Vec<String>,
    /// Human-readable date, "Unknown date" when `block_time` is 0.
    pub date: String,
}

impl GameEntry {
    /// Build an entry from a memo and its metadata.
    pub fn from_memo(
        signature: impl Into<String>,
        block_time: u64,
        memo: &str,
    ) -> Result<Self, MemoError> {
        let parsed = parse_memo(memo)?;
        let date = if block_time == 0 {
            "Unknown date".to_string()
        } else {
            format!("@{block_time}")
        };
        Ok(Self {
            signature: signature.into(),
            block_time,
            score: parsed.score,
            seed: parsed.seed,
            moves: parsed.moves,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_rejects_garbage() {
        assert_eq!("".parse::<MoveEntry>(), Err(NotationError::TooShort(String::new())));
        assert_eq!("a1".parse::<MoveEntry>(), Err(NotationError::TooShort("a1".into())));
        assert_eq!("A1r".parse::<MoveEntry>(), Err(NotationError::BadColumn('A')));
        assert_eq!("a0r".parse::<MoveEntry>(), Err(NotationError::BadRow("0".into())));
        assert_eq!("axr".parse::<MoveEntry>(), Err(NotationError::BadRow("x".into())));
        assert_eq!("a1x".parse::<MoveEntry>(), Err(NotationError::BadDirection('x')));
    }

    #[test]
    fn test_two_digit_rows() {
        let entry: MoveEntry = "k11n".parse().unwrap();
        assert_eq!(entry.from, Pos::new(10, 10));
        assert_eq!(entry.target(), Some(Pos::new(9, 10)));
        assert_eq!(entry.to_string(), "k11n");
    }

    #[test]
    fn test_prefix_stripping() {
        assert_eq!(strip_code_prefix("[123] 5"), "5");
        assert_eq!(strip_code_prefix("[12a] 5"), "[12a] 5");
        assert_eq!(strip_code_prefix("[] 5"), "[] 5");
        assert_eq!(strip_code_prefix(" 9"), "9");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("12abc"), Some(12));
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number(""), None);
    }
}
