//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, remote-play protocol).
//!
//! # Tile Faces
//!
//! The board holds one of 13 tile faces, identified by a code in `0..=12`.
//! Six faces carry a special effect when matched:
//!
//! | Code | Face | Effect |
//! |------|------|--------|
//! | 0 | Air | lifts Air tiles above the run |
//! | 2 | Bonk | clears the matched row/column |
//! | 3 | Fire | burns the ring around the run |
//! | 6 | Jito | grants one extra turn |
//! | 9 | Thunder | chains through touching Thunder tiles |
//! | 12 | Water | drains Water tiles below the run |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SWAP_SETTLE_MS` | 8 | Swapped board shown before resolution |
//! | `MATCH_OVERLAY_MS` | 420 | Burn overlay on affected cells |
//!
//! # Examples
//!
//! ```
//! use card_crush_types::{Pos, SwapDir, TileKind, TILE_KINDS};
//!
//! assert_eq!(TILE_KINDS, 13);
//! assert_eq!(TileKind::Air.prev(), TileKind::Water);
//! assert_eq!(TileKind::Water.next(), TileKind::Air);
//! assert!(TileKind::Bonk.is_special());
//!
//! let from = Pos::new(2, 1);
//! assert_eq!(SwapDir::between(from, Pos::new(2, 2)), Some(SwapDir::Right));
//! assert_eq!(SwapDir::Right.as_char(), 'r');
//! ```

/// Number of distinct tile faces.
pub const TILE_KINDS: u8 = 13;

/// Smallest grid dimension a seed can produce.
pub const GRID_SIZE_MIN: u8 = 6;

/// Largest grid dimension a seed can produce.
pub const GRID_SIZE_MAX: u8 = 11;

/// Cell capacity of the largest grid.
pub const MAX_CELLS: usize = (GRID_SIZE_MAX as usize) * (GRID_SIZE_MAX as usize);

/// Shortest run that counts as a match.
pub const MIN_RUN: u8 = 3;

/// Turn limit at the start of every session.
pub const INITIAL_TURN_LIMIT: u32 = 4;

/// Delay between showing a swap and committing its resolution (ms).
pub const SWAP_SETTLE_MS: u32 = 8;

/// Duration of the burn overlay on affected cells (ms).
pub const MATCH_OVERLAY_MS: u32 = 420;

/// Seed played when no level list is available.
pub const FALLBACK_SEED: &str =
    "4fuPZXwNAqqco5VfkA2YwTNoQYou91sANwx84dpVsgJd7h56vmQoEWahv87sMr6C7ShS3WMpH9eGCdc4t16iLAoh";

/// Asset shown over affected cells while the overlay is active.
pub const OVERLAY_ASSET: &str = "assets/animations/burn.gif";


/// The thirteen tile faces, in code order.
///
/// Names follow the card art shipped with the game (`air`, `bck`, `bnk`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileKind {
    Air,
    Bck,
    Bonk,
    Fire,
    Inu,
    Jls,
    Jito,
    Nyl,
    Ott,
    Thunder,
    Tts,
    Unr,
    Water,
}

impl TileKind {
    /// All faces in code order.
    pub const ALL: [TileKind; TILE_KINDS as usize] = [
        TileKind::Air,
        TileKind::Bck,
        TileKind::Bonk,
        TileKind::Fire,
        TileKind::Inu,
        TileKind::Jls,
        TileKind::Jito,
        TileKind::Nyl,
        TileKind::Ott,
        TileKind::Thunder,
        TileKind::Tts,
        TileKind::Unr,
        TileKind::Water,
    ];

    /// Face for a code in `0..=12`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Face for any value, reduced modulo the number of faces.
    ///
    /// Used where the original rules write indices into cells.
    ///
    /// ```
    /// use card_crush_types::TileKind;
    ///
    /// assert_eq!(TileKind::wrapping(4), TileKind::Inu);
    /// assert_eq!(TileKind::wrapping(13), TileKind::Air);
    /// ```
    pub fn wrapping(value: usize) -> Self {
        Self::ALL[value % TILE_KINDS as usize]
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Previous face, wrapping from Air to Water.
    pub fn prev(self) -> Self {
        Self::wrapping(self.code() as usize + TILE_KINDS as usize - 1)
    }

    /// Next face, wrapping from Water to Air.
    pub fn next(self) -> Self {
        Self::wrapping(self.code() as usize + 1)
    }

    /// Whether matching this face triggers an overlay effect.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            TileKind::Air
                | TileKind::Bonk
                | TileKind::Fire
                | TileKind::Jito
                | TileKind::Thunder
                | TileKind::Water
        )
    }

    /// Three-letter tag used by the card art.
    pub fn tag(self) -> &'static str {
        match self {
            TileKind::Air => "air",
            TileKind::Bck => "bck",
            TileKind::Bonk => "bnk",
            TileKind::Fire => "fre",
            TileKind::Inu => "inu",
            TileKind::Jls => "jls",
            TileKind::Jito => "jto",
            TileKind::Nyl => "nyl",
            TileKind::Ott => "ott",
            TileKind::Thunder => "thn",
            TileKind::Tts => "tts",
            TileKind::Unr => "unr",
            TileKind::Water => "wtr",
        }
    }

    /// Card image for this face.
    ///
    /// ```
    /// use card_crush_types::TileKind;
    ///
    /// assert_eq!(TileKind::Fire.asset_path(), "assets/newcards/fre.PNG");
    /// ```
    pub fn asset_path(self) -> &'static str {
        match self {
            TileKind::Air => "assets/newcards/air.PNG",
            TileKind::Bck => "assets/newcards/bck.PNG",
            TileKind::Bonk => "assets/newcards/bnk.PNG",
            TileKind::Fire => "assets/newcards/fre.PNG",
            TileKind::Inu => "assets/newcards/inu.PNG",
            TileKind::Jls => "assets/newcards/jls.PNG",
            TileKind::Jito => "assets/newcards/jto.PNG",
            TileKind::Nyl => "assets/newcards/nyl.PNG",
            TileKind::Ott => "assets/newcards/ott.PNG",
            TileKind::Thunder => "assets/newcards/thn.PNG",
            TileKind::Tts => "assets/newcards/tts.PNG",
            TileKind::Unr => "assets/newcards/unr.PNG",
            TileKind::Water => "assets/newcards/wtr.PNG",
        }
    }
}

/// A cell position, `row` from the top and `col` from the left (both 0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when `other` shares an edge with `self`.
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr + dc == 1
    }
}

/// Orientation of a matched run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Step `(d_row, d_col)` along the axis.
    pub fn delta(self) -> (u8, u8) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

/// Direction of a swap, seen from the first selected tile.
///
/// - **Right** (`r`): column + 1
/// - **Left** (`l`): column - 1
/// - **South** (`s`): row + 1
/// - **North** (`n`): row - 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDir {
    Right,
    Left,
    South,
    North,
}

impl SwapDir {
    /// Direction from `from` to an orthogonally adjacent `to`.
    pub fn between(from: Pos, to: Pos) -> Option<Self> {
        if !from.is_adjacent(to) {
            return None;
        }
        Some(if to.col > from.col {
            SwapDir::Right
        } else if to.col < from.col {
            SwapDir::Left
        } else if to.row > from.row {
            SwapDir::South
        } else {
            SwapDir::North
        })
    }

    /// Neighbour of `from` in this direction, if it exists.
    pub fn step(self, from: Pos) -> Option<Pos> {
        match self {
            SwapDir::Right => from.col.checked_add(1).map(|c| Pos::new(from.row, c)),
            SwapDir::Left => from.col.checked_sub(1).map(|c| Pos::new(from.row, c)),
            SwapDir::South => from.row.checked_add(1).map(|r| Pos::new(r, from.col)),
            SwapDir::North => from.row.checked_sub(1).map(|r| Pos::new(r, from.col)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            SwapDir::Right => 'r',
            SwapDir::Left => 'l',
            SwapDir::South => 's',
            SwapDir::North => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'r' => Some(SwapDir::Right),
            'l' => Some(SwapDir::Left),
            's' => Some(SwapDir::South),
            'n' => Some(SwapDir::North),
            _ => None,
        }
    }
}

/// Player intents produced by the terminal input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Move the cursor one cell left
    CursorLeft,
    /// Move the cursor one cell right
    CursorRight,
    /// Move the cursor one cell up
    CursorUp,
    /// Move the cursor one cell down
    CursorDown,
    /// Tap the tile under the cursor
    Tap,
    /// Regenerate the board from the current seed
    Reset,
    /// Load the next level
    NextLevel,
    /// Load the previous level
    PrevLevel,
    /// Play a fresh random practice seed
    Practice,
    /// Produce the submission memo (only after the turn limit is reached)
    Memo,
}

impl InputAction {
    /// Parse action from string
    ///
    /// ```
    /// use card_crush_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("tap"), Some(InputAction::Tap));
    /// assert_eq!(InputAction::from_str("cursorLeft"), Some(InputAction::CursorLeft));
    /// assert_eq!(InputAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorleft" => Some(InputAction::CursorLeft),
            "cursorright" => Some(InputAction::CursorRight),
            "cursorup" => Some(InputAction::CursorUp),
            "cursordown" => Some(InputAction::CursorDown),
            "tap" => Some(InputAction::Tap),
            "reset" => Some(InputAction::Reset),
            "nextlevel" => Some(InputAction::NextLevel),
            "prevlevel" => Some(InputAction::PrevLevel),
            "practice" => Some(InputAction::Practice),
            "memo" => Some(InputAction::Memo),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::CursorLeft => "cursorLeft",
            InputAction::CursorRight => "cursorRight",
            InputAction::CursorUp => "cursorUp",
            InputAction::CursorDown => "cursorDown",
            InputAction::Tap => "tap",
            InputAction::Reset => "reset",
            InputAction::NextLevel => "nextLevel",
            InputAction::PrevLevel => "prevLevel",
            InputAction::Practice => "practice",
            InputAction::Memo => "memo",
        }
    }
}
