//! Session - the move/turn controller
//!
//! A session owns the one canonical grid for a seed together with the move log,
//! score, turn count and turn limit. Players interact with it only by tapping
//! cells:
//!
//! ```text
//!            tap(a)                 tap(b), adjacent, turn < limit
//! AwaitingFirst ──────▶ AwaitingSecond(a) ──────────────────────────▶ swap + resolve
//!       ▲                     │                                            │
//!       └─────────────────────┴── tap(b) not adjacent: selection dropped ◀─┘
//! ```
//!
//! Once `turn >= turn_limit` every tap is refused and clears the selection,
//! until [`Session::reset`] or [`Session::load`] starts over.

use crate::grid::{CellSet, Grid};
use crate::notation::{MoveEntry, Submission};
use crate::seed::{board_for_seed, SeedError};
use crate::snapshot::SessionSnapshot;
use crate::sweep::{resolve_board, Resolution};
use crate::types::{Pos, INITIAL_TURN_LIMIT};

/// Tap state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    AwaitingFirst,
    AwaitingSecond(Pos),
}

/// What a swap did, for the caller to animate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReport {
    pub entry: MoveEntry,
    /// Grid right after the swap, before any run was resolved.
    pub swapped: Grid,
    pub resolution: Resolution,
}

/// Result of one tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// First cell recorded.
    Selected(Pos),
    /// Second cell was not adjacent; selection dropped, grid untouched.
    Deselected,
    /// Swap applied and resolved.
    Swapped(Box<SwapReport>),
    /// Turn limit reached; selection dropped, grid untouched.
    Blocked,
    /// Cell is outside the grid; nothing changed.
    OutOfBounds,
}

#[derive(Debug, Clone)]
pub struct Session {
    seed: String,
    grid: Grid,
    selection: Selection,
    turn: u32,
    turn_limit: u32,
    score: u32,
    moves: Vec<MoveEntry>,
    last_affected: CellSet,
}

impl Session {
    /// Start a session on `seed`.
    pub fn new(seed: &str) -> Result<Self, SeedError> {
        let grid = board_for_seed(seed)?;
        Ok(Self::with_grid(seed, grid))
    }

    /// Start a session on an explicit grid (puzzles and tests).
    ///
    /// `seed` is only used for the submission memo; [`Session::reset`]
    /// regenerates from it when it is a valid seed.
    pub fn with_grid(seed: &str, grid: Grid) -> Self {
        Self {
            seed: seed.to_string(),
            grid,
            selection: Selection::AwaitingFirst,
            turn: 0,
            turn_limit: INITIAL_TURN_LIMIT,
            score: 0,
            moves: Vec::new(),
            last_affected: CellSet::new(),
        }
    }

    /// Replace everything with a fresh session on `seed`.
    ///
    /// On error the current session is left as it was.
    pub fn load(&mut self, seed: &str) -> Result<(), SeedError> {
        *self = Self::new(seed)?;
        Ok(())
    }

    /// Regenerate the board from the current seed and clear all progress.
    pub fn reset(&mut self) {
        // A session built with `with_grid` on a non-seed keeps its board.
        let grid = board_for_seed(&self.seed).unwrap_or_else(|_| self.grid.clone());
        *self = Self::with_grid(&self.seed, grid);
    }

    /// Handle a tap on `pos`.
    pub fn tap(&mut self, pos: Pos) -> TapOutcome {
        if !self.can_swap() {
            self.selection = Selection::AwaitingFirst;
            return TapOutcome::Blocked;
        }
        if !self.grid.contains(pos) {
            return TapOutcome::OutOfBounds;
        }

        match self.selection {
            Selection::AwaitingFirst => {
                self.selection = Selection::AwaitingSecond(pos);
                TapOutcome::Selected(pos)
            }
            Selection::AwaitingSecond(first) => {
                self.selection = Selection::AwaitingFirst;
                match MoveEntry::between(first, pos) {
                    Some(entry) => TapOutcome::Swapped(Box::new(self.apply_swap(entry, pos))),
                    None => TapOutcome::Deselected,
                }
            }
        }
    }

    fn apply_swap(&mut self, entry: MoveEntry, to: Pos) -> SwapReport {
        self.grid.swap(entry.from, to);
        self.moves.push(entry);

        let swapped = self.grid.clone();
        let resolution = resolve_board(&swapped);

        self.grid = resolution.grid.clone();
        self.score += resolution.score_delta;
        self.turn_limit += resolution.extra_turns;
        self.turn += 1;
        self.last_affected = resolution.affected;

        SwapReport {
            entry,
            swapped,
            resolution,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Currently selected first cell, if any.
    pub fn selected(&self) -> Option<Pos> {
        match self.selection {
            Selection::AwaitingFirst => None,
            Selection::AwaitingSecond(pos) => Some(pos),
        }
    }

    /// Drop any pending selection.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::AwaitingFirst;
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_limit(&self) -> u32 {
        self.turn_limit
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> &[MoveEntry] {
        &self.moves
    }

    /// Cells affected by the most recent swap's resolution.
    pub fn last_affected(&self) -> CellSet {
        self.last_affected
    }

    /// Whether another swap is allowed.
    pub fn can_swap(&self) -> bool {
        self.turn < self.turn_limit
    }

    /// Whether the session is finished and may be submitted.
    pub fn can_submit(&self) -> bool {
        !self.can_swap()
    }

    /// Score, seed and moves as they stand now.
    pub fn submission(&self) -> Submission {
        Submission {
            score: self.score,
            seed: self.seed.clone(),
            moves: self.moves.clone(),
        }
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.clear();
        out.seed.push_str(&self.seed);
        out.grid_size = self.grid.size();
        self.grid.write_u8_grid(&mut out.grid);
        out.selected = self.selected();
        out.turn = self.turn;
        out.turn_limit = self.turn_limit;
        out.score = self.score;
        out.moves.extend_from_slice(&self.moves);
        out.affected = self.last_affected;
        out.can_submit = self.can_submit();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut out = SessionSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_session() -> Session {
        let grid = Grid::from_codes(&[[1u8, 2, 4], [5, 7, 8], [10, 11, 1]]).unwrap();
        Session::with_grid("quiet", grid)
    }

    #[test]
    fn test_same_cell_twice_deselects() {
        let mut s = quiet_session();
        assert_eq!(s.tap(Pos::new(0, 0)), TapOutcome::Selected(Pos::new(0, 0)));
        assert_eq!(s.tap(Pos::new(0, 0)), TapOutcome::Deselected);
        assert_eq!(s.selection(), Selection::AwaitingFirst);
        assert!(s.moves().is_empty());
    }

    #[test]
    fn test_out_of_bounds_keeps_selection() {
        let mut s = quiet_session();
        s.tap(Pos::new(1, 1));
        assert_eq!(s.tap(Pos::new(3, 1)), TapOutcome::OutOfBounds);
        assert_eq!(s.selected(), Some(Pos::new(1, 1)));
    }

    #[test]
    fn test_reset_regenerates_from_seed() {
        let mut s = quiet_session();
        let before = s.grid().clone();
        s.tap(Pos::new(0, 0));
        s.tap(Pos::new(0, 1));
        assert_eq!(s.turn(), 1);
        s.reset();
        assert_eq!(s.turn(), 0);
        assert!(s.moves().is_empty());
        assert_eq!(s.grid(), &board_for_seed("quiet").unwrap());
        assert_ne!(s.grid(), &before);
    }
}
