//! Match detection
//!
//! A run is a straight line of at least [`MIN_RUN`] identical faces, read from
//! its anchor (first cell) towards the right or downwards. Detection at one
//! start cell probes lengths from the board size down to three, horizontal
//! before vertical, and stops at the first hit: the longest run wins and a
//! horizontal run beats a vertical run of the same length.

use crate::grid::Grid;
use crate::types::{Axis, Pos, TileKind, MIN_RUN};

/// A qualifying run found on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    /// First cell of the run (leftmost or topmost).
    pub anchor: Pos,
    pub axis: Axis,
    pub len: u8,
    /// Face shared by every cell of the run.
    pub kind: TileKind,
}

impl Run {
    /// Cell at offset `i` along the run.
    pub fn cell(&self, i: u8) -> Pos {
        let (dr, dc) = self.axis.delta();
        Pos::new(self.anchor.row + i * dr, self.anchor.col + i * dc)
    }

    /// Last cell of the run.
    pub fn end(&self) -> Pos {
        self.cell(self.len.saturating_sub(1))
    }

    /// All cells, anchor first.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len).map(move |i| self.cell(i))
    }

    /// Bounding box grown by one cell on every side and clamped to a
    /// `size`×`size` grid, as inclusive `(top_left, bottom_right)`.
    pub fn expanded_bounds(&self, size: u8) -> (Pos, Pos) {
        self.bounds_with_margin(size, 1)
    }

    /// Bounding box grown by `margin` cells on every side, clamped like
    /// [`Run::expanded_bounds`].
    pub fn bounds_with_margin(&self, size: u8, margin: u8) -> (Pos, Pos) {
        let end = self.end();
        let last = size.saturating_sub(1);
        (
            Pos::new(
                self.anchor.row.saturating_sub(margin),
                self.anchor.col.saturating_sub(margin),
            ),
            Pos::new(
                end.row.saturating_add(margin).min(last),
                end.col.saturating_add(margin).min(last),
            ),
        )
    }
}

/// Whether a run of `len` along `axis` starting at `anchor` is present.
///
/// Cells `1..len` must match the face at `anchor`, and the whole run must fit
/// inside the grid.
pub fn run_matches(grid: &Grid, anchor: Pos, axis: Axis, len: u8) -> bool {
    if len == 0 {
        return false;
    }
    let (dr, dc) = axis.delta();
    let span = len - 1;
    let end_row = anchor.row as usize + (span * dr) as usize;
    let end_col = anchor.col as usize + (span * dc) as usize;
    let n = grid.size() as usize;
    if end_row >= n || end_col >= n {
        return false;
    }

    let Some(kind) = grid.get(anchor) else {
        return false;
    };
    (1..len).all(|i| {
        let pos = Pos::new(anchor.row + i * dr, anchor.col + i * dc);
        grid.get(pos) == Some(kind)
    })
}

/// The run detected at `anchor`, if any (longest first, horizontal first).
///
/// ```
/// use card_crush_core::{find_run_at, Grid};
/// use card_crush_core::types::{Axis, Pos};
///
/// let grid = Grid::from_codes(&[
///     [5u8, 5, 5],
///     [5, 1, 2],
///     [5, 3, 4],
/// ]).unwrap();
/// let run = find_run_at(&grid, Pos::new(0, 0)).unwrap();
/// assert_eq!(run.axis, Axis::Horizontal);
/// assert_eq!(run.len, 3);
/// ```
pub fn find_run_at(grid: &Grid, anchor: Pos) -> Option<Run> {
    let kind = grid.get(anchor)?;
    for len in (MIN_RUN..=grid.size()).rev() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if run_matches(grid, anchor, axis, len) {
                return Some(Run {
                    anchor,
                    axis,
                    len,
                    kind,
                });
            }
        }
    }
    None
}

/// True if any cell currently starts a run.
pub fn has_run(grid: &Grid) -> bool {
    grid.positions().any(|pos| find_run_at(grid, pos).is_some())
}
