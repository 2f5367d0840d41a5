//! Match-resolution sweep
//!
//! After a swap the board is swept once in row-major order. Each start cell is
//! tested against the *current* working grid, so effects of earlier runs are
//! visible to later start cells, but cells already passed are never revisited.
//! There is no second pass: a run created behind the sweep stays on the board
//! until the next swap.

use arrayvec::ArrayVec;

use crate::effects::resolve_run;
use crate::grid::{CellSet, Grid};
use crate::matcher::{find_run_at, Run};
use crate::types::MAX_CELLS;

/// Everything one sweep produced, as a plain value for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Grid after all runs and overlays were applied.
    pub grid: Grid,
    /// Run cells plus every cell the sweep changed.
    pub affected: CellSet,
    /// Sum of resolved run lengths.
    pub score_delta: u32,
    /// Turns added to the turn limit (Jito runs).
    pub extra_turns: u32,
    /// Resolved runs in the order they were found.
    pub runs: ArrayVec<Run, MAX_CELLS>,
}

impl Resolution {
    /// True when the sweep found nothing to resolve.
    pub fn is_noop(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Sweep `grid` once and resolve every run found along the way.
///
/// The input grid is left untouched.
pub fn resolve_board(grid: &Grid) -> Resolution {
    let mut working = grid.clone();
    let mut affected = CellSet::new();
    let mut score_delta = 0u32;
    let mut extra_turns = 0u32;
    let mut runs = ArrayVec::new();

    for pos in grid.positions() {
        let Some(run) = find_run_at(&working, pos) else {
            continue;
        };

        affected.extend(run.cells());
        score_delta += run.len as u32;
        extra_turns += resolve_run(&mut working, &run);
        affected.extend(working.diff(grid));
        // One run per start cell, so this never overflows.
        let _ = runs.try_push(run);
    }

    Resolution {
        grid: working,
        affected,
        score_delta,
        extra_turns,
        runs,
    }
}
