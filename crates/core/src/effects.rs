//! Special-tile resolution
//!
//! Every matched run first gets the default replacement: the anchor steps back
//! one face, interior cells keep the run's face and the terminal cell steps
//! forward one face (both wrapping). Six faces then apply an overlay on top:
//!
//! - **Bonk**: the run's whole row (or column) becomes the index ramp `0, 1, 2, ...`
//! - **Jito**: one extra turn, no grid change
//! - **Fire**: the run's bounding box grown by one cell becomes column indices
//! - **Thunder**: Thunder tiles touching the run's grown box, and everything
//!   8-connected to them, become row indices
//! - **Water**: Water tiles below the run, in the columns it spans, become row indices
//! - **Air**: Air tiles above the run, in the columns it spans, become row indices
//!
//! Every write is clamped to the grid; indices are mapped to faces modulo 13.

use arrayvec::ArrayVec;

use crate::grid::{CellSet, Grid};
use crate::matcher::Run;
use crate::types::{Axis, Pos, TileKind, MAX_CELLS};

/// Apply `run`'s replacement and overlay to `grid`.
///
/// Returns the number of extra turns granted (1 for Jito, 0 otherwise).
pub fn resolve_run(grid: &mut Grid, run: &Run) -> u32 {
    apply_default(grid, run);

    match run.kind {
        TileKind::Bonk => {
            apply_bonk(grid, run);
            0
        }
        TileKind::Jito => 1,
        TileKind::Fire => {
            apply_fire(grid, run);
            0
        }
        TileKind::Thunder => {
            apply_thunder(grid, run);
            0
        }
        TileKind::Water => {
            apply_water(grid, run);
            0
        }
        TileKind::Air => {
            apply_air(grid, run);
            0
        }
        _ => 0,
    }
}

fn apply_default(grid: &mut Grid, run: &Run) {
    let last = run.len.saturating_sub(1);
    for i in 0..run.len {
        let kind = if i == 0 {
            run.kind.prev()
        } else if i == last {
            run.kind.next()
        } else {
            run.kind
        };
        grid.set(run.cell(i), kind);
    }
}

fn apply_bonk(grid: &mut Grid, run: &Run) {
    let n = grid.size();
    for i in 0..n {
        let pos = match run.axis {
            Axis::Horizontal => Pos::new(run.anchor.row, i),
            Axis::Vertical => Pos::new(i, run.anchor.col),
        };
        grid.set(pos, TileKind::wrapping(i as usize));
    }
}

fn apply_fire(grid: &mut Grid, run: &Run) {
    let (top_left, bottom_right) = run.expanded_bounds(grid.size());
    for row in top_left.row..=bottom_right.row {
        for col in top_left.col..=bottom_right.col {
            grid.set(Pos::new(row, col), TileKind::wrapping(col as usize));
        }
    }
}

fn apply_thunder(grid: &mut Grid, run: &Run) {
    let n = grid.size();
    // Every cell 8-adjacent to the grown box can start the flood.
    let (top_left, bottom_right) = run.bounds_with_margin(n, 2);

    let mut visited = CellSet::new();
    let mut stack: ArrayVec<Pos, MAX_CELLS> = ArrayVec::new();

    for row in top_left.row..=bottom_right.row {
        for col in top_left.col..=bottom_right.col {
            let seed = Pos::new(row, col);
            if grid.get(seed) == Some(TileKind::Thunder) && visited.insert(seed) {
                stack.push(seed);
            }
        }
    }

    // Each cell enters the stack once, so the stack never exceeds the cell count.
    while let Some(pos) = stack.pop() {
        grid.set(pos, TileKind::wrapping(pos.row as usize));

        for dr in -1i16..=1 {
            for dc in -1i16..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = pos.row as i16 + dr;
                let c = pos.col as i16 + dc;
                if r < 0 || c < 0 || r >= n as i16 || c >= n as i16 {
                    continue;
                }
                let next = Pos::new(r as u8, c as u8);
                if grid.get(next) == Some(TileKind::Thunder) && visited.insert(next) {
                    stack.push(next);
                }
            }
        }
    }
}

fn apply_water(grid: &mut Grid, run: &Run) {
    let n = grid.size();
    let end = run.end();
    for col in run.anchor.col..=end.col {
        for row in end.row.saturating_add(1)..n {
            flip_if(grid, Pos::new(row, col), TileKind::Water);
        }
    }
}

fn apply_air(grid: &mut Grid, run: &Run) {
    let end = run.end();
    for col in run.anchor.col..=end.col {
        for row in (0..run.anchor.row).rev() {
            flip_if(grid, Pos::new(row, col), TileKind::Air);
        }
    }
}

/// Overwrite `pos` with its row index if it currently holds `kind`.
fn flip_if(grid: &mut Grid, pos: Pos, kind: TileKind) {
    if grid.get(pos) == Some(kind) {
        grid.set(pos, TileKind::wrapping(pos.row as usize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(row: u8, col: u8, axis: Axis, len: u8, kind: TileKind) -> Run {
        Run {
            anchor: Pos::new(row, col),
            axis,
            len,
            kind,
        }
    }

    #[test]
    fn test_default_replacement_wraps() {
        let mut grid = Grid::from_codes(&[[0u8, 0, 0], [1, 2, 4], [5, 7, 8]]).unwrap();
        // Air run on the top row: anchor wraps to Water, terminal to Bck.
        let extra = resolve_run(&mut grid, &run(0, 0, Axis::Horizontal, 3, TileKind::Air));
        assert_eq!(extra, 0);
        assert_eq!(grid.to_codes()[0], vec![12, 0, 1]);
    }

    #[test]
    fn test_jito_grants_turn_only() {
        let mut grid = Grid::from_codes(&[[6u8, 6, 6], [1, 2, 4], [5, 7, 8]]).unwrap();
        let extra = resolve_run(&mut grid, &run(0, 0, Axis::Horizontal, 3, TileKind::Jito));
        assert_eq!(extra, 1);
        assert_eq!(grid.to_codes(), vec![vec![5, 6, 7], vec![1, 2, 4], vec![5, 7, 8]]);
    }

    #[test]
    fn test_thunder_flood_terminates_on_row_nine() {
        // A 10-row column of Thunder: row 9 rewrites to Thunder (code 9) again.
        let mut rows = vec![vec![1u8; 10]; 10];
        for row in rows.iter_mut() {
            row[0] = 9;
        }
        let mut grid = Grid::from_codes(&rows).unwrap();
        resolve_run(&mut grid, &run(0, 0, Axis::Vertical, 3, TileKind::Thunder));
        let codes = grid.to_codes();
        // Anchor and terminal come from the default replacement, the rest are row indices.
        assert_eq!(codes[0][0], 8);
        assert_eq!(codes[1][0], 1);
        assert_eq!(codes[2][0], 10);
        for (r, row) in codes.iter().enumerate().skip(3) {
            assert_eq!(row[0], r as u8);
        }
    }
}
