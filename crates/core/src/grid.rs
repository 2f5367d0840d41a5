//! Grid module - the square tile board
//!
//! The grid is an N×N board (N in `1..=11`) where every cell holds exactly one
//! tile face. Storage is a flat fixed-capacity vector sized for the largest
//! board, so copies made during resolution never allocate.
//! Coordinates: `(row, col)` with row 0 at the top and col 0 at the left.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{Pos, TileKind, GRID_SIZE_MAX, MAX_CELLS};

/// Errors raised when building a grid from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Size is zero or larger than [`GRID_SIZE_MAX`].
    InvalidSize(usize),
    /// A row does not have `size` cells.
    RaggedRow { row: usize, len: usize, expected: usize },
    /// A cell value is not a tile code.
    InvalidCode { row: usize, col: usize, code: u8 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidSize(size) => {
                write!(f, "invalid grid size {size} (expected 1..={GRID_SIZE_MAX})")
            }
            GridError::RaggedRow { row, len, expected } => {
                write!(f, "row {row} has {len} cells, expected {expected}")
            }
            GridError::InvalidCode { row, col, code } => {
                write!(f, "cell ({row}, {col}) holds invalid tile code {code}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// The game grid using flat array storage (row-major, `row * size + col`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u8,
    cells: ArrayVec<TileKind, MAX_CELLS>,
}

impl Grid {
    /// Create a grid of `size` filled with one face.
    pub fn filled(size: u8, kind: TileKind) -> Result<Self, GridError> {
        if size == 0 || size > GRID_SIZE_MAX {
            return Err(GridError::InvalidSize(size as usize));
        }
        let mut cells = ArrayVec::new();
        for _ in 0..(size as usize) * (size as usize) {
            cells.push(kind);
        }
        Ok(Self { size, cells })
    }

    /// Build a grid from rows of tile codes.
    ///
    /// ```
    /// use card_crush_core::Grid;
    /// use card_crush_core::types::{Pos, TileKind};
    ///
    /// let grid = Grid::from_codes(&[[0u8, 1], [2, 12]]).unwrap();
    /// assert_eq!(grid.size(), 2);
    /// assert_eq!(grid.get(Pos::new(1, 1)), Some(TileKind::Water));
    /// ```
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 || size > GRID_SIZE_MAX as usize {
            return Err(GridError::InvalidSize(size));
        }
        let mut grid = Self::filled(size as u8, TileKind::Air)?;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            for (col, &code) in values.iter().enumerate() {
                let kind =
                    TileKind::from_code(code).ok_or(GridError::InvalidCode { row, col, code })?;
                grid.cells[row * size + col] = kind;
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some((pos.row as usize) * (self.size as usize) + (pos.col as usize))
    }

    /// Side length of the grid
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Get the face at `pos`, or None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<TileKind> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set the face at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, kind: TileKind) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = kind;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells. Returns false (and leaves the grid alone) if either is out of bounds.
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[TileKind] {
        &self.cells
    }

    /// One row of the grid
    pub fn row(&self, row: u8) -> Option<&[TileKind]> {
        if row >= self.size {
            return None;
        }
        let n = self.size as usize;
        let start = row as usize * n;
        Some(&self.cells[start..start + n])
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let n = self.size;
        (0..n).flat_map(move |row| (0..n).map(move |col| Pos::new(row, col)))
    }

    /// Positions whose face differs between `self` and `other`.
    ///
    /// Grids of different sizes are compared over the overlapping square.
    pub fn diff<'a>(&'a self, other: &'a Grid) -> impl Iterator<Item = Pos> + 'a {
        let n = self.size.min(other.size);
        (0..n)
            .flat_map(move |row| (0..n).map(move |col| Pos::new(row, col)))
            .filter(move |&pos| self.get(pos) != other.get(pos))
    }

    /// Convert to rows of tile codes
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .filter_map(|r| self.row(r))
            .map(|row| row.iter().map(|k| k.code()).collect())
            .collect()
    }

    /// Write tile codes into a fixed-size grid (for snapshots/observations).
    ///
    /// Cells outside the grid are left untouched.
    pub fn write_u8_grid(
        &self,
        out: &mut [[u8; GRID_SIZE_MAX as usize]; GRID_SIZE_MAX as usize],
    ) {
        for pos in self.positions() {
            if let Some(kind) = self.get(pos) {
                out[pos.row as usize][pos.col as usize] = kind.code();
            }
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid({}x{})", self.size, self.size)?;
        for r in 0..self.size {
            if let Some(row) = self.row(r) {
                for kind in row {
                    write!(f, "{:>3}", kind.code())?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Set of cell positions on a grid of up to 11×11, stored as a bitmask.
///
/// Bit index is `row * 11 + col`, independent of the actual grid size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u128);

impl CellSet {
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    fn bit(pos: Pos) -> Option<u128> {
        if pos.row >= GRID_SIZE_MAX || pos.col >= GRID_SIZE_MAX {
            return None;
        }
        Some(1u128 << (pos.row as u32 * GRID_SIZE_MAX as u32 + pos.col as u32))
    }

    /// Add a position. Returns true if it was not already present.
    pub fn insert(&mut self, pos: Pos) -> bool {
        match Self::bit(pos) {
            Some(bit) if self.0 & bit == 0 => {
                self.0 |= bit;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        Self::bit(pos).map_or(false, |bit| self.0 & bit != 0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Positions in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        let bits = self.0;
        (0..MAX_CELLS as u32)
            .filter(move |i| bits & (1u128 << i) != 0)
            .map(|i| Pos::new((i / GRID_SIZE_MAX as u32) as u8, (i % GRID_SIZE_MAX as u32) as u8))
    }

    /// Positions as `[row, col]` pairs (for snapshots and the wire protocol).
    pub fn to_pairs(&self) -> Vec<[u8; 2]> {
        self.iter().map(|p| [p.row, p.col]).collect()
    }
}

impl Extend<Pos> for CellSet {
    fn extend<I: IntoIterator<Item = Pos>>(&mut self, iter: I) {
        for pos in iter {
            self.insert(pos);
        }
    }
}

impl FromIterator<Pos> for CellSet {
    fn from_iter<I: IntoIterator<Item = Pos>>(iter: I) -> Self {
        let mut set = CellSet::new();
        set.extend(iter);
        set
    }
}
