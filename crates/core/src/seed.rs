//! Seed module - deterministic board derivation
//!
//! A level is identified by an opaque seed string. The seed alone fixes both the
//! grid dimension and the starting tiles, so the same level can be regenerated
//! anywhere from the seed.
//!
//! Character codes are UTF-16 code units, matching how the seeds were produced
//! and published. For the ASCII seeds used in practice this is the byte value.

use std::fmt;

use crate::grid::Grid;
use crate::types::{Pos, TileKind, GRID_SIZE_MAX, GRID_SIZE_MIN, TILE_KINDS};

/// Errors from seed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// The seed has no characters.
    Empty,
    /// Requested grid size is zero or above the supported maximum.
    InvalidSize(usize),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Empty => write!(f, "seed must not be empty"),
            SeedError::InvalidSize(size) => {
                write!(f, "invalid grid size {size} (expected 1..={GRID_SIZE_MAX})")
            }
        }
    }
}

impl std::error::Error for SeedError {}

/// Grid dimension for a seed: sum of character codes, mod 6, plus 6.
///
/// ```
/// use card_crush_core::grid_size_for_seed;
///
/// // 'a' = 97 -> 97 % 6 = 1 -> 7
/// assert_eq!(grid_size_for_seed("a"), Ok(7));
/// ```
pub fn grid_size_for_seed(seed: &str) -> Result<u8, SeedError> {
    if seed.is_empty() {
        return Err(SeedError::Empty);
    }
    let span = (GRID_SIZE_MAX - GRID_SIZE_MIN + 1) as u64;
    let sum: u64 = seed.encode_utf16().map(u64::from).sum();
    Ok((sum % span) as u8 + GRID_SIZE_MIN)
}

/// Build the starting grid for `seed` at `size`.
///
/// Cell `(i, j)` takes the seed character at `(i * size + j) % len` and maps its
/// code modulo the number of faces.
pub fn generate_board(seed: &str, size: u8) -> Result<Grid, SeedError> {
    if seed.is_empty() {
        return Err(SeedError::Empty);
    }
    if size == 0 || size > GRID_SIZE_MAX {
        return Err(SeedError::InvalidSize(size as usize));
    }

    let units: Vec<u16> = seed.encode_utf16().collect();
    let mut grid =
        Grid::filled(size, TileKind::Air).map_err(|_| SeedError::InvalidSize(size as usize))?;

    let n = size as usize;
    for row in 0..size {
        for col in 0..size {
            let unit = units[(row as usize * n + col as usize) % units.len()];
            let kind = TileKind::wrapping(unit as usize % TILE_KINDS as usize);
            grid.set(Pos::new(row, col), kind);
        }
    }
    Ok(grid)
}

/// Size and board for a seed, computed together so they can never disagree.
pub fn board_for_seed(seed: &str) -> Result<Grid, SeedError> {
    let size = grid_size_for_seed(seed)?;
    generate_board(seed, size)
}
