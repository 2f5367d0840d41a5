use crate::grid::CellSet;
use crate::notation::MoveEntry;
use crate::types::{Pos, GRID_SIZE_MAX};

/// Read-only copy of a session, shared by the terminal view and the adapter.
///
/// `grid` is always 11×11; only the top-left `grid_size`×`grid_size` square is
/// meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub seed: String,
    pub grid_size: u8,
    pub grid: [[u8; GRID_SIZE_MAX as usize]; GRID_SIZE_MAX as usize],
    pub selected: Option<Pos>,
    pub turn: u32,
    pub turn_limit: u32,
    pub score: u32,
    pub moves: Vec<MoveEntry>,
    /// Cells touched by the most recent resolution.
    pub affected: CellSet,
    pub can_submit: bool,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.seed.clear();
        self.grid_size = 0;
        self.grid = [[0u8; GRID_SIZE_MAX as usize]; GRID_SIZE_MAX as usize];
        self.selected = None;
        self.turn = 0;
        self.turn_limit = 0;
        self.score = 0;
        self.moves.clear();
        self.affected.clear();
        self.can_submit = false;
    }

    /// Rows of the playable square, as tile codes.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let n = self.grid_size as usize;
        self.grid.iter().take(n).map(move |row| &row[..n])
    }

    pub fn code_at(&self, pos: Pos) -> Option<u8> {
        if pos.row >= self.grid_size || pos.col >= self.grid_size {
            return None;
        }
        Some(self.grid[pos.row as usize][pos.col as usize])
    }

    /// Whether another swap would be accepted.
    pub fn playable(&self) -> bool {
        self.turn < self.turn_limit
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            seed: String::new(),
            grid_size: 0,
            grid: [[0u8; GRID_SIZE_MAX as usize]; GRID_SIZE_MAX as usize],
            selected: None,
            turn: 0,
            turn_limit: 0,
            score: 0,
            moves: Vec::new(),
            affected: CellSet::new(),
            can_submit: false,
        }
    }
}
