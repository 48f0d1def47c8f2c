//! Grid & Cells
//!
//! Fixed-size occupancy map for the automaton. The grid stores person ids
//! by position; the `Population` arena owns the person records themselves,
//! so sorted or shuffled working lists can hold ids without aliasing live
//! state.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Side length of the square grid.
pub const DIM: usize = 100;

/// Moore-neighborhood offsets in the fixed scan order used everywhere a
/// neighborhood is walked. The order is load-bearing: acceptance draws one
/// random number per neighbor, so reordering the scan reorders the RNG
/// stream of a seeded run.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Index of a person in the population arena.
pub type PersonId = usize;

/// A grid position. Immutable once a person is placed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// DIM×DIM cell matrix. Each cell holds at most one person id.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Option<PersonId>>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: vec![None; DIM * DIM],
        }
    }

    /// Total number of cells.
    pub fn capacity() -> usize {
        DIM * DIM
    }

    /// Every position of the grid in row-major order.
    pub fn all_positions() -> Vec<Pos> {
        let mut positions = Vec::with_capacity(DIM * DIM);
        for row in 0..DIM {
            for col in 0..DIM {
                positions.push(Pos::new(row, col));
            }
        }
        positions
    }

    /// Flat index of an in-bounds position. Rejecting `col >= DIM` here
    /// matters: row * DIM + col would otherwise alias a cell in the next
    /// row.
    fn index(pos: Pos) -> Option<usize> {
        (pos.row < DIM && pos.col < DIM).then(|| pos.row * DIM + pos.col)
    }

    pub fn get(&self, pos: Pos) -> Option<PersonId> {
        Self::index(pos).and_then(|i| self.cells[i])
    }

    /// True for an in-bounds cell holding no person. An out-of-bounds
    /// position is not an empty cell.
    pub fn is_empty(&self, pos: Pos) -> bool {
        Self::index(pos).is_some_and(|i| self.cells[i].is_none())
    }

    /// Stores a person id at an empty cell. An occupied cell is a broken
    /// placement invariant, surfaced as an error rather than a panic.
    pub fn place(&mut self, pos: Pos, id: PersonId) -> Result<(), SimError> {
        let Some(i) = Self::index(pos) else {
            return Err(SimError::OutOfBounds(pos));
        };
        if self.cells[i].is_some() {
            return Err(SimError::OccupiedCell(pos));
        }
        self.cells[i] = Some(id);
        Ok(())
    }

    /// Occupied Moore neighbors of `pos` in the fixed scan order,
    /// skipping out-of-bounds and empty cells.
    pub fn neighbors_of(&self, pos: Pos) -> Vec<PersonId> {
        let mut neighbors = Vec::with_capacity(8);
        for (dr, dc) in MOORE_OFFSETS {
            let row = pos.row as i32 + dr;
            let col = pos.col as i32 + dc;
            if row < 0 || row >= DIM as i32 || col < 0 || col >= DIM as i32 {
                continue;
            }
            if let Some(id) = self.get(Pos::new(row as usize, col as usize)) {
                neighbors.push(id);
            }
        }
        neighbors
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
