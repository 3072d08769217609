// --- File: grid.rs ---
use rand::Rng;
use std::{error::Error, fmt};

// Fixed scan order: up, down, left, right. Consumers filter by position,
// but the order must stay stable so seeded runs are reproducible.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Lineage marker separating mutated colonies from the founding one.
/// Inherited at division unless a fresh mutation event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineage {
    Normal,
    Mutated,
}

/// One slot of the dish. Dead cells are records, not holes: division
/// targets are picked among neighbor slots with `is_alive == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Position label (`row * cols + col`), recomputed at every birth.
    /// Not a stable identity across divisions.
    pub id: u32,
    pub is_alive: bool,
    /// Generations since last birth. Reset to 0 on death by lifespan and
    /// on every birth.
    pub age: u32,
    pub mutation_rate: f32,
    pub lineage: Lineage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    InvalidDimension { rows: usize, cols: usize },
    OutOfBounds { row: usize, col: usize },
    CorruptGrid { expected: usize, actual: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimension { rows, cols } => {
                write!(f, "grid dimensions must be positive, got {rows}x{cols}")
            }
            GridError::OutOfBounds { row, col } => {
                write!(f, "cell ({row}, {col}) lies outside the grid")
            }
            GridError::CorruptGrid { expected, actual } => {
                write!(
                    f,
                    "cell storage holds {actual} cells, declared dimensions need {expected}"
                )
            }
        }
    }
}

impl Error for GridError {}

/// Row-major matrix of cells with fixed dimensions for the lifetime of a
/// run. Every position always holds exactly one `Cell`, dead or alive.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid where each slot independently starts alive with
    /// probability `live_probability`. Consumes one draw per slot.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        live_probability: f32,
        default_mutation_rate: f32,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimension { rows, cols });
        }
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell {
                    id: (row * cols + col) as u32,
                    is_alive: rng.gen_bool(live_probability.clamp(0.0, 1.0) as f64),
                    age: 0,
                    mutation_rate: default_mutation_rate,
                    lineage: Lineage::Normal,
                });
            }
        }
        Ok(Self { rows, cols, cells })
    }

    /// Assembles a grid from pre-built cells, failing fast when the vector
    /// length contradicts the declared dimensions.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimension { rows, cols });
        }
        if cells.len() != rows * cols {
            return Err(GridError::CorruptGrid {
                expected: rows * cols,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(self.index(row, col))
        } else {
            None
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        debug_assert!(row < self.rows && col < self.cols);
        let idx = self.index(row, col);
        self.cells[idx] = cell;
    }

    /// Internal-consistency check; a mismatch between declared size and
    /// storage is a caller programming error and never recoverable.
    pub fn check_consistency(&self) -> Result<(), GridError> {
        let expected = self.rows * self.cols;
        if self.cells.len() != expected {
            return Err(GridError::CorruptGrid {
                expected,
                actual: self.cells.len(),
            });
        }
        Ok(())
    }

    /// In-bounds axis-aligned neighbor positions, in the fixed order
    /// up, down, left, right. Corners get 2, edges 3, interior cells 4.
    pub fn neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut found = Vec::with_capacity(4);
        for (dr, dc) in NEIGHBOR_OFFSETS {
            let n_row = row as isize + dr;
            let n_col = col as isize + dc;
            if n_row >= 0
                && (n_row as usize) < self.rows
                && n_col >= 0
                && (n_col as usize) < self.cols
            {
                found.push((n_row as usize, n_col as usize));
            }
        }
        found
    }

    /// Flips one cell's alive state in place. Manual revival always yields
    /// a fresh, unmutated cell; death by toggle keeps age and lineage as
    /// they were at the moment of death. Only valid between generation
    /// ticks; the single-threaded event loop serializes edits and ticks.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds { row, col });
        }
        let idx = self.index(row, col);
        let cell = &mut self.cells[idx];
        if cell.is_alive {
            cell.is_alive = false;
        } else {
            cell.is_alive = true;
            cell.age = 0;
            cell.lineage = Lineage::Normal;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dead_cell(id: u32) -> Cell {
        Cell {
            id,
            is_alive: false,
            age: 0,
            mutation_rate: 0.1,
            lineage: Lineage::Normal,
        }
    }

    #[test]
    fn random_rejects_zero_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Grid::random(0, 10, 0.5, 0.1, &mut rng),
            Err(GridError::InvalidDimension { rows: 0, cols: 10 })
        );
        assert_eq!(
            Grid::random(10, 0, 0.5, 0.1, &mut rng),
            Err(GridError::InvalidDimension { rows: 10, cols: 0 })
        );
    }

    #[test]
    fn random_respects_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(2);
        let all_dead = Grid::random(5, 5, 0.0, 0.1, &mut rng).unwrap();
        assert!(all_dead.cells().iter().all(|c| !c.is_alive));

        let all_alive = Grid::random(5, 5, 1.0, 0.1, &mut rng).unwrap();
        assert!(all_alive.cells().iter().all(|c| c.is_alive));
        assert!(all_alive.cells().iter().all(|c| c.age == 0));
    }

    #[test]
    fn random_assigns_row_major_ids() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = Grid::random(4, 7, 0.5, 0.1, &mut rng).unwrap();
        assert_eq!(grid.get(0, 0).unwrap().id, 0);
        assert_eq!(grid.get(2, 3).unwrap().id, (2 * 7 + 3) as u32);
        assert_eq!(grid.get(3, 6).unwrap().id, 27);
    }

    #[test]
    fn from_cells_rejects_mismatched_storage() {
        let cells: Vec<Cell> = (0..8).map(dead_cell).collect();
        assert_eq!(
            Grid::from_cells(3, 3, cells),
            Err(GridError::CorruptGrid {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn neighbor_counts_by_position() {
        let cells: Vec<Cell> = (0..9).map(dead_cell).collect();
        let grid = Grid::from_cells(3, 3, cells).unwrap();
        assert_eq!(grid.neighbors(1, 1).len(), 4);
        assert_eq!(grid.neighbors(0, 0).len(), 2);
        assert_eq!(grid.neighbors(0, 1).len(), 3);
        assert_eq!(grid.neighbors(2, 2).len(), 2);
    }

    #[test]
    fn neighbor_order_is_up_down_left_right() {
        let cells: Vec<Cell> = (0..9).map(dead_cell).collect();
        let grid = Grid::from_cells(3, 3, cells).unwrap();
        assert_eq!(grid.neighbors(1, 1), vec![(0, 1), (2, 1), (1, 0), (1, 2)]);
        assert_eq!(grid.neighbors(0, 0), vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn single_slot_grid_has_no_neighbors() {
        let grid = Grid::from_cells(1, 1, vec![dead_cell(0)]).unwrap();
        assert!(grid.neighbors(0, 0).is_empty());
    }

    #[test]
    fn toggle_rejects_out_of_bounds() {
        let cells: Vec<Cell> = (0..9).map(dead_cell).collect();
        let mut grid = Grid::from_cells(3, 3, cells).unwrap();
        assert_eq!(
            grid.toggle(3, 0),
            Err(GridError::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(
            grid.toggle(0, 9),
            Err(GridError::OutOfBounds { row: 0, col: 9 })
        );
    }

    #[test]
    fn toggle_revival_resets_age_and_lineage() {
        let mut cells: Vec<Cell> = (0..9).map(dead_cell).collect();
        cells[4].age = 5;
        cells[4].lineage = Lineage::Mutated;
        let mut grid = Grid::from_cells(3, 3, cells).unwrap();

        grid.toggle(1, 1).unwrap();
        let revived = grid.get(1, 1).unwrap();
        assert!(revived.is_alive);
        assert_eq!(revived.age, 0);
        assert_eq!(revived.lineage, Lineage::Normal);
    }

    #[test]
    fn toggle_death_keeps_age_and_lineage() {
        let mut cells: Vec<Cell> = (0..9).map(dead_cell).collect();
        cells[4].is_alive = true;
        cells[4].age = 3;
        cells[4].lineage = Lineage::Mutated;
        let mut grid = Grid::from_cells(3, 3, cells).unwrap();

        grid.toggle(1, 1).unwrap();
        let killed = grid.get(1, 1).unwrap();
        assert!(!killed.is_alive);
        assert_eq!(killed.age, 3);
        assert_eq!(killed.lineage, Lineage::Mutated);
    }
}
// --- End of File: grid.rs ---
