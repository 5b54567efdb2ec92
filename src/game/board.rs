use serde::{Deserialize, Serialize};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CONNECT: usize = 4;

/// Axes scanned for a winning run: horizontal, vertical, and both diagonals.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Human,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is full")]
    ColumnFull,
    #[error("column index out of range")]
    InvalidColumn,
}

/// Grid size and the run length needed to win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
    pub connect: usize,
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions {
            rows: ROWS,
            cols: COLS,
            connect: CONNECT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board with the given dimensions
    pub fn new(dims: Dimensions) -> Self {
        Board {
            dims,
            cells: vec![Cell::Empty; dims.rows * dims.cols],
        }
    }

    /// Create an empty 6x7 board where four in a row wins
    pub fn standard() -> Self {
        Self::new(Dimensions::default())
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    /// Get the cell at a specific position.
    /// Row 0 is the top, the last row is the bottom.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.dims.cols + col]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.dims.cols || self.dims.rows == 0 {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= self.dims.cols {
            return Err(MoveError::InvalidColumn);
        }

        for row in (0..self.dims.rows).rev() {
            let idx = row * self.dims.cols + col;
            if self.cells[idx] == Cell::Empty {
                self.cells[idx] = cell;
                return Ok(row);
            }
        }

        Err(MoveError::ColumnFull)
    }

    /// True when the top row has no empty cell. Gravity guarantees every
    /// column beneath a filled top cell is full as well.
    pub fn is_full(&self) -> bool {
        (0..self.dims.cols).all(|col| self.is_column_full(col))
    }

    /// Columns that can still take a piece, in ascending order.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.dims.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    pub fn lowest_open_column(&self) -> Option<usize> {
        (0..self.dims.cols).find(|&col| !self.is_column_full(col))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Rescan the whole board for a run of `connect` pieces belonging to `cell`.
    pub fn is_winning_move(&self, cell: Cell) -> bool {
        self.winning_line(cell).is_some()
    }

    /// Positions of the first winning run found for `cell`, if any.
    ///
    /// For every occupied cell the run along each axis is the forward count
    /// plus the backward count minus one, since both counts include the
    /// origin.
    pub fn winning_line(&self, cell: Cell) -> Option<Vec<(usize, usize)>> {
        if cell == Cell::Empty || self.dims.connect == 0 {
            return None;
        }

        for row in 0..self.dims.rows {
            for col in 0..self.dims.cols {
                if self.get(row, col) != cell {
                    continue;
                }

                for &(dr, dc) in &AXES {
                    let forward = self.count_run(row, col, dr, dc, cell);
                    let backward = self.count_run(row, col, -dr, -dc, cell);
                    let run = forward + backward - 1;
                    if run >= self.dims.connect {
                        let back = (backward - 1) as isize;
                        let start_r = row as isize - back * dr;
                        let start_c = col as isize - back * dc;
                        let line = (0..run as isize)
                            .map(|i| ((start_r + i * dr) as usize, (start_c + i * dc) as usize))
                            .collect();
                        return Some(line);
                    }
                }
            }
        }

        None
    }

    /// Count contiguous `cell` pieces starting at (row, col) and stepping by (dr, dc).
    fn count_run(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let rows = self.dims.rows as isize;
        let cols = self.dims.cols as isize;
        let mut count = 0;
        let mut r = row as isize;
        let mut c = col as isize;

        while r >= 0 && r < rows && c >= 0 && c < cols && self.get(r as usize, c as usize) == cell {
            count += 1;
            r += dr;
            c += dc;
        }

        count
    }

    /// Clear every cell
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
