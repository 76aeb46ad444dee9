//! Board module - manages the game grid
//!
//! The board is a `width x height` grid (11x20 by default) where each cell is
//! empty, filled with a piece kind, or marked for clearing.
//! Uses a flat row-major vector sized once at construction.
//! Coordinates: (x, y) where x grows left to right and y grows upward; row 0 is the bottom.
//! Rows at or above `height` are "above the board": pieces may hang there, but nothing is stored.

use crate::config::{validate_dimensions, ConfigError};
use crate::piece::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board, flat row-major storage with row 0 at the bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Fails for dimensions that cannot host a piece window.
    pub fn new(width: u8, height: u8) -> Result<Self, ConfigError> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is inside the board and holds a block (marked or not)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(cell) if !cell.is_empty())
    }

    /// Cells of one row, left to right
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Check if a row has no empty cell
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// Check whether a piece may occupy its current anchor.
    ///
    /// Every occupied shape cell must be within `[0, width)` horizontally and
    /// not below row 0. Cells at or above `height` are accepted; cells inside
    /// the board must land on empty cells.
    pub fn fits(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(x, y, _)| self.accepts(x, y))
    }

    #[inline]
    fn accepts(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width as i32 || y < 0 {
            return false;
        }
        if y >= self.height as i32 {
            return true;
        }
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    /// Lock a piece into the board at its current anchor.
    ///
    /// Returns false, leaving the board untouched, if the piece does not fit.
    /// Cells at or above `height` are dropped.
    pub fn place(&mut self, piece: &Piece) -> bool {
        if !self.fits(piece) {
            return false;
        }

        for (x, y, kind) in piece.cells() {
            // Out-of-range rows are above the board; `set` ignores them.
            self.set(x, y, Cell::Filled(kind));
        }

        true
    }

    /// Mark every completed row for clearing in one pass.
    ///
    /// Returns the number of rows marked. Marked cells keep their kind so a
    /// renderer can show them before [`Board::sweep_marked_rows`] removes them.
    pub fn mark_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let mut marked = 0;

        for y in (0..self.height as usize).rev() {
            let start = y * width;
            let row = &mut self.cells[start..start + width];
            if row.iter().all(|cell| matches!(cell, Cell::Filled(_))) {
                for cell in row.iter_mut() {
                    *cell = cell.mark();
                }
                marked += 1;
            }
        }

        marked
    }

    /// Whether any row is waiting to be swept
    pub fn has_marked_rows(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_clearing())
    }

    /// Remove marked rows and drop everything above them.
    ///
    /// Remaining rows keep their relative order; vacated top rows become empty.
    /// Uses a two-pointer pass from the bottom with no allocation.
    /// Returns the number of rows removed.
    pub fn sweep_marked_rows(&mut self) -> usize {
        let width = self.width as usize;
        let mut write_y = 0usize;
        let mut swept = 0;

        for read_y in 0..self.height as usize {
            let src_start = read_y * width;
            let marked = self.cells[src_start..src_start + width]
                .iter()
                .any(|cell| cell.is_clearing());
            if marked {
                swept += 1;
                continue;
            }
            if write_y != read_y {
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
            write_y += 1;
        }

        // Clear the vacated rows at the top
        self.cells[write_y * width..].fill(Cell::Empty);

        swept
    }

    /// Detect, mark and remove all full rows at once.
    ///
    /// Returns the number of rows cleared; with none full the grid is unchanged.
    pub fn clear_full_rows(&mut self) -> usize {
        let marked = self.mark_full_rows();
        if marked > 0 {
            self.sweep_marked_rows();
        }
        marked
    }

    /// Get a reference to the internal cells array (row 0 first)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: vec![Cell::Empty; BOARD_WIDTH as usize * BOARD_HEIGHT as usize],
        }
    }
}
