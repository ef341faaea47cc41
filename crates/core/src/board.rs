//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the board (`y < 0`) exist only for pieces that spawn partially hidden.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Board width as a count
pub const COLS: usize = BOARD_WIDTH as usize;

/// Board height as a count
pub const ROWS: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the board
const BOARD_SIZE: usize = COLS * ROWS;

/// Row indices removed by a single clear pass, bottom to top
pub type ClearedRows = ArrayVec<usize, ROWS>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * COLS + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether `piece`, translated by (`dx`, `dy`), fits on the board.
    ///
    /// Every occupied cell must stay inside `[0, width)` and above the floor.
    /// Cells still above the top edge (`y < 0`) skip the overlap check.
    /// Any offset is accepted; an anchor that would leave the `i8` range is illegal.
    pub fn is_legal(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        let ox = i16::from(piece.x) + i16::from(dx);
        let oy = i16::from(piece.y) + i16::from(dy);
        if i8::try_from(ox).is_err() || i8::try_from(oy).is_err() {
            return false;
        }

        piece.shape.minos().all(|(mx, my)| {
            let (x, y) = (ox + i16::from(mx), oy + i16::from(my));
            if x < 0 || x >= COLS as i16 || y >= ROWS as i16 {
                return false;
            }
            y < 0 || !self.is_occupied(x as i8, y as i8)
        })
    }

    /// Write every visible cell of `piece` into the board.
    ///
    /// Cells above the top edge are dropped. The caller is expected to have
    /// checked legality; committing outside the side walls is a contract violation.
    pub fn commit(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            debug_assert!(
                (0..BOARD_WIDTH as i8).contains(&x) && y < BOARD_HEIGHT as i8,
                "committing {:?} outside the board at ({}, {})",
                piece.kind,
                x,
                y
            );
            if y >= 0 {
                self.set(x, y, Some(piece.kind));
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= ROWS {
            return false;
        }
        let start = y * COLS;
        self.cells[start..start + COLS].iter().all(|cell| cell.is_some())
    }

    /// Check if a row is completely empty
    pub fn is_row_empty(&self, y: usize) -> bool {
        if y >= ROWS {
            return false;
        }
        let start = y * COLS;
        self.cells[start..start + COLS].iter().all(|cell| cell.is_none())
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// All full rows go at once; the survivors keep their order and slide down,
    /// empty rows fill in from the top. Uses a two-pointer pass with zero allocation.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let mut write_y = ROWS;

        // Scan from bottom to top
        for read_y in (0..ROWS).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * COLS;
                    self.cells
                        .copy_within(src_start..src_start + COLS, write_y * COLS);
                }
            }
        }

        for cell in &mut self.cells[..write_y * COLS] {
            *cell = None;
        }

        cleared_rows
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(COLS)
    }

    /// Fill a grid with compact cell codes (0 = empty, see [`PieceKind::code`])
    pub fn write_u8_grid(&self, out: &mut [[u8; COLS]; ROWS]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            for (d, cell) in dst.iter_mut().zip(src) {
                *d = cell.map_or(0, |kind| kind.code());
            }
        }
    }

    /// Build a board from text rows (`.` empty, any kind letter filled).
    ///
    /// Rows are aligned to the bottom of the board, so tests only spell out
    /// the interesting part of the stack. Panics on a dimension mismatch.
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(rows.len() <= ROWS, "too many rows: {}", rows.len());

        let mut board = Self::new();
        let offset = ROWS - rows.len();
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), COLS, "row {} must be {} wide", r, COLS);
            for (x, ch) in row.chars().enumerate() {
                let cell = if ch == '.' {
                    None
                } else {
                    Some(PieceKind::from_str(&ch.to_string()).unwrap_or(PieceKind::I))
                };
                board.cells[(offset + r) * COLS + x] = cell;
            }
        }
        board
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
