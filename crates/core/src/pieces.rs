//! Pieces module - tetromino shape matrices and transformations
//!
//! Every piece kind is a square boolean matrix (2x2 for O, 4x4 for I, 3x3 for
//! the rest). Rotation is a plain 90° clockwise matrix transform: there are no
//! wall kicks, an illegal rotation is simply rejected by the caller.

use crate::board::Board;
use crate::types::{PieceKind, Rgb, BOARD_WIDTH};

/// Largest shape matrix (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Offset of a single mino relative to the piece anchor, as `(column, row)`
pub type MinoOffset = (i8, i8);

/// Square boolean matrix describing which cells of a piece are occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Spawn orientation of a piece kind
    pub fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => Self::from_rows(&["....", "####", "....", "...."]),
            PieceKind::O => Self::from_rows(&["##", "##"]),
            PieceKind::T => Self::from_rows(&[".#.", "###", "..."]),
            PieceKind::S => Self::from_rows(&[".##", "##.", "..."]),
            PieceKind::Z => Self::from_rows(&["##.", ".##", "..."]),
            PieceKind::J => Self::from_rows(&["#..", "###", "..."]),
            PieceKind::L => Self::from_rows(&["..#", "###", "..."]),
        }
    }

    /// Build a shape from text rows where `#` marks an occupied cell.
    ///
    /// Panics if the rows do not form a square of size 1..=4.
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        assert!(
            (1..=MAX_SHAPE_SIZE).contains(&size),
            "shape size {} out of range",
            size
        );

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "shape rows must form a square");
            for (c, ch) in row.bytes().enumerate() {
                cells[r][c] = ch == b'#';
            }
        }

        Self {
            size: size as u8,
            cells,
        }
    }

    /// Side length of the matrix
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether the cell at (`row`, `col`) is occupied; false outside the matrix
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.size as usize && col < self.size as usize && self.cells[row][col]
    }

    /// 90° clockwise rotation: transpose, then reverse each resulting row.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (i, row) in cells.iter_mut().enumerate().take(n) {
            for (j, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - j][i];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Occupied cells as `(column, row)` offsets, row-major
    pub fn minos(&self) -> impl Iterator<Item = MinoOffset> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |row| {
            (0..n)
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (col as i8, row as i8))
        })
    }

    /// Number of occupied cells
    pub fn mino_count(&self) -> usize {
        self.minos().count()
    }
}

/// A piece on (or above) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    /// Column of the shape's top-left corner
    pub x: i8,
    /// Row of the shape's top-left corner
    pub y: i8,
}

impl Piece {
    /// Create a piece at its spawn position: horizontally centered, `y = 0`
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = Shape::of(kind);
        let x = (BOARD_WIDTH / 2) as i8 - (shape.size() / 2) as i8;
        Self { kind, shape, x, y: 0 }
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Absolute board coordinates `(x, y)` of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .minos()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Same piece translated by (`dx`, `dy`), saturating at the `i8` range;
    /// legality is not checked
    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Same piece rotated 90° clockwise around a fixed anchor; legality is not checked
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }
}

/// Project `piece` straight down to the lowest legal row.
pub fn ghost(piece: &Piece, board: &Board) -> Piece {
    let mut landed = *piece;
    while board.is_legal(&landed, 0, 1) {
        landed.y += 1;
    }
    landed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_positions_are_centered() {
        assert_eq!(Piece::spawn(PieceKind::I).x, 3);
        assert_eq!(Piece::spawn(PieceKind::O).x, 4);
        for kind in [
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ] {
            let piece = Piece::spawn(kind);
            assert_eq!(piece.x, 4, "{:?}", kind);
            assert_eq!(piece.y, 0);
        }
    }

    #[test]
    fn test_every_kind_has_four_minos() {
        for kind in PieceKind::ALL {
            assert_eq!(Shape::of(kind).mino_count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let rotated = Shape::of(PieceKind::T).rotated_cw();
        assert_eq!(rotated, Shape::from_rows(&[".#.", ".##", ".#."]));
    }

    #[test]
    fn test_rotate_i_becomes_vertical_in_column_two() {
        let rotated = Shape::of(PieceKind::I).rotated_cw();
        let minos: Vec<_> = rotated.minos().collect();
        assert_eq!(minos, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_o_rotation_is_identity() {
        let o = Shape::of(PieceKind::O);
        assert_eq!(o.rotated_cw(), o);
    }

    #[test]
    fn test_get_outside_matrix_is_empty() {
        let o = Shape::of(PieceKind::O);
        assert!(o.get(1, 1));
        assert!(!o.get(2, 0));
        assert!(!o.get(0, 3));
    }

    #[test]
    #[should_panic]
    fn test_from_rows_rejects_non_square() {
        Shape::from_rows(&["##", "#"]);
    }

    #[test]
    fn test_ghost_on_empty_board_rests_on_floor() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::O);
        let landed = ghost(&piece, &board);
        assert_eq!(landed.y, 18);
        assert!(!board.is_legal(&landed, 0, 1));
    }
}
