//! Snapshot module - serializable read-only view of a game
//!
//! Cell codes follow [`PieceKind::code`]; the active piece is carried
//! separately so renderers can draw it over the settled board.

use serde::{Deserialize, Serialize};

use crate::pieces::Piece;
use crate::types::{PieceKind, RunState, BOARD_HEIGHT, BOARD_WIDTH};

/// Position of the active piece and the cells it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    /// Board cells covered by the piece, as `[x, y]`
    pub cells: [[i8; 2]; 4],
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        let mut cells = [[0i8; 2]; 4];
        for (slot, (x, y)) in cells.iter_mut().zip(value.cells()) {
            *slot = [x, y];
        }
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
            cells,
        }
    }
}

/// Read-only view of the game for renderers and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Cell codes, row-major from the top (0 = empty, see [`PieceKind::code`])
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub state: RunState,
    pub run_id: u32,
    pub active: Option<PieceSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pieces_placed: u32,
    pub elapsed_seconds: u64,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    /// Render the board (with the active piece) as text rows, `.` for empty
    pub fn board_rows(&self) -> Vec<String> {
        let mut grid = self.board;
        if let Some(active) = self.active {
            for [x, y] in active.cells {
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    grid[y as usize][x as usize] = active.kind.code();
                }
            }
        }
        grid.iter()
            .map(|row| {
                row.iter()
                    .map(|&code| match code {
                        0 => '.',
                        _ => PieceKind::ALL[(code - 1) as usize]
                            .as_str()
                            .chars()
                            .next()
                            .unwrap_or('#')
                            .to_ascii_uppercase(),
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            state: RunState::Menu,
            run_id: 0,
            active: None,
            ghost_y: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            pieces_placed: 0,
            elapsed_seconds: 0,
            drop_interval_ms: 0,
        }
    }
}
