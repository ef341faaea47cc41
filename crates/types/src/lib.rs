//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond parsing and lookups,
//! making them usable by the core, the host runtime, and any input source.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Origin**: (0, 0) is the top-left cell, `y` grows downward
//!
//! # Gravity
//!
//! Drop intervals follow an NES-style lookup table keyed by level
//! (milliseconds per row), clamped at [`MIN_DROP_INTERVAL_MS`]:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 800ms |
//! | 2 | 716ms |
//! | 5 | 466ms |
//! | 10 | 100ms |
//! | 11-13 | 83ms |
//! | 14+ | 50ms (floor) |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Intent, PieceKind, RunState, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! let intent = Intent::from_str("hardDrop").unwrap();
//! assert_eq!(intent, Intent::HardDrop);
//!
//! assert_eq!(RunState::default(), RunState::Menu);
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points for clearing N lines at once (index = lines cleared).
///
/// Multiplied by the current level under the default scoring policy.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// NES-style gravity table: `(first level, ms per row)`, ascending by level.
///
/// A level uses the entry with the greatest first level not above it.
/// Entries from level 17 on are the NES curve as published; the
/// [`MIN_DROP_INTERVAL_MS`] floor clamps them, so those levels run at 50ms.
pub const DROP_TABLE: [(u32, u32); 15] = [
    (1, 800),
    (2, 716),
    (3, 633),
    (4, 550),
    (5, 466),
    (6, 383),
    (7, 300),
    (8, 216),
    (9, 133),
    (10, 100),
    (11, 83),
    (14, 50),
    (17, 33),
    (20, 16),
    (30, 1),
];

/// The engine never schedules gravity faster than this.
pub const MIN_DROP_INTERVAL_MS: u32 = 50;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, 4-wide bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Display color of the piece and of the cells it leaves behind
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb(0, 240, 240),
            PieceKind::O => Rgb(240, 240, 0),
            PieceKind::T => Rgb(160, 0, 240),
            PieceKind::S => Rgb(0, 240, 0),
            PieceKind::Z => Rgb(240, 0, 0),
            PieceKind::J => Rgb(0, 0, 240),
            PieceKind::L => Rgb(240, 160, 0),
        }
    }

    /// Compact non-zero code for grid exports (0 is reserved for empty)
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }
}

/// Discrete player intents delivered by an input source
///
/// Device mapping, debouncing and key repeat happen upstream; the engine
/// only sees these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down, placing it if blocked
    SoftDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Drop piece to its ghost position and place it
    HardDrop,
    /// Toggle between playing and paused
    TogglePause,
    /// Start a fresh run (from any state)
    StartGame,
    /// Abandon the current run
    Quit,
}

impl Intent {
    /// Parse intent from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Intent;
    ///
    /// assert_eq!(Intent::from_str("moveLeft"), Some(Intent::MoveLeft));
    /// assert_eq!(Intent::from_str("TOGGLEPAUSE"), Some(Intent::TogglePause));
    /// assert_eq!(Intent::from_str("hold"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Intent::MoveLeft),
            "moveright" => Some(Intent::MoveRight),
            "softdrop" => Some(Intent::SoftDrop),
            "rotate" => Some(Intent::Rotate),
            "harddrop" => Some(Intent::HardDrop),
            "togglepause" => Some(Intent::TogglePause),
            "startgame" => Some(Intent::StartGame),
            "quit" => Some(Intent::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MoveLeft => "moveLeft",
            Intent::MoveRight => "moveRight",
            Intent::SoftDrop => "softDrop",
            Intent::Rotate => "rotate",
            Intent::HardDrop => "hardDrop",
            Intent::TogglePause => "togglePause",
            Intent::StartGame => "startGame",
            Intent::Quit => "quit",
        }
    }
}

/// Lifecycle state of a run
///
/// `Menu -> Playing <-> Paused`, `Playing -> GameOver -> Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Menu => "menu",
            RunState::Playing => "playing",
            RunState::Paused => "paused",
            RunState::GameOver => "game_over",
        }
    }

    /// Whether a run is in progress (playing or paused)
    pub fn in_run(&self) -> bool {
        matches!(self, RunState::Playing | RunState::Paused)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a committed piece of that kind
pub type Cell = Option<PieceKind>;
