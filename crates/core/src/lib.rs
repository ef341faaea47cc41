//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on timers, input devices or I/O, making it:
//!
//! - **Deterministic**: Same seed (or piece script) produces identical runs
//! - **Testable**: Every rule is exercised by plain unit tests
//! - **Portable**: The host decides when gravity ticks and where reports go
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 game board with collision checks and line clearing
//! - [`game_state`]: The run state machine: active piece, scoring, timing
//! - [`pieces`]: Shape matrices, clockwise rotation and the ghost projection
//! - [`rng`]: Seeded uniform piece selection and scripted sequences
//! - [`scoring`]: Pluggable scoring policy and gravity curve
//! - [`report`]: Placement events and the end-of-run report
//! - [`snapshot`]: Serializable read-only view for renderers
//!
//! # Game Rules
//!
//! - **Uniform pieces**: Each new piece is drawn independently from the seven kinds
//! - **Plain rotation**: 90° clockwise matrix rotation, rejected when it does not fit
//! - **Immediate lock**: A piece that cannot move down is placed at once
//! - **Ghost Piece**: Shows where the current piece will land
//! - **Scoring**: 100/300/500/800 per 1-4 lines, times the level
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::{Intent, RunState};
//!
//! let mut game = GameState::new(12345);
//! game.apply(Intent::StartGame);
//!
//! game.apply(Intent::MoveRight);
//! game.apply(Intent::Rotate);
//! game.apply(Intent::HardDrop);
//!
//! assert_eq!(game.state(), RunState::Playing);
//! assert_eq!(game.pieces_placed(), 1);
//! ```
//!
//! # Timing
//!
//! The core never reads a clock. The host calls [`GameState::tick`] every
//! [`GameState::drop_interval_ms`] while playing, and credits play time with
//! [`GameState::advance_clock`].

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod report;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::GameState;
pub use pieces::{ghost, Piece, Shape};
pub use report::{DropOutcome, EndReason, PlacementEvent, RunReport, RunSummary};
pub use rng::{PieceSource, SimpleRng};
pub use scoring::{DropCurve, LevelMultiplied, NesDropCurve, Rules, ScoringPolicy};
pub use snapshot::{GameSnapshot, PieceSnapshot};
