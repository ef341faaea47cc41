//! Game state module - the simulation engine
//!
//! Owns the board, the active and next pieces, and the run counters. Every
//! command handler leaves the derived values (ghost piece, drop interval)
//! consistent before returning, so readers never see stale projections.
//!
//! Movement commands are no-ops outside [`RunState::Playing`]. The only
//! reportable event is the end of a run, which is stored once as a
//! [`RunReport`] until taken by the host.

use tracing::{debug, info};

use crate::board::Board;
use crate::pieces::{ghost, Piece};
use crate::report::{DropOutcome, EndReason, PlacementEvent, RunReport, RunSummary};
use crate::rng::PieceSource;
use crate::scoring::{calculate_level, Rules};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{Intent, RunState};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    state: RunState,
    board: Board,
    active: Option<Piece>,
    next: Option<Piece>,
    ghost: Option<Piece>,
    pieces: PieceSource,
    rules: Rules,
    /// Monotonic run id (increments on every start).
    run_id: u32,
    score: u32,
    level: u32,
    lines: u32,
    pieces_placed: u32,
    tetrises: u32,
    /// Play time of the current run; only accumulates while playing.
    elapsed_ms: u64,
    drop_interval_ms: u32,
    /// Last placement event (consumed by observers).
    last_event: Option<PlacementEvent>,
    /// Terminal report waiting for the persistence sink.
    run_report: Option<RunReport>,
}

impl GameState {
    /// Create an engine in the menu, drawing pieces uniformly with `seed`
    pub fn new(seed: u32) -> Self {
        Self::with_rules(PieceSource::uniform(seed), Rules::default())
    }

    /// Create an engine with an explicit piece source and rule set
    pub fn with_rules(pieces: PieceSource, rules: Rules) -> Self {
        let drop_interval_ms = rules.drop_interval_ms(1);
        Self {
            state: RunState::Menu,
            board: Board::new(),
            active: None,
            next: None,
            ghost: None,
            pieces,
            rules,
            run_id: 0,
            score: 0,
            level: 1,
            lines: 0,
            pieces_placed: 0,
            tetrises: 0,
            elapsed_ms: 0,
            drop_interval_ms,
            last_event: None,
            run_report: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    pub fn ghost(&self) -> Option<Piece> {
        self.ghost
    }

    pub fn run_id(&self) -> u32 {
        self.run_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn tetrises_cleared(&self) -> u32 {
        self.tetrises
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Current gravity interval; the scheduler must re-read it after every tick
    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Final numbers of the current (or just finished) run
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            final_level: self.level,
            lines_cleared: self.lines,
            duration_seconds: self.elapsed_seconds(),
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.state = self.state;
        out.run_id = self.run_id;
        out.active = self.active.map(PieceSnapshot::from);
        out.ghost_y = self.ghost.map(|g| g.y);
        out.next = self.next.map(|p| p.kind);
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.pieces_placed = self.pieces_placed;
        out.elapsed_seconds = self.elapsed_seconds();
        out.drop_interval_ms = self.drop_interval_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Start a fresh run: new board, two new pieces, counters zeroed.
    ///
    /// Works from any state. A run still in progress is ended first and
    /// reported with [`EndReason::Quit`].
    pub fn start_game(&mut self) {
        if self.state.in_run() {
            self.end_run(EndReason::Quit);
        }

        self.run_id = self.run_id.wrapping_add(1);
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = calculate_level(0);
        self.pieces_placed = 0;
        self.tetrises = 0;
        self.elapsed_ms = 0;
        self.drop_interval_ms = self.rules.drop_interval_ms(self.level);
        self.last_event = None;
        self.active = None;
        self.next = Some(Piece::spawn(self.pieces.draw()));
        self.state = RunState::Playing;

        info!(run_id = self.run_id, rules = ?self.rules, "run started");
        self.spawn_next();
    }

    /// Toggle between playing and paused.
    ///
    /// Returns false (and does nothing) outside a run.
    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            RunState::Playing => RunState::Paused,
            RunState::Paused => RunState::Playing,
            _ => return false,
        };
        debug!(run_id = self.run_id, state = self.state.as_str(), "pause toggled");
        true
    }

    /// End the current run at the player's request
    pub fn quit(&mut self) -> bool {
        if !self.state.in_run() {
            return false;
        }
        self.end_run(EndReason::Quit);
        true
    }

    /// Credit play time to the run; ignored unless playing
    pub fn advance_clock(&mut self, elapsed_ms: u64) {
        if self.state == RunState::Playing {
            self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        }
    }

    /// Translate the active piece if the result is legal
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if !self.board.is_legal(&active, dx, dy) {
            return false;
        }

        self.active = Some(active.moved(dx, dy));
        self.refresh_ghost();
        true
    }

    /// Rotate the active piece clockwise; rejected if the result does not fit
    pub fn rotate(&mut self) -> bool {
        if self.state != RunState::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let rotated = active.rotated();
        if !self.board.is_legal(&rotated, 0, 0) {
            return false;
        }

        self.active = Some(rotated);
        self.refresh_ghost();
        true
    }

    /// Player-requested one-row drop; places the piece if it is blocked
    pub fn soft_drop(&mut self) -> DropOutcome {
        self.step_down()
    }

    /// Gravity tick from the scheduler; same rules as a soft drop
    pub fn tick(&mut self) -> DropOutcome {
        self.step_down()
    }

    /// Drop the active piece to its ghost position and place it immediately
    pub fn hard_drop(&mut self) -> DropOutcome {
        if self.state != RunState::Playing {
            return DropOutcome::Idle;
        }
        let Some(active) = self.active else {
            return DropOutcome::Idle;
        };

        self.active = Some(ghost(&active, &self.board));
        self.place_active(true)
    }

    /// Apply a player intent; returns whether it changed the game
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft => self.move_piece(-1, 0),
            Intent::MoveRight => self.move_piece(1, 0),
            Intent::SoftDrop => self.soft_drop().changed(),
            Intent::Rotate => self.rotate(),
            Intent::HardDrop => self.hard_drop().changed(),
            Intent::TogglePause => self.toggle_pause(),
            Intent::StartGame => {
                self.start_game();
                true
            }
            Intent::Quit => self.quit(),
        }
    }

    /// Take the last placement event
    pub fn take_last_event(&mut self) -> Option<PlacementEvent> {
        self.last_event.take()
    }

    /// Take the report of a finished run; yields it exactly once per run
    pub fn take_run_report(&mut self) -> Option<RunReport> {
        self.run_report.take()
    }

    fn step_down(&mut self) -> DropOutcome {
        if self.state != RunState::Playing || self.active.is_none() {
            return DropOutcome::Idle;
        }
        if self.move_piece(0, 1) {
            return DropOutcome::Moved;
        }
        self.place_active(false)
    }

    /// Lock the active piece onto the board, score it and bring in the next one.
    ///
    /// A piece that cannot leave spawn height tops the run out instead.
    fn place_active(&mut self, hard_drop: bool) -> DropOutcome {
        let Some(active) = self.active.take() else {
            return DropOutcome::Idle;
        };

        if active.y <= 0 {
            self.end_run(EndReason::TopOut);
            return DropOutcome::ToppedOut;
        }

        self.board.commit(&active);
        let cleared = self.board.clear_full_rows().len();

        self.lines += cleared as u32;
        self.level = calculate_level(self.lines);
        let gained = self.rules.scoring.placement_score(cleared, self.level);
        self.score = self.score.saturating_add(gained);
        self.pieces_placed += 1;
        if cleared == 4 {
            self.tetrises += 1;
        }
        self.drop_interval_ms = self.rules.drop_interval_ms(self.level);

        self.last_event = Some(PlacementEvent {
            lines_cleared: cleared as u32,
            score_gained: gained,
            level: self.level,
            hard_drop,
        });
        debug!(
            run_id = self.run_id,
            kind = active.kind.as_str(),
            x = active.x,
            y = active.y,
            cleared,
            gained,
            "piece placed"
        );

        if self.spawn_next() {
            DropOutcome::Locked
        } else {
            DropOutcome::ToppedOut
        }
    }

    /// Promote the next piece to active and draw a new next piece.
    ///
    /// Returns false if the promoted piece does not fit, which ends the run.
    fn spawn_next(&mut self) -> bool {
        let incoming = match self.next.take() {
            Some(piece) => piece,
            None => Piece::spawn(self.pieces.draw()),
        };
        self.next = Some(Piece::spawn(self.pieces.draw()));

        if !self.board.is_legal(&incoming, 0, 0) {
            self.end_run(EndReason::TopOut);
            return false;
        }

        self.active = Some(incoming);
        self.refresh_ghost();
        true
    }

    fn refresh_ghost(&mut self) {
        self.ghost = self.active.map(|piece| ghost(&piece, &self.board));
    }

    fn end_run(&mut self, reason: EndReason) {
        self.state = RunState::GameOver;
        self.active = None;
        self.ghost = None;

        let report = RunReport {
            summary: self.summary(),
            end_reason: reason,
            pieces_placed: self.pieces_placed,
            tetrises_cleared: self.tetrises,
            run_id: self.run_id,
        };
        info!(
            run_id = self.run_id,
            reason = reason.as_str(),
            score = self.score,
            level = self.level,
            lines = self.lines,
            "run ended"
        );
        self.run_report = Some(report);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
