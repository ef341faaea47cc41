//! Demo input source.
//!
//! Plays by picking a random rotation and column for every new piece, then
//! hard-dropping it. It only ever produces [`Intent`]s, the same as a
//! keyboard mapper would, and never looks at the game except through
//! snapshots.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::core::{GameSnapshot, SimpleRng};
use crate::engine::Session;
use crate::types::{Intent, RunState, BOARD_WIDTH};

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: SimpleRng,
    plan: VecDeque<Intent>,
    /// `(run_id, pieces_placed)` the current plan was made for
    planned_for: Option<(u32, u32)>,
}

impl Autopilot {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            plan: VecDeque::new(),
            planned_for: None,
        }
    }

    /// Next intent for the game shown in `snap`; `None` while there is nothing to do
    pub fn next_intent(&mut self, snap: &GameSnapshot) -> Option<Intent> {
        if snap.state != RunState::Playing {
            self.plan.clear();
            self.planned_for = None;
            return None;
        }

        let key = (snap.run_id, snap.pieces_placed);
        if self.planned_for != Some(key) {
            self.planned_for = Some(key);
            self.replan(snap);
        }
        self.plan.pop_front()
    }

    fn replan(&mut self, snap: &GameSnapshot) {
        self.plan.clear();
        let Some(active) = snap.active else {
            return;
        };

        let rotations = self.rng.next_range(4);
        let target = self.rng.next_range(BOARD_WIDTH as u32) as i8;
        for _ in 0..rotations {
            self.plan.push_back(Intent::Rotate);
        }

        // Moves that hit a wall are rejected by the engine; overshooting is harmless.
        let dx = target - active.x;
        let step = if dx < 0 {
            Intent::MoveLeft
        } else {
            Intent::MoveRight
        };
        for _ in 0..dx.unsigned_abs() {
            self.plan.push_back(step);
        }
        self.plan.push_back(Intent::HardDrop);

        debug!(
            kind = active.kind.as_str(),
            rotations,
            target,
            "autopilot planned placement"
        );
    }
}

/// Feed `pilot`'s intents into `intents` every `every` until the run is over.
///
/// Waits through the menu (the run may not have started yet) and through
/// pauses. Resolves to the number of intents sent.
pub async fn drive(
    session: &Session,
    intents: &mpsc::Sender<Intent>,
    every: Duration,
    pilot: &mut Autopilot,
) -> Result<u64, mpsc::error::SendError<Intent>> {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sent = 0u64;

    loop {
        ticker.tick().await;
        let snap = session.snapshot().await;
        if snap.state == RunState::GameOver {
            return Ok(sent);
        }
        if let Some(intent) = pilot.next_intent(&snap) {
            intents.send(intent).await?;
            sent += 1;
        }
    }
}
