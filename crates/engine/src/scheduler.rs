//! Background tasks that drive a [`Session`]: gravity and the intent queue.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use blockfall_core::DropOutcome;
use blockfall_types::{Intent, RunState};

use crate::session::{RunStatus, Session};

/// Owns the gravity task; aborts it on drop
#[derive(Debug)]
pub struct GravityHandle {
    task: Option<JoinHandle<()>>,
}

impl GravityHandle {
    /// Stop ticking and wait until the task has released its session handle
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for GravityHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Tick `session` every drop interval while its run is playing.
///
/// The interval is re-read after every tick, so level changes apply to the
/// next row. Any lifecycle change restarts the wait; while paused (or between
/// runs) the task sleeps on the status channel without touching the game.
pub fn spawn_gravity(session: Session) -> GravityHandle {
    let status = session.subscribe();
    GravityHandle {
        task: Some(tokio::spawn(run_gravity(session, status))),
    }
}

async fn run_gravity(session: Session, mut status: watch::Receiver<RunStatus>) {
    loop {
        let current = *status.borrow_and_update();
        if current.state != RunState::Playing {
            if status.changed().await.is_err() {
                return;
            }
            continue;
        }

        let interval = session.drop_interval().await;
        tokio::select! {
            _ = sleep(interval) => {
                match session.tick().await {
                    DropOutcome::ToppedOut => info!(run_id = current.run_id, "gravity topped out"),
                    DropOutcome::Locked => debug!(run_id = current.run_id, "gravity placed piece"),
                    DropOutcome::Moved | DropOutcome::Idle => {}
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}

/// Apply queued intents in arrival order until every sender is gone.
///
/// Resolves to the number of intents that changed the game.
pub fn spawn_input_pump(session: Session, mut intents: mpsc::Receiver<Intent>) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut applied = 0u64;
        while let Some(intent) = intents.recv().await {
            if session.apply(intent).await {
                applied += 1;
            }
        }
        debug!(applied, "input queue closed");
        applied
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use blockfall_core::{GameState, PieceSource, Rules};
    use blockfall_types::PieceKind;

    use crate::sink::TracingSink;

    fn o_session() -> Session {
        let game = GameState::with_rules(PieceSource::scripted([PieceKind::O]), Rules::default());
        Session::new(game, Arc::new(TracingSink))
    }

    async fn active_y(session: &Session) -> Option<i8> {
        session.snapshot().await.active.map(|p| p.y)
    }

    #[tokio::test(start_paused = true)]
    async fn gravity_waits_for_a_run() {
        let session = o_session();
        let _gravity = spawn_gravity(session.clone());

        sleep(Duration::from_secs(5)).await;
        assert_eq!(session.status().state, RunState::Menu);

        session.apply(Intent::StartGame).await;
        sleep(Duration::from_millis(850)).await;
        assert_eq!(active_y(&session).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn gravity_ticks_every_interval() {
        let session = o_session();
        session.apply(Intent::StartGame).await;
        let _gravity = spawn_gravity(session.clone());

        sleep(Duration::from_millis(800 * 3 + 50)).await;
        assert_eq!(active_y(&session).await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_gravity_no_longer_ticks() {
        let session = o_session();
        session.apply(Intent::StartGame).await;
        let gravity = spawn_gravity(session.clone());

        sleep(Duration::from_millis(850)).await;
        gravity.stop().await;
        sleep(Duration::from_secs(10)).await;
        assert_eq!(active_y(&session).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn input_pump_applies_in_order() {
        let session = o_session();
        let (tx, rx) = mpsc::channel(4);
        let pump = spawn_input_pump(session.clone(), rx);

        tx.send(Intent::StartGame).await.unwrap();
        tx.send(Intent::MoveLeft).await.unwrap();
        tx.send(Intent::MoveLeft).await.unwrap();
        tx.send(Intent::HardDrop).await.unwrap();
        drop(tx);

        assert_eq!(pump.await.unwrap(), 4);
        let snap = session.snapshot().await;
        assert_eq!(snap.pieces_placed, 1);
        assert_eq!(snap.board[19][2], PieceKind::O.code());
    }
}
