//! Shared, lock-protected access to one running game.
//!
//! Every command, gravity tick and read goes through a single
//! `tokio::sync::Mutex`, so each call sees and leaves a consistent state.
//! The session also keeps the play clock: wall time since the previous call
//! is credited to the run before each command, but only while playing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::debug;

use blockfall_core::{DropOutcome, GameSnapshot, GameState, RunSummary};
use blockfall_types::{Intent, RunState};

use crate::sink::RunSink;

/// Published on every lifecycle change (start, pause, resume, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunStatus {
    pub state: RunState,
    pub run_id: u32,
}

impl RunStatus {
    fn of(game: &GameState) -> Self {
        Self {
            state: game.state(),
            run_id: game.run_id(),
        }
    }
}

struct Tracked {
    game: GameState,
    last_sync: Instant,
}

struct Shared {
    tracked: Mutex<Tracked>,
    sink: Arc<dyn RunSink>,
    status: watch::Sender<RunStatus>,
}

/// Cloneable handle to a game shared by the scheduler, input pump and host
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    pub fn new(game: GameState, sink: Arc<dyn RunSink>) -> Self {
        let (status, _) = watch::channel(RunStatus::of(&game));
        Self {
            shared: Arc::new(Shared {
                tracked: Mutex::new(Tracked {
                    game,
                    last_sync: Instant::now(),
                }),
                sink,
                status,
            }),
        }
    }

    /// Watch lifecycle changes
    pub fn subscribe(&self) -> watch::Receiver<RunStatus> {
        self.shared.status.subscribe()
    }

    /// Most recently published status
    pub fn status(&self) -> RunStatus {
        *self.shared.status.borrow()
    }

    /// Apply a player intent; returns whether it changed the game
    pub async fn apply(&self, intent: Intent) -> bool {
        let changed = self.command(|game| game.apply(intent)).await;
        debug!(intent = intent.as_str(), changed, "intent applied");
        changed
    }

    /// One gravity step
    pub async fn tick(&self) -> DropOutcome {
        self.command(GameState::tick).await
    }

    /// Consistent copy of the whole game
    pub async fn snapshot(&self) -> GameSnapshot {
        self.command(|game| game.snapshot()).await
    }

    pub async fn summary(&self) -> RunSummary {
        self.command(|game| game.summary()).await
    }

    /// Current gravity interval
    pub async fn drop_interval(&self) -> Duration {
        let ms = self.shared.tracked.lock().await.game.drop_interval_ms();
        Duration::from_millis(u64::from(ms))
    }

    /// Run `f` against the game under the lock, then deliver any run report.
    ///
    /// The status is published while the lock is held so watchers never see
    /// lifecycle changes out of order; the sink is called after it is released.
    pub async fn command<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let (out, report) = {
            let mut tracked = self.shared.tracked.lock().await;
            let now = Instant::now();
            let since = now.saturating_duration_since(tracked.last_sync);
            tracked.last_sync = now;
            tracked.game.advance_clock(since.as_millis() as u64);

            let out = f(&mut tracked.game);

            let status = RunStatus::of(&tracked.game);
            self.shared.status.send_if_modified(|current| {
                if *current == status {
                    return false;
                }
                *current = status;
                true
            });

            (out, tracked.game.take_run_report())
        };

        if let Some(report) = report {
            self.shared.sink.run_ended(&report);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChannelSink;
    use blockfall_core::{EndReason, PieceSource, Rules};
    use blockfall_types::PieceKind;

    fn session() -> (Session, tokio::sync::mpsc::UnboundedReceiver<blockfall_core::RunReport>) {
        let (sink, rx) = ChannelSink::new();
        let game = GameState::with_rules(PieceSource::scripted([PieceKind::O]), Rules::default());
        (Session::new(game, Arc::new(sink)), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn status_follows_lifecycle() {
        let (session, _rx) = session();
        let mut status = session.subscribe();
        assert_eq!(session.status().state, RunState::Menu);

        assert!(session.apply(Intent::StartGame).await);
        assert!(status.has_changed().unwrap());
        assert_eq!(
            *status.borrow_and_update(),
            RunStatus {
                state: RunState::Playing,
                run_id: 1
            }
        );

        // Moves do not touch the lifecycle.
        session.apply(Intent::MoveLeft).await;
        assert!(!status.has_changed().unwrap());

        session.apply(Intent::TogglePause).await;
        assert_eq!(status.borrow_and_update().state, RunState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn play_clock_skips_paused_time() {
        let (session, mut rx) = session();
        session.apply(Intent::StartGame).await;

        tokio::time::advance(Duration::from_secs(10)).await;
        session.apply(Intent::TogglePause).await;
        tokio::time::advance(Duration::from_secs(60)).await;
        session.apply(Intent::TogglePause).await;
        tokio::time::advance(Duration::from_secs(5)).await;
        session.apply(Intent::Quit).await;

        let report = rx.recv().await.unwrap();
        assert_eq!(report.end_reason, EndReason::Quit);
        assert_eq!(report.summary.duration_seconds, 15);
    }

    #[tokio::test(start_paused = true)]
    async fn menu_time_is_not_counted() {
        let (session, _rx) = session();
        tokio::time::advance(Duration::from_secs(30)).await;
        session.apply(Intent::StartGame).await;
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(session.snapshot().await.elapsed_seconds, 2);
    }

    #[tokio::test]
    async fn drop_interval_starts_at_level_one_speed() {
        let (session, _rx) = session();
        session.apply(Intent::StartGame).await;
        assert_eq!(session.drop_interval().await, Duration::from_millis(800));
    }

    #[tokio::test]
    async fn report_is_delivered_once() {
        let (session, mut rx) = session();
        session.apply(Intent::StartGame).await;
        session.apply(Intent::Quit).await;
        session.apply(Intent::Quit).await;
        session.tick().await;

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }
}
