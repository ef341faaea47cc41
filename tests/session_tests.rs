//! Session tests - gravity, pausing and report delivery under the async host

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use blockfall::core::{EndReason, GameState, PieceSource, Rules};
use blockfall::engine::{spawn_gravity, spawn_input_pump, ChannelSink, Session};
use blockfall::types::{Intent, PieceKind, RunState};

fn scripted_session(kinds: &[PieceKind]) -> (Session, mpsc::UnboundedReceiver<blockfall::core::RunReport>) {
    let (sink, reports) = ChannelSink::new();
    let game = GameState::with_rules(PieceSource::scripted(kinds.to_vec()), Rules::default());
    (Session::new(game, Arc::new(sink)), reports)
}

#[tokio::test(start_paused = true)]
async fn paused_run_receives_no_gravity() {
    let (session, _reports) = scripted_session(&[PieceKind::O]);
    let _gravity = spawn_gravity(session.clone());
    session.apply(Intent::StartGame).await;

    sleep(Duration::from_millis(850)).await;
    assert_eq!(session.snapshot().await.active.unwrap().y, 1);

    session.apply(Intent::TogglePause).await;
    let paused = session.snapshot().await;
    sleep(Duration::from_secs(30)).await;
    let still = session.snapshot().await;
    assert_eq!(still.state, RunState::Paused);
    assert_eq!(still.active, paused.active);
    assert_eq!(still.elapsed_seconds, paused.elapsed_seconds);

    // Resuming restarts a full interval.
    session.apply(Intent::TogglePause).await;
    sleep(Duration::from_millis(750)).await;
    assert_eq!(session.snapshot().await.active.unwrap().y, 1);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(session.snapshot().await.active.unwrap().y, 2);
}

#[tokio::test(start_paused = true)]
async fn gravity_alone_tops_out_the_run() {
    let (session, mut reports) = scripted_session(&[PieceKind::O]);
    let _gravity = spawn_gravity(session.clone());
    session.apply(Intent::StartGame).await;

    let mut status = session.subscribe();
    status
        .wait_for(|s| s.state == RunState::GameOver)
        .await
        .unwrap();

    let report = reports.recv().await.unwrap();
    assert_eq!(report.end_reason, EndReason::TopOut);
    // Ten O pieces stacked in the middle two columns, the last one blocked.
    assert_eq!(report.pieces_placed, 9);
    assert!(report.summary.duration_seconds > 0);
    assert!(reports.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn one_report_per_run() {
    let (session, mut reports) = scripted_session(&[PieceKind::T, PieceKind::I]);

    session.apply(Intent::StartGame).await;
    session.apply(Intent::HardDrop).await;
    // Restart mid-run: the abandoned run is reported as a quit.
    session.apply(Intent::StartGame).await;
    session.apply(Intent::Quit).await;
    session.apply(Intent::Quit).await;

    let first = reports.recv().await.unwrap();
    let second = reports.recv().await.unwrap();
    assert_eq!((first.run_id, first.end_reason), (1, EndReason::Quit));
    assert_eq!(first.pieces_placed, 1);
    assert_eq!((second.run_id, second.end_reason), (2, EndReason::Quit));
    assert!(reports.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_hard_drops_are_atomic() {
    let (session, _reports) = scripted_session(&[PieceKind::I, PieceKind::O, PieceKind::T]);
    session.apply(Intent::StartGame).await;

    let (tx, rx) = mpsc::channel(8);
    let pump = spawn_input_pump(session.clone(), rx);

    let writer = tokio::spawn(async move {
        for i in 0..200 {
            let intent = if i % 2 == 0 {
                Intent::HardDrop
            } else {
                Intent::StartGame
            };
            if tx.send(intent).await.is_err() {
                break;
            }
        }
    });

    let reader = {
        let session = session.clone();
        tokio::spawn(async move {
            for _ in 0..500 {
                let snap = session.snapshot().await;
                if let Some(active) = snap.active {
                    // Only hard drops and restarts run: a visible piece is always fresh.
                    assert_eq!(active.y, 0, "half-applied hard drop observed");
                }
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    pump.await.unwrap();
    assert_eq!(session.status().state, RunState::Playing);
}
