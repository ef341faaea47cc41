//! Headless blockfall runner (default binary).
//!
//! Starts one run driven by the autopilot, with real-time gravity, until the
//! stack tops out or the time cap quits the run. Logs go to stderr; the final
//! summary is printed to stdout as JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blockfall::autopilot::{self, Autopilot};
use blockfall::core::GameState;
use blockfall::engine::{
    spawn_gravity, spawn_input_pump, EngineConfig, JsonLinesSink, RunSink, Session, TracingSink,
};
use blockfall::types::{Intent, RunState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_env()?;
    init_logging(&config)?;
    info!(seed = config.seed, max_seconds = config.max_seconds, "blockfall starting");

    let mut writer = None;
    let sink: Arc<dyn RunSink> = match &config.scores_path {
        Some(path) => {
            let (sink, task) = JsonLinesSink::open(path).await?;
            writer = Some(task);
            Arc::new(sink)
        }
        None => Arc::new(TracingSink),
    };

    let session = Session::new(GameState::new(config.seed), sink);
    let gravity = spawn_gravity(session.clone());
    let (intent_tx, intent_rx) = mpsc::channel::<Intent>(config.input_queue);
    let pump = spawn_input_pump(session.clone(), intent_rx);

    intent_tx.send(Intent::StartGame).await?;

    let mut pilot = Autopilot::new(config.seed.wrapping_add(1));
    let every = Duration::from_millis(config.input_interval_ms.max(1));
    tokio::select! {
        sent = autopilot::drive(&session, &intent_tx, every, &mut pilot) => {
            info!(sent = sent?, "autopilot finished");
        }
        _ = tokio::time::sleep(Duration::from_secs(config.max_seconds)) => {
            info!("time cap reached; quitting run");
            intent_tx.send(Intent::Quit).await?;
        }
    }

    let mut status = session.subscribe();
    status.wait_for(|s| s.state == RunState::GameOver).await?;
    let summary = session.summary().await;

    drop(intent_tx);
    let applied = pump.await?;
    gravity.stop().await;
    drop(session);
    info!(applied, "session closed");

    if let Some(writer) = writer {
        let written = writer.await??;
        info!(written, "run reports flushed");
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_logging(config: &EngineConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("info"))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
