//! Destinations for end-of-run reports.
//!
//! A sink is called once per finished run, after the session lock has been
//! released. Implementations must return quickly: anything slow (files,
//! network) belongs on a background task fed by a channel.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use blockfall_core::RunReport;

/// Receives the report of every run that ends.
///
/// Calls happen outside the session lock, so reports of runs ending at
/// nearly the same moment may arrive out of `run_id` order. Use
/// [`RunReport::run_id`] when order matters.
pub trait RunSink: Send + Sync {
    fn run_ended(&self, report: &RunReport);
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write report: {0}")]
    Write(#[from] io::Error),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Logs each report; the default when no scores file is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl RunSink for TracingSink {
    fn run_ended(&self, report: &RunReport) {
        info!(
            run_id = report.run_id,
            reason = report.end_reason.as_str(),
            score = report.summary.score,
            final_level = report.summary.final_level,
            lines_cleared = report.summary.lines_cleared,
            duration_seconds = report.summary.duration_seconds,
            pieces_placed = report.pieces_placed,
            tetrises_cleared = report.tetrises_cleared,
            "run report"
        );
    }
}

/// Forwards reports to the host over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RunReport>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RunSink for ChannelSink {
    fn run_ended(&self, report: &RunReport) {
        if self.tx.send(*report).is_err() {
            debug!(run_id = report.run_id, "report receiver gone; dropping report");
        }
    }
}

/// Appends one JSON object per report to a file.
///
/// Writes happen on a background task; it finishes (and flushes) once every
/// clone of the sink has been dropped.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    tx: mpsc::UnboundedSender<RunReport>,
}

impl JsonLinesSink {
    /// Open (or create) `path` for appending and start the writer task
    pub async fn open(
        path: impl AsRef<Path>,
    ) -> Result<(Self, JoinHandle<Result<u64, SinkError>>), SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::unbounded_channel::<RunReport>();
        info!(path = %path.display(), "writing run reports");
        let writer = tokio::spawn(write_reports(file, rx));
        Ok((Self { tx }, writer))
    }
}

impl RunSink for JsonLinesSink {
    fn run_ended(&self, report: &RunReport) {
        if self.tx.send(*report).is_err() {
            warn!(run_id = report.run_id, "report writer stopped; dropping report");
        }
    }
}

/// Drain reports into `file` until the channel closes; returns the count written
async fn write_reports(
    mut file: tokio::fs::File,
    mut rx: mpsc::UnboundedReceiver<RunReport>,
) -> Result<u64, SinkError> {
    let mut buf: Vec<u8> = Vec::with_capacity(256);
    let mut written = 0u64;

    while let Some(report) = rx.recv().await {
        buf.clear();
        serde_json::to_writer(&mut buf, &report)?;
        buf.push(b'\n');
        if let Err(e) = file.write_all(&buf).await {
            warn!(error = %e, "failed to append run report");
            return Err(e.into());
        }
        written += 1;
    }

    file.flush().await?;
    debug!(written, "report writer finished");
    Ok(written)
}
