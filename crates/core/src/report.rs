//! Events the engine hands to its observers.
//!
//! [`RunSummary`] is the payload the external scoring service expects; its
//! field names are fixed. [`RunReport`] wraps it with the extra bookkeeping a
//! persistence sink may want to store.

use serde::{Deserialize, Serialize};

/// Final numbers of a run, in the scoring service's wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub final_level: u32,
    pub lines_cleared: u32,
    pub duration_seconds: u64,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A piece could not be placed at spawn height
    TopOut,
    /// The player abandoned the run (quit or restart mid-run)
    Quit,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::TopOut => "top_out",
            EndReason::Quit => "quit",
        }
    }
}

/// Everything delivered to the persistence sink when a run terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub end_reason: EndReason,
    pub pieces_placed: u32,
    /// Four-line clears
    pub tetrises_cleared: u32,
    pub run_id: u32,
}

/// Emitted after each successful placement (consumed by observers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementEvent {
    pub lines_cleared: u32,
    pub score_gained: u32,
    /// Level after the placement
    pub level: u32,
    pub hard_drop: bool,
}

/// Result of trying to move the active piece one row down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropOutcome {
    /// Nothing happened: no run in progress, or paused
    Idle,
    /// The piece descended one row
    Moved,
    /// The piece was placed and the next one spawned
    Locked,
    /// The run ended
    ToppedOut,
}

impl DropOutcome {
    /// Whether the command changed the game
    pub fn changed(&self) -> bool {
        !matches!(self, DropOutcome::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_service_field_names() {
        let summary = RunSummary {
            score: 1200,
            final_level: 2,
            lines_cleared: 14,
            duration_seconds: 95,
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "score": 1200,
                "final_level": 2,
                "lines_cleared": 14,
                "duration_seconds": 95
            })
        );
    }

    #[test]
    fn report_flattens_summary() {
        let report = RunReport {
            summary: RunSummary {
                score: 300,
                final_level: 1,
                lines_cleared: 2,
                duration_seconds: 12,
            },
            end_reason: EndReason::TopOut,
            pieces_placed: 17,
            tetrises_cleared: 0,
            run_id: 3,
        };
        let text = serde_json::to_string(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["score"], 300);
        assert_eq!(value["final_level"], 1);
        assert_eq!(value["end_reason"], "top_out");
        assert_eq!(value["pieces_placed"], 17);

        let back: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}
