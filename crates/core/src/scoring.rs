//! Scoring module - line-clear scoring, leveling and the gravity curve
//!
//! Both the score formula and the drop-speed curve are policies behind small
//! traits, bundled in [`Rules`]. The defaults are:
//! - [`LevelMultiplied`]: `LINE_SCORES[lines] * level`
//! - [`NesDropCurve`]: NES-style lookup table, clamped at [`MIN_DROP_INTERVAL_MS`]
//!
//! Levels start at 1 and advance every [`LINES_PER_LEVEL`] lines.

use std::fmt;
use std::sync::Arc;

use crate::types::{DROP_TABLE, LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_INTERVAL_MS};

/// Points awarded for a single placement
pub trait ScoringPolicy: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Score for clearing `lines` rows with one piece at `level`
    fn placement_score(&self, lines: usize, level: u32) -> u32;
}

/// Gravity speed as a function of level
///
/// Implementations must be non-increasing in `level` and never return less
/// than [`MIN_DROP_INTERVAL_MS`].
pub trait DropCurve: Send + Sync {
    fn name(&self) -> &'static str;

    /// Milliseconds between gravity ticks at `level`
    fn interval_ms(&self, level: u32) -> u32;
}

/// Base line-clear points scaled by the current level
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelMultiplied;

impl ScoringPolicy for LevelMultiplied {
    fn name(&self) -> &'static str {
        "level_multiplied"
    }

    fn placement_score(&self, lines: usize, level: u32) -> u32 {
        calculate_line_score(lines, level)
    }
}

/// NES-style gravity lookup table
#[derive(Debug, Clone, Copy, Default)]
pub struct NesDropCurve;

impl DropCurve for NesDropCurve {
    fn name(&self) -> &'static str {
        "nes_table"
    }

    fn interval_ms(&self, level: u32) -> u32 {
        get_drop_interval_ms(level)
    }
}

/// The swappable rule set a run is played under
#[derive(Clone)]
pub struct Rules {
    pub scoring: Arc<dyn ScoringPolicy>,
    pub gravity: Arc<dyn DropCurve>,
}

impl Rules {
    pub fn new(scoring: Arc<dyn ScoringPolicy>, gravity: Arc<dyn DropCurve>) -> Self {
        Self { scoring, gravity }
    }

    /// Drop interval for `level` with the floor applied, whatever the curve returns
    pub fn drop_interval_ms(&self, level: u32) -> u32 {
        self.gravity.interval_ms(level).max(MIN_DROP_INTERVAL_MS)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(Arc::new(LevelMultiplied), Arc::new(NesDropCurve))
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("scoring", &self.scoring.name())
            .field("gravity", &self.gravity.name())
            .finish()
    }
}

/// Calculate line clear score
/// lines: number of lines cleared (0-4)
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines > 4 {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Level management
/// Level starts at 1 and increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Get drop interval for a level (in milliseconds)
/// Returns the table entry for the level, clamped at the minimum
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let mut interval = DROP_TABLE[0].1;
    for &(first_level, ms) in DROP_TABLE.iter() {
        if level >= first_level {
            interval = ms;
        } else {
            break;
        }
    }
    interval.max(MIN_DROP_INTERVAL_MS)
}
