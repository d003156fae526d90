//! Per-run box score rows.
//!
//! A row is the flattened, derived-stat-enriched snapshot of one player's
//! ledger for one simulation run. Rows are immutable once produced; the
//! prop catalog consumes them by `sim_no`.

use serde::{Deserialize, Serialize};

/// One batter's line for one simulated game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatterRow {
    pub player: String,
    pub team: String,
    pub opp: String,
    pub pos: String,
    pub sim_no: usize,

    pub plate_appearances: u32,
    pub hits: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub total_bases: u32,
    pub runs: u32,
    pub rbi: u32,
    pub hits_runs_rbis: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub hbp: u32,
    pub fantasy_points: u32,

    pub first_inning_hits: u32,
    pub first_inning_runs: u32,
    pub first_inning_hrr: u32,
    pub first_three_hits: u32,
    pub first_three_runs: u32,
    pub first_three_hrr: u32,

    pub first_hit: u32,
    pub first_rbi: u32,
    pub first_run: u32,
    pub first_home_run: u32,
}

/// One starting pitcher's line for one simulated game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitcherRow {
    pub player: String,
    pub team: String,
    pub opp: String,
    pub sim_no: usize,

    pub batters_faced: u32,
    pub outs: u32,
    pub innings_pitched: f64,
    /// `None` when no outs were recorded (undefined ERA).
    pub era: Option<f64>,
    pub win: u32,
    pub quality_start: u32,
    pub runs: u32,
    pub hits: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hbp: u32,
    pub pitches: u32,
    pub fantasy_points: i32,

    pub first_inning_strikeouts: u32,
    pub first_inning_pitches: u32,
    pub first_inning_runs: u32,
    pub first_inning_hits: u32,
    pub first_inning_batters_faced: u32,
    pub first_three_strikeouts: u32,
    pub first_three_pitches: u32,
    pub first_three_runs: u32,
    pub first_three_hits: u32,
    pub first_three_batters_faced: u32,

    pub first_strikeout: u32,
    pub first_run_allowed: u32,
}

/// A run that errored out. Its rows are excluded from the aggregate; sibling
/// runs are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRun {
    pub matchup_index: usize,
    pub away: String,
    pub home: String,
    pub sim_no: usize,
    pub error: String,
}

/// Aggregated output of a full slate simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlateResults {
    pub num_sims: usize,
    pub batters: Vec<BatterRow>,
    pub pitchers: Vec<PitcherRow>,
    pub failed: Vec<FailedRun>,
    /// Runs discarded because cancellation was requested before they started.
    pub skipped: usize,
}

impl SlateResults {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
