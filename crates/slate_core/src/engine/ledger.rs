//! Per-run counting stats.
//!
//! One ledger per simulation run, indexed by roster handle. The game loop is
//! the only writer; at run end the ledger is folded into box-score rows.

use crate::engine::roster::{BatterId, PitcherId};

/// Which early-game buckets a moment falls into. The first-inning window
/// closes after the bottom of the first, the three-inning window after the
/// bottom of the third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InningScope {
    First,
    EarlyThree,
    Late,
}

impl InningScope {
    pub fn covers_first(self) -> bool {
        matches!(self, InningScope::First)
    }

    pub fn covers_first_three(self) -> bool {
        matches!(self, InningScope::First | InningScope::EarlyThree)
    }
}

/// Game-scoped "first occurrence" flags. Each trips once per game, for
/// either team.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFlags {
    pub hit: bool,
    pub run: bool,
    pub rbi: bool,
    pub home_run: bool,
    pub strikeout: bool,
    pub run_allowed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatterStats {
    pub plate_appearances: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hbp: u32,
    pub runs: u32,
    pub rbi: u32,

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

impl BatterStats {
    pub fn hits(&self) -> u32 {
        self.singles + self.doubles + self.triples + self.home_runs
    }

    pub fn total_bases(&self) -> u32 {
        self.singles + 2 * self.doubles + 3 * self.triples + 4 * self.home_runs
    }

    pub fn fantasy_points(&self) -> u32 {
        3 * self.singles
            + 6 * self.doubles
            + 8 * self.triples
            + 10 * self.home_runs
            + 2 * self.runs
            + 2 * self.rbi
            + 3 * self.walks
            + 3 * self.hbp
            + 4 * self.stolen_bases
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PitcherStats {
    pub batters_faced: u32,
    pub outs: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hbp: u32,
    pub runs: u32,
    pub pitches: u32,
    pub in_line_for_win: bool,

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

impl PitcherStats {
    pub fn hits(&self) -> u32 {
        self.singles + self.doubles + self.triples + self.home_runs
    }

    pub fn innings_pitched(&self) -> f64 {
        self.outs as f64 / 3.0
    }

    /// Quality start: at least six full innings with three runs or fewer.
    pub fn quality_start(&self) -> bool {
        self.outs >= 18 && self.runs <= 3
    }

    pub fn era(&self) -> Option<f64> {
        if self.outs == 0 {
            None
        } else {
            Some(9.0 * self.runs as f64 / self.innings_pitched())
        }
    }

    pub fn fantasy_points(&self, win: bool) -> i32 {
        let win = if win { 1 } else { 0 };
        let qs = if self.quality_start() { 1 } else { 0 };
        5 * win + 5 * qs + 3 * self.strikeouts as i32 + self.outs as i32 - 3 * self.runs as i32
    }
}

/// All counting stats for one run.
#[derive(Debug, Clone)]
pub struct StatLedger {
    batters: Vec<BatterStats>,
    pitchers: Vec<PitcherStats>,
}

impl StatLedger {
    pub fn new(batter_slots: usize, pitcher_slots: usize) -> Self {
        Self {
            batters: vec![BatterStats::default(); batter_slots],
            pitchers: vec![PitcherStats::default(); pitcher_slots],
        }
    }

    pub fn batter(&self, id: BatterId) -> &BatterStats {
        &self.batters[id.0]
    }

    pub fn batter_mut(&mut self, id: BatterId) -> &mut BatterStats {
        &mut self.batters[id.0]
    }

    pub fn pitcher(&self, id: PitcherId) -> &PitcherStats {
        &self.pitchers[id.0]
    }

    pub fn pitcher_mut(&mut self, id: PitcherId) -> &mut PitcherStats {
        &mut self.pitchers[id.0]
    }

    pub fn batter_entries(&self) -> impl Iterator<Item = (BatterId, &BatterStats)> {
        self.batters.iter().enumerate().map(|(i, s)| (BatterId(i), s))
    }

    pub fn pitcher_entries(&self) -> impl Iterator<Item = (PitcherId, &PitcherStats)> {
        self.pitchers.iter().enumerate().map(|(i, s)| (PitcherId(i), s))
    }
}
