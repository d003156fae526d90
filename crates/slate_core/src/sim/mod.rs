//! Slate orchestration.
//!
//! Runs `num_sims` independent games per scheduled matchup across the rayon
//! worker pool. Every run owns its seed, game state, and ledger; workers
//! accumulate rows in local buffers that are merged once at the end, so no
//! shared structure is mutated mid-flight. Run identity travels in the
//! `sim_no` field of each row, not in result ordering.
//!
//! A failing run is recorded and its rows dropped; sibling runs are
//! unaffected. Cancellation is cooperative: in-flight runs finish, runs
//! that have not started are counted as skipped.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use rayon::prelude::*;

use crate::engine::game::GameSim;
use crate::error::Result;
use crate::models::box_score::{BatterRow, FailedRun, PitcherRow, SlateResults};
use crate::models::lineup::Matchup;
use crate::models::player::{BatterRecord, PitcherRecord};

#[derive(Debug, Clone)]
pub struct SlateConfig {
    pub num_sims: usize,
    pub base_seed: u64,
}

impl SlateConfig {
    pub fn new(num_sims: usize, base_seed: u64) -> Self {
        Self { num_sims, base_seed }
    }
}

/// The slate-wide projection pools handed over by the ingestion collaborator.
#[derive(Debug, Clone, Default)]
pub struct SlateRecords {
    pub batters: Vec<BatterRecord>,
    pub pitchers: Vec<PitcherRecord>,
}

/// Resolve every scheduled pairing into a `Matchup` before any run starts.
/// Configuration problems are fatal here, not mid-slate.
pub fn build_matchups(records: &SlateRecords, games: &[(String, String)]) -> Result<Vec<Matchup>> {
    games
        .iter()
        .map(|(away, home)| Matchup::build(away, home, &records.batters, &records.pitchers))
        .collect()
}

/// Per-run seed: every (matchup, run) pair gets its own independent stream,
/// reproducible for a fixed base seed.
fn run_seed(base: u64, matchup: usize, sim_no: usize) -> u64 {
    let mut z = base
        .wrapping_add((matchup as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add((sim_no as u64 + 1).wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Default)]
struct WorkerBuffer {
    batters: Vec<BatterRow>,
    pitchers: Vec<PitcherRow>,
    failed: Vec<FailedRun>,
    skipped: usize,
}

impl WorkerBuffer {
    fn merge(mut self, other: WorkerBuffer) -> WorkerBuffer {
        self.batters.extend(other.batters);
        self.pitchers.extend(other.pitchers);
        self.failed.extend(other.failed);
        self.skipped += other.skipped;
        self
    }
}

/// Run the whole slate.
pub fn run_slate(
    records: &SlateRecords,
    games: &[(String, String)],
    config: &SlateConfig,
    cancel: Option<&AtomicBool>,
) -> Result<SlateResults> {
    let matchups = build_matchups(records, games)?;
    info!(
        "simulating {} matchup(s) x {} run(s), base seed {}",
        matchups.len(),
        config.num_sims,
        config.base_seed
    );

    let tasks: Vec<(usize, usize)> = (0..matchups.len())
        .flat_map(|m| (0..config.num_sims).map(move |s| (m, s)))
        .collect();

    let merged = tasks
        .par_iter()
        .fold(WorkerBuffer::default, |mut buf, &(m, sim_no)| {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                buf.skipped += 1;
                return buf;
            }
            let seed = run_seed(config.base_seed, m, sim_no);
            match GameSim::seeded(&matchups[m], seed).play(sim_no) {
                Ok(output) => {
                    buf.batters.extend(output.batters);
                    buf.pitchers.extend(output.pitchers);
                }
                Err(err) => buf.failed.push(FailedRun {
                    matchup_index: m,
                    away: matchups[m].away.team.clone(),
                    home: matchups[m].home.team.clone(),
                    sim_no,
                    error: err.to_string(),
                }),
            }
            buf
        })
        .reduce(WorkerBuffer::default, WorkerBuffer::merge);

    if !merged.failed.is_empty() {
        warn!("{} run(s) failed and were excluded", merged.failed.len());
    }
    if merged.skipped > 0 {
        info!("{} run(s) skipped after cancellation", merged.skipped);
    }

    Ok(SlateResults {
        num_sims: config.num_sims,
        batters: merged.batters,
        pitchers: merged.pitchers,
        failed: merged.failed,
        skipped: merged.skipped,
    })
}

/// Run the slate and populate the prop store from the surviving rows. The
/// store is built strictly after all runs complete.
pub fn run_slate_with_props(
    records: &SlateRecords,
    games: &[(String, String)],
    config: &SlateConfig,
    cancel: Option<&AtomicBool>,
) -> Result<(SlateResults, crate::props::PropBitmap)> {
    let results = run_slate(records, games, config, cancel)?;
    let props = crate::props::build_props(&results)?;
    Ok((results, props))
}
