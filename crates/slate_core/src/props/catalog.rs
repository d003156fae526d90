//! The prop catalog: box-score rows in, named boolean props out.
//!
//! Every player gets a ladder of `{player}_{stat}_{n}_plus` threshold props
//! plus a handful of first-event props. Rows are aligned by `sim_no`; a run
//! with no row for a player (a failed run) contributes a `false` bit, so
//! every prop in the store keeps the configured bit count.

use std::ops::RangeInclusive;

use fxhash::FxHashMap;

use crate::error::Result;
use crate::models::box_score::{BatterRow, PitcherRow, SlateResults};
use crate::props::bitmap::PropBitmap;

/// Prop-name form of a player name: lowercased, spaces to underscores.
pub fn prop_player_name(player: &str) -> String {
    player.to_lowercase().replace(' ', "_")
}

fn add_ladder<T>(
    store: &mut PropBitmap,
    player: &str,
    stat: &str,
    thresholds: RangeInclusive<i64>,
    rows: &[Option<&T>],
    get: impl Fn(&T) -> i64,
) -> Result<()> {
    for threshold in thresholds {
        let name = format!("{player}_{stat}_{threshold}_plus");
        let bits: Vec<bool> = rows
            .iter()
            .map(|row| row.map_or(false, |r| get(r) >= threshold))
            .collect();
        store.add_prop(name, &bits)?;
    }
    Ok(())
}

fn add_flag<T>(
    store: &mut PropBitmap,
    player: &str,
    stat: &str,
    rows: &[Option<&T>],
    get: impl Fn(&T) -> u32,
) -> Result<()> {
    let name = format!("{player}_{stat}");
    let bits: Vec<bool> = rows.iter().map(|row| row.map_or(false, |r| get(r) >= 1)).collect();
    store.add_prop(name, &bits)
}

fn group_by_player<'a, T>(
    rows: &'a [T],
    num_sims: usize,
    player: impl Fn(&T) -> &str,
    sim_no: impl Fn(&T) -> usize,
) -> FxHashMap<String, Vec<Option<&'a T>>> {
    let mut grouped: FxHashMap<String, Vec<Option<&T>>> = FxHashMap::default();
    for row in rows {
        let slot = grouped
            .entry(prop_player_name(player(row)))
            .or_insert_with(|| vec![None; num_sims]);
        let idx = sim_no(row);
        if idx < num_sims {
            slot[idx] = Some(row);
        }
    }
    grouped
}

/// Build the full prop store for a finished slate.
pub fn build_props(results: &SlateResults) -> Result<PropBitmap> {
    let num_sims = results.num_sims;
    let mut store = PropBitmap::new(num_sims);

    let batters = group_by_player(&results.batters, num_sims, |r| r.player.as_str(), |r| r.sim_no);
    for (player, rows) in &batters {
        add_batter_props(&mut store, player, rows)?;
    }

    let pitchers =
        group_by_player(&results.pitchers, num_sims, |r| r.player.as_str(), |r| r.sim_no);
    for (player, rows) in &pitchers {
        add_pitcher_props(&mut store, player, rows)?;
    }

    Ok(store)
}

fn add_batter_props(
    store: &mut PropBitmap,
    player: &str,
    rows: &[Option<&BatterRow>],
) -> Result<()> {
    add_ladder(store, player, "hits", 1..=3, rows, |r| r.hits as i64)?;
    add_ladder(store, player, "singles", 1..=2, rows, |r| r.singles as i64)?;
    add_ladder(store, player, "doubles", 1..=2, rows, |r| r.doubles as i64)?;
    add_ladder(store, player, "home_runs", 1..=2, rows, |r| r.home_runs as i64)?;
    add_ladder(store, player, "rbis", 1..=3, rows, |r| r.rbi as i64)?;
    add_ladder(store, player, "runs", 1..=3, rows, |r| r.runs as i64)?;
    add_ladder(store, player, "total_bases", 1..=8, rows, |r| r.total_bases as i64)?;
    add_ladder(store, player, "batter_strikeouts", 1..=2, rows, |r| r.strikeouts as i64)?;
    add_ladder(store, player, "stolen_bases", 1..=2, rows, |r| r.stolen_bases as i64)?;
    add_ladder(store, player, "hits_runs_rbis", 1..=9, rows, |r| r.hits_runs_rbis as i64)?;
    add_ladder(store, player, "walks", 1..=2, rows, |r| r.walks as i64)?;
    add_ladder(store, player, "fantasy_points", 4..=14, rows, |r| r.fantasy_points as i64)?;

    add_ladder(store, player, "period_1_hits", 1..=2, rows, |r| r.first_inning_hits as i64)?;
    add_ladder(store, player, "period_1_runs", 1..=2, rows, |r| r.first_inning_runs as i64)?;
    add_ladder(store, player, "period_1_hits_runs_rbis", 1..=3, rows, |r| {
        r.first_inning_hrr as i64
    })?;
    add_ladder(store, player, "period_1_2_3_hits_runs_rbis", 1..=3, rows, |r| {
        r.first_three_hrr as i64
    })?;

    add_flag(store, player, "first_hit", rows, |r| r.first_hit)?;
    add_flag(store, player, "first_rbi", rows, |r| r.first_rbi)?;
    add_flag(store, player, "first_run", rows, |r| r.first_run)?;
    add_flag(store, player, "first_home_run", rows, |r| r.first_home_run)?;
    Ok(())
}

fn add_pitcher_props(
    store: &mut PropBitmap,
    player: &str,
    rows: &[Option<&PitcherRow>],
) -> Result<()> {
    add_ladder(store, player, "strikeouts", 2..=10, rows, |r| r.strikeouts as i64)?;
    add_ladder(store, player, "walks_allowed", 1..=5, rows, |r| r.walks as i64)?;
    add_ladder(store, player, "runs_allowed", 1..=7, rows, |r| r.runs as i64)?;
    add_ladder(store, player, "hits_allowed", 3..=9, rows, |r| r.hits as i64)?;
    add_ladder(store, player, "pitch_outs", 12..=21, rows, |r| r.outs as i64)?;
    add_ladder(store, player, "fantasy_points", 18..=40, rows, |r| r.fantasy_points as i64)?;

    add_ladder(store, player, "period_1_strikeouts", 1..=3, rows, |r| {
        r.first_inning_strikeouts as i64
    })?;
    add_ladder(store, player, "period_1_total_runs_allowed", 1..=2, rows, |r| {
        r.first_inning_runs as i64
    })?;
    add_ladder(store, player, "period_1_hits_allowed", 1..=2, rows, |r| {
        r.first_inning_hits as i64
    })?;
    add_ladder(store, player, "period_1_pitch_count", 20..=20, rows, |r| {
        r.first_inning_pitches as i64
    })?;
    add_ladder(store, player, "period_1_batters_faced", 4..=4, rows, |r| {
        r.first_inning_batters_faced as i64
    })?;
    add_ladder(store, player, "period_1_2_3_total_runs_allowed", 1..=4, rows, |r| {
        r.first_three_runs as i64
    })?;

    add_flag(store, player, "first_strikeout", rows, |r| r.first_strikeout)?;
    add_flag(store, player, "first_earned_run", rows, |r| r.first_run_allowed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::box_score::SlateResults;

    fn batter_row(player: &str, sim_no: usize, hits: u32, runs: u32) -> BatterRow {
        BatterRow {
            player: player.to_string(),
            team: "AAA".to_string(),
            opp: "BBB".to_string(),
            pos: "OF".to_string(),
            sim_no,
            hits,
            runs,
            hits_runs_rbis: hits + runs,
            total_bases: hits,
            singles: hits,
            ..Default::default()
        }
    }

    fn pitcher_row(player: &str, sim_no: usize, strikeouts: u32) -> PitcherRow {
        PitcherRow {
            player: player.to_string(),
            team: "BBB".to_string(),
            opp: "AAA".to_string(),
            sim_no,
            strikeouts,
            outs: 18,
            fantasy_points: 20,
            ..Default::default()
        }
    }

    fn results() -> SlateResults {
        SlateResults {
            num_sims: 4,
            batters: vec![
                batter_row("Lead Off", 0, 2, 1),
                batter_row("Lead Off", 1, 0, 0),
                batter_row("Lead Off", 2, 1, 0),
                batter_row("Lead Off", 3, 3, 2),
            ],
            pitchers: vec![
                pitcher_row("Big Arm", 0, 7),
                pitcher_row("Big Arm", 1, 4),
                pitcher_row("Big Arm", 2, 9),
                pitcher_row("Big Arm", 3, 2),
            ],
            failed: Vec::new(),
            skipped: 0,
        }
    }

    #[test]
    fn names_are_normalized() {
        assert_eq!(prop_player_name("Lead Off"), "lead_off");
        assert_eq!(prop_player_name("UPPER case"), "upper_case");
    }

    #[test]
    fn batter_ladders_threshold_correctly() {
        let store = build_props(&results()).unwrap();
        assert!((store.probability("lead_off_hits_1_plus").unwrap() - 0.75).abs() < 1e-12);
        assert!((store.probability("lead_off_hits_2_plus").unwrap() - 0.5).abs() < 1e-12);
        assert!((store.probability("lead_off_hits_3_plus").unwrap() - 0.25).abs() < 1e-12);
        assert!((store.probability("lead_off_runs_1_plus").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pitcher_ladders_threshold_correctly() {
        let store = build_props(&results()).unwrap();
        assert!((store.probability("big_arm_strikeouts_5_plus").unwrap() - 0.5).abs() < 1e-12);
        assert!((store.probability("big_arm_strikeouts_10_plus").unwrap() - 0.0).abs() < 1e-12);
        assert!((store.probability("big_arm_pitch_outs_18_plus").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_runs_read_as_misses() {
        let mut r = results();
        r.batters.remove(1); // run 1 failed for this player
        let store = build_props(&r).unwrap();
        let bits = store.results_for("lead_off_hits_1_plus").unwrap();
        assert_eq!(bits, vec![true, false, true, true]);
    }

    #[test]
    fn joint_queries_work_across_players() {
        let store = build_props(&results()).unwrap();
        // Batter 2+ hits in runs {0, 3}; pitcher 5+ strikeouts in runs {0, 2}.
        let joint = store
            .joint_probability("lead_off_hits_2_plus", "big_arm_strikeouts_5_plus")
            .unwrap();
        assert!((joint - 0.25).abs() < 1e-12);
    }

    #[test]
    fn every_expected_ladder_exists() {
        let store = build_props(&results()).unwrap();
        for name in [
            "lead_off_total_bases_8_plus",
            "lead_off_fantasy_points_4_plus",
            "lead_off_period_1_2_3_hits_runs_rbis_3_plus",
            "lead_off_first_home_run",
            "big_arm_fantasy_points_40_plus",
            "big_arm_period_1_batters_faced_4_plus",
            "big_arm_first_earned_run",
        ] {
            assert!(store.contains(name), "missing {name}");
        }
    }
}
