//! End-to-end slate pipeline: records in, box rows and prop bitmaps out.

use slate_core::{
    run_slate_with_props, BatterRecord, PitcherRecord, PlayerKey, RateLine, SlateConfig,
    SlateRecords,
};

fn rate_line() -> RateLine {
    RateLine {
        pa: 4.3,
        singles: 1.0,
        doubles: 0.3,
        triples: 0.04,
        home_runs: 0.2,
        walks: 0.5,
        hbp: 0.05,
        strikeouts: 1.1,
        steals: 0.1,
        caught_stealing: 0.03,
        outs: 2.7,
    }
}

fn records() -> SlateRecords {
    let mut out = SlateRecords::default();
    for team in ["NYA", "BOS"] {
        for i in 1..=9u8 {
            out.batters.push(BatterRecord {
                key: PlayerKey::new(format!("{team} hitter {i}"), "OF", team),
                order: i,
                pinch_risk: 0.01,
                vs_starter: rate_line(),
                vs_reliever: rate_line(),
            });
        }
        out.pitchers.push(PitcherRecord {
            key: PlayerKey::new(format!("{team} starter"), "P", team),
            projected_pitches: 92.0,
            max_pitches: 108.0,
        });
    }
    out
}

#[test]
fn full_pipeline_produces_consistent_props() {
    let records = records();
    let games = vec![("NYA".to_string(), "BOS".to_string())];
    let config = SlateConfig::new(300, 2024);

    let (results, store) = run_slate_with_props(&records, &games, &config, None).unwrap();

    assert!(results.failed.is_empty());
    assert_eq!(store.num_sims(), 300);
    assert!(!store.is_empty());

    // probability() is idempotent on an unmodified store.
    let name = "nya_hitter_1_hits_1_plus";
    assert!(store.contains(name));
    assert_eq!(store.probability(name).unwrap(), store.probability(name).unwrap());

    // A prop against itself: joint equals the marginal, correlation is 1
    // whenever the marginal has variance.
    let p = store.probability(name).unwrap();
    assert_eq!(store.joint_probability(name, name).unwrap(), p);
    if p > 0.0 && p < 1.0 {
        assert!((store.correlation(name, name).unwrap() - 1.0).abs() < 1e-9);
    }

    // Threshold ladders are monotonically non-increasing.
    for player in ["nya_hitter_1", "bos_hitter_5"] {
        let ladder: Vec<f64> = (1..=3)
            .map(|t| store.probability(&format!("{player}_hits_{t}_plus")).unwrap())
            .collect();
        assert!(ladder[0] >= ladder[1] && ladder[1] >= ladder[2], "{ladder:?}");
    }

    // The stored vectors keep the configured run count.
    assert_eq!(store.results_for(name).unwrap().len(), 300);

    // Joint probability never exceeds either marginal.
    let a = "nya_hitter_1_hits_1_plus";
    let b = "bos_starter_strikeouts_5_plus";
    let joint = store.joint_probability(a, b).unwrap();
    assert!(joint <= store.probability(a).unwrap() + 1e-12);
    assert!(joint <= store.probability(b).unwrap() + 1e-12);
    assert!((-1.0..=1.0).contains(&store.correlation(a, b).unwrap()));
}

#[test]
fn per_run_rows_reconcile_with_first_event_props() {
    let records = records();
    let games = vec![("NYA".to_string(), "BOS".to_string())];
    let config = SlateConfig::new(120, 5);

    let (results, store) = run_slate_with_props(&records, &games, &config, None).unwrap();

    // At most one batter per run records the game's first hit.
    for sim_no in 0..120 {
        let firsts: u32 = results
            .batters
            .iter()
            .filter(|r| r.sim_no == sim_no)
            .map(|r| r.first_hit)
            .sum();
        assert!(firsts <= 1, "run {sim_no} has {firsts} first-hit credits");
    }

    // The first-hit props across all batters are disjoint events, so their
    // probabilities sum to at most 1.
    let total: f64 = results
        .batters
        .iter()
        .map(|r| slate_core::props::prop_player_name(&r.player))
        .collect::<std::collections::BTreeSet<_>>()
        .iter()
        .map(|p| store.probability(&format!("{p}_first_hit")).unwrap())
        .sum();
    assert!(total <= 1.0 + 1e-9, "first-hit props sum to {total}");
}

#[test]
fn pitcher_outs_never_exceed_legal_game_length() {
    let records = records();
    let games = vec![("NYA".to_string(), "BOS".to_string())];
    let config = SlateConfig::new(150, 77);

    let (results, _) = run_slate_with_props(&records, &games, &config, None).unwrap();
    for row in &results.pitchers {
        // A starter can never record more outs than a full regulation game
        // plus a generous extra-innings allowance.
        assert!(row.outs <= 27, "{} recorded {} outs", row.player, row.outs);
        assert!((row.innings_pitched - row.outs as f64 / 3.0).abs() < 1e-9);
        if row.outs == 0 {
            assert!(row.era.is_none());
        }
        if row.quality_start == 1 {
            assert!(row.outs >= 18 && row.runs <= 3);
        }
    }
}
