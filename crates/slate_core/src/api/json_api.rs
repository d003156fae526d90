//! JSON front door.
//!
//! String-in, string-out wrapper around the slate simulation for callers
//! that do not link the Rust types directly. The request is schema
//! versioned; the response carries every prop probability plus run
//! accounting.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::player::{BatterRecord, PitcherRecord};
use crate::props::build_props;
use crate::sim::{run_slate, SlateConfig, SlateRecords};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct SlateRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub num_sims: usize,
    pub batters: Vec<BatterRecord>,
    pub pitchers: Vec<PitcherRecord>,
    pub games: Vec<GamePair>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GamePair {
    pub away: String,
    pub home: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlateResponse {
    pub schema_version: u8,
    pub num_sims: usize,
    pub failed_runs: usize,
    pub batter_rows: usize,
    pub pitcher_rows: usize,
    pub props: Vec<PropProbability>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PropProbability {
    pub name: String,
    pub probability: f64,
}

pub fn simulate_slate_json(request: &str) -> Result<String> {
    let request: SlateRequest =
        serde_json::from_str(request).map_err(|e| SimError::InvalidRequest(e.to_string()))?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::InvalidRequest(format!(
            "unsupported schema_version {}, expected {SCHEMA_VERSION}",
            request.schema_version
        )));
    }
    if request.num_sims == 0 {
        return Err(SimError::InvalidRequest("num_sims must be positive".to_string()));
    }

    let records = SlateRecords { batters: request.batters, pitchers: request.pitchers };
    let games: Vec<(String, String)> =
        request.games.into_iter().map(|g| (g.away, g.home)).collect();
    let config = SlateConfig::new(request.num_sims, request.seed);

    let results = run_slate(&records, &games, &config, None)?;
    let store = build_props(&results)?;

    let props = store
        .names()
        .into_iter()
        .map(|name| {
            Ok(PropProbability {
                name: name.to_string(),
                probability: store.probability(name)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let response = SlateResponse {
        schema_version: SCHEMA_VERSION,
        num_sims: results.num_sims,
        failed_runs: results.failed_count(),
        batter_rows: results.batters.len(),
        pitcher_rows: results.pitchers.len(),
        props,
    };
    serde_json::to_string(&response).map_err(|e| SimError::Serialization(e.to_string()))
}
