//! # slate_core - Monte Carlo Baseball Slate Simulation Engine
//!
//! Projects probability distributions for baseball player props by playing
//! out full games one plate appearance at a time, thousands of times per
//! matchup, and packing the per-run outcomes into compressed bitmaps for
//! cheap probability, joint-probability, and correlation queries.
//!
//! ## Features
//! - Sequential per-game state machine: hits, walks, base-running
//!   advancement tables, steals, pitcher fatigue and substitution
//! - Embarrassingly parallel runs (rayon), each with its own ChaCha stream
//! - Bit-per-run prop storage with LZ4 compression and AND-based joint
//!   queries
//! - JSON API for callers that do not link the Rust types

// Game-state plumbing passes several identities per call.
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod props;
pub mod sim;

pub use api::{simulate_slate_json, SlateRequest, SlateResponse};
pub use engine::{GameOutput, GameSim, GameSummary, Outcome};
pub use error::{Result, SimError};
pub use models::{
    BatterRecord, BatterRow, FailedRun, Matchup, PitchContext, PitcherRecord, PitcherRow,
    PlayerKey, RateLine, SlateResults, TeamSheet, TeamSide,
};
pub use props::{build_props, PropBitmap, PropBufferExport};
pub use sim::{run_slate, run_slate_with_props, SlateConfig, SlateRecords};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
