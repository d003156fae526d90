//! The simulation engine: outcome model, base-running rules, pitcher
//! management, and the per-game state machine that ties them together.

pub mod baserunning;
pub mod game;
pub mod ledger;
pub mod outcome;
pub mod pitching;
pub mod roster;

pub use baserunning::{Advance, Bases, RunCredit, StealResult};
pub use game::{GameOutput, GameSim, GameSummary};
pub use ledger::{BatterStats, FirstFlags, InningScope, PitcherStats, StatLedger};
pub use outcome::{pitches_thrown, sample_outcome, Outcome, PitchClass};
pub use roster::{BatterId, GameRoster, PitcherId};
