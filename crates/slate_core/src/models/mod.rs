pub mod box_score;
pub mod lineup;
pub mod player;

pub use box_score::{BatterRow, FailedRun, PitcherRow, SlateResults};
pub use lineup::{Matchup, TeamSheet, TeamSide, LINEUP_SIZE};
pub use player::{BatterRecord, PitchContext, PitcherRecord, PlayerKey, RateLine};
