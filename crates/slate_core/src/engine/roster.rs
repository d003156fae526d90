//! Per-game roster indexing.
//!
//! Simulation runs address players through dense indices instead of cloning
//! `(name, position, team)` keys on every base-running shuffle. The roster
//! is fixed for the whole game: nine lineup batters per side, one bench
//! placeholder per side, and starter plus bullpen per side.

use crate::models::lineup::{Matchup, TeamSide, LINEUP_SIZE};
use crate::models::player::{BatterRecord, PitchContext, PitcherRecord, RateLine};

/// Handle for a batter slot in the game roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatterId(pub usize);

/// Handle for a pitcher slot in the game roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitcherId(pub usize);

/// Batter slots: away lineup 0..9, home lineup 9..18, then the two bench
/// placeholders. Pitcher slots: away starter, home starter, away bullpen,
/// home bullpen.
pub struct GameRoster<'a> {
    batters: Vec<&'a BatterRecord>,
    pitchers: Vec<&'a PitcherRecord>,
}

impl<'a> GameRoster<'a> {
    pub fn new(matchup: &'a Matchup) -> Self {
        let mut batters: Vec<&BatterRecord> = Vec::with_capacity(LINEUP_SIZE * 2 + 2);
        for side in TeamSide::BOTH {
            batters.extend(matchup.side(side).batters.iter());
        }
        for side in TeamSide::BOTH {
            batters.push(&matchup.side(side).replacement);
        }

        let mut pitchers: Vec<&PitcherRecord> = Vec::with_capacity(4);
        for side in TeamSide::BOTH {
            pitchers.push(&matchup.side(side).starter);
        }
        for side in TeamSide::BOTH {
            pitchers.push(&matchup.side(side).bullpen);
        }

        Self { batters, pitchers }
    }

    pub fn batter(&self, id: BatterId) -> &'a BatterRecord {
        self.batters[id.0]
    }

    pub fn pitcher(&self, id: PitcherId) -> &'a PitcherRecord {
        self.pitchers[id.0]
    }

    pub fn batter_count(&self) -> usize {
        self.batters.len()
    }

    pub fn pitcher_count(&self) -> usize {
        self.pitchers.len()
    }

    pub fn line(&self, id: BatterId, context: PitchContext) -> &'a RateLine {
        self.batter(id).line(context)
    }

    /// The nine lineup slots a side starts the game with.
    pub fn starting_lineup(&self, side: TeamSide) -> [BatterId; LINEUP_SIZE] {
        let base = side.idx() * LINEUP_SIZE;
        std::array::from_fn(|i| BatterId(base + i))
    }

    pub fn replacement(&self, side: TeamSide) -> BatterId {
        BatterId(LINEUP_SIZE * 2 + side.idx())
    }

    pub fn starter(&self, side: TeamSide) -> PitcherId {
        PitcherId(side.idx())
    }

    pub fn bullpen(&self, side: TeamSide) -> PitcherId {
        PitcherId(2 + side.idx())
    }

    /// Which side a batter slot belongs to.
    pub fn batter_side(&self, id: BatterId) -> TeamSide {
        if id.0 < LINEUP_SIZE || id.0 == LINEUP_SIZE * 2 {
            TeamSide::Away
        } else {
            TeamSide::Home
        }
    }

    /// Which side a pitcher slot belongs to.
    pub fn pitcher_side(&self, id: PitcherId) -> TeamSide {
        if id.0 % 2 == 0 {
            TeamSide::Away
        } else {
            TeamSide::Home
        }
    }
}
