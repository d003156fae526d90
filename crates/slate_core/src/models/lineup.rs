//! Matchup assembly.
//!
//! A `TeamSheet` is the per-team input to one game: nine batters in order,
//! the starting pitcher, plus the bench placeholder and the bullpen
//! aggregate. A `Matchup` pairs an away and a home sheet. Sheets are built
//! once per slate and shared read-only across simulation runs; each run
//! copies the mutable lineup state it needs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::player::{BatterRecord, PitcherRecord};

pub const LINEUP_SIZE: usize = 9;

/// Which side of a matchup a team occupies. Away bats the top half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    Away,
    Home,
}

impl TeamSide {
    pub fn idx(self) -> usize {
        match self {
            TeamSide::Away => 0,
            TeamSide::Home => 1,
        }
    }

    pub fn other(self) -> TeamSide {
        match self {
            TeamSide::Away => TeamSide::Home,
            TeamSide::Home => TeamSide::Away,
        }
    }

    pub const BOTH: [TeamSide; 2] = [TeamSide::Away, TeamSide::Home];
}

#[derive(Debug, Clone)]
pub struct TeamSheet {
    pub team: String,
    /// Exactly nine batters, sorted by batting order.
    pub batters: Vec<BatterRecord>,
    pub starter: PitcherRecord,
    pub replacement: BatterRecord,
    pub bullpen: PitcherRecord,
}

impl TeamSheet {
    /// Assemble a sheet from slate-wide record pools.
    pub fn build(
        team: &str,
        batters: &[BatterRecord],
        pitchers: &[PitcherRecord],
    ) -> Result<Self> {
        let mut lineup: Vec<BatterRecord> = batters
            .iter()
            .filter(|b| b.key.team == team && !b.is_replacement())
            .cloned()
            .collect();
        lineup.sort_by_key(|b| b.order);
        lineup.truncate(LINEUP_SIZE);

        if lineup.len() != LINEUP_SIZE {
            return Err(SimError::MatchupConfiguration(format!(
                "team {team} has {} batters, need {LINEUP_SIZE}",
                lineup.len()
            )));
        }

        let starter = pitchers
            .iter()
            .find(|p| p.key.team == team && !p.is_bullpen())
            .cloned()
            .ok_or_else(|| {
                SimError::MatchupConfiguration(format!("team {team} has no starting pitcher"))
            })?;

        Ok(Self {
            team: team.to_string(),
            batters: lineup,
            starter,
            replacement: BatterRecord::replacement(team),
            bullpen: PitcherRecord::bullpen(team),
        })
    }
}

/// One scheduled game: away team sheet and home team sheet.
#[derive(Debug, Clone)]
pub struct Matchup {
    pub away: TeamSheet,
    pub home: TeamSheet,
}

impl Matchup {
    pub fn build(
        away_team: &str,
        home_team: &str,
        batters: &[BatterRecord],
        pitchers: &[PitcherRecord],
    ) -> Result<Self> {
        if away_team.is_empty() || home_team.is_empty() || away_team == home_team {
            return Err(SimError::MatchupConfiguration(format!(
                "unable to determine home and away teams ({away_team:?} at {home_team:?})"
            )));
        }
        Ok(Self {
            away: TeamSheet::build(away_team, batters, pitchers)?,
            home: TeamSheet::build(home_team, batters, pitchers)?,
        })
    }

    pub fn side(&self, side: TeamSide) -> &TeamSheet {
        match side {
            TeamSide::Away => &self.away,
            TeamSide::Home => &self.home,
        }
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        &self.side(side).team
    }
}
