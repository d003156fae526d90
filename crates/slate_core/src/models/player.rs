//! Player projection records.
//!
//! A `BatterRecord` carries two per-game rate profiles: one against the
//! opposing starting pitcher and one against the bullpen. The split exists
//! because the simulation swaps outcome distributions the moment the starter
//! is pulled. Records are built once per slate by the caller (projection
//! ingestion is not this crate's concern) and are read-only during
//! simulation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a player: (name, position, team).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub name: String,
    pub position: String,
    pub team: String,
}

impl PlayerKey {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), position: position.into(), team: team.into() }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.position, self.team)
    }
}

/// Which rate profile applies to a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchContext {
    VsStarter,
    VsReliever,
}

/// Per-game expected counts for a batter against one pitcher class.
///
/// These are expectations, not probabilities; the outcome model normalizes
/// the seven plate-appearance weights on every draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLine {
    pub pa: f64,
    pub singles: f64,
    pub doubles: f64,
    pub triples: f64,
    pub home_runs: f64,
    pub walks: f64,
    pub hbp: f64,
    pub strikeouts: f64,
    pub steals: f64,
    pub caught_stealing: f64,
    pub outs: f64,
}

impl RateLine {
    /// Weights for the seven plate-appearance outcomes, in sampling order.
    pub fn outcome_weights(&self) -> [f64; 7] {
        [
            self.singles,
            self.doubles,
            self.triples,
            self.home_runs,
            self.walks,
            self.hbp,
            self.outs,
        ]
    }

    /// Share of outs that are strikeouts. Clamped to 1.0; a line with no
    /// projected outs classifies every out as a strikeout.
    pub fn strikeout_share(&self) -> f64 {
        if self.outs <= 0.0 {
            1.0
        } else {
            (self.strikeouts / self.outs).min(1.0)
        }
    }

    /// Base-running attempt rate: career steal attempts per time on first.
    /// `multiplier` is the situational scaling factor (0.7 for straight
    /// steals, 1.2 for stretching on a hit).
    pub fn advance_attempt_ratio(&self, multiplier: f64) -> f64 {
        let denom = self.singles + self.walks + self.hbp;
        if denom > 0.0 {
            (self.steals + self.caught_stealing) / denom * multiplier
        } else {
            0.0
        }
    }

    /// Success rate of an advancement attempt. `multiplier` is 1.0 for
    /// straight steals and 1.3 when the defense is busy with the batted ball.
    pub fn advance_success_ratio(&self, multiplier: f64) -> f64 {
        let denom = self.steals + self.caught_stealing;
        if denom > 0.0 {
            self.steals * multiplier / denom
        } else {
            0.0
        }
    }
}

/// A hitter in the slate: identity, lineup slot, pinch-hit exposure, and the
/// two rate profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatterRecord {
    pub key: PlayerKey,
    /// 1-based batting order slot.
    pub order: u8,
    /// Per-plate-appearance chance of being lifted once the bullpen is in.
    #[serde(default)]
    pub pinch_risk: f64,
    pub vs_starter: RateLine,
    pub vs_reliever: RateLine,
}

/// A starting pitcher: projected and maximum pitch counts drive the hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherRecord {
    pub key: PlayerKey,
    pub projected_pitches: f64,
    pub max_pitches: f64,
}

/// League-average replacement hitter used for every pinch-hit substitution.
/// Values are per-game expectations for a generic bench bat.
pub static REPLACEMENT_RATES: Lazy<RateLine> = Lazy::new(|| RateLine {
    pa: 10.0,
    singles: 1.27,
    doubles: 0.36,
    triples: 0.02,
    home_runs: 0.21,
    walks: 1.16,
    hbp: 0.14,
    strikeouts: 2.99,
    steals: 0.37,
    caught_stealing: 0.087,
    outs: 6.84,
});

impl BatterRecord {
    /// The bench placeholder that takes over a lineup slot on a pinch hit.
    pub fn replacement(team: &str) -> Self {
        Self {
            key: PlayerKey::new("ph", "ph", team),
            order: 0,
            pinch_risk: 0.0,
            vs_starter: *REPLACEMENT_RATES,
            vs_reliever: *REPLACEMENT_RATES,
        }
    }

    /// Whether this record is the bench placeholder.
    pub fn is_replacement(&self) -> bool {
        self.key.name == "ph"
    }

    pub fn line(&self, context: PitchContext) -> &RateLine {
        match context {
            PitchContext::VsStarter => &self.vs_starter,
            PitchContext::VsReliever => &self.vs_reliever,
        }
    }
}

impl PitcherRecord {
    /// The bullpen aggregate that inherits the game after a pitching change.
    /// It never gets pulled, so the pitch-count fields are unused.
    pub fn bullpen(team: &str) -> Self {
        Self {
            key: PlayerKey::new("bullpen", "bullpen", team),
            projected_pitches: 0.0,
            max_pitches: 0.0,
        }
    }

    pub fn is_bullpen(&self) -> bool {
        self.key.name == "bullpen"
    }
}
