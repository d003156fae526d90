//! Base-running resolution.
//!
//! Pure play-resolution functions: each takes the current base/out state and
//! returns the next state plus the runs scored on the play, without touching
//! the stat ledger. The game loop applies the credits.
//!
//! Two situational sub-decisions use the runner's own rates:
//! - straight steal of the next base (attempt ×0.7, success ×1.0),
//! - stretching for an extra base on a hit (attempt ×1.2, success ×1.3).
//!
//! Ball-in-play outs with runners aboard resolve through a fixed band table
//! per occupied-base pattern. Bands are strict `<` comparisons evaluated in
//! listed order, so a draw on a boundary always falls in the lower band.
//! Outs are capped at three; a run that would score after the third out of a
//! double play is suppressed.

use rand::Rng;

use crate::engine::roster::BatterId;
use crate::models::player::RateLine;

/// The three base slots, first to third.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bases(pub [Option<BatterId>; 3]);

impl Bases {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<BatterId> {
        self.0[0]
    }

    pub fn second(&self) -> Option<BatterId> {
        self.0[1]
    }

    pub fn third(&self) -> Option<BatterId> {
        self.0[2]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// The runner closest to home, with his slot index (0 = first).
    pub fn lead_runner(&self) -> Option<(usize, BatterId)> {
        (0..3).rev().find_map(|i| self.0[i].map(|r| (i, r)))
    }

    pub fn runners(&self) -> impl Iterator<Item = BatterId> + '_ {
        self.0.iter().flatten().copied()
    }
}

/// A run scored during one play. `rbi` is false for runs that score on a
/// double play, which credit no one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCredit {
    pub runner: BatterId,
    pub rbi: bool,
}

/// Result of resolving one play: next base state, total outs afterward, and
/// the runs scored in plate-crossing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub bases: Bases,
    pub outs: u8,
    pub runs: Vec<RunCredit>,
}

impl Advance {
    fn hold(bases: Bases, outs: u8) -> Self {
        Self { bases, outs, runs: Vec::new() }
    }
}

/// Outcome of an extra-base attempt by a trailing runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stretch {
    Hold,
    Take,
    ThrownOut,
}

fn stretch_decision(line: &RateLine, rng: &mut impl Rng) -> Stretch {
    if rng.gen::<f64>() < line.advance_attempt_ratio(1.2) {
        if rng.gen::<f64>() < line.advance_success_ratio(1.3) {
            Stretch::Take
        } else {
            Stretch::ThrownOut
        }
    } else {
        Stretch::Hold
    }
}

/// Walk or hit-by-pitch: advancement only where forced. The runner on third
/// scores only with the bases loaded.
pub fn resolve_walk(bases: Bases, outs: u8, batter: BatterId) -> Advance {
    let mut next = bases;
    let mut runs = Vec::new();
    if bases.first().is_some() {
        if bases.second().is_some() {
            if let Some(runner) = bases.third() {
                runs.push(RunCredit { runner, rbi: true });
            }
            next.0[2] = bases.second();
        }
        next.0[1] = bases.first();
    }
    next.0[0] = Some(batter);
    Advance { bases: next, outs, runs }
}

/// Single: runners on second and third score, the batter takes first, and a
/// runner on first reaches second with a chance to stretch for third.
pub fn resolve_single(
    bases: Bases,
    outs: u8,
    batter: BatterId,
    first_runner_line: Option<&RateLine>,
    rng: &mut impl Rng,
) -> Advance {
    let mut runs = Vec::new();
    if let Some(runner) = bases.third() {
        runs.push(RunCredit { runner, rbi: true });
    }
    if let Some(runner) = bases.second() {
        runs.push(RunCredit { runner, rbi: true });
    }

    let mut next = Bases::empty();
    let mut outs = outs;
    next.0[0] = Some(batter);
    if let Some(runner) = bases.first() {
        let decision = match first_runner_line {
            Some(line) => stretch_decision(line, rng),
            None => Stretch::Hold,
        };
        match decision {
            Stretch::Hold => next.0[1] = Some(runner),
            Stretch::Take => next.0[2] = Some(runner),
            Stretch::ThrownOut => outs += 1,
        }
    }
    Advance { bases: next, outs, runs }
}

/// Double: runners on second and third score, the batter takes second, and a
/// runner on first reaches third with a chance to stretch home.
pub fn resolve_double(
    bases: Bases,
    outs: u8,
    batter: BatterId,
    first_runner_line: Option<&RateLine>,
    rng: &mut impl Rng,
) -> Advance {
    let mut runs = Vec::new();
    if let Some(runner) = bases.third() {
        runs.push(RunCredit { runner, rbi: true });
    }
    if let Some(runner) = bases.second() {
        runs.push(RunCredit { runner, rbi: true });
    }

    let mut next = Bases::empty();
    let mut outs = outs;
    next.0[1] = Some(batter);
    if let Some(runner) = bases.first() {
        let decision = match first_runner_line {
            Some(line) => stretch_decision(line, rng),
            None => Stretch::Hold,
        };
        match decision {
            Stretch::Hold => next.0[2] = Some(runner),
            Stretch::Take => runs.push(RunCredit { runner, rbi: true }),
            Stretch::ThrownOut => outs += 1,
        }
    }
    Advance { bases: next, outs, runs }
}

/// Triple: every runner scores, batter to third.
pub fn resolve_triple(bases: Bases, outs: u8, batter: BatterId) -> Advance {
    let runs = score_all(&bases);
    let mut next = Bases::empty();
    next.0[2] = Some(batter);
    Advance { bases: next, outs, runs }
}

/// Home run: every runner scores and the batter follows them across.
pub fn resolve_home_run(bases: Bases, outs: u8, batter: BatterId) -> Advance {
    let mut runs = score_all(&bases);
    runs.push(RunCredit { runner: batter, rbi: true });
    Advance { bases: Bases::empty(), outs, runs }
}

fn score_all(bases: &Bases) -> Vec<RunCredit> {
    let mut runs = Vec::new();
    for slot in (0..3).rev() {
        if let Some(runner) = bases.0[slot] {
            runs.push(RunCredit { runner, rbi: true });
        }
    }
    runs
}

/// Steal attempt result for the lead runner before a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealResult {
    NoAttempt,
    Stolen,
    CaughtStealing,
}

/// Attempt a straight steal of the next base. Callers gate this on the lead
/// runner being on first or second.
pub fn resolve_steal(line: &RateLine, rng: &mut impl Rng) -> StealResult {
    if rng.gen::<f64>() < line.advance_attempt_ratio(0.7) {
        if rng.gen::<f64>() < line.advance_success_ratio(1.0) {
            StealResult::Stolen
        } else {
            StealResult::CaughtStealing
        }
    } else {
        StealResult::NoAttempt
    }
}

/// Resolve base-running on a ball-in-play out.
///
/// `outs` already includes the batter's out and is at most two entering (the
/// game loop skips resolution when the batter's out ends the half-inning).
/// `r` is the primary band draw; a handful of branches take one secondary
/// draw from `rng`.
pub fn resolve_ball_in_play_out(
    bases: Bases,
    outs: u8,
    batter: BatterId,
    r: f64,
    rng: &mut impl Rng,
) -> Advance {
    debug_assert!(outs < 3);
    let occupied = (
        bases.first().is_some(),
        bases.second().is_some(),
        bases.third().is_some(),
    );
    let mut adv = Advance::hold(bases, outs);

    match occupied {
        (false, false, false) => {}

        // Runner on third: mostly a fly ball deep enough to send him.
        (false, false, true) => {
            if r < 0.6 {
                if rng.gen::<f64>() < 0.93 {
                    adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                } else {
                    adv.outs += 1; // thrown out at the plate
                }
                adv.bases = Bases::empty();
            } else if r >= 0.96 {
                // Fielder's choice: batter safe, the out belongs to the runner.
                adv.bases = Bases([Some(batter), None, None]);
            }
        }

        (false, true, false) => {
            if r < 0.46 {
                adv.bases = Bases([None, None, bases.second()]);
            } else if r >= 0.98 {
                adv.bases = Bases([Some(batter), None, None]);
            }
        }

        (false, true, true) => {
            if r < 0.5 {
                adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                adv.bases = Bases([None, None, bases.second()]);
            } else if r < 0.6 {
                adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                adv.bases = Bases([None, bases.second(), None]);
            } else if r >= 0.98 {
                // Out at home on the fielder's choice; trailing runner moves up.
                adv.bases = Bases([Some(batter), None, bases.second()]);
            }
        }

        (true, false, false) => {
            if r < 0.08 {
                adv.outs += 1; // double play
                adv.bases = Bases::empty();
            } else if r < 0.36 {
                adv.bases = Bases([None, bases.first(), None]);
            }
        }

        (true, false, true) => {
            if r < 0.07 {
                adv.outs += 1;
                if adv.outs < 3 {
                    adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: false });
                }
                adv.bases = Bases::empty();
            } else if r < 0.26 {
                adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                adv.bases = Bases([None, bases.first(), None]);
            } else if r < 0.31 {
                adv.bases = Bases([None, bases.first(), bases.third()]);
            } else if r < 0.86 {
                adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                adv.bases = Bases([bases.first(), None, None]);
            }
        }

        (true, true, false) => {
            if r < 0.08 {
                adv.outs += 1;
                adv.bases = Bases([None, None, bases.second()]);
            } else if r < 0.3 {
                adv.bases = Bases([None, bases.first(), bases.second()]);
            } else if r < 0.54 {
                adv.bases = Bases([bases.first(), None, bases.second()]);
            }
        }

        (true, true, true) => {
            if r < 0.05 {
                adv.outs += 1;
                if adv.outs < 3 {
                    adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: false });
                    adv.bases = Bases([None, None, bases.second()]);
                } else {
                    adv.bases = Bases::empty();
                }
            } else if r < 0.17 {
                if rng.gen::<f64>() < 0.95 {
                    adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                } else {
                    adv.outs += 1; // cut down at the plate
                }
                adv.bases = Bases([None, bases.first(), bases.second()]);
            } else if r < 0.5 {
                adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                adv.bases = Bases([bases.first(), None, bases.second()]);
            } else if r < 0.72 {
                adv.runs.push(RunCredit { runner: bases.third().unwrap(), rbi: true });
                adv.bases = Bases([bases.first(), bases.second(), None]);
            }
        }
    }

    adv
}
