//! The per-game state machine.
//!
//! Drives the inning / half-inning / plate-appearance loop: pitching-change
//! checks, pinch-hit substitutions, steal attempts, outcome sampling,
//! base-running resolution, and the stat ledger. One `GameSim` owns one
//! run's random stream and mutable state; nothing is shared across runs.
//!
//! Run crediting goes through a single routine (`credit_run`) that handles
//! the runner's run, the batter's RBI, the game-scoped first-occurrence
//! flags, the early-inning sub-totals, and the pitcher charge (the pulled
//! starter for inherited runners, the current pitcher otherwise).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::engine::baserunning::{
    resolve_ball_in_play_out, resolve_double, resolve_home_run, resolve_single, resolve_steal,
    resolve_triple, resolve_walk, Advance, Bases, RunCredit, StealResult,
};
use crate::engine::ledger::{FirstFlags, InningScope, StatLedger};
use crate::engine::outcome::{pitches_thrown, sample_outcome, Outcome, PitchClass};
use crate::engine::pitching;
use crate::engine::roster::{BatterId, GameRoster, PitcherId};
use crate::error::Result;
use crate::models::box_score::{BatterRow, PitcherRow};
use crate::models::lineup::{Matchup, TeamSide, LINEUP_SIZE};
use crate::models::player::PitchContext;

/// Flat per-plate-appearance chance of a pinch hitter, independent of the
/// player-specific risk that applies once the bullpen is in. Both checks are
/// intentionally kept as two separate paths.
const PINCH_HIT_RATE: f64 = 0.01;

const REGULATION_INNINGS: u32 = 9;

#[derive(Debug, Clone)]
struct BattingState {
    slots: [BatterId; LINEUP_SIZE],
    cursor: usize,
}

#[derive(Debug, Clone)]
struct PitchingState {
    current: PitcherId,
    starter_in: bool,
    /// Runners on base at the moment of the pitching change; their later
    /// runs are charged to the departed starter.
    inherited: [Option<BatterId>; 3],
}

impl PitchingState {
    fn inherited_contains(&self, runner: BatterId) -> bool {
        self.inherited.iter().flatten().any(|&r| r == runner)
    }
}

/// Whole-game totals used by callers and invariant tests.
#[derive(Debug, Clone, Copy)]
pub struct GameSummary {
    pub score: [u32; 2],
    /// Outs made while each side was batting.
    pub batting_outs: [u32; 2],
    /// Runs per batting side summed back out of the ledger.
    pub ledger_runs: [u32; 2],
    pub innings: u32,
}

/// Everything a finished run produces.
#[derive(Debug, Clone)]
pub struct GameOutput {
    pub batters: Vec<BatterRow>,
    pub pitchers: Vec<PitcherRow>,
    pub summary: GameSummary,
}

pub struct GameSim<'a, R: Rng> {
    matchup: &'a Matchup,
    roster: GameRoster<'a>,
    rng: R,
    ledger: StatLedger,
    batting: [BattingState; 2],
    /// Indexed by the pitching team's side.
    pitching: [PitchingState; 2],

    inning: u32,
    batting_side: TeamSide,
    outs: u8,
    bases: Bases,
    score: [u32; 2],
    runs_this_inning: u32,
    firsts: FirstFlags,
    first_inning_done: bool,
    first_three_done: bool,
    batting_outs: [u32; 2],
}

impl<'a> GameSim<'a, ChaCha8Rng> {
    /// A run with its own ChaCha stream; the usual entry point.
    pub fn seeded(matchup: &'a Matchup, seed: u64) -> Self {
        Self::new(matchup, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> GameSim<'a, R> {
    pub fn new(matchup: &'a Matchup, rng: R) -> Self {
        let roster = GameRoster::new(matchup);
        let batting = [
            BattingState { slots: roster.starting_lineup(TeamSide::Away), cursor: 0 },
            BattingState { slots: roster.starting_lineup(TeamSide::Home), cursor: 0 },
        ];
        let pitching = [
            PitchingState {
                current: roster.starter(TeamSide::Away),
                starter_in: true,
                inherited: [None; 3],
            },
            PitchingState {
                current: roster.starter(TeamSide::Home),
                starter_in: true,
                inherited: [None; 3],
            },
        ];
        let ledger = StatLedger::new(roster.batter_count(), roster.pitcher_count());
        Self {
            matchup,
            roster,
            rng,
            ledger,
            batting,
            pitching,
            inning: 1,
            batting_side: TeamSide::Away,
            outs: 0,
            bases: Bases::empty(),
            score: [0, 0],
            runs_this_inning: 0,
            firsts: FirstFlags::default(),
            first_inning_done: false,
            first_three_done: false,
            batting_outs: [0, 0],
        }
    }

    /// Play the game to its terminal state and fold the ledger into rows.
    pub fn play(mut self, sim_no: usize) -> Result<GameOutput> {
        loop {
            self.half_inning()?;

            if self.batting_side == TeamSide::Home {
                if self.inning == 1 {
                    self.first_inning_done = true;
                }
                if self.inning == 3 {
                    self.first_three_done = true;
                }
            }

            let [away, home] = self.score;
            let regulation_done = self.inning >= REGULATION_INNINGS;
            let over = (regulation_done && self.batting_side == TeamSide::Home && away != home)
                || (regulation_done && self.batting_side == TeamSide::Away && home > away);
            if over {
                break;
            }

            self.outs = 0;
            self.runs_this_inning = 0;
            self.bases = Bases::empty();
            for state in &mut self.pitching {
                state.inherited = [None; 3];
            }
            self.refresh_win_flags();

            if self.batting_side == TeamSide::Home {
                self.inning += 1;
            }
            self.batting_side = self.batting_side.other();
        }

        Ok(self.finalize(sim_no))
    }

    fn half_inning(&mut self) -> Result<()> {
        while self.outs < 3 {
            self.check_pitching_change();

            let bat = self.batting_side;
            let cursor = self.batting[bat.idx()].cursor;
            let batter = self.maybe_pinch_hit(bat, cursor);

            self.check_steal();
            if self.outs >= 3 {
                break;
            }

            self.plate_appearance(batter)?;

            // Walk-off: the game ends the moment the home team takes the
            // lead in the ninth or later.
            if bat == TeamSide::Home
                && self.inning >= REGULATION_INNINGS
                && self.score[1] > self.score[0]
            {
                break;
            }

            self.batting[bat.idx()].cursor = (cursor + 1) % LINEUP_SIZE;
        }
        Ok(())
    }

    /// The hook, evaluated while the starter is still in. On a pull the
    /// bullpen aggregate takes over for the rest of the game and the current
    /// runners become the starter's inherited responsibility.
    fn check_pitching_change(&mut self) {
        let def = self.defense();
        if !self.pitching[def.idx()].starter_in {
            return;
        }
        let starter = self.roster.starter(def);
        let record = self.roster.pitcher(starter);
        let pitch_count = self.ledger.pitcher(starter).pitches;
        let pull = pitching::should_pull(
            pitch_count,
            record.projected_pitches,
            record.max_pitches,
            self.inning,
            self.runs_this_inning,
            &mut self.rng,
        );
        if !pull {
            return;
        }

        let state = &mut self.pitching[def.idx()];
        state.starter_in = false;
        state.inherited = self.bases.0;
        state.current = self.roster.bullpen(def);

        if pitching::win_eligible(
            self.inning,
            self.score[def.idx()],
            self.score[self.batting_side.idx()],
        ) {
            self.ledger.pitcher_mut(starter).in_line_for_win = true;
        }
    }

    /// Flat pinch-hit check, plus the player-specific risk once the bullpen
    /// is pitching. The replacement permanently takes the lineup slot.
    fn maybe_pinch_hit(&mut self, bat: TeamSide, cursor: usize) -> BatterId {
        let batter = self.batting[bat.idx()].slots[cursor];
        let mut lift = self.rng.gen::<f64>() < PINCH_HIT_RATE;
        if !self.pitching[self.defense().idx()].starter_in {
            let risk = self.roster.batter(batter).pinch_risk;
            if self.rng.gen::<f64>() < risk {
                lift = true;
            }
        }
        if lift {
            let replacement = self.roster.replacement(bat);
            self.batting[bat.idx()].slots[cursor] = replacement;
            replacement
        } else {
            batter
        }
    }

    /// Steal attempt by the lead runner when he is on first or second.
    fn check_steal(&mut self) {
        let Some((slot, runner)) = self.bases.lead_runner() else {
            return;
        };
        if slot >= 2 {
            return;
        }
        let line = self.roster.line(runner, self.context());
        match resolve_steal(line, &mut self.rng) {
            StealResult::NoAttempt => {}
            StealResult::Stolen => {
                self.bases.0[slot + 1] = Some(runner);
                self.bases.0[slot] = None;
                self.ledger.batter_mut(runner).stolen_bases += 1;
            }
            StealResult::CaughtStealing => {
                self.bases.0[slot] = None;
                self.ledger.batter_mut(runner).caught_stealing += 1;
                self.record_outs(1);
            }
        }
    }

    fn plate_appearance(&mut self, batter: BatterId) -> Result<()> {
        let context = self.context();
        let pitcher = self.pitching[self.defense().idx()].current;
        let scope = self.scope();

        self.ledger.batter_mut(batter).plate_appearances += 1;
        {
            let stats = self.ledger.pitcher_mut(pitcher);
            stats.batters_faced += 1;
            if scope.covers_first() {
                stats.first_inning_batters_faced += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_batters_faced += 1;
            }
        }

        let line = self.roster.line(batter, context);
        let outcome = sample_outcome(&self.roster.batter(batter).key, line, &mut self.rng)?;

        if outcome.is_hit() {
            self.record_hit(batter, pitcher, outcome);
        }

        match outcome {
            Outcome::Single => {
                self.charge_pitches(pitcher, PitchClass::Hit);
                let first_line = self.bases.first().map(|r| self.roster.line(r, context));
                let adv =
                    resolve_single(self.bases, self.outs, batter, first_line, &mut self.rng);
                self.apply_advance(adv, batter);
            }
            Outcome::Double => {
                self.charge_pitches(pitcher, PitchClass::Hit);
                let first_line = self.bases.first().map(|r| self.roster.line(r, context));
                let adv =
                    resolve_double(self.bases, self.outs, batter, first_line, &mut self.rng);
                self.apply_advance(adv, batter);
            }
            Outcome::Triple => {
                self.charge_pitches(pitcher, PitchClass::Hit);
                let adv = resolve_triple(self.bases, self.outs, batter);
                self.apply_advance(adv, batter);
            }
            Outcome::HomeRun => {
                self.charge_pitches(pitcher, PitchClass::Hit);
                let adv = resolve_home_run(self.bases, self.outs, batter);
                self.apply_advance(adv, batter);
            }
            Outcome::Walk => {
                self.ledger.batter_mut(batter).walks += 1;
                self.ledger.pitcher_mut(pitcher).walks += 1;
                self.charge_pitches(pitcher, PitchClass::Walk);
                let adv = resolve_walk(self.bases, self.outs, batter);
                self.apply_advance(adv, batter);
            }
            Outcome::HitByPitch => {
                self.ledger.batter_mut(batter).hbp += 1;
                self.ledger.pitcher_mut(pitcher).hbp += 1;
                self.charge_pitches(pitcher, PitchClass::HitByPitch);
                let adv = resolve_walk(self.bases, self.outs, batter);
                self.apply_advance(adv, batter);
            }
            Outcome::Out => self.resolve_out(batter, pitcher, line.strikeout_share())?,
        }
        Ok(())
    }

    fn resolve_out(
        &mut self,
        batter: BatterId,
        pitcher: PitcherId,
        strikeout_share: f64,
    ) -> Result<()> {
        self.record_outs(1);

        let is_strikeout = self.rng.gen::<f64>() <= strikeout_share;
        if is_strikeout {
            let scope = self.scope();
            self.ledger.batter_mut(batter).strikeouts += 1;
            let stats = self.ledger.pitcher_mut(pitcher);
            stats.strikeouts += 1;
            if scope.covers_first() {
                stats.first_inning_strikeouts += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_strikeouts += 1;
            }
            if !self.firsts.strikeout {
                self.firsts.strikeout = true;
                self.ledger.pitcher_mut(pitcher).first_strikeout += 1;
            }
            self.charge_pitches(pitcher, PitchClass::Strikeout);
            // Strikeouts never advance runners.
            return Ok(());
        }

        self.charge_pitches(pitcher, PitchClass::BallInPlayOut);
        if self.outs < 3 && !self.bases.is_empty() {
            let r = self.rng.gen::<f64>();
            let adv = resolve_ball_in_play_out(self.bases, self.outs, batter, r, &mut self.rng);
            self.apply_advance(adv, batter);
        }
        Ok(())
    }

    /// Fold one resolved play into the game: outs to the current pitcher,
    /// base state, and run credits.
    fn apply_advance(&mut self, adv: Advance, batter: BatterId) {
        let delta = adv.outs - self.outs;
        if delta > 0 {
            self.record_outs(delta);
        }
        self.bases = adv.bases;
        for credit in adv.runs {
            self.credit_run(credit, batter);
        }
    }

    /// The one shared run-crediting routine.
    fn credit_run(&mut self, credit: RunCredit, batter: BatterId) {
        let scope = self.scope();
        let def = self.defense();

        {
            let stats = self.ledger.batter_mut(credit.runner);
            stats.runs += 1;
            if scope.covers_first() {
                stats.first_inning_runs += 1;
                stats.first_inning_hrr += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_runs += 1;
                stats.first_three_hrr += 1;
            }
        }
        if !self.firsts.run {
            self.firsts.run = true;
            self.ledger.batter_mut(credit.runner).first_run += 1;
        }

        if credit.rbi {
            let stats = self.ledger.batter_mut(batter);
            stats.rbi += 1;
            if scope.covers_first() {
                stats.first_inning_hrr += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_hrr += 1;
            }
            if !self.firsts.rbi {
                self.firsts.rbi = true;
                self.ledger.batter_mut(batter).first_rbi += 1;
            }
        }

        let charged = if self.pitching[def.idx()].inherited_contains(credit.runner) {
            self.roster.starter(def)
        } else {
            self.pitching[def.idx()].current
        };
        {
            let stats = self.ledger.pitcher_mut(charged);
            stats.runs += 1;
            if scope.covers_first() {
                stats.first_inning_runs += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_runs += 1;
            }
        }
        if !self.firsts.run_allowed {
            self.firsts.run_allowed = true;
            self.ledger.pitcher_mut(charged).first_run_allowed += 1;
        }

        self.score[self.batting_side.idx()] += 1;
        self.runs_this_inning += 1;
    }

    fn record_hit(&mut self, batter: BatterId, pitcher: PitcherId, outcome: Outcome) {
        let scope = self.scope();
        {
            let stats = self.ledger.batter_mut(batter);
            match outcome {
                Outcome::Single => stats.singles += 1,
                Outcome::Double => stats.doubles += 1,
                Outcome::Triple => stats.triples += 1,
                Outcome::HomeRun => stats.home_runs += 1,
                _ => {}
            }
            if scope.covers_first() {
                stats.first_inning_hits += 1;
                stats.first_inning_hrr += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_hits += 1;
                stats.first_three_hrr += 1;
            }
        }
        {
            let stats = self.ledger.pitcher_mut(pitcher);
            match outcome {
                Outcome::Single => stats.singles += 1,
                Outcome::Double => stats.doubles += 1,
                Outcome::Triple => stats.triples += 1,
                Outcome::HomeRun => stats.home_runs += 1,
                _ => {}
            }
            if scope.covers_first() {
                stats.first_inning_hits += 1;
            }
            if scope.covers_first_three() {
                stats.first_three_hits += 1;
            }
        }
        if !self.firsts.hit {
            self.firsts.hit = true;
            self.ledger.batter_mut(batter).first_hit += 1;
        }
        if outcome == Outcome::HomeRun && !self.firsts.home_run {
            self.firsts.home_run = true;
            self.ledger.batter_mut(batter).first_home_run += 1;
        }
    }

    fn charge_pitches(&mut self, pitcher: PitcherId, class: PitchClass) {
        let scope = self.scope();
        let pitches = pitches_thrown(class, &mut self.rng);
        let stats = self.ledger.pitcher_mut(pitcher);
        stats.pitches += pitches;
        if scope.covers_first() {
            stats.first_inning_pitches += pitches;
        }
        if scope.covers_first_three() {
            stats.first_three_pitches += pitches;
        }
    }

    fn record_outs(&mut self, n: u8) {
        let def = self.defense();
        let current = self.pitching[def.idx()].current;
        self.ledger.pitcher_mut(current).outs += n as u32;
        self.batting_outs[self.batting_side.idx()] += n as u32;
        self.outs += n;
    }

    /// A flagged starter keeps the win only while his team holds the lead.
    fn refresh_win_flags(&mut self) {
        for side in TeamSide::BOTH {
            let starter = self.roster.starter(side);
            if self.ledger.pitcher(starter).in_line_for_win {
                let leads = self.score[side.idx()] > self.score[side.other().idx()];
                self.ledger.pitcher_mut(starter).in_line_for_win = leads;
            }
        }
    }

    fn defense(&self) -> TeamSide {
        self.batting_side.other()
    }

    fn context(&self) -> PitchContext {
        if self.pitching[self.defense().idx()].starter_in {
            PitchContext::VsStarter
        } else {
            PitchContext::VsReliever
        }
    }

    fn scope(&self) -> InningScope {
        if !self.first_inning_done {
            InningScope::First
        } else if !self.first_three_done {
            InningScope::EarlyThree
        } else {
            InningScope::Late
        }
    }

    fn finalize(self, sim_no: usize) -> GameOutput {
        let mut ledger_runs = [0u32; 2];
        for (id, stats) in self.ledger.batter_entries() {
            ledger_runs[self.roster.batter_side(id).idx()] += stats.runs;
        }

        let mut batters = Vec::with_capacity(LINEUP_SIZE * 2);
        for (id, stats) in self.ledger.batter_entries() {
            let record = self.roster.batter(id);
            if record.is_replacement() {
                continue;
            }
            let side = self.roster.batter_side(id);
            batters.push(BatterRow {
                player: record.key.name.clone(),
                team: record.key.team.clone(),
                opp: self.matchup.team_name(side.other()).to_string(),
                pos: record.key.position.clone(),
                sim_no,
                plate_appearances: stats.plate_appearances,
                hits: stats.hits(),
                singles: stats.singles,
                doubles: stats.doubles,
                triples: stats.triples,
                home_runs: stats.home_runs,
                total_bases: stats.total_bases(),
                runs: stats.runs,
                rbi: stats.rbi,
                hits_runs_rbis: stats.hits() + stats.runs + stats.rbi,
                stolen_bases: stats.stolen_bases,
                caught_stealing: stats.caught_stealing,
                walks: stats.walks,
                strikeouts: stats.strikeouts,
                hbp: stats.hbp,
                fantasy_points: stats.fantasy_points(),
                first_inning_hits: stats.first_inning_hits,
                first_inning_runs: stats.first_inning_runs,
                first_inning_hrr: stats.first_inning_hrr,
                first_three_hits: stats.first_three_hits,
                first_three_runs: stats.first_three_runs,
                first_three_hrr: stats.first_three_hrr,
                first_hit: stats.first_hit,
                first_rbi: stats.first_rbi,
                first_run: stats.first_run,
                first_home_run: stats.first_home_run,
            });
        }

        let mut pitchers = Vec::with_capacity(2);
        for side in TeamSide::BOTH {
            let id = self.roster.starter(side);
            let stats = self.ledger.pitcher(id);
            let record = self.roster.pitcher(id);
            let win = stats.in_line_for_win;
            pitchers.push(PitcherRow {
                player: record.key.name.clone(),
                team: record.key.team.clone(),
                opp: self.matchup.team_name(side.other()).to_string(),
                sim_no,
                batters_faced: stats.batters_faced,
                outs: stats.outs,
                innings_pitched: stats.innings_pitched(),
                era: stats.era(),
                win: win as u32,
                quality_start: stats.quality_start() as u32,
                runs: stats.runs,
                hits: stats.hits(),
                singles: stats.singles,
                doubles: stats.doubles,
                triples: stats.triples,
                home_runs: stats.home_runs,
                strikeouts: stats.strikeouts,
                walks: stats.walks,
                hbp: stats.hbp,
                pitches: stats.pitches,
                fantasy_points: stats.fantasy_points(win),
                first_inning_strikeouts: stats.first_inning_strikeouts,
                first_inning_pitches: stats.first_inning_pitches,
                first_inning_runs: stats.first_inning_runs,
                first_inning_hits: stats.first_inning_hits,
                first_inning_batters_faced: stats.first_inning_batters_faced,
                first_three_strikeouts: stats.first_three_strikeouts,
                first_three_pitches: stats.first_three_pitches,
                first_three_runs: stats.first_three_runs,
                first_three_hits: stats.first_three_hits,
                first_three_batters_faced: stats.first_three_batters_faced,
                first_strikeout: stats.first_strikeout,
                first_run_allowed: stats.first_run_allowed,
            });
        }

        GameOutput {
            batters,
            pitchers,
            summary: GameSummary {
                score: self.score,
                batting_outs: self.batting_outs,
                ledger_runs,
                innings: self.inning,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{BatterRecord, PitcherRecord, PlayerKey, RateLine};

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

    fn matchup() -> Matchup {
        let mut batters = Vec::new();
        for team in ["AWY", "HOM"] {
            for i in 1..=9u8 {
                batters.push(BatterRecord {
                    key: PlayerKey::new(format!("{team} batter {i}"), "OF", team),
                    order: i,
                    pinch_risk: 0.02,
                    vs_starter: rate_line(),
                    vs_reliever: rate_line(),
                });
            }
        }
        let pitchers = vec![
            PitcherRecord {
                key: PlayerKey::new("away ace", "P", "AWY"),
                projected_pitches: 88.0,
                max_pitches: 104.0,
            },
            PitcherRecord {
                key: PlayerKey::new("home ace", "P", "HOM"),
                projected_pitches: 92.0,
                max_pitches: 110.0,
            },
        ];
        Matchup::build("AWY", "HOM", &batters, &pitchers).unwrap()
    }

    #[test]
    fn runs_are_conserved_between_score_and_ledger() {
        let m = matchup();
        for seed in 0..300 {
            let output = GameSim::seeded(&m, seed).play(0).unwrap();
            assert_eq!(
                output.summary.score, output.summary.ledger_runs,
                "seed {seed}: scoreboard and ledger disagree"
            );
        }
    }

    #[test]
    fn outs_bookkeeping_is_consistent() {
        let m = matchup();
        for seed in 0..300 {
            let output = GameSim::seeded(&m, seed).play(0).unwrap();
            let s = output.summary;

            // The away side's half-innings always run to completion.
            assert_eq!(s.batting_outs[0] % 3, 0, "seed {seed}");
            assert!(s.batting_outs[0] >= 27, "seed {seed}");
            // Home bats at least eight full innings.
            assert!(s.batting_outs[1] >= 24, "seed {seed}");

            // Outs recorded by each team's pitchers equal the outs made by
            // the opposing batting side. Starter rows only cover part of the
            // staff, so check against the full output totals.
            let away_team = &output.pitchers[0].team;
            let starter_outs: [u32; 2] = [output.pitchers[0].outs, output.pitchers[1].outs];
            assert!(starter_outs[0] <= s.batting_outs[1], "seed {seed} {away_team}");
            assert!(starter_outs[1] <= s.batting_outs[0], "seed {seed}");
        }
    }

    #[test]
    fn scores_diverge_at_game_end() {
        let m = matchup();
        for seed in 0..200 {
            let output = GameSim::seeded(&m, seed).play(0).unwrap();
            let [away, home] = output.summary.score;
            assert_ne!(away, home, "seed {seed}: game ended tied");
            assert!(output.summary.innings >= 9, "seed {seed}");
        }
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let m = matchup();
        let a = GameSim::seeded(&m, 777).play(3).unwrap();
        let b = GameSim::seeded(&m, 777).play(3).unwrap();
        assert_eq!(a.summary.score, b.summary.score);
        for (x, y) in a.batters.iter().zip(&b.batters) {
            assert_eq!(x.player, y.player);
            assert_eq!(x.fantasy_points, y.fantasy_points);
            assert_eq!(x.hits, y.hits);
        }
        for (x, y) in a.pitchers.iter().zip(&b.pitchers) {
            assert_eq!(x.pitches, y.pitches);
            assert_eq!(x.outs, y.outs);
        }
    }

    #[test]
    fn grand_slam_credits_four_rbi_and_one_run() {
        let m = matchup();
        let mut sim = GameSim::seeded(&m, 1);
        let batter = BatterId(3);
        sim.bases = Bases([Some(BatterId(0)), Some(BatterId(1)), Some(BatterId(2))]);

        let adv = resolve_home_run(sim.bases, sim.outs, batter);
        sim.apply_advance(adv, batter);

        assert!(sim.bases.is_empty());
        assert_eq!(sim.score[0], 4);
        assert_eq!(sim.ledger.batter(batter).rbi, 4);
        assert_eq!(sim.ledger.batter(batter).runs, 1);
        for runner in [BatterId(0), BatterId(1), BatterId(2)] {
            assert_eq!(sim.ledger.batter(runner).runs, 1);
        }
        // All four runs land on the home starter.
        let home_starter = sim.roster.starter(TeamSide::Home);
        assert_eq!(sim.ledger.pitcher(home_starter).runs, 4);
        assert_eq!(sim.ledger.pitcher(home_starter).first_run_allowed, 1);
    }

    #[test]
    fn inherited_runner_is_charged_to_the_starter() {
        let m = matchup();
        let mut sim = GameSim::seeded(&m, 2);
        let runner = BatterId(0);
        let batter = BatterId(1);
        sim.bases = Bases([None, None, Some(runner)]);

        // Pull the home starter by hand; the runner becomes inherited.
        let def = TeamSide::Home;
        sim.pitching[def.idx()].starter_in = false;
        sim.pitching[def.idx()].inherited = sim.bases.0;
        sim.pitching[def.idx()].current = sim.roster.bullpen(def);

        let adv = resolve_single(sim.bases, sim.outs, batter, None, &mut sim.rng);
        sim.apply_advance(adv, batter);

        let starter = sim.roster.starter(def);
        let bullpen = sim.roster.bullpen(def);
        assert_eq!(sim.ledger.pitcher(starter).runs, 1);
        assert_eq!(sim.ledger.pitcher(bullpen).runs, 0);
    }

    #[test]
    fn zero_distribution_fails_the_run() {
        let mut batters = Vec::new();
        for team in ["AWY", "HOM"] {
            for i in 1..=9u8 {
                batters.push(BatterRecord {
                    key: PlayerKey::new(format!("{team} batter {i}"), "OF", team),
                    order: i,
                    pinch_risk: 0.0,
                    vs_starter: RateLine::default(), // sums to zero
                    vs_reliever: RateLine::default(),
                });
            }
        }
        let pitchers = vec![
            PitcherRecord {
                key: PlayerKey::new("a", "P", "AWY"),
                projected_pitches: 90.0,
                max_pitches: 100.0,
            },
            PitcherRecord {
                key: PlayerKey::new("h", "P", "HOM"),
                projected_pitches: 90.0,
                max_pitches: 100.0,
            },
        ];
        let m = Matchup::build("AWY", "HOM", &batters, &pitchers).unwrap();
        let err = GameSim::seeded(&m, 5).play(0).unwrap_err();
        assert!(matches!(err, crate::error::SimError::InvalidDistribution { .. }));
    }
}
