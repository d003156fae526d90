//! Pitcher management: the hook.
//!
//! Checked once before each plate appearance while the starter is still in.
//! Four triggers, in order: a rare injury/ejection, an inning blowup, the
//! hard pitch cap, and a soft zone between the projected and maximum pitch
//! counts where the pull probability ramps linearly from 0.5 to 1.0.

use rand::Rng;

/// Chance per check that the starter leaves for reasons unrelated to
/// performance (injury, ejection).
const INJURY_EJECTION_RATE: f64 = 0.0015;

/// Decide whether the starter is pulled before this plate appearance.
pub fn should_pull(
    pitch_count: u32,
    projected: f64,
    max: f64,
    inning: u32,
    runs_this_inning: u32,
    rng: &mut impl Rng,
) -> bool {
    if rng.gen::<f64>() < INJURY_EJECTION_RATE {
        return true;
    }

    // Blowup: the later the inning, the shorter the leash. From the ninth
    // inning on the threshold is zero, so the starter never opens the ninth.
    let blowup = runs_this_inning as i64 >= 9 - inning as i64;
    let pc = pitch_count as f64;

    if blowup || pc >= max {
        return true;
    }
    if pc >= projected {
        let pull_probability = 0.5 + 0.5 * (pc - projected) / (max - projected);
        return rng.gen::<f64>() < pull_probability;
    }
    false
}

/// Whether the departing starter leaves in line for the win: only evaluated
/// past the fifth inning, and only if his team currently leads.
pub fn win_eligible(inning: u32, own_score: u32, opponent_score: u32) -> bool {
    inning > 5 && own_score > opponent_score
}
