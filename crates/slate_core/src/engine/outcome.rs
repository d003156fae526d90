//! Plate-appearance outcome model.
//!
//! One categorical draw over the seven outcomes, weighted by the batter's
//! rate line for the current pitch context. The weights are expectations,
//! not probabilities; they are normalized on every draw. A non-positive
//! weight sum is an `InvalidDistribution` error, fatal to the run but not
//! to the batch.

use once_cell::sync::Lazy;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimError};
use crate::models::player::{PlayerKey, RateLine};

/// The seven ways a plate appearance can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    HitByPitch,
    Out,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Outcome::Single,
        Outcome::Double,
        Outcome::Triple,
        Outcome::HomeRun,
        Outcome::Walk,
        Outcome::HitByPitch,
        Outcome::Out,
    ];

    pub fn is_hit(self) -> bool {
        matches!(
            self,
            Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::HomeRun
        )
    }
}

/// Draw one outcome from the batter's normalized rate line.
pub fn sample_outcome(
    batter: &PlayerKey,
    line: &RateLine,
    rng: &mut impl Rng,
) -> Result<Outcome> {
    let weights = line.outcome_weights();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(SimError::InvalidDistribution {
            player: batter.name.clone(),
            sum: total,
        });
    }

    let mut draw = rng.gen::<f64>() * total;
    for (outcome, weight) in Outcome::ALL.iter().zip(weights) {
        if draw < weight {
            return Ok(*outcome);
        }
        draw -= weight;
    }
    // Floating-point remainder lands on the last band.
    Ok(Outcome::Out)
}

/// Pitch-count classes. Strikeouts and walks are long plate appearances;
/// balls in play are short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchClass {
    Hit,
    Walk,
    Strikeout,
    BallInPlayOut,
    HitByPitch,
}

struct PitchModel {
    normal: Normal<f64>,
    floor: u32,
}

static PITCH_MODELS: Lazy<[PitchModel; 5]> = Lazy::new(|| {
    let model = |mean: f64, sd: f64, floor: u32| PitchModel {
        normal: Normal::new(mean, sd).expect("pitch model constants are valid"),
        floor,
    };
    [
        model(3.35, 1.84, 1), // Hit
        model(5.73, 1.36, 4), // Walk: at least four pitches by definition
        model(4.85, 1.40, 3), // Strikeout: at least three
        model(3.38, 1.83, 1), // BallInPlayOut
        model(3.17, 1.80, 1), // HitByPitch
    ]
});

/// Number of pitches consumed by a plate appearance of the given class.
pub fn pitches_thrown(class: PitchClass, rng: &mut impl Rng) -> u32 {
    let model = &PITCH_MODELS[class as usize];
    let draw = model.normal.sample(rng).round();
    if draw < model.floor as f64 {
        model.floor
    } else {
        draw as u32
    }
}
