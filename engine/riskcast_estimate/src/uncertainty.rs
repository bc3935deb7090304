//! Opt-in score jitter for "what if" exploration.
//!
//! [`crate::estimate`] is deterministic. This module adds a bounded random
//! perturbation on top of it for callers that explicitly ask to simulate
//! uncertainty. The RNG is always supplied by the caller so that a seeded
//! run is reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

use riskcast_score::RiskScore;

use crate::domain::Domain;
use crate::formula::estimate;
use crate::input::ScenarioInput;

/// Half-width of the uniform jitter applied to a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uncertainty {
    pub spread: f64,
}

impl Default for Uncertainty {
    fn default() -> Self {
        Self { spread: 0.5 }
    }
}

impl Uncertainty {
    pub fn new(spread: f64) -> Self {
        Self { spread }
    }

    /// Perturb `score` by a uniform draw in `[-spread, spread]` and
    /// re-clamp. A zero, negative or non-finite spread leaves it unchanged.
    pub fn apply<R: Rng + ?Sized>(&self, score: RiskScore, rng: &mut R) -> RiskScore {
        if !(self.spread.is_finite() && self.spread > 0.0) {
            return score;
        }
        let jitter = rng.gen_range(-self.spread..=self.spread);
        RiskScore::new(score.value() + jitter)
    }
}

pub fn estimate_with_uncertainty<R: Rng + ?Sized>(
    input: &ScenarioInput,
    domain: Domain,
    uncertainty: Uncertainty,
    rng: &mut R,
) -> RiskScore {
    let base = estimate(input, domain);
    let jittered = uncertainty.apply(base, rng);
    log::debug!("simulated uncertainty: {base} -> {jittered} (spread {})", uncertainty.spread);
    jittered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Factor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn input() -> ScenarioInput {
        ScenarioInput::new()
            .with(Factor::RainfallFactor, 0.5)
            .with(Factor::FloodProbability, 0.4)
    }

    #[test]
    fn same_seed_same_result() {
        let u = Uncertainty::new(1.0);
        let a = estimate_with_uncertainty(&input(), Domain::Flooding, u, &mut StdRng::seed_from_u64(7));
        let b = estimate_with_uncertainty(&input(), Domain::Flooding, u, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn jitter_stays_within_spread() {
        let base = estimate(&input(), Domain::Flooding).value();
        let u = Uncertainty::new(0.75);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let s = estimate_with_uncertainty(&input(), Domain::Flooding, u, &mut rng).value();
            assert!((s - base).abs() <= 0.75 + 1e-12);
        }
    }

    #[test]
    fn jitter_is_clamped_to_scale() {
        let top = ScenarioInput::new().with(Factor::RainfallFactor, 10.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let s = estimate_with_uncertainty(&top, Domain::Flooding, Uncertainty::new(3.0), &mut rng);
            assert!(s.value() <= 10.0 && s.value() >= 7.0);
        }
    }

    #[test]
    fn degenerate_spread_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = estimate(&input(), Domain::Flooding);
        for spread in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(Uncertainty::new(spread).apply(base, &mut rng), base);
        }
    }
}
