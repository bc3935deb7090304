use serde::Serialize;

use riskcast_score::RiskScore;

use crate::domain::Domain;
use crate::input::{Factor, ScenarioInput};

/// One weighted term of a composite formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub factor: Factor,
    pub weight: f64,
    /// Term uses `10 - value`; higher factor values lower the risk.
    pub inverted: bool,
}

impl Term {
    const fn direct(factor: Factor, weight: f64) -> Self {
        Self {
            factor,
            weight,
            inverted: false,
        }
    }

    const fn inverted(factor: Factor, weight: f64) -> Self {
        Self {
            factor,
            weight,
            inverted: true,
        }
    }

    /// Contribution of this term, zero when the factor is absent.
    pub fn contribution(&self, input: &ScenarioInput) -> f64 {
        match input.get(self.factor) {
            Some(v) if self.inverted => (10.0 - v) * self.weight,
            Some(v) => v * self.weight,
            None => 0.0,
        }
    }
}

pub const FLOODING_TERMS: [Term; 5] = [
    Term::direct(Factor::RainfallFactor, 4.0),
    Term::inverted(Factor::InfrastructureStrength, 0.3),
    Term::inverted(Factor::SoilMoistureRetention, 0.25),
    Term::inverted(Factor::VegetationDensity, 0.2),
    Term::direct(Factor::FloodProbability, 2.5),
];

pub const CYCLONE_TERMS: [Term; 5] = [
    Term::direct(Factor::WindFactor, 3.0),
    Term::direct(Factor::CategoryWeight, 3.5),
    Term::direct(Factor::DistanceFactor, 2.0),
    Term::direct(Factor::InfrastructureVulnerability, 1.0),
    Term::direct(Factor::PopulationFactor, 0.5),
];

impl Domain {
    pub fn terms(self) -> &'static [Term] {
        match self {
            Domain::Flooding => &FLOODING_TERMS,
            Domain::Cyclone => &CYCLONE_TERMS,
        }
    }
}

/// Combine the factors relevant to `domain` into a score in `[0, 10]`.
///
/// Factors are expected to be pre-normalized; nothing is validated here.
/// Missing factors contribute zero and the weighted sum is clamped, so the
/// result is always renderable.
pub fn estimate(input: &ScenarioInput, domain: Domain) -> RiskScore {
    let raw: f64 = domain.terms().iter().map(|t| t.contribution(input)).sum();
    let score = RiskScore::new(raw);
    if score.value() != raw {
        log::debug!("{domain} estimate clamped raw sum {raw} to {score}");
    }
    score
}

/// Contribution of one factor to an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermContribution {
    pub factor: Factor,
    pub value: Option<f64>,
    pub weight: f64,
    pub inverted: bool,
    pub contribution: f64,
}

/// Per-term view of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub domain: Domain,
    pub raw_sum: f64,
    pub score: RiskScore,
    pub terms: Vec<TermContribution>,
}

impl Breakdown {
    /// Names of formula factors the input did not provide.
    pub fn missing(&self) -> Vec<Factor> {
        self.terms
            .iter()
            .filter(|t| t.value.is_none())
            .map(|t| t.factor)
            .collect()
    }
}

pub fn explain(input: &ScenarioInput, domain: Domain) -> Breakdown {
    let mut terms = Vec::with_capacity(domain.terms().len());
    let mut raw_sum = 0.0;

    for term in domain.terms() {
        let contribution = term.contribution(input);
        raw_sum += contribution;
        terms.push(TermContribution {
            factor: term.factor,
            value: input.get(term.factor),
            weight: term.weight,
            inverted: term.inverted,
            contribution,
        });
    }

    Breakdown {
        domain,
        raw_sum,
        score: RiskScore::new(raw_sum),
        terms,
    }
}
