use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use riskcast_estimate::{estimate, Domain, Factor, ScenarioInput};
use riskcast_score::RiskCategory;

fn factor_value() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (-1.0e6f64..1.0e6).prop_map(Some)]
}

fn scenario() -> impl Strategy<Value = ScenarioInput> {
    proptest::collection::vec(factor_value(), Factor::ALL.len()).prop_map(|values| {
        let mut input = ScenarioInput::new();
        for (factor, value) in Factor::ALL.iter().zip(values) {
            if let Some(v) = value {
                input.set(*factor, v);
            }
        }
        input
    })
}

proptest! {
    #[test]
    fn output_is_always_on_the_scale(input in scenario()) {
        for domain in [Domain::Flooding, Domain::Cyclone] {
            let s = estimate(&input, domain).value();
            prop_assert!((0.0..=10.0).contains(&s));
        }
    }

    #[test]
    fn estimate_is_idempotent(input in scenario()) {
        for domain in [Domain::Flooding, Domain::Cyclone] {
            prop_assert_eq!(estimate(&input, domain), estimate(&input, domain));
        }
    }
}

#[test]
fn adversarial_sums_clamp_exactly() {
    let below = ScenarioInput::new()
        .with(Factor::InfrastructureStrength, 500.0)
        .with(Factor::SoilMoistureRetention, 500.0);
    assert_eq!(estimate(&below, Domain::Flooding).value(), 0.0);

    let above = ScenarioInput::new()
        .with(Factor::RainfallFactor, 100.0)
        .with(Factor::FloodProbability, 100.0);
    assert_eq!(estimate(&above, Domain::Flooding).value(), 10.0);

    let negative_cyclone = ScenarioInput::new().with(Factor::WindFactor, -3.0);
    assert_eq!(estimate(&negative_cyclone, Domain::Cyclone).value(), 0.0);
}

#[test]
fn documented_flooding_scenario() {
    let input = ScenarioInput::new()
        .with(Factor::InfrastructureStrength, 8.0)
        .with(Factor::SoilMoistureRetention, 7.0)
        .with(Factor::VegetationDensity, 6.0)
        .with(Factor::FloodProbability, 0.3)
        .with(Factor::RainfallFactor, 0.5);
    let score = estimate(&input, Domain::Flooding);
    assert_abs_diff_eq!(score.value(), 4.9, epsilon = 1e-9);
    assert_eq!(score.category(), RiskCategory::Medium);
    assert_eq!(score.to_string(), "4.90");
}
