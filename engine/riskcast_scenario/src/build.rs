use std::collections::HashMap;

use riskcast_estimate::{Factor, ScenarioInput};

use crate::diagnostics::{Diagnostic, Span};
use crate::parser::{parse_scenario_recovering, Assignment, Literal};

const SOIL_TYPE: &str = "soil_type";

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut cur = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        prev = cur;
    }
    prev[b.len()]
}

fn suggest(name: &str) -> Option<&'static str> {
    Factor::ALL
        .iter()
        .map(|f| f.name())
        .chain(std::iter::once(SOIL_TYPE))
        .map(|candidate| (edit_distance(name, candidate), candidate))
        .filter(|(d, _)| *d <= 3)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c)
}

/// Turn parsed assignments into estimator input. Unknown names and values
/// of the wrong kind are reported and skipped.
pub fn build_input(assignments: &[Assignment], diags: &mut Vec<Diagnostic>) -> ScenarioInput {
    let mut input = ScenarioInput::new();
    let mut seen: HashMap<String, Span> = HashMap::new();

    for a in assignments {
        if a.name == SOIL_TYPE {
            match &a.value {
                Literal::Text(t) => input.soil_type = Some(t.clone()),
                Literal::Number(x) => input.soil_type = Some(x.to_string()),
            }
        } else {
            let factor = match a.name.parse::<Factor>() {
                Ok(f) => f,
                Err(_) => {
                    let mut d = Diagnostic::warning(
                        a.name_span,
                        format!("unknown factor '{}' is ignored", a.name),
                    );
                    if let Some(s) = suggest(&a.name) {
                        d = d.with_help(format!("did you mean '{s}'?"));
                    }
                    diags.push(d);
                    continue;
                }
            };
            match a.value {
                Literal::Number(x) if x.is_finite() => input.set(factor, x),
                Literal::Number(_) => {
                    diags.push(Diagnostic::warning(
                        a.value_span,
                        format!("'{}' must be a finite number; factor skipped", a.name),
                    ));
                    continue;
                }
                Literal::Text(ref t) => {
                    diags.push(
                        Diagnostic::warning(
                            a.value_span,
                            format!("'{}' expects a number, found '{t}'; factor skipped", a.name),
                        )
                        .with_help("only soil_type takes text"),
                    );
                    continue;
                }
            }
        }

        let key = a
            .name
            .parse::<Factor>()
            .map(|f| f.name().to_string())
            .unwrap_or_else(|_| a.name.clone());
        if let Some(first) = seen.insert(key, a.name_span) {
            diags.push(Diagnostic::note(
                a.name_span,
                format!(
                    "'{}' was already set on line {}; the last value wins",
                    a.name, first.line
                ),
            ));
        }
    }
    log::debug!("scenario set {} factor(s)", input.len());
    input
}

/// Parse and build in one step, collecting every diagnostic.
pub fn load_scenario(src: &str, diags: &mut Vec<Diagnostic>) -> ScenarioInput {
    let assignments = parse_scenario_recovering(src, diags);
    build_input(&assignments, diags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{has_errors, Severity};
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_flooding_scenario() {
        let mut diags = Vec::new();
        let input = load_scenario(
            "infrastructure_strength = 8\nsoil_moisture_retention = 7\nsoil_type = clay",
            &mut diags,
        );
        assert!(diags.is_empty());
        assert_eq!(input.get(Factor::InfrastructureStrength), Some(8.0));
        assert_eq!(input.get(Factor::SoilMoistureRetention), Some(7.0));
        assert_eq!(input.soil_type.as_deref(), Some("clay"));
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn quoted_soil_type_keeps_commas() {
        let mut diags = Vec::new();
        let input = load_scenario(
            "soil_type = \"clay, loam\" # from survey\nvegetation_density = 6",
            &mut diags,
        );
        assert!(diags.is_empty());
        assert_eq!(input.soil_type.as_deref(), Some("clay, loam"));
        assert_eq!(input.get(Factor::VegetationDensity), Some(6.0));
    }

    #[test]
    fn unknown_factor_warns_with_suggestion() {
        let mut diags = Vec::new();
        let input = load_scenario("wind_facter = 0.4", &mut diags);
        assert!(input.is_empty());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].help.as_deref(), Some("did you mean 'wind_factor'?"));
        assert!(!has_errors(&diags));
    }

    #[test]
    fn text_for_numeric_factor_is_skipped() {
        let mut diags = Vec::new();
        let input = load_scenario("wind_factor = strong, distance_factor = 0.5", &mut diags);
        assert_eq!(input.get(Factor::WindFactor), None);
        assert_eq!(input.get(Factor::DistanceFactor), Some(0.5));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("expects a number"));
    }

    #[test]
    fn non_finite_number_is_skipped() {
        let mut diags = Vec::new();
        let input = load_scenario("wind_factor = inf", &mut diags);
        assert!(input.is_empty());
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn duplicate_keeps_last_value() {
        let mut diags = Vec::new();
        let input = load_scenario("wind_factor = 0.2\nwind_factor = 0.6", &mut diags);
        assert_eq!(input.get(Factor::WindFactor), Some(0.6));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Note);
        assert!(diags[0].message.contains("line 1"));
    }

    #[test]
    fn suggestion_needs_a_close_name() {
        assert_eq!(suggest("rainfal_factor"), Some("rainfall_factor"));
        assert_eq!(suggest("completely_unrelated_name"), None);
    }
}
