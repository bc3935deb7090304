//! Conversions from raw measurements to the unit scales the formulas use.
//!
//! Every function clamps into its documented range so that a nonsensical
//! reading (negative rainfall, a distance beyond the influence radius)
//! degrades to a boundary value instead of propagating.

/// Rainfall amount at which the rainfall factor saturates.
pub const RAINFALL_BASELINE_MM: f64 = 100.0;
/// Wind speed at which the wind factor saturates.
pub const WIND_BASELINE_KMH: f64 = 250.0;
/// Distance beyond which a cyclone no longer contributes.
pub const INFLUENCE_RADIUS_KM: f64 = 500.0;
/// Population at which the population factor saturates.
pub const POPULATION_BASELINE: f64 = 1_000_000.0;
/// Rainfall below which no mudslide is modelled.
pub const MUDSLIDE_RAINFALL_THRESHOLD_MM: f64 = 50.0;

/// `rainfall / 100mm`, in `[0, 1]`.
pub fn rainfall_factor(predicted_rainfall_mm: f64) -> f64 {
    unit(predicted_rainfall_mm / RAINFALL_BASELINE_MM)
}

/// `wind / 250km/h`, in `[0, 1]`.
pub fn wind_factor(wind_speed_kmh: f64) -> f64 {
    unit(wind_speed_kmh / WIND_BASELINE_KMH)
}

/// Saffir–Simpson category over 5, in `[0, 1]`.
pub fn category_weight(category: f64) -> f64 {
    unit(category / 5.0)
}

/// `1 - distance / 500km`, in `[0, 1]`.
pub fn distance_factor(distance_km: f64) -> f64 {
    unit(1.0 - distance_km / INFLUENCE_RADIUS_KM)
}

/// `(10 - strength) / 10`, in `[0, 1]`.
pub fn infrastructure_vulnerability(infrastructure_strength: f64) -> f64 {
    unit((10.0 - infrastructure_strength) / 10.0)
}

/// `population / 1e6`, in `[0, 1]`.
pub fn population_factor(population_size: f64) -> f64 {
    unit(population_size / POPULATION_BASELINE)
}

/// Local vulnerability on a 0–10 scale from site parameters.
///
/// Density contributes up to 10 points (one per 1000 people/km²) at a
/// quarter weight.
pub fn vulnerability_score(
    infrastructure_strength: f64,
    soil_moisture_retention: f64,
    vegetation_density: f64,
    population_density: f64,
) -> f64 {
    let density = (population_density / 1000.0).clamp(0.0, 10.0);
    (10.0 - infrastructure_strength) * 0.3
        + (10.0 - soil_moisture_retention) * 0.25
        + (10.0 - vegetation_density) * 0.2
        + density * 0.25
}

/// Rainfall intensity scaled by vulnerability, in `[0, 1]`.
pub fn flood_probability(rainfall_factor: f64, vulnerability_score: f64) -> f64 {
    unit(rainfall_factor * (vulnerability_score / 10.0))
}

/// Likelihood of a mudslide, in `[0, 1]`. Zero at or below 50mm.
pub fn mudslide_probability(
    predicted_rainfall_mm: f64,
    soil_moisture_retention: f64,
    vegetation_density: f64,
) -> f64 {
    if predicted_rainfall_mm.is_nan() || predicted_rainfall_mm <= MUDSLIDE_RAINFALL_THRESHOLD_MM {
        return 0.0;
    }
    unit(
        (predicted_rainfall_mm - MUDSLIDE_RAINFALL_THRESHOLD_MM) / 150.0
            * (10.0 - soil_moisture_retention)
            / 10.0
            * (10.0 - vegetation_density)
            / 10.0,
    )
}

fn unit(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn factors_saturate() {
        assert_eq!(rainfall_factor(50.0), 0.5);
        assert_eq!(rainfall_factor(400.0), 1.0);
        assert_eq!(rainfall_factor(-10.0), 0.0);
        assert_eq!(wind_factor(500.0), 1.0);
        assert_eq!(distance_factor(800.0), 0.0);
        assert_eq!(distance_factor(0.0), 1.0);
        assert_eq!(population_factor(5_000_000.0), 1.0);
        assert_eq!(category_weight(5.0), 1.0);
        assert_eq!(category_weight(0.0), 0.0);
    }

    #[test]
    fn vulnerability_caps_density_contribution() {
        let a = vulnerability_score(5.0, 5.0, 5.0, 10_000.0);
        let b = vulnerability_score(5.0, 5.0, 5.0, 1_000_000.0);
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        // 1.5 + 1.25 + 1.0 + 2.5
        assert_abs_diff_eq!(a, 6.25, epsilon = 1e-12);
    }

    #[test]
    fn flood_probability_scales_with_vulnerability() {
        assert_abs_diff_eq!(flood_probability(0.5, 6.0), 0.3, epsilon = 1e-12);
        assert_eq!(flood_probability(1.0, 40.0), 1.0);
        assert_eq!(flood_probability(0.0, 9.0), 0.0);
    }

    #[test]
    fn mudslide_only_above_threshold() {
        assert_eq!(mudslide_probability(50.0, 2.0, 2.0), 0.0);
        assert_eq!(mudslide_probability(f64::NAN, 2.0, 2.0), 0.0);
        // (125 - 50) / 150 * 0.8 * 0.5
        assert_abs_diff_eq!(mudslide_probability(125.0, 2.0, 5.0), 0.2, epsilon = 1e-12);
        assert_eq!(mudslide_probability(10_000.0, 0.0, 0.0), 1.0);
    }
}
